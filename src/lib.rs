pub mod logging;
pub mod mqtt;
pub mod payload;
pub mod poller;
pub mod sensor;
