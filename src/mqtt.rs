use std::time::Duration;

use anyhow::{Context as _, Result};
use rumqttc::{AsyncClient, Event, EventLoop, LastWill, MqttOptions, Outgoing, Packet, QoS};
use tokio::{task::JoinHandle, time::timeout};
use tracing::{info, warn};

const REQUEST_CHANNEL_CAPACITY: usize = 10;
const POLL_ERROR_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub temperature: String,

    pub humidity: String,

    pub connection: String,
}

impl Topics {
    pub fn from_base(base: &str) -> Self {
        Self {
            temperature: format!("{base}/temperature-sensor/data"),
            humidity: format!("{base}/humidity-sensor/data"),
            connection: format!("{base}/sensor/connection"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Broker {
    pub host: String,

    pub port: u16,

    pub keep_alive: Duration,

    pub credentials: Option<(String, String)>,
}

/// Client options with the offline status registered as the last will on `will_topic`.
pub fn mqtt_options(
    broker: &Broker,
    client_id: &str,
    will_topic: &str,
    will_payload: Vec<u8>,
) -> MqttOptions {
    let mut options = MqttOptions::new(client_id, broker.host.clone(), broker.port);
    options.set_keep_alive(broker.keep_alive);
    options.set_last_will(LastWill::new(
        will_topic,
        will_payload,
        QoS::AtLeastOnce,
        false,
    ));

    if let Some((username, password)) = &broker.credentials {
        options.set_credentials(username.clone(), password.clone());
    }

    options
}

pub fn connect(options: MqttOptions) -> (AsyncClient, JoinHandle<()>) {
    let (client, event_loop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);
    let driver = spawn_event_loop(event_loop);

    (client, driver)
}

/// Drives the client's network I/O. rumqttc reconnects on the next poll after an error.
pub fn spawn_event_loop(mut event_loop: EventLoop) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!("connected to MQTT broker: {:?}", ack.code);
                }
                Ok(Event::Outgoing(Outgoing::Disconnect)) => {
                    info!("disconnected from MQTT broker");
                    break;
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("MQTT connection error: {err}");
                    tokio::time::sleep(POLL_ERROR_DELAY).await;
                }
            }
        }
    })
}

/// Requests a clean disconnect and waits up to `limit` for the event loop to flush it.
/// Never blocks on a full request channel.
pub async fn disconnect(client: &AsyncClient, driver: JoinHandle<()>, limit: Duration) {
    if let Err(err) = client.try_disconnect() {
        warn!("failed to request MQTT disconnect: {err}");
        return;
    }

    if timeout(limit, driver).await.is_err() {
        warn!("MQTT event loop did not stop within {limit:?}");
    }
}

/// Hands a message to the broker client. Success only means the message was queued;
/// a full request queue is reported as an error instead of waiting for room.
pub trait Publisher {
    fn publish(
        &self,
        topic: &str,
        qos: QoS,
        payload: Vec<u8>,
    ) -> impl Future<Output = Result<()>>;
}

impl Publisher for AsyncClient {
    async fn publish(&self, topic: &str, qos: QoS, payload: Vec<u8>) -> Result<()> {
        self.try_publish(topic, qos, false, payload)
            .with_context(|| format!("failed to queue publish to {topic}"))
    }
}
