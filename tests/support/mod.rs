#![allow(dead_code)]

use slidecast::{
    CastApi, CastConfig, CastDevice, ChannelMessage, Error, Event, Result, RouteEvent,
    RouteSelector, SessionController,
};

use async_trait::async_trait;
use rand::{distributions::Alphanumeric, Rng};
use tokio::sync::mpsc;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

pub const APP_ID: &str = "0F0F0F0F";
pub const NAMESPACE: &str = "urn:x-cast:rs.slidecast.test";

pub fn init_logger() {
    if let Err(e) = pretty_env_logger::try_init() {
        log::warn!(target: "test::support", "Logger init() returned '{}'", e);
    }
}

/// Collaborator calls recorded by [`FakeCast`], in invocation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect(String),
    Launch(String),
    Subscribe(String),
    Unsubscribe(String),
    Send(String, String),
    Stop,
    Disconnect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeConnection {
    pub id: u32,
}

/// Scripted in-process stand-in for a platform casting SDK.
///
/// Records every call made through [`CastApi`] and can be told at
/// construction to fail individual operations.
#[derive(Default)]
pub struct FakeCast {
    calls: Mutex<Vec<Call>>,
    routes: Mutex<Option<mpsc::Sender<RouteEvent>>>,
    messages: Mutex<Option<mpsc::Sender<ChannelMessage>>>,
    next_connection: AtomicU32,
    fail_connect: bool,
    fail_launch: bool,
    fail_subscribe: bool,
    fail_send: bool,
    fail_stop: bool,
    fail_unsubscribe: bool,
}

impl FakeCast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    pub fn fail_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn fail_subscribe(mut self) -> Self {
        self.fail_subscribe = true;
        self
    }

    pub fn fail_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    pub fn fail_teardown_calls(mut self) -> Self {
        self.fail_stop = true;
        self.fail_unsubscribe = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `(namespace, payload)` of every delivered send, in order
    pub fn sends(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send(namespace, payload) => Some((namespace, payload)),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    /// Whether `discover()` has been called and the route sink is wired
    pub fn discovering(&self) -> bool {
        self.routes.lock().unwrap().is_some()
    }

    /// Push a route-change event the way the platform discovery layer would
    pub async fn push_route(&self, event: RouteEvent) {
        let routes = self
            .routes
            .lock()
            .unwrap()
            .clone()
            .expect("discover() was never called");
        routes.send(event).await.expect("route sink closed");
    }

    /// Deliver an inbound channel message to the current subscriber
    pub async fn push_message(&self, payload: &str) {
        let messages = self
            .messages
            .lock()
            .unwrap()
            .clone()
            .expect("no channel subscribed");
        messages
            .send(ChannelMessage::new(NAMESPACE, payload))
            .await
            .expect("message sink closed");
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl CastApi for FakeCast {
    type Connection = FakeConnection;

    async fn discover(
        &self,
        _selector: RouteSelector,
        routes: mpsc::Sender<RouteEvent>,
    ) -> Result<()> {
        *self.routes.lock().unwrap() = Some(routes);
        Ok(())
    }

    async fn connect(&self, device: &CastDevice) -> Result<FakeConnection> {
        self.record(Call::Connect(device.id()));
        if self.fail_connect {
            return Err(Error::connection_failed("connection refused"));
        }
        Ok(FakeConnection {
            id: self.next_connection.fetch_add(1, Ordering::SeqCst),
        })
    }

    async fn launch_application(
        &self,
        _connection: &FakeConnection,
        app_id: &str,
    ) -> Result<()> {
        self.record(Call::Launch(app_id.to_string()));
        if self.fail_launch {
            return Err(Error::launch_failed("no such receiver application"));
        }
        Ok(())
    }

    async fn subscribe(
        &self,
        _connection: &FakeConnection,
        namespace: &str,
        messages: mpsc::Sender<ChannelMessage>,
    ) -> Result<()> {
        self.record(Call::Subscribe(namespace.to_string()));
        if self.fail_subscribe {
            return Err(Error::not_launched());
        }
        *self.messages.lock().unwrap() = Some(messages);
        Ok(())
    }

    async fn unsubscribe(&self, _connection: &FakeConnection, namespace: &str) -> Result<()> {
        self.record(Call::Unsubscribe(namespace.to_string()));
        if self.fail_unsubscribe {
            return Err("connection already dropped".to_string().into());
        }
        *self.messages.lock().unwrap() = None;
        Ok(())
    }

    async fn send_message(
        &self,
        _connection: &FakeConnection,
        namespace: &str,
        payload: &str,
    ) -> Result<()> {
        self.record(Call::Send(namespace.to_string(), payload.to_string()));
        if self.fail_send {
            return Err(Error::send_failed("channel closed"));
        }
        Ok(())
    }

    async fn stop_application(&self, _connection: &FakeConnection) -> Result<()> {
        self.record(Call::Stop);
        if self.fail_stop {
            return Err("connection already dropped".to_string().into());
        }
        Ok(())
    }

    async fn disconnect(&self, _connection: &FakeConnection) {
        self.record(Call::Disconnect);
    }
}

/// Controller wired to a [`FakeCast`], with the event receiver handed back
/// so tests control exactly when each asynchronous result is applied.
pub fn controller(
    api: Arc<FakeCast>,
) -> (
    SessionController<FakeCast>,
    mpsc::Receiver<Event<FakeConnection>>,
) {
    let (events_tx, events_rx) = mpsc::channel(32);
    let config = CastConfig::new(APP_ID).with_namespace(NAMESPACE);
    (SessionController::new(api, config, events_tx), events_rx)
}

/// Apply the next pending event to the controller
pub async fn pump(
    controller: &mut SessionController<FakeCast>,
    events: &mut mpsc::Receiver<Event<FakeConnection>>,
) {
    let event = events.recv().await.expect("event stream closed");
    controller.handle_event(event).await;
}

/// Drive a fresh route selection all the way to an active session
pub async fn activate(
    controller: &mut SessionController<FakeCast>,
    events: &mut mpsc::Receiver<Event<FakeConnection>>,
) -> CastDevice {
    let dev = device();
    controller
        .handle_event(Event::Route(RouteEvent::Selected(dev.clone())))
        .await;
    pump(controller, events).await; // connection established
    pump(controller, events).await; // application launched
    dev
}

/// Random data helpers
pub mod rand_data {
    use rand::{distributions::Alphanumeric, Rng};

    pub fn string(len: usize) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .map(char::from)
            .take(len)
            .collect()
    }

    pub fn route_id() -> String {
        let rand_string = string(32);
        format!(
            "{}-{}-{}-{}-{}",
            &rand_string[0..8],
            &rand_string[8..12],
            &rand_string[12..16],
            &rand_string[16..20],
            &rand_string[20..32]
        )
    }
}

pub fn device() -> CastDevice {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(4)
        .collect();
    CastDevice::new(
        rand_data::route_id(),
        format!("Fake Device-{}", suffix),
        format!("fake_model_{}", suffix),
    )
}
