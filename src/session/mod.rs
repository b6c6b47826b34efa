use crate::api::{CastApi, CastDevice, ChannelMessage};
use crate::constants::{DEFAULT_NAMESPACE, MESSAGE_BUFFER};

mod command;
mod event;
mod handle;

pub use self::command::ControlCommand;
pub use self::event::{ConnectionEvent, EndReason, Event, RouteEvent};
pub use self::handle::SessionHandle;

use tokio::sync::{mpsc, watch};

use std::sync::Arc;

/// Receiver application settings for a [`SessionController`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastConfig {
    app_id: String,
    namespace: String,
}

impl CastConfig {
    /// Configuration for the receiver application `app_id`, using the
    /// crate's default control channel namespace.
    pub fn new<S: Into<String>>(app_id: S) -> Self {
        Self {
            app_id: app_id.into(),
            namespace: DEFAULT_NAMESPACE.into(),
        }
    }

    /// Override the control channel namespace
    pub fn with_namespace<S: Into<String>>(mut self, namespace: S) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn app_id(&self) -> String {
        self.app_id.clone()
    }

    pub fn namespace(&self) -> String {
        self.namespace.clone()
    }
}

/// Lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No device selected
    Idle,
    /// Device selected, waiting for the transport connection
    Connecting,
    /// Connected, waiting for the receiver application to start
    Launching,
    /// Application running and control channel subscribed
    Active,
}

/// The one session a controller tracks: selected device, transport
/// connection and control channel subscription as a single lifecycle unit.
///
/// Invariants, restored by every transition:
/// a connection implies a device, and a subscribed channel implies a
/// connection in the `Active` state.
#[derive(Debug)]
pub struct Session<H> {
    device: Option<CastDevice>,
    connection: Option<H>,
    channel_subscribed: bool,
    state: State,
}

impl<H> Session<H> {
    fn new() -> Self {
        Self {
            device: None,
            connection: None,
            channel_subscribed: false,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn device(&self) -> Option<&CastDevice> {
        self.device.as_ref()
    }

    pub fn connection(&self) -> Option<&H> {
        self.connection.as_ref()
    }

    pub fn channel_subscribed(&self) -> bool {
        self.channel_subscribed
    }
}

/// State machine mediating between route/connection callbacks and one cast
/// session.
///
/// The controller reacts to one [`Event`] at a time; feed it from a single
/// task (or use [`SessionController::spawn`], which runs the loop for you).
/// Connect and launch requests never block event handling: they run in
/// spawned tasks whose results come back through the same event channel,
/// tagged with the session generation so results for a torn-down session
/// are discarded.
///
/// Must be created inside a Tokio runtime.
pub struct SessionController<C: CastApi> {
    api: Arc<C>,
    config: CastConfig,
    session: Session<C::Connection>,
    generation: u64,
    events: mpsc::Sender<Event<C::Connection>>,
    messages: mpsc::Sender<ChannelMessage>,
    controls_tx: watch::Sender<bool>,
    controls_rx: watch::Receiver<bool>,
}

impl<C: CastApi> SessionController<C> {
    /// Create a controller that reports its asynchronous request results to
    /// `events`. The caller owns the receiving side and is responsible for
    /// feeding every received event back into [`handle_event`](Self::handle_event).
    pub fn new(api: Arc<C>, config: CastConfig, events: mpsc::Sender<Event<C::Connection>>) -> Self {
        let (controls_tx, controls_rx) = watch::channel(false);
        let (messages, mut messages_rx) = mpsc::channel::<ChannelMessage>(MESSAGE_BUFFER);

        // Inbound channel messages join the serialized event stream.
        tokio::spawn({
            let events = events.clone();
            async move {
                while let Some(message) = messages_rx.recv().await {
                    if events.send(Event::Message(message)).await.is_err() {
                        break;
                    }
                }
            }
        });

        Self {
            api,
            config,
            session: Session::new(),
            generation: 0,
            events,
            messages,
            controls_tx,
            controls_rx,
        }
    }

    /// The session this controller owns
    pub fn session(&self) -> &Session<C::Connection> {
        &self.session
    }

    /// Visibility signal for the control UI: `true` exactly while the
    /// session is [`Active`](State::Active).
    pub fn controls_visible(&self) -> watch::Receiver<bool> {
        self.controls_rx.clone()
    }

    /// Request the next slide. No-op unless the session is active.
    pub async fn next(&mut self) {
        self.handle_event(Event::Control(ControlCommand::Next)).await;
    }

    /// Request the previous slide. No-op unless the session is active.
    pub async fn previous(&mut self) {
        self.handle_event(Event::Control(ControlCommand::Previous)).await;
    }

    /// Advance the state machine by one event.
    ///
    /// Any event may arrive in any state; combinations outside the normal
    /// lifecycle resolve to a teardown or a logged no-op, never a panic.
    pub async fn handle_event(&mut self, event: Event<C::Connection>) {
        match event {
            Event::Route(RouteEvent::Added(device)) => {
                log::debug!("route available: {} ({})", device.name(), device.id());
            }
            Event::Route(RouteEvent::Selected(device)) => {
                // Selecting over a live session replaces it.
                if self.session.state != State::Idle {
                    self.end_session(EndReason::Replaced).await;
                }
                self.start_session(device);
            }
            Event::Route(RouteEvent::Unselected) => {
                self.end_session(EndReason::RouteUnselected).await;
            }
            Event::Route(RouteEvent::Removed(device)) => {
                // Removal of an unrelated route leaves the session alone.
                let selected = self.session.device.as_ref().map(CastDevice::id);
                if selected == Some(device.id()) {
                    self.end_session(EndReason::RouteRemoved).await;
                } else {
                    log::debug!("route gone: {} ({})", device.name(), device.id());
                }
            }
            Event::Connection(event) => self.handle_connection_event(event).await,
            Event::Control(command) => self.control(command),
            Event::Message(message) => {
                log::debug!(
                    "message on {}: {}",
                    message.namespace(),
                    message.payload()
                );
            }
            Event::Shutdown => self.end_session(EndReason::Shutdown).await,
        }
    }

    async fn handle_connection_event(&mut self, event: ConnectionEvent<C::Connection>) {
        match event {
            ConnectionEvent::Established {
                generation,
                connection,
            } => {
                if generation != self.generation || self.session.state != State::Connecting {
                    self.discard_stale(connection);
                    return;
                }
                self.session.connection = Some(connection.clone());
                self.session.state = State::Launching;
                self.request_launch(connection);
            }
            ConnectionEvent::ConnectFailed { generation, error } => {
                if generation != self.generation {
                    return;
                }
                log::warn!("connection failed: {}", error);
                self.end_session(EndReason::ConnectionFailed).await;
            }
            ConnectionEvent::Launched { generation } => {
                if generation != self.generation || self.session.state != State::Launching {
                    return;
                }
                self.open_channel().await;
            }
            ConnectionEvent::LaunchFailed { generation, error } => {
                if generation != self.generation {
                    return;
                }
                log::warn!("application launch failed: {}", error);
                self.end_session(EndReason::LaunchFailed).await;
            }
            ConnectionEvent::Suspended { cause } => {
                log::warn!("connection suspended: {}", cause);
                self.end_session(EndReason::Suspended).await;
            }
            ConnectionEvent::Failed { reason } => {
                log::warn!("connection reported as failed: {}", reason);
                self.end_session(EndReason::ConnectionFailed).await;
            }
            ConnectionEvent::AppDisconnected { error_code } => {
                self.end_session(EndReason::RemoteDisconnect(error_code)).await;
            }
        }
    }

    /// Tear the session down and return to [`Idle`](State::Idle).
    ///
    /// Idempotent, and the single exit path for every failure and cleanup
    /// trigger. Collaborator errors during teardown are logged and
    /// swallowed; local state is always cleared.
    pub async fn end_session(&mut self, reason: EndReason) {
        let had_session = self.session.device.is_some();
        let _ = self.controls_tx.send(false);

        if let Some(connection) = self.session.connection.take() {
            if self.session.channel_subscribed {
                if let Err(e) = self
                    .api
                    .unsubscribe(&connection, &self.config.namespace)
                    .await
                {
                    log::debug!("unsubscribe during teardown: {}", e);
                }
            }
            if let Err(e) = self.api.stop_application(&connection).await {
                log::debug!("stop application during teardown: {}", e);
            }
            self.api.disconnect(&connection).await;
        }

        self.session.channel_subscribed = false;
        self.session.device = None;
        self.session.state = State::Idle;
        // In-flight connect/launch results for this session are now stale.
        self.generation += 1;

        if had_session {
            log::info!("session ended: {}", reason);
        }
    }

    fn start_session(&mut self, device: CastDevice) {
        self.generation += 1;
        let generation = self.generation;
        log::info!("connecting to {} ({})", device.name(), device.id());

        self.session.device = Some(device.clone());
        self.session.state = State::Connecting;

        let api = self.api.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let event = match api.connect(&device).await {
                Ok(connection) => ConnectionEvent::Established {
                    generation,
                    connection,
                },
                Err(error) => ConnectionEvent::ConnectFailed { generation, error },
            };
            let _ = events.send(Event::Connection(event)).await;
        });
    }

    fn request_launch(&self, connection: C::Connection) {
        let generation = self.generation;
        let api = self.api.clone();
        let events = self.events.clone();
        let app_id = self.config.app_id();
        tokio::spawn(async move {
            let event = match api.launch_application(&connection, &app_id).await {
                Ok(()) => ConnectionEvent::Launched { generation },
                Err(error) => ConnectionEvent::LaunchFailed { generation, error },
            };
            let _ = events.send(Event::Connection(event)).await;
        });
    }

    async fn open_channel(&mut self) {
        let connection = match self.session.connection.clone() {
            Some(connection) => connection,
            None => return,
        };
        match self
            .api
            .subscribe(&connection, &self.config.namespace, self.messages.clone())
            .await
        {
            Ok(()) => {
                self.session.channel_subscribed = true;
                self.session.state = State::Active;
                let _ = self.controls_tx.send(true);
                if let Some(device) = &self.session.device {
                    log::info!("session active on {} ({})", device.name(), device.id());
                }
            }
            Err(e) => {
                log::warn!("channel subscribe failed: {}", e);
                self.end_session(EndReason::LaunchFailed).await;
            }
        }
    }

    fn control(&self, command: ControlCommand) {
        if self.session.state != State::Active || !self.session.channel_subscribed {
            log::trace!("ignoring {:?} outside an active session", command);
            return;
        }
        let connection = match self.session.connection.clone() {
            Some(connection) => connection,
            None => return,
        };
        let api = self.api.clone();
        let namespace = self.config.namespace();
        tokio::spawn(async move {
            // A failed delivery does not end the session.
            if let Err(e) = api.send_message(&connection, &namespace, command.payload()).await {
                log::error!("sending '{}' failed: {}", command.payload(), e);
            }
        });
    }

    /// A connect result arrived for a session that no longer exists.
    /// Release the orphaned handle so the device is not left connected.
    fn discard_stale(&self, connection: C::Connection) {
        log::debug!("discarding connection result for an ended session");
        let api = self.api.clone();
        tokio::spawn(async move {
            let _ = api.stop_application(&connection).await;
            api.disconnect(&connection).await;
        });
    }
}
