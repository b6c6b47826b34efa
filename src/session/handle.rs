use crate::api::{CastApi, RouteSelector};
use crate::constants::EVENT_BUFFER;
use crate::error::{ClientError, Result};
use crate::session::{CastConfig, ControlCommand, Event, SessionController};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use std::sync::Arc;

impl<C: CastApi> SessionController<C> {
    /// Run a controller as its own task and return a [`SessionHandle`] to it.
    ///
    /// Route discovery is started immediately; discovered route events and
    /// the controller's own request results share one serialized event loop,
    /// so no further synchronization is needed on top of the handle.
    pub fn spawn(api: Arc<C>, config: CastConfig) -> SessionHandle<C::Connection> {
        let (events_tx, mut events_rx) = mpsc::channel(EVENT_BUFFER);
        let mut controller = SessionController::new(api.clone(), config.clone(), events_tx.clone());
        let controls = controller.controls_visible();

        // Route-change events join the controller's event stream.
        let (routes_tx, mut routes_rx) = mpsc::channel(EVENT_BUFFER);
        tokio::spawn({
            let events = events_tx.clone();
            async move {
                while let Some(route) = routes_rx.recv().await {
                    if events.send(Event::Route(route)).await.is_err() {
                        break;
                    }
                }
            }
        });
        tokio::spawn(async move {
            let selector = RouteSelector::for_app(config.app_id());
            if let Err(e) = api.discover(selector, routes_tx).await {
                log::error!("route discovery failed: {}", e);
            }
        });

        let task = tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                let shutdown = matches!(event, Event::Shutdown);
                controller.handle_event(event).await;
                if shutdown {
                    break;
                }
            }
        });

        SessionHandle {
            events: events_tx,
            controls,
            task,
        }
    }
}

/// Handle to a controller running under [`SessionController::spawn`].
///
/// Cloning the [`events`](Self::events) sender is how an embedding
/// application wires its platform callbacks (route selection, suspension,
/// remote disconnects) into the controller.
pub struct SessionHandle<H> {
    events: mpsc::Sender<Event<H>>,
    controls: watch::Receiver<bool>,
    task: JoinHandle<()>,
}

impl<H> SessionHandle<H> {
    /// Request the next slide. No-op unless the session is active.
    pub async fn next(&self) -> Result<()> {
        self.send(Event::Control(ControlCommand::Next)).await
    }

    /// Request the previous slide. No-op unless the session is active.
    pub async fn previous(&self) -> Result<()> {
        self.send(Event::Control(ControlCommand::Previous)).await
    }

    /// A sender for feeding platform callbacks into the controller
    pub fn events(&self) -> mpsc::Sender<Event<H>> {
        self.events.clone()
    }

    /// Visibility signal for the control UI: `true` exactly while a session
    /// is active.
    pub fn controls_visible(&self) -> watch::Receiver<bool> {
        self.controls.clone()
    }

    /// Tear down any session and stop the controller task.
    pub async fn shutdown(self) {
        let _ = self.events.send(Event::Shutdown).await;
        let _ = self.task.await;
    }

    async fn send(&self, event: Event<H>) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| ClientError::ChannelClosed.into())
    }
}
