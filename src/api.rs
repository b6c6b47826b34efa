use crate::error::Result;
use crate::session::RouteEvent;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use std::fmt::Debug;

/// A cast-capable remote device, as reported by route discovery.
///
/// The controller never inspects a device beyond its identity; all fields
/// come straight from the discovery layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastDevice {
    id: String,
    name: String,
    model: String,
}

impl CastDevice {
    pub fn new<S: Into<String>>(id: S, name: S, model: S) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
        }
    }

    /// Get the device's route id
    pub fn id(&self) -> String {
        self.id.clone()
    }

    /// Get the device's 'friendly' name
    pub fn name(&self) -> String {
        self.name.clone()
    }

    /// Get the device's model name
    pub fn model_name(&self) -> String {
        self.model.clone()
    }
}

/// Filter for route discovery, scoped to the devices able to run a given
/// receiver application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSelector {
    app_id: String,
}

impl RouteSelector {
    pub fn for_app<S: Into<String>>(app_id: S) -> Self {
        Self {
            app_id: app_id.into(),
        }
    }

    pub fn app_id(&self) -> String {
        self.app_id.clone()
    }
}

/// An inbound message received on a subscribed control channel.
///
/// Payloads are opaque short text; the channel abstraction provides all
/// framing there is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    namespace: String,
    payload: String,
}

impl ChannelMessage {
    pub fn new<S: Into<String>>(namespace: S, payload: S) -> Self {
        Self {
            namespace: namespace.into(),
            payload: payload.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}

/// Discovery and remote-control collaborator.
///
/// This is the narrow surface the [`SessionController`](crate::SessionController)
/// needs from a platform casting SDK. Implementations wrap the real SDK;
/// tests substitute a scripted double. All methods are invoked from the
/// controller's single event loop or from short-lived tasks it spawns, so
/// implementations only need interior mutability, not ordering guarantees.
#[async_trait]
pub trait CastApi: Send + Sync + 'static {
    /// Handle to an active transport connection.
    type Connection: Clone + Debug + Send + Sync + 'static;

    /// Start route discovery and feed route-change events into `routes`
    /// until the receiving side is dropped.
    async fn discover(
        &self,
        selector: RouteSelector,
        routes: mpsc::Sender<RouteEvent>,
    ) -> Result<()>;

    /// Open a transport connection to `device`.
    async fn connect(&self, device: &CastDevice) -> Result<Self::Connection>;

    /// Launch the receiver application identified by `app_id` on the
    /// connected device.
    async fn launch_application(
        &self,
        connection: &Self::Connection,
        app_id: &str,
    ) -> Result<()>;

    /// Open the namespaced control channel and deliver inbound messages to
    /// `messages`. Fails with [`CastError::NotLaunched`](crate::CastError::NotLaunched)
    /// if no application is launched on the connection.
    async fn subscribe(
        &self,
        connection: &Self::Connection,
        namespace: &str,
        messages: mpsc::Sender<ChannelMessage>,
    ) -> Result<()>;

    /// Close the namespaced control channel.
    async fn unsubscribe(&self, connection: &Self::Connection, namespace: &str) -> Result<()>;

    /// Deliver a short text payload on the control channel.
    async fn send_message(
        &self,
        connection: &Self::Connection,
        namespace: &str,
        payload: &str,
    ) -> Result<()>;

    /// Ask the device to stop the receiver application. Best-effort.
    async fn stop_application(&self, connection: &Self::Connection) -> Result<()>;

    /// Release the transport connection. Infallible by contract; a handle
    /// passed here must not be used again.
    async fn disconnect(&self, connection: &Self::Connection);
}
