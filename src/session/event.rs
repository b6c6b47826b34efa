use crate::api::{CastDevice, ChannelMessage};
use crate::error::Error;
use crate::session::ControlCommand;

use std::fmt::Display;

/// Everything a [`SessionController`](crate::SessionController) reacts to,
/// as one tagged type.
///
/// Route and connection callbacks from the platform, results of the
/// controller's own connect/launch requests, inbound channel messages and
/// user control intents all arrive through the same serialized stream, so
/// the state machine never observes two events at once.
#[derive(Debug)]
pub enum Event<H> {
    /// Route discovery callback
    Route(RouteEvent),
    /// Connection lifecycle callback or async request result
    Connection(ConnectionEvent<H>),
    /// User control intent
    Control(ControlCommand),
    /// Inbound message on the subscribed channel
    Message(ChannelMessage),
    /// Stop the controller, tearing down any session first
    Shutdown,
}

/// Route-change events from the discovery layer.
#[derive(Debug, Clone)]
pub enum RouteEvent {
    /// A cast-capable device appeared on the network
    Added(CastDevice),
    /// A previously discovered device disappeared
    Removed(CastDevice),
    /// The user picked a device to cast to
    Selected(CastDevice),
    /// The user dismissed the current device
    Unselected,
}

/// Connection lifecycle events.
///
/// `Established`, `ConnectFailed`, `Launched` and `LaunchFailed` are results
/// of requests the controller issued itself; they carry the session
/// generation captured at request time so a result outliving its session is
/// recognized and discarded. The remaining variants are pushed by the
/// platform and always apply to whatever session is current.
#[derive(Debug)]
pub enum ConnectionEvent<H> {
    /// Transport connection is up
    Established { generation: u64, connection: H },
    /// Connecting to the device failed
    ConnectFailed { generation: u64, error: Error },
    /// The receiver application is running
    Launched { generation: u64 },
    /// The receiver application could not be launched
    LaunchFailed { generation: u64, error: Error },
    /// The platform suspended the connection
    Suspended { cause: String },
    /// The platform reported the connection as failed
    Failed { reason: String },
    /// The receiver application disconnected on its own
    AppDisconnected { error_code: i32 },
}

/// Why a session was torn down. Logged once per teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// A new route was selected over a live session
    Replaced,
    /// Connecting to the device failed
    ConnectionFailed,
    /// Launching or subscribing to the receiver application failed
    LaunchFailed,
    /// The platform suspended the connection
    Suspended,
    /// The receiver application disconnected remotely
    RemoteDisconnect(i32),
    /// The selected route disappeared from the network
    RouteRemoved,
    /// The user dismissed the device
    RouteUnselected,
    /// The embedding application is shutting the controller down
    Shutdown,
}

impl Display for EndReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replaced => write!(f, "replaced by a new route selection"),
            Self::ConnectionFailed => write!(f, "connection failed"),
            Self::LaunchFailed => write!(f, "application launch failed"),
            Self::Suspended => write!(f, "connection suspended"),
            Self::RemoteDisconnect(code) => {
                write!(f, "application disconnected remotely (code {})", code)
            }
            Self::RouteRemoved => write!(f, "route removed"),
            Self::RouteUnselected => write!(f, "route unselected"),
            Self::Shutdown => write!(f, "controller shutdown"),
        }
    }
}
