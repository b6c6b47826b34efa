//! Drive a second-screen presentation from a small session state machine.
//!
//! The crate owns exactly one piece of logic: the [`SessionController`],
//! which tracks the lifecycle of a connection to a single cast device,
//! launches a receiver application on it, and mediates `"next"` /
//! `"previous"` control messages over a namespaced channel while the
//! session is active. Everything device-side -- discovery, transport,
//! application launch, message delivery -- lives behind the [`CastApi`]
//! trait so a platform SDK (or a test double) can be plugged in.
//!
//! ```ignore
//! use std::sync::Arc;
//! use slidecast::{CastConfig, SessionController};
//!
//! #[tokio::main]
//! async fn main() {
//!     let api = Arc::new(MyPlatformCast::new());
//!     let handle = SessionController::spawn(api, CastConfig::new("APP_ID"));
//!
//!     // Wire remaining platform callbacks to handle.events(), then:
//!     handle.next().await.unwrap();
//!     handle.shutdown().await;
//! }
//! ```

mod api;
mod constants;
mod error;
mod session;

pub use api::{CastApi, CastDevice, ChannelMessage, RouteSelector};
pub use error::{CastError, ClientError, Error, Result};
pub use session::{
    CastConfig, ConnectionEvent, ControlCommand, EndReason, Event, RouteEvent, Session,
    SessionController, SessionHandle, State,
};
