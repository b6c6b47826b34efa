use std::fmt::{Debug, Display};

/// Result for API calls from a [`CastApi`](crate::CastApi) collaborator or a
/// [`SessionController`](crate::SessionController)
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Errors reported by the cast device or its SDK
    Cast(CastError),
    /// Errors from local misuse of the client
    Client(ClientError),
    /// Error from std::io
    IO(std::io::Error),
    #[doc(hidden)]
    Other(String),
}

impl Error {
    pub fn is_cast(&self) -> bool {
        matches!(self, Error::Cast(_))
    }

    pub fn is_client(&self) -> bool {
        matches!(self, Error::Client(_))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Error::IO(_))
    }

    pub fn connection_failed<S: Into<String>>(reason: S) -> Error {
        CastError::ConnectionFailed(reason.into()).into()
    }

    pub fn connection_suspended<S: Into<String>>(cause: S) -> Error {
        CastError::ConnectionSuspended(cause.into()).into()
    }

    pub fn launch_failed<S: Into<String>>(reason: S) -> Error {
        CastError::LaunchFailed(reason.into()).into()
    }

    pub fn send_failed<S: Into<String>>(reason: S) -> Error {
        CastError::SendFailed(reason.into()).into()
    }

    pub fn not_launched() -> Error {
        CastError::NotLaunched.into()
    }
}

impl From<CastError> for Error {
    fn from(e: CastError) -> Self {
        Error::Cast(e)
    }
}

impl From<ClientError> for Error {
    fn from(e: ClientError) -> Self {
        Error::Client(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::IO(e)
    }
}

impl From<String> for Error {
    fn from(e: String) -> Error {
        Error::Other(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cast(e) => write!(f, "{}", e),
            Self::Client(e) => write!(f, "{}", e),
            Self::IO(e) => write!(f, "{}", e),
            Self::Other(e) => write!(f, "{}", e),
        }
    }
}

/// Errors reported by the cast device or its SDK
#[derive(Debug)]
pub enum CastError {
    /// Connecting to the selected device failed
    ConnectionFailed(String),
    /// An established connection was suspended by the platform
    ConnectionSuspended(String),
    /// The receiver application could not be launched
    LaunchFailed(String),
    /// Channel operations require a launched receiver application
    NotLaunched,
    /// A control message could not be delivered
    SendFailed(String),
    /// The receiver application disconnected on its own
    ApplicationDisconnected(i32),
    #[doc(hidden)]
    Unknown(String),
}

impl Display for CastError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed(reason) => write!(f, "Connection failed: {}", reason),
            Self::ConnectionSuspended(cause) => write!(f, "Connection suspended: {}", cause),
            Self::LaunchFailed(reason) => write!(f, "Application launch failed: {}", reason),
            Self::NotLaunched => write!(f, "No receiver application is launched"),
            Self::SendFailed(reason) => write!(f, "Message delivery failed: {}", reason),
            Self::ApplicationDisconnected(code) => {
                write!(f, "Receiver application disconnected with code {}", code)
            }
            Self::Unknown(e) => write!(f, "Unknown error: '{}'", e),
        }
    }
}

impl From<String> for CastError {
    fn from(e: String) -> CastError {
        CastError::Unknown(e)
    }
}

/// Errors from local misuse of the client
#[derive(Debug)]
pub enum ClientError {
    /// Control intents are only valid while a session is active
    NotActive,
    /// The controller event channel is closed
    ChannelClosed,
    #[doc(hidden)]
    Message(String),
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self {
            Self::NotActive => write!(f, "No active session"),
            Self::ChannelClosed => write!(f, "Controller event channel is closed"),
            Self::Message(msg) => write!(f, "{}", msg),
        }
    }
}
