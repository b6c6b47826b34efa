/// User control intents forwarded to the receiver application while a
/// session is active.
///
/// Each command maps to the short text payload the receiver expects on the
/// control channel. Outside an active session commands are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Advance to the next slide
    Next,
    /// Return to the previous slide
    Previous,
}

impl ControlCommand {
    /// The wire payload for this command
    pub fn payload(&self) -> &'static str {
        match self {
            Self::Next => "next",
            Self::Previous => "previous",
        }
    }
}
