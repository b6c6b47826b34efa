/// Control channel namespace used when [`CastConfig`](crate::CastConfig) does not override it
pub const DEFAULT_NAMESPACE: &str = "urn:x-cast:rs.slidecast.control";
/// Buffer size of the controller event channel
pub const EVENT_BUFFER: usize = 32;
/// Buffer size of the inbound channel-message queue
pub const MESSAGE_BUFFER: usize = 32;
