pub mod error;
pub mod event;

pub use error::AdapterError;
pub use event::{GatewayEvent, GatewayReply, Identity, RequestContext};
