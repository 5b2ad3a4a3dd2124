//! Pieces shared by every aidraw crate: the message-based error context
//! helpers and small text utilities used when surfacing remote failures.

pub mod error;
pub mod text;

pub use error::FromMessage;
