//! Model capability boundary
//!
//! The externally supplied model object may expose any of several calling
//! conventions; [`capability`] names them as trait operations, [`adapter`]
//! selects and invokes one and normalizes the answer, and [`http`] is the
//! bundled OpenAI-compatible implementation.

pub mod adapter;
pub mod capability;
pub mod http;

pub use adapter::{invoke, ModelCallResult};
pub use capability::{CallConvention, ChatMessage, MessageRole, ModelCapability, ModelError};
pub use http::HttpModelCapability;
