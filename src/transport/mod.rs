//! Outbound HTTP transport for the chat-completion and model catalog endpoints.

mod http;

pub use http::{HttpResponse, HttpTransport, TransportError};
