//! HTTP seam between the interpreter and the x2 server.

mod endpoint;
mod error;
mod multipart;
mod request;
mod scripted;
mod transport;

pub use endpoint::Endpoints;
pub use error::TransportError;
pub use multipart::{MultipartForm, Part};
pub use request::{HttpRequest, HttpResponse, RequestBody};
pub use scripted::ScriptedTransport;
pub use transport::{Transport, TransportRef, UreqTransport};
