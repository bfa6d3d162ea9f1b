//! Asynchronous proxy for objects living on a dedicated worker thread.
//!
//! The worker side ([`prepare`]) hosts instances of a [`RemoteClass`] and
//! answers requests in arrival order. The controller side ([`initialize`])
//! issues requests tagged with increasing ids and matches responses by id, so
//! the order responses arrive in does not matter.

mod client;
mod error;
pub mod protocol;
pub mod transport;
mod worker;

pub use client::{initialize, RemoteConstructor, RemoteInstance, RpcClient};
pub use error::RpcError;
pub use protocol::{
    decode_request_json, decode_response_json, encode_request_json, encode_response_json,
    MessageKind, RemoteError, Request, RequestBody, Response, ResponseBody,
};
pub use transport::{channel, ControllerPort, WorkerPort};
pub use worker::{arg, prepare, to_value, Dispatcher, RemoteClass, WorkerHandle};
