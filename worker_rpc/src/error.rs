use std::io;

use thiserror::Error;

use crate::protocol::RemoteError;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("no tokio runtime available to route worker responses")]
    NoRuntime,
    #[error("worker channel disconnected")]
    Disconnected,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),
    #[error("`{method}` is not a method of the remote instance")]
    UnknownMethod { method: String },
    #[error("`{key}` is a remote method and cannot be read as a property")]
    KeyIsMethod { key: String },
    #[error("unexpected {kind} response from worker")]
    UnexpectedResponse { kind: &'static str },
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("failed to decode remote value: {0}")]
    Decode(#[from] serde_json::Error),
}
