//! Messages exchanged between a controller and its worker.
//!
//! Values travel as `serde_json::Value`, copied across the channel. Every
//! request carries a `request_id` which the worker echoes; the only message
//! without one is the worker's unsolicited READY broadcast.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Ready = 1,
    New = 2,
    Get = 3,
    Set = 4,
    Call = 5,
}

impl MessageKind {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MessageKind::Ready),
            2 => Some(MessageKind::New),
            3 => Some(MessageKind::Get),
            4 => Some(MessageKind::Set),
            5 => Some(MessageKind::Call),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestBody {
    Ready,
    New {
        #[serde(default)]
        args: Vec<Value>,
    },
    Get {
        instance_id: u64,
        key: String,
    },
    Set {
        instance_id: u64,
        key: String,
        value: Value,
    },
    Call {
        instance_id: u64,
        key: String,
        #[serde(default)]
        args: Vec<Value>,
    },
}

impl RequestBody {
    pub fn kind(&self) -> MessageKind {
        match self {
            RequestBody::Ready => MessageKind::Ready,
            RequestBody::New { .. } => MessageKind::New,
            RequestBody::Get { .. } => MessageKind::Get,
            RequestBody::Set { .. } => MessageKind::Set,
            RequestBody::Call { .. } => MessageKind::Call,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub request_id: u64,
    #[serde(flatten)]
    pub body: RequestBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum ResponseBody {
    Ready,
    Created {
        instance_id: u64,
        method_names: BTreeSet<String>,
    },
    Value(Value),
    Error(RemoteError),
}

impl ResponseBody {
    pub fn kind_name(&self) -> &'static str {
        match self {
            ResponseBody::Ready => "ready",
            ResponseBody::Created { .. } => "created",
            ResponseBody::Value(_) => "value",
            ResponseBody::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// `None` only for the worker's unsolicited READY broadcast.
    #[serde(default)]
    pub request_id: Option<u64>,
    #[serde(flatten)]
    pub body: ResponseBody,
}

impl Response {
    pub fn to(request_id: u64, body: ResponseBody) -> Self {
        Self {
            request_id: Some(request_id),
            body,
        }
    }

    pub fn ready_broadcast() -> Self {
        Self {
            request_id: None,
            body: ResponseBody::Ready,
        }
    }
}

/// Failure reported by the worker instead of a value.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteError {
    #[error("unknown instance {instance_id}")]
    UnknownInstance { instance_id: u64 },
    #[error("unknown property `{key}`")]
    UnknownKey { key: String },
    #[error("unknown method `{key}`")]
    UnknownMethod { key: String },
    #[error("invalid arguments for `{key}`: {message}")]
    InvalidArguments { key: String, message: String },
    #[error("`{key}` failed: {message}")]
    Invocation { key: String, message: String },
}

pub fn encode_request_json(request: &Request) -> serde_json::Result<String> {
    serde_json::to_string(request)
}

pub fn decode_request_json(json: &str) -> serde_json::Result<Request> {
    serde_json::from_str(json)
}

pub fn encode_response_json(response: &Response) -> serde_json::Result<String> {
    serde_json::to_string(response)
}

pub fn decode_response_json(json: &str) -> serde_json::Result<Response> {
    serde_json::from_str(json)
}
