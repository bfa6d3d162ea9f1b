use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::{mpsc::UnboundedReceiver, oneshot};

use crate::error::RpcError;
use crate::protocol::{Request, RequestBody, Response, ResponseBody};
use crate::transport::ControllerPort;

/// Promise-resolution probe key. Answered locally and never forwarded.
const THEN_KEY: &str = "then";

struct Shared {
    pending: Mutex<HashMap<u64, oneshot::Sender<ResponseBody>>>,
    ready: AtomicBool,
}

/// Controller-side request correlation over one worker channel.
#[derive(Clone)]
pub struct RpcClient {
    requests: Sender<Request>,
    next_request_id: Arc<AtomicU64>,
    shared: Arc<Shared>,
}

impl RpcClient {
    /// Take over `port` and start routing its responses. Must be called from
    /// within a tokio runtime.
    pub fn connect(port: ControllerPort) -> Result<Self, RpcError> {
        let runtime = Handle::try_current().map_err(|_| RpcError::NoRuntime)?;
        let (requests, responses) = port.into_parts();
        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            ready: AtomicBool::new(false),
        });
        runtime.spawn(route_responses(responses, Arc::clone(&shared)));
        Ok(Self {
            requests,
            next_request_id: Arc::new(AtomicU64::new(0)),
            shared,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.shared.ready.load(Ordering::Acquire)
    }

    pub fn pending_count(&self) -> usize {
        self.shared.pending.lock().len()
    }

    /// Send `body` and wait for the response carrying the same id.
    ///
    /// Dropping the returned future abandons the result; the pending entry
    /// is cleared whenever the response eventually arrives.
    pub async fn request(&self, body: RequestBody) -> Result<ResponseBody, RpcError> {
        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let kind = body.kind();
        let (tx, rx) = oneshot::channel();
        self.shared.pending.lock().insert(request_id, tx);

        if self.requests.send(Request { request_id, body }).is_err() {
            self.shared.pending.lock().remove(&request_id);
            return Err(RpcError::Disconnected);
        }
        tracing::trace!(
            target: "worker_rpc::client",
            request_id,
            kind = ?kind,
            "rpc.request.sent"
        );

        match rx.await.map_err(|_| RpcError::Disconnected)? {
            ResponseBody::Error(err) => Err(RpcError::Remote(err)),
            body => Ok(body),
        }
    }

    /// Resolve once the worker is known to be accepting requests.
    ///
    /// Workers announce themselves on startup; if that announcement has not
    /// been seen yet a single READY request is sent and awaited instead.
    pub async fn wait_ready(&self) -> Result<(), RpcError> {
        if self.is_ready() {
            return Ok(());
        }
        match self.request(RequestBody::Ready).await? {
            ResponseBody::Ready => {
                self.shared.ready.store(true, Ordering::Release);
                Ok(())
            }
            other => Err(RpcError::UnexpectedResponse {
                kind: other.kind_name(),
            }),
        }
    }
}

async fn route_responses(mut responses: UnboundedReceiver<Response>, shared: Arc<Shared>) {
    while let Some(response) = responses.recv().await {
        let Some(request_id) = response.request_id else {
            if response.body == ResponseBody::Ready {
                shared.ready.store(true, Ordering::Release);
                tracing::debug!(target: "worker_rpc::client", "rpc.worker.ready");
            } else {
                tracing::warn!(
                    target: "worker_rpc::client",
                    kind = response.body.kind_name(),
                    "rpc.response.uncorrelated"
                );
            }
            continue;
        };

        let waiter = shared.pending.lock().remove(&request_id);
        match waiter {
            Some(waiter) => {
                // The caller may have stopped waiting; nothing to do then.
                let _ = waiter.send(response.body);
            }
            None => {
                tracing::debug!(
                    target: "worker_rpc::client",
                    request_id,
                    "rpc.response.orphaned"
                );
            }
        }
    }

    // Worker gone: fail everything still waiting.
    let abandoned = std::mem::take(&mut *shared.pending.lock());
    if !abandoned.is_empty() {
        tracing::warn!(
            target: "worker_rpc::client",
            pending = abandoned.len(),
            "rpc.worker.disconnected"
        );
    }
}

/// Builds remote instances on a prepared worker.
#[derive(Clone)]
pub struct RemoteConstructor {
    client: RpcClient,
}

/// Controller side of a worker channel.
pub fn initialize(port: ControllerPort) -> Result<RemoteConstructor, RpcError> {
    Ok(RemoteConstructor {
        client: RpcClient::connect(port)?,
    })
}

impl RemoteConstructor {
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    pub async fn construct(&self, args: Vec<Value>) -> Result<RemoteInstance, RpcError> {
        self.client.wait_ready().await?;
        match self.client.request(RequestBody::New { args }).await? {
            ResponseBody::Created {
                instance_id,
                method_names,
            } => {
                tracing::debug!(
                    target: "worker_rpc::client",
                    instance_id,
                    methods = method_names.len(),
                    "rpc.instance.created"
                );
                Ok(RemoteInstance {
                    client: self.client.clone(),
                    instance_id,
                    method_names: Arc::new(method_names),
                })
            }
            other => Err(RpcError::UnexpectedResponse {
                kind: other.kind_name(),
            }),
        }
    }

    /// Construct and wrap in a typed stub.
    pub async fn construct_as<S: From<RemoteInstance>>(
        &self,
        args: Vec<Value>,
    ) -> Result<S, RpcError> {
        self.construct(args).await.map(S::from)
    }
}

/// Handle to an object living on the worker.
#[derive(Clone)]
pub struct RemoteInstance {
    client: RpcClient,
    instance_id: u64,
    method_names: Arc<BTreeSet<String>>,
}

impl std::fmt::Debug for RemoteInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteInstance")
            .field("instance_id", &self.instance_id)
            .field("method_names", &self.method_names)
            .finish()
    }
}

impl RemoteInstance {
    pub fn instance_id(&self) -> u64 {
        self.instance_id
    }

    pub fn method_names(&self) -> &BTreeSet<String> {
        &self.method_names
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method_names.contains(name)
    }

    /// Keys answered on the controller without messaging the worker.
    pub fn is_local_key(key: &str) -> bool {
        key == THEN_KEY
    }

    /// Read a property. [`is_local_key`](Self::is_local_key) keys resolve to
    /// `Null` immediately and never reach the worker.
    pub async fn get(&self, key: &str) -> Result<Value, RpcError> {
        if Self::is_local_key(key) {
            return Ok(Value::Null);
        }
        if self.has_method(key) {
            return Err(RpcError::KeyIsMethod {
                key: key.to_string(),
            });
        }
        let body = RequestBody::Get {
            instance_id: self.instance_id,
            key: key.to_string(),
        };
        expect_value(self.client.request(body).await?)
    }

    /// Resolves with the value as the worker stored it.
    pub async fn set(&self, key: &str, value: Value) -> Result<Value, RpcError> {
        let body = RequestBody::Set {
            instance_id: self.instance_id,
            key: key.to_string(),
            value,
        };
        expect_value(self.client.request(body).await?)
    }

    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, RpcError> {
        if !self.has_method(method) {
            return Err(RpcError::UnknownMethod {
                method: method.to_string(),
            });
        }
        let body = RequestBody::Call {
            instance_id: self.instance_id,
            key: method.to_string(),
            args,
        };
        expect_value(self.client.request(body).await?)
    }

    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<T, RpcError> {
        Ok(serde_json::from_value(self.get(key).await?)?)
    }

    pub async fn set_from<T: Serialize>(&self, key: &str, value: &T) -> Result<(), RpcError> {
        self.set(key, serde_json::to_value(value)?).await?;
        Ok(())
    }

    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Vec<Value>,
    ) -> Result<T, RpcError> {
        Ok(serde_json::from_value(self.call(method, args).await?)?)
    }
}

fn expect_value(body: ResponseBody) -> Result<Value, RpcError> {
    match body {
        ResponseBody::Value(value) => Ok(value),
        other => Err(RpcError::UnexpectedResponse {
            kind: other.kind_name(),
        }),
    }
}
