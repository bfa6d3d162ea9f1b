use std::collections::{BTreeSet, HashMap};
use std::thread;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::RpcError;
use crate::protocol::{RemoteError, Request, RequestBody, Response, ResponseBody};
use crate::transport::WorkerPort;

/// A type that can be constructed and driven from another thread.
pub trait RemoteClass: Sized + 'static {
    const NAME: &'static str;
    /// Names callable through CALL. Everything else is a property.
    const METHODS: &'static [&'static str];

    fn construct(args: Vec<Value>) -> Result<Self, RemoteError>;
    fn get(&self, key: &str) -> Result<Value, RemoteError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), RemoteError>;
    fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError>;
}

/// Worker-side instance table and request dispatch.
pub struct Dispatcher<C> {
    instances: HashMap<u64, C>,
    next_instance_id: u64,
    method_names: BTreeSet<String>,
}

impl<C: RemoteClass> Default for Dispatcher<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: RemoteClass> Dispatcher<C> {
    pub fn new() -> Self {
        Self {
            instances: HashMap::new(),
            next_instance_id: 0,
            method_names: C::METHODS.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    pub fn handle(&mut self, request: Request) -> Response {
        let Request { request_id, body } = request;
        let kind = body.kind();
        let body = match self.dispatch(body) {
            Ok(body) => body,
            Err(err) => {
                tracing::debug!(
                    target: "worker_rpc::worker",
                    class = C::NAME,
                    request_id,
                    kind = ?kind,
                    error = %err,
                    "rpc.request.failed"
                );
                ResponseBody::Error(err)
            }
        };
        Response::to(request_id, body)
    }

    fn dispatch(&mut self, body: RequestBody) -> Result<ResponseBody, RemoteError> {
        match body {
            RequestBody::Ready => Ok(ResponseBody::Ready),
            RequestBody::New { args } => {
                let instance = C::construct(args)?;
                let instance_id = self.next_instance_id;
                self.next_instance_id += 1;
                self.instances.insert(instance_id, instance);
                Ok(ResponseBody::Created {
                    instance_id,
                    method_names: self.method_names.clone(),
                })
            }
            RequestBody::Get { instance_id, key } => {
                let value = self.instance(instance_id)?.get(&key)?;
                Ok(ResponseBody::Value(value))
            }
            RequestBody::Set {
                instance_id,
                key,
                value,
            } => {
                self.instance_mut(instance_id)?.set(&key, value.clone())?;
                Ok(ResponseBody::Value(value))
            }
            RequestBody::Call {
                instance_id,
                key,
                args,
            } => {
                if !self.method_names.contains(&key) {
                    return Err(RemoteError::UnknownMethod { key });
                }
                let value = self.instance_mut(instance_id)?.call(&key, args)?;
                Ok(ResponseBody::Value(value))
            }
        }
    }

    fn instance(&self, instance_id: u64) -> Result<&C, RemoteError> {
        self.instances
            .get(&instance_id)
            .ok_or(RemoteError::UnknownInstance { instance_id })
    }

    fn instance_mut(&mut self, instance_id: u64) -> Result<&mut C, RemoteError> {
        self.instances
            .get_mut(&instance_id)
            .ok_or(RemoteError::UnknownInstance { instance_id })
    }
}

pub struct WorkerHandle {
    thread: thread::JoinHandle<()>,
}

impl WorkerHandle {
    pub fn name(&self) -> Option<&str> {
        self.thread.thread().name()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the worker to exit. It exits once every controller handle
    /// has been dropped.
    pub fn join(self) -> thread::Result<()> {
        self.thread.join()
    }
}

/// Host `C` on a dedicated worker thread serving `port`.
///
/// The worker announces itself with an unsolicited READY, then answers
/// requests until the controller side disconnects.
pub fn prepare<C: RemoteClass>(port: WorkerPort) -> Result<WorkerHandle, RpcError> {
    let thread = thread::Builder::new()
        .name(format!("rpc-worker-{}", C::NAME))
        .spawn(move || run_worker::<C>(port))
        .map_err(RpcError::Spawn)?;
    Ok(WorkerHandle { thread })
}

fn run_worker<C: RemoteClass>(port: WorkerPort) {
    let mut dispatcher = Dispatcher::<C>::new();
    if !port.post(Response::ready_broadcast()) {
        return;
    }
    tracing::debug!(target: "worker_rpc::worker", class = C::NAME, "rpc.worker.ready");

    while let Some(request) = port.recv() {
        let response = dispatcher.handle(request);
        if !port.post(response) {
            break;
        }
    }
    tracing::debug!(
        target: "worker_rpc::worker",
        class = C::NAME,
        instances = dispatcher.instance_count(),
        "rpc.worker.stopped"
    );
}

/// Decode positional argument `index` for `key`.
pub fn arg<T: DeserializeOwned>(args: &[Value], index: usize, key: &str) -> Result<T, RemoteError> {
    let value = args.get(index).ok_or_else(|| RemoteError::InvalidArguments {
        key: key.to_string(),
        message: format!("missing argument {index}"),
    })?;
    serde_json::from_value(value.clone()).map_err(|err| RemoteError::InvalidArguments {
        key: key.to_string(),
        message: format!("argument {index}: {err}"),
    })
}

pub fn to_value<T: Serialize>(value: &T, key: &str) -> Result<Value, RemoteError> {
    serde_json::to_value(value).map_err(|err| RemoteError::Invocation {
        key: key.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Counter {
        count: i64,
    }

    impl RemoteClass for Counter {
        const NAME: &'static str = "Counter";
        const METHODS: &'static [&'static str] = &["increment"];

        fn construct(args: Vec<Value>) -> Result<Self, RemoteError> {
            let count = if args.is_empty() { 0 } else { arg(&args, 0, "new")? };
            Ok(Self { count })
        }

        fn get(&self, key: &str) -> Result<Value, RemoteError> {
            match key {
                "count" => Ok(json!(self.count)),
                _ => Err(RemoteError::UnknownKey { key: key.into() }),
            }
        }

        fn set(&mut self, key: &str, value: Value) -> Result<(), RemoteError> {
            match key {
                "count" => {
                    self.count = arg(&[value], 0, key)?;
                    Ok(())
                }
                _ => Err(RemoteError::UnknownKey { key: key.into() }),
            }
        }

        fn call(&mut self, method: &str, args: Vec<Value>) -> Result<Value, RemoteError> {
            match method {
                "increment" => {
                    let by: i64 = arg(&args, 0, method)?;
                    self.count += by;
                    Ok(json!(self.count))
                }
                _ => Err(RemoteError::UnknownMethod { key: method.into() }),
            }
        }
    }

    fn request(request_id: u64, body: RequestBody) -> Request {
        Request { request_id, body }
    }

    #[test]
    fn dispatches_by_kind_and_echoes_ids() {
        let mut dispatcher = Dispatcher::<Counter>::new();
        let created = dispatcher.handle(request(0, RequestBody::New { args: vec![json!(5)] }));
        assert_eq!(created.request_id, Some(0));
        assert!(matches!(
            created.body,
            ResponseBody::Created { instance_id: 0, ref method_names } if method_names.contains("increment")
        ));

        let called = dispatcher.handle(request(
            1,
            RequestBody::Call {
                instance_id: 0,
                key: "increment".into(),
                args: vec![json!(2)],
            },
        ));
        assert_eq!(called.body, ResponseBody::Value(json!(7)));

        let set = dispatcher.handle(request(
            2,
            RequestBody::Set {
                instance_id: 0,
                key: "count".into(),
                value: json!(11),
            },
        ));
        assert_eq!(set.body, ResponseBody::Value(json!(11)));

        let got = dispatcher.handle(request(
            3,
            RequestBody::Get {
                instance_id: 0,
                key: "count".into(),
            },
        ));
        assert_eq!(got.request_id, Some(3));
        assert_eq!(got.body, ResponseBody::Value(json!(11)));
    }

    #[test]
    fn failures_become_error_responses() {
        let mut dispatcher = Dispatcher::<Counter>::new();
        let missing = dispatcher.handle(request(
            0,
            RequestBody::Get {
                instance_id: 9,
                key: "count".into(),
            },
        ));
        assert_eq!(
            missing.body,
            ResponseBody::Error(RemoteError::UnknownInstance { instance_id: 9 })
        );

        dispatcher.handle(request(1, RequestBody::New { args: vec![] }));
        let property_call = dispatcher.handle(request(
            2,
            RequestBody::Call {
                instance_id: 0,
                key: "count".into(),
                args: vec![],
            },
        ));
        assert!(matches!(
            property_call.body,
            ResponseBody::Error(RemoteError::UnknownMethod { .. })
        ));

        let bad_args = dispatcher.handle(request(
            3,
            RequestBody::Call {
                instance_id: 0,
                key: "increment".into(),
                args: vec![json!("two")],
            },
        ));
        assert!(matches!(
            bad_args.body,
            ResponseBody::Error(RemoteError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn worker_announces_ready_then_exits_on_disconnect() {
        let (controller, worker) = crate::transport::channel();
        let handle = prepare::<Counter>(worker).unwrap();
        assert_eq!(handle.name(), Some("rpc-worker-Counter"));

        let (requests, mut responses) = controller.into_parts();
        let first = responses.blocking_recv().unwrap();
        assert_eq!(first, Response::ready_broadcast());

        drop(requests);
        handle.join().unwrap();
    }
}
