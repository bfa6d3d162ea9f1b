//! In-process channel pair standing in for a worker's message port.
//!
//! Requests flow to the worker over a crossbeam channel so the worker thread
//! can block on them; responses flow back over a tokio channel so the
//! controller can await them.

use crossbeam_channel::{unbounded, Receiver, Sender};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::protocol::{Request, Response};

/// Controller end: sends requests, receives responses.
pub struct ControllerPort {
    pub(crate) requests: Sender<Request>,
    pub(crate) responses: UnboundedReceiver<Response>,
}

/// Worker end: receives requests, posts responses.
pub struct WorkerPort {
    requests: Receiver<Request>,
    responses: UnboundedSender<Response>,
}

pub fn channel() -> (ControllerPort, WorkerPort) {
    let (request_tx, request_rx) = unbounded();
    let (response_tx, response_rx) = unbounded_channel();
    (
        ControllerPort {
            requests: request_tx,
            responses: response_rx,
        },
        WorkerPort {
            requests: request_rx,
            responses: response_tx,
        },
    )
}

impl ControllerPort {
    pub fn into_parts(self) -> (Sender<Request>, UnboundedReceiver<Response>) {
        (self.requests, self.responses)
    }
}

impl WorkerPort {
    /// Block until the next request; `None` once every controller is gone.
    pub fn recv(&self) -> Option<Request> {
        self.requests.recv().ok()
    }

    pub fn try_recv(&self) -> Option<Request> {
        self.requests.try_recv().ok()
    }

    /// Returns `false` if the controller has gone away.
    pub fn post(&self, response: Response) -> bool {
        self.responses.send(response).is_ok()
    }
}
