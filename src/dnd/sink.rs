use crate::domain::MutationRequest;
use std::{cell::RefCell, rc::Rc};
use tokio::sync::mpsc;

/// Receiver side of drop mutations.
///
/// Submission is fire-and-forget: the controller never waits for an answer
/// and never rolls back. Corrections arrive as a fresh render of the board.
pub trait MutationSink {
    fn submit(&mut self, request: MutationRequest);
}

/// Keeps every submitted request in a shared log
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    requests: Rc<RefCell<Vec<MutationRequest>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the requests submitted so far
    pub fn requests(&self) -> Vec<MutationRequest> {
        self.requests.borrow().clone()
    }

    pub fn take(&self) -> Vec<MutationRequest> {
        std::mem::take(&mut *self.requests.borrow_mut())
    }
}

impl MutationSink for RecordingSink {
    fn submit(&mut self, request: MutationRequest) {
        self.requests.borrow_mut().push(request);
    }
}

/// Forwards requests to an async state owner over an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<MutationRequest>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<MutationRequest>) -> Self {
        Self { tx }
    }

    /// Creates a sink together with the receiver the state owner drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<MutationRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl MutationSink for ChannelSink {
    fn submit(&mut self, request: MutationRequest) {
        if let Err(err) = self.tx.send(request) {
            tracing::warn!(ticket_id = %err.0.ticket_id, "state owner gone, dropping mutation request");
        }
    }
}
