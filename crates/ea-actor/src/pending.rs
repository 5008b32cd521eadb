//! `Pending<T>` — the future of one operation scheduled on a lane.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use ea_core::ContextId;
use tokio::sync::oneshot;

use crate::{ActorError, ActorResult};

/// The result of an operation that has already been enqueued on a lane.
///
/// Unlike a plain `async fn`, the work does not wait for the first poll: it
/// is in the lane's mailbox by the time the `Pending` exists.  Dropping it
/// does not cancel the operation; it only discards the result.
///
/// Awaiting suspends the awaiting task.  It never occupies the lane or a
/// worker while waiting.
#[must_use = "the operation runs regardless; await the result to observe failures"]
pub struct Pending<T> {
    state: State<T>,
}

enum State<T> {
    Waiting {
        context: ContextId,
        reply:   oneshot::Receiver<ActorResult<T>>,
    },
    Done(Option<ActorResult<T>>),
}

impl<T> Pending<T> {
    pub(crate) fn waiting(context: ContextId, reply: oneshot::Receiver<ActorResult<T>>) -> Self {
        Self { state: State::Waiting { context, reply } }
    }

    pub(crate) fn failed(error: ActorError) -> Self {
        Self { state: State::Done(Some(Err(error))) }
    }
}

// No field is structurally pinned: the receiver is `Unpin` for any `T`.
impl<T> Unpin for Pending<T> {}

impl<T> Future for Pending<T> {
    type Output = ActorResult<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.state {
            State::Waiting { context, reply } => match Pin::new(reply).poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
                Poll::Ready(Err(_)) => Poll::Ready(Err(ActorError::Canceled(*context))),
            },
            State::Done(outcome) => Poll::Ready(
                outcome.take().expect("`Pending` polled after completion"),
            ),
        }
    }
}

impl<T> std::fmt::Debug for Pending<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.state {
            State::Waiting { context, .. } => write!(f, "Pending(waiting on {context})"),
            State::Done(_) => f.write_str("Pending(done)"),
        }
    }
}
