use super::ModalId;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// How a dialog closed: the pressed button, if any, and the prompt text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Resolution {
    pub button: Option<usize>,
    pub input: Option<String>,
}

/// **DEFERRED DIALOG RESULT**
///
/// Resolves once with the user's answer. If the dialog goes away without an
/// answer (manager dropped, `close_all`), it resolves to `T::default()`,
/// which is the negative outcome for every dialog kind: `false`, `()`,
/// `None`.
#[derive(Debug)]
pub struct Deferred<T> {
    id: ModalId,
    receiver: oneshot::Receiver<Resolution>,
    answer: fn(Resolution) -> T,
}

impl<T> Deferred<T> {
    pub(crate) fn new(
        id: ModalId,
        receiver: oneshot::Receiver<Resolution>,
        answer: fn(Resolution) -> T,
    ) -> Self {
        Self {
            id,
            receiver,
            answer,
        }
    }

    pub fn id(&self) -> ModalId {
        self.id
    }
}

impl<T: Default> Future for Deferred<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.receiver).poll(cx) {
            Poll::Ready(Ok(resolution)) => Poll::Ready((this.answer)(resolution)),
            Poll::Ready(Err(_)) => {
                log::debug!("Modal {} closed without an answer", this.id);
                Poll::Ready(T::default())
            }
            Poll::Pending => Poll::Pending,
        }
    }
}
