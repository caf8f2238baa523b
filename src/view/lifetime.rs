use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

/// Cancellation handle tied to one view session.
///
/// Clones share the same flag. Once `end` is called, work started through
/// [`ViewLifetime::run`] is aborted and its result discarded.
#[derive(Debug, Clone)]
pub struct ViewLifetime {
    ended: Arc<watch::Sender<bool>>,
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewLifetime {
    pub fn new() -> Self {
        let (ended, _) = watch::channel(false);
        Self {
            ended: Arc::new(ended),
        }
    }

    pub fn end(&self) {
        self.ended.send_replace(true);
    }

    pub fn is_active(&self) -> bool {
        !*self.ended.borrow()
    }

    /// Resolves once the view has ended
    pub async fn ended(&self) {
        let mut rx = self.ended.subscribe();
        // the sender lives in self, so this only returns once the flag is set
        let _ = rx.wait_for(|ended| *ended).await;
    }

    /// Run `work` as its own task. Returns `None` if the view ended first.
    pub async fn run<F>(&self, work: F) -> Option<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        if !self.is_active() {
            return None;
        }

        let task = tokio::spawn(work);
        let abort = task.abort_handle();

        tokio::select! {
            biased;
            _ = self.ended() => {
                abort.abort();
                None
            }
            joined = task => match joined {
                Ok(output) => Some(output),
                Err(err) if err.is_panic() => std::panic::resume_unwind(err.into_panic()),
                Err(_) => None,
            },
        }
    }
}
