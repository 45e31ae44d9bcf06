//! Interrupt handling: the signal listener only flips a token, the scheduler does the rest.
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

#[derive(Debug, Clone, Default)]
pub struct CancellationHandler {
    token: CancellationToken,
}

impl CancellationHandler {
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Token to hand to the scheduler.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    /// Listen for Ctrl+C in the background and cancel the token on the first one.
    pub fn install(&self) -> JoinHandle<()> {
        let token = self.token.clone();
        tokio::spawn(async move {
            tokio::select! {
                res = tokio::signal::ctrl_c() => match res {
                    Ok(()) => {
                        warn!(target: "sweep.core.cancel", "interrupt received; cancelling batch");
                        token.cancel();
                    }
                    Err(e) => warn!(target: "sweep.core.cancel", error = %e, "cannot listen for interrupts"),
                },
                _ = token.cancelled() => {}
            }
        })
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cancel_reaches_handed_out_tokens() {
        let handler = CancellationHandler::new();
        let token = handler.token();
        let listener = handler.install();

        assert!(!token.is_cancelled());
        handler.cancel();
        assert!(token.is_cancelled());
        assert!(handler.is_cancelled());

        // The listener stops once the token is cancelled.
        listener.await.unwrap();
    }
}
