//! Per-request cancellation and deadline

use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why an operation stopped before finishing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("request cancelled")]
    Cancelled,

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation signal plus optional deadline carried through every I/O call.
///
/// Clones share the same token, so cancelling one cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context that expires `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new().deadline_at(Instant::now() + timeout)
    }

    pub fn with_cancellation(cancel: CancellationToken) -> Self {
        Self {
            cancel,
            deadline: None,
        }
    }

    pub fn deadline_at(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Time left before the deadline, zero once it has passed
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Drive `fut` unless the request is cancelled or its deadline passes first.
    ///
    /// Cancellation is checked before the deadline, and both before `fut`.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        let deadline = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = deadline => Err(Interrupted::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }

    /// Drive optional work, keeping `reserve` of the deadline for what follows.
    ///
    /// Running out of time is not an error here: the work is dropped and
    /// `Ok(None)` is returned. Only cancellation interrupts.
    pub async fn run_reserving<F: Future>(
        &self,
        reserve: Duration,
        fut: F,
    ) -> Result<Option<F::Output>, Interrupted> {
        let window = async {
            match self.deadline {
                Some(at) => {
                    tokio::time::sleep_until(at.checked_sub(reserve).unwrap_or(at)).await
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            _ = window => Ok(None),
            output = fut => Ok(Some(output)),
        }
    }
}
