//! Bounded payment-status polling.
//!
//! After checkout the provider redirects back with a session id whose
//! outcome may not have settled yet. The poller drives a bounded retry loop
//! against the payment-status endpoint: at most [`MAX_ATTEMPTS`] calls,
//! [`POLL_INTERVAL`] apart, ending in a terminal [`PollState`].
//!
//! The loop is a structured task with an explicit [`CancelToken`] rather
//! than a fire-and-forget timer chain; dropping out of the workflow (the
//! hosting view going away) cancels the token and no further calls are
//! made. State transitions are observable through [`PaymentPoller::subscribe`].

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::error::ClientError;
use crate::types::PaymentStatusResponse;

/// Maximum number of status calls before giving up.
pub const MAX_ATTEMPTS: u32 = 5;

/// Delay between status calls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Error message when the return URL carries no session token.
pub const MISSING_SESSION_MESSAGE: &str = "No payment session found";

/// Error message when the checkout session expired unpaid.
pub const EXPIRED_MESSAGE: &str = "Payment session expired. Please try again.";

/// Error message when the retry budget is exhausted.
pub const TIMEOUT_MESSAGE: &str =
    "Payment verification timeout. Please check your account or contact support.";

/// Error message for transport or server failures.
pub const VERIFY_FAILED_MESSAGE: &str =
    "Error verifying payment. Please contact support if the issue persists.";

/// A source of payment-status answers.
///
/// The seam between the poller and the HTTP layer; `NiwiClient` implements
/// it over the real endpoint, tests script it.
#[async_trait]
pub trait PaymentStatusSource: Send + Sync {
    /// Fetch the current status of a checkout session.
    async fn payment_status(
        &self,
        session_id: &str,
    ) -> Result<PaymentStatusResponse, ClientError>;
}

#[async_trait]
impl<S: PaymentStatusSource + ?Sized> PaymentStatusSource for std::sync::Arc<S> {
    async fn payment_status(
        &self,
        session_id: &str,
    ) -> Result<PaymentStatusResponse, ClientError> {
        (**self).payment_status(session_id).await
    }
}

/// State of one payment confirmation workflow.
///
/// `Checking` is the initial state; it moves to `Processing` while the
/// provider still reports the payment in flight, or jumps straight to a
/// terminal state. Terminal states admit no further network calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// First status call is in flight.
    Checking,
    /// Payment still in flight; another attempt is scheduled.
    Processing {
        /// Status calls completed so far.
        attempt: u32,
    },
    /// Payment settled and credits were granted.
    Success {
        /// Credits granted by this session.
        credits_added: i64,
        /// Balance after the grant.
        new_balance: i64,
    },
    /// The workflow failed; the message is user-facing.
    Error {
        /// User-facing error message.
        message: String,
    },
    /// The workflow was cancelled before reaching an outcome.
    Cancelled,
}

impl PollState {
    /// Terminal states admit no further transitions or network calls.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Success { .. } | Self::Error { .. } | Self::Cancelled
        )
    }
}

/// Explicit cancellation token for a poll workflow.
///
/// Cancelling mid-sleep or between attempts abandons the loop with
/// [`PollState::Cancelled`]; no further status calls are made.
#[derive(Debug)]
pub struct CancelToken {
    tx: watch::Sender<bool>,
}

impl CancelToken {
    /// Create a fresh, uncancelled token.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Cancel the workflow. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send_replace(true);
    }

    /// Whether the token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Drives the bounded payment-status retry loop.
pub struct PaymentPoller<S> {
    source: S,
    max_attempts: u32,
    poll_interval: Duration,
    state: watch::Sender<PollState>,
}

impl<S: PaymentStatusSource> PaymentPoller<S> {
    /// Create a poller with the default schedule (5 attempts, 2 s apart).
    pub fn new(source: S) -> Self {
        Self::with_schedule(source, MAX_ATTEMPTS, POLL_INTERVAL)
    }

    /// Create a poller with a custom schedule.
    pub fn with_schedule(source: S, max_attempts: u32, poll_interval: Duration) -> Self {
        let (state, _rx) = watch::channel(PollState::Checking);
        Self {
            source,
            max_attempts,
            poll_interval,
            state,
        }
    }

    /// Observe state transitions as the workflow runs.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Run the workflow to a terminal state.
    ///
    /// An absent or empty session id short-circuits to the error state with
    /// zero network calls. Otherwise the loop issues one status call per
    /// attempt:
    ///
    /// - `"paid"` ends in [`PollState::Success`] with the captured totals;
    /// - `"expired"` ends in [`PollState::Error`] immediately;
    /// - any other status (including `"pending"`) schedules another attempt
    ///   after the poll interval — unknown strings are logged;
    /// - a transport or server failure ends in [`PollState::Error`];
    /// - exhausting the attempt budget ends in the timeout error. A sixth
    ///   call is never issued.
    pub async fn run(&self, session_id: Option<&str>, cancel: &CancelToken) -> PollState {
        let Some(session_id) = session_id.filter(|s| !s.is_empty()) else {
            return self.finish(PollState::Error {
                message: MISSING_SESSION_MESSAGE.into(),
            });
        };

        let mut cancelled = cancel.subscribe();

        for attempt in 0..self.max_attempts {
            if *cancelled.borrow() {
                return self.finish(PollState::Cancelled);
            }

            let response = match self.source.payment_status(session_id).await {
                Ok(response) => response,
                Err(error) => {
                    tracing::warn!(%error, session_id, "payment status check failed");
                    return self.finish(PollState::Error {
                        message: VERIFY_FAILED_MESSAGE.into(),
                    });
                }
            };

            match response.payment_status.as_str() {
                "paid" => {
                    return self.finish(PollState::Success {
                        credits_added: response.credits_added.unwrap_or(0),
                        new_balance: response.new_balance.unwrap_or(0),
                    });
                }
                "expired" => {
                    return self.finish(PollState::Error {
                        message: EXPIRED_MESSAGE.into(),
                    });
                }
                "pending" => {}
                other => {
                    tracing::warn!(
                        status = other,
                        session_id,
                        "unrecognized payment status, treating as pending"
                    );
                }
            }

            if attempt + 1 == self.max_attempts {
                break;
            }

            self.transition(PollState::Processing {
                attempt: attempt + 1,
            });

            tokio::select! {
                () = tokio::time::sleep(self.poll_interval) => {}
                _ = cancelled.changed() => {
                    if *cancelled.borrow() {
                        return self.finish(PollState::Cancelled);
                    }
                }
            }
        }

        self.finish(PollState::Error {
            message: TIMEOUT_MESSAGE.into(),
        })
    }

    fn transition(&self, state: PollState) {
        let _ = self.state.send_replace(state);
    }

    fn finish(&self, state: PollState) -> PollState {
        self.transition(state.clone());
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(!PollState::Checking.is_terminal());
        assert!(!PollState::Processing { attempt: 2 }.is_terminal());
        assert!(PollState::Success {
            credits_added: 1,
            new_balance: 1
        }
        .is_terminal());
        assert!(PollState::Error {
            message: "x".into()
        }
        .is_terminal());
        assert!(PollState::Cancelled.is_terminal());
    }

    #[test]
    fn cancel_token_is_idempotent() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }
}
