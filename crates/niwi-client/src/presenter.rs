//! Render a poll state as one of the four read-only result views.

use crate::poller::PollState;

/// One of the four mutually exclusive payment result views.
///
/// Pure data; the hosting UI decides how to draw it. `Success` carries the
/// totals captured by the poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentView {
    /// The first status check is in flight.
    Checking {
        /// View heading.
        title: &'static str,
        /// View body copy.
        body: &'static str,
    },
    /// The payment is still being processed.
    Processing {
        /// View heading.
        title: &'static str,
        /// View body copy.
        body: &'static str,
    },
    /// The purchase completed.
    Success {
        /// View heading.
        title: &'static str,
        /// View body copy.
        body: &'static str,
        /// Credits granted by this session.
        credits_added: i64,
        /// Balance after the grant.
        new_balance: i64,
    },
    /// The workflow failed.
    Error {
        /// View heading.
        title: &'static str,
        /// User-facing error message.
        message: String,
    },
}

/// Map a poll state to its view.
///
/// Pure function of the state: no side effects, and repeated invocation on
/// the same state yields an identical view. A cancelled workflow renders
/// nothing (the hosting view is already gone).
#[must_use]
pub fn present(state: &PollState) -> Option<PaymentView> {
    match state {
        PollState::Checking => Some(PaymentView::Checking {
            title: "Verifying Payment",
            body: "Please wait while we confirm your payment...",
        }),
        PollState::Processing { .. } => Some(PaymentView::Processing {
            title: "Processing Payment",
            body: "Your payment is being processed. This may take a moment...",
        }),
        PollState::Success {
            credits_added,
            new_balance,
        } => Some(PaymentView::Success {
            title: "Payment Successful!",
            body: "Your credit purchase has been completed successfully.",
            credits_added: *credits_added,
            new_balance: *new_balance,
        }),
        PollState::Error { message } => Some(PaymentView::Error {
            title: "Payment Issue",
            message: message.clone(),
        }),
        PollState::Cancelled => None,
    }
}
