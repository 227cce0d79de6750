//! Niwi Client SDK.
//!
//! This crate provides a client library for the Niwi API plus the payment
//! confirmation workflow that runs after a hosted checkout redirects back
//! to the app:
//!
//! 1. **Checkout redirect** — [`checkout::checkout_redirect`] gives the
//!    hosted payment page for a package tier.
//! 2. **Session extraction** — [`checkout::session_from_return_url`] reads
//!    the `session_id` query parameter from the return URL.
//! 3. **Status polling** — [`PaymentPoller`] drives a bounded retry loop
//!    (5 attempts, 2 s apart) against the payment-status endpoint, with an
//!    explicit [`CancelToken`].
//! 4. **Result presentation** — [`present`] maps the terminal state to one
//!    of four read-only views.
//!
//! # Example
//!
//! ```no_run
//! use niwi_client::{CancelToken, NiwiClient, PaymentView};
//!
//! # async fn example() {
//! let client = NiwiClient::with_token("https://api.niwi.ca", "user-jwt");
//!
//! let cancel = CancelToken::new();
//! let return_url = "https://app.niwi.ca/credits/success?session_id=cs_123";
//! let (_state, view) = client.confirm_purchase(return_url, &cancel).await;
//!
//! if let Some(PaymentView::Success { credits_added, new_balance, .. }) = view {
//!     println!("+{credits_added} credits, balance {new_balance}");
//! }
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod checkout;
mod client;
mod error;
pub mod poller;
pub mod presenter;
mod types;

pub use checkout::session_from_return_url;
pub use client::{ClientOptions, NiwiClient};
pub use error::ClientError;
pub use poller::{
    CancelToken, PaymentPoller, PaymentStatusSource, PollState, MAX_ATTEMPTS, POLL_INTERVAL,
};
pub use presenter::{present, PaymentView};
pub use types::*;
