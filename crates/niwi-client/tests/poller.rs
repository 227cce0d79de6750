//! Payment confirmation poller tests.
//!
//! All timing runs under `tokio::time::pause` so the scheduled delays are
//! asserted in virtual time.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use niwi_client::poller::{
    CancelToken, PaymentPoller, PaymentStatusSource, PollState, EXPIRED_MESSAGE,
    MISSING_SESSION_MESSAGE, TIMEOUT_MESSAGE, VERIFY_FAILED_MESSAGE,
};
use niwi_client::{ClientError, PaymentStatusResponse};

/// One scripted answer from the status endpoint.
#[derive(Debug, Clone)]
enum Step {
    Status(&'static str),
    Paid { credits_added: i64, new_balance: i64 },
    Fail,
}

/// Replays a fixed script; the last step repeats forever.
struct ScriptedSource {
    script: Vec<Step>,
    calls: AtomicU32,
}

impl ScriptedSource {
    fn new(script: Vec<Step>) -> Arc<Self> {
        assert!(!script.is_empty(), "script must have at least one step");
        Arc::new(Self {
            script,
            calls: AtomicU32::new(0),
        })
    }

    fn pending_forever() -> Arc<Self> {
        Self::new(vec![Step::Status("pending")])
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentStatusSource for ScriptedSource {
    async fn payment_status(
        &self,
        _session_id: &str,
    ) -> Result<PaymentStatusResponse, ClientError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst) as usize;
        let step = self.script.get(index).unwrap_or_else(|| {
            self.script.last().expect("script is non-empty")
        });

        match step {
            Step::Status(status) => Ok(PaymentStatusResponse {
                payment_status: (*status).to_string(),
                credits_added: None,
                new_balance: None,
            }),
            Step::Paid {
                credits_added,
                new_balance,
            } => Ok(PaymentStatusResponse {
                payment_status: "paid".to_string(),
                credits_added: Some(*credits_added),
                new_balance: Some(*new_balance),
            }),
            Step::Fail => Err(ClientError::Api {
                code: "internal_error".to_string(),
                message: "boom".to_string(),
                status: 500,
            }),
        }
    }
}

fn error_message(state: &PollState) -> &str {
    match state {
        PollState::Error { message } => message,
        other => panic!("expected error state, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn missing_session_is_an_error_with_zero_calls() {
    let source = ScriptedSource::pending_forever();
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(None, &cancel).await;

    assert_eq!(error_message(&state), MISSING_SESSION_MESSAGE);
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn empty_session_is_an_error_with_zero_calls() {
    let source = ScriptedSource::pending_forever();
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some(""), &cancel).await;

    assert_eq!(error_message(&state), MISSING_SESSION_MESSAGE);
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn paid_on_first_call_succeeds_after_one_call() {
    let source = ScriptedSource::new(vec![Step::Paid {
        credits_added: 25,
        new_balance: 30,
    }]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_1"), &cancel).await;

    assert_eq!(
        state,
        PollState::Success {
            credits_added: 25,
            new_balance: 30
        }
    );
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn pending_four_times_then_paid_takes_five_calls_and_eight_seconds() {
    let source = ScriptedSource::new(vec![
        Step::Status("pending"),
        Step::Status("pending"),
        Step::Status("pending"),
        Step::Status("pending"),
        Step::Paid {
            credits_added: 100,
            new_balance: 100,
        },
    ]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let start = tokio::time::Instant::now();
    let state = poller.run(Some("cs_test_2"), &cancel).await;

    assert_eq!(
        state,
        PollState::Success {
            credits_added: 100,
            new_balance: 100
        }
    );
    assert_eq!(source.calls(), 5);
    // Four scheduled delays of 2 s each.
    assert!(start.elapsed() >= Duration::from_secs(8));
}

#[tokio::test(start_paused = true)]
async fn pending_forever_times_out_after_exactly_five_calls() {
    let source = ScriptedSource::pending_forever();
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_3"), &cancel).await;

    assert_eq!(error_message(&state), TIMEOUT_MESSAGE);
    assert_eq!(source.calls(), 5);

    // The loop has returned; advancing time further must not produce a
    // sixth call.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 5);
}

#[tokio::test(start_paused = true)]
async fn expired_stops_polling_immediately() {
    let source = ScriptedSource::new(vec![
        Step::Status("pending"),
        Step::Status("expired"),
        Step::Paid {
            credits_added: 25,
            new_balance: 25,
        },
    ]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_4"), &cancel).await;

    assert_eq!(error_message(&state), EXPIRED_MESSAGE);
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn expired_on_first_call_is_terminal() {
    let source = ScriptedSource::new(vec![Step::Status("expired")]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_5"), &cancel).await;

    assert_eq!(error_message(&state), EXPIRED_MESSAGE);
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_terminal() {
    let source = ScriptedSource::new(vec![Step::Status("pending"), Step::Fail]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_6"), &cancel).await;

    assert_eq!(error_message(&state), VERIFY_FAILED_MESSAGE);
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn unknown_status_retries_like_pending() {
    let source = ScriptedSource::new(vec![
        Step::Status("on_hold"),
        Step::Paid {
            credits_added: 3,
            new_balance: 3,
        },
    ]);
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();

    let state = poller.run(Some("cs_test_7"), &cancel).await;

    assert_eq!(
        state,
        PollState::Success {
            credits_added: 3,
            new_balance: 3
        }
    );
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancellation_mid_sleep_abandons_the_loop() {
    let source = ScriptedSource::pending_forever();
    let poller = Arc::new(PaymentPoller::new(source.clone()));
    let cancel = Arc::new(CancelToken::new());

    let task = {
        let poller = poller.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.run(Some("cs_test_8"), &cancel).await })
    };

    // Let the first call land and the poller enter its 2 s sleep.
    tokio::time::sleep(Duration::from_millis(100)).await;
    cancel.cancel();

    let state = task.await.expect("poll task panicked");
    assert_eq!(state, PollState::Cancelled);
    assert_eq!(source.calls(), 1);

    // No retries fire after cancellation.
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(source.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_before_start_makes_no_calls() {
    let source = ScriptedSource::pending_forever();
    let poller = PaymentPoller::new(source.clone());
    let cancel = CancelToken::new();
    cancel.cancel();

    let state = poller.run(Some("cs_test_9"), &cancel).await;

    assert_eq!(state, PollState::Cancelled);
    assert_eq!(source.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn state_transitions_are_observable() {
    let source = ScriptedSource::new(vec![
        Step::Status("pending"),
        Step::Status("pending"),
        Step::Paid {
            credits_added: 20,
            new_balance: 22,
        },
    ]);
    let poller = Arc::new(PaymentPoller::new(source.clone()));
    let cancel = Arc::new(CancelToken::new());

    let mut updates = poller.subscribe();
    assert_eq!(*updates.borrow(), PollState::Checking);

    let collector = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let state = updates.borrow().clone();
            let terminal = state.is_terminal();
            seen.push(state);
            if terminal {
                break;
            }
        }
        seen
    });

    let state = {
        let poller = poller.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { poller.run(Some("cs_test_10"), &cancel).await })
            .await
            .expect("poll task panicked")
    };

    let seen = collector.await.expect("collector panicked");

    assert!(state.is_terminal());
    assert!(seen
        .iter()
        .any(|s| matches!(s, PollState::Processing { .. })));
    assert_eq!(
        seen.last(),
        Some(&PollState::Success {
            credits_added: 20,
            new_balance: 22
        })
    );
}
