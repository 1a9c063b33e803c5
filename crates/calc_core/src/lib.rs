use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use shared::{domain::Operator, error::EvaluationError};
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

mod remote;
pub mod state;

pub use remote::RemoteEvaluator;
pub use state::{CalcState, EvalCall, KeyEvent, PendingOp, ERROR_DISPLAY};

/// The external arithmetic capability. The controller creates at most one
/// outstanding `evaluate` per equals or chained-operator press, imposes no
/// timeout of its own, and treats every failure cause uniformly.
#[async_trait]
pub trait Evaluator: Send + Sync {
    async fn evaluate(&self, op: Operator, left: f64, right: f64)
        -> Result<f64, EvaluationError>;
}

/// Null capability used when no service is wired up; every commit lands on
/// the error screen.
pub struct MissingEvaluator;

#[async_trait]
impl Evaluator for MissingEvaluator {
    async fn evaluate(
        &self,
        op: Operator,
        _left: f64,
        _right: f64,
    ) -> Result<f64, EvaluationError> {
        Err(EvaluationError::new(format!(
            "evaluation service unavailable for '{}'",
            op.symbol()
        )))
    }
}

/// Read-only projection consumed by the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySnapshot {
    pub display_text: String,
    pub busy: bool,
}

impl DisplaySnapshot {
    fn of(state: &CalcState) -> Self {
        Self {
            display_text: state.display.clone(),
            busy: state.busy,
        }
    }
}

/// Immediate-execution keypad calculator. Keystrokes mutate the display
/// buffer directly; equals and chained operators suspend on the evaluation
/// service and resolve once the state has settled. The state mutex is never
/// held across that suspension.
pub struct Calculator {
    evaluator: Arc<dyn Evaluator>,
    inner: Mutex<CalcState>,
    updates: watch::Sender<DisplaySnapshot>,
}

impl Calculator {
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Arc<Self> {
        let (updates, _) = watch::channel(DisplaySnapshot::of(&CalcState::default()));
        Arc::new(Self {
            evaluator,
            inner: Mutex::new(CalcState::default()),
            updates,
        })
    }

    pub async fn digit(&self, digit: char) {
        if !digit.is_ascii_digit() {
            warn!(%digit, "calc: ignoring non-digit keypad input");
            return;
        }
        self.press(KeyEvent::Digit(digit)).await;
    }

    pub async fn decimal_point(&self) {
        self.press(KeyEvent::DecimalPoint).await;
    }

    /// Records `op` against the current buffer. With an operation already
    /// pending this chains: the pending operation is committed first and its
    /// result becomes the new left operand, so the call resolves only once
    /// the evaluation service has answered.
    pub async fn operator(&self, op: Operator) {
        self.press(KeyEvent::Operator(op)).await;
    }

    /// Commits the pending operation; a no-op without one. Resolves once the
    /// display shows the result or the error screen.
    pub async fn equals(&self) {
        self.press(KeyEvent::Equals).await;
    }

    /// Always honored, busy or not. An in-flight request is not aborted; its
    /// late response is discarded by generation check.
    pub async fn clear(&self) {
        self.press(KeyEvent::Clear).await;
    }

    pub async fn backspace(&self) {
        self.press(KeyEvent::Backspace).await;
    }

    pub async fn snapshot(&self) -> DisplaySnapshot {
        DisplaySnapshot::of(&*self.inner.lock().await)
    }

    /// Rendering-surface subscription; observes a fresh projection after
    /// every state transition.
    pub fn subscribe(&self) -> watch::Receiver<DisplaySnapshot> {
        self.updates.subscribe()
    }

    async fn press(&self, key: KeyEvent) {
        let call = {
            let mut state = self.inner.lock().await;
            let call = state.handle_key(key);
            self.updates.send_replace(DisplaySnapshot::of(&state));
            call
        };

        if let Some(call) = call {
            self.run_evaluation(call).await;
        }
    }

    async fn run_evaluation(&self, call: EvalCall) {
        info!(
            generation = call.generation,
            op = ?call.op,
            left = call.left,
            right = call.right,
            "calc: issuing evaluation request"
        );
        let outcome = self
            .evaluator
            .evaluate(call.op, call.left, call.right)
            .await;
        if let Err(err) = &outcome {
            warn!(generation = call.generation, "calc: evaluation failed: {err}");
        }

        let mut state = self.inner.lock().await;
        if !state.settle(call.generation, outcome, call.follow_on) {
            info!(
                generation = call.generation,
                current_generation = state.generation,
                "calc: discarding superseded evaluation response"
            );
            return;
        }
        self.updates.send_replace(DisplaySnapshot::of(&state));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
