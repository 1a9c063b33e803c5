//! Pure keypad state machine; evaluation effects are returned to the caller
//! rather than executed here.

use shared::{domain::Operator, error::EvaluationError};

pub const ERROR_DISPLAY: &str = "Error";

/// A binary operation waiting for its right-hand operand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingOp {
    pub op: Operator,
    pub left: f64,
}

/// Discrete keypad inputs accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Digit(char),
    DecimalPoint,
    Operator(Operator),
    Equals,
    Clear,
    Backspace,
}

/// One evaluation request owed to the evaluation service. `follow_on` carries
/// the operator that triggered a chained evaluation; it becomes the next
/// pending operation once the result arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvalCall {
    pub generation: u64,
    pub op: Operator,
    pub left: f64,
    pub right: f64,
    pub follow_on: Option<Operator>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CalcState {
    pub display: String,
    pub pending: Option<PendingOp>,
    pub busy: bool,
    /// Bumped on every clear; settlements carrying an older generation are
    /// discarded.
    pub generation: u64,
}

impl Default for CalcState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            pending: None,
            busy: false,
            generation: 0,
        }
    }
}

impl CalcState {
    pub fn in_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    /// Applies one keypad input. Returns the evaluation request this key
    /// committed, if any; the caller owns running it and feeding the outcome
    /// back through [`CalcState::settle`].
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<EvalCall> {
        if self.busy {
            // Only clear is honored while a request is in flight.
            if key == KeyEvent::Clear {
                self.clear();
            }
            return None;
        }

        match key {
            KeyEvent::Digit(digit) => {
                if !digit.is_ascii_digit() {
                    return None;
                }
                self.leave_error_screen();
                if self.display == "0" {
                    self.display = digit.to_string();
                } else {
                    self.display.push(digit);
                }
                None
            }
            KeyEvent::DecimalPoint => {
                self.leave_error_screen();
                if !self.display.contains('.') {
                    self.display.push('.');
                }
                None
            }
            KeyEvent::Operator(op) => {
                self.leave_error_screen();
                match self.pending {
                    None => {
                        self.pending = Some(PendingOp {
                            op,
                            left: self.operand(),
                        });
                        self.display = "0".to_string();
                        None
                    }
                    Some(previous) => {
                        // Chained operation: commit the previous one first;
                        // the new operator rides along and is installed once
                        // the result is known.
                        self.busy = true;
                        Some(EvalCall {
                            generation: self.generation,
                            op: previous.op,
                            left: previous.left,
                            right: self.operand(),
                            follow_on: Some(op),
                        })
                    }
                }
            }
            KeyEvent::Equals => match self.pending {
                None => None,
                Some(previous) => {
                    self.busy = true;
                    Some(EvalCall {
                        generation: self.generation,
                        op: previous.op,
                        left: previous.left,
                        right: self.operand(),
                        follow_on: None,
                    })
                }
            },
            KeyEvent::Clear => {
                self.clear();
                None
            }
            KeyEvent::Backspace => {
                if self.in_error() || self.display.len() <= 1 {
                    self.display = "0".to_string();
                } else {
                    self.display.pop();
                }
                None
            }
        }
    }

    /// Applies the outcome of an evaluation request. Returns false when the
    /// request's generation was superseded by a clear, in which case the
    /// state is left untouched.
    pub fn settle(
        &mut self,
        generation: u64,
        outcome: Result<f64, EvaluationError>,
        follow_on: Option<Operator>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }

        self.busy = false;
        match outcome {
            Ok(value) => match follow_on {
                Some(op) => {
                    self.pending = Some(PendingOp { op, left: value });
                    self.display = "0".to_string();
                }
                None => {
                    self.pending = None;
                    self.display = format_value(value);
                }
            },
            Err(_) => {
                self.pending = None;
                self.display = ERROR_DISPLAY.to_string();
            }
        }
        true
    }

    fn operand(&self) -> f64 {
        // The buffer invariant (digits plus at most one dot, never empty)
        // keeps this parseable.
        self.display.parse().unwrap_or(0.0)
    }

    fn leave_error_screen(&mut self) {
        if self.in_error() {
            self.display = "0".to_string();
        }
    }

    fn clear(&mut self) {
        self.display = "0".to_string();
        self.pending = None;
        self.busy = false;
        self.generation += 1;
    }
}

/// Native decimal rendering of the service's result; no precision contract
/// is imposed, floating-point artifacts surface verbatim.
pub fn format_value(value: f64) -> String {
    value.to_string()
}
