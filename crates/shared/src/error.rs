use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Uniform failure type for the evaluation capability. Transport faults,
/// service-side refusals, and mathematically undefined results all collapse
/// into this one class; the controller never distinguishes them.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("evaluation failed: {message}")]
pub struct EvaluationError {
    pub message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
