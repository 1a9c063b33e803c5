use serde::{Deserialize, Serialize};

use crate::domain::Operator;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluateRequest {
    pub op: Operator,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluateResponse {
    pub value: f64,
}
