use async_trait::async_trait;
use shared::{
    domain::Operator,
    error::EvaluationError,
    protocol::{EvaluateRequest, EvaluateResponse},
};

use crate::Evaluator;

/// HTTP binding of the evaluation capability: POSTs the operands to
/// `<server_url>/evaluate` and reads back the computed value. Transport
/// deadlines are the service's own concern.
pub struct RemoteEvaluator {
    http: reqwest::Client,
    server_url: String,
}

impl RemoteEvaluator {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            server_url: server_url.into(),
        }
    }
}

#[async_trait]
impl Evaluator for RemoteEvaluator {
    async fn evaluate(&self, op: Operator, left: f64, right: f64)
        -> Result<f64, EvaluationError> {
        let response = self
            .http
            .post(format!("{}/evaluate", self.server_url))
            .json(&EvaluateRequest { op, left, right })
            .send()
            .await
            .map_err(|err| EvaluationError::new(format!("evaluate request failed: {err}")))?
            .error_for_status()
            .map_err(|err| EvaluationError::new(format!("evaluate request rejected: {err}")))?;

        let body: EvaluateResponse = response
            .json()
            .await
            .map_err(|err| EvaluationError::new(format!("invalid evaluate response: {err}")))?;

        Ok(body.value)
    }
}
