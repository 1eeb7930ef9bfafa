use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::{RefinementError, RefinementRequest, Refiner};

/// Client for a Mission Secure service's `/api/grade` endpoint.
///
/// Used by front ends (such as the terminal quiz) that keep credentials on the
/// server side.
#[derive(Debug, Clone)]
pub struct GradeServiceClient {
    client: reqwest::Client,
    base_url: String,
}

impl GradeServiceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RefinementError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RefinementError::Config(format!("failed to create HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn grade_url(&self) -> String {
        format!("{}/api/grade", self.base_url)
    }
}

#[async_trait]
impl Refiner for GradeServiceClient {
    async fn refine(&self, request: &RefinementRequest) -> Result<Value, RefinementError> {
        let response = self
            .client
            .post(self.grade_url())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefinementError::Status {
                status: status.as_u16(),
            });
        }

        let reply = response
            .json::<Value>()
            .await
            .map_err(|err| RefinementError::Malformed(err.to_string()))?;

        // A service without model credentials echoes the (truncated) local
        // values; treat that as no adjustment.
        if reply.get("refined").and_then(Value::as_bool) == Some(false) {
            tracing::debug!("grade service returned an unrefined echo");
            return Ok(Value::Object(Default::default()));
        }
        Ok(reply)
    }
}
