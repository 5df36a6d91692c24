use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw wire shape the operation endpoints respond with.
#[derive(Debug, Deserialize)]
pub struct OperationResult {
    pub result: f64,
    pub execution_time: Option<u64>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

impl std::fmt::Display for ResponseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseStatus::Success => write!(f, "success"),
            ResponseStatus::Error => write!(f, "error"),
        }
    }
}

/// Uniform envelope built client-side around each raw operation response.
/// The timestamp is stamped locally at construction, not taken from the
/// server, and a missing `execution_time` becomes 0.
#[derive(Clone, Serialize, Debug, PartialEq)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: ResponseStatus,
    pub timestamp: DateTime<Utc>,
    pub execution_time: u64,
}

impl From<OperationResult> for ApiResponse<f64> {
    fn from(raw: OperationResult) -> Self {
        ApiResponse {
            data: raw.result,
            status: ResponseStatus::Success,
            timestamp: Utc::now(),
            execution_time: raw.execution_time.unwrap_or(0),
        }
    }
}
