use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Aggregate counters describing recent service activity. Fields the server
/// omits fall back to defaults rather than failing the fetch.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct MetricsSnapshot {
    #[serde(default)]
    pub total_requests: u64,
    #[serde(default)]
    pub average_response_time: f64,
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default)]
    pub operation_counts: HashMap<String, u64>,
}
