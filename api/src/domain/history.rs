use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::envelope::ResponseStatus;
use crate::domain::operation::Operation;

/// One past invocation as reported by the remote service. Owned entirely by
/// the service; the client never mutates or caches these beyond a single
/// fetch. The timestamp is kept as the server's string verbatim.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct OperationRecord {
    pub id: i64,
    pub operation: Operation,
    #[serde(default)]
    pub inputs: Map<String, Value>,
    pub result: f64,
    pub timestamp: String,
    #[serde(default)]
    pub execution_time: u64,
    pub status: ResponseStatus,
}

impl OperationRecord {
    /// Compact human rendering of the inputs, e.g. `2^8`, `F(10)`, `5!`.
    pub fn format_inputs(&self) -> String {
        match self.operation {
            Operation::Power => match (self.inputs.get("base"), self.inputs.get("exponent")) {
                (Some(base), Some(exponent)) => format!("{}^{}", base, exponent),
                _ => Value::Object(self.inputs.clone()).to_string(),
            },
            Operation::Fibonacci => match self.inputs.get("n") {
                Some(n) => format!("F({})", n),
                None => Value::Object(self.inputs.clone()).to_string(),
            },
            Operation::Factorial => match self.inputs.get("n") {
                Some(n) => format!("{}!", n),
                None => Value::Object(self.inputs.clone()).to_string(),
            },
        }
    }
}

/// Client-side filter over an in-memory history fetch. A record matches when
/// the lowercased search term is a substring of the operation name or of the
/// result rendered as a string, and the operation facet (when set) matches
/// exactly.
#[derive(Clone, Debug, Default)]
pub struct HistoryFilter {
    pub search: Option<String>,
    pub operation: Option<Operation>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &OperationRecord) -> bool {
        let matches_search = match self.search.as_deref() {
            None | Some("") => true,
            Some(term) => {
                record.operation.name().contains(&term.to_lowercase())
                    || record.result.to_string().contains(term)
            }
        };
        let matches_operation = match self.operation {
            None => true,
            Some(op) => record.operation == op,
        };
        matches_search && matches_operation
    }

    pub fn apply(&self, records: &[OperationRecord]) -> Vec<OperationRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
