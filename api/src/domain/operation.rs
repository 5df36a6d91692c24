use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The three operations the remote service exposes.
#[derive(Clone, Copy, Serialize, Debug, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Power,
    Fibonacci,
    Factorial,
}

impl Operation {
    /// Endpoint path for this operation, relative to the base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Power => "/api/power",
            Operation::Fibonacci => "/api/fibonacci",
            Operation::Factorial => "/api/factorial",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Operation::Power => "power",
            Operation::Fibonacci => "fibonacci",
            Operation::Factorial => "factorial",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug)]
pub struct OperationParseError(String);

impl std::fmt::Display for OperationParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown operation '{}', expected power, fibonacci or factorial",
            self.0
        )
    }
}

impl std::error::Error for OperationParseError {}

impl FromStr for Operation {
    type Err = OperationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power" => Ok(Operation::Power),
            "fibonacci" => Ok(Operation::Fibonacci),
            "factorial" => Ok(Operation::Factorial),
            other => Err(OperationParseError(other.to_string())),
        }
    }
}

/// Body for `POST /api/power`. Documented range: base in
/// [-1_000_000, 1_000_000], exponent in [-1000, 1000]. Ranges are enforced
/// by the form layer, not re-validated here.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct PowerRequest {
    pub base: f64,
    pub exponent: f64,
}

/// Body for `POST /api/fibonacci`. Documented range: n in [0, 1000].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FibonacciRequest {
    pub n: u32,
}

/// Body for `POST /api/factorial`. Documented range: n in [0, 100].
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct FactorialRequest {
    pub n: u32,
}
