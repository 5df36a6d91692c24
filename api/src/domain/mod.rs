pub mod envelope;
pub mod history;
pub mod metrics;
pub mod operation;
