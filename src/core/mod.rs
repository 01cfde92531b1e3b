pub mod aggregate;
pub mod engine;
pub mod histogram;
pub mod quadrant;
pub mod stats;

pub use engine::{ReportEngine, ReportOutcome};
