pub mod models;
pub mod report;

pub use models::*;
pub use report::AnalysisReport;
