// Engagement engine: pure analysis and scoring.
//
// Nothing in here touches the network, the database or the clock. The
// analyzer and readiness scorer are plain functions of their inputs plus
// the benchmark table, so they are safe to call from any task.

pub mod analyzer;
pub mod insights;
pub mod models;
pub mod platform;
pub mod readiness;
pub mod validate;

pub use analyzer::EngagementAnalyzer;
pub use models::{
    AnalysisRequest, AnalysisResult, EngagementQuality, Post, ReadinessBreakdown, ReadinessScore,
};
pub use platform::{Benchmarks, Platform};
pub use readiness::ProfileCompleteness;
pub use validate::ValidationError;
