//! Threat scoring: block aggregation and cached grid evaluation.

pub mod aggregator;
pub mod evaluator;

pub use aggregator::category_threat;
pub use evaluator::{
    threat_breakdown, CategoryThreat, GridEvaluator, ScoreRecord, ThreatBreakdown,
    SCORED_CATEGORIES, THREAT_CACHE_TTL_MS,
};
