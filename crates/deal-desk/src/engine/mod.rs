//! Deal-analysis engine: eligibility screening, structure calculation,
//! confidence scoring, and the profit-optimization pass built on top.
//!
//! The engine is synchronous and CPU-bound. It consumes an immutable
//! [`LenderCatalog`] handed over at construction and expresses every business
//! outcome, including across-the-board declines, as ordinary return values.

pub mod analyzer;
pub mod catalog;
pub(crate) mod confidence;
pub mod domain;
pub(crate) mod eligibility;
pub mod optimizer;
pub mod router;
pub(crate) mod structure;

#[cfg(test)]
mod tests;

pub use analyzer::DealAnalyzer;
pub use catalog::LenderCatalog;
pub use domain::{
    AnalysisResult, BackendProduct, CreditTier, DealInput, DealerReserve, FinancingStructure,
    LenderProfile, OptimizationOutcome, OptimizationResult, VehicleRestrictions, DEFAULT_MAX_TERM,
};
pub use optimizer::ProfitOptimizer;
pub use router::{deal_router, DealRequest};
