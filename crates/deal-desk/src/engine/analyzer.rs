use std::sync::Arc;

use chrono::{Datelike, Local};
use tracing::{debug, info};

use super::catalog::LenderCatalog;
use super::confidence::approval_confidence;
use super::domain::{AnalysisResult, CreditTier, DealInput, LenderProfile};
use super::eligibility::{screen, Screening};
use super::structure;

/// A ranked candidate carrying the matched lender/tier references so the
/// optimizer never has to re-resolve them by name.
pub(crate) struct RankedCandidate<'a> {
    pub(crate) lender: &'a LenderProfile,
    pub(crate) tier: &'a CreditTier,
    pub(crate) result: AnalysisResult,
}

/// Orchestrates screening, structuring, and scoring across the lender panel.
///
/// Stateless per request over an immutable shared catalog; concurrent calls
/// need no locking. The evaluation year is fixed at construction so repeated
/// analyses of the same deal are deterministic.
#[derive(Debug, Clone)]
pub struct DealAnalyzer {
    catalog: Arc<LenderCatalog>,
    evaluation_year: i32,
}

impl DealAnalyzer {
    pub fn new(catalog: Arc<LenderCatalog>, evaluation_year: i32) -> Self {
        Self {
            catalog,
            evaluation_year,
        }
    }

    /// Analyzer pinned to the current calendar year.
    pub fn with_current_year(catalog: Arc<LenderCatalog>) -> Self {
        Self::new(catalog, Local::now().year())
    }

    pub fn catalog(&self) -> &LenderCatalog {
        &self.catalog
    }

    pub fn evaluation_year(&self) -> i32 {
        self.evaluation_year
    }

    /// Rank every eligible lender's structure for this deal, best first.
    ///
    /// Empty catalog or an across-the-board decline yields an empty sequence,
    /// never an error.
    pub fn analyze(&self, deal: &DealInput) -> Vec<AnalysisResult> {
        self.analyze_as_of(deal, self.evaluation_year)
    }

    /// As [`analyze`](Self::analyze) with an explicit evaluation year.
    pub fn analyze_as_of(&self, deal: &DealInput, evaluation_year: i32) -> Vec<AnalysisResult> {
        self.ranked_as_of(deal, evaluation_year)
            .into_iter()
            .map(|candidate| candidate.result)
            .collect()
    }

    pub(crate) fn ranked_as_of(
        &self,
        deal: &DealInput,
        evaluation_year: i32,
    ) -> Vec<RankedCandidate<'_>> {
        let vehicle_age = evaluation_year - deal.vehicle_year;
        let mut candidates = Vec::new();

        for lender in self.catalog.lenders() {
            let tier = match screen(lender, deal, vehicle_age) {
                Screening::Eligible(tier) => tier,
                Screening::Skipped(reason) => {
                    debug!(lender = %lender.name, reason = reason.label(), "lender skipped");
                    continue;
                }
            };

            let structure = structure::build(lender, tier, deal, vehicle_age);
            let confidence = approval_confidence(deal, tier, vehicle_age);

            candidates.push(RankedCandidate {
                lender,
                tier,
                result: AnalysisResult {
                    lender_name: lender.name.clone(),
                    tier_name: tier.name.clone(),
                    structure,
                    approval_confidence: confidence,
                },
            });
        }

        // Stable sort: ties keep catalog order.
        candidates.sort_by(|a, b| {
            b.result
                .approval_confidence
                .total_cmp(&a.result.approval_confidence)
        });

        info!(
            candidates = candidates.len(),
            panel = self.catalog.len(),
            "deal analyzed"
        );

        candidates
    }
}
