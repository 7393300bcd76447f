use tracing::info;

use super::analyzer::{DealAnalyzer, RankedCandidate};
use super::domain::{
    AnalysisResult, BackendProduct, CreditTier, DealInput, FinancingStructure, LenderProfile,
    OptimizationOutcome, OptimizationResult,
};
use super::structure::monthly_payment;

/// Ascending term ladder the optimizer may step the deal up to.
const TERM_LADDER: [u32; 7] = [48, 60, 66, 72, 75, 78, 84];

const APPEARANCE_RETAIL: f64 = 895.0;
const APPEARANCE_PRICE_FLOOR: f64 = 15_000.0;

/// Warranty pricing band keyed off the vehicle's retail price.
struct WarrantyBand {
    price_floor: f64,
    amount: f64,
    cost_share: f64,
}

const WARRANTY_BANDS: [WarrantyBand; 3] = [
    WarrantyBand {
        price_floor: 30_000.0,
        amount: 3500.0,
        cost_share: 0.42,
    },
    WarrantyBand {
        price_floor: 20_000.0,
        amount: 2800.0,
        cost_share: 0.45,
    },
    WarrantyBand {
        price_floor: 0.0,
        amount: 1800.0,
        cost_share: 0.48,
    },
];

/// Re-derives the winning structure for maximum seller yield.
///
/// Works from the analyzer's top-ranked candidate, reusing its matched
/// lender/tier references, and reports the confidence cost of the richer
/// structure alongside the profit delta.
#[derive(Debug, Clone)]
pub struct ProfitOptimizer {
    analyzer: DealAnalyzer,
}

impl ProfitOptimizer {
    pub fn new(analyzer: DealAnalyzer) -> Self {
        Self { analyzer }
    }

    pub fn analyzer(&self) -> &DealAnalyzer {
        &self.analyzer
    }

    /// Optimize the best available structure for this deal.
    pub fn optimize(&self, deal: &DealInput) -> OptimizationOutcome {
        self.optimize_as_of(deal, self.analyzer.evaluation_year())
    }

    /// As [`optimize`](Self::optimize) with an explicit evaluation year.
    pub fn optimize_as_of(&self, deal: &DealInput, evaluation_year: i32) -> OptimizationOutcome {
        let mut ranked = self.analyzer.ranked_as_of(deal, evaluation_year);
        if ranked.is_empty() {
            return OptimizationOutcome::NoEligibleLender;
        }

        let best = ranked.remove(0);
        let vehicle_age = evaluation_year - deal.vehicle_year;
        let result = self.optimize_candidate(best, deal, vehicle_age);

        info!(
            lender = %result.original.lender_name,
            profit_increase = result.profit_increase,
            "deal profit optimized"
        );

        OptimizationOutcome::Optimized(result)
    }

    fn optimize_candidate(
        &self,
        candidate: RankedCandidate<'_>,
        deal: &DealInput,
        vehicle_age: i32,
    ) -> OptimizationResult {
        let RankedCandidate {
            lender,
            tier,
            result: original,
        } = candidate;
        let base = &original.structure;

        let rate = marked_up_rate(base.rate, tier, deal.credit_score);
        let term = extended_term(base.term, tier, vehicle_age, deal.vehicle_miles);
        let backend_products =
            optimized_backend_products(lender, deal.vehicle_price, base.approved_loan_amount);

        // Loan amount is untouched; only pricing and products move.
        let payment = monthly_payment(base.approved_loan_amount, rate, term);
        let dealer_reserve = incremental_reserve(base.approved_loan_amount, base.rate, rate, term);
        let backend_profit: f64 = backend_products.iter().map(|product| product.profit).sum();

        let structure = FinancingStructure {
            approved_loan_amount: base.approved_loan_amount,
            recommended_down_payment: base.recommended_down_payment,
            term,
            rate,
            monthly_payment: payment,
            backend_products,
            dealer_reserve,
            total_dealer_profit: dealer_reserve + backend_profit,
        };

        let approval_confidence =
            adjusted_confidence(original.approval_confidence, base, &structure);

        let optimized = AnalysisResult {
            lender_name: original.lender_name.clone(),
            tier_name: original.tier_name.clone(),
            structure,
            approval_confidence,
        };

        let original_profit = original.structure.total_dealer_profit;
        let optimized_profit = optimized.structure.total_dealer_profit;
        let profit_increase = optimized_profit - original_profit;
        let profit_increase_percent = (original_profit != 0.0)
            .then(|| (optimized_profit / original_profit - 1.0) * 100.0);

        OptimizationResult {
            original,
            optimized,
            profit_increase,
            profit_increase_percent,
        }
    }
}

/// Credit-banded markup over the base rate, capped at the tier ceiling.
fn marked_up_rate(base_rate: f64, tier: &CreditTier, credit_score: u16) -> f64 {
    let markup = if credit_score >= 740 {
        0.5
    } else if credit_score >= 700 {
        0.75
    } else if credit_score >= 660 {
        1.0
    } else if credit_score >= 620 {
        1.5
    } else if credit_score >= 580 {
        2.0
    } else {
        2.5
    };

    (base_rate + markup).min(tier.max_rate)
}

/// First ladder step strictly above the base term that the tier ceiling and
/// the collateral constraints jointly allow; the base term when none does.
fn extended_term(base_term: u32, tier: &CreditTier, vehicle_age: i32, vehicle_miles: u32) -> u32 {
    for term in TERM_LADDER {
        if term <= base_term || term > tier.term_ceiling() {
            continue;
        }

        let age_ok = vehicle_age <= 7 || term <= 60;
        let mileage_ok = vehicle_miles <= 100_000 || term <= 60;
        let high_mileage_ok = vehicle_miles <= 120_000 || term <= 48;

        if age_ok && mileage_ok && high_mileage_ok {
            return term;
        }
    }

    base_term
}

/// Richer product matrix than the base pass: banded warranty pricing, the
/// same GAP rule, and appearance protection on qualifying price points.
fn optimized_backend_products(
    lender: &LenderProfile,
    vehicle_price: f64,
    approved_loan_amount: f64,
) -> Vec<BackendProduct> {
    let mut products = Vec::new();

    let band = WARRANTY_BANDS
        .iter()
        .find(|band| vehicle_price >= band.price_floor)
        .unwrap_or(&WARRANTY_BANDS[2]);
    let warranty_amount = lender.max_warranty.unwrap_or(band.amount).min(band.amount);
    products.push(BackendProduct::priced(
        "Extended Warranty",
        warranty_amount,
        band.cost_share,
    ));

    let front_end_ltv = approved_loan_amount / vehicle_price * 100.0;
    if front_end_ltv >= 70.0 {
        let gap_amount = lender.max_gap.unwrap_or(1000.0).min(895.0);
        products.push(BackendProduct::priced("GAP Insurance", gap_amount, 0.30));
    }

    if vehicle_price >= APPEARANCE_PRICE_FLOOR {
        products.push(BackendProduct::priced(
            "Appearance Protection",
            APPEARANCE_RETAIL,
            0.18,
        ));
    }

    products
}

/// Reserve on the optimized structure models only the added spread from the
/// rate increase, not the base participation formula.
fn incremental_reserve(principal: f64, base_rate: f64, new_rate: f64, term: u32) -> f64 {
    let rate_spread = new_rate - base_rate;
    principal * (rate_spread / 100.0) * (f64::from(term) / 24.0)
}

/// Confidence cost of the richer structure, clamped to the score range.
fn adjusted_confidence(
    base_confidence: f64,
    original: &FinancingStructure,
    optimized: &FinancingStructure,
) -> f64 {
    let mut adjustment = 0.0;

    let rate_increase = optimized.rate - original.rate;
    adjustment -= rate_increase / 0.25 * 1.5;

    if optimized.term > original.term {
        adjustment -= f64::from(optimized.term - original.term) / 12.0 * 2.0;
    }

    let original_backend = original.backend_amount();
    let optimized_backend = optimized.backend_amount();
    if optimized_backend > original_backend {
        adjustment -= (optimized_backend - original_backend) / 1000.0 * 3.0;
    }

    (base_confidence + adjustment).clamp(0.0, 100.0)
}
