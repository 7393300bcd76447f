use super::domain::{CreditTier, DealInput};
use super::eligibility::debt_to_income;

/// Heuristic approval likelihood for a matched structure, 0-100.
///
/// Starts at a perfect score and deducts for each risk signal. Thresholds in
/// the same band stack cumulatively; a 130k-mile vehicle takes all three
/// mileage deductions, not just the deepest one.
pub(crate) fn approval_confidence(deal: &DealInput, tier: &CreditTier, vehicle_age: i32) -> f64 {
    let mut score: f64 = 100.0;

    let score_buffer = i32::from(deal.credit_score) - i32::from(tier.min_score);
    if score_buffer < 20 {
        score -= 15.0;
    }
    if score_buffer < 10 {
        score -= 15.0;
    }

    let dti = debt_to_income(deal);
    if dti > 40.0 {
        score -= 10.0;
    }
    if dti > 45.0 {
        score -= 10.0;
    }
    if dti > 50.0 {
        score -= 20.0;
    }

    if vehicle_age > 7 {
        score -= 5.0;
    }
    if vehicle_age > 10 {
        score -= 10.0;
    }

    if deal.vehicle_miles > 80_000 {
        score -= 5.0;
    }
    if deal.vehicle_miles > 100_000 {
        score -= 10.0;
    }
    if deal.vehicle_miles > 120_000 {
        score -= 15.0;
    }

    score.clamp(0.0, 100.0)
}
