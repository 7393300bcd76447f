use super::domain::{CreditTier, DealInput, LenderProfile};
use super::structure::monthly_payment;

/// Annual rate and term of the fixed proxy payment used for PTI screening.
/// This is a risk yardstick only and is independent of any lender's pricing.
const PTI_PROXY_RATE: f64 = 10.0;
const PTI_PROXY_TERM: u32 = 60;

/// Outcome of screening one lender against a deal.
pub(crate) enum Screening<'a> {
    Eligible(&'a CreditTier),
    Skipped(SkipReason),
}

/// Why a lender dropped out of the panel for this deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SkipReason {
    NoMatchingTier,
    IncomeBelowFloor,
    UndefinedRatios,
    PaymentToIncome,
    VehicleTooOld,
    MileageExceeded,
}

impl SkipReason {
    pub(crate) const fn label(self) -> &'static str {
        match self {
            SkipReason::NoMatchingTier => "no_matching_tier",
            SkipReason::IncomeBelowFloor => "income_below_floor",
            SkipReason::UndefinedRatios => "undefined_ratios",
            SkipReason::PaymentToIncome => "payment_to_income",
            SkipReason::VehicleTooOld => "vehicle_too_old",
            SkipReason::MileageExceeded => "mileage_exceeded",
        }
    }
}

/// First tier in the lender's configured (descending) order the score clears.
pub(crate) fn match_tier(lender: &LenderProfile, credit_score: u16) -> Option<&CreditTier> {
    lender
        .credit_tiers
        .iter()
        .find(|tier| credit_score >= tier.min_score)
}

/// Screen a lender: tier match first, then the hard gates. All gates must
/// pass or the lender is skipped outright; there are no fallback tiers.
pub(crate) fn screen<'a>(
    lender: &'a LenderProfile,
    deal: &DealInput,
    vehicle_age: i32,
) -> Screening<'a> {
    let Some(tier) = match_tier(lender, deal.credit_score) else {
        return Screening::Skipped(SkipReason::NoMatchingTier);
    };

    // Income and payment ratios are undefined without positive income.
    if deal.monthly_income <= 0.0 {
        return Screening::Skipped(SkipReason::UndefinedRatios);
    }

    if let Some(min_income) = lender.min_income {
        if deal.monthly_income < min_income {
            return Screening::Skipped(SkipReason::IncomeBelowFloor);
        }
    }

    if let Some(max_pti) = lender.max_pti {
        if payment_to_income(deal) > max_pti {
            return Screening::Skipped(SkipReason::PaymentToIncome);
        }
    }

    if let Some(max_age) = lender.vehicle_restrictions.max_age {
        if vehicle_age > max_age as i32 {
            return Screening::Skipped(SkipReason::VehicleTooOld);
        }
    }

    if let Some(max_mileage) = lender.vehicle_restrictions.max_mileage {
        if deal.vehicle_miles > max_mileage {
            return Screening::Skipped(SkipReason::MileageExceeded);
        }
    }

    Screening::Eligible(tier)
}

/// PTI over the pre-cap financed amount using the fixed proxy payment.
pub(crate) fn payment_to_income(deal: &DealInput) -> f64 {
    let financed = deal.vehicle_price - deal.down_payment;
    let estimated = monthly_payment(financed, PTI_PROXY_RATE, PTI_PROXY_TERM);
    estimated / deal.monthly_income * 100.0
}

/// DTI expressed as a percentage; callers must have screened income first.
pub(crate) fn debt_to_income(deal: &DealInput) -> f64 {
    deal.monthly_debt / deal.monthly_income * 100.0
}
