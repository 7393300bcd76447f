use super::domain::{BackendProduct, CreditTier, DealInput, FinancingStructure, LenderProfile};

const DEFAULT_MAX_WARRANTY: f64 = 3000.0;
const DEFAULT_MAX_GAP: f64 = 1000.0;
const GAP_RETAIL_CAP: f64 = 895.0;
const GAP_LTV_FLOOR: f64 = 70.0;

/// Standard amortization payment for a principal at an annual percentage rate.
pub(crate) fn monthly_payment(principal: f64, annual_rate: f64, term_months: u32) -> f64 {
    let monthly_rate = annual_rate / 1200.0;
    let growth = (1.0 + monthly_rate).powi(term_months as i32);
    principal * monthly_rate * growth / (growth - 1.0)
}

/// Derive the full financing structure for a matched lender/tier.
pub(crate) fn build(
    lender: &LenderProfile,
    tier: &CreditTier,
    deal: &DealInput,
    vehicle_age: i32,
) -> FinancingStructure {
    let max_loan_amount = deal.vehicle_price * tier.max_ltv / 100.0;
    let approved_loan_amount = (deal.vehicle_price - deal.down_payment).min(max_loan_amount);

    let term = capped_term(tier, vehicle_age, deal.vehicle_miles);
    let rate = risk_adjusted_rate(tier, vehicle_age, deal.vehicle_miles, term);
    let payment = monthly_payment(approved_loan_amount, rate, term);

    let backend_products = backend_products(lender, deal.vehicle_price, approved_loan_amount);
    let dealer_reserve = approved_loan_amount * (lender.dealer_reserve.percentage() / 100.0);
    let backend_profit: f64 = backend_products.iter().map(|product| product.profit).sum();

    FinancingStructure {
        approved_loan_amount,
        recommended_down_payment: deal.down_payment,
        term,
        rate,
        monthly_payment: payment,
        backend_products,
        dealer_reserve,
        total_dealer_profit: dealer_reserve + backend_profit,
    }
}

/// Tier ceiling lowered by mileage then age caps; each cap only ever lowers
/// the term and the most restrictive one wins.
fn capped_term(tier: &CreditTier, vehicle_age: i32, vehicle_miles: u32) -> u32 {
    let mut term = tier.term_ceiling();

    if vehicle_miles > 100_000 {
        term = term.min(60);
    }
    if vehicle_miles > 120_000 {
        term = term.min(48);
    }

    if vehicle_age > 7 {
        term = term.min(60);
    }
    if vehicle_age > 10 {
        term = term.min(48);
    }

    term
}

/// Tier rate plus cumulative surcharges; thresholds stack rather than select.
fn risk_adjusted_rate(tier: &CreditTier, vehicle_age: i32, vehicle_miles: u32, term: u32) -> f64 {
    let mut rate = tier.max_rate;

    if term > 72 {
        rate += 0.5;
    }
    if term > 84 {
        rate += 0.5;
    }

    if vehicle_miles > 100_000 {
        rate += 1.0;
    }

    if vehicle_age > 5 {
        rate += 0.5;
    }
    if vehicle_age > 8 {
        rate += 0.5;
    }

    rate
}

fn backend_products(
    lender: &LenderProfile,
    vehicle_price: f64,
    approved_loan_amount: f64,
) -> Vec<BackendProduct> {
    let mut products = Vec::new();

    let warranty_cap = lender.max_warranty.unwrap_or(DEFAULT_MAX_WARRANTY);
    let warranty_amount = warranty_cap.min(vehicle_price * 0.15);
    if warranty_amount > 0.0 {
        products.push(BackendProduct::priced(
            "Extended Warranty",
            warranty_amount,
            0.45,
        ));
    }

    let front_end_ltv = approved_loan_amount / vehicle_price * 100.0;
    if front_end_ltv >= GAP_LTV_FLOOR {
        let gap_amount = lender.max_gap.unwrap_or(DEFAULT_MAX_GAP).min(GAP_RETAIL_CAP);
        products.push(BackendProduct::priced("GAP Insurance", gap_amount, 0.30));
    }

    products
}
