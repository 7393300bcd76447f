use std::sync::Arc;

use super::common::*;
use crate::engine::catalog::LenderCatalog;
use crate::engine::domain::OptimizationOutcome;
use crate::engine::{DealAnalyzer, ProfitOptimizer};

fn expect_optimized(outcome: OptimizationOutcome) -> crate::engine::OptimizationResult {
    match outcome {
        OptimizationOutcome::Optimized(result) => result,
        OptimizationOutcome::NoEligibleLender => panic!("expected an optimized structure"),
    }
}

#[test]
fn reference_deal_gains_profit_through_the_backend_matrix() {
    let result = expect_optimized(optimizer_for(panel()).optimize(&deal()));

    assert_eq!(result.original.lender_name, "Harbor Credit Union");
    assert_close(result.original.structure.total_dealer_profit, 2716.5, 1e-6);

    let optimized = &result.optimized.structure;
    // Markup is swallowed by the tier cap and the ladder is exhausted, so the
    // gain comes entirely from the richer product matrix.
    assert_close(optimized.rate, 5.9, 1e-9);
    assert_eq!(optimized.term, 72);
    assert_close(optimized.dealer_reserve, 0.0, 1e-9);

    let names: Vec<&str> = optimized
        .backend_products
        .iter()
        .map(|product| product.name.as_str())
        .collect();
    assert_eq!(
        names,
        ["Extended Warranty", "GAP Insurance", "Appearance Protection"]
    );

    assert_close(optimized.total_dealer_profit, 2900.4, 1e-6);
    assert_close(result.profit_increase, 183.9, 1e-6);
    assert_close(result.profit_increase_percent.expect("defined"), 6.76974, 1e-3);
    assert_close(result.optimized.approval_confidence, 97.915, 1e-6);
}

#[test]
fn loan_amount_and_down_payment_are_never_touched() {
    let result = expect_optimized(optimizer_for(panel()).optimize(&deal()));

    assert_close(
        result.optimized.structure.approved_loan_amount,
        result.original.structure.approved_loan_amount,
        1e-9,
    );
    assert_close(
        result.optimized.structure.recommended_down_payment,
        result.original.structure.recommended_down_payment,
        1e-9,
    );
}

#[test]
fn optimized_rate_never_exceeds_the_tier_ceiling() {
    // Second Street's 84-month base term surcharges the rate past the tier
    // ceiling; the optimizer pulls it back down to the cap.
    let mut deal = deal();
    deal.vehicle_miles = 90_000;

    let result = expect_optimized(optimizer_for(vec![second_street_bank()]).optimize(&deal));

    assert_close(result.original.structure.rate, 8.4, 1e-9);
    assert_close(result.optimized.structure.rate, 7.9, 1e-9);

    // The negative spread shows up as a clawed-back reserve, and the easier
    // rate buys back confidence faster than the backend costs it.
    assert_close(result.optimized.structure.dealer_reserve, -385.0, 1e-6);
    assert_close(result.profit_increase, -91.1, 1e-6);
    assert_close(result.optimized.approval_confidence, 95.915, 1e-6);
}

#[test]
fn warranty_band_tracks_the_vehicle_price() {
    let optimizer = optimizer_for(vec![second_street_bank()]);

    let mut premium = deal();
    premium.vehicle_price = 35_000.0;
    premium.down_payment = 5000.0;
    let result = expect_optimized(optimizer.optimize(&premium));
    let warranty = &result.optimized.structure.backend_products[0];
    assert_close(warranty.amount, 3500.0, 1e-9);
    assert_close(warranty.profit, 3500.0 * 0.58, 1e-6);

    let mut economy = deal();
    economy.vehicle_price = 12_000.0;
    economy.down_payment = 0.0;
    let result = expect_optimized(optimizer.optimize(&economy));
    let warranty = &result.optimized.structure.backend_products[0];
    assert_close(warranty.amount, 1800.0, 1e-9);
    assert_close(warranty.profit, 1800.0 * 0.52, 1e-6);
}

#[test]
fn lender_warranty_cap_limits_the_band_amount() {
    let mut rich = deal();
    rich.vehicle_price = 35_000.0;
    rich.down_payment = 5000.0;

    let result = expect_optimized(optimizer_for(vec![harbor_credit_union()]).optimize(&rich));
    let warranty = &result.optimized.structure.backend_products[0];

    assert_close(warranty.amount, 3000.0, 1e-9);
    assert_close(warranty.profit, 3000.0 * 0.58, 1e-6);
}

#[test]
fn appearance_protection_requires_the_price_floor() {
    let optimizer = optimizer_for(vec![second_street_bank()]);

    let mut economy = deal();
    economy.vehicle_price = 12_000.0;
    economy.down_payment = 0.0;
    let result = expect_optimized(optimizer.optimize(&economy));
    assert!(result
        .optimized
        .structure
        .backend_products
        .iter()
        .all(|product| product.name != "Appearance Protection"));

    let result = expect_optimized(optimizer.optimize(&deal()));
    assert!(result
        .optimized
        .structure
        .backend_products
        .iter()
        .any(|product| product.name == "Appearance Protection"));
}

#[test]
fn empty_catalog_reports_no_eligible_lender() {
    let optimizer = ProfitOptimizer::new(DealAnalyzer::new(
        Arc::new(LenderCatalog::empty()),
        EVAL_YEAR,
    ));
    assert_eq!(
        optimizer.optimize(&deal()),
        OptimizationOutcome::NoEligibleLender
    );
}

#[test]
fn across_the_board_decline_reports_no_eligible_lender() {
    let mut deal = deal();
    deal.credit_score = 500;
    assert_eq!(
        optimizer_for(panel()).optimize(&deal),
        OptimizationOutcome::NoEligibleLender
    );
}

#[test]
fn zero_original_profit_yields_the_percent_sentinel() {
    let mut thin = deal();
    thin.credit_score = 700;
    thin.monthly_income = 4000.0;
    thin.monthly_debt = 0.0;
    thin.vehicle_price = 12_000.0;
    thin.down_payment = 9000.0;
    thin.vehicle_year = EVAL_YEAR;
    thin.vehicle_miles = 10_000;

    let result = expect_optimized(optimizer_for(vec![metro_direct_lending()]).optimize(&thin));

    assert_close(result.original.structure.total_dealer_profit, 0.0, 1e-9);
    assert_close(result.optimized.structure.total_dealer_profit, 0.0, 1e-9);
    assert_close(result.profit_increase, 0.0, 1e-9);
    assert!(result.profit_increase_percent.is_none());
}

#[test]
fn optimizer_starts_from_the_analyzers_top_ranked_result() {
    let optimizer = optimizer_for(panel());
    let ranked = optimizer.analyzer().analyze(&deal());
    let result = expect_optimized(optimizer.optimize(&deal()));

    assert_eq!(result.original, ranked[0]);
}
