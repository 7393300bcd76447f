use std::sync::Arc;

use crate::engine::catalog::LenderCatalog;
use crate::engine::domain::{
    CreditTier, DealInput, DealerReserve, LenderProfile, VehicleRestrictions,
};
use crate::engine::{DealAnalyzer, ProfitOptimizer};

/// Fixed evaluation year so vehicle-age math never depends on the wall clock.
pub(super) const EVAL_YEAR: i32 = 2026;

/// The reference deal: strong buyer, late-model vehicle, healthy cash down.
pub(super) fn deal() -> DealInput {
    DealInput {
        credit_score: 750,
        monthly_income: 6000.0,
        monthly_debt: 1200.0,
        vehicle_price: 25_000.0,
        down_payment: 3000.0,
        vehicle_year: EVAL_YEAR - 2,
        vehicle_miles: 20_000,
    }
}

pub(super) fn harbor_credit_union() -> LenderProfile {
    LenderProfile {
        id: "harbor-cu".to_string(),
        name: "Harbor Credit Union".to_string(),
        credit_tiers: vec![
            CreditTier {
                name: "Tier A".to_string(),
                min_score: 700,
                max_ltv: 120.0,
                max_term: Some(72),
                max_rate: 5.9,
            },
            CreditTier {
                name: "Tier B".to_string(),
                min_score: 640,
                max_ltv: 110.0,
                max_term: Some(66),
                max_rate: 9.4,
            },
            CreditTier {
                name: "Tier C".to_string(),
                min_score: 580,
                max_ltv: 100.0,
                max_term: Some(60),
                max_rate: 13.9,
            },
        ],
        min_income: Some(2500.0),
        max_pti: Some(15.0),
        vehicle_restrictions: VehicleRestrictions {
            max_age: Some(12),
            max_mileage: Some(150_000),
        },
        max_warranty: Some(3000.0),
        max_gap: Some(1000.0),
        dealer_reserve: DealerReserve::Flat(2.0),
    }
}

pub(super) fn second_street_bank() -> LenderProfile {
    LenderProfile {
        id: "second-street".to_string(),
        name: "Second Street Bank".to_string(),
        credit_tiers: vec![CreditTier {
            name: "Standard".to_string(),
            min_score: 620,
            max_ltv: 115.0,
            max_term: Some(84),
            max_rate: 7.9,
        }],
        min_income: None,
        max_pti: None,
        vehicle_restrictions: VehicleRestrictions::default(),
        max_warranty: None,
        max_gap: None,
        dealer_reserve: DealerReserve::Tiered { percentage: 1.5 },
    }
}

pub(super) fn granite_auto_finance() -> LenderProfile {
    LenderProfile {
        id: "granite-auto".to_string(),
        name: "Granite Auto Finance".to_string(),
        credit_tiers: vec![CreditTier {
            name: "Prime".to_string(),
            min_score: 680,
            max_ltv: 110.0,
            max_term: Some(72),
            max_rate: 6.9,
        }],
        min_income: Some(5000.0),
        max_pti: Some(8.0),
        vehicle_restrictions: VehicleRestrictions {
            max_age: Some(8),
            max_mileage: Some(100_000),
        },
        max_warranty: Some(2500.0),
        max_gap: Some(800.0),
        dealer_reserve: DealerReserve::None,
    }
}

/// Lender configured so the base pass carries no dealer profit at all:
/// zero warranty cap, no reserve participation.
pub(super) fn metro_direct_lending() -> LenderProfile {
    LenderProfile {
        id: "metro-direct".to_string(),
        name: "Metro Direct Lending".to_string(),
        credit_tiers: vec![CreditTier {
            name: "Only".to_string(),
            min_score: 600,
            max_ltv: 100.0,
            max_term: Some(72),
            max_rate: 9.9,
        }],
        min_income: None,
        max_pti: None,
        vehicle_restrictions: VehicleRestrictions::default(),
        max_warranty: Some(0.0),
        max_gap: Some(0.0),
        dealer_reserve: DealerReserve::None,
    }
}

pub(super) fn panel() -> Vec<LenderProfile> {
    vec![harbor_credit_union(), second_street_bank()]
}

pub(super) fn analyzer_for(lenders: Vec<LenderProfile>) -> DealAnalyzer {
    DealAnalyzer::new(Arc::new(LenderCatalog::new(lenders)), EVAL_YEAR)
}

pub(super) fn analyzer() -> DealAnalyzer {
    analyzer_for(panel())
}

pub(super) fn optimizer_for(lenders: Vec<LenderProfile>) -> ProfitOptimizer {
    ProfitOptimizer::new(analyzer_for(lenders))
}

pub(super) fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected} within {tolerance}, got {actual}"
    );
}
