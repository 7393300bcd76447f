use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use deal_desk::config::CatalogConfig;
use deal_desk::engine::{
    CreditTier, DealerReserve, LenderCatalog, LenderProfile, VehicleRestrictions,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Build the startup catalog from the configured rate-sheet path.
///
/// Any failure along the way (no path, unreadable file, malformed document)
/// degrades to an empty panel so the service still boots and answers.
pub(crate) fn load_catalog(config: &CatalogConfig) -> LenderCatalog {
    let Some(path) = config.lenders_path.as_deref() else {
        warn!("no lender catalog configured, starting with an empty panel");
        return LenderCatalog::empty();
    };

    read_catalog(path)
}

fn read_catalog(path: &Path) -> LenderCatalog {
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let catalog = LenderCatalog::from_json_str(&source);
            info!(lenders = catalog.len(), path = %path.display(), "lender catalog loaded");
            catalog
        }
        Err(error) => {
            warn!(%error, path = %path.display(), "lender catalog unreadable, starting with an empty panel");
            LenderCatalog::empty()
        }
    }
}

/// Small in-process panel used by the demo and analyze subcommands when no
/// rate-sheet file is supplied.
pub(crate) fn sample_catalog() -> LenderCatalog {
    LenderCatalog::new(vec![
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
        },
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
        },
        LenderProfile {
            id: "granite-auto".to_string(),
            name: "Granite Auto Finance".to_string(),
            credit_tiers: vec![
                CreditTier {
                    name: "Prime".to_string(),
                    min_score: 680,
                    max_ltv: 110.0,
                    max_term: Some(72),
                    max_rate: 6.9,
                },
                CreditTier {
                    name: "Near Prime".to_string(),
                    min_score: 620,
                    max_ltv: 105.0,
                    max_term: Some(66),
                    max_rate: 10.4,
                },
            ],
            min_income: Some(3000.0),
            max_pti: Some(12.0),
            vehicle_restrictions: VehicleRestrictions {
                max_age: Some(8),
                max_mileage: Some(100_000),
            },
            max_warranty: Some(2500.0),
            max_gap: Some(800.0),
            dealer_reserve: DealerReserve::None,
        },
    ])
}
