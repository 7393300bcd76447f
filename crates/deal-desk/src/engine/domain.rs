use serde::de::Deserializer;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Buyer, vehicle, and cash-down snapshot submitted for analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealInput {
    pub credit_score: u16,
    pub monthly_income: f64,
    pub monthly_debt: f64,
    pub vehicle_price: f64,
    pub down_payment: f64,
    pub vehicle_year: i32,
    pub vehicle_miles: u32,
}

/// Credit-score-banded eligibility and pricing bracket owned by one lender.
///
/// Tiers must be configured in descending `min_score` order; the engine selects
/// the first tier whose floor the applicant clears and never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTier {
    pub name: String,
    pub min_score: u16,
    pub max_ltv: f64,
    #[serde(default)]
    pub max_term: Option<u32>,
    pub max_rate: f64,
}

/// Term ceiling applied when a tier leaves the maximum unconfigured.
pub const DEFAULT_MAX_TERM: u32 = 72;

impl CreditTier {
    /// Configured term ceiling, falling back to the panel-wide default.
    pub fn term_ceiling(&self) -> u32 {
        self.max_term.unwrap_or(DEFAULT_MAX_TERM)
    }
}

/// Collateral gates a lender places on the vehicle itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleRestrictions {
    #[serde(default)]
    pub max_age: Option<u32>,
    #[serde(default)]
    pub max_mileage: Option<u32>,
}

/// Reserve participation a lender pays the seller, as configured.
///
/// Rate sheets express this either as a bare percentage or as a nested
/// `{ "percentage": n }` object; anything else degrades to `None` (reserve 0)
/// rather than failing catalog construction.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DealerReserve {
    Flat(f64),
    Tiered {
        percentage: f64,
    },
    #[default]
    None,
}

impl DealerReserve {
    pub(crate) fn from_value(value: &serde_json::Value) -> Self {
        if let Some(percentage) = value.as_f64() {
            return DealerReserve::Flat(percentage);
        }
        if let Some(percentage) = value
            .as_object()
            .and_then(|object| object.get("percentage"))
            .and_then(serde_json::Value::as_f64)
        {
            return DealerReserve::Tiered { percentage };
        }
        DealerReserve::None
    }

    /// Participation percentage of the approved amount; zero when unconfigured.
    pub fn percentage(&self) -> f64 {
        match self {
            DealerReserve::Flat(percentage) => *percentage,
            DealerReserve::Tiered { percentage } => *percentage,
            DealerReserve::None => 0.0,
        }
    }
}

impl<'de> Deserialize<'de> for DealerReserve {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(DealerReserve::from_value(&value))
    }
}

impl Serialize for DealerReserve {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            DealerReserve::Flat(percentage) => serializer.serialize_f64(*percentage),
            DealerReserve::Tiered { percentage } => {
                let mut state = serializer.serialize_struct("DealerReserve", 1)?;
                state.serialize_field("percentage", percentage)?;
                state.end()
            }
            DealerReserve::None => serializer.serialize_none(),
        }
    }
}

/// One lender's underwriting program as supplied by the rate-sheet catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LenderProfile {
    pub id: String,
    pub name: String,
    pub credit_tiers: Vec<CreditTier>,
    #[serde(default)]
    pub min_income: Option<f64>,
    #[serde(default)]
    pub max_pti: Option<f64>,
    #[serde(default)]
    pub vehicle_restrictions: VehicleRestrictions,
    #[serde(default)]
    pub max_warranty: Option<f64>,
    #[serde(default)]
    pub max_gap: Option<f64>,
    #[serde(default)]
    pub dealer_reserve: DealerReserve,
}

/// Ancillary add-on sold alongside financing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendProduct {
    pub name: String,
    pub amount: f64,
    pub dealer_cost: f64,
    pub profit: f64,
}

impl BackendProduct {
    /// Price a product from its retail amount and the dealer's cost share.
    pub fn priced(name: &str, amount: f64, cost_share: f64) -> Self {
        let dealer_cost = amount * cost_share;
        Self {
            name: name.to_string(),
            amount,
            dealer_cost,
            profit: amount - dealer_cost,
        }
    }
}

/// Complete financing structure for one lender/tier match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingStructure {
    pub approved_loan_amount: f64,
    /// Echoes the submitted down payment even when the LTV cap leaves a
    /// financing gap; the engine never rewrites the buyer's cash position.
    pub recommended_down_payment: f64,
    pub term: u32,
    pub rate: f64,
    pub monthly_payment: f64,
    pub backend_products: Vec<BackendProduct>,
    pub dealer_reserve: f64,
    pub total_dealer_profit: f64,
}

impl FinancingStructure {
    /// Combined retail amount across backend products.
    pub fn backend_amount(&self) -> f64 {
        self.backend_products
            .iter()
            .map(|product| product.amount)
            .sum()
    }
}

/// One lender's candidate structure with its approval-likelihood score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub lender_name: String,
    pub tier_name: String,
    pub structure: FinancingStructure,
    pub approval_confidence: f64,
}

/// Side-by-side outcome of the profit pass over the winning structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub original: AnalysisResult,
    pub optimized: AnalysisResult,
    pub profit_increase: f64,
    /// `None` when the original structure carried no dealer profit, so the
    /// relative gain is undefined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_increase_percent: Option<f64>,
}

/// Outcome of the optimize operation; ineligibility is a value, not a fault.
#[derive(Debug, Clone, PartialEq)]
pub enum OptimizationOutcome {
    Optimized(OptimizationResult),
    NoEligibleLender,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dealer_reserve_resolves_flat_numbers() {
        let reserve = DealerReserve::from_value(&json!(1.5));
        assert_eq!(reserve, DealerReserve::Flat(1.5));
        assert!((reserve.percentage() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn dealer_reserve_resolves_nested_percentage() {
        let reserve = DealerReserve::from_value(&json!({ "percentage": 2.0 }));
        assert_eq!(reserve, DealerReserve::Tiered { percentage: 2.0 });
        assert!((reserve.percentage() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn dealer_reserve_degrades_on_unrecognized_shapes() {
        for shape in [
            json!("2.0"),
            json!({ "points": 2.0 }),
            json!([1.0, 2.0]),
            json!(null),
        ] {
            assert_eq!(DealerReserve::from_value(&shape), DealerReserve::None);
        }
    }

    #[test]
    fn lender_profile_deserializes_with_sparse_fields() {
        let lender: LenderProfile = serde_json::from_value(json!({
            "id": "cu-1",
            "name": "Harbor Credit Union",
            "credit_tiers": [
                { "name": "A", "min_score": 700, "max_ltv": 120.0, "max_rate": 5.9 }
            ]
        }))
        .expect("sparse lender parses");

        assert_eq!(lender.dealer_reserve, DealerReserve::None);
        assert_eq!(lender.credit_tiers[0].term_ceiling(), DEFAULT_MAX_TERM);
        assert!(lender.min_income.is_none());
        assert!(lender.vehicle_restrictions.max_age.is_none());
    }

    #[test]
    fn priced_products_compute_profit_from_cost_share() {
        let product = BackendProduct::priced("Extended Warranty", 3000.0, 0.45);
        assert!((product.dealer_cost - 1350.0).abs() < f64::EPSILON);
        assert!((product.profit - 1650.0).abs() < f64::EPSILON);
    }
}
