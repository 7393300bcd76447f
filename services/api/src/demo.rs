use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, Local};
use clap::Args;
use deal_desk::engine::{
    AnalysisResult, DealAnalyzer, DealInput, LenderCatalog, OptimizationOutcome,
    OptimizationResult, ProfitOptimizer,
};
use deal_desk::error::AppError;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Pin the evaluation year used for vehicle-age math (defaults to the current year)
    #[arg(long)]
    pub(crate) evaluation_year: Option<i32>,
}

#[derive(Args, Debug)]
pub(crate) struct AnalyzeArgs {
    /// Applicant credit score
    #[arg(long)]
    pub(crate) credit_score: u16,
    /// Gross monthly income in dollars
    #[arg(long)]
    pub(crate) monthly_income: f64,
    /// Existing monthly debt service in dollars
    #[arg(long, default_value_t = 0.0)]
    pub(crate) monthly_debt: f64,
    /// Vehicle selling price in dollars
    #[arg(long)]
    pub(crate) vehicle_price: f64,
    /// Cash down payment in dollars
    #[arg(long, default_value_t = 0.0)]
    pub(crate) down_payment: f64,
    /// Vehicle model year
    #[arg(long)]
    pub(crate) vehicle_year: i32,
    /// Vehicle odometer miles
    #[arg(long, default_value_t = 0)]
    pub(crate) vehicle_miles: u32,
    /// Lender rate-sheet JSON file (defaults to the bundled sample panel)
    #[arg(long)]
    pub(crate) lenders: Option<PathBuf>,
    /// Pin the evaluation year used for vehicle-age math
    #[arg(long)]
    pub(crate) evaluation_year: Option<i32>,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let year = args.evaluation_year.unwrap_or_else(|| Local::now().year());
    let desk = desk_over(crate::infra::sample_catalog(), year);

    let deal = DealInput {
        credit_score: 735,
        monthly_income: 5800.0,
        monthly_debt: 1450.0,
        vehicle_price: 28_500.0,
        down_payment: 2500.0,
        vehicle_year: year - 3,
        vehicle_miles: 41_000,
    };

    println!("Deal desk demo (evaluation year {year})");
    println!(
        "Buyer: score {}, income ${:.0}/mo, debt ${:.0}/mo",
        deal.credit_score, deal.monthly_income, deal.monthly_debt
    );
    println!(
        "Vehicle: {} with {} miles at ${:.0}, ${:.0} down\n",
        deal.vehicle_year, deal.vehicle_miles, deal.vehicle_price, deal.down_payment
    );

    let results = desk.analyzer().analyze(&deal);
    render_analysis(&results);

    match desk.optimize(&deal) {
        OptimizationOutcome::Optimized(result) => render_optimization(&result),
        OptimizationOutcome::NoEligibleLender => {
            println!("No lender on the panel will carry this deal.")
        }
    }

    Ok(())
}

pub(crate) fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let year = args.evaluation_year.unwrap_or_else(|| Local::now().year());
    let catalog = match &args.lenders {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(source) => LenderCatalog::from_json_str(&source),
            Err(error) => {
                eprintln!(
                    "warning: lender catalog {} unreadable ({error}), using empty panel",
                    path.display()
                );
                LenderCatalog::empty()
            }
        },
        None => crate::infra::sample_catalog(),
    };

    let deal = DealInput {
        credit_score: args.credit_score,
        monthly_income: args.monthly_income,
        monthly_debt: args.monthly_debt,
        vehicle_price: args.vehicle_price,
        down_payment: args.down_payment,
        vehicle_year: args.vehicle_year,
        vehicle_miles: args.vehicle_miles,
    };

    let desk = desk_over(catalog, year);
    let results = desk.analyzer().analyze(&deal);
    render_analysis(&results);

    match desk.optimize(&deal) {
        OptimizationOutcome::Optimized(result) => render_optimization(&result),
        OptimizationOutcome::NoEligibleLender => {
            println!("No lender on the panel will carry this deal.")
        }
    }

    Ok(())
}

fn desk_over(catalog: LenderCatalog, evaluation_year: i32) -> ProfitOptimizer {
    ProfitOptimizer::new(DealAnalyzer::new(Arc::new(catalog), evaluation_year))
}

fn render_analysis(results: &[AnalysisResult]) {
    if results.is_empty() {
        println!("No eligible lenders for this deal.");
        return;
    }

    println!("Ranked approvals:");
    for (rank, result) in results.iter().enumerate() {
        let structure = &result.structure;
        println!(
            "  {}. {} / {}  confidence {:.0}",
            rank + 1,
            result.lender_name,
            result.tier_name,
            result.approval_confidence
        );
        println!(
            "     ${:.2} over {} mo at {:.2}% = ${:.2}/mo, dealer profit ${:.2}",
            structure.approved_loan_amount,
            structure.term,
            structure.rate,
            structure.monthly_payment,
            structure.total_dealer_profit
        );
    }
}

fn render_optimization(result: &OptimizationResult) {
    let original = &result.original.structure;
    let optimized = &result.optimized.structure;

    println!("\nProfit-optimized structure ({}):", result.original.lender_name);
    println!(
        "  rate {:.2}% -> {:.2}%, term {} -> {} mo, payment ${:.2} -> ${:.2}",
        original.rate,
        optimized.rate,
        original.term,
        optimized.term,
        original.monthly_payment,
        optimized.monthly_payment
    );
    for product in &optimized.backend_products {
        println!(
            "  + {} ${:.2} (margin ${:.2})",
            product.name, product.amount, product.profit
        );
    }
    println!(
        "  dealer profit ${:.2} -> ${:.2} ({})",
        original.total_dealer_profit,
        optimized.total_dealer_profit,
        result
            .profit_increase_percent
            .map(|percent| format!("{percent:+.1}%"))
            .unwrap_or_else(|| "baseline had no profit".to_string())
    );
    println!(
        "  approval confidence {:.1} -> {:.1}",
        result.original.approval_confidence, result.optimized.approval_confidence
    );
}
