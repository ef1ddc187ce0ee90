// 📈 Investment Simulator - compound growth with monthly contributions

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ============================================================================
// INVESTMENT TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::VeryLow => "Very Low",
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentType {
    pub name: String,

    /// Expected annual return as a fraction (0.12 = 12% a year)
    pub annual_rate: f64,

    pub risk_level: RiskLevel,
}

impl InvestmentType {
    pub fn new(name: &str, annual_rate: f64, risk_level: RiskLevel) -> Self {
        InvestmentType {
            name: name.to_string(),
            annual_rate,
            risk_level,
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate / 12.0
    }
}

/// Product classes offered by the simulator
pub struct InvestmentCatalog {
    types: Vec<InvestmentType>,
}

impl InvestmentCatalog {
    /// Catalog with the default product classes
    pub fn new() -> Self {
        InvestmentCatalog {
            types: vec![
                InvestmentType::new("Poupança", 0.06, RiskLevel::VeryLow),
                InvestmentType::new("Tesouro Selic", 0.12, RiskLevel::Low),
                InvestmentType::new("CDB", 0.13, RiskLevel::Low),
                InvestmentType::new("Fundos Imobiliários", 0.10, RiskLevel::Medium),
                InvestmentType::new("Ações", 0.15, RiskLevel::High),
                InvestmentType::new("Criptomoedas", 0.25, RiskLevel::VeryHigh),
            ],
        }
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&InvestmentType> {
        let wanted = name.trim().to_lowercase();
        self.types.iter().find(|t| t.name.to_lowercase() == wanted)
    }

    pub fn all(&self) -> &[InvestmentType] {
        &self.types
    }

    /// Default selection of the simulator form
    pub fn default_type(&self) -> &InvestmentType {
        &self.types[1]
    }
}

impl Default for InvestmentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// PROJECTION
// ============================================================================

/// One point of the growth chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub month: u32,

    /// Portfolio value, rounded to cents
    pub value: f64,

    /// Money put in so far
    pub invested: f64,
}

/// Month-by-month projection from month 0 to `months` inclusive.
///
/// Contributions go in at the start of each month and earn that month's
/// interest: `total = (total + monthly) * (1 + annual_rate / 12)`.
pub fn project(
    initial_amount: f64,
    monthly_contribution: f64,
    months: u32,
    annual_rate: f64,
) -> Vec<GrowthPoint> {
    let monthly_rate = annual_rate / 12.0;
    let mut total = initial_amount;
    let mut points = Vec::with_capacity(months as usize + 1);

    for month in 0..=months {
        if month > 0 {
            total = (total + monthly_contribution) * (1.0 + monthly_rate);
        }

        points.push(GrowthPoint {
            month,
            value: round_cents(total),
            invested: initial_amount + monthly_contribution * month as f64,
        });
    }

    debug!(months, annual_rate, final_value = total, "investment projected");

    points
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct InvestmentSummary {
    pub final_value: f64,
    pub total_invested: f64,
    pub earnings: f64,
    pub return_percentage: f64,
}

/// Totals taken from the last point of a projection
pub fn summarize(points: &[GrowthPoint]) -> InvestmentSummary {
    let Some(last) = points.last() else {
        return InvestmentSummary::default();
    };

    let earnings = last.value - last.invested;
    let return_percentage = if last.invested > 0.0 {
        earnings / last.invested * 100.0
    } else {
        0.0
    };

    InvestmentSummary {
        final_value: last.value,
        total_invested: last.invested,
        earnings,
        return_percentage,
    }
}

/// Write the projection as CSV (month,value,invested)
pub fn export_csv(points: &[GrowthPoint], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {:?}", path))?;

    for point in points {
        wtr.serialize(point).context("Failed to write growth point")?;
    }

    wtr.flush().context("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lookup() {
        let catalog = InvestmentCatalog::new();

        assert_eq!(catalog.all().len(), 6);
        assert_eq!(catalog.default_type().name, "Tesouro Selic");

        let cdb = catalog.find("cdb").unwrap();
        assert_eq!(cdb.annual_rate, 0.13);
        assert_eq!(cdb.risk_level, RiskLevel::Low);

        assert_eq!(catalog.find("CRIPTOMOEDAS").unwrap().risk_level, RiskLevel::VeryHigh);
        assert!(catalog.find("Lottery").is_none());
    }

    #[test]
    fn test_project_month_zero_is_initial() {
        let points = project(1000.0, 100.0, 12, 0.12);

        assert_eq!(points.len(), 13);
        assert_eq!(points[0].month, 0);
        assert_eq!(points[0].value, 1000.0);
        assert_eq!(points[0].invested, 1000.0);
        assert_eq!(points[12].invested, 2200.0);
    }

    #[test]
    fn test_project_compounds_with_contribution() {
        let points = project(1000.0, 100.0, 2, 0.12);

        // (1000 + 100) * 1.01 = 1111, (1111 + 100) * 1.01 = 1223.11
        assert_eq!(points[1].value, 1111.0);
        assert_eq!(points[2].value, 1223.11);
    }

    #[test]
    fn test_zero_rate_keeps_invested() {
        let points = project(500.0, 50.0, 10, 0.0);
        let summary = summarize(&points);

        assert_eq!(summary.final_value, 1000.0);
        assert_eq!(summary.total_invested, 1000.0);
        assert_eq!(summary.earnings, 0.0);
        assert_eq!(summary.return_percentage, 0.0);
    }

    #[test]
    fn test_summary_return() {
        let points = project(1000.0, 0.0, 1, 0.12);
        let summary = summarize(&points);

        assert_eq!(summary.final_value, 1010.0);
        assert!((summary.earnings - 10.0).abs() < 1e-9);
        assert!((summary.return_percentage - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_summary_of_nothing() {
        assert_eq!(summarize(&[]), InvestmentSummary::default());

        let points = project(0.0, 0.0, 5, 0.1);
        assert_eq!(summarize(&points).return_percentage, 0.0);
    }

    #[test]
    fn test_export_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growth.csv");

        export_csv(&project(100.0, 10.0, 3, 0.06), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "month,value,invested");
        assert!(lines[1].starts_with("0,100"));
    }
}
