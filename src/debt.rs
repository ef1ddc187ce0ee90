// 💳 Debt Payoff Simulator - Snowball vs Avalanche
//
// Month-by-month paydown of a set of debts under a prioritization policy.
// The monthly payment pool is fixed up front (sum of the original minimums
// plus the extra payment). A paid-off debt simply stops taking a slice, so its
// freed minimum rolls into whatever is left for the top-priority debt.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Hard horizon of the simulation (50 years)
pub const MAX_MONTHS: u32 = 600;

// ============================================================================
// DEBT
// ============================================================================

/// Identity assigned when a debt joins a set. Also the tie-break for equal sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DebtId(pub u64);

impl fmt::Display for DebtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Debt {
    pub id: DebtId,
    pub name: String,

    /// Outstanding balance
    pub principal: f64,

    /// Annual interest rate in percent (20.0 = 20% a year)
    pub annual_rate_percent: f64,

    pub minimum_payment: f64,
}

impl Debt {
    /// Interest accrued over one month on the current balance
    pub fn monthly_interest(&self) -> f64 {
        self.principal * self.annual_rate_percent / 100.0 / 12.0
    }
}

// ============================================================================
// DEBT SET
// ============================================================================

/// Ordered collection of debts, edited only by adding and removing whole entries.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Debt>", into = "Vec<Debt>")]
pub struct DebtSet {
    debts: Vec<Debt>,
    next_id: u64,
}

impl DebtSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a debt. Entries without a name or with no balance are rejected,
    /// the same guard the entry form applies.
    pub fn add(
        &mut self,
        name: &str,
        principal: f64,
        annual_rate_percent: f64,
        minimum_payment: f64,
    ) -> Option<DebtId> {
        let name = name.trim();
        if name.is_empty() || !(principal > 0.0) {
            return None;
        }

        let id = DebtId(self.next_id);
        self.next_id += 1;

        self.debts.push(Debt {
            id,
            name: name.to_string(),
            principal,
            annual_rate_percent: annual_rate_percent.max(0.0),
            minimum_payment: minimum_payment.max(0.0),
        });

        Some(id)
    }

    /// Remove a debt by identity. Returns false if it was not in the set.
    pub fn remove(&mut self, id: DebtId) -> bool {
        let before = self.debts.len();
        self.debts.retain(|d| d.id != id);
        self.debts.len() != before
    }

    pub fn get(&self, id: DebtId) -> Option<&Debt> {
        self.debts.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Debt> {
        self.debts.iter()
    }

    pub fn len(&self) -> usize {
        self.debts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debts.is_empty()
    }

    pub fn total_principal(&self) -> f64 {
        self.debts.iter().map(|d| d.principal).sum()
    }

    pub fn total_minimum_payment(&self) -> f64 {
        self.debts.iter().map(|d| d.minimum_payment).sum()
    }

    /// Copy of the debts in payoff priority order (stable: insertion order breaks ties)
    pub fn sorted(&self, policy: SortPolicy) -> Vec<Debt> {
        let mut sorted = self.debts.clone();
        match policy {
            SortPolicy::SmallestBalanceFirst => {
                sorted.sort_by(|a, b| a.principal.total_cmp(&b.principal))
            }
            SortPolicy::HighestRateFirst => {
                sorted.sort_by(|a, b| b.annual_rate_percent.total_cmp(&a.annual_rate_percent))
            }
        }
        sorted
    }
}

/// Rebuilds a set from stored rows, applying the same rules as `add`:
/// blank names, non-positive balances and repeated ids are dropped, and
/// negative rates or minimums become 0.
impl From<Vec<Debt>> for DebtSet {
    fn from(rows: Vec<Debt>) -> Self {
        let mut seen = HashSet::new();
        let mut debts = Vec::with_capacity(rows.len());

        for mut debt in rows {
            if debt.name.trim().is_empty() || !(debt.principal > 0.0) || !seen.insert(debt.id) {
                warn!(id = %debt.id, name = %debt.name, "dropping invalid stored debt");
                continue;
            }
            debt.annual_rate_percent = debt.annual_rate_percent.max(0.0);
            debt.minimum_payment = debt.minimum_payment.max(0.0);
            debts.push(debt);
        }

        let next_id = debts.iter().map(|d| d.id.0 + 1).max().unwrap_or(0);
        DebtSet { debts, next_id }
    }
}

impl From<DebtSet> for Vec<Debt> {
    fn from(set: DebtSet) -> Self {
        set.debts
    }
}

/// CSV row: name,principal,annual_rate_percent,minimum_payment
#[derive(Debug, Deserialize)]
struct DebtRecord {
    name: String,
    principal: f64,
    annual_rate_percent: f64,
    minimum_payment: f64,
}

/// Load a debt set from CSV. Rows the entry form would reject are skipped.
pub fn load_debts_csv(csv_path: &Path) -> Result<DebtSet> {
    let mut rdr = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open debts CSV: {:?}", csv_path))?;

    let mut set = DebtSet::new();

    for (line, result) in rdr.deserialize().enumerate() {
        let record: DebtRecord = result.context("Failed to deserialize debt row")?;

        if set
            .add(
                &record.name,
                record.principal,
                record.annual_rate_percent,
                record.minimum_payment,
            )
            .is_none()
        {
            warn!(line = line + 2, name = %record.name, "skipping debt without name or balance");
        }
    }

    Ok(set)
}

// ============================================================================
// SORT POLICY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortPolicy {
    /// Snowball: smallest balance first
    SmallestBalanceFirst,

    /// Avalanche: highest annual rate first
    HighestRateFirst,
}

impl SortPolicy {
    pub const ALL: [SortPolicy; 2] = [SortPolicy::SmallestBalanceFirst, SortPolicy::HighestRateFirst];

    /// Name stored in the `method` column of saved scenarios
    pub fn method_name(&self) -> &'static str {
        match self {
            SortPolicy::SmallestBalanceFirst => "snowball",
            SortPolicy::HighestRateFirst => "avalanche",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SortPolicy::SmallestBalanceFirst => {
                "Pays the smallest balances first, building momentum"
            }
            SortPolicy::HighestRateFirst => {
                "Pays the highest interest rates first, saving the most money"
            }
        }
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method_name())
    }
}

impl FromStr for SortPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "snowball" | "smallest-balance-first" => Ok(SortPolicy::SmallestBalanceFirst),
            "avalanche" | "highest-rate-first" => Ok(SortPolicy::HighestRateFirst),
            other => anyhow::bail!("Unknown payoff method: {}", other),
        }
    }
}

// ============================================================================
// SIMULATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub months_to_payoff: u32,
    pub total_interest_paid: f64,
}

impl SimulationResult {
    /// False when the run hit the horizon without clearing every debt
    pub fn converged(&self) -> bool {
        self.months_to_payoff < MAX_MONTHS
    }
}

/// Month in which a debt reached zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffEvent {
    pub debt_id: DebtId,
    pub name: String,
    pub month: u32,
}

/// Full outcome of a run: totals plus the order debts were cleared in
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffPlan {
    pub policy: SortPolicy,
    pub result: SimulationResult,
    pub payoffs: Vec<PayoffEvent>,
}

/// Months to payoff and total interest for `debts` under `strategy`.
///
/// An empty set yields zero months and zero interest. A pool that never
/// outgrows the accruing interest runs to `MAX_MONTHS`.
pub fn simulate(debts: &DebtSet, extra_monthly_payment: f64, strategy: SortPolicy) -> SimulationResult {
    plan(debts, extra_monthly_payment, strategy).result
}

/// Same run as [`simulate`], also recording when each debt was cleared.
pub fn plan(debts: &DebtSet, extra_monthly_payment: f64, strategy: SortPolicy) -> PayoffPlan {
    let pool = debts.total_minimum_payment() + extra_monthly_payment;
    let mut remaining = debts.sorted(strategy);
    let mut payoffs = Vec::with_capacity(remaining.len());

    let mut months: u32 = 0;
    let mut total_interest = 0.0;

    while !remaining.is_empty() && months < MAX_MONTHS {
        months += 1;
        let mut available = pool;

        let mut i = 0;
        while i < remaining.len() {
            let debt = &mut remaining[i];

            // Accrue before paying, even in the month the debt clears
            let interest = debt.monthly_interest();
            total_interest += interest;
            debt.principal += interest;

            let offered = if i == 0 { available } else { debt.minimum_payment };
            let payment = offered.min(debt.principal);
            debt.principal -= payment;
            available -= payment;

            if debt.principal <= 0.0 {
                let paid = remaining.remove(i);
                payoffs.push(PayoffEvent {
                    debt_id: paid.id,
                    name: paid.name,
                    month: months,
                });
            } else {
                i += 1;
            }
        }
    }

    let result = SimulationResult {
        months_to_payoff: months,
        total_interest_paid: total_interest,
    };

    if !result.converged() {
        warn!(
            policy = %strategy,
            pool,
            remaining = remaining.len(),
            "payment pool did not clear the debts within {} months",
            MAX_MONTHS
        );
    }

    debug!(
        policy = %strategy,
        debts = debts.len(),
        months = result.months_to_payoff,
        interest = result.total_interest_paid,
        "debt payoff simulated"
    );

    PayoffPlan {
        policy: strategy,
        result,
        payoffs,
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

/// Both policies run over the same inputs, for side-by-side display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoffComparison {
    pub snowball: PayoffPlan,
    pub avalanche: PayoffPlan,
}

impl PayoffComparison {
    pub fn get(&self, policy: SortPolicy) -> &PayoffPlan {
        match policy {
            SortPolicy::SmallestBalanceFirst => &self.snowball,
            SortPolicy::HighestRateFirst => &self.avalanche,
        }
    }

    /// Interest avoided by choosing avalanche over snowball (negative if snowball is cheaper)
    pub fn interest_saved(&self) -> f64 {
        self.snowball.result.total_interest_paid - self.avalanche.result.total_interest_paid
    }

    /// Cheaper policy in total interest. Ties go to snowball.
    pub fn recommended(&self) -> SortPolicy {
        if self.avalanche.result.total_interest_paid < self.snowball.result.total_interest_paid {
            SortPolicy::HighestRateFirst
        } else {
            SortPolicy::SmallestBalanceFirst
        }
    }
}

/// Run both policies. `None` for an empty set.
pub fn compare(debts: &DebtSet, extra_monthly_payment: f64) -> Option<PayoffComparison> {
    if debts.is_empty() {
        return None;
    }

    Some(PayoffComparison {
        snowball: plan(debts, extra_monthly_payment, SortPolicy::SmallestBalanceFirst),
        avalanche: plan(debts, extra_monthly_payment, SortPolicy::HighestRateFirst),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn set(entries: &[(&str, f64, f64, f64)]) -> DebtSet {
        let mut debts = DebtSet::new();
        for (name, principal, rate, min) in entries {
            debts.add(name, *principal, *rate, *min).unwrap();
        }
        debts
    }

    fn card_and_loan() -> DebtSet {
        set(&[("Card", 1000.0, 20.0, 50.0), ("Loan", 5000.0, 8.0, 150.0)])
    }

    #[test]
    fn test_add_rejects_blank_name_and_zero_balance() {
        let mut debts = DebtSet::new();

        assert!(debts.add("", 100.0, 5.0, 10.0).is_none());
        assert!(debts.add("   ", 100.0, 5.0, 10.0).is_none());
        assert!(debts.add("Card", 0.0, 5.0, 10.0).is_none());
        assert!(debts.add("Card", f64::NAN, 5.0, 10.0).is_none());
        assert!(debts.is_empty());

        let id = debts.add("Card", 100.0, 5.0, 10.0);
        assert_eq!(id, Some(DebtId(0)));
        assert_eq!(debts.len(), 1);
    }

    #[test]
    fn test_remove_by_identity() {
        let mut debts = DebtSet::new();
        let a = debts.add("A", 100.0, 0.0, 10.0).unwrap();
        let b = debts.add("B", 200.0, 0.0, 10.0).unwrap();

        assert!(debts.remove(a));
        assert!(!debts.remove(a));
        assert_eq!(debts.len(), 1);
        assert!(debts.get(b).is_some());

        // Ids are never reused after removal
        let c = debts.add("C", 50.0, 0.0, 5.0).unwrap();
        assert_eq!(c, DebtId(2));
    }

    #[test]
    fn test_totals() {
        let debts = card_and_loan();
        assert_eq!(debts.total_principal(), 6000.0);
        assert_eq!(debts.total_minimum_payment(), 200.0);
    }

    #[test]
    fn test_simulate_does_not_mutate_input() {
        let debts = card_and_loan();
        let before = debts.clone();

        for policy in SortPolicy::ALL {
            simulate(&debts, 100.0, policy);
        }

        assert_eq!(debts, before);
    }

    #[test]
    fn test_empty_set_is_zero() {
        let result = simulate(&DebtSet::new(), 100.0, SortPolicy::HighestRateFirst);
        assert_eq!(result.months_to_payoff, 0);
        assert_eq!(result.total_interest_paid, 0.0);
        assert!(compare(&DebtSet::new(), 100.0).is_none());
    }

    #[test]
    fn test_zero_rate_single_debt_months() {
        let cases = [
            (1000.0, 100.0, 0.0),
            (1000.0, 75.0, 25.0),
            (1050.0, 100.0, 0.0),
            (999.0, 40.0, 10.0),
            (10.0, 50.0, 0.0),
        ];

        for (principal, min, extra) in cases {
            let debts = set(&[("Only", principal, 0.0, min)]);
            let result = simulate(&debts, extra, SortPolicy::SmallestBalanceFirst);

            let expected = (principal / (min + extra)).ceil() as u32;
            assert_eq!(result.months_to_payoff, expected, "P={} M={} E={}", principal, min, extra);
            assert_eq!(result.total_interest_paid, 0.0);
        }
    }

    #[test]
    fn test_non_convergence_hits_cap() {
        // 24% a year on 10k is 200/month of interest, more than the 100 pool
        let debts = set(&[("Sinkhole", 10_000.0, 24.0, 100.0)]);
        let result = simulate(&debts, 0.0, SortPolicy::HighestRateFirst);

        assert_eq!(result.months_to_payoff, MAX_MONTHS);
        assert!(!result.converged());
        assert!(result.total_interest_paid > 10_000.0);
    }

    #[test]
    fn test_zero_pool_hits_cap_without_interest() {
        let debts = set(&[("Frozen", 500.0, 0.0, 0.0)]);
        let result = simulate(&debts, 0.0, SortPolicy::SmallestBalanceFirst);

        assert_eq!(result.months_to_payoff, MAX_MONTHS);
        assert_eq!(result.total_interest_paid, 0.0);
    }

    #[test]
    fn test_bounds_hold() {
        let scenarios = [
            card_and_loan(),
            set(&[("A", 300.0, 3.0, 20.0), ("B", 8000.0, 35.0, 90.0), ("C", 1200.0, 12.0, 40.0)]),
            set(&[("Tiny", 1.0, 99.0, 0.0)]),
        ];

        for debts in &scenarios {
            for policy in SortPolicy::ALL {
                for extra in [0.0, 10.0, 500.0] {
                    let result = simulate(debts, extra, policy);
                    assert!(result.months_to_payoff <= MAX_MONTHS);
                    assert!(result.total_interest_paid >= 0.0);
                }
            }
        }
    }

    #[test]
    fn test_more_extra_helps_typical_portfolios() {
        let scenarios = [
            card_and_loan(),
            set(&[("A", 300.0, 3.0, 20.0), ("B", 8000.0, 35.0, 90.0), ("C", 1200.0, 12.0, 40.0)]),
            set(&[("Mortgage", 50_000.0, 9.0, 400.0)]),
        ];

        for debts in &scenarios {
            for policy in SortPolicy::ALL {
                let mut previous = simulate(debts, 0.0, policy);
                for extra in [25.0, 50.0, 100.0, 250.0, 1000.0] {
                    let current = simulate(debts, extra, policy);
                    assert!(current.months_to_payoff <= previous.months_to_payoff);
                    assert!(current.total_interest_paid <= previous.total_interest_paid + 1e-9);
                    previous = current;
                }
            }
        }
    }

    #[test]
    fn test_extra_can_cost_more_when_a_later_minimum_is_large() {
        // Without extra, Y's own minimum clears it in month 1. With extra, X is
        // cleared first and Y inherits the leftover pool, which is smaller
        // than its minimum.
        let debts = set(&[("X", 100.0, 5.0, 0.0), ("Y", 50.0, 5.0, 100.0)]);

        let without = simulate(&debts, 0.0, SortPolicy::HighestRateFirst);
        let with_extra = simulate(&debts, 20.0, SortPolicy::HighestRateFirst);

        assert!((without.total_interest_paid - 0.6267).abs() < 1e-3);
        assert!((with_extra.total_interest_paid - 0.7526).abs() < 1e-3);
        assert!(with_extra.total_interest_paid > without.total_interest_paid);
    }

    #[test]
    fn test_snowball_pays_smallest_first() {
        let debts = set(&[("B", 500.0, 0.0, 10.0), ("A", 100.0, 0.0, 10.0)]);
        let snowball = plan(&debts, 0.0, SortPolicy::SmallestBalanceFirst);

        let order: Vec<&str> = snowball.payoffs.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(order, vec!["A", "B"]);
    }

    #[test]
    fn test_equal_rates_keep_insertion_order() {
        let debts = set(&[("A", 100.0, 0.0, 10.0), ("B", 500.0, 0.0, 10.0)]);

        let snowball = plan(&debts, 0.0, SortPolicy::SmallestBalanceFirst);
        let avalanche = plan(&debts, 0.0, SortPolicy::HighestRateFirst);

        // A takes the whole 20 pool and clears in month 5; B's minimum went to A
        // that month, then B gets 20/month on the 460 left
        assert_eq!(snowball.payoffs[0].name, "A");
        assert_eq!(snowball.payoffs[0].month, 5);
        assert_eq!(snowball.result.months_to_payoff, 28);

        assert_eq!(avalanche.payoffs, snowball.payoffs);
        assert_eq!(avalanche.result, snowball.result);
    }

    #[test]
    fn test_avalanche_orders_by_rate() {
        let debts = set(&[("Low", 100.0, 5.0, 10.0), ("High", 500.0, 30.0, 10.0)]);
        let avalanche = plan(&debts, 50.0, SortPolicy::HighestRateFirst);

        assert_eq!(avalanche.payoffs[0].name, "High");
    }

    #[test]
    fn test_card_and_loan_avalanche_not_worse() {
        let debts = card_and_loan();
        let comparison = compare(&debts, 100.0).unwrap();

        assert!(
            comparison.avalanche.result.total_interest_paid
                <= comparison.snowball.result.total_interest_paid
        );
        assert!(comparison.interest_saved() >= 0.0);
        assert!(comparison.snowball.result.converged());
    }

    #[test]
    fn test_avalanche_saves_when_big_debt_is_expensive() {
        let debts = set(&[("Store", 500.0, 5.0, 25.0), ("Card", 6000.0, 28.0, 120.0)]);
        let comparison = compare(&debts, 200.0).unwrap();

        assert!(comparison.interest_saved() > 0.0);
        assert_eq!(comparison.recommended(), SortPolicy::HighestRateFirst);
    }

    #[test]
    fn test_idempotent() {
        let debts = card_and_loan();
        for policy in SortPolicy::ALL {
            assert_eq!(simulate(&debts, 100.0, policy), simulate(&debts, 100.0, policy));
        }
    }

    #[test]
    fn test_freed_minimum_rolls_into_next_month() {
        // Pool is 60. Month 1: A takes 60 of its 50 balance → cleared, B at index 0
        // then gets the 10 left over. From month 2 on B gets the whole 60.
        let debts = set(&[("A", 50.0, 0.0, 30.0), ("B", 130.0, 0.0, 30.0)]);
        let snowball = plan(&debts, 0.0, SortPolicy::SmallestBalanceFirst);

        assert_eq!(snowball.payoffs[0].month, 1);
        // B: 130 - 10 = 120 after month 1, then 60 + 60
        assert_eq!(snowball.payoffs[1].month, 3);
    }

    #[test]
    fn test_policy_names_round_trip_through_from_str() {
        for policy in SortPolicy::ALL {
            assert_eq!(policy.method_name().parse::<SortPolicy>().unwrap(), policy);
        }
        assert!("random".parse::<SortPolicy>().is_err());
    }

    #[test]
    fn test_debt_set_json_keeps_ids() {
        let mut debts = card_and_loan();
        debts.remove(DebtId(0));

        let json = serde_json::to_string(&debts).unwrap();
        let mut restored: DebtSet = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored.iter().next().unwrap().id, DebtId(1));
        assert_eq!(restored.add("New", 10.0, 0.0, 1.0), Some(DebtId(2)));
    }

    #[test]
    fn test_debt_set_json_applies_add_rules() {
        let json = r#"[
            {"id": 0, "name": "Card", "principal": 1000.0, "annual_rate_percent": -5.0, "minimum_payment": -20.0},
            {"id": 0, "name": "Copy", "principal": 50.0, "annual_rate_percent": 1.0, "minimum_payment": 5.0},
            {"id": 1, "name": "  ", "principal": 50.0, "annual_rate_percent": 1.0, "minimum_payment": 5.0},
            {"id": 2, "name": "Paid", "principal": -10.0, "annual_rate_percent": 1.0, "minimum_payment": 5.0},
            {"id": 3, "name": "Loan", "principal": 500.0, "annual_rate_percent": 8.0, "minimum_payment": 30.0}
        ]"#;

        let restored: DebtSet = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = restored.iter().map(|d| d.name.as_str()).collect();

        assert_eq!(names, vec!["Card", "Loan"]);
        let card = restored.get(DebtId(0)).unwrap();
        assert_eq!(card.annual_rate_percent, 0.0);
        assert_eq!(card.minimum_payment, 0.0);
    }

    #[test]
    fn test_load_debts_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,principal,annual_rate_percent,minimum_payment").unwrap();
        writeln!(file, "Card,1000,20,50").unwrap();
        writeln!(file, ",300,5,10").unwrap();
        writeln!(file, "Loan,5000,8,150").unwrap();
        file.flush().unwrap();

        let debts = load_debts_csv(file.path()).unwrap();

        assert_eq!(debts.len(), 2);
        let names: Vec<&str> = debts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Card", "Loan"]);
    }
}
