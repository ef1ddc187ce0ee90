// 💰 Budget Simulator - income vs monthly expenses
//
// Everything shown next to the budget form (totals, savings rate, the
// category breakdown and the advice line) is derived from a single
// `BudgetData` value and recomputed on every change.

use serde::{Deserialize, Serialize};

/// Savings rate below which the budget gets a warning
pub const LOW_SAVINGS_PERCENT: f64 = 10.0;

/// Savings rate that earns praise
pub const HEALTHY_SAVINGS_PERCENT: f64 = 20.0;

/// Share of income above which food spending is flagged
pub const FOOD_LIMIT_PERCENT: f64 = 30.0;

/// Share of income above which housing is flagged
pub const HOUSING_LIMIT_PERCENT: f64 = 35.0;

// ============================================================================
// BUDGET DATA
// ============================================================================

/// Missing fields read as 0, as every expense is optional
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetData {
    pub income: f64,
    pub housing: f64,
    pub food: f64,
    pub transport: f64,
    pub utilities: f64,
    pub entertainment: f64,
    pub others: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Housing,
    Food,
    Transport,
    Utilities,
    Entertainment,
    Others,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 6] = [
        ExpenseCategory::Housing,
        ExpenseCategory::Food,
        ExpenseCategory::Transport,
        ExpenseCategory::Utilities,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Housing => "Housing",
            ExpenseCategory::Food => "Food",
            ExpenseCategory::Transport => "Transport",
            ExpenseCategory::Utilities => "Utilities",
            ExpenseCategory::Entertainment => "Entertainment",
            ExpenseCategory::Others => "Others",
        }
    }
}

impl BudgetData {
    pub fn expense(&self, category: ExpenseCategory) -> f64 {
        match category {
            ExpenseCategory::Housing => self.housing,
            ExpenseCategory::Food => self.food,
            ExpenseCategory::Transport => self.transport,
            ExpenseCategory::Utilities => self.utilities,
            ExpenseCategory::Entertainment => self.entertainment,
            ExpenseCategory::Others => self.others,
        }
    }

    /// Replace one expense field, returning the new value
    pub fn with_expense(mut self, category: ExpenseCategory, amount: f64) -> Self {
        let slot = match category {
            ExpenseCategory::Housing => &mut self.housing,
            ExpenseCategory::Food => &mut self.food,
            ExpenseCategory::Transport => &mut self.transport,
            ExpenseCategory::Utilities => &mut self.utilities,
            ExpenseCategory::Entertainment => &mut self.entertainment,
            ExpenseCategory::Others => &mut self.others,
        };
        *slot = amount;
        self
    }

    pub fn total_expenses(&self) -> f64 {
        ExpenseCategory::ALL.iter().map(|c| self.expense(*c)).sum()
    }

    /// Share of income spent on `category`, 0 without income
    pub fn percent_of_income(&self, category: ExpenseCategory) -> f64 {
        if self.income > 0.0 {
            self.expense(category) / self.income * 100.0
        } else {
            0.0
        }
    }
}

// ============================================================================
// DERIVED VIEWS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetSummary {
    pub total_expenses: f64,

    /// Income minus expenses. Negative when overspending.
    pub savings: f64,

    pub savings_percentage: f64,
}

pub fn summarize(budget: &BudgetData) -> BudgetSummary {
    let total_expenses = budget.total_expenses();
    let savings = budget.income - total_expenses;
    let savings_percentage = if budget.income > 0.0 {
        savings / budget.income * 100.0
    } else {
        0.0
    };

    BudgetSummary {
        total_expenses,
        savings,
        savings_percentage,
    }
}

/// One slice of the expense chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySlice {
    pub category: ExpenseCategory,
    pub amount: f64,

    /// Share of total expenses, 0-100
    pub share: f64,
}

/// Non-zero expense categories with their share of total spending
pub fn breakdown(budget: &BudgetData) -> Vec<CategorySlice> {
    let total = budget.total_expenses();

    ExpenseCategory::ALL
        .iter()
        .filter(|c| budget.expense(**c) > 0.0)
        .map(|c| {
            let amount = budget.expense(*c);
            CategorySlice {
                category: *c,
                amount,
                share: amount / total * 100.0,
            }
        })
        .collect()
}

// ============================================================================
// SUGGESTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SuggestionKind {
    Warning,
    Success,
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: &'static str,
}

/// Advice for the budget. Rules are checked in priority order and the first
/// match wins. `None` until an income is entered.
pub fn suggestion(budget: &BudgetData) -> Option<Suggestion> {
    if budget.income <= 0.0 {
        return None;
    }

    let savings_percentage = summarize(budget).savings_percentage;

    let (kind, message) = if savings_percentage < LOW_SAVINGS_PERCENT {
        (
            SuggestionKind::Warning,
            "You are saving less than 10% of your income. Try cutting non-essential expenses.",
        )
    } else if budget.percent_of_income(ExpenseCategory::Food) > FOOD_LIMIT_PERCENT {
        (
            SuggestionKind::Warning,
            "Food takes more than 30% of your income. Plan meals and order less delivery.",
        )
    } else if budget.percent_of_income(ExpenseCategory::Housing) > HOUSING_LIMIT_PERCENT {
        (
            SuggestionKind::Warning,
            "Housing takes more than 35% of your income. See if you can renegotiate or find a cheaper option.",
        )
    } else if savings_percentage >= HEALTHY_SAVINGS_PERCENT {
        (
            SuggestionKind::Success,
            "Excellent! You are saving 20% or more of your income. Keep it up!",
        )
    } else {
        (
            SuggestionKind::Info,
            "Your budget is balanced. Keep tracking your spending regularly.",
        )
    };

    Some(Suggestion { kind, message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_read_as_zero() {
        let data: BudgetData = serde_json::from_str(r#"{"income": 3000.0, "food": 800.0}"#).unwrap();
        assert_eq!(data.income, 3000.0);
        assert_eq!(data.food, 800.0);
        assert_eq!(data.housing, 0.0);
        assert_eq!(data.others, 0.0);
        assert_eq!(data.total_expenses(), 800.0);
    }

    fn sample() -> BudgetData {
        BudgetData {
            income: 5000.0,
            housing: 1500.0,
            food: 800.0,
            transport: 300.0,
            utilities: 200.0,
            entertainment: 200.0,
            others: 500.0,
        }
    }

    #[test]
    fn test_summary() {
        let summary = summarize(&sample());

        assert_eq!(summary.total_expenses, 3500.0);
        assert_eq!(summary.savings, 1500.0);
        assert_eq!(summary.savings_percentage, 30.0);
    }

    #[test]
    fn test_summary_without_income() {
        let budget = BudgetData {
            food: 100.0,
            ..Default::default()
        };
        let summary = summarize(&budget);

        assert_eq!(summary.savings, -100.0);
        assert_eq!(summary.savings_percentage, 0.0);
        assert!(suggestion(&budget).is_none());
    }

    #[test]
    fn test_breakdown_skips_empty_categories() {
        let budget = BudgetData {
            income: 3000.0,
            housing: 750.0,
            food: 250.0,
            ..Default::default()
        };

        let slices = breakdown(&budget);

        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].category, ExpenseCategory::Housing);
        assert_eq!(slices[0].share, 75.0);
        assert_eq!(slices[1].category, ExpenseCategory::Food);
        assert_eq!(slices[1].share, 25.0);
        assert!(breakdown(&BudgetData::default()).is_empty());
    }

    #[test]
    fn test_low_savings_warning_wins() {
        // 5% savings and food over 30%: low savings is reported first
        let budget = BudgetData {
            income: 1000.0,
            food: 400.0,
            housing: 550.0,
            ..Default::default()
        };

        let advice = suggestion(&budget).unwrap();
        assert_eq!(advice.kind, SuggestionKind::Warning);
        assert!(advice.message.contains("10%"));
    }

    #[test]
    fn test_food_warning() {
        let budget = BudgetData {
            income: 1000.0,
            food: 310.0,
            ..Default::default()
        };

        let advice = suggestion(&budget).unwrap();
        assert_eq!(advice.kind, SuggestionKind::Warning);
        assert!(advice.message.contains("Food"));
    }

    #[test]
    fn test_housing_warning() {
        let budget = BudgetData {
            income: 1000.0,
            housing: 360.0,
            ..Default::default()
        };

        let advice = suggestion(&budget).unwrap();
        assert_eq!(advice.kind, SuggestionKind::Warning);
        assert!(advice.message.contains("Housing"));
    }

    #[test]
    fn test_success_and_info() {
        assert_eq!(suggestion(&sample()).unwrap().kind, SuggestionKind::Success);

        let balanced = BudgetData {
            income: 1000.0,
            housing: 300.0,
            food: 200.0,
            others: 350.0,
            ..Default::default()
        };
        assert_eq!(suggestion(&balanced).unwrap().kind, SuggestionKind::Info);
    }

    #[test]
    fn test_with_expense_replaces_field() {
        let budget = BudgetData::default()
            .with_expense(ExpenseCategory::Transport, 120.0)
            .with_expense(ExpenseCategory::Transport, 90.0);

        assert_eq!(budget.transport, 90.0);
        assert_eq!(budget.total_expenses(), 90.0);
    }
}
