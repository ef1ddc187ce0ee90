// Finance Education Toolkit - Core Library
// Simulators, quiz engine and scenario persistence, shared by the CLI and the TUI

pub mod budget;
pub mod config;
pub mod db;
pub mod debt;
pub mod input;
pub mod investment;
pub mod logging;
pub mod quiz;

// Re-export commonly used types
pub use budget::{BudgetData, BudgetSummary, CategorySlice, ExpenseCategory, Suggestion, SuggestionKind};
pub use config::AppConfig;
pub use db::{
    BudgetSnapshot, DebtScenario, InvestmentSnapshot, QuizResult,
    open_database, setup_database,
    save_debt_scenario, update_debt_scenario, get_debt_scenario, list_debt_scenarios, delete_debt_scenario,
    save_budget_snapshot, list_budget_snapshots, delete_budget_snapshot,
    save_investment_snapshot, list_investment_snapshots, delete_investment_snapshot,
    insert_question, set_question_active, get_active_questions, record_quiz_result, list_quiz_results,
};
pub use debt::{
    Debt, DebtId, DebtSet, PayoffComparison, PayoffEvent, PayoffPlan, SimulationResult, SortPolicy,
    MAX_MONTHS, compare, load_debts_csv, plan, simulate,
};
pub use input::{parse_amount, parse_months};
pub use investment::{GrowthPoint, InvestmentCatalog, InvestmentSummary, InvestmentType, RiskLevel, project};
pub use logging::init_logging;
pub use quiz::{AnswerOutcome, Performance, Question, QuestionBank, QuizError, QuizSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
