// 🗄️ Scenario Store - SQLite persistence for saved simulations
//
// Simulations themselves are never cached. What gets stored are the inputs a
// user chose to keep (named snapshots), plus quiz questions and results.
// Every snapshot belongs to an opaque user id and carries created/updated
// timestamps.

use crate::budget::BudgetData;
use crate::debt::{DebtSet, SortPolicy};
use crate::quiz::Question;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

// ============================================================================
// RECORDS
// ============================================================================

/// Saved debt payoff scenario (debt_calculations table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtScenario {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub debts: DebtSet,
    pub method: SortPolicy,
    pub extra_payment: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved budget (budget_simulations table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetSnapshot {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub budget: BudgetData,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Saved investment projection (investment_simulations table)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSnapshot {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub initial_amount: f64,
    pub monthly_contribution: f64,
    pub time_months: u32,
    pub investment_type: String,
    pub final_value: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: String,
    pub user_id: String,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Open (or create) the database file and make sure the schema exists
pub fn open_database(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database: {:?}", db_path))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS debt_calculations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            debts TEXT NOT NULL,
            method TEXT NOT NULL,
            extra_payment REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS budget_simulations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            income REAL NOT NULL,
            housing REAL,
            food REAL,
            transport REAL,
            utilities REAL,
            entertainment REAL,
            others REAL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS investment_simulations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            name TEXT NOT NULL,
            initial_amount REAL NOT NULL,
            monthly_contribution REAL NOT NULL,
            time_months INTEGER NOT NULL,
            investment_type TEXT NOT NULL,
            final_value REAL NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS quiz_questions (
            id TEXT PRIMARY KEY,
            question TEXT NOT NULL,
            options TEXT NOT NULL,
            correct_answer INTEGER NOT NULL,
            explanation TEXT NOT NULL,
            active INTEGER DEFAULT 1,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS quiz_results (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL,
            score INTEGER NOT NULL,
            total_questions INTEGER NOT NULL,
            completed_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_debt_calculations_user ON debt_calculations(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_budget_simulations_user ON budget_simulations(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_investment_simulations_user ON investment_simulations(user_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_quiz_results_user ON quiz_results(user_id)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// ROW HELPERS
// ============================================================================

fn get_timestamp(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_json<T: serde::de::DeserializeOwned>(row: &Row, idx: usize) -> rusqlite::Result<T> {
    let text: String = row.get(idx)?;
    serde_json::from_str(&text)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn get_method(row: &Row, idx: usize) -> rusqlite::Result<SortPolicy> {
    let text: String = row.get(idx)?;
    text.parse::<SortPolicy>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into())
    })
}

fn get_answer_index(row: &Row, idx: usize) -> rusqlite::Result<usize> {
    let value: i64 = row.get(idx)?;
    usize::try_from(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}

/// Delete by primary key. Missing rows are an error.
fn delete_by_id(conn: &Connection, table: &str, id: &str) -> Result<()> {
    let deleted = conn.execute(&format!("DELETE FROM {} WHERE id = ?1", table), [id])?;
    if deleted == 0 {
        anyhow::bail!("No {} row with id {}", table, id);
    }

    info!(table, id, "snapshot deleted");
    Ok(())
}

// ============================================================================
// DEBT SCENARIOS
// ============================================================================

const DEBT_COLUMNS: &str =
    "id, user_id, name, debts, method, extra_payment, created_at, updated_at";

fn debt_scenario_from_row(row: &Row) -> rusqlite::Result<DebtScenario> {
    let extra_payment: Option<f64> = row.get(5)?;

    Ok(DebtScenario {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        debts: get_json(row, 3)?,
        method: get_method(row, 4)?,
        extra_payment: extra_payment.unwrap_or(0.0),
        created_at: get_timestamp(row, 6)?,
        updated_at: get_timestamp(row, 7)?,
    })
}

pub fn save_debt_scenario(
    conn: &Connection,
    user_id: &str,
    name: &str,
    debts: &DebtSet,
    method: SortPolicy,
    extra_payment: f64,
) -> Result<DebtScenario> {
    let now = Utc::now();
    let scenario = DebtScenario {
        id: new_id(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        debts: debts.clone(),
        method,
        extra_payment,
        created_at: now,
        updated_at: now,
    };

    let debts_json = serde_json::to_string(&scenario.debts)?;

    conn.execute(
        &format!(
            "INSERT INTO debt_calculations ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            DEBT_COLUMNS
        ),
        params![
            scenario.id,
            scenario.user_id,
            scenario.name,
            debts_json,
            scenario.method.method_name(),
            scenario.extra_payment,
            scenario.created_at.to_rfc3339(),
            scenario.updated_at.to_rfc3339(),
        ],
    )?;

    info!(id = %scenario.id, name, debts = debts.len(), "debt scenario saved");
    Ok(scenario)
}

/// Replace the stored values of an existing scenario, refreshing `updated_at`
pub fn update_debt_scenario(conn: &Connection, scenario: &DebtScenario) -> Result<DebtScenario> {
    let mut updated = scenario.clone();
    updated.updated_at = Utc::now();

    let debts_json = serde_json::to_string(&updated.debts)?;

    let changed = conn.execute(
        "UPDATE debt_calculations
         SET name = ?1, debts = ?2, method = ?3, extra_payment = ?4, updated_at = ?5
         WHERE id = ?6",
        params![
            updated.name,
            debts_json,
            updated.method.method_name(),
            updated.extra_payment,
            updated.updated_at.to_rfc3339(),
            updated.id,
        ],
    )?;

    if changed == 0 {
        anyhow::bail!("No debt scenario with id {}", scenario.id);
    }

    info!(id = %updated.id, "debt scenario updated");
    Ok(updated)
}

pub fn get_debt_scenario(conn: &Connection, id: &str) -> Result<Option<DebtScenario>> {
    let scenario = conn
        .query_row(
            &format!("SELECT {} FROM debt_calculations WHERE id = ?1", DEBT_COLUMNS),
            [id],
            debt_scenario_from_row,
        )
        .optional()?;

    Ok(scenario)
}

/// Scenarios of one user, newest first
pub fn list_debt_scenarios(conn: &Connection, user_id: &str) -> Result<Vec<DebtScenario>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM debt_calculations WHERE user_id = ?1 ORDER BY created_at DESC, rowid DESC",
        DEBT_COLUMNS
    ))?;

    let scenarios = stmt
        .query_map([user_id], debt_scenario_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(scenarios)
}

pub fn delete_debt_scenario(conn: &Connection, id: &str) -> Result<()> {
    delete_by_id(conn, "debt_calculations", id)
}

// ============================================================================
// BUDGET SNAPSHOTS
// ============================================================================

pub fn save_budget_snapshot(
    conn: &Connection,
    user_id: &str,
    name: &str,
    budget: &BudgetData,
) -> Result<BudgetSnapshot> {
    let now = Utc::now();
    let snapshot = BudgetSnapshot {
        id: new_id(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        budget: *budget,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO budget_simulations (
            id, user_id, name, income, housing, food, transport, utilities,
            entertainment, others, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            snapshot.id,
            snapshot.user_id,
            snapshot.name,
            budget.income,
            budget.housing,
            budget.food,
            budget.transport,
            budget.utilities,
            budget.entertainment,
            budget.others,
            snapshot.created_at.to_rfc3339(),
            snapshot.updated_at.to_rfc3339(),
        ],
    )?;

    info!(id = %snapshot.id, name, "budget snapshot saved");
    Ok(snapshot)
}

pub fn list_budget_snapshots(conn: &Connection, user_id: &str) -> Result<Vec<BudgetSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, income, housing, food, transport, utilities,
                entertainment, others, created_at, updated_at
         FROM budget_simulations
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let snapshots = stmt
        .query_map([user_id], |row| {
            // Expense columns are nullable; a missing value means nothing spent
            let expense = |idx: usize| -> rusqlite::Result<f64> {
                Ok(row.get::<_, Option<f64>>(idx)?.unwrap_or(0.0))
            };

            Ok(BudgetSnapshot {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                budget: BudgetData {
                    income: row.get(3)?,
                    housing: expense(4)?,
                    food: expense(5)?,
                    transport: expense(6)?,
                    utilities: expense(7)?,
                    entertainment: expense(8)?,
                    others: expense(9)?,
                },
                created_at: get_timestamp(row, 10)?,
                updated_at: get_timestamp(row, 11)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(snapshots)
}

pub fn delete_budget_snapshot(conn: &Connection, id: &str) -> Result<()> {
    delete_by_id(conn, "budget_simulations", id)
}

// ============================================================================
// INVESTMENT SNAPSHOTS
// ============================================================================

#[allow(clippy::too_many_arguments)]
pub fn save_investment_snapshot(
    conn: &Connection,
    user_id: &str,
    name: &str,
    initial_amount: f64,
    monthly_contribution: f64,
    time_months: u32,
    investment_type: &str,
    final_value: f64,
) -> Result<InvestmentSnapshot> {
    let now = Utc::now();
    let snapshot = InvestmentSnapshot {
        id: new_id(),
        user_id: user_id.to_string(),
        name: name.to_string(),
        initial_amount,
        monthly_contribution,
        time_months,
        investment_type: investment_type.to_string(),
        final_value,
        created_at: now,
        updated_at: now,
    };

    conn.execute(
        "INSERT INTO investment_simulations (
            id, user_id, name, initial_amount, monthly_contribution, time_months,
            investment_type, final_value, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            snapshot.id,
            snapshot.user_id,
            snapshot.name,
            snapshot.initial_amount,
            snapshot.monthly_contribution,
            snapshot.time_months,
            snapshot.investment_type,
            snapshot.final_value,
            snapshot.created_at.to_rfc3339(),
            snapshot.updated_at.to_rfc3339(),
        ],
    )?;

    info!(id = %snapshot.id, name, investment_type, "investment snapshot saved");
    Ok(snapshot)
}

pub fn list_investment_snapshots(
    conn: &Connection,
    user_id: &str,
) -> Result<Vec<InvestmentSnapshot>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, initial_amount, monthly_contribution, time_months,
                investment_type, final_value, created_at, updated_at
         FROM investment_simulations
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC",
    )?;

    let snapshots = stmt
        .query_map([user_id], |row| {
            Ok(InvestmentSnapshot {
                id: row.get(0)?,
                user_id: row.get(1)?,
                name: row.get(2)?,
                initial_amount: row.get(3)?,
                monthly_contribution: row.get(4)?,
                time_months: row.get(5)?,
                investment_type: row.get(6)?,
                final_value: row.get(7)?,
                created_at: get_timestamp(row, 8)?,
                updated_at: get_timestamp(row, 9)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(snapshots)
}

pub fn delete_investment_snapshot(conn: &Connection, id: &str) -> Result<()> {
    delete_by_id(conn, "investment_simulations", id)
}

// ============================================================================
// QUIZ
// ============================================================================

/// Insert or replace a question (options stored as a JSON array)
pub fn insert_question(conn: &Connection, question: &Question) -> Result<()> {
    let options_json = serde_json::to_string(&question.options)?;

    conn.execute(
        "INSERT OR REPLACE INTO quiz_questions (
            id, question, options, correct_answer, explanation, active, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)",
        params![
            question.id,
            question.question,
            options_json,
            question.correct_answer as i64,
            question.explanation,
            Utc::now().to_rfc3339(),
        ],
    )?;

    Ok(())
}

pub fn set_question_active(conn: &Connection, id: &str, active: bool) -> Result<()> {
    let changed = conn.execute(
        "UPDATE quiz_questions SET active = ?1 WHERE id = ?2",
        params![active, id],
    )?;

    if changed == 0 {
        anyhow::bail!("No quiz question with id {}", id);
    }
    Ok(())
}

/// Active questions in insertion order. A NULL `active` counts as active.
pub fn get_active_questions(conn: &Connection) -> Result<Vec<Question>> {
    let mut stmt = conn.prepare(
        "SELECT id, question, options, correct_answer, explanation
         FROM quiz_questions
         WHERE active IS NULL OR active = 1
         ORDER BY rowid",
    )?;

    let questions = stmt
        .query_map([], |row| {
            Ok(Question {
                id: row.get(0)?,
                question: row.get(1)?,
                options: get_json(row, 2)?,
                correct_answer: get_answer_index(row, 3)?,
                explanation: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(questions)
}

pub fn record_quiz_result(
    conn: &Connection,
    user_id: &str,
    score: u32,
    total_questions: u32,
) -> Result<QuizResult> {
    let result = QuizResult {
        id: new_id(),
        user_id: user_id.to_string(),
        score,
        total_questions,
        completed_at: Utc::now(),
    };

    conn.execute(
        "INSERT INTO quiz_results (id, user_id, score, total_questions, completed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            result.id,
            result.user_id,
            result.score,
            result.total_questions,
            result.completed_at.to_rfc3339(),
        ],
    )?;

    info!(user_id, score, total_questions, "quiz result recorded");
    Ok(result)
}

/// Results of one user, most recent first
pub fn list_quiz_results(conn: &Connection, user_id: &str) -> Result<Vec<QuizResult>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, score, total_questions, completed_at
         FROM quiz_results
         WHERE user_id = ?1
         ORDER BY completed_at DESC, rowid DESC",
    )?;

    let results = stmt
        .query_map([user_id], |row| {
            Ok(QuizResult {
                id: row.get(0)?,
                user_id: row.get(1)?,
                score: row.get(2)?,
                total_questions: row.get(3)?,
                completed_at: get_timestamp(row, 4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results)
}
