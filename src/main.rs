// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use finance_edu::budget::{self, BudgetData};
use finance_edu::investment::{self, InvestmentCatalog};
use finance_edu::{
    compare, delete_debt_scenario, get_active_questions, get_debt_scenario, init_logging,
    list_debt_scenarios, list_quiz_results, load_debts_csv, open_database, parse_amount,
    parse_months, record_quiz_result, save_budget_snapshot, save_debt_scenario,
    save_investment_snapshot, AppConfig, DebtSet, QuestionBank, QuizSession, SortPolicy,
    MAX_MONTHS,
};

#[derive(Parser)]
#[command(name = "finance-edu")]
#[command(about = "Personal finance simulators and quiz", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON config file (database path, user id, currency, question bank)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare snowball and avalanche payoff of a set of debts
    Debt {
        /// Debt as name:principal:annual_rate:minimum (repeatable)
        #[arg(long = "debt", value_parser = parse_debt_arg)]
        debts: Vec<DebtArg>,

        /// CSV with columns name,principal,annual_rate_percent,minimum_payment
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Extra amount paid every month on top of the minimums
        #[arg(short, long, default_value = "0")]
        extra: String,

        /// Method stored with a saved scenario
        #[arg(short, long, default_value = "avalanche")]
        method: SortPolicy,

        /// Save the scenario under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Monthly budget: savings rate, breakdown and advice
    Budget {
        #[arg(long, default_value = "0")]
        income: String,
        #[arg(long, default_value = "0")]
        housing: String,
        #[arg(long, default_value = "0")]
        food: String,
        #[arg(long, default_value = "0")]
        transport: String,
        #[arg(long, default_value = "0")]
        utilities: String,
        #[arg(long, default_value = "0")]
        entertainment: String,
        #[arg(long, default_value = "0")]
        others: String,

        /// Save the budget under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Project the growth of an investment
    Invest {
        #[arg(long, default_value = "1000")]
        initial: String,

        #[arg(long, default_value = "100")]
        monthly: String,

        /// Horizon in months (1-360)
        #[arg(long, default_value = "12")]
        months: String,

        /// Investment type name (see --list-types)
        #[arg(long = "type", default_value = "Tesouro Selic")]
        investment_type: String,

        /// Print the available investment types and exit
        #[arg(long)]
        list_types: bool,

        /// Write the month-by-month series to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Save the projection under this name
        #[arg(long)]
        save: Option<String>,
    },
    /// Answer the quiz on the terminal
    Quiz {
        /// JSON question bank (defaults to the database, then the config file)
        #[arg(long)]
        questions: Option<PathBuf>,
    },
    /// Manage saved debt scenarios
    Scenarios {
        #[command(subcommand)]
        action: ScenarioAction,
    },
    /// Interactive terminal UI (quiz and saved scenarios)
    Tui {
        #[arg(long)]
        questions: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ScenarioAction {
    /// List saved scenarios of the configured user
    List,
    /// Re-run a saved scenario
    Show { id: String },
    /// Delete a saved scenario
    Delete { id: String },
}

#[derive(Debug, Clone)]
struct DebtArg {
    name: String,
    principal: f64,
    rate: f64,
    minimum: f64,
}

/// "Card:1000:20:50" → DebtArg. Numeric parts go through the form coercion.
fn parse_debt_arg(s: &str) -> Result<DebtArg, String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "expected name:principal:annual_rate:minimum, got '{}'",
            s
        ));
    }

    Ok(DebtArg {
        name: parts[0].trim().to_string(),
        principal: parse_amount(parts[1]),
        rate: parse_amount(parts[2]),
        minimum: parse_amount(parts[3]),
    })
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Debt {
            debts,
            csv,
            extra,
            method,
            save,
        } => run_debt(&config, debts, csv, &extra, method, save)?,
        Commands::Budget {
            income,
            housing,
            food,
            transport,
            utilities,
            entertainment,
            others,
            save,
        } => {
            let budget = BudgetData {
                income: parse_amount(&income),
                housing: parse_amount(&housing),
                food: parse_amount(&food),
                transport: parse_amount(&transport),
                utilities: parse_amount(&utilities),
                entertainment: parse_amount(&entertainment),
                others: parse_amount(&others),
            };
            run_budget(&config, &budget, save)?;
        }
        Commands::Invest {
            initial,
            monthly,
            months,
            investment_type,
            list_types,
            csv,
            save,
        } => {
            if list_types {
                print_investment_types();
            } else {
                run_invest(
                    &config,
                    parse_amount(&initial),
                    parse_amount(&monthly),
                    parse_months(&months, 12),
                    &investment_type,
                    csv,
                    save,
                )?;
            }
        }
        Commands::Quiz { questions } => run_quiz(&config, questions)?,
        Commands::Scenarios { action } => run_scenarios(&config, action)?,
        Commands::Tui { questions } => run_ui_mode(&config, questions)?,
    }

    Ok(())
}

// ============================================================================
// DEBT
// ============================================================================

fn run_debt(
    config: &AppConfig,
    args: Vec<DebtArg>,
    csv: Option<PathBuf>,
    extra: &str,
    method: SortPolicy,
    save: Option<String>,
) -> Result<()> {
    let mut debts = match csv {
        Some(path) => load_debts_csv(&path)?,
        None => DebtSet::new(),
    };

    for arg in args {
        if debts
            .add(&arg.name, arg.principal, arg.rate, arg.minimum)
            .is_none()
        {
            eprintln!("⚠️  Skipping '{}': a debt needs a name and a balance", arg.name);
        }
    }

    if debts.is_empty() {
        anyhow::bail!("Add at least one debt with --debt or --csv");
    }

    let extra = parse_amount(extra);

    println!("💳 Debt Payoff Simulator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    print_debts(config, &debts);
    println!("Extra per month: {}", config.format_currency(extra));
    print_comparison(config, &debts, extra);

    if let Some(name) = save {
        let conn = open_database(&config.database_path)?;
        let scenario = save_debt_scenario(&conn, &config.user_id, &name, &debts, method, extra)?;
        println!("\n💾 Saved scenario '{}' ({})", scenario.name, scenario.id);
    }

    Ok(())
}

fn print_debts(config: &AppConfig, debts: &DebtSet) {
    println!("\nYour debts:");
    for debt in debts.iter() {
        println!(
            "  {:<20} {:>14} • {:>6.2}% a.a. • Min: {}",
            debt.name,
            config.format_currency(debt.principal),
            debt.annual_rate_percent,
            config.format_currency(debt.minimum_payment),
        );
    }
    println!("  {:<20} {:>14}", "Total", config.format_currency(debts.total_principal()));
}

fn print_comparison(config: &AppConfig, debts: &DebtSet, extra: f64) {
    let Some(comparison) = compare(debts, extra) else {
        return;
    };

    for policy in SortPolicy::ALL {
        let plan = comparison.get(policy);
        println!("\n▶ {} - {}", policy, policy.description());

        if plan.result.converged() {
            println!("  Time to pay off: {} months", plan.result.months_to_payoff);
        } else {
            println!(
                "  ⚠️  Not paid off within {} months: the payments do not cover the interest",
                MAX_MONTHS
            );
        }
        println!(
            "  Total interest:  {}",
            config.format_currency(plan.result.total_interest_paid)
        );
        for event in &plan.payoffs {
            println!("    ✓ {} cleared in month {}", event.name, event.month);
        }
    }

    let saved = comparison.interest_saved();
    println!(
        "\n💡 Recommended: {} (avalanche saves {} in interest)",
        comparison.recommended(),
        config.format_currency(saved)
    );
}

// ============================================================================
// BUDGET
// ============================================================================

fn run_budget(config: &AppConfig, data: &BudgetData, save: Option<String>) -> Result<()> {
    println!("💰 Budget Simulator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    if data.income <= 0.0 {
        println!("Enter a monthly income (--income) to see your results.");
        return Ok(());
    }

    let summary = budget::summarize(data);
    let trend = if summary.savings >= 0.0 { "📈" } else { "📉" };

    println!("Total expenses: {}", config.format_currency(summary.total_expenses));
    println!("Savings:        {} {}", trend, config.format_currency(summary.savings.abs()));
    println!("Savings rate:   {:.1}%", summary.savings_percentage);

    let slices = budget::breakdown(data);
    if !slices.is_empty() {
        println!("\nWhere the money goes:");
        for slice in slices {
            println!(
                "  {:<14} {:>14}  {:>3.0}%",
                slice.category.as_str(),
                config.format_currency(slice.amount),
                slice.share
            );
        }
    }

    if let Some(advice) = budget::suggestion(data) {
        let icon = match advice.kind {
            budget::SuggestionKind::Warning => "⚠️ ",
            budget::SuggestionKind::Success => "✅",
            budget::SuggestionKind::Info => "ℹ️ ",
        };
        println!("\n{} {}", icon, advice.message);
    }

    if let Some(name) = save {
        let conn = open_database(&config.database_path)?;
        let snapshot = save_budget_snapshot(&conn, &config.user_id, &name, data)?;
        println!("\n💾 Saved budget '{}' ({})", snapshot.name, snapshot.id);
    }

    Ok(())
}

// ============================================================================
// INVESTMENT
// ============================================================================

fn print_investment_types() {
    let catalog = InvestmentCatalog::new();
    println!("Available investment types:");
    for kind in catalog.all() {
        println!(
            "  {:<22} {:>5.1}% a.a.  risk: {}",
            kind.name,
            kind.annual_rate * 100.0,
            kind.risk_level.as_str()
        );
    }
}

fn run_invest(
    config: &AppConfig,
    initial: f64,
    monthly: f64,
    months: u32,
    type_name: &str,
    csv: Option<PathBuf>,
    save: Option<String>,
) -> Result<()> {
    let catalog = InvestmentCatalog::new();
    let kind = catalog
        .find(type_name)
        .with_context(|| format!("Unknown investment type '{}' (try --list-types)", type_name))?;

    let points = investment::project(initial, monthly, months, kind.annual_rate);
    let summary = investment::summarize(&points);

    println!("📈 Investment Simulator");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{} ({:.1}% a.a.) • risk: {}",
        kind.name,
        kind.annual_rate * 100.0,
        kind.risk_level.as_str()
    );
    println!("Invested:     {}", config.format_currency(summary.total_invested));
    println!("Earnings:     {}", config.format_currency(summary.earnings));
    println!("Final value:  {}", config.format_currency(summary.final_value));
    println!("Total return: {:.2}%", summary.return_percentage);

    if let Some(path) = csv {
        investment::export_csv(&points, &path)?;
        println!("\n📄 Series written to {:?}", path);
    }

    if let Some(name) = save {
        let conn = open_database(&config.database_path)?;
        let snapshot = save_investment_snapshot(
            &conn,
            &config.user_id,
            &name,
            initial,
            monthly,
            months,
            &kind.name,
            summary.final_value,
        )?;
        println!("\n💾 Saved projection '{}' ({})", snapshot.name, snapshot.id);
    }

    Ok(())
}

// ============================================================================
// QUIZ
// ============================================================================

/// Explicit file first, then active questions in the database, then the configured file
fn load_question_bank(
    config: &AppConfig,
    conn: &Connection,
    explicit: Option<PathBuf>,
) -> Result<QuestionBank> {
    if let Some(path) = explicit {
        return QuestionBank::from_file(path);
    }

    match get_active_questions(conn).and_then(QuestionBank::from_questions) {
        Ok(bank) if !bank.is_empty() => {
            info!(count = bank.len(), "using questions from the database");
            return Ok(bank);
        }
        Ok(_) => {}
        Err(e) => warn!("stored quiz questions unusable, trying the question file: {:#}", e),
    }

    match &config.questions_path {
        Some(path) => QuestionBank::from_file(path),
        None => anyhow::bail!(
            "No quiz questions found. Pass --questions <file.json> or set FINANCE_EDU_QUESTIONS"
        ),
    }
}

fn run_quiz(config: &AppConfig, questions: Option<PathBuf>) -> Result<()> {
    let conn = open_database(&config.database_path)?;
    let bank = load_question_bank(config, &conn, questions)?;
    let mut quiz = QuizSession::new(bank)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("🧠 Finance Quiz");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    while let Some(question) = quiz.current_question().cloned() {
        println!(
            "\nQuestion {} of {}: {}",
            quiz.position() + 1,
            quiz.total_questions(),
            question.question
        );
        for (i, option) in question.options.iter().enumerate() {
            println!("  {}) {}", i + 1, option);
        }

        loop {
            print!("Your answer: ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                println!("\nQuiz abandoned.");
                return Ok(());
            };
            let line = line?;

            let choice = line.trim().parse::<usize>().ok().and_then(|n| n.checked_sub(1));
            match choice.map(|index| quiz.select(index)) {
                Some(Ok(())) => break,
                Some(Err(e)) => println!("  {}", e),
                None => println!("  Type the number of an option"),
            }
        }

        let outcome = quiz.submit()?;
        if outcome.is_correct() {
            println!("  ✅ Correct!");
        } else {
            println!(
                "  ❌ Wrong. The answer is {}) {}",
                outcome.correct_answer + 1,
                question.options[outcome.correct_answer]
            );
        }
        println!("  {}", outcome.explanation);

        quiz.next()?;
    }

    let performance = quiz.performance();
    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Score: {}/{}", quiz.score(), quiz.total_questions());
    println!("{}", performance.message());

    record_quiz_result(
        &conn,
        &config.user_id,
        quiz.score() as u32,
        quiz.total_questions() as u32,
    )?;

    let history = list_quiz_results(&conn, &config.user_id)?;
    if history.len() > 1 {
        let best = history.iter().map(|r| r.score).max().unwrap_or(0);
        println!("Attempts: {} • best score: {}", history.len(), best);
    }

    Ok(())
}

// ============================================================================
// SCENARIOS
// ============================================================================

fn run_scenarios(config: &AppConfig, action: ScenarioAction) -> Result<()> {
    let conn = open_database(&config.database_path)?;

    match action {
        ScenarioAction::List => {
            let scenarios = list_debt_scenarios(&conn, &config.user_id)?;
            if scenarios.is_empty() {
                println!("No saved scenarios for user '{}'", config.user_id);
            }
            for scenario in scenarios {
                println!(
                    "{}  {:<20} {} debts • {} • extra {} • updated {}",
                    scenario.id,
                    scenario.name,
                    scenario.debts.len(),
                    scenario.method,
                    config.format_currency(scenario.extra_payment),
                    scenario.updated_at.format("%Y-%m-%d %H:%M"),
                );
            }
        }
        ScenarioAction::Show { id } => {
            let scenario = get_debt_scenario(&conn, &id)?
                .with_context(|| format!("No saved scenario with id {}", id))?;

            println!("💳 {} ({})", scenario.name, scenario.method);
            print_debts(config, &scenario.debts);
            println!("Extra per month: {}", config.format_currency(scenario.extra_payment));
            print_comparison(config, &scenario.debts, scenario.extra_payment);
        }
        ScenarioAction::Delete { id } => {
            delete_debt_scenario(&conn, &id)?;
            println!("🗑️  Deleted scenario {}", id);
        }
    }

    Ok(())
}

// ============================================================================
// TUI
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig, questions: Option<PathBuf>) -> Result<()> {
    let conn = open_database(&config.database_path)?;

    let scenarios = list_debt_scenarios(&conn, &config.user_id)?;
    let quiz = match load_question_bank(config, &conn, questions) {
        Ok(bank) => Some(QuizSession::new(bank)?),
        Err(e) => {
            eprintln!("⚠️  Quiz unavailable: {}", e);
            None
        }
    };

    let mut app = ui::App::new(config.clone(), quiz, scenarios);
    ui::run_ui(&mut app)?;

    for (score, total) in app.completed_quizzes() {
        record_quiz_result(&conn, &config.user_id, *score as u32, *total as u32)?;
    }

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig, _questions: Option<PathBuf>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    std::process::exit(1);
}
