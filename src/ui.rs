use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use finance_edu::{compare, AppConfig, DebtScenario, QuizSession};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Quiz,
    Scenarios,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Quiz => Page::Scenarios,
            Page::Scenarios => Page::Quiz,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Quiz => "Quiz",
            Page::Scenarios => "Debt Scenarios",
        }
    }
}

/// One row of the scenarios table, computed once when the UI opens
struct ScenarioRow {
    name: String,
    debt_count: usize,
    total: f64,
    extra: f64,
    snowball: (u32, f64, bool),
    avalanche: (u32, f64, bool),
}

pub struct App {
    config: AppConfig,
    pub current_page: Page,
    quiz: Option<QuizSession>,
    option_state: ListState,
    scenarios: Vec<ScenarioRow>,
    scenarios_state: TableState,
    completed: Vec<(usize, usize)>,
    status: Option<String>,
}

impl App {
    pub fn new(config: AppConfig, quiz: Option<QuizSession>, scenarios: Vec<DebtScenario>) -> Self {
        let rows: Vec<ScenarioRow> = scenarios
            .iter()
            .filter_map(|s| {
                let comparison = compare(&s.debts, s.extra_payment)?;
                let cell = |policy| {
                    let result = comparison.get(policy).result;
                    (result.months_to_payoff, result.total_interest_paid, result.converged())
                };

                Some(ScenarioRow {
                    name: s.name.clone(),
                    debt_count: s.debts.len(),
                    total: s.debts.total_principal(),
                    extra: s.extra_payment,
                    snowball: cell(finance_edu::SortPolicy::SmallestBalanceFirst),
                    avalanche: cell(finance_edu::SortPolicy::HighestRateFirst),
                })
            })
            .collect();

        let mut scenarios_state = TableState::default();
        if !rows.is_empty() {
            scenarios_state.select(Some(0));
        }

        let mut option_state = ListState::default();
        option_state.select(Some(0));

        let current_page = if quiz.is_some() { Page::Quiz } else { Page::Scenarios };

        Self {
            config,
            current_page,
            quiz,
            option_state,
            scenarios: rows,
            scenarios_state,
            completed: Vec::new(),
            status: None,
        }
    }

    /// (score, total) of every quiz finished during the session
    pub fn completed_quizzes(&self) -> &[(usize, usize)] {
        &self.completed
    }

    fn option_count(&self) -> usize {
        self.quiz
            .as_ref()
            .and_then(|q| q.current_question())
            .map(|q| q.options.len())
            .unwrap_or(0)
    }

    fn move_option(&mut self, forward: bool) {
        let count = self.option_count();
        if count == 0 || self.quiz.as_ref().map_or(true, |q| q.is_answered()) {
            return;
        }
        let i = self.option_state.selected().unwrap_or(0);
        let next = if forward { (i + 1) % count } else { (i + count - 1) % count };
        self.option_state.select(Some(next));
    }

    /// Enter on the quiz page: submit the highlighted option, or move on
    fn confirm(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        self.status = None;

        if quiz.is_finished() {
            return;
        }

        if !quiz.is_answered() {
            let index = self.option_state.selected().unwrap_or(0);
            if let Err(e) = quiz.select(index) {
                self.status = Some(e.to_string());
                return;
            }
            if let Err(e) = quiz.submit() {
                self.status = Some(e.to_string());
            }
            return;
        }

        match quiz.next() {
            Ok(()) => {
                self.option_state.select(Some(0));
                if quiz.is_finished() {
                    self.completed.push((quiz.score(), quiz.total_questions()));
                }
            }
            Err(e) => self.status = Some(e.to_string()),
        }
    }

    fn restart_quiz(&mut self) {
        if let Some(quiz) = self.quiz.as_mut() {
            quiz.reset();
            self.option_state.select(Some(0));
            self.status = None;
        }
    }

    fn next_scenario(&mut self, forward: bool) {
        let len = self.scenarios.len();
        if len == 0 {
            return;
        }
        let i = match self.scenarios_state.selected() {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };
        self.scenarios_state.select(Some(i));
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(()),
                KeyCode::Tab | KeyCode::BackTab => app.current_page = app.current_page.next(),
                KeyCode::Down | KeyCode::Char('j') => match app.current_page {
                    Page::Quiz => app.move_option(true),
                    Page::Scenarios => app.next_scenario(true),
                },
                KeyCode::Up | KeyCode::Char('k') => match app.current_page {
                    Page::Quiz => app.move_option(false),
                    Page::Scenarios => app.next_scenario(false),
                },
                KeyCode::Enter if app.current_page == Page::Quiz => app.confirm(),
                KeyCode::Char('r') if app.current_page == Page::Quiz => app.restart_quiz(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Page tabs
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Key help
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Quiz => render_quiz(f, chunks[1], app),
        Page::Scenarios => render_scenarios(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, page) in [Page::Quiz, Page::Scenarios].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title(), style));
    }

    let header = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_quiz(f: &mut Frame, area: Rect, app: &mut App) {
    let Some(quiz) = app.quiz.as_ref() else {
        let empty = Paragraph::new("No quiz questions loaded. Start with --questions <file.json>.")
            .block(Block::default().borders(Borders::ALL).title(" Quiz "));
        f.render_widget(empty, area);
        return;
    };

    if quiz.is_finished() {
        let performance = quiz.performance();
        let lines = vec![
            Line::from(Span::styled(
                format!("Score: {}/{}", quiz.score(), quiz.total_questions()),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(performance.message()),
            Line::from(""),
            Line::from(Span::styled("Press r to take the quiz again", Style::default().fg(Color::DarkGray))),
        ];
        let result = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(" Quiz Result "))
            .wrap(Wrap { trim: true });
        f.render_widget(result, area);
        return;
    }

    let Some(question) = quiz.current_question() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Question
            Constraint::Min(4),    // Options
            Constraint::Length(5), // Feedback
        ])
        .split(area);

    let title = format!(
        " Question {} of {} ({:.0}%) ",
        quiz.position() + 1,
        quiz.total_questions(),
        quiz.progress_percentage()
    );
    let prompt = Paragraph::new(question.question.clone())
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(prompt, chunks[0]);

    let outcome = quiz.outcome();
    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = match &outcome {
                Some(o) if i == o.correct_answer => Style::default().fg(Color::Green),
                Some(o) if i == o.selected => Style::default().fg(Color::Red),
                _ => Style::default(),
            };
            ListItem::new(format!("{}) {}", i + 1, option)).style(style)
        })
        .collect();

    let options = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Options "))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    let feedback = match &outcome {
        Some(o) if o.is_correct() => vec![
            Line::from(Span::styled("✅ Correct!", Style::default().fg(Color::Green))),
            Line::from(o.explanation.to_string()),
        ],
        Some(o) => vec![
            Line::from(Span::styled("❌ Not quite", Style::default().fg(Color::Red))),
            Line::from(o.explanation.to_string()),
        ],
        None => vec![Line::from(Span::styled(
            "Pick an option and press Enter",
            Style::default().fg(Color::DarkGray),
        ))],
    };
    let feedback = Paragraph::new(feedback)
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });

    f.render_stateful_widget(options, chunks[1], &mut app.option_state);
    f.render_widget(feedback, chunks[2]);
}

fn render_scenarios(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Scenario", "Debts", "Total", "Extra", "Snowball", "Avalanche"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let config = &app.config;
    let outcome_cell = |(months, interest, converged): (u32, f64, bool)| {
        if converged {
            Cell::from(format!("{} mo • {}", months, config.format_currency(interest)))
        } else {
            Cell::from(format!("> {} mo", months)).style(Style::default().fg(Color::Red))
        }
    };

    let rows = app.scenarios.iter().map(|s| {
        let better_avalanche = s.avalanche.1 < s.snowball.1;
        let mut avalanche = outcome_cell(s.avalanche);
        if better_avalanche && s.avalanche.2 {
            avalanche = avalanche.style(Style::default().fg(Color::Green));
        }

        Row::new(vec![
            Cell::from(truncate(&s.name, 24)),
            Cell::from(s.debt_count.to_string()),
            Cell::from(config.format_currency(s.total)),
            Cell::from(config.format_currency(s.extra)),
            outcome_cell(s.snowball),
            avalanche,
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(26),
            Constraint::Length(6),
            Constraint::Length(16),
            Constraint::Length(14),
            Constraint::Length(24),
            Constraint::Length(24),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Saved scenarios ({}) ", app.scenarios.len())),
    )
    .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.scenarios_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" {} ", status), Style::default().fg(Color::Red)));
        spans.push(Span::raw("| "));
    }

    spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Page | "));
    spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Nav | "));
    if app.current_page == Page::Quiz {
        spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" Answer/Next | "));
        spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(" Restart | "));
    }
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::White)));

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
