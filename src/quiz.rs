// 🧠 Finance Quiz - multiple choice with one answer per question
//
// Questions are data: loaded from a JSON file or from the quiz_questions
// table. A `QuizSession` walks a bank one question at a time:
// select → submit → next, until the last question is done.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// QUESTIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,

    /// Index into `options`
    pub correct_answer: usize,

    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer: usize) -> bool {
        answer == self.correct_answer
    }

    fn validate(&self) -> Result<()> {
        if self.options.len() < 2 {
            anyhow::bail!("Question {} needs at least two options", self.id);
        }
        if self.correct_answer >= self.options.len() {
            anyhow::bail!(
                "Question {} marks option {} correct but has only {} options",
                self.id,
                self.correct_answer,
                self.options.len()
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Load questions from a JSON array file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read questions file: {:?}", path.as_ref()))?;

        let questions: Vec<Question> =
            serde_json::from_str(&content).context("Failed to parse questions JSON")?;

        QuestionBank::from_questions(questions)
    }

    pub fn from_questions(questions: Vec<Question>) -> Result<Self> {
        for question in &questions {
            question.validate()?;
        }
        Ok(QuestionBank { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("The question bank is empty")]
    EmptyBank,

    #[error("Option {index} does not exist (question has {count} options)")]
    OptionOutOfRange { index: usize, count: usize },

    #[error("Select an option before submitting")]
    NothingSelected,

    #[error("This question was already answered")]
    AlreadyAnswered,

    #[error("Submit an answer before moving on")]
    NotAnswered,

    #[error("The quiz is finished")]
    Finished,
}

/// Feedback for a submitted answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome<'a> {
    pub selected: usize,
    pub correct_answer: usize,
    pub explanation: &'a str,
}

impl AnswerOutcome<'_> {
    pub fn is_correct(&self) -> bool {
        self.selected == self.correct_answer
    }
}

#[derive(Debug, Clone)]
pub struct QuizSession {
    bank: QuestionBank,
    current: usize,
    selected: Option<usize>,
    answered: bool,
    score: usize,
    finished: bool,
}

impl QuizSession {
    pub fn new(bank: QuestionBank) -> Result<Self, QuizError> {
        if bank.is_empty() {
            return Err(QuizError::EmptyBank);
        }

        Ok(QuizSession {
            bank,
            current: 0,
            selected: None,
            answered: false,
            score: 0,
            finished: false,
        })
    }

    /// Question on screen, `None` once the quiz is finished
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished {
            None
        } else {
            self.bank.get(self.current)
        }
    }

    /// Zero-based position of the current question
    pub fn position(&self) -> usize {
        self.current
    }

    pub fn total_questions(&self) -> usize {
        self.bank.len()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn score(&self) -> usize {
        self.score
    }

    /// Progress through the quiz, counting the current question
    pub fn progress_percentage(&self) -> f64 {
        (self.current + 1) as f64 / self.bank.len() as f64 * 100.0
    }

    pub fn select(&mut self, index: usize) -> Result<(), QuizError> {
        let question = self.current_question().ok_or(QuizError::Finished)?;
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        if index >= question.options.len() {
            return Err(QuizError::OptionOutOfRange {
                index,
                count: question.options.len(),
            });
        }

        self.selected = Some(index);
        Ok(())
    }

    /// Lock in the selected option. Scores at most once per question.
    pub fn submit(&mut self) -> Result<AnswerOutcome<'_>, QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if self.answered {
            return Err(QuizError::AlreadyAnswered);
        }
        let selected = self.selected.ok_or(QuizError::NothingSelected)?;

        self.answered = true;
        if self.bank.questions[self.current].is_correct(selected) {
            self.score += 1;
        }

        self.outcome().ok_or(QuizError::NotAnswered)
    }

    /// Feedback for the current question once it has been answered
    pub fn outcome(&self) -> Option<AnswerOutcome<'_>> {
        if !self.answered {
            return None;
        }
        let question = self.current_question()?;
        let selected = self.selected?;

        Some(AnswerOutcome {
            selected,
            correct_answer: question.correct_answer,
            explanation: &question.explanation,
        })
    }

    /// Move to the next question, or finish after the last one
    pub fn next(&mut self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::Finished);
        }
        if !self.answered {
            return Err(QuizError::NotAnswered);
        }

        if self.current + 1 < self.bank.len() {
            self.current += 1;
            self.selected = None;
            self.answered = false;
        } else {
            self.finished = true;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.selected = None;
        self.answered = false;
        self.score = 0;
        self.finished = false;
    }

    pub fn performance(&self) -> Performance {
        Performance::from_score(self.score, self.bank.len())
    }
}

// ============================================================================
// PERFORMANCE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Performance {
    Excellent,
    Good,
    OnTrack,
    KeepLearning,
}

impl Performance {
    pub fn from_score(score: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        if percentage >= 80.0 {
            Performance::Excellent
        } else if percentage >= 60.0 {
            Performance::Good
        } else if percentage >= 40.0 {
            Performance::OnTrack
        } else {
            Performance::KeepLearning
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent! You have great financial knowledge!",
            Performance::Good => "Good job! Keep learning to get even better.",
            Performance::OnTrack => "You're on the right track. Try the simulators to learn more!",
            Performance::KeepLearning => {
                "Don't give up! Use the learning tools to build your knowledge."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn question(id: &str, correct: usize) -> Question {
        Question {
            id: id.to_string(),
            question: format!("Question {}?", id),
            options: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            correct_answer: correct,
            explanation: format!("Because {}", id),
        }
    }

    fn session() -> QuizSession {
        let bank = QuestionBank::from_questions(vec![question("q1", 1), question("q2", 2)]).unwrap();
        QuizSession::new(bank).unwrap()
    }

    #[test]
    fn test_bank_rejects_invalid_questions() {
        let mut bad = question("bad", 5);
        assert!(QuestionBank::from_questions(vec![bad.clone()]).is_err());

        bad.correct_answer = 0;
        bad.options.truncate(1);
        assert!(QuestionBank::from_questions(vec![bad]).is_err());
    }

    #[test]
    fn test_empty_bank_cannot_start() {
        let err = QuizSession::new(QuestionBank::default()).unwrap_err();
        assert_eq!(err, QuizError::EmptyBank);
    }

    #[test]
    fn test_full_run() {
        let mut quiz = session();

        assert_eq!(quiz.progress_percentage(), 50.0);
        quiz.select(1).unwrap();
        let outcome = quiz.submit().unwrap();
        assert!(outcome.is_correct());
        assert_eq!(outcome.explanation, "Because q1");
        quiz.next().unwrap();

        assert_eq!(quiz.position(), 1);
        assert_eq!(quiz.progress_percentage(), 100.0);
        assert_eq!(quiz.selected(), None);
        quiz.select(0).unwrap();
        assert!(!quiz.submit().unwrap().is_correct());
        quiz.next().unwrap();

        assert!(quiz.is_finished());
        assert!(quiz.current_question().is_none());
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.performance(), Performance::OnTrack);
    }

    #[test]
    fn test_submit_requires_selection() {
        let mut quiz = session();
        assert_eq!(quiz.submit().unwrap_err(), QuizError::NothingSelected);
        assert_eq!(quiz.next().unwrap_err(), QuizError::NotAnswered);
    }

    #[test]
    fn test_answer_is_locked_and_scored_once() {
        let mut quiz = session();
        quiz.select(1).unwrap();
        quiz.submit().unwrap();

        assert_eq!(quiz.submit().unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(quiz.select(2).unwrap_err(), QuizError::AlreadyAnswered);
        assert_eq!(quiz.score(), 1);
    }

    #[test]
    fn test_select_out_of_range() {
        let mut quiz = session();
        assert_eq!(
            quiz.select(3).unwrap_err(),
            QuizError::OptionOutOfRange { index: 3, count: 3 }
        );
    }

    #[test]
    fn test_finished_quiz_rejects_moves_until_reset() {
        let mut quiz = session();
        for answer in [1, 2] {
            quiz.select(answer).unwrap();
            quiz.submit().unwrap();
            quiz.next().unwrap();
        }

        assert_eq!(quiz.score(), 2);
        assert_eq!(quiz.next().unwrap_err(), QuizError::Finished);
        assert_eq!(quiz.select(0).unwrap_err(), QuizError::Finished);

        quiz.reset();
        assert!(!quiz.is_finished());
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.current_question().unwrap().id, "q1");
    }

    #[test]
    fn test_performance_tiers() {
        assert_eq!(Performance::from_score(5, 5), Performance::Excellent);
        assert_eq!(Performance::from_score(4, 5), Performance::Excellent);
        assert_eq!(Performance::from_score(3, 5), Performance::Good);
        assert_eq!(Performance::from_score(2, 5), Performance::OnTrack);
        assert_eq!(Performance::from_score(1, 5), Performance::KeepLearning);
        assert_eq!(Performance::from_score(0, 0), Performance::KeepLearning);
    }

    #[test]
    fn test_bank_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&vec![question("q1", 0), question("q2", 1)]).unwrap();
        write!(file, "{}", json).unwrap();
        file.flush().unwrap();

        let bank = QuestionBank::from_file(file.path()).unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.get(1).unwrap().correct_answer, 1);

        assert!(QuestionBank::from_file("/nonexistent/questions.json").is_err());
    }
}
