//! Client-side quiz flow: pick a quiz, answer in any order, submit, score.
//!
//! Phases: `Listing` -> `InProgress` -> `Result`, and back to `Listing` from either
//! of the later two. Scoring is local; a passing score is what triggers result
//! storage (see `ApiClient::record_if_passing`).

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::protocol::QuestionOut;

/// Minimum percentage counted as a pass.
pub const PASS_THRESHOLD_PERCENT: f64 = 80.0;

#[derive(Debug, Error, PartialEq)]
pub enum QuizFlowError {
  #[error("no questions found for quiz '{0}'")]
  UnknownQuiz(String),
  #[error("question {0} is not part of the selected quiz")]
  UnknownQuestion(Uuid),
  #[error("option '{0}' is not one of 1-4")]
  InvalidOption(String),
  #[error("question index {index} is out of range (quiz has {len})")]
  OutOfRange { index: usize, len: usize },
  #[error("action not available while {0}")]
  WrongPhase(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuizScore {
  pub quiz_name: String,
  pub correct: usize,
  pub total: usize,
  pub percentage: f64,
}

impl QuizScore {
  pub fn passed(&self) -> bool {
    self.percentage >= PASS_THRESHOLD_PERCENT
  }

  pub fn status(&self) -> &'static str {
    if self.passed() { "Pass" } else { "Fail" }
  }
}

/// Count matching answers over the quiz's questions. An empty quiz scores 0%.
pub fn score_quiz<'a>(
  quiz_name: &str,
  questions: impl IntoIterator<Item = &'a QuestionOut>,
  answers: &HashMap<Uuid, String>,
) -> QuizScore {
  let mut total = 0;
  let mut correct = 0;
  for q in questions {
    total += 1;
    if answers.get(&q.id).is_some_and(|a| *a == q.correct_answer) {
      correct += 1;
    }
  }
  let percentage = if total > 0 { correct as f64 / total as f64 * 100.0 } else { 0.0 };
  QuizScore { quiz_name: quiz_name.to_string(), correct, total, percentage }
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizPhase {
  Listing,
  InProgress { quiz_name: String, index: usize },
  Result(QuizScore),
}

impl QuizPhase {
  fn label(&self) -> &'static str {
    match self {
      QuizPhase::Listing => "listing quizzes",
      QuizPhase::InProgress { .. } => "a quiz is in progress",
      QuizPhase::Result(_) => "showing a result",
    }
  }
}

pub struct QuizSession {
  questions: Vec<QuestionOut>,
  answers: HashMap<Uuid, String>,
  phase: QuizPhase,
}

impl QuizSession {
  pub fn new(questions: Vec<QuestionOut>) -> Self {
    Self { questions, answers: HashMap::new(), phase: QuizPhase::Listing }
  }

  pub fn phase(&self) -> &QuizPhase {
    &self.phase
  }

  /// Quiz names in order of first appearance.
  pub fn quiz_names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for q in &self.questions {
      if !names.contains(&q.quiz_name.as_str()) {
        names.push(&q.quiz_name);
      }
    }
    names
  }

  fn questions_for<'a>(&'a self, quiz_name: &'a str) -> impl Iterator<Item = &'a QuestionOut> + 'a {
    self.questions.iter().filter(move |q| q.quiz_name == quiz_name)
  }

  fn in_progress(&self) -> Result<(&str, usize), QuizFlowError> {
    match &self.phase {
      QuizPhase::InProgress { quiz_name, index } => Ok((quiz_name.as_str(), *index)),
      other => Err(QuizFlowError::WrongPhase(other.label())),
    }
  }

  pub fn select(&mut self, quiz_name: &str) -> Result<(), QuizFlowError> {
    if self.phase != QuizPhase::Listing {
      return Err(QuizFlowError::WrongPhase(self.phase.label()));
    }
    if self.questions_for(quiz_name).next().is_none() {
      return Err(QuizFlowError::UnknownQuiz(quiz_name.to_string()));
    }
    self.answers.clear();
    self.phase = QuizPhase::InProgress { quiz_name: quiz_name.to_string(), index: 0 };
    Ok(())
  }

  /// Questions of the selected quiz, in listing order.
  pub fn current_questions(&self) -> Vec<&QuestionOut> {
    match &self.phase {
      QuizPhase::InProgress { quiz_name, .. } => self.questions_for(quiz_name).collect(),
      QuizPhase::Result(score) => self.questions_for(&score.quiz_name).collect(),
      QuizPhase::Listing => Vec::new(),
    }
  }

  pub fn current_question(&self) -> Option<&QuestionOut> {
    let (_, index) = self.in_progress().ok()?;
    self.current_questions().get(index).copied()
  }

  /// Jump to any question of the selected quiz.
  pub fn go_to(&mut self, index: usize) -> Result<(), QuizFlowError> {
    let len = self.current_questions().len();
    let (quiz_name, _) = self.in_progress()?;
    if index >= len {
      return Err(QuizFlowError::OutOfRange { index, len });
    }
    self.phase = QuizPhase::InProgress { quiz_name: quiz_name.to_string(), index };
    Ok(())
  }

  pub fn next(&mut self) -> Result<(), QuizFlowError> {
    let (_, index) = self.in_progress()?;
    self.go_to(index + 1)
  }

  pub fn previous(&mut self) -> Result<(), QuizFlowError> {
    let (_, index) = self.in_progress()?;
    let len = self.current_questions().len();
    let prev = index.checked_sub(1).ok_or(QuizFlowError::OutOfRange { index: 0, len })?;
    self.go_to(prev)
  }

  /// Record (or overwrite) the chosen option for a question.
  pub fn answer(&mut self, question: Uuid, option: &str) -> Result<(), QuizFlowError> {
    let (quiz_name, _) = self.in_progress()?;
    if !matches!(option, "1" | "2" | "3" | "4") {
      return Err(QuizFlowError::InvalidOption(option.to_string()));
    }
    if !self.questions_for(quiz_name).any(|q| q.id == question) {
      return Err(QuizFlowError::UnknownQuestion(question));
    }
    self.answers.insert(question, option.to_string());
    Ok(())
  }

  /// Answer whichever question is currently displayed.
  pub fn choose(&mut self, option: &str) -> Result<(), QuizFlowError> {
    let id = self
      .current_question()
      .map(|q| q.id)
      .ok_or(QuizFlowError::WrongPhase(self.phase.label()))?;
    self.answer(id, option)
  }

  pub fn answered_count(&self) -> usize {
    self.current_questions().iter().filter(|q| self.answers.contains_key(&q.id)).count()
  }

  /// Finish the quiz. Unanswered questions count as wrong.
  pub fn submit(&mut self) -> Result<&QuizScore, QuizFlowError> {
    let (quiz_name, _) = self.in_progress()?;
    let score = score_quiz(quiz_name, self.questions_for(quiz_name), &self.answers);
    self.phase = QuizPhase::Result(score);
    match &self.phase {
      QuizPhase::Result(score) => Ok(score),
      other => Err(QuizFlowError::WrongPhase(other.label())),
    }
  }

  /// Back to the quiz list, discarding answers.
  pub fn back_to_list(&mut self) {
    self.answers.clear();
    self.phase = QuizPhase::Listing;
  }
}
