use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One interview question drawn from the pool. Immutable once issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    /// Which trait this question primarily aims to assess.
    pub targeted_trait: Option<String>,
}

/// A candidate's free-text answer to one issued question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub response: String,
    pub targeted_trait: String,
}

/// Why an analysis attempt ended in a failed status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisFailure {
    NoAnswers,
    LlmError,
}

/// Lifecycle of one assessment. Transitions happen only inside the
/// assessment service; failed states are retryable via re-analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentStatus {
    InProgress,
    PendingAnalysis,
    AnalysisFailed(AnalysisFailure),
    Completed,
}

impl AssessmentStatus {
    /// Human-readable status string used in API responses.
    pub fn as_str(&self) -> &'static str {
        match self {
            AssessmentStatus::InProgress => "In Progress",
            AssessmentStatus::PendingAnalysis => "Pending Analysis",
            AssessmentStatus::AnalysisFailed(AnalysisFailure::NoAnswers) => {
                "Analysis Failed (No Answers)"
            }
            AssessmentStatus::AnalysisFailed(AnalysisFailure::LlmError) => {
                "Analysis Failed (LLM Error)"
            }
            AssessmentStatus::Completed => "Completed",
        }
    }
}

/// One candidate's run through the question/answer cycle.
///
/// Invariants: `questions.len() == asked_question_ids.len()`, answers never
/// outnumber questions, and an answer is recorded only when it targets the
/// most recently issued question.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub id: String,
    pub candidate_id: String,
    pub status: AssessmentStatus,
    /// Issued questions in issuance order.
    pub questions: Vec<Question>,
    /// Recorded answers in submission order.
    pub answers: Vec<Answer>,
    pub asked_question_ids: HashSet<String>,
    /// Optional start-time configuration (e.g. target role). Stored opaquely;
    /// reserved for adaptive question selection.
    #[allow(dead_code)]
    pub config: serde_json::Value,
}

impl Assessment {
    pub fn new(id: String, candidate_id: String, config: Option<serde_json::Value>) -> Self {
        Self {
            id,
            candidate_id,
            status: AssessmentStatus::InProgress,
            questions: Vec::new(),
            answers: Vec::new(),
            asked_question_ids: HashSet::new(),
            config: config.unwrap_or(serde_json::Value::Null),
        }
    }

    /// Records a freshly drawn question. The pool never re-issues an id
    /// within one assessment, so both collections grow in lockstep.
    pub fn record_question(&mut self, question: Question) {
        self.asked_question_ids.insert(question.id.clone());
        self.questions.push(question);
    }

    pub fn last_question_id(&self) -> Option<&str> {
        self.questions.last().map(|q| q.id.as_str())
    }

    /// Records an answer only if it responds to the most recently issued
    /// question. Returns false on mismatch (caller logs and continues).
    pub fn record_answer(&mut self, answer: Answer) -> bool {
        if self.last_question_id() == Some(answer.question_id.as_str()) {
            self.answers.push(answer);
            true
        } else {
            false
        }
    }
}
