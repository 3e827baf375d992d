//! Question Source — the immutable pool of interview questions, loaded once
//! at startup from `QUESTION_POOL_PATH` or the built-in default set.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::{error, info};

use crate::models::Question;

/// On-disk shape of a pool entry: `[{"id", "text", "trait"}]`.
#[derive(Debug, Deserialize)]
struct PoolEntry {
    id: String,
    text: String,
    #[serde(rename = "trait")]
    targeted_trait: Option<String>,
}

/// Ordered, immutable collection of interview questions.
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    pub fn from_questions(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Loads the pool from a JSON file when a path is configured, falling
    /// back to the built-in set on any read or parse failure.
    pub fn load(path: Option<&str>) -> Self {
        let Some(path) = path else {
            info!("Using built-in question pool");
            return Self::builtin();
        };

        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|raw| serde_json::from_str::<Vec<PoolEntry>>(&raw).map_err(Into::into))
        {
            Ok(entries) => {
                info!("Loaded {} questions from {path}", entries.len());
                Self::from_questions(
                    entries
                        .into_iter()
                        .map(|e| Question {
                            id: e.id,
                            text: e.text,
                            targeted_trait: e.targeted_trait,
                        })
                        .collect(),
                )
            }
            Err(e) => {
                error!("Failed to load questions from {path}: {e}. Using built-in pool.");
                Self::builtin()
            }
        }
    }

    /// The default 10-question behavioral pool.
    pub fn builtin() -> Self {
        let defaults: [(&str, &str, &str); 10] = [
            (
                "q_001",
                "Describe a time you had to work with a difficult colleague. How did you handle the situation and what was the outcome?",
                "Agreeableness",
            ),
            (
                "q_002",
                "Tell me about a situation where you took initiative to solve a problem that wasn't explicitly assigned to you.",
                "Conscientiousness",
            ),
            (
                "q_003",
                "Describe a project or accomplishment you are particularly proud of. What was your specific role and contribution?",
                "Extraversion/Conscientiousness",
            ),
            (
                "q_004",
                "How do you typically handle working under pressure or with tight deadlines? Give an example.",
                "Neuroticism",
            ),
            (
                "q_005",
                "Tell me about a time you had to learn something completely new to complete a task or project. How did you approach it?",
                "Openness",
            ),
            (
                "q_006",
                "Describe a situation where you had to persuade others to see things your way. What was your approach?",
                "Extraversion",
            ),
            (
                "q_007",
                "Give an example of a time you received constructive criticism. How did you react, and what did you do with the feedback?",
                "Agreeableness/Openness",
            ),
            (
                "q_008",
                "How do you prioritize your tasks when you have multiple competing deadlines?",
                "Conscientiousness",
            ),
            (
                "q_009",
                "Describe a time you worked effectively as part of a team to achieve a common goal.",
                "Agreeableness/Extraversion",
            ),
            (
                "q_010",
                "Tell me about a time you faced unexpected challenges in a project. How did you adapt?",
                "Openness/Neuroticism",
            ),
        ];

        Self::from_questions(
            defaults
                .into_iter()
                .map(|(id, text, trait_name)| Question {
                    id: id.to_string(),
                    text: text.to_string(),
                    targeted_trait: Some(trait_name.to_string()),
                })
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Draws one question uniformly at random among those not yet asked.
    /// Returns None when the pool is exhausted for this exclusion set.
    pub fn draw(&self, excluded: &HashSet<String>) -> Option<Question> {
        let available: Vec<&Question> = self
            .questions
            .iter()
            .filter(|q| !excluded.contains(&q.id))
            .collect();

        available
            .choose(&mut rand::thread_rng())
            .map(|q| (*q).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pool_has_ten_unique_questions() {
        let pool = QuestionPool::builtin();
        assert_eq!(pool.len(), 10);
        let ids: HashSet<&str> = pool.questions.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_draw_never_repeats_within_exclusion_set() {
        let pool = QuestionPool::builtin();
        let mut asked = HashSet::new();
        for _ in 0..pool.len() {
            let q = pool.draw(&asked).expect("pool should not be exhausted yet");
            assert!(asked.insert(q.id), "drew a question id twice");
        }
        assert!(pool.draw(&asked).is_none());
    }

    #[test]
    fn test_empty_pool_yields_nothing() {
        let pool = QuestionPool::from_questions(Vec::new());
        assert!(pool.draw(&HashSet::new()).is_none());
        assert!(pool.is_empty());
    }
}
