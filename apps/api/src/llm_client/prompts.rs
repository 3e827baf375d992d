//! Prompt construction for the analysis pipeline.
//!
//! Builders are pure functions of their inputs so they can be tested
//! against fixed transcripts without any LLM involved.

use std::collections::HashMap;

use crate::models::{Answer, Question, TraitScore};

/// Placeholder rendered when an answer references a question id that is not
/// part of the assessment transcript.
pub const UNKNOWN_QUESTION_TEXT: &str = "[Question Text Not Found]";

const ANALYSIS_PERSONA: &str = "\
You are an expert behavioral interviewer and personality assessment specialist \
with deep knowledge of the Big Five model. Your task is to evaluate candidate \
responses solely based on the provided text. If a candidate's answer is minimal, \
vague, or consists of non-informative content (e.g., a single letter such as \"g\" \
or \"s\"), you should reflect that lack of detail in your scores. Do not default \
to a score of 50 for every trait when the response does not contain enough \
information; instead, adjust scores to reflect the low level of engagement and \
insight provided. Use the following considerations for each trait:

Openness: Evaluate the candidate's creativity, curiosity, and willingness to \
consider new ideas. Minimal responses indicate low openness.

Conscientiousness: Assess the candidate's attention to detail, thoroughness, \
and reliability. A trivial answer suggests a lack of conscientious reflection.

Extraversion: Consider the candidate's communication style and engagement. \
Insufficient responses may indicate low extraversion or a lack of communicative \
detail.

Agreeableness: Look for signs of cooperation, warmth, and empathy. Brief or \
curt responses might reflect lower agreeableness.

Neuroticism: Determine the candidate's emotional stability. Limited responses \
can imply uncertainty about emotional expression, so adjust the score based on \
the tone and context provided.";

const ANALYSIS_OUTPUT_TEMPLATE: &str = r#"[
  {
    "trait": "Openness",
    "score": <integer_score_0_to_100>,
    "insights": "<brief_insight_string>"
  },
  {
    "trait": "Conscientiousness",
    "score": <integer_score_0_to_100>,
    "insights": "<brief_insight_string>"
  },
  {
    "trait": "Extraversion",
    "score": <integer_score_0_to_100>,
    "insights": "<brief_insight_string>"
  },
  {
    "trait": "Agreeableness",
    "score": <integer_score_0_to_100>,
    "insights": "<brief_insight_string>"
  },
  {
    "trait": "Neuroticism",
    "score": <integer_score_0_to_100>,
    "insights": "<brief_insight_string>"
  }
]"#;

/// Builds the Big Five analysis prompt from the assessment transcript.
/// Answers are rendered in submission order against their question text.
pub fn build_analysis_prompt(answers: &[Answer], questions: &[Question]) -> String {
    let question_texts: HashMap<&str, &str> = questions
        .iter()
        .map(|q| (q.id.as_str(), q.text.as_str()))
        .collect();

    let mut transcript = String::new();
    for answer in answers {
        let question_text = question_texts
            .get(answer.question_id.as_str())
            .copied()
            .unwrap_or(UNKNOWN_QUESTION_TEXT);
        transcript.push_str(&format!(
            "Question: {question_text}\nAnswer: {}\n---\n",
            answer.response
        ));
    }

    format!(
        "Analyze the following behavioral interview responses to assess the \
candidate's personality based on the Big Five model (Openness, Conscientiousness, \
Extraversion, Agreeableness, Neuroticism).\n\n\
Persona for Evaluation:\n\n{ANALYSIS_PERSONA}\n\n\
Instructions:\n\n\
For each of the five traits, provide:\n\n\
1. A score from 0 to 100, where 0 is extremely low and 100 is extremely high on the trait.\n\
2. A brief insight (1-2 sentences) explaining your reasoning for the score, based only on the provided text.\n\n\
Output the result STRICTLY in the following JSON format:\n\
{ANALYSIS_OUTPUT_TEMPLATE}\n\n\
Candidate's Responses:\n\
---\n\
{transcript}\
Provide only the JSON output."
    )
}

/// Builds the narrative-summary prompt from parsed trait scores, bucketed
/// into high / mid / low bands.
pub fn build_summary_prompt(scores: &[TraitScore]) -> String {
    let high: Vec<&str> = scores
        .iter()
        .filter(|ts| ts.score >= 70)
        .map(|ts| ts.insights.as_str())
        .collect();
    let low: Vec<&str> = scores
        .iter()
        .filter(|ts| ts.score <= 40)
        .map(|ts| ts.insights.as_str())
        .collect();
    let mid: Vec<&str> = scores
        .iter()
        .filter(|ts| ts.score > 40 && ts.score < 70)
        .map(|ts| ts.insights.as_str())
        .collect();

    format!(
        "You are a personality assessment expert.\n\n\
Using the candidate's trait data below, generate a **concise, well-structured \
summary** of the candidate's personality. Your summary should highlight the \
candidate's **key strengths**, **potential growth areas**, and provide a brief \
**overall personality snapshot**. Focus on being clear and insightful without \
overloading with too much detail.\n\n\
When referencing the traits, incorporate them naturally into the narrative.\n\n\
Candidate's Trait Data:\n\n\
High Scoring Traits (score >= 70):\n{high:?}\n\n\
Mid Range Traits (score between 40 and 70):\n{mid:?}\n\n\
Low Scoring Traits (score <= 40):\n{low:?}\n\n\
**Output Requirements:**\n\n\
- Respond strictly in **Markdown format**.\n\
- Use **paragraph breaks** and **bullet points** where helpful to improve readability.\n\
- Keep the summary **brief and digestible** - aim for clarity, not length."
    )
}
