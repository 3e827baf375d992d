//! Strict parser for the LLM's Big Five analysis output.
//!
//! Two-phase decode: generic JSON parse, then schema-checked projection into
//! trait scores. An item with an unrecognized trait name or an out-of-range
//! score is skipped (logged), but the result must cover all five traits or
//! the whole parse fails. A partial profile is never returned.

use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::models::{BigFiveTrait, TraitScore};

/// Number of trait entries the analysis response must contain.
const EXPECTED_ITEMS: usize = 5;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("completion is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("completion does not match the expected schema: {0}")]
    Schema(String),

    #[error("analysis incomplete; missing traits: {missing:?}")]
    Incomplete { missing: Vec<BigFiveTrait> },
}

/// Parses a raw completion into exactly five trait scores, one per Big Five
/// trait, in the order they appear in the response.
pub fn parse_trait_scores(raw: &str) -> Result<Vec<TraitScore>, ParseError> {
    let text = strip_json_fences(raw);

    let value: Value =
        serde_json::from_str(text).map_err(|e| ParseError::MalformedJson(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or_else(|| ParseError::Schema("top-level value is not an array".to_string()))?;

    if items.len() != EXPECTED_ITEMS {
        return Err(ParseError::Schema(format!(
            "expected {EXPECTED_ITEMS} trait entries, got {}",
            items.len()
        )));
    }

    let mut scores: Vec<TraitScore> = Vec::with_capacity(EXPECTED_ITEMS);

    for item in items {
        let obj = item
            .as_object()
            .ok_or_else(|| ParseError::Schema(format!("trait entry is not an object: {item}")))?;

        for key in ["trait", "score", "insights"] {
            if !obj.contains_key(key) {
                return Err(ParseError::Schema(format!(
                    "trait entry is missing key '{key}': {item}"
                )));
            }
        }

        let Some(trait_name) = obj["trait"].as_str().and_then(BigFiveTrait::from_name) else {
            warn!("Unexpected trait {} in analysis response", obj["trait"]);
            continue;
        };

        if scores.iter().any(|ts| ts.trait_name == trait_name) {
            warn!("Duplicate trait '{trait_name}' in analysis response");
            continue;
        }

        let Some(score) = coerce_score(&obj["score"]) else {
            warn!(
                "Invalid score {} for trait '{trait_name}' in analysis response",
                obj["score"]
            );
            continue;
        };

        let insights = match &obj["insights"] {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };

        scores.push(TraitScore {
            trait_name,
            score,
            insights,
        });
    }

    let missing: Vec<BigFiveTrait> = BigFiveTrait::ALL
        .into_iter()
        .filter(|t| !scores.iter().any(|ts| ts.trait_name == *t))
        .collect();

    if !missing.is_empty() {
        return Err(ParseError::Incomplete { missing });
    }

    Ok(scores)
}

/// Coerces a JSON value to an integer score in [0, 100]. Accepts integers,
/// whole floats, and numeric strings.
fn coerce_score(value: &Value) -> Option<u8> {
    let n = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else {
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                f as i64
            }
        }
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };

    (0..=100).contains(&n).then_some(n as u8)
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
