//! Cross-candidate views over stored assessments and profiles.
//!
//! Pure functions over store snapshots so the joins and averages are
//! testable without any store or handler involved.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::models::{Assessment, PersonalityProfile};

/// Status text for candidates that have a profile but no assessment record.
const STATUS_ASSESSMENT_MISSING: &str = "Completed (Assessment data missing)";

#[derive(Debug, Serialize)]
pub struct CandidateSummary {
    pub candidate_id: String,
    pub assessment_id: Option<String>,
    pub assessment_status: String,
    pub profile_available: bool,
    pub summary_text: Option<String>,
}

/// One candidate's entry in a comparison, with scores filtered to the
/// requested traits.
#[derive(Debug, Serialize)]
pub struct ComparisonEntry {
    pub summary: String,
    pub scores: HashMap<String, u8>,
}

#[derive(Debug, Serialize)]
pub struct TrendReport {
    pub total_profiles_analyzed: usize,
    /// Arithmetic mean per trait, rounded to one decimal.
    pub average_scores_per_trait: HashMap<String, f64>,
}

/// Joins the assessment table with the profile store: one entry per distinct
/// candidate (first assessment encountered), plus profile-only candidates.
pub fn build_summaries(
    assessments: &[Assessment],
    profiles: &HashMap<String, PersonalityProfile>,
) -> Vec<CandidateSummary> {
    let mut summaries = Vec::new();
    let mut processed: HashSet<&str> = HashSet::new();

    for assessment in assessments {
        if !processed.insert(&assessment.candidate_id) {
            continue;
        }
        let profile = profiles.get(&assessment.candidate_id);
        summaries.push(CandidateSummary {
            candidate_id: assessment.candidate_id.clone(),
            assessment_id: Some(assessment.id.clone()),
            assessment_status: assessment.status.as_str().to_string(),
            profile_available: profile.is_some(),
            summary_text: profile.map(|p| p.summary.clone()),
        });
    }

    for (candidate_id, profile) in profiles {
        if processed.insert(candidate_id) {
            summaries.push(CandidateSummary {
                candidate_id: candidate_id.clone(),
                assessment_id: None,
                assessment_status: STATUS_ASSESSMENT_MISSING.to_string(),
                profile_available: true,
                summary_text: Some(profile.summary.clone()),
            });
        }
    }

    summaries
}

/// Builds per-candidate comparison entries, filtered to the requested traits
/// (all traits when unspecified). Candidates without a profile map to None.
pub fn build_comparison(
    candidate_ids: &[String],
    traits: Option<&[String]>,
    profiles: &HashMap<String, PersonalityProfile>,
) -> HashMap<String, Option<ComparisonEntry>> {
    candidate_ids
        .iter()
        .map(|candidate_id| {
            let entry = profiles.get(candidate_id).map(|profile| {
                let scores = profile
                    .traits
                    .iter()
                    .filter(|ts| {
                        traits
                            .map(|wanted| wanted.iter().any(|w| w == ts.trait_name.name()))
                            .unwrap_or(true)
                    })
                    .map(|ts| (ts.trait_name.name().to_string(), ts.score))
                    .collect();
                ComparisonEntry {
                    summary: profile.summary.clone(),
                    scores,
                }
            });
            (candidate_id.clone(), entry)
        })
        .collect()
}

/// Per-trait average scores across all stored profiles.
pub fn build_trends(profiles: &[PersonalityProfile]) -> TrendReport {
    let mut totals: HashMap<&str, (u64, u64)> = HashMap::new();

    for profile in profiles {
        for ts in &profile.traits {
            let entry = totals.entry(ts.trait_name.name()).or_insert((0, 0));
            entry.0 += ts.score as u64;
            entry.1 += 1;
        }
    }

    let average_scores_per_trait = totals
        .into_iter()
        .map(|(trait_name, (total, count))| {
            let mean = total as f64 / count as f64;
            (trait_name.to_string(), (mean * 10.0).round() / 10.0)
        })
        .collect();

    TrendReport {
        total_profiles_analyzed: profiles.len(),
        average_scores_per_trait,
    }
}
