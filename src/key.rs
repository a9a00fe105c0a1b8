//! Weighting-key normalization: free-text survey answers to ordinal codes.

use crate::data::{Answer, Category, Resident};
use crate::error::{SolveError, SolveResult};
use log::debug;
use std::collections::BTreeMap;

/// The survey reduced to the numeric arrays the optimization core consumes.
#[derive(Debug, Clone)]
pub struct NormalizedSurvey {
    pub names: Vec<String>,
    pub genders: Vec<String>,
    pub preferences: Vec<Vec<f64>>,
    pub category_weights: Vec<f64>,
}

/// Middle rank of a category's scale, used to impute missing answers.
fn middle_rank(scale: &BTreeMap<u8, String>) -> Option<f64> {
    let codes: Vec<u8> = scale.keys().copied().collect();
    if codes.is_empty() {
        None
    } else {
        Some(codes[(codes.len() - 1) / 2] as f64)
    }
}

fn resolve_answer(
    resident: &Resident,
    category: &Category,
    labels: &BTreeMap<&str, u8>,
) -> SolveResult<f64> {
    match resident.answers.get(&category.category) {
        Some(Some(Answer::Code(code))) => Ok(*code),
        Some(Some(Answer::Label(label))) => {
            let label = label.trim();
            if let Some(code) = labels.get(label) {
                return Ok(*code as f64);
            }
            // numeric answers arriving as text still count as codes
            label.parse::<f64>().map_err(|_| {
                SolveError::InvalidInput(format!(
                    "answer '{}' from '{}' is not on the '{}' scale",
                    label, resident.name, category.category
                ))
            })
        }
        Some(None) | None => middle_rank(&category.scale).ok_or_else(|| {
            SolveError::InvalidInput(format!(
                "'{}' left '{}' unanswered and the category has no scale to impute from",
                resident.name, category.category
            ))
        }),
    }
}

/// Maps every resident's answers onto the ordinal scales of the weighting
/// key, producing the preference matrix and aligned weight vector.
///
/// Only categories present in both the key and at least one resident's
/// answers are scored. Missing answers take the category's middle rank;
/// free-text answers that appear on no scale and do not parse as numbers
/// are rejected.
pub fn normalize(residents: &[Resident], key: &[Category]) -> SolveResult<NormalizedSurvey> {
    let scored: Vec<&Category> = key
        .iter()
        .filter(|c| residents.iter().any(|r| r.answers.contains_key(&c.category)))
        .collect();
    debug!(
        "{} of {} key categories are present in the survey.",
        scored.len(),
        key.len()
    );

    let label_maps: Vec<BTreeMap<&str, u8>> = scored
        .iter()
        .map(|c| c.scale.iter().map(|(code, label)| (label.trim(), *code)).collect())
        .collect();

    let mut preferences = Vec::with_capacity(residents.len());
    for resident in residents {
        let mut row = Vec::with_capacity(scored.len());
        for (category, labels) in scored.iter().zip(&label_maps) {
            row.push(resolve_answer(resident, category, labels)?);
        }
        preferences.push(row);
    }

    Ok(NormalizedSurvey {
        names: residents.iter().map(|r| r.name.trim().to_string()).collect(),
        genders: residents.iter().map(|r| r.gender.trim().to_string()).collect(),
        preferences,
        category_weights: scored.iter().map(|c| c.weighting).collect(),
    })
}
