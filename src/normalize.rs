//! Categorical normalization of inventory records.
//!
//! For each category, keys are applied in taxonomy order and, within a key,
//! patterns in list order. Patterns always test the raw value. Every matching
//! row is assigned the key straight away, so a later key overwrites a row an
//! earlier key already claimed: the last applied match wins, not the first.
//! Rows no pattern ever matched become [`UNKNOWN`].

use crate::log::{debug, info};
use crate::taxonomy::{Taxonomy, Vocabulary};
use crate::types::{Category, NormalizedRecord, Record, UNKNOWN};

/// Normalize every classification field of `records`.
///
/// Total: a missing value or a value nothing matches becomes [`UNKNOWN`].
pub fn normalize(records: &[Record], taxonomy: &Taxonomy) -> Vec<NormalizedRecord> {
    info!(rows = records.len(), "cleaning data");

    let [mut organism, mut disease, mut tissue] = Category::ALL.map(|category| {
        let values = records
            .iter()
            .map(|r| r.field(category).map(str::to_owned))
            .collect();
        apply_vocabulary(values, taxonomy.vocabulary(category)).into_iter()
    });

    records
        .iter()
        .map(|r| NormalizedRecord {
            drawer: r.drawer,
            position: r.position.clone(),
            name: r.name.clone(),
            date: r.date.clone(),
            organism: organism.next().unwrap_or_else(|| UNKNOWN.to_string()),
            disease: disease.next().unwrap_or_else(|| UNKNOWN.to_string()),
            tissue: tissue.next().unwrap_or_else(|| UNKNOWN.to_string()),
        })
        .collect()
}

/// Normalize a single value against one category's vocabulary.
pub fn normalize_value(value: Option<&str>, vocabulary: &Vocabulary) -> String {
    apply_vocabulary(vec![value.map(str::to_owned)], vocabulary)
        .into_iter()
        .next()
        .unwrap_or_else(|| UNKNOWN.to_string())
}

fn apply_vocabulary(values: Vec<Option<String>>, vocabulary: &Vocabulary) -> Vec<String> {
    let category = vocabulary.category;
    let mut assigned: Vec<Option<&str>> = vec![None; values.len()];

    for key in &vocabulary.keys {
        for pattern in &key.patterns {
            let mut hits = 0usize;
            for (value, slot) in values.iter().zip(assigned.iter_mut()) {
                if pattern.is_match(value.as_deref()) {
                    *slot = Some(key.name.as_str());
                    hits += 1;
                }
            }
            if hits > 0 {
                debug!(
                    %category,
                    key = %key.name,
                    pattern = pattern.fragment(),
                    rows = hits,
                    "rows matching key"
                );
            }
        }
    }

    let mut unknown = 0usize;
    let out = assigned
        .into_iter()
        .map(|key| match key {
            Some(k) => k.to_string(),
            None => {
                unknown += 1;
                UNKNOWN.to_string()
            }
        })
        .collect();
    debug!(%category, rows = unknown, "rows without match (set to unknown)");
    out
}
