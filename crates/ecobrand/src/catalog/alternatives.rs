use std::cmp::Ordering;
use std::collections::HashSet;

use serde::Deserialize;

use super::domain::ProductRecord;

/// Generic words that say nothing about what a product is.
const STOP_WORDS: &[&str] = &[
    "the", "and", "with", "for", "from", "by", "new", "series", "model", "edition", "speaker",
    "pack", "set", "size", "color", "case", "cover", "brand", "motif", "pattern",
];

/// Query string accepted by the alternatives endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AlternativeQuery {
    #[serde(default, rename = "productId")]
    pub product_id: Option<String>,
    #[serde(default, rename = "productName")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub count: Option<usize>,
}

/// Lowercase name tokens of at least two characters, minus stop words.
pub(crate) fn name_tokens(name: &str) -> HashSet<String> {
    let cleaned: String = name
        .to_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' || ch.is_whitespace() {
                ch
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.len() >= 2 && !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Leading capitalized word of a product name, lowercased.
pub(crate) fn guess_brand(name: &str) -> Option<String> {
    let name = name.trim_start();
    let mut chars = name.chars();
    if !chars.next()?.is_ascii_uppercase() {
        return None;
    }

    let brand: String = name
        .chars()
        .take_while(|ch| ch.is_ascii_alphanumeric() || *ch == '-')
        .collect();
    (brand.chars().count() >= 2).then(|| brand.to_lowercase())
}

/// Same category, same guessed brand, or any shared name token.
pub(crate) fn is_related(base: &ProductRecord, candidate: &ProductRecord) -> bool {
    let base_category = base.category.trim();
    if !base_category.is_empty() && base_category.eq_ignore_ascii_case(candidate.category.trim()) {
        return true;
    }

    if let (Some(base_brand), Some(candidate_brand)) =
        (guess_brand(&base.name), guess_brand(&candidate.name))
    {
        if base_brand == candidate_brand {
            return true;
        }
    }

    let base_tokens = name_tokens(&base.name);
    name_tokens(&candidate.name)
        .iter()
        .any(|token| base_tokens.contains(token))
}

fn is_better(candidate: Option<f64>, base: Option<f64>) -> bool {
    match (candidate, base) {
        (Some(candidate), Some(base)) => candidate > base,
        (Some(_), None) => true,
        (None, _) => false,
    }
}

/// Higher scores first; unscored products sink.
fn by_score_desc(a: &&ProductRecord, b: &&ProductRecord) -> Ordering {
    match (a.eco.score, b.eco.score) {
        (Some(left), Some(right)) => right.partial_cmp(&left).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Pick up to `count` alternatives for `base`: related products that score better, then any
/// related product, then the rest of the catalog. Each tier is ordered by score and keeps the
/// candidates' input order on ties.
pub(crate) fn rank_alternatives<'a>(
    base: &ProductRecord,
    candidates: &'a [ProductRecord],
    count: usize,
) -> Vec<&'a ProductRecord> {
    let mut related_better = Vec::new();
    let mut related = Vec::new();
    let mut global = Vec::new();

    for candidate in candidates.iter().filter(|candidate| candidate.id != base.id) {
        if is_related(base, candidate) {
            if is_better(candidate.eco.score, base.eco.score) {
                related_better.push(candidate);
            }
            related.push(candidate);
        }
        global.push(candidate);
    }

    for tier in [&mut related_better, &mut related, &mut global] {
        tier.sort_by(by_score_desc);
    }

    let mut seen = HashSet::new();
    related_better
        .into_iter()
        .chain(related)
        .chain(global)
        .filter(|candidate| seen.insert(candidate.id.clone()))
        .take(count)
        .collect()
}
