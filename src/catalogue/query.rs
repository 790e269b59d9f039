use std::cmp::Ordering;

use chrono::Datelike;
use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use super::profile::{CatalogueProfile, RankField, RankOrder, SortKey};
use super::record::CatalogueRecord;

/// The user-controlled part of a listing: search text, category, sort and
/// the page being looked at.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct QueryState {
    pub text: String,
    pub category: Option<String>,
    pub sort: SortKey,
    pub page: usize,
}

impl QueryState {
    pub fn new(sort: SortKey) -> Self {
        Self {
            text: String::new(),
            category: None,
            sort,
            page: 1,
        }
    }

    pub fn for_profile(profile: &CatalogueProfile) -> Self {
        Self::new(profile.default_sort)
    }

    fn needle(&self) -> String {
        self.text.trim().to_lowercase()
    }

    fn category(&self) -> Option<&str> {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(SortKey::Default)
    }
}

/// Runs the visibility gate, text and category filters, then a stable sort.
/// The input is left untouched; the output borrows from it.
pub fn query<'a, I>(
    records: I,
    state: &QueryState,
    profile: &CatalogueProfile,
) -> Vec<&'a CatalogueRecord>
where
    I: IntoIterator<Item = &'a CatalogueRecord>,
{
    let needle = state.needle();
    let category = state.category();

    let mut out: Vec<&CatalogueRecord> = records
        .into_iter()
        .filter(|r| profile.is_visible(r.status.as_deref()))
        .filter(|r| needle.is_empty() || r.searchable_text().contains(&needle))
        .filter(|r| match category {
            Some(c) => r.categories.iter().any(|rc| rc == c),
            None => true,
        })
        .collect();

    match state.sort {
        SortKey::Default => {}
        SortKey::Alphabetical => out.sort_by_cached_key(|r| collation_key(&r.name)),
        SortKey::Rank => out.sort_by(|a, b| {
            compare_ranks(
                rank_of(a, profile.rank_field),
                rank_of(b, profile.rank_field),
                profile.rank_order,
            )
        }),
    }
    out
}

/// Distinct categories in first-seen order over the visible records, for the
/// category select.
pub fn categories<'a, I>(records: I, profile: &CatalogueProfile) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a CatalogueRecord>,
{
    let mut out: Vec<&str> = Vec::new();
    for r in records {
        if !profile.is_visible(r.status.as_deref()) {
            continue;
        }
        for c in r.categories.iter() {
            if !out.contains(&c.as_str()) {
                out.push(c);
            }
        }
    }
    out
}

/// Case and accent folded form of a name: decomposed, combining marks
/// dropped, lower-cased. `Élan` and `elan` share a key.
fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn rank_of(record: &CatalogueRecord, field: RankField) -> Option<f64> {
    match field {
        RankField::MarketCap => record.market_cap,
        RankField::Priority => record.priority,
        RankField::Date => record.published.map(|d| f64::from(d.num_days_from_ce())),
    }
}

fn compare_ranks(a: Option<f64>, b: Option<f64>, order: RankOrder) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            match order {
                RankOrder::Ascending => ord,
                RankOrder::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
