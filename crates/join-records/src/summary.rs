//! Category summaries for the report renderer.

use indexmap::IndexMap;
use join_core::{CategoryCount, ChartSummary};

use crate::models::GroupRecords;

/// Summarize one group's records.
///
/// Categories are ordered by count (largest first, ties by name). The time
/// range spans the earliest and latest `accept_time`, cut to minutes.
pub fn summarize(group_id: &str, records: &GroupRecords) -> ChartSummary {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    let mut times: Vec<&str> = Vec::new();

    for record in records.values() {
        *counts.entry(record.category.as_str()).or_default() += 1;
        if !record.accept_time.is_empty() {
            times.push(record.accept_time.as_str());
        }
    }

    let mut categories: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect();
    categories.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));

    times.sort_unstable();
    let time_range = match (times.first(), times.last()) {
        (Some(first), Some(last)) => Some((to_minutes(first), to_minutes(last))),
        _ => None,
    };

    ChartSummary {
        group_id: group_id.to_string(),
        total: categories.iter().map(|c| c.count).sum(),
        categories,
        time_range,
    }
}

fn to_minutes(time: &str) -> String {
    // "YYYY-MM-DD HH:MM:SS" -> "YYYY-MM-DD HH:MM"
    if time.len() > 16 {
        time.get(..time.len() - 3).unwrap_or(time).to_string()
    } else {
        time.to_string()
    }
}
