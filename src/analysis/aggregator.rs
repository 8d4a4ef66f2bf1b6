//! Indicator aggregation and statistics.
//!
//! This module groups collected indicators and computes the summary
//! statistics that accompany every snapshot.

use crate::models::{
    DataRange, Direction, Indicator, IndicatorSummary, LatestValue, SummaryStatistics, Trend,
};
use crate::summary::summarize;
use std::collections::BTreeMap;

/// Compute summary statistics for a set of indicators.
pub fn summary_statistics(indicators: &BTreeMap<String, Indicator>) -> SummaryStatistics {
    let mut stats = SummaryStatistics {
        total_indicators: indicators.len(),
        ..Default::default()
    };

    for (id, indicator) in indicators {
        stats
            .categories
            .entry(indicator.category.to_string())
            .or_default()
            .push(id.clone());

        let series = &indicator.series;
        let (Some(first), Some(last)) = (series.first(), series.last()) else {
            continue;
        };

        stats.data_ranges.insert(
            id.clone(),
            DataRange {
                start_date: first.date,
                end_date: last.date,
                observations: series.len(),
            },
        );

        stats.latest_values.insert(
            id.clone(),
            LatestValue {
                value: last.value,
                date: last.date,
            },
        );

        if let [.., prev, latest] = series.observations() {
            let recent_change = latest.value - prev.value;
            let percent_change = if prev.value != 0.0 {
                recent_change / prev.value * 100.0
            } else {
                0.0
            };

            stats.trends.insert(
                id.clone(),
                Trend {
                    recent_change,
                    percent_change,
                    direction: Direction::from_change(Some(recent_change)),
                },
            );
        }
    }

    stats
}

/// Summarize every indicator in the map, keyed by indicator id.
pub fn summarize_all(
    indicators: &BTreeMap<String, Indicator>,
    compute_yoy: bool,
) -> BTreeMap<String, IndicatorSummary> {
    indicators
        .iter()
        .map(|(id, indicator)| (id.clone(), summarize(&indicator.series, compute_yoy)))
        .collect()
}

/// Indicators sorted by absolute percent change (largest movers first).
pub fn top_movers(stats: &SummaryStatistics, n: usize) -> Vec<(&str, &Trend)> {
    let mut movers: Vec<_> = stats
        .trends
        .iter()
        .map(|(id, trend)| (id.as_str(), trend))
        .collect();

    movers.sort_by(|a, b| {
        b.1.percent_change
            .abs()
            .partial_cmp(&a.1.percent_change.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    movers.truncate(n);

    movers
}

/// Generate a text summary of the collected snapshot.
pub fn generate_summary_text(stats: &SummaryStatistics) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Total Indicators: {}", stats.total_indicators));

    let (up, down, stable) = stats
        .trends
        .values()
        .fold((0, 0, 0), |(u, d, s), t| match t.direction {
            Direction::Up => (u + 1, d, s),
            Direction::Down => (u, d + 1, s),
            Direction::Stable => (u, d, s + 1),
        });
    lines.push(format!(
        "- {} Up: {} | {} Down: {} | {} Stable: {}",
        Direction::Up.arrow(),
        up,
        Direction::Down.arrow(),
        down,
        Direction::Stable.arrow(),
        stable
    ));

    if !stats.categories.is_empty() {
        lines.push(String::new());
        lines.push("By Category:".to_string());

        let mut categories: Vec<_> = stats.categories.iter().collect();
        categories.sort_by_key(|(_, ids)| std::cmp::Reverse(ids.len()));

        for (category, ids) in categories {
            lines.push(format!("- {}: {}", category, ids.len()));
        }
    }

    lines.join("\n")
}
