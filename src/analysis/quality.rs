//! Data quality checks for collected indicators.

use crate::models::{
    Completeness, DataQualityReport, FetchFailure, Freshness, FreshnessStatus, Indicator,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Completeness below this percentage is reported as an issue.
const MIN_COMPLETENESS_PCT: f64 = 80.0;

/// Data older than this many days is reported as an issue.
const MAX_AGE_DAYS: i64 = 60;

/// Build the data quality report for a snapshot as of `as_of`.
pub fn data_quality_report(
    indicators: &BTreeMap<String, Indicator>,
    failures: &[FetchFailure],
    as_of: NaiveDate,
) -> DataQualityReport {
    let mut report = DataQualityReport {
        total_indicators: indicators.len() + failures.len(),
        ..Default::default()
    };

    for (id, indicator) in indicators {
        let series = &indicator.series;

        let Some(latest) = series.last() else {
            report.failed_fetches += 1;
            report.issues.push(format!("{}: No observations returned", id));
            continue;
        };

        report.successful_fetches += 1;
        *report.sources.entry(indicator.source.to_string()).or_default() += 1;

        let total = series.len() + series.dropped();
        let completeness_pct = series.len() as f64 / total as f64 * 100.0;
        report.completeness.insert(
            id.clone(),
            Completeness {
                completeness_pct,
                missing_values: series.dropped(),
                total_observations: total,
            },
        );

        let days_old = (as_of - latest.date).num_days();
        report.freshness.insert(
            id.clone(),
            Freshness {
                latest_date: latest.date,
                days_old,
                status: FreshnessStatus::from_days_old(days_old),
            },
        );

        if completeness_pct < MIN_COMPLETENESS_PCT {
            report.issues.push(format!(
                "{}: Low data completeness ({:.1}%)",
                id, completeness_pct
            ));
        }

        if days_old > MAX_AGE_DAYS {
            report
                .issues
                .push(format!("{}: Stale data ({} days old)", id, days_old));
        }
    }

    for failure in failures {
        report.failed_fetches += 1;
        report.issues.push(format!(
            "{}: Failed to fetch data from {} ({})",
            failure.id, failure.source, failure.error
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DataSource, IndicatorCategory, SeriesMetadata, TimeSeries};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn indicator(id: &str, points: Vec<(NaiveDate, Option<f64>)>) -> (String, Indicator) {
        (
            id.to_string(),
            Indicator {
                id: id.to_string(),
                name: id.to_string(),
                category: IndicatorCategory::Growth,
                source: DataSource::Fred,
                metadata: SeriesMetadata::default(),
                series: TimeSeries::from_points(points),
            },
        )
    }

    #[test]
    fn test_quality_report_counts_and_freshness() {
        let indicators: BTreeMap<_, _> = vec![
            indicator(
                "fresh",
                vec![(date(2025, 1, 1), Some(1.0)), (date(2025, 1, 10), Some(2.0))],
            ),
            indicator("old", vec![(date(2024, 10, 1), Some(1.0))]),
        ]
        .into_iter()
        .collect();

        let report = data_quality_report(&indicators, &[], date(2025, 1, 12));

        assert_eq!(report.total_indicators, 2);
        assert_eq!(report.successful_fetches, 2);
        assert_eq!(report.failed_fetches, 0);
        assert_eq!(report.sources["FRED"], 2);
        assert_eq!(report.freshness["fresh"].days_old, 2);
        assert_eq!(report.freshness["fresh"].status, FreshnessStatus::Fresh);
        assert_eq!(report.freshness["old"].status, FreshnessStatus::VeryStale);
        assert_eq!(report.issues.len(), 1);
        assert!(report.issues[0].starts_with("old: Stale data"));
    }

    #[test]
    fn test_quality_report_low_completeness() {
        let indicators: BTreeMap<_, _> = vec![indicator(
            "gappy",
            vec![
                (date(2025, 1, 1), Some(1.0)),
                (date(2025, 1, 2), None),
                (date(2025, 1, 3), None),
                (date(2025, 1, 4), Some(2.0)),
            ],
        )]
        .into_iter()
        .collect();

        let report = data_quality_report(&indicators, &[], date(2025, 1, 4));
        let completeness = &report.completeness["gappy"];

        assert_eq!(completeness.total_observations, 4);
        assert_eq!(completeness.missing_values, 2);
        assert_eq!(completeness.completeness_pct, 50.0);
        assert!(report.issues[0].contains("Low data completeness (50.0%)"));
    }

    #[test]
    fn test_quality_report_failures() {
        let indicators: BTreeMap<_, _> = vec![indicator("empty", vec![])].into_iter().collect();
        let failures = vec![FetchFailure {
            id: "cpi".to_string(),
            source: DataSource::Fred,
            error: "HTTP 500".to_string(),
        }];

        let report = data_quality_report(&indicators, &failures, date(2025, 1, 1));

        assert_eq!(report.total_indicators, 2);
        assert_eq!(report.successful_fetches, 0);
        assert_eq!(report.failed_fetches, 2);
        assert!(report.issues.iter().any(|i| i.starts_with("empty:")));
        assert!(report
            .issues
            .iter()
            .any(|i| i.contains("cpi: Failed to fetch data from FRED")));
    }
}
