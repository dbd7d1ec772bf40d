//! Time-based selection of the tags worth indexing.
//!
//! Commit timestamps are standardized and split into `k` clusters; the newest
//! tag of each cluster represents it.

use chrono::NaiveDateTime;
use clonedex_config::VersionsConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Format of commit timestamps as printed by `git log --pretty=%ai`, minus
/// the zone offset.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One `(tag, timestamp)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagTime {
    pub tag: String,
    pub timestamp: String,
}

impl TagTime {
    pub fn new(tag: impl Into<String>, timestamp: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            timestamp: timestamp.into(),
        }
    }
}

/// Splits one-dimensional values into clusters.
pub trait Partitioner {
    /// One label in `0..k` per value. Every label is used when
    /// `values.len() >= k`.
    fn partition(&self, values: &[f64], k: usize) -> Vec<usize>;
}

/// Exact 1-D k-means: dynamic programming over the sorted values.
#[derive(Debug, Clone, Copy, Default)]
pub struct KMeans1d;

impl Partitioner for KMeans1d {
    fn partition(&self, values: &[f64], k: usize) -> Vec<usize> {
        let n = values.len();
        if n == 0 || k <= 1 {
            return vec![0; n];
        }
        let k = k.min(n);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

        let mut sum = vec![0.0; n + 1];
        let mut sum_sq = vec![0.0; n + 1];
        for (i, &idx) in order.iter().enumerate() {
            let v = values[idx];
            sum[i + 1] = sum[i] + v;
            sum_sq[i + 1] = sum_sq[i] + v * v;
        }
        // Within-cluster sum of squares of sorted[lo..=hi].
        let cost = |lo: usize, hi: usize| {
            let len = (hi - lo + 1) as f64;
            let s = sum[hi + 1] - sum[lo];
            ((sum_sq[hi + 1] - sum_sq[lo]) - s * s / len).max(0.0)
        };

        // best[m][i]: cost of sorted[..=i] split into m + 1 clusters,
        // first[m][i]: where the last of those clusters begins.
        let mut best = vec![vec![f64::INFINITY; n]; k];
        let mut first = vec![vec![0usize; n]; k];
        for i in 0..n {
            best[0][i] = cost(0, i);
        }
        for m in 1..k {
            for i in m..n {
                for j in m..=i {
                    let candidate = best[m - 1][j - 1] + cost(j, i);
                    if candidate < best[m][i] {
                        best[m][i] = candidate;
                        first[m][i] = j;
                    }
                }
            }
        }

        let mut labels = vec![0; n];
        let mut end = n - 1;
        for m in (0..k).rev() {
            let begin = if m == 0 { 0 } else { first[m][end] };
            for &idx in &order[begin..=end] {
                labels[idx] = m;
            }
            if m > 0 {
                end = begin - 1;
            }
        }
        labels
    }
}

/// Zero mean, unit population variance. A constant input is only centered.
pub fn standardize(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return vec![];
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let scale = if variance > 0.0 { variance.sqrt() } else { 1.0 };
    values.iter().map(|v| (v - mean) / scale).collect()
}

/// Seconds since the epoch for a [`TIMESTAMP_FORMAT`] string.
pub fn parse_timestamp(timestamp: &str) -> Option<i64> {
    NaiveDateTime::parse_from_str(timestamp.trim(), TIMESTAMP_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Picks one representative tag per time cluster.
#[derive(Debug, Clone)]
pub struct VersionSelector<P = KMeans1d> {
    clusters: usize,
    partitioner: P,
}

impl VersionSelector<KMeans1d> {
    pub fn new(clusters: usize) -> Self {
        Self::with_partitioner(clusters, KMeans1d)
    }

    pub fn from_config(config: &VersionsConfig) -> Self {
        Self::new(config.clusters)
    }
}

impl<P: Partitioner> VersionSelector<P> {
    pub fn with_partitioner(clusters: usize, partitioner: P) -> Self {
        Self {
            clusters,
            partitioner,
        }
    }

    /// Select representatives from a tag → timestamp map.
    ///
    /// With fewer entries than clusters every entry is returned as-is, in map
    /// order. Otherwise entries with unparseable timestamps are dropped and
    /// the result holds one entry per cluster in ascending time order.
    pub fn select(&self, entries: &BTreeMap<String, String>) -> Vec<TagTime> {
        if entries.len() < self.clusters {
            return entries
                .iter()
                .map(|(tag, ts)| TagTime::new(tag.as_str(), ts.as_str()))
                .collect();
        }

        let mut parsed: Vec<(i64, &str, &str)> = entries
            .iter()
            .filter_map(|(tag, ts)| match parse_timestamp(ts) {
                Some(secs) => Some((secs, tag.as_str(), ts.as_str())),
                None => {
                    warn!("Dropping tag {} with unparseable time {:?}", tag, ts);
                    None
                }
            })
            .collect();
        parsed.sort();

        let values: Vec<f64> = parsed.iter().map(|(secs, _, _)| *secs as f64).collect();
        let labels = self
            .partitioner
            .partition(&standardize(&values), self.clusters);

        // Newest entry per label; ties keep the first in sorted order.
        let mut newest: BTreeMap<usize, usize> = BTreeMap::new();
        for (pos, &label) in labels.iter().enumerate() {
            match newest.get(&label) {
                Some(&cur) if parsed[cur].0 >= parsed[pos].0 => {}
                _ => {
                    newest.insert(label, pos);
                }
            }
        }

        let mut picks: Vec<usize> = newest.into_values().collect();
        picks.sort_unstable();
        let selected: Vec<TagTime> = picks
            .into_iter()
            .map(|pos| TagTime::new(parsed[pos].1, parsed[pos].2))
            .collect();
        debug!(
            "Selected {} of {} tags: {:?}",
            selected.len(),
            entries.len(),
            selected.iter().map(|t| t.tag.as_str()).collect::<Vec<_>>()
        );
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn stamp(dt: NaiveDateTime) -> String {
        dt.format(TIMESTAMP_FORMAT).to_string()
    }

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn fewer_entries_than_clusters_pass_through() {
        let entries: BTreeMap<String, String> = [
            ("v1.0", "2020-01-01 00:00:00"),
            ("v1.1", "2020-06-01 12:00:00"),
            ("master", "2021-02-03 04:05:06"),
        ]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();

        let selected = VersionSelector::new(5).select(&entries);
        assert_eq!(
            selected,
            vec![
                TagTime::new("master", "2021-02-03 04:05:06"),
                TagTime::new("v1.0", "2020-01-01 00:00:00"),
                TagTime::new("v1.1", "2020-06-01 12:00:00"),
            ]
        );
    }

    #[test]
    fn five_release_trains_over_ten_years() {
        // Ten tags a few days apart, every two years.
        let mut entries = BTreeMap::new();
        for train in 0..5 {
            for patch in 0..10 {
                let when = base() + Duration::days(730 * train + 3 * patch);
                entries.insert(format!("v{}.{}", train, patch), stamp(when));
            }
        }
        assert_eq!(entries.len(), 50);

        let selected = VersionSelector::new(5).select(&entries);
        let tags: Vec<&str> = selected.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(tags, vec!["v0.9", "v1.9", "v2.9", "v3.9", "v4.9"]);
    }

    #[test]
    fn each_pick_is_newest_of_its_cluster() {
        // Irregular spacing over ten years.
        let mut entries = BTreeMap::new();
        for i in 0..50i64 {
            let days = (i * i * 37 + i * 11) % 3650;
            entries.insert(format!("t{:02}", i), stamp(base() + Duration::days(days)));
        }

        let selected = VersionSelector::new(5).select(&entries);
        assert_eq!(selected.len(), 5);

        let mut all: Vec<(i64, String)> = entries
            .iter()
            .map(|(tag, ts)| (parse_timestamp(ts).unwrap(), tag.clone()))
            .collect();
        all.sort();
        let values: Vec<f64> = all.iter().map(|(s, _)| *s as f64).collect();
        let labels = KMeans1d.partition(&standardize(&values), 5);

        for pick in &selected {
            let secs = parse_timestamp(&pick.timestamp).unwrap();
            let pos = all.iter().position(|(_, t)| *t == pick.tag).unwrap();
            let label = labels[pos];
            let newest = all
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l == label)
                .map(|((s, _), _)| *s)
                .max()
                .unwrap();
            assert_eq!(secs, newest);
        }

        let times: Vec<i64> = selected
            .iter()
            .map(|t| parse_timestamp(&t.timestamp).unwrap())
            .collect();
        assert!(times.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn unparseable_timestamps_are_dropped() {
        let mut entries = BTreeMap::new();
        for i in 0..6 {
            entries.insert(
                format!("v{}", i),
                stamp(base() + Duration::days(400 * i)),
            );
        }
        entries.insert("broken".to_string(), "yesterday".to_string());

        let selected = VersionSelector::new(5).select(&entries);
        assert_eq!(selected.len(), 5);
        assert!(selected.iter().all(|t| t.tag != "broken"));
    }

    #[test]
    fn kmeans_uses_every_cluster() {
        let labels = KMeans1d.partition(&[5.0, 1.0, 1.0, 1.0, 9.0, 9.0], 3);
        assert_eq!(labels, vec![1, 0, 0, 0, 2, 2]);

        // Identical values still yield k non-empty clusters.
        let labels = KMeans1d.partition(&[2.0; 4], 4);
        let mut sorted = labels.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn standardize_constant_input() {
        assert_eq!(standardize(&[3.0, 3.0]), vec![0.0, 0.0]);
        let z = standardize(&[1.0, 3.0]);
        assert_eq!(z, vec![-1.0, 1.0]);
    }

    #[test]
    fn parses_git_timestamps() {
        assert_eq!(parse_timestamp("1970-01-01 00:01:00"), Some(60));
        assert_eq!(parse_timestamp("2020-13-01 00:00:00"), None);
    }
}
