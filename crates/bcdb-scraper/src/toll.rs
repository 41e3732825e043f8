//! Toll snapshot derivation from the daily cumulative history feed.
//!
//! Several metrics are reported only sporadically: a report may omit them or
//! carry `0`/`null`. Those metrics are backfilled with the most recent
//! non-zero value instead of being taken from the latest report.

use bcdb_core::TollSnapshot;
use serde::Deserialize;

use crate::client::SourceClient;

/// Label used when the latest report carries no `report_date`.
const UNDATED_LABEL: &str = "Today";

/// Output metric → feed field, resolved with [`last_known`].
const BACKFILLED: [(&str, &str); 6] = [
    ("children", "ext_killed_children_cum"),
    ("women", "ext_killed_women_cum"),
    ("medical", "ext_med_killed_cum"),
    ("press", "ext_press_killed_cum"),
    ("civil_defense", "ext_civdef_killed_cum"),
    ("starved", "famine_cum"),
];

/// One daily report. Fields vary between reports, so the raw object is kept.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct HistoryPoint(serde_json::Map<String, serde_json::Value>);

impl HistoryPoint {
    /// Integer value of `field`; fractional values are truncated and
    /// non-numeric or missing values are `None`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn metric(&self, field: &str) -> Option<i64> {
        let value = self.0.get(field)?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }

    #[must_use]
    pub fn report_date(&self) -> Option<&str> {
        self.0.get("report_date").and_then(serde_json::Value::as_str)
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for HistoryPoint {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// Most recent value of `field` that is greater than zero, scanning from the
/// newest report backwards. `0` when no report has one.
#[must_use]
pub fn last_known(history: &[HistoryPoint], field: &str) -> i64 {
    history
        .iter()
        .rev()
        .find_map(|point| point.metric(field).filter(|v| *v > 0))
        .unwrap_or(0)
}

/// Builds the snapshot from an oldest-first history.
///
/// Returns `None` for an empty history.
#[must_use]
pub fn derive_snapshot(history: &[HistoryPoint]) -> Option<TollSnapshot> {
    let latest = history.last()?;

    let mut snapshot = TollSnapshot::new(latest.report_date().unwrap_or(UNDATED_LABEL))
        .with("killed", latest.metric("killed_cum").unwrap_or(0))
        .with("injured", latest.metric("injured_cum").unwrap_or(0));

    for (metric, field) in BACKFILLED {
        snapshot = snapshot.with(metric, last_known(history, field));
    }

    let aid_attacked = last_known(history, "aid_seeker_killed_cum")
        + last_known(history, "aid_seeker_injured_cum");
    Some(snapshot.with("aid_attacked", aid_attacked))
}

/// Fetches the feed at `url` and derives the current snapshot.
///
/// Never fails: transport errors, malformed bodies and empty feeds all yield
/// [`TollSnapshot::offline_fallback`].
pub async fn fetch_toll(client: &SourceClient, url: &str) -> TollSnapshot {
    let history = match client.get_json::<Vec<HistoryPoint>>(url).await {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!(url, error = %e, "toll feed unavailable, using offline snapshot");
            return TollSnapshot::offline_fallback();
        }
    };

    match derive_snapshot(&history) {
        Some(snapshot) => {
            tracing::info!(
                reports = history.len(),
                killed = snapshot.get("killed").unwrap_or(0),
                starved = snapshot.get("starved").unwrap_or(0),
                last_update = %snapshot.last_update,
                "toll snapshot derived"
            );
            snapshot
        }
        None => {
            tracing::warn!(url, "toll feed is empty, using offline snapshot");
            TollSnapshot::offline_fallback()
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn history(value: serde_json::Value) -> Vec<HistoryPoint> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn last_known_skips_trailing_zeroes() {
        let h = history(json!([
            {"killed_cum": 10, "famine_cum": 0},
            {"killed_cum": 15, "famine_cum": 0},
            {"killed_cum": 20, "famine_cum": 5}
        ]));
        assert_eq!(last_known(&h, "famine_cum"), 5);

        let h = history(json!([{"x": 3}, {"x": 0}, {"x": 0}]));
        assert_eq!(last_known(&h, "x"), 3);
    }

    #[test]
    fn last_known_treats_null_and_missing_as_absent() {
        let h = history(json!([{"x": 7}, {"x": null}, {}]));
        assert_eq!(last_known(&h, "x"), 7);
        assert_eq!(last_known(&h, "never"), 0);
    }

    #[test]
    fn killed_and_injured_are_taken_raw_from_latest_report() {
        let h = history(json!([
            {"killed_cum": 100, "injured_cum": 200},
            {"killed_cum": 0, "report_date": "2026-10-14"}
        ]));
        let snapshot = derive_snapshot(&h).unwrap();
        assert_eq!(snapshot.get("killed"), Some(0));
        assert_eq!(snapshot.get("injured"), Some(0));
        assert_eq!(snapshot.last_update, "2026-10-14");
    }

    #[test]
    fn aid_attacked_sums_backfilled_killed_and_injured() {
        let h = history(json!([
            {"aid_seeker_killed_cum": 40, "aid_seeker_injured_cum": 300},
            {"aid_seeker_killed_cum": 50},
            {"aid_seeker_injured_cum": 0}
        ]));
        let snapshot = derive_snapshot(&h).unwrap();
        assert_eq!(snapshot.get("aid_attacked"), Some(350));
    }

    #[test]
    fn snapshot_has_every_metric_and_defaults_label() {
        let h = history(json!([{"killed_cum": 1, "ext_killed_children_cum": 2.0}]));
        let snapshot = derive_snapshot(&h).unwrap();
        for metric in [
            "killed",
            "injured",
            "children",
            "women",
            "medical",
            "press",
            "civil_defense",
            "starved",
            "aid_attacked",
        ] {
            assert!(snapshot.get(metric).is_some(), "missing {metric}");
        }
        assert_eq!(snapshot.get("children"), Some(2));
        assert_eq!(snapshot.last_update, UNDATED_LABEL);
    }

    #[test]
    fn empty_history_has_no_snapshot() {
        assert!(derive_snapshot(&[]).is_none());
    }
}
