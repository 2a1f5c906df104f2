use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::path::Path;

use crate::error::{GraphError, Result};

/// Lowest and highest score on the mood scale.
pub const MOOD_SCALE_MIN: u8 = 1;
pub const MOOD_SCALE_MAX: u8 = 10;

/// Midpoint of the 1-10 mood scale.
pub const MOOD_SCALE_MIDPOINT: f32 = 5.5;

/// A single day of mood tracking.
///
/// Both scores are optional: a record may be created at the start of the work day and only
/// completed later, or never.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub start_of_work: Option<u8>,
    #[serde(default)]
    pub end_of_work: Option<u8>,
    pub created_at: NaiveDateTime,
    pub last_modified: NaiveDateTime,
}

impl MoodRecord {
    /// Creates an empty record for `date` with both timestamps at midnight.
    pub fn new(date: NaiveDate) -> Self {
        let midnight = date.and_time(NaiveTime::MIN);
        MoodRecord {
            date,
            start_of_work: None,
            end_of_work: None,
            created_at: midnight,
            last_modified: midnight,
        }
    }

    pub fn with_scores(mut self, start_of_work: Option<u8>, end_of_work: Option<u8>) -> Self {
        self.start_of_work = start_of_work;
        self.end_of_work = end_of_work;
        self
    }

    pub fn with_timestamps(mut self, created_at: NaiveDateTime, last_modified: NaiveDateTime) -> Self {
        self.created_at = created_at;
        self.last_modified = last_modified;
        self
    }

    /// The day's timestamp used by the per-day modes: the record date at 00:00.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }

    pub fn has_any_score(&self) -> bool {
        self.start_of_work.is_some() || self.end_of_work.is_some()
    }

    /// Mean of the present scores, shifted so that a neutral mood (5.5) sits at zero.
    ///
    /// Returns `None` when neither score has been recorded.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use moodgraph::MoodRecord;
    ///
    /// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    /// let record = MoodRecord::new(day).with_scores(Some(6), Some(8));
    /// assert_eq!(record.adjusted_average(), Some(1.5));
    /// ```
    pub fn adjusted_average(&self) -> Option<f32> {
        let scores: Vec<f32> = [self.start_of_work, self.end_of_work]
            .into_iter()
            .flatten()
            .map(f32::from)
            .collect();

        if scores.is_empty() {
            return None;
        }

        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        Some(mean - MOOD_SCALE_MIDPOINT)
    }
}

/// Parses a JSON array of records, rejecting scores outside the 1-10 scale.
pub fn parse_records(json: &str) -> Result<Vec<MoodRecord>> {
    let records: Vec<MoodRecord> =
        serde_json::from_str(json).map_err(|e| GraphError::Records(e.to_string()))?;

    for record in &records {
        let scores = [
            ("startOfWork", record.start_of_work),
            ("endOfWork", record.end_of_work),
        ];
        for (field, score) in scores {
            if let Some(score) = score.filter(|s| !(MOOD_SCALE_MIN..=MOOD_SCALE_MAX).contains(s)) {
                tracing::error!(
                    "[RECORDS] Record for {} has {} = {}, outside {}..={}",
                    record.date,
                    field,
                    score,
                    MOOD_SCALE_MIN,
                    MOOD_SCALE_MAX
                );
                return Err(GraphError::Records(format!(
                    "{}: {field} must be between {MOOD_SCALE_MIN} and {MOOD_SCALE_MAX}, got {score}",
                    record.date
                )));
            }
        }
    }

    Ok(records)
}

/// Reads a JSON array of records from disk.
pub async fn load_records(path: impl AsRef<Path>) -> Result<Vec<MoodRecord>> {
    let path = path.as_ref();
    tracing::debug!("[RECORDS] Loading mood records from {}", path.display());

    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        tracing::error!("[RECORDS] Failed to read {}: {}", path.display(), e);
        GraphError::Records(format!("{}: {}", path.display(), e))
    })?;

    let records = parse_records(&raw)?;
    tracing::info!("[RECORDS] Loaded {} mood records", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn adjusted_average_uses_both_scores() {
        let record = MoodRecord::new(day(4)).with_scores(Some(3), Some(10));
        assert_eq!(record.adjusted_average(), Some(1.0));
    }

    #[test]
    fn adjusted_average_with_single_score() {
        let start_only = MoodRecord::new(day(4)).with_scores(Some(7), None);
        assert_eq!(start_only.adjusted_average(), Some(1.5));

        let end_only = MoodRecord::new(day(4)).with_scores(None, Some(2));
        assert_eq!(end_only.adjusted_average(), Some(-3.5));
    }

    #[test]
    fn adjusted_average_without_scores() {
        assert_eq!(MoodRecord::new(day(4)).adjusted_average(), None);
    }

    #[test]
    fn parse_camel_case_records() {
        let json = r#"[
            {
                "date": "2024-03-04",
                "startOfWork": 6,
                "createdAt": "2024-03-04T08:30:00",
                "lastModified": "2024-03-04T17:15:00"
            }
        ]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_of_work, Some(6));
        assert_eq!(records[0].end_of_work, None);
        assert_eq!(records[0].date, day(4));
    }

    #[test]
    fn parse_rejects_out_of_scale_scores() {
        for (field, value) in [("startOfWork", 0), ("endOfWork", 11), ("startOfWork", 200)] {
            let json = format!(
                r#"[{{
                    "date": "2024-03-05",
                    "{field}": {value},
                    "createdAt": "2024-03-05T08:30:00",
                    "lastModified": "2024-03-05T17:15:00"
                }}]"#
            );
            match parse_records(&json) {
                Err(GraphError::Records(message)) => {
                    assert!(message.contains(field), "{message}");
                    assert!(message.contains(&value.to_string()), "{message}");
                }
                other => panic!("expected Records error for {field} = {value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn parse_accepts_scale_bounds() {
        let json = r#"[{
            "date": "2024-03-05",
            "startOfWork": 1,
            "endOfWork": 10,
            "createdAt": "2024-03-05T08:30:00",
            "lastModified": "2024-03-05T17:15:00"
        }]"#;
        let records = parse_records(json).unwrap();
        assert_eq!(records[0].start_of_work, Some(1));
        assert_eq!(records[0].end_of_work, Some(10));
    }

    #[test]
    fn parse_invalid_json() {
        let result = parse_records("{ not json");
        assert!(matches!(result, Err(GraphError::Records(_))));
    }
}
