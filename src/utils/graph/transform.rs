use std::collections::HashMap;

use super::types::{AxisRange, DataPoint, GraphData, GraphMode};
use crate::error::{GraphError, Result};
use crate::utils::date_range::DateRange;
use crate::utils::mood::{MOOD_SCALE_MIDPOINT, MoodRecord};

pub const IMPACT_RANGE: AxisRange = AxisRange::new(-9.0, 9.0);
pub const AVERAGE_RANGE: AxisRange = AxisRange::new(-5.0, 5.0);
pub const RAW_RANGE: AxisRange = AxisRange::new(1.0, 10.0);

/// Fixed chart labels and scale for a mode.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeMetadata {
    pub title: &'static str,
    pub y_axis_label: &'static str,
    pub x_axis_label: &'static str,
    pub center_line_value: f32,
    pub y_axis_label_step: f32,
    pub is_raw_data: bool,
    pub y_axis_range: AxisRange,
    pub description: &'static str,
}

/// Turns a record into plottable points for one mode.
pub trait ModeStrategy: Send + Sync {
    fn metadata(&self) -> &'static ModeMetadata;

    /// Points produced by `record`, empty when the record has no usable score for this mode.
    fn points(&self, record: &MoodRecord) -> Vec<DataPoint>;
}

pub struct ImpactStrategy;
pub struct AverageStrategy;
pub struct RawDataStrategy;

static IMPACT_METADATA: ModeMetadata = ModeMetadata {
    title: "Mood Change Over Time",
    y_axis_label: "Impact",
    x_axis_label: "Date",
    center_line_value: 0.0,
    y_axis_label_step: 3.0,
    is_raw_data: false,
    y_axis_range: IMPACT_RANGE,
    description: "How much your mood changed between the start and the end of each work day.",
};

static AVERAGE_METADATA: ModeMetadata = ModeMetadata {
    title: "Average Mood Over Time",
    y_axis_label: "Average Mood",
    x_axis_label: "Date",
    center_line_value: 0.0,
    y_axis_label_step: 3.0,
    is_raw_data: false,
    y_axis_range: AVERAGE_RANGE,
    description: "Your average mood for each work day, relative to a neutral mood.",
};

static RAW_METADATA: ModeMetadata = ModeMetadata {
    title: "Raw Mood Data Over Time",
    y_axis_label: "Mood Level",
    x_axis_label: "Time",
    center_line_value: MOOD_SCALE_MIDPOINT,
    y_axis_label_step: 2.0,
    is_raw_data: true,
    y_axis_range: RAW_RANGE,
    description: "Every recorded start and end of work mood, at the time it was recorded.",
};

impl ModeStrategy for ImpactStrategy {
    fn metadata(&self) -> &'static ModeMetadata {
        &IMPACT_METADATA
    }

    fn points(&self, record: &MoodRecord) -> Vec<DataPoint> {
        let Some(start) = record.start_of_work else {
            return Vec::new();
        };
        let end = record.end_of_work.unwrap_or(start);
        let impact = f32::from(end) - f32::from(start);
        vec![DataPoint::new(record.timestamp(), impact)]
    }
}

impl ModeStrategy for AverageStrategy {
    fn metadata(&self) -> &'static ModeMetadata {
        &AVERAGE_METADATA
    }

    fn points(&self, record: &MoodRecord) -> Vec<DataPoint> {
        record
            .adjusted_average()
            .map(|average| DataPoint::new(record.timestamp(), average))
            .into_iter()
            .collect()
    }
}

impl ModeStrategy for RawDataStrategy {
    fn metadata(&self) -> &'static ModeMetadata {
        &RAW_METADATA
    }

    fn points(&self, record: &MoodRecord) -> Vec<DataPoint> {
        if !record.has_any_score() {
            return Vec::new();
        }
        let start = record.start_of_work.unwrap_or(0);
        let end = record.end_of_work.or(record.start_of_work).unwrap_or(0);
        vec![
            DataPoint::new(record.created_at, f32::from(start)),
            DataPoint::new(record.last_modified, f32::from(end)),
        ]
    }
}

/// Converts mood records into chart data, one registered strategy per mode.
pub struct GraphDataTransformer {
    strategies: HashMap<GraphMode, Box<dyn ModeStrategy>>,
}

impl Default for GraphDataTransformer {
    fn default() -> Self {
        GraphDataTransformer::empty()
            .register(GraphMode::Impact, ImpactStrategy)
            .register(GraphMode::Average, AverageStrategy)
            .register(GraphMode::RawData, RawDataStrategy)
    }
}

impl GraphDataTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transformer with no modes registered.
    pub fn empty() -> Self {
        GraphDataTransformer {
            strategies: HashMap::new(),
        }
    }

    pub fn register(mut self, mode: GraphMode, strategy: impl ModeStrategy + 'static) -> Self {
        self.strategies.insert(mode, Box::new(strategy));
        self
    }

    pub fn strategy(&self, mode: GraphMode) -> Result<&dyn ModeStrategy> {
        self.strategies
            .get(&mode)
            .map(|s| s.as_ref())
            .ok_or_else(|| {
                tracing::error!("[TRANSFORM] No strategy registered for mode {}", mode);
                GraphError::UnsupportedMode(mode.to_string())
            })
    }

    pub fn transform(
        &self,
        records: &[MoodRecord],
        mode: GraphMode,
        date_range: &DateRange,
    ) -> Result<GraphData> {
        let strategy = self.strategy(mode)?;
        let meta = strategy.metadata();

        let in_range: Vec<&MoodRecord> = records
            .iter()
            .filter(|r| date_range.contains(r.date))
            .collect();

        tracing::debug!(
            "[TRANSFORM] {} of {} records fall within {} ..= {}",
            in_range.len(),
            records.len(),
            date_range.start,
            date_range.end
        );

        let mut points: Vec<DataPoint> = in_range.iter().flat_map(|r| strategy.points(r)).collect();
        points.sort_by_key(|p| p.timestamp);

        tracing::info!(
            "[TRANSFORM] Built {} data points for {} mode",
            points.len(),
            mode
        );

        Ok(GraphData {
            title: meta.title.to_string(),
            points,
            y_axis_range: meta.y_axis_range,
            center_line_value: meta.center_line_value,
            y_axis_label: meta.y_axis_label.to_string(),
            x_axis_label: meta.x_axis_label.to_string(),
            is_raw_data: meta.is_raw_data,
            y_axis_label_step: meta.y_axis_label_step,
            description: meta.description.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(d: u32, start: Option<u8>, end: Option<u8>) -> MoodRecord {
        MoodRecord::new(day(d)).with_scores(start, end)
    }

    #[test]
    fn impact_falls_back_to_start_when_end_missing() {
        let points = ImpactStrategy.points(&record(1, Some(4), None));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 0.0);
    }

    #[test]
    fn impact_skips_records_without_start() {
        assert!(ImpactStrategy.points(&record(1, None, Some(8))).is_empty());
    }

    #[test]
    fn average_skips_empty_records() {
        assert!(AverageStrategy.points(&record(1, None, None)).is_empty());
        assert_eq!(AverageStrategy.points(&record(1, None, Some(8))).len(), 1);
    }

    #[test]
    fn raw_end_only_uses_zero_for_start() {
        let points = RawDataStrategy.points(&record(1, None, Some(8)));
        let values: Vec<f32> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![0.0, 8.0]);
    }

    #[test]
    fn missing_strategy_is_unsupported() {
        let transformer = GraphDataTransformer::empty().register(GraphMode::Impact, ImpactStrategy);
        let range = DateRange::new(day(1), day(7));

        let result = transformer.transform(&[], GraphMode::Average, &range);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Unsupported graph mode"));
        assert!(transformer.transform(&[], GraphMode::Impact, &range).is_ok());
    }

    #[test]
    fn metadata_per_mode() {
        let transformer = GraphDataTransformer::new();
        let range = DateRange::new(day(1), day(7));

        let raw = transformer.transform(&[], GraphMode::RawData, &range).unwrap();
        assert_eq!(raw.title, "Raw Mood Data Over Time");
        assert_eq!(raw.y_axis_label, "Mood Level");
        assert_eq!(raw.x_axis_label, "Time");
        assert_eq!(raw.center_line_value, 5.5);
        assert_eq!(raw.y_axis_label_step, 2.0);
        assert!(raw.is_raw_data);
        assert_eq!(raw.y_axis_range, RAW_RANGE);

        let impact = transformer.transform(&[], GraphMode::Impact, &range).unwrap();
        assert_eq!(impact.title, "Mood Change Over Time");
        assert_eq!(impact.y_axis_label, "Impact");
        assert_eq!(impact.x_axis_label, "Date");
        assert_eq!(impact.center_line_value, 0.0);
        assert_eq!(impact.y_axis_label_step, 3.0);
        assert!(!impact.is_raw_data);

        let average = transformer.transform(&[], GraphMode::Average, &range).unwrap();
        assert_eq!(average.title, "Average Mood Over Time");
        assert_eq!(average.y_axis_label, "Average Mood");
        assert_eq!(average.y_axis_range, AVERAGE_RANGE);
    }
}
