use image::Rgba;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::date_range::DateRangeSelector;
use crate::utils::graph::types::{
    Background, DEFAULT_HEIGHT, DEFAULT_LINE_COLOR, DEFAULT_WIDTH, GraphMode, RenderOptions,
    parse_hex_color,
};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings for the `moodgraph` binary.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub records_path: PathBuf,
    pub output_path: PathBuf,
    pub mode: GraphMode,
    pub range: DateRangeSelector,
    pub timezone: String,
    pub font_path: Option<PathBuf>,
    pub render: RenderOptions,
}

impl Config {
    /// Reads `MOODGRAPH_*` variables, loading a `.env` file first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("[CONFIG] Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| dotenvy::var(key).ok())
    }

    /// Builds the config from any key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let records_path = get("MOODGRAPH_RECORDS")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("MOODGRAPH_RECORDS"))?;

        let output_path = get("MOODGRAPH_OUTPUT")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("mood_graph.png"));

        let mode = match get("MOODGRAPH_MODE") {
            Some(raw) => raw.parse::<GraphMode>().map_err(|e| ConfigError::Invalid {
                key: "MOODGRAPH_MODE",
                reason: e.to_string(),
            })?,
            None => GraphMode::Impact,
        };

        let range = match get("MOODGRAPH_RANGE") {
            Some(raw) => raw
                .parse::<DateRangeSelector>()
                .map_err(|reason| ConfigError::Invalid {
                    key: "MOODGRAPH_RANGE",
                    reason,
                })?,
            None => DateRangeSelector::Last7Days,
        };

        let width = parse_dimension(get("MOODGRAPH_WIDTH"), "MOODGRAPH_WIDTH", DEFAULT_WIDTH)?;
        let height = parse_dimension(get("MOODGRAPH_HEIGHT"), "MOODGRAPH_HEIGHT", DEFAULT_HEIGHT)?;

        let line_color: Rgba<u8> = match get("MOODGRAPH_LINE_COLOR") {
            Some(raw) => parse_hex_color(&raw).map_err(|e| ConfigError::Invalid {
                key: "MOODGRAPH_LINE_COLOR",
                reason: e.to_string(),
            })?,
            None => DEFAULT_LINE_COLOR,
        };

        let background = get("MOODGRAPH_BACKGROUND")
            .and_then(|raw| raw.parse::<Background>().ok())
            .unwrap_or_default();

        let render = RenderOptions {
            show_data_points: parse_flag(get("MOODGRAPH_SHOW_POINTS"), "MOODGRAPH_SHOW_POINTS", true)?,
            show_axes_and_grid: parse_flag(get("MOODGRAPH_SHOW_GRID"), "MOODGRAPH_SHOW_GRID", true)?,
            show_title: parse_flag(get("MOODGRAPH_SHOW_TITLE"), "MOODGRAPH_SHOW_TITLE", true)?,
            show_trend_line: parse_flag(get("MOODGRAPH_SHOW_TREND"), "MOODGRAPH_SHOW_TREND", false)?,
            line_color,
            width,
            height,
            background,
        };

        Ok(Config {
            records_path,
            output_path,
            mode,
            range,
            timezone: get("MOODGRAPH_TIMEZONE").unwrap_or_else(|| "UTC".to_string()),
            font_path: get("MOODGRAPH_FONT").map(PathBuf::from),
            render,
        })
    }
}

fn parse_dimension(raw: Option<String>, key: &'static str, default: u32) -> Result<u32, ConfigError> {
    match raw {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<u32>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::Invalid {
                key,
                reason: format!("expected a positive integer, got '{raw}'"),
            }),
        },
    }
}

fn parse_flag(raw: Option<String>, key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match raw.as_deref().map(|v| v.trim().to_lowercase()) {
        None => Ok(default),
        Some(v) => match v.as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key,
                reason: format!("expected a boolean, got '{v}'"),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("MOODGRAPH_RECORDS", "moods.json")]).unwrap();
        assert_eq!(config.records_path, PathBuf::from("moods.json"));
        assert_eq!(config.output_path, PathBuf::from("mood_graph.png"));
        assert_eq!(config.mode, GraphMode::Impact);
        assert_eq!(config.range, DateRangeSelector::Last7Days);
        assert_eq!(config.timezone, "UTC");
        assert_eq!(config.font_path, None);
        assert_eq!(config.render, RenderOptions::default());
    }

    #[test]
    fn records_path_is_required() {
        assert_eq!(
            config_from(&[]).unwrap_err(),
            ConfigError::Missing("MOODGRAPH_RECORDS")
        );
        assert_eq!(
            config_from(&[("MOODGRAPH_RECORDS", "  ")]).unwrap_err(),
            ConfigError::Missing("MOODGRAPH_RECORDS")
        );
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("MOODGRAPH_RECORDS", "moods.json"),
            ("MOODGRAPH_MODE", "raw"),
            ("MOODGRAPH_RANGE", "3m"),
            ("MOODGRAPH_WIDTH", "1024"),
            ("MOODGRAPH_LINE_COLOR", "#ff0000"),
            ("MOODGRAPH_BACKGROUND", "none"),
            ("MOODGRAPH_SHOW_TREND", "yes"),
            ("MOODGRAPH_SHOW_TITLE", "off"),
            ("MOODGRAPH_TIMEZONE", "Europe/Rome"),
        ])
        .unwrap();

        assert_eq!(config.mode, GraphMode::RawData);
        assert_eq!(config.range, DateRangeSelector::Last3Months);
        assert_eq!(config.render.width, 1024);
        assert_eq!(config.render.height, DEFAULT_HEIGHT);
        assert_eq!(config.render.line_color, Rgba([255, 0, 0, 255]));
        assert_eq!(config.render.background, Background::None);
        assert!(config.render.show_trend_line);
        assert!(!config.render.show_title);
        assert_eq!(config.timezone, "Europe/Rome");
    }

    #[test]
    fn invalid_mode_is_reported() {
        let err = config_from(&[("MOODGRAPH_RECORDS", "m.json"), ("MOODGRAPH_MODE", "pie")])
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported graph mode"));
    }

    #[test]
    fn invalid_numbers_and_flags_are_reported() {
        let err = config_from(&[("MOODGRAPH_RECORDS", "m.json"), ("MOODGRAPH_WIDTH", "0")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MOODGRAPH_WIDTH", .. }));

        let err = config_from(&[("MOODGRAPH_RECORDS", "m.json"), ("MOODGRAPH_SHOW_GRID", "maybe")])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "MOODGRAPH_SHOW_GRID", .. }));
    }
}
