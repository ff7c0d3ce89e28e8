#![warn(missing_docs)]
//! # nutrition-track-analysis-contract
//!
//! ## Purpose
//! Defines the `/analyze` response schema and the client-side projection used
//! to render it.
//!
//! ## Responsibilities
//! - Parse success bodies into [`AnalysisResult`] with every field optional.
//! - Accept nutrient values sent either as strings or as numbers.
//! - Extract the `error` message from failure bodies.
//! - Project a result into display text with fixed placeholders.
//!
//! ## Data flow
//! Raw JSON body -> [`parse_analysis_result`] -> [`render_result`] ->
//! results panel.
//!
//! ## Error model
//! Only a success body that is not a JSON object of the expected field types
//! fails, with [`AnalysisContractError`]. Failure bodies never fail to parse:
//! [`parse_error_message`] falls back to [`GENERIC_FAILURE_MESSAGE`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback for failure bodies without a usable `error` field.
pub const GENERIC_FAILURE_MESSAGE: &str = "Analysis failed";

/// Placeholder for missing nutrient values.
pub const MISSING_VALUE_PLACEHOLDER: &str = "--";

/// Placeholder for a missing food name.
pub const UNKNOWN_FOOD_NAME: &str = "Unknown Food";

/// Placeholder for a missing health tip.
pub const DEFAULT_HEALTH_TIP: &str = "Enjoy your meal!";

/// Label list used when nothing was detected.
pub const FALLBACK_LABELS: &str = "Multiple food items";

/// Prefix of the rendered label line.
pub const DETECTED_ITEMS_PREFIX: &str = "Detected items: ";

/// Parsed success body from the analysis endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    /// Detected dish name.
    pub food_name: Option<String>,
    /// Estimated calories.
    pub calories: Option<NutrientValue>,
    /// Estimated protein.
    pub protein: Option<NutrientValue>,
    /// Estimated carbohydrates.
    pub carbs: Option<NutrientValue>,
    /// Estimated fats.
    pub fats: Option<NutrientValue>,
    /// Free-text advice.
    pub health_tip: Option<String>,
    /// Labels reported by the image model.
    pub detected_labels: Option<Vec<String>>,
}

/// A nutrient amount as sent by the server: free text (`"10g"`) or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NutrientValue {
    /// Numeric amount.
    Number(serde_json::Number),
    /// Preformatted text.
    Text(String),
}

impl NutrientValue {
    /// Returns display text, or `None` when the value is blank or a numeric
    /// zero. The text `"0"` is kept.
    pub fn display(&self) -> Option<String> {
        match self {
            NutrientValue::Text(text) if text.is_empty() => None,
            NutrientValue::Number(number) if number.as_f64() == Some(0.0) => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for NutrientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientValue::Text(text) => f.write_str(text),
            NutrientValue::Number(number) => {
                if let Some(value) = number.as_i64() {
                    write!(f, "{value}")
                } else if let Some(value) = number.as_u64() {
                    write!(f, "{value}")
                } else {
                    // f64 Display drops a trailing `.0`.
                    write!(f, "{}", number.as_f64().unwrap_or_default())
                }
            }
        }
    }
}

impl From<&str> for NutrientValue {
    fn from(value: &str) -> Self {
        NutrientValue::Text(value.to_string())
    }
}

impl From<i64> for NutrientValue {
    fn from(value: i64) -> Self {
        NutrientValue::Number(value.into())
    }
}

/// Display-ready projection of an [`AnalysisResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResult {
    /// Food name or [`UNKNOWN_FOOD_NAME`].
    pub food_name: String,
    /// Calories or [`MISSING_VALUE_PLACEHOLDER`].
    pub calories: String,
    /// Protein or [`MISSING_VALUE_PLACEHOLDER`].
    pub protein: String,
    /// Carbs or [`MISSING_VALUE_PLACEHOLDER`].
    pub carbs: String,
    /// Fats or [`MISSING_VALUE_PLACEHOLDER`].
    pub fats: String,
    /// Health tip or [`DEFAULT_HEALTH_TIP`].
    pub health_tip: String,
    /// `"Detected items: ..."` line.
    pub detected_labels: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Parses a success body.
///
/// # Errors
/// Returns [`AnalysisContractError::Decode`] when the body is not a JSON object
/// with the expected field types.
pub fn parse_analysis_result(raw: &str) -> Result<AnalysisResult, AnalysisContractError> {
    serde_json::from_str(raw).map_err(AnalysisContractError::Decode)
}

/// Extracts the `error` message from a failure body.
///
/// Unparsable bodies and missing or blank messages yield
/// [`GENERIC_FAILURE_MESSAGE`].
pub fn parse_error_message(raw: &str) -> String {
    serde_json::from_str::<ErrorBody>(raw)
        .ok()
        .and_then(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

/// Projects a result into display text.
pub fn render_result(result: &AnalysisResult) -> RenderedResult {
    RenderedResult {
        food_name: non_empty_or(result.food_name.as_deref(), UNKNOWN_FOOD_NAME),
        calories: nutrient_or_placeholder(result.calories.as_ref()),
        protein: nutrient_or_placeholder(result.protein.as_ref()),
        carbs: nutrient_or_placeholder(result.carbs.as_ref()),
        fats: nutrient_or_placeholder(result.fats.as_ref()),
        health_tip: non_empty_or(result.health_tip.as_deref(), DEFAULT_HEALTH_TIP),
        detected_labels: render_labels(result.detected_labels.as_deref()),
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    value
        .filter(|value| !value.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

fn nutrient_or_placeholder(value: Option<&NutrientValue>) -> String {
    value
        .and_then(NutrientValue::display)
        .unwrap_or_else(|| MISSING_VALUE_PLACEHOLDER.to_string())
}

fn render_labels(labels: Option<&[String]>) -> String {
    match labels {
        Some(labels) if !labels.is_empty() => {
            format!("{DETECTED_ITEMS_PREFIX}{}", labels.join(", "))
        }
        _ => format!("{DETECTED_ITEMS_PREFIX}{FALLBACK_LABELS}"),
    }
}

/// Analysis contract errors.
#[derive(Debug, Error)]
pub enum AnalysisContractError {
    /// JSON decode failure.
    #[error("analysis decode failure: {0}")]
    Decode(#[from] serde_json::Error),
}
