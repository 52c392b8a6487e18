// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Learning content model returned by the content and search endpoints.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A unit of learning material: text, runnable code, formulas and charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    /// Top-level module ("math", "ml", "dl")
    pub module: String,
    pub subcategory: String,
    pub title: String,
    /// Markdown body
    pub content_body: String,
    /// Example code shipped with the item
    pub python_code: String,
    /// Formula label -> formula
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formulas: Option<BTreeMap<String, Formula>>,
    /// Chart name -> base64 PNG bytes (no data-URI prefix)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts_data: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Tags>,
    /// Creation time (ISO 8601)
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update time (ISO 8601)
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ContentItem {
    /// Tags as a list, whichever form the server sent them in.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.as_ref().map(Tags::to_vec).unwrap_or_default()
    }

    /// Decode the named chart into raw image bytes.
    ///
    /// Charts are either bare base64 or a `data:<mime>;base64,` URI. Returns
    /// `Ok(None)` if the item has no chart with that name or the chart is a
    /// remote URL, which has no inline bytes.
    pub fn decode_chart(&self, name: &str) -> Result<Option<Vec<u8>>, base64::DecodeError> {
        let Some(chart) = self.charts_data.as_ref().and_then(|c| c.get(name)) else {
            return Ok(None);
        };
        let chart = chart.trim();
        if is_remote_url(chart) {
            return Ok(None);
        }
        BASE64.decode(strip_data_uri(chart)).map(Some)
    }
}

fn is_remote_url(chart: &str) -> bool {
    let lower = chart.get(..8).unwrap_or(chart).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Payload of a `data:...;base64,` URI; anything else is returned unchanged.
fn strip_data_uri(chart: &str) -> &str {
    match chart.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((meta, payload)) if meta.ends_with(";base64") => payload,
        _ => chart,
    }
}

/// A formula entry: either bare LaTeX or LaTeX with an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Formula {
    Raw(String),
    Detailed {
        latex: String,
        #[serde(default)]
        explanation: Option<String>,
        /// Symbol -> meaning
        #[serde(default)]
        symbols: BTreeMap<String, String>,
    },
    Other(serde_json::Value),
}

impl Formula {
    /// LaTeX source of the formula, if it has one.
    pub fn latex(&self) -> Option<&str> {
        match self {
            Formula::Raw(s) => Some(s.as_str()),
            Formula::Detailed { latex, .. } => Some(latex.as_str()),
            Formula::Other(_) => None,
        }
    }
}

/// Tags as sent by the server: a list, or one delimited string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tags {
    List(Vec<String>),
    Delimited(String),
}

impl Tags {
    /// Normalize to a list. Delimited strings split on commas (ASCII or
    /// full-width) and whitespace; empty pieces are dropped.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Tags::List(tags) => tags.clone(),
            Tags::Delimited(s) => s
                .split(|c: char| c == ',' || c == '，' || c.is_whitespace())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Response of `GET /search/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    pub results: Vec<ContentItem>,
    pub total_count: u64,
}

/// Abbreviated content embedded in a favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub tags: Option<Tags>,
    pub created_at: String,
}
