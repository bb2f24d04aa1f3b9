//! npms.io payload types

use serde::{Deserialize, Serialize};

/// One entry of the suggestions payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSuggestion {
    pub package: PackageSummary,
    pub score: PackageScore,
    #[serde(rename = "searchScore")]
    pub search_score: f64,
    /// Query match with `<em>` markers, present for highlighted responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<PackageFlags>,
}

/// Package identity inside a suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageSummary {
    pub name: String,
    pub version: String,
}

/// Aggregate package score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageScore {
    #[serde(rename = "final")]
    pub final_score: f64,
    pub detail: ScoreDetail,
}

/// Score components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetail {
    pub quality: f64,
    pub popularity: f64,
}

/// Package state flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<String>,
}

/// Structured error payload the npms API replies with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpmsErrorResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}
