//! Data models for teardown analytics.
//!
//! This module contains the teardown record read from a store and the
//! aggregate result structures produced by the analytics core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single startup failure case study, as stored by the backend.
///
/// Every field the analytics touch carries an explicit default, so
/// partially filled rows deserialize instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeardownRecord {
    /// Unique identifier.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Display name of the failed venture.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Free-text industry/category label.
    #[serde(default, deserialize_with = "null_as_default")]
    pub market: String,
    /// Funding/revenue description, e.g. "$1.2M raised".
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: String,
    /// Lifespan description, e.g. "18 months".
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: String,
    /// Free-text failure reasons in insertion order.
    #[serde(default, deserialize_with = "null_as_default")]
    pub failure_reasons: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lessons_learned: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub short_description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub detailed_summary: String,
    /// Pricing strategy label; absent means "Unknown".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_model: Option<String>,
    /// Lifecycle status ("published", "acquired", "profitable", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free-text technology description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tech_stack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_premium: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl TeardownRecord {
    /// Creates a record with just a name, everything else defaulted.
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Self {
            id: name.to_lowercase(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Pricing model label used for grouping.
    pub fn pricing_label(&self) -> &str {
        match self.pricing_model.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => p,
            _ => "Unknown",
        }
    }

    /// Whether the venture ended in an exit or became profitable.
    pub fn is_success(&self) -> bool {
        matches!(
            self.status.as_deref().map(|s| s.trim().to_lowercase()).as_deref(),
            Some("acquired") | Some("profitable")
        )
    }
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One normalized failure reason and how often it occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasonStat {
    pub reason: String,
    pub count: usize,
    pub percentage: u32,
    pub examples: Vec<String>,
}

/// Incidence of one technology bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackStat {
    pub stack: String,
    pub count: usize,
    pub failure_rate: u32,
}

/// Per-market summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryStat {
    pub industry: String,
    pub count: usize,
    pub avg_duration: String,
    pub avg_revenue: String,
    pub examples: Vec<String>,
}

/// Summary of one funding bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueRangeStat {
    pub range: String,
    pub count: usize,
    pub common_reasons: Vec<String>,
    pub examples: Vec<String>,
}

/// Curated warning indicator. Not derived from input data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedFlag {
    pub flag: String,
    pub correlation: u32,
    pub description: String,
    pub examples: Vec<String>,
}

/// Outcome of one pricing strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingStat {
    pub strategy: String,
    pub count: usize,
    pub success_rate: u32,
    pub examples: Vec<String>,
}

/// The complete analytics result for one snapshot of records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResult {
    pub top_failure_reasons: Vec<ReasonStat>,
    pub tech_stack_analysis: Vec<TechStackStat>,
    pub industry_breakdown: Vec<IndustryStat>,
    pub revenue_range_analysis: Vec<RevenueRangeStat>,
    pub red_flags: Vec<RedFlag>,
    pub pricing_patterns: Vec<PricingStat>,
}

impl AnalyticsResult {
    /// True when every section is empty.
    pub fn is_empty(&self) -> bool {
        self.top_failure_reasons.is_empty()
            && self.tech_stack_analysis.is_empty()
            && self.industry_breakdown.is_empty()
            && self.revenue_range_analysis.is_empty()
            && self.red_flags.is_empty()
            && self.pricing_patterns.is_empty()
    }
}

/// Metadata about a generated trends report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Where the records came from (file path or API URL).
    pub source: String,
    /// Period label shown in the title, e.g. "October 2026".
    pub period: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Number of records after catalog filtering.
    pub records_analyzed: usize,
    /// Number of records the store returned.
    pub records_total: usize,
}

/// A full trends report: metadata plus analytics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub analytics: AnalyticsResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial_record() {
        let json = r#"{"id": "1", "name": "Quibi", "failure_reasons": null}"#;
        let record: TeardownRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.name, "Quibi");
        assert!(record.failure_reasons.is_empty());
        assert!(record.tags.is_empty());
        assert_eq!(record.market, "");
        assert!(record.pricing_model.is_none());
        assert!(record.created_at.is_none());
    }

    #[test]
    fn test_deserialize_null_columns() {
        let json = r#"[
            {"id": "1", "name": "Quibi", "market": null, "revenue": null,
             "duration": null, "short_description": null, "detailed_summary": null,
             "tags": null, "is_premium": null, "status": null},
            {"id": "2", "name": "Vine", "market": "Social"}
        ]"#;
        let records: Vec<TeardownRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].market, "");
        assert_eq!(records[0].revenue, "");
        assert_eq!(records[0].duration, "");
        assert_eq!(records[0].short_description, "");
        assert!(!records[0].is_premium);
        assert!(records[0].status.is_none());
        assert_eq!(records[1].market, "Social");
    }

    #[test]
    fn test_deserialize_ignores_unknown_columns() {
        let json = r#"{
            "id": "abc",
            "name": "Homejoy",
            "market": "Home Services",
            "failure_reasons": ["Poor unit economics"],
            "current_venture_name": "Something",
            "created_at": "2024-01-15T10:00:00Z"
        }"#;
        let record: TeardownRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.failure_reasons.len(), 1);
        assert!(record.created_at.is_some());
    }

    #[test]
    fn test_pricing_label_defaults_to_unknown() {
        let mut record = TeardownRecord::named("Shyp");
        assert_eq!(record.pricing_label(), "Unknown");

        record.pricing_model = Some("   ".to_string());
        assert_eq!(record.pricing_label(), "Unknown");

        record.pricing_model = Some("Freemium".to_string());
        assert_eq!(record.pricing_label(), "Freemium");
    }

    #[test]
    fn test_is_success() {
        let mut record = TeardownRecord::named("Vine");
        assert!(!record.is_success());

        record.status = Some("Acquired".to_string());
        assert!(record.is_success());

        record.status = Some("profitable".to_string());
        assert!(record.is_success());

        record.status = Some("published".to_string());
        assert!(!record.is_success());
    }

    #[test]
    fn test_analytics_result_serializes_camel_case() {
        let result = AnalyticsResult {
            industry_breakdown: vec![IndustryStat {
                industry: "Fintech".to_string(),
                count: 1,
                avg_duration: "9 months".to_string(),
                avg_revenue: "$2M".to_string(),
                examples: vec!["A".to_string()],
            }],
            ..AnalyticsResult::default()
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"topFailureReasons\""));
        assert!(json.contains("\"avgDuration\""));
        assert!(json.contains("\"industryBreakdown\""));
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = Report {
            metadata: ReportMetadata {
                source: "teardowns.json".to_string(),
                period: "October 2026".to_string(),
                generated_at: Utc::now(),
                records_analyzed: 2,
                records_total: 3,
            },
            analytics: AnalyticsResult::default(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"recordsAnalyzed\":2"));
        assert!(json.contains("\"recordsTotal\":3"));
        assert!(json.contains("\"generatedAt\""));
        assert!(!json.contains("records_analyzed"));
    }

    #[test]
    fn test_default_result_is_empty() {
        assert!(AnalyticsResult::default().is_empty());
    }
}
