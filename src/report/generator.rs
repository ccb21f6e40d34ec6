//! Markdown and JSON report generation.
//!
//! This module renders a trends report from the analytics result. The
//! Markdown flavour is meant for humans (newsletters, reviews); the JSON
//! flavour carries the raw result for a presentation layer.

use crate::config::ReportConfig;
use crate::models::{
    AnalyticsResult, IndustryStat, PricingStat, ReasonStat, RedFlag, Report, ReportMetadata,
    RevenueRangeStat, TechStackStat,
};
use anyhow::Result;

/// Questions closing every Markdown report.
const SELF_ASSESSMENT: &[&str] = &[
    "Do you have sustainable unit economics (LTV > 3x CAC)?",
    "Have you achieved clear product-market fit with paying customers?",
    "Is your customer acquisition cost trending downward?",
    "Do you have domain expertise in your target market?",
    "Are you compliant with all relevant regulations?",
    "Can you survive 12+ months without additional funding?",
    "Do you have less than 3 major pivots in the last 6 months?",
];

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, settings: &ReportConfig) -> String {
    let analytics = &report.analytics;
    let mut output = String::new();

    // Title
    output.push_str(&format!(
        "# {}\n\n*{}*\n\n",
        settings.title, report.metadata.period
    ));

    output.push_str(&generate_metadata_section(&report.metadata));

    if analytics.is_empty() {
        output.push_str("No teardowns matched the selection, so there is nothing to report.\n\n");
        output.push_str(&generate_footer(&report.metadata));
        return output;
    }

    output.push_str(&generate_summary_section(analytics));
    output.push_str(&generate_reasons_section(
        &analytics.top_failure_reasons,
        settings.top_reasons_in_report,
    ));
    output.push_str(&generate_tech_section(&analytics.tech_stack_analysis));
    output.push_str(&generate_industry_section(&analytics.industry_breakdown));
    output.push_str(&generate_revenue_section(&analytics.revenue_range_analysis));
    output.push_str(&generate_pricing_section(&analytics.pricing_patterns));
    if settings.include_red_flags {
        output.push_str(&generate_red_flags_section(&analytics.red_flags));
    }
    output.push_str(&generate_checklist_section());
    output.push_str(&generate_footer(&report.metadata));

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Teardowns Analyzed:** {}\n",
        metadata.records_analyzed
    ));
    if metadata.records_total != metadata.records_analyzed {
        section.push_str(&format!(
            "- **Teardowns in Collection:** {}\n",
            metadata.records_total
        ));
    }
    section.push('\n');

    section
}

/// Executive summary built from the leading entries of each section.
fn generate_summary_section(analytics: &AnalyticsResult) -> String {
    let mut section = String::new();

    section.push_str("## Executive Summary\n\n");

    match analytics.top_failure_reasons.first() {
        Some(top) => section.push_str(&format!(
            "The top failure reason is **{}**, affecting {}% of documented cases.",
            top.reason, top.percentage
        )),
        None => section.push_str("No failure reasons were recorded for these teardowns."),
    }

    if let Some(industry) = analytics.industry_breakdown.first() {
        let label = if industry.industry.is_empty() {
            "Unknown"
        } else {
            industry.industry.as_str()
        };
        section.push_str(&format!(
            " The {} sector accounts for the most failures ({}).",
            label, industry.count
        ));
    }

    if let Some(flag) = analytics.red_flags.iter().max_by_key(|f| f.correlation) {
        section.push_str(&format!(
            " The strongest red flag is \"{}\" at {}% correlation.",
            flag.flag, flag.correlation
        ));
    }

    section.push_str("\n\n");
    section
}

/// Ranked list of the most common failure causes.
fn generate_reasons_section(reasons: &[ReasonStat], limit: usize) -> String {
    if reasons.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Most Common Failure Causes\n\n");

    for (i, reason) in reasons.iter().take(limit).enumerate() {
        section.push_str(&format!(
            "{}. **{}** ({}% of failures)\n",
            i + 1,
            reason.reason,
            reason.percentage
        ));
        section.push_str(&format!(
            "   Affected {} startups including: {}\n",
            reason.count,
            reason.examples.join(", ")
        ));
    }
    section.push('\n');

    section
}

fn generate_tech_section(stacks: &[TechStackStat]) -> String {
    if stacks.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Tech Stack Failure Patterns\n\n");
    section.push_str("| Stack | Failures | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for stack in stacks {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            stack.stack, stack.count, stack.failure_rate
        ));
    }
    section.push('\n');

    section
}

fn generate_industry_section(industries: &[IndustryStat]) -> String {
    if industries.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Industry Breakdown\n\n");
    section.push_str("| Industry | Failures | Avg. Lifespan | Avg. Raised | Examples |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---|\n");

    for industry in industries {
        let label = if industry.industry.is_empty() {
            "Unknown"
        } else {
            industry.industry.as_str()
        };
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            label,
            industry.count,
            industry.avg_duration,
            industry.avg_revenue,
            industry.examples.join(", ")
        ));
    }
    section.push('\n');

    section
}

fn generate_revenue_section(ranges: &[RevenueRangeStat]) -> String {
    if ranges.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Funding Range Analysis\n\n");

    for range in ranges {
        section.push_str(&format!(
            "### {} raised ({} startups)\n\n",
            range.range, range.count
        ));
        if !range.common_reasons.is_empty() {
            section.push_str(&format!(
                "- **Common reasons:** {}\n",
                range.common_reasons.join(", ")
            ));
        }
        section.push_str(&format!("- **Examples:** {}\n\n", range.examples.join(", ")));
    }

    section
}

fn generate_pricing_section(patterns: &[PricingStat]) -> String {
    if patterns.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Pricing Strategy Patterns\n\n");
    section.push_str("| Strategy | Startups | Success Rate |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for pattern in patterns {
        section.push_str(&format!(
            "| {} | {} | {}% |\n",
            pattern.strategy, pattern.count, pattern.success_rate
        ));
    }
    section.push('\n');

    section
}

fn generate_red_flags_section(flags: &[RedFlag]) -> String {
    if flags.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Critical Red Flags\n\n");

    for flag in flags {
        section.push_str(&format!(
            "### ⚠️ {} ({}% failure correlation)\n\n",
            flag.flag, flag.correlation
        ));
        section.push_str(&format!("{}\n\n", flag.description));
        section.push_str(&format!(
            "> **Warning signs seen in:** {}\n\n",
            flag.examples.join(", ")
        ));
    }

    section
}

fn generate_checklist_section() -> String {
    let mut section = String::new();

    section.push_str("## Self-Assessment Checklist\n\n");
    for question in SELF_ASSESSMENT {
        section.push_str(&format!("- [ ] {}\n", question));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer(metadata: &ReportMetadata) -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated on {} from {} documented failures*\n",
        metadata.generated_at.format("%Y-%m-%d"),
        metadata.records_analyzed
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::compute_analytics;
    use crate::models::TeardownRecord;
    use chrono::Utc;

    fn create_test_report(records: &[TeardownRecord]) -> Report {
        Report {
            metadata: ReportMetadata {
                source: "teardowns.json".to_string(),
                period: "October 2026".to_string(),
                generated_at: Utc::now(),
                records_analyzed: records.len(),
                records_total: records.len() + 1,
            },
            analytics: compute_analytics(records),
        }
    }

    fn records() -> Vec<TeardownRecord> {
        vec![
            TeardownRecord {
                market: "Media".to_string(),
                revenue: "$1.75B raised".to_string(),
                duration: "6 months".to_string(),
                failure_reasons: vec!["No product-market fit".to_string()],
                short_description: "Mobile streaming app".to_string(),
                ..TeardownRecord::named("Quibi")
            },
            TeardownRecord {
                market: "Home Services".to_string(),
                revenue: "$40M".to_string(),
                duration: "5 years".to_string(),
                failure_reasons: vec!["Poor unit economics".to_string()],
                ..TeardownRecord::named("Homejoy")
            },
        ]
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report(&records());
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# Startup Graveyard Trends Report"));
        assert!(markdown.contains("*October 2026*"));
        assert!(markdown.contains("## Executive Summary"));
        assert!(markdown.contains("## Most Common Failure Causes"));
        assert!(markdown.contains("No Product-Market Fit"));
        assert!(markdown.contains("| Media | 1 | 6 months | $1.8B | Quibi |"));
        assert!(markdown.contains("### $50M+ raised (1 startups)"));
        assert!(markdown.contains("Mobile App"));
        assert!(markdown.contains("## Critical Red Flags"));
        assert!(markdown.contains("- [ ] Can you survive 12+ months"));
        assert!(markdown.contains("Teardowns in Collection:"));
    }

    #[test]
    fn test_red_flags_can_be_disabled() {
        let report = create_test_report(&records());
        let settings = ReportConfig {
            include_red_flags: false,
            ..ReportConfig::default()
        };

        let markdown = generate_markdown_report(&report, &settings);
        assert!(!markdown.contains("## Critical Red Flags"));
    }

    #[test]
    fn test_top_reasons_limit() {
        let reasons: Vec<ReasonStat> = (0..8)
            .map(|i| ReasonStat {
                reason: format!("Reason {}", i),
                count: 1,
                percentage: 10,
                examples: vec!["X".to_string()],
            })
            .collect();

        let section = generate_reasons_section(&reasons, 5);
        assert!(section.contains("5. **Reason 4**"));
        assert!(!section.contains("Reason 5"));
    }

    #[test]
    fn test_empty_report() {
        let report = create_test_report(&[]);
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("nothing to report"));
        assert!(!markdown.contains("## Executive Summary"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report(&records());
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"topFailureReasons\""));
        assert!(json.contains("\"revenueRangeAnalysis\""));
    }
}
