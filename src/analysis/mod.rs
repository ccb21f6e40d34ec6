//! Failure analytics over teardown collections.
//!
//! The entry point is [`compute_analytics`], which runs every aggregator
//! over the same snapshot of records and assembles an [`AnalyticsResult`].
//! Nothing in here performs I/O or keeps state between calls.

pub mod aggregator;
pub mod extract;
pub mod normalizer;

pub use aggregator::*;
pub use extract::*;
pub use normalizer::*;

use crate::models::{AnalyticsResult, TeardownRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How failure reasons are counted when one record lists several raw
/// reasons that normalize to the same category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReasonCounting {
    /// A record adds at most one to each category.
    #[default]
    PerRecord,
    /// Every raw reason string adds one.
    PerOccurrence,
}

/// Tunables for one analytics pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub reason_counting: ReasonCounting,
    /// Maximum number of entries in the top failure reasons section.
    pub max_top_reasons: usize,
    /// Maximum number of example names per group.
    pub max_examples: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            reason_counting: ReasonCounting::default(),
            max_top_reasons: 10,
            max_examples: 3,
        }
    }
}

impl From<&crate::config::AnalysisConfig> for AnalysisOptions {
    fn from(config: &crate::config::AnalysisConfig) -> Self {
        Self {
            reason_counting: config.reason_counting,
            max_top_reasons: config.max_top_reasons,
            max_examples: config.max_examples,
        }
    }
}

/// Compute the full analytics result with default options.
#[allow(dead_code)] // Convenience entry point; the CLI always passes options
pub fn compute_analytics(records: &[TeardownRecord]) -> AnalyticsResult {
    compute_analytics_with(records, &AnalysisOptions::default())
}

/// Compute the full analytics result.
///
/// An empty input gives a result whose sections are all empty.
pub fn compute_analytics_with(
    records: &[TeardownRecord],
    options: &AnalysisOptions,
) -> AnalyticsResult {
    let result = AnalyticsResult {
        top_failure_reasons: failure_reasons(
            records,
            options.reason_counting,
            options.max_top_reasons,
            options.max_examples,
        ),
        tech_stack_analysis: tech_stacks(records),
        industry_breakdown: industries(records, options.max_examples),
        revenue_range_analysis: revenue_ranges(
            records,
            options.reason_counting,
            options.max_examples,
        ),
        red_flags: red_flags(records),
        pricing_patterns: pricing_patterns(records, options.max_examples),
    };

    debug!(
        "Analytics over {} records: {} reasons, {} stacks, {} industries, {} ranges, {} pricing groups",
        records.len(),
        result.top_failure_reasons.len(),
        result.tech_stack_analysis.len(),
        result.industry_breakdown.len(),
        result.revenue_range_analysis.len(),
        result.pricing_patterns.len()
    );

    result
}
