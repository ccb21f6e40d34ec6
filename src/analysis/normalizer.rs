//! Failure reason clustering.
//!
//! Free-text failure reasons are mapped onto a small taxonomy with an
//! ordered keyword table. The first rule with a matching keyword wins, so
//! rules whose keywords are substrings of broader ones must come first.

use super::ReasonCounting;
use crate::models::TeardownRecord;
use std::collections::{HashMap, HashSet};

/// A canonical category and the lower-case keywords that select it.
#[derive(Debug, Clone, Copy)]
pub struct ReasonRule {
    pub label: &'static str,
    pub keywords: &'static [&'static str],
}

/// Ordered clustering table.
pub const REASON_RULES: &[ReasonRule] = &[
    ReasonRule {
        label: "Poor Unit Economics",
        keywords: &["unit economics", "economics", "margins"],
    },
    ReasonRule {
        label: "No Product-Market Fit",
        keywords: &["product-market fit", "market fit", "no market need"],
    },
    ReasonRule {
        label: "High Customer Acquisition Costs",
        keywords: &["customer acquisition", "acquisition cost", "cac"],
    },
    ReasonRule {
        label: "Intense Competition",
        keywords: &["competition", "competitive"],
    },
    ReasonRule {
        label: "Legal/Regulatory Issues",
        keywords: &["legal", "compliance", "regulation"],
    },
    ReasonRule {
        label: "Funding/Cash Flow Problems",
        keywords: &["funding", "cash", "money", "financial"],
    },
    ReasonRule {
        label: "Team/Founder Issues",
        keywords: &["team", "founder", "co-founder"],
    },
    ReasonRule {
        label: "Scaling Challenges",
        keywords: &["scaling", "scale", "growth"],
    },
    ReasonRule {
        label: "Poor User Retention",
        keywords: &["retention", "churn"],
    },
    ReasonRule {
        label: "Monetization Problems",
        keywords: &["monetization", "revenue model", "pricing"],
    },
];

/// Map a raw failure reason to its canonical label.
///
/// Reasons that match no rule are returned verbatim, so callers must not
/// assume a closed set of labels.
pub fn normalize_reason(reason: &str) -> String {
    let lowered = reason.to_lowercase();

    REASON_RULES
        .iter()
        .find(|rule| rule.keywords.iter().any(|kw| lowered.contains(kw)))
        .map(|rule| rule.label.to_string())
        .unwrap_or_else(|| reason.to_string())
}

/// The `n` most frequent normalized reasons across a group of records.
///
/// Counting follows `counting` the same way the top failure reasons do.
/// Ties keep first-appearance order.
pub fn top_reasons(
    records: &[&TeardownRecord],
    counting: ReasonCounting,
    n: usize,
) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();

    for record in records {
        let mut seen_in_record: HashSet<String> = HashSet::new();

        for reason in &record.failure_reasons {
            let normalized = normalize_reason(reason);
            if !seen_in_record.insert(normalized.clone())
                && counting == ReasonCounting::PerRecord
            {
                continue;
            }

            let count = counts.entry(normalized.clone()).or_insert(0);
            if *count == 0 {
                order.push(normalized);
            }
            *count += 1;
        }
    }

    // Stable sort keeps first appearance for equal counts
    order.sort_by_key(|reason| std::cmp::Reverse(counts[reason]));
    order.truncate(n);
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_reasons() {
        assert_eq!(normalize_reason("Ran out of cash"), "Funding/Cash Flow Problems");
        assert_eq!(
            normalize_reason("Too much competition in the market"),
            "Intense Competition"
        );
        assert_eq!(
            normalize_reason("Founders had a falling out"),
            "Team/Founder Issues"
        );
        assert_eq!(normalize_reason("High CHURN"), "Poor User Retention");
    }

    #[test]
    fn test_unmatched_reason_is_verbatim() {
        assert_eq!(normalize_reason("Alien invasion"), "Alien invasion");
        assert_eq!(normalize_reason(""), "");
    }

    #[test]
    fn test_first_rule_wins() {
        // "market fit" would match product-market fit, but economics comes first
        assert_eq!(
            normalize_reason("Bad economics and no market fit"),
            "Poor Unit Economics"
        );
        // "acquisition cost" is checked before "money"
        assert_eq!(
            normalize_reason("Customer acquisition burned money"),
            "High Customer Acquisition Costs"
        );
    }

    #[test]
    fn test_rule_labels_are_unique() {
        let mut labels: Vec<_> = REASON_RULES.iter().map(|r| r.label).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), REASON_RULES.len());
    }

    #[test]
    fn test_top_reasons_ordering() {
        let mut a = TeardownRecord::named("A");
        a.failure_reasons = vec!["Alien invasion".into(), "ran out of cash".into()];
        let mut b = TeardownRecord::named("B");
        b.failure_reasons = vec!["no funding".into(), "churn".into()];

        let top = top_reasons(&[&a, &b], ReasonCounting::PerRecord, 3);

        assert_eq!(top[0], "Funding/Cash Flow Problems");
        assert_eq!(top[1], "Alien invasion");
        assert_eq!(top[2], "Poor User Retention");
        assert_eq!(top_reasons(&[&a, &b], ReasonCounting::PerRecord, 1).len(), 1);
    }

    #[test]
    fn test_top_reasons_follows_counting() {
        let mut a = TeardownRecord::named("A");
        a.failure_reasons = vec!["ran out of cash".into(), "no funding".into()];
        let mut b = TeardownRecord::named("B");
        b.failure_reasons = vec!["churn".into()];
        let mut c = TeardownRecord::named("C");
        c.failure_reasons = vec!["low retention".into()];

        let per_record = top_reasons(&[&a, &b, &c], ReasonCounting::PerRecord, 1);
        assert_eq!(per_record, vec!["Poor User Retention"]);

        let per_occurrence = top_reasons(&[&a, &b, &c], ReasonCounting::PerOccurrence, 1);
        assert_eq!(per_occurrence, vec!["Funding/Cash Flow Problems"]);
    }

    #[test]
    fn test_top_reasons_empty() {
        assert!(top_reasons(&[], ReasonCounting::PerRecord, 3).is_empty());
    }
}
