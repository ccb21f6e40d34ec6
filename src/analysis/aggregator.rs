//! Teardown aggregation and statistics.
//!
//! Each function here reduces the full record collection to one section of
//! the analytics result. They are independent of each other, never mutate
//! their input and return empty sections for an empty collection.

use super::extract::{average_duration, average_revenue, extract_currency};
use super::normalizer::{normalize_reason, top_reasons};
use super::ReasonCounting;
use crate::models::{
    IndustryStat, PricingStat, RedFlag, ReasonStat, RevenueRangeStat, TeardownRecord,
    TechStackStat,
};
use std::collections::{HashMap, HashSet};

/// Keyword bucket for technology incidence.
#[derive(Debug, Clone, Copy)]
pub struct TechBucket {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
}

pub const TECH_BUCKETS: &[TechBucket] = &[
    TechBucket {
        name: "React/JavaScript",
        keywords: &["react", "javascript", "js", "web app", "spa"],
    },
    TechBucket {
        name: "Mobile App",
        keywords: &["mobile", "ios", "android", "app store"],
    },
    TechBucket {
        name: "Ruby on Rails",
        keywords: &["rails", "ruby"],
    },
    TechBucket {
        name: "Python/Django",
        keywords: &["python", "django"],
    },
    TechBucket {
        name: "PHP/Laravel",
        keywords: &["php", "laravel"],
    },
    TechBucket {
        name: "No-Code/Bubble",
        keywords: &["no-code", "bubble", "webflow"],
    },
    TechBucket {
        name: "Marketplace Platform",
        keywords: &["marketplace", "platform", "two-sided"],
    },
];

/// Half-open funding bucket `[min, max)`; `max` of `None` is unbounded.
#[derive(Debug, Clone, Copy)]
pub struct RevenueBucket {
    pub label: &'static str,
    pub min: f64,
    pub max: Option<f64>,
}

impl RevenueBucket {
    fn contains(&self, amount: f64) -> bool {
        amount >= self.min && self.max.map_or(true, |max| amount < max)
    }
}

pub const REVENUE_BUCKETS: &[RevenueBucket] = &[
    RevenueBucket {
        label: "$0-1M",
        min: 0.0,
        max: Some(1_000_000.0),
    },
    RevenueBucket {
        label: "$1M-10M",
        min: 1_000_000.0,
        max: Some(10_000_000.0),
    },
    RevenueBucket {
        label: "$10M-50M",
        min: 10_000_000.0,
        max: Some(50_000_000.0),
    },
    RevenueBucket {
        label: "$50M+",
        min: 50_000_000.0,
        max: None,
    },
];

/// Number of common reasons reported per revenue bucket.
const REASONS_PER_BUCKET: usize = 3;

/// Integer percentage of `part` in `whole`, clamped to 0..=100.
///
/// A zero denominator yields 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round().min(100.0) as u32
}

/// Push `name` into `examples` unless it is already there or the list is full.
fn push_example(examples: &mut Vec<String>, name: &str, max: usize) {
    if examples.len() < max && !examples.iter().any(|e| e == name) {
        examples.push(name.to_string());
    }
}

/// Whether `word` occurs in `haystack` with no alphanumeric neighbours.
///
/// Both arguments are expected to be lower-case already.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Most common normalized failure reasons, highest count first.
///
/// With [`ReasonCounting::PerRecord`] a record adds at most one to each
/// reason; with [`ReasonCounting::PerOccurrence`] every raw reason string
/// counts, so a record listing two phrasings of the same cause counts twice.
pub fn failure_reasons(
    records: &[TeardownRecord],
    counting: ReasonCounting,
    limit: usize,
    max_examples: usize,
) -> Vec<ReasonStat> {
    let mut stats: Vec<ReasonStat> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let mut seen_in_record: HashSet<String> = HashSet::new();

        for raw in &record.failure_reasons {
            let reason = normalize_reason(raw);
            let first_in_record = seen_in_record.insert(reason.clone());
            if counting == ReasonCounting::PerRecord && !first_in_record {
                continue;
            }

            let slot = *index.entry(reason.clone()).or_insert_with(|| {
                stats.push(ReasonStat {
                    reason,
                    count: 0,
                    percentage: 0,
                    examples: Vec::new(),
                });
                stats.len() - 1
            });

            let stat = &mut stats[slot];
            stat.count += 1;
            push_example(&mut stat.examples, &record.name, max_examples);
        }
    }

    for stat in &mut stats {
        stat.percentage = percentage(stat.count, records.len());
    }

    stats.sort_by_key(|s| std::cmp::Reverse(s.count));
    stats.truncate(limit);
    stats
}

/// Technology incidence across records, inferred from free text.
pub fn tech_stacks(records: &[TeardownRecord]) -> Vec<TechStackStat> {
    let texts: Vec<String> = records
        .iter()
        .map(|r| {
            [
                r.market.as_str(),
                r.short_description.as_str(),
                r.detailed_summary.as_str(),
                r.tech_stack.as_deref().unwrap_or(""),
            ]
            .join("\n")
            .to_lowercase()
        })
        .collect();

    let mut stats: Vec<TechStackStat> = TECH_BUCKETS
        .iter()
        .map(|bucket| {
            let count = texts
                .iter()
                .filter(|text| bucket.keywords.iter().any(|kw| contains_word(text, kw)))
                .count();

            TechStackStat {
                stack: bucket.name.to_string(),
                count,
                failure_rate: percentage(count, records.len()),
            }
        })
        .filter(|s| s.count > 0)
        .collect();

    stats.sort_by_key(|s| std::cmp::Reverse(s.count));
    stats
}

/// Records grouped by their exact market label.
pub fn industries(records: &[TeardownRecord], max_examples: usize) -> Vec<IndustryStat> {
    let mut groups: Vec<(&str, Vec<&TeardownRecord>)> = Vec::new();

    for record in records {
        match groups.iter_mut().find(|(market, _)| *market == record.market) {
            Some((_, members)) => members.push(record),
            None => groups.push((record.market.as_str(), vec![record])),
        }
    }

    let mut stats: Vec<IndustryStat> = groups
        .into_iter()
        .map(|(market, members)| {
            let durations: Vec<&str> = members.iter().map(|r| r.duration.as_str()).collect();
            let revenues: Vec<&str> = members.iter().map(|r| r.revenue.as_str()).collect();
            let mut examples = Vec::new();
            for member in &members {
                push_example(&mut examples, &member.name, max_examples);
            }

            IndustryStat {
                industry: market.to_string(),
                count: members.len(),
                avg_duration: average_duration(&durations),
                avg_revenue: average_revenue(&revenues),
                examples,
            }
        })
        .collect();

    stats.sort_by_key(|s| std::cmp::Reverse(s.count));
    stats
}

/// Records bucketed by extracted funding amount, in fixed bucket order.
pub fn revenue_ranges(
    records: &[TeardownRecord],
    counting: ReasonCounting,
    max_examples: usize,
) -> Vec<RevenueRangeStat> {
    let amounts: Vec<f64> = records.iter().map(|r| extract_currency(&r.revenue)).collect();

    REVENUE_BUCKETS
        .iter()
        .filter_map(|bucket| {
            let members: Vec<&TeardownRecord> = records
                .iter()
                .zip(&amounts)
                .filter(|(_, amount)| bucket.contains(**amount))
                .map(|(record, _)| record)
                .collect();

            if members.is_empty() {
                return None;
            }

            let mut examples = Vec::new();
            for member in &members {
                push_example(&mut examples, &member.name, max_examples);
            }

            Some(RevenueRangeStat {
                range: bucket.label.to_string(),
                count: members.len(),
                common_reasons: top_reasons(&members, counting, REASONS_PER_BUCKET),
                examples,
            })
        })
        .collect()
}

struct FlagEntry {
    flag: &'static str,
    correlation: u32,
    description: &'static str,
    examples: [&'static str; 3],
}

const RED_FLAGS: &[FlagEntry] = &[
    FlagEntry {
        flag: "Multiple Pivots (3+ in 6 months)",
        correlation: 78,
        description: "Startups that pivot frequently often lack clear vision",
        examples: ["Quirky", "Grockit", "Turntable.fm"],
    },
    FlagEntry {
        flag: "No Domain Expertise",
        correlation: 62,
        description: "Founders without industry knowledge struggle with execution",
        examples: ["Homejoy", "Beepi", "Sprig"],
    },
    FlagEntry {
        flag: "Unsustainable Unit Economics",
        correlation: 85,
        description: "Burning money on each customer is a death sentence",
        examples: ["Homejoy", "Shyp", "Washio"],
    },
    FlagEntry {
        flag: "Over-reliance on VC Funding",
        correlation: 71,
        description: "Companies that can't achieve profitability without constant funding",
        examples: ["Quibi", "Beepi", "Webvan"],
    },
    FlagEntry {
        flag: "Ignoring Legal/Regulatory Issues",
        correlation: 89,
        description: "Compliance problems can shut down businesses overnight",
        examples: ["Zirtual", "Homejoy", "Secret"],
    },
];

/// The curated red-flag list.
///
/// Independent of the records' content; only omitted when there is no data
/// at all.
pub fn red_flags(records: &[TeardownRecord]) -> Vec<RedFlag> {
    if records.is_empty() {
        return Vec::new();
    }

    RED_FLAGS
        .iter()
        .map(|entry| RedFlag {
            flag: entry.flag.to_string(),
            correlation: entry.correlation,
            description: entry.description.to_string(),
            examples: entry.examples.iter().map(|e| e.to_string()).collect(),
        })
        .collect()
}

/// Outcome rates per pricing model, in order of first appearance.
pub fn pricing_patterns(records: &[TeardownRecord], max_examples: usize) -> Vec<PricingStat> {
    let mut stats: Vec<(PricingStat, usize)> = Vec::new();

    for record in records {
        let label = record.pricing_label();
        let pos = match stats.iter().position(|(s, _)| s.strategy == label) {
            Some(pos) => pos,
            None => {
                stats.push((
                    PricingStat {
                        strategy: label.to_string(),
                        count: 0,
                        success_rate: 0,
                        examples: Vec::new(),
                    },
                    0,
                ));
                stats.len() - 1
            }
        };

        let (stat, successes) = &mut stats[pos];
        stat.count += 1;
        if record.is_success() {
            *successes += 1;
        }
        push_example(&mut stat.examples, &record.name, max_examples);
    }

    stats
        .into_iter()
        .map(|(mut stat, successes)| {
            stat.success_rate = percentage(successes, stat.count);
            stat
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, market: &str, revenue: &str, reasons: &[&str]) -> TeardownRecord {
        TeardownRecord {
            market: market.to_string(),
            revenue: revenue.to_string(),
            failure_reasons: reasons.iter().map(|r| r.to_string()).collect(),
            ..TeardownRecord::named(name)
        }
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(3, 0), 0);
        assert_eq!(percentage(5, 4), 100);
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("built with react and node", "react"));
        assert!(contains_word("node.js backend", "js"));
        assert!(contains_word("a web app for dogs", "web app"));
        assert!(!contains_word("reactive systems", "react"));
        assert!(!contains_word("office space rental", "spa"));
        assert!(!contains_word("json api", "js"));
    }

    #[test]
    fn test_failure_reasons_per_record() {
        let records = vec![record(
            "A",
            "Fintech",
            "$1M",
            &["cash flow", "ran out of money", "alien invasion"],
        )];

        let stats = failure_reasons(&records, ReasonCounting::PerRecord, 10, 3);

        assert_eq!(stats[0].reason, "Funding/Cash Flow Problems");
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].percentage, 100);
        assert_eq!(stats[0].examples, vec!["A"]);
        assert_eq!(stats[1].reason, "alien invasion");
    }

    #[test]
    fn test_failure_reasons_per_occurrence() {
        let records = vec![
            record("A", "Fintech", "$1M", &["cash flow", "ran out of money"]),
            record("B", "Fintech", "$1M", &["competition"]),
        ];

        let stats = failure_reasons(&records, ReasonCounting::PerOccurrence, 10, 3);

        assert_eq!(stats[0].reason, "Funding/Cash Flow Problems");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].percentage, 100);
        // The record is still listed once as an example
        assert_eq!(stats[0].examples, vec!["A"]);
    }

    #[test]
    fn test_failure_reasons_limit_and_examples() {
        let records: Vec<_> = (0..5)
            .map(|i| {
                let name = format!("S{}", i);
                record(&name, "SaaS", "$1M", &["no funding", &format!("odd reason {}", i)])
            })
            .collect();

        let stats = failure_reasons(&records, ReasonCounting::PerRecord, 3, 2);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].count, 5);
        assert_eq!(stats[0].examples, vec!["S0", "S1"]);
        // Ties keep first-seen order
        assert_eq!(stats[1].reason, "odd reason 0");
        assert_eq!(stats[2].reason, "odd reason 1");
    }

    #[test]
    fn test_tech_stacks() {
        let mut a = record("A", "Mobile gaming", "", &[]);
        a.short_description = "An iOS app built in React Native".to_string();
        let mut b = record("B", "B2B SaaS", "", &[]);
        b.tech_stack = Some("Ruby on Rails".to_string());
        let c = record("C", "Two-sided marketplace for tutors", "", &[]);

        let stats = tech_stacks(&[a, b, c]);

        let mobile = stats.iter().find(|s| s.stack == "Mobile App").unwrap();
        assert_eq!(mobile.count, 1);
        assert_eq!(mobile.failure_rate, 33);
        assert!(stats.iter().any(|s| s.stack == "React/JavaScript"));
        assert!(stats.iter().any(|s| s.stack == "Ruby on Rails"));
        assert!(stats.iter().any(|s| s.stack == "Marketplace Platform"));
        assert!(!stats.iter().any(|s| s.stack == "PHP/Laravel"));
        assert!(stats.iter().all(|s| s.count > 0));
    }

    #[test]
    fn test_industries() {
        let mut a = record("A", "Fintech", "$2M", &[]);
        a.duration = "6 months".to_string();
        let mut b = record("B", "Retail", "$500K", &[]);
        b.duration = "1 year".to_string();
        let mut c = record("C", "Fintech", "$1M", &[]);
        c.duration = "1 year".to_string();

        let stats = industries(&[a, b, c], 3);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].industry, "Fintech");
        assert_eq!(stats[0].count, 2);
        assert_eq!(stats[0].avg_duration, "9 months");
        assert_eq!(stats[0].avg_revenue, "$1.5M");
        assert_eq!(stats[0].examples, vec!["A", "C"]);
        assert_eq!(stats[1].industry, "Retail");
        assert_eq!(stats[1].avg_duration, "1 year");
    }

    #[test]
    fn test_industries_are_not_normalized() {
        let stats = industries(
            &[record("A", "Fintech", "", &[]), record("B", "fintech", "", &[])],
            3,
        );
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].avg_revenue, "$0");
        assert_eq!(stats[0].avg_duration, "0 months");
    }

    #[test]
    fn test_revenue_ranges() {
        let records = vec![
            record("Big", "X", "$75M", &["competition"]),
            record("Small", "X", "no data", &["ran out of cash"]),
            record("Mid", "X", "$1M", &["churn"]),
        ];

        let stats = revenue_ranges(&records, ReasonCounting::PerRecord, 3);

        let labels: Vec<_> = stats.iter().map(|s| s.range.as_str()).collect();
        assert_eq!(labels, vec!["$0-1M", "$1M-10M", "$50M+"]);
        assert_eq!(stats[0].examples, vec!["Small"]);
        assert_eq!(stats[0].common_reasons, vec!["Funding/Cash Flow Problems"]);
        assert_eq!(stats[1].examples, vec!["Mid"]);
        assert_eq!(stats[2].common_reasons, vec!["Intense Competition"]);
    }

    #[test]
    fn test_revenue_range_edges() {
        let records = vec![
            record("AlmostMillion", "X", "$999K", &[]),
            record("Million", "X", "$1M", &[]),
            record("Ten", "X", "$10M", &[]),
            record("Fifty", "X", "$50M", &[]),
        ];

        let stats = revenue_ranges(&records, ReasonCounting::PerRecord, 3);

        let labels: Vec<_> = stats.iter().map(|s| s.range.as_str()).collect();
        assert_eq!(labels, vec!["$0-1M", "$1M-10M", "$10M-50M", "$50M+"]);
        assert_eq!(stats[0].examples, vec!["AlmostMillion"]);
        assert_eq!(stats[1].examples, vec!["Million"]);
        assert_eq!(stats[2].examples, vec!["Ten"]);
        assert_eq!(stats[3].examples, vec!["Fifty"]);
    }

    #[test]
    fn test_revenue_range_reasons_follow_counting() {
        let records = vec![
            record("A", "X", "$2M", &["ran out of cash", "no funding"]),
            record("B", "X", "$3M", &["churn"]),
            record("C", "X", "$4M", &["low retention"]),
        ];

        let per_record = revenue_ranges(&records, ReasonCounting::PerRecord, 3);
        assert_eq!(per_record[0].common_reasons[0], "Poor User Retention");

        let per_occurrence = revenue_ranges(&records, ReasonCounting::PerOccurrence, 3);
        assert_eq!(per_occurrence[0].common_reasons[0], "Funding/Cash Flow Problems");
    }

    #[test]
    fn test_red_flags() {
        assert!(red_flags(&[]).is_empty());

        let flags = red_flags(&[record("A", "X", "", &[])]);
        assert_eq!(flags.len(), 5);
        assert_eq!(flags[0].flag, "Multiple Pivots (3+ in 6 months)");
        assert_eq!(flags[4].correlation, 89);
        assert!(flags.iter().all(|f| f.examples.len() == 3));
    }

    #[test]
    fn test_pricing_patterns() {
        let mut a = record("A", "X", "", &[]);
        a.pricing_model = Some("Freemium".to_string());
        a.status = Some("acquired".to_string());
        let mut b = record("B", "X", "", &[]);
        b.pricing_model = Some("Freemium".to_string());
        let c = record("C", "X", "", &[]);
        let mut d = record("D", "X", "", &[]);
        d.pricing_model = Some("Freemium".to_string());
        d.status = Some("Profitable".to_string());

        let stats = pricing_patterns(&[a, b, c, d], 3);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].strategy, "Freemium");
        assert_eq!(stats[0].count, 3);
        assert_eq!(stats[0].success_rate, 67);
        assert_eq!(stats[0].examples, vec!["A", "B", "D"]);
        assert_eq!(stats[1].strategy, "Unknown");
        assert_eq!(stats[1].success_rate, 0);
    }

    #[test]
    fn test_empty_input() {
        assert!(failure_reasons(&[], ReasonCounting::PerRecord, 10, 3).is_empty());
        assert!(tech_stacks(&[]).is_empty());
        assert!(industries(&[], 3).is_empty());
        assert!(revenue_ranges(&[], ReasonCounting::PerRecord, 3).is_empty());
        assert!(pricing_patterns(&[], 3).is_empty());
    }
}
