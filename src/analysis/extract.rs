//! Numeric extraction from semi-structured text.
//!
//! Revenue and duration fields are free text ("$1.2M raised",
//! "about 18 months"). These helpers pull a comparable number out of them
//! and format averages back into readable strings. All of them are total:
//! unparseable input yields zero rather than an error.

use once_cell::sync::Lazy;
use regex::Regex;

// Upper-case suffixes bind to the number unconditionally ("$50MM", "$20Mraised");
// lower-case ones only when they end a word, so "$10 monthly" stays 10.
static CURRENCY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(\d[\d,]*(?:\.\d+)?)(?:([KMB])|([kmb])\b)?").expect("valid currency pattern")
});

static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(months?|years?)\b").expect("valid duration pattern")
});

/// Extract a dollar amount from text such as "$1.2M" or "$500K raised".
///
/// Returns 0.0 when no amount is present.
pub fn extract_currency(text: &str) -> f64 {
    let Some(caps) = CURRENCY_RE.captures(text) else {
        return 0.0;
    };

    let number: f64 = caps[1].replace(',', "").parse().unwrap_or(0.0);
    let suffix = caps.get(2).or_else(|| caps.get(3));
    let multiplier = match suffix.map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
        Some("K") => 1_000.0,
        Some("M") => 1_000_000.0,
        Some("B") => 1_000_000_000.0,
        _ => 1.0,
    };

    number * multiplier
}

/// Extract a duration in months from text such as "18 months" or "2 years".
///
/// Returns 0.0 when no duration is present.
pub fn extract_months(text: &str) -> f64 {
    let Some(caps) = DURATION_RE.captures(text) else {
        return 0.0;
    };

    let number: f64 = caps[1].parse().unwrap_or(0.0);
    if caps[2].to_ascii_lowercase().starts_with("year") {
        number * 12.0
    } else {
        number
    }
}

/// Mean of the positive values, or `None` if there are none.
fn positive_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| *v > 0.0)
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));

    (n > 0).then(|| sum / n as f64)
}

/// Average revenue over a set of revenue strings, formatted.
///
/// Strings without an amount are ignored; if none has one the result is "$0".
pub fn average_revenue<S: AsRef<str>>(values: &[S]) -> String {
    positive_mean(values.iter().map(|v| extract_currency(v.as_ref())))
        .map(format_currency)
        .unwrap_or_else(|| "$0".to_string())
}

/// Average duration over a set of duration strings, formatted.
///
/// Strings without a duration are ignored; if none has one the result is
/// "0 months".
pub fn average_duration<S: AsRef<str>>(values: &[S]) -> String {
    positive_mean(values.iter().map(|v| extract_months(v.as_ref())))
        .map(format_months)
        .unwrap_or_else(|| "0 months".to_string())
}

/// Format a dollar amount as "$1.5M", "$500K" or "$10".
pub fn format_currency(amount: f64) -> String {
    if amount >= 1_000_000_000.0 {
        format!("${}B", one_decimal(amount / 1_000_000_000.0))
    } else if amount >= 1_000_000.0 {
        format!("${}M", one_decimal(amount / 1_000_000.0))
    } else if amount >= 1_000.0 {
        format!("${}K", one_decimal(amount / 1_000.0))
    } else {
        format!("${}", amount.round() as u64)
    }
}

/// Format a month count as "9 months" or, from a year up, "1.3 years".
pub fn format_months(months: f64) -> String {
    let rounded = months.round();
    if rounded >= 12.0 {
        let years = one_decimal(months / 12.0);
        if years == "1" {
            "1 year".to_string()
        } else {
            format!("{} years", years)
        }
    } else {
        match rounded as u64 {
            1 => "1 month".to_string(),
            n => format!("{} months", n),
        }
    }
}

fn one_decimal(value: f64) -> String {
    let s = format!("{:.1}", value);
    s.strip_suffix(".0").map(str::to_string).unwrap_or(s)
}
