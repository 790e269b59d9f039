use std::collections::HashSet;

use chrono::NaiveDate;

pub const EM_DASH: &str = "\u{2014}";

pub fn format_short(n: Option<f64>) -> String {
    let n = match n {
        Some(n) if n.is_finite() => n,
        _ => return "--".to_string(),
    };
    let abs = n.abs();
    if abs >= 1e12 {
        format!("{:.2}T", n / 1e12)
    } else if abs >= 1e9 {
        format!("{:.2}B", n / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", n / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", n / 1e3)
    } else {
        trim_fraction(&format!("{n}"))
    }
}

pub fn format_usd(n: f64) -> String {
    if !n.is_finite() {
        return EM_DASH.to_string();
    }
    let rounded = (n * 100.0).round() / 100.0;
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut out = String::from(if rounded < 0.0 { "-$" } else { "$" });
    out.push_str(&group_thousands(int_part));
    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn format_number(n: f64) -> String {
    trim_fraction(&format!("{:.2}", n))
}

fn trim_fraction(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn parse_csv_list(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_lowercase()) {
            out.push(item.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_numbers() {
        assert_eq!(format_short(Some(1_250_000_000.0)), "1.25B");
        assert_eq!(format_short(Some(2_000.0)), "2.00K");
        assert_eq!(format_short(Some(999.0)), "999");
        assert_eq!(format_short(Some(0.0)), "0");
        assert_eq!(format_short(None), "--");
    }

    #[test]
    fn usd_grouping_and_decimals() {
        assert_eq!(format_usd(1000.0), "$1,000");
        assert_eq!(format_usd(40.0), "$40");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(0.5), "$0.5");
        assert_eq!(format_usd(-20.0), "-$20");
    }

    #[test]
    fn date_format_is_short_month() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(format_date(d), "Mar 1, 2025");
    }

    #[test]
    fn csv_list_dedups_case_insensitively() {
        assert_eq!(
            parse_csv_list("published, Published,,live"),
            vec!["published".to_string(), "live".to_string()]
        );
    }
}
