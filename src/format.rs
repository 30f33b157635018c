use chrono::{Datelike, NaiveDate};

/// Group separator used by the ru-RU locale for digits.
pub const NBSP: char = '\u{a0}';

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// Thousands grouping for an integral value: `180000` -> `"180 000"`.
pub fn group_digits(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    let lead = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index != 0 && index % 3 == lead % 3 {
            grouped.push(NBSP);
        }
        grouped.push(ch);
    }
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Formats a numeric form value with ru-RU grouping. Values that do not parse
/// as an integer are passed through verbatim rather than rendered as a fault.
pub fn format_number(raw: &str) -> String {
    match raw.trim().parse::<i64>() {
        Ok(value) => group_digits(value),
        Err(_) => raw.to_string(),
    }
}

/// `"180000"` -> `"180 000 ₽"`.
pub fn format_currency(raw: &str) -> String {
    format!("{}{}₽", format_number(raw), NBSP)
}

/// Long-form ru-RU date for an ISO `YYYY-MM-DD` form value:
/// `"2025-03-15"` -> `"15 марта 2025 г."`. Unparseable input passes through.
pub fn format_date_long(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => format!(
            "{} {} {} г.",
            date.day(),
            MONTHS_GENITIVE[date.month0() as usize],
            date.year()
        ),
        Err(_) => raw.to_string(),
    }
}

/// Short ru-RU date: `15.03.2025`.
pub fn format_date_short(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes_with_nbsp() {
        assert_eq!(group_digits(180_000), "180\u{a0}000");
        assert_eq!(group_digits(2_845_000), "2\u{a0}845\u{a0}000");
        assert_eq!(group_digits(450), "450");
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(-95_000), "-95\u{a0}000");
    }

    #[test]
    fn currency_appends_ruble_suffix() {
        assert_eq!(format_currency("180000"), "180\u{a0}000\u{a0}₽");
    }

    #[test]
    fn currency_is_idempotent_per_value() {
        let a = format_currency("180000");
        let b = format_currency(" 180000 ");
        assert_eq!(a, b);
    }

    #[test]
    fn non_numeric_input_passes_through() {
        assert_eq!(format_number("договорная"), "договорная");
        assert_eq!(format_currency("n/a"), "n/a\u{a0}₽");
    }

    #[test]
    fn long_date_uses_genitive_month() {
        assert_eq!(format_date_long("2025-03-15"), "15 марта 2025 г.");
        assert_eq!(format_date_long("2026-03-14"), "14 марта 2026 г.");
        assert_eq!(format_date_long("2025-01-01"), "1 января 2025 г.");
    }

    #[test]
    fn unparseable_date_passes_through() {
        assert_eq!(format_date_long("not-a-date"), "not-a-date");
        assert_eq!(format_date_long(""), "");
    }

    #[test]
    fn short_date_is_dotted() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(format_date_short(date), "15.03.2025");
    }
}
