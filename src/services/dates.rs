use std::sync::OnceLock;

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

fn quantity_regex() -> &'static Regex {
    static QUANTITY: OnceLock<Regex> = OnceLock::new();
    QUANTITY.get_or_init(|| Regex::new(r"\d+").expect("literal regex is valid"))
}

/// Resolves a relative-date display string ("3 horas", "2 dias") against
/// the current time.
#[must_use]
pub fn resolve(text: &str) -> DateTime<Utc> {
    resolve_at(text, Utc::now())
}

/// Resolves a relative-date display string against an explicit `now`.
///
/// The first integer token is the quantity. Unit words are matched in a
/// fixed order — minutos, horas, dias, semanas, meses — and the first hit
/// wins; months count as exactly 30 days. Anything that cannot be resolved
/// (empty input, no quantity, unknown unit, arithmetic overflow) falls back
/// to `now` so the caller always has a usable sort key.
#[must_use]
pub fn resolve_at(text: &str, now: DateTime<Utc>) -> DateTime<Utc> {
    if text.trim().is_empty() {
        return now;
    }

    let Some(quantity) = quantity_regex()
        .find(text)
        .and_then(|m| m.as_str().parse::<i64>().ok())
    else {
        return now;
    };

    let lower = text.to_lowercase();
    let delta = if lower.contains("minuto") {
        Duration::try_minutes(quantity)
    } else if lower.contains("hora") {
        Duration::try_hours(quantity)
    } else if lower.contains("dia") {
        Duration::try_days(quantity)
    } else if lower.contains("semana") {
        Duration::try_weeks(quantity)
    } else if lower.contains("mês") || lower.contains("mes") {
        quantity.checked_mul(30).and_then(Duration::try_days)
    } else {
        None
    };

    delta
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn resolves_hours() {
        let now = fixed_now();
        assert_eq!(resolve_at("3 horas atrás", now), now - Duration::hours(3));
        assert_eq!(resolve_at("há 1 hora", now), now - Duration::hours(1));
    }

    #[test]
    fn resolves_minutes_days_weeks_and_months() {
        let now = fixed_now();
        assert_eq!(resolve_at("45 minutos", now), now - Duration::minutes(45));
        assert_eq!(resolve_at("2 dias atrás", now), now - Duration::days(2));
        assert_eq!(resolve_at("1 semana atrás", now), now - Duration::weeks(1));
        assert_eq!(resolve_at("2 meses atrás", now), now - Duration::days(60));
    }

    #[test]
    fn unit_precedence_is_fixed() {
        // Both units present: hours are checked before days.
        let now = fixed_now();
        assert_eq!(
            resolve_at("1 hora e 2 dias", now),
            now - Duration::hours(1)
        );
    }

    #[test]
    fn falls_back_to_now() {
        let now = fixed_now();
        assert_eq!(resolve_at("", now), now);
        assert_eq!(resolve_at("ontem", now), now);
        assert_eq!(resolve_at("garbled 99 nonsense", now), now);
    }

    #[test]
    fn overflow_falls_back_to_now() {
        let now = fixed_now();
        let text = format!("{} meses", i64::MAX);
        assert_eq!(resolve_at(&text, now), now);
    }

    #[test]
    fn wall_clock_wrapper_is_close_to_now_minus_duration() {
        let resolved = resolve("3 horas");
        let drift = (Utc::now() - resolved) - Duration::hours(3);
        assert!(drift.num_seconds().abs() < 5);
    }
}
