//! Human-readable uptime rendering.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Render a duration in seconds using the largest fitting unit, e.g. `1.5 minutes`.
///
/// The magnitude is rounded to one decimal and a trailing `.0` is dropped.
/// The unit is pluralised unless the rendered magnitude is exactly `1`.
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let (unit, size) = match seconds {
        s if s >= DAY => ("day", DAY),
        s if s >= HOUR => ("hour", HOUR),
        s if s >= MINUTE => ("minute", MINUTE),
        _ => ("second", 1),
    };

    #[allow(clippy::cast_precision_loss)]
    let value = seconds as f64 / size as f64;
    let rendered = format!("{:.1}", (value * 10.0).round() / 10.0);
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);

    let plural = if rendered == "1" { "" } else { "s" };
    format!("{rendered} {unit}{plural}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_below_a_minute() {
        assert_eq!(format_uptime(45), "45 seconds");
        assert_eq!(format_uptime(0), "0 seconds");
    }

    #[test]
    fn single_unit_is_not_pluralised() {
        assert_eq!(format_uptime(1), "1 second");
        assert_eq!(format_uptime(60), "1 minute");
        assert_eq!(format_uptime(86_400), "1 day");
    }

    #[test]
    fn fractional_minutes() {
        assert_eq!(format_uptime(90), "1.5 minutes");
        assert_eq!(format_uptime(100), "1.7 minutes");
    }

    #[test]
    fn whole_hours_drop_the_decimal() {
        assert_eq!(format_uptime(7200), "2 hours");
    }

    #[test]
    fn days_for_long_uptimes() {
        assert_eq!(format_uptime(3 * 86_400 + 43_200), "3.5 days");
    }

    #[test]
    fn rounding_up_to_one_stays_singular() {
        // 61 seconds is 1.0166 minutes, which renders as "1".
        assert_eq!(format_uptime(61), "1 minute");
    }
}
