//! Episode duration parsing and display
//!
//! Vendor feeds carry ISO-8601 durations (`PT1H2M3S`); the record store
//! keeps whole seconds.

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_WEEK: u64 = 604_800;

/// Parse an ISO-8601 duration into whole seconds.
///
/// Supports weeks, days, hours, minutes and seconds (`P1W`, `P1DT2H`,
/// `PT45M10.5S`). Fractional seconds are truncated. Year and month
/// designators are rejected since their length in seconds is undefined.
///
/// # Examples
///
/// ```
/// use castboard_common::duration::parse_iso8601_duration;
///
/// assert_eq!(parse_iso8601_duration("PT1H2M3S"), Some(3723));
/// assert_eq!(parse_iso8601_duration("PT45.9S"), Some(45));
/// assert_eq!(parse_iso8601_duration("1:02:03"), None);
/// ```
pub fn parse_iso8601_duration(input: &str) -> Option<u32> {
    let rest = input.trim().strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total: u64 = 0;
    let mut in_time = false;
    let mut number = String::new();
    let mut saw_component = false;

    for c in rest.chars() {
        match c {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' | ',' => number.push(if c == ',' { '.' } else { c }),
            designator => {
                if number.is_empty() {
                    return None;
                }
                let unit = match (designator, in_time) {
                    ('W', false) => SECONDS_PER_WEEK,
                    ('D', false) => SECONDS_PER_DAY,
                    ('H', true) => SECONDS_PER_HOUR,
                    ('M', true) => SECONDS_PER_MINUTE,
                    ('S', true) => 1,
                    _ => return None,
                };
                let value: f64 = number.parse().ok()?;
                if unit != 1 && value.fract() != 0.0 {
                    return None;
                }
                total = total.checked_add((value * unit as f64) as u64)?;
                number.clear();
                saw_component = true;
            }
        }
    }

    if !number.is_empty() || !saw_component {
        return None;
    }
    u32::try_from(total).ok()
}

/// Format seconds for list display: `M:SS` under an hour, `H:MM:SS` above.
///
/// # Examples
///
/// ```
/// use castboard_common::duration::format_duration;
///
/// assert_eq!(format_duration(59), "0:59");
/// assert_eq!(format_duration(330), "5:30");
/// assert_eq!(format_duration(3723), "1:02:03");
/// ```
pub fn format_duration(seconds: u32) -> String {
    let seconds = u64::from(seconds);
    let hours = seconds / SECONDS_PER_HOUR;
    let mins = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let secs = seconds % SECONDS_PER_MINUTE;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
