//! Usage-time strings as reported by the reviewer statistics service
//!
//! Accepted form: `[-][d.]hh:mm[:ss[.fffffff]]`, or a bare day count.

/// Total minutes represented by `input`, `None` when it is malformed
pub fn parse_minutes(input: &str) -> Option<f64> {
    let input = input.trim();
    let (negative, body) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input),
    };
    if body.is_empty() {
        return None;
    }

    let parts: Vec<&str> = body.split(':').collect();
    let seconds = match parts.as_slice() {
        [days] => parse_component(days, u32::MAX)? as f64 * 86_400.0,
        [head, minutes] => clock_seconds(head, minutes, None)?,
        [head, minutes, seconds] => clock_seconds(head, minutes, Some(seconds))?,
        _ => return None,
    };

    let minutes = seconds / 60.0;
    Some(if negative { -minutes } else { minutes })
}

/// Round to six fractional digits
pub fn round_minutes(minutes: f64) -> f64 {
    (minutes * 1_000_000.0).round() / 1_000_000.0
}

fn clock_seconds(head: &str, minutes: &str, seconds: Option<&str>) -> Option<f64> {
    let (days, hours) = match head.split_once('.') {
        Some((days, hours)) => (parse_component(days, u32::MAX)?, hours),
        None => (0, head),
    };
    let hours = parse_component(hours, 23)?;
    let minutes = parse_component(minutes, 59)?;
    let seconds = match seconds {
        Some(seconds) => parse_seconds(seconds)?,
        None => 0.0,
    };

    Some(
        f64::from(days) * 86_400.0
            + f64::from(hours) * 3_600.0
            + f64::from(minutes) * 60.0
            + seconds,
    )
}

fn parse_seconds(value: &str) -> Option<f64> {
    let (whole, fraction) = match value.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (value, None),
    };
    let whole = f64::from(parse_component(whole, 59)?);
    let fraction = match fraction {
        // Ticks are 100ns, so at most seven digits
        Some(digits)
            if (1..=7).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            let ticks: u32 = digits.parse().ok()?;
            f64::from(ticks) / 10f64.powi(digits.len() as i32)
        }
        Some(_) => return None,
        None => 0.0,
    };
    Some(whole + fraction)
}

fn parse_component(value: &str, max: u32) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok().filter(|v| *v <= max)
}
