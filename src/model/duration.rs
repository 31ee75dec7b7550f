/// Parse an ISO-8601 duration (`P1DT2H3M4S`, `PT4M13S`, ...) into whole seconds.
///
/// Only the day and time designators are understood since that is all the video API emits.
/// Returns `None` for anything else, including an empty string.
pub fn iso8601_seconds(text: &str) -> Option<i64> {
    let rest = text.strip_prefix('P')?;
    if rest.is_empty() {
        return None;
    }

    let mut total = 0.0_f64;
    let mut number = String::new();
    let mut in_time = false;

    for ch in rest.chars() {
        match ch {
            'T' if !in_time && number.is_empty() => in_time = true,
            '0'..='9' | '.' => number.push(ch),
            unit => {
                let value: f64 = number.parse().ok()?;
                number.clear();

                total += match (in_time, unit) {
                    (false, 'W') => value * 604_800.0,
                    (false, 'D') => value * 86_400.0,
                    (true, 'H') => value * 3_600.0,
                    (true, 'M') => value * 60.0,
                    (true, 'S') => value,
                    _ => return None,
                };
            }
        }
    }

    if !number.is_empty() {
        return None;
    }

    Some(total as i64)
}
