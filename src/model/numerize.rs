const SUFFIXES: [(f64, &str); 4] = [
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// Shorten a count for display with one decimal place: `1234567` becomes `1.2M`.
pub fn numerize(value: i64) -> String {
    let magnitude = value.unsigned_abs() as f64;
    let sign = if value < 0 { "-" } else { "" };

    for (i, (scale, suffix)) in SUFFIXES.iter().enumerate() {
        if magnitude >= *scale {
            let scaled = format!("{:.1}", magnitude / scale);

            // 999_960 rounds to 1000.0K, which reads as 1M
            if let Some((bigger, suffix)) = i.checked_sub(1).map(|j| SUFFIXES[j]) {
                if scaled.parse::<f64>().is_ok_and(|rounded| rounded >= 1000.0) {
                    return shorten(sign, magnitude / bigger, suffix);
                }
            }

            return shorten(sign, magnitude / scale, suffix);
        }
    }

    value.to_string()
}

fn shorten(sign: &str, scaled: f64, suffix: &str) -> String {
    let scaled = format!("{scaled:.1}");
    let scaled = scaled.strip_suffix(".0").unwrap_or(&scaled);
    format!("{sign}{scaled}{suffix}")
}
