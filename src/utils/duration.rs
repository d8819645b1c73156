//! Duration flags (`--timeout=1m`)

use std::time::Duration;

/// Parse `500ms`, `90s`, `5m`, `1h`, or `1h30m`; a bare number is seconds
pub fn parse_duration(s: &str) -> Result<Duration, String> {
    let s = s.trim().to_lowercase();
    if s.is_empty() {
        return Err("empty duration".to_string());
    }
    if s.chars().all(|c| c.is_ascii_digit()) {
        let secs: u64 = s.parse().map_err(|_| out_of_range())?;
        return Ok(Duration::from_secs(secs));
    }

    let mut total_ms = 0u64;
    let mut rest = s.as_str();
    while !rest.is_empty() {
        let unit_start = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (digits, tail) = rest.split_at(unit_start);
        let unit_end = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
        let (unit, next) = tail.split_at(unit_end);
        if digits.is_empty() {
            return Err(format!("invalid duration: {s}"));
        }
        let scale: u64 = match unit {
            "ms" => 1,
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            "" => return Err(format!("missing unit after {digits}")),
            _ => return Err(format!("unknown unit: {unit}")),
        };
        let num: u64 = digits.parse().map_err(|_| out_of_range())?;
        total_ms = num
            .checked_mul(scale)
            .and_then(|ms| total_ms.checked_add(ms))
            .ok_or_else(out_of_range)?;
        rest = next;
    }

    Ok(Duration::from_millis(total_ms))
}

fn out_of_range() -> String {
    "duration out of range".to_string()
}
