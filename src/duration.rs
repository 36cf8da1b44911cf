use anyhow::bail;
use std::time::Duration;

/// Parse a human-readable delay like "10s", "1m30s" or "250ms".
///
/// Accepts one or more `<decimal number><unit>` components with units
/// ns, us/µs, ms, s, m, h. Fractions are allowed ("1.5s"), as is a bare "0".
/// Negative delays are rejected: this server has nothing meaningful to do
/// with them.
pub fn parse(input: &str) -> anyhow::Result<Duration> {
    if input.is_empty() {
        bail!("empty duration");
    }

    let mut rest = input;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    }
    if rest.starts_with('-') {
        bail!("negative duration not allowed: {input:?}");
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total = Duration::ZERO;
    let mut parsed_any = false;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            bail!("invalid duration: {input:?}");
        }
        let value: f64 = number
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid number {number:?} in duration {input:?}"))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];

        let unit_secs = match unit {
            "ns" => 1e-9,
            "us" | "µs" | "μs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            "" => bail!("missing unit in duration: {input:?}"),
            _ => bail!("unknown unit {unit:?} in duration: {input:?}"),
        };

        let component = Duration::try_from_secs_f64(value * unit_secs)
            .map_err(|_| anyhow::anyhow!("duration out of range: {input:?}"))?;
        total = total
            .checked_add(component)
            .ok_or_else(|| anyhow::anyhow!("duration out of range: {input:?}"))?;
        parsed_any = true;
    }

    if !parsed_any {
        bail!("invalid duration: {input:?}");
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seconds_and_minutes() {
        assert_eq!(parse("10s").unwrap(), Duration::from_secs(10));
        assert_eq!(parse("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse("2h").unwrap(), Duration::from_secs(7200));
    }

    #[test]
    fn parses_subsecond_units() {
        assert_eq!(parse("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse("5us").unwrap(), Duration::from_micros(5));
        assert_eq!(parse("5µs").unwrap(), Duration::from_micros(5));
        assert_eq!(parse("100ns").unwrap(), Duration::from_nanos(100));
    }

    #[test]
    fn parses_fractions_and_compounds() {
        assert_eq!(parse("1.5s").unwrap(), Duration::from_millis(1500));
        assert_eq!(parse("1m30s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse("0.5m").unwrap(), Duration::from_secs(30));
    }

    #[test]
    fn parses_zero_and_plus_sign() {
        assert_eq!(parse("0").unwrap(), Duration::ZERO);
        assert_eq!(parse("0s").unwrap(), Duration::ZERO);
        assert_eq!(parse("+10s").unwrap(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("10").is_err()); // missing unit
        assert!(parse("s").is_err()); // missing number
        assert!(parse("abc").is_err());
        assert!(parse("10x").is_err());
        assert!(parse("-5s").is_err());
        assert!(parse(".s").is_err());
        assert!(parse("10s extra").is_err());
    }
}
