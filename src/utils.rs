use alloy::primitives::{Address, B256, U256};
use chrono::{DateTime, Utc};

/// Truncate an address to "0xabcd...ef12" format.
pub fn truncate_address(addr: &Address) -> String {
    let s = format!("{addr}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Truncate a transaction hash to "0xabcd...ef12" format.
pub fn truncate_hash(hash: &B256) -> String {
    let s = format!("{hash}");
    if s.len() > 14 {
        format!("{}...{}", &s[..8], &s[s.len() - 4..])
    } else {
        s
    }
}

/// Format a wei value as a native-currency amount with symbol, e.g. "1.5 DPLS".
pub fn format_native(wei: U256, symbol: &str) -> String {
    format!("{} {symbol}", format_u256_as_decimal(wei, 18))
}

/// Format a U256 value as decimal with given decimals.
pub fn format_u256_as_decimal(value: U256, decimals: u8) -> String {
    if value.is_zero() {
        return "0.0".to_string();
    }

    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    if remainder.is_zero() {
        return format!("{whole}.0");
    }

    let remainder_str = format!("{remainder}");
    let padded = format!("{:0>width$}", remainder_str, width = decimals as usize);
    let trimmed = padded.trim_end_matches('0');

    // Limit to 6 decimal places
    let decimals_shown = trimmed.len().min(6);
    format!("{whole}.{}", &trimmed[..decimals_shown])
}

/// Parse a user-entered decimal amount ("1.5") into wei (18 decimals).
/// Returns None for empty input, malformed numbers, or more than 18
/// fractional digits.
pub fn parse_native(input: &str) -> Option<U256> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (whole_str, frac_str) = match input.split_once('.') {
        Some((w, f)) => (w, f),
        None => (input, ""),
    };
    if frac_str.len() > 18 {
        return None;
    }
    if whole_str.is_empty() && frac_str.is_empty() {
        return None;
    }

    let whole: U256 = if whole_str.is_empty() {
        U256::ZERO
    } else {
        whole_str.parse().ok()?
    };
    let frac: U256 = if frac_str.is_empty() {
        U256::ZERO
    } else {
        frac_str.parse().ok()?
    };

    let one = U256::from(10u64).pow(U256::from(18u64));
    let frac_scale = U256::from(10u64).pow(U256::from((18 - frac_str.len()) as u64));
    whole.checked_mul(one)?.checked_add(frac * frac_scale)
}

/// Format a wait time in seconds as "30d 4h", "2h 5m", "45s".
pub fn format_wait_time(seconds: u64) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Parse a user-entered wait time into seconds. Accepts a bare number of
/// seconds or a number with a d/h/m/s suffix ("30d", "12h", "90m", "45s").
pub fn parse_wait_time(input: &str) -> Option<u64> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }
    let (number, unit): (&str, u64) = match input.as_bytes()[input.len() - 1] {
        b'd' => (&input[..input.len() - 1], 86400),
        b'h' => (&input[..input.len() - 1], 3600),
        b'm' => (&input[..input.len() - 1], 60),
        b's' => (&input[..input.len() - 1], 1),
        _ => (&input[..], 1),
    };
    let n: u64 = number.trim().parse().ok()?;
    n.checked_mul(unit)
}

/// Format a Unix timestamp as "Xm ago", "Xh ago", etc.
pub fn format_time_ago(timestamp: u64) -> String {
    let now = Utc::now().timestamp() as u64;
    if timestamp > now {
        return "just now".to_string();
    }
    let diff = now - timestamp;
    if diff < 60 {
        format!("{diff}s ago")
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Format a Unix timestamp as a datetime string.
pub fn format_timestamp(timestamp: u64) -> String {
    DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%b %d, %Y %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Current time as a Unix timestamp.
pub fn now_ts() -> u64 {
    Utc::now().timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(18u64))
    }

    #[test]
    fn test_format_whole() {
        assert_eq!(format_u256_as_decimal(wei(1), 18), "1.0");
        assert_eq!(format_u256_as_decimal(wei(42), 18), "42.0");
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_u256_as_decimal(U256::ZERO, 18), "0.0");
    }

    #[test]
    fn test_format_fraction() {
        let half = U256::from(5u64) * U256::from(10u64).pow(U256::from(17u64));
        assert_eq!(format_u256_as_decimal(half, 18), "0.5");
        assert_eq!(format_u256_as_decimal(wei(1) + half, 18), "1.5");
    }

    #[test]
    fn test_format_truncates_to_six_places() {
        // 1 wei pads out to 18 places, shown to 6
        assert_eq!(format_u256_as_decimal(U256::from(1u64), 18), "0.000000");
        // 0.1234567891 -> shown to 6 places
        let v = U256::from(123_456_789_100_000_000u64);
        assert_eq!(format_u256_as_decimal(v, 18), "0.123456");
    }

    #[test]
    fn test_format_native_symbol() {
        assert_eq!(format_native(wei(2), "DPLS"), "2.0 DPLS");
    }

    #[test]
    fn test_parse_whole() {
        assert_eq!(parse_native("1"), Some(wei(1)));
        assert_eq!(parse_native(" 42 "), Some(wei(42)));
    }

    #[test]
    fn test_parse_fraction() {
        let half = U256::from(5u64) * U256::from(10u64).pow(U256::from(17u64));
        assert_eq!(parse_native("0.5"), Some(half));
        assert_eq!(parse_native(".5"), Some(half));
        assert_eq!(parse_native("1.5"), Some(wei(1) + half));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_native("").is_none());
        assert!(parse_native(".").is_none());
        assert!(parse_native("abc").is_none());
        assert!(parse_native("1.2.3").is_none());
        assert!(parse_native("-1").is_none());
    }

    #[test]
    fn test_parse_rejects_too_many_decimals() {
        assert!(parse_native("0.1234567890123456789").is_none());
    }

    #[test]
    fn test_parse_format_roundtrip() {
        let v = parse_native("3.25").unwrap();
        assert_eq!(format_u256_as_decimal(v, 18), "3.25");
    }

    #[test]
    fn test_truncate_address() {
        let addr = Address::from_slice(&[0xab; 20]);
        let s = truncate_address(&addr);
        assert!(s.starts_with("0x"));
        assert!(s.contains("..."));
        assert!(s.len() < 20);
    }

    #[test]
    fn test_format_wait_time() {
        assert_eq!(format_wait_time(45), "45s");
        assert_eq!(format_wait_time(125), "2m");
        assert_eq!(format_wait_time(7500), "2h 5m");
        assert_eq!(format_wait_time(86400 * 30 + 3600 * 4), "30d 4h");
    }

    #[test]
    fn test_parse_wait_time() {
        assert_eq!(parse_wait_time("3600"), Some(3600));
        assert_eq!(parse_wait_time("30d"), Some(30 * 86400));
        assert_eq!(parse_wait_time("12h"), Some(12 * 3600));
        assert_eq!(parse_wait_time("90m"), Some(5400));
        assert_eq!(parse_wait_time("45s"), Some(45));
        assert_eq!(parse_wait_time(" 2 d "), Some(2 * 86400));
    }

    #[test]
    fn test_parse_wait_time_rejects_garbage() {
        assert!(parse_wait_time("").is_none());
        assert!(parse_wait_time("d").is_none());
        assert!(parse_wait_time("1.5h").is_none());
        assert!(parse_wait_time("soon").is_none());
    }

    #[test]
    fn test_format_time_ago_future() {
        assert_eq!(format_time_ago(u64::MAX), "just now");
    }
}
