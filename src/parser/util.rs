// (C) Copyright 2019 Hewlett Packard Enterprise Development LP

use chrono::prelude::*;

/// Parses a decimal string (`.` or `,` separator) into an integer scaled by
/// `10^scale`, rounding half-up on the first dropped digit.
///
/// e.g. `parse_scaled("0.0346620", 6) == Some(34662)` and
/// `parse_scaled("1513438.900", 3) == Some(1513438900)`
pub fn parse_scaled(value: &str, scale: u32) -> Option<u64> {
  let mut parts = value.splitn(2, |c| c == '.' || c == ',');
  let whole = parts.next().unwrap_or("");
  let fraction = parts.next().unwrap_or("");

  if whole.is_empty() && fraction.is_empty() {
    return None;
  }

  let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
  if !all_digits(whole) || !all_digits(fraction) {
    return None;
  }

  let factor = 10u64.checked_pow(scale)?;
  let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
  let mut result = whole.checked_mul(factor)?;

  let kept = fraction.len().min(scale as usize);
  if kept > 0 {
    let digits: u64 = fraction[..kept].parse().ok()?;
    let padding = 10u64.checked_pow(scale - kept as u32)?;
    result = result.checked_add(digits.checked_mul(padding)?)?;
  }

  if fraction.len() > kept && fraction.as_bytes()[kept] >= b'5' {
    result = result.checked_add(1)?;
  }

  Some(result)
}

/// Rounds a microsecond figure to whole milliseconds, half-up
pub fn micros_to_millis(micros: u64) -> u64 {
  (micros + 500) / 1000
}

/// Parses a JVM datestamp such as `2017-01-20T23:18:29.584-0500`
pub fn parse_datestamp(datestamp: &str) -> Option<DateTime<FixedOffset>> {
  let normalized = datestamp.replace(',', ".");

  DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.3f%z").ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  use spectral::prelude::*;

  #[test]
  fn test_parse_scaled() {
    assert_that!(parse_scaled("0.700", 3)).is_equal_to(Some(700));
    assert_that!(parse_scaled("0.0346620", 6)).is_equal_to(Some(34662));
    assert_that!(parse_scaled("1513438.900", 3)).is_equal_to(Some(1_513_438_900));
    assert_that!(parse_scaled("28039,161", 3)).is_equal_to(Some(28_039_161));
    assert_that!(parse_scaled("0.0", 3)).is_equal_to(Some(0));
    assert_that!(parse_scaled("12", 2)).is_equal_to(Some(1200));
  }

  #[test]
  fn test_parse_scaled_rounding() {
    assert_that!(parse_scaled("0.0004546", 6)).is_equal_to(Some(455));
    assert_that!(parse_scaled("0.0004544", 6)).is_equal_to(Some(454));
    assert_that!(parse_scaled("1.9995", 3)).is_equal_to(Some(2000));
  }

  #[test]
  fn test_parse_scaled_invalid() {
    assert_that!(parse_scaled("", 3)).is_none();
    assert_that!(parse_scaled(".", 3)).is_none();
    assert_that!(parse_scaled("1.2.3", 3)).is_none();
    assert_that!(parse_scaled("abc", 3)).is_none();
    assert_that!(parse_scaled("-1.0", 3)).is_none();
    assert_that!(parse_scaled("99999999999999999999", 3)).is_none();
  }

  #[test]
  fn test_micros_to_millis() {
    assert_that!(micros_to_millis(929)).is_equal_to(1);
    assert_that!(micros_to_millis(499)).is_equal_to(0);
    assert_that!(micros_to_millis(500)).is_equal_to(1);
    assert_that!(micros_to_millis(2_127_343)).is_equal_to(2127);
  }

  #[test]
  fn test_parse_datestamp() {
    let parsed = parse_datestamp("2017-01-20T23:18:29.584-0500");
    assert_that!(parsed).is_some();

    let parsed = parsed.unwrap();
    assert_that!(parsed.offset().local_minus_utc()).is_equal_to(-5 * 3600);
    assert_that!(parsed.timestamp_millis()).is_equal_to(1_484_972_309_584);

    assert_that!(parse_datestamp("2019-05-09T01:39:00,763+0000")).is_some();
    assert_that!(parse_datestamp("2019-13-09T01:39:00.763+0000")).is_none();
    assert_that!(parse_datestamp("not a date")).is_none();
  }
}
