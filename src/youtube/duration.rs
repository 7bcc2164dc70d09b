//! Conversion of YouTube ISO-8601 durations (`PT1H2M3S`) to clock strings

use crate::error::{CatalogError, Result};

/// Prefix marking a YouTube API duration
pub const DURATION_PREFIX: &str = "PT";

/// Format a YouTube duration as `H:MM:SS`, `MM:SS` or `00:SS`.
///
/// Empty input and anything without the `PT` prefix is returned unchanged so
/// hand-written durations such as `"05:30"` pass through.
pub fn format_duration(raw: &str) -> Result<String> {
    let Some(mut rest) = raw.strip_prefix(DURATION_PREFIX) else {
        return Ok(raw.to_string());
    };

    let mut hours = 0;
    let mut minutes = 0;
    let mut seconds = 0;

    if let Some((value, tail)) = rest.split_once('H') {
        hours = parse_component(value, raw)?;
        rest = tail;
    }
    if let Some((value, tail)) = rest.split_once('M') {
        minutes = parse_component(value, raw)?;
        rest = tail;
    }
    if let Some((value, tail)) = rest.split_once('S') {
        if !tail.is_empty() {
            return Err(CatalogError::MalformedDuration(raw.to_string()));
        }
        seconds = parse_component(value, raw)?;
    } else if !rest.is_empty() {
        return Err(CatalogError::MalformedDuration(raw.to_string()));
    }

    Ok(if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{:02}:{:02}", minutes, seconds)
    } else {
        format!("00:{:02}", seconds)
    })
}

fn parse_component(value: &str, raw: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .map_err(|_| CatalogError::MalformedDuration(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hours_minutes_seconds() {
        assert_eq!(format_duration("PT1H2M3S").unwrap(), "1:02:03");
        assert_eq!(format_duration("PT12H0M9S").unwrap(), "12:00:09");
        assert_eq!(format_duration("PT2H").unwrap(), "2:00:00");
    }

    #[test]
    fn test_minutes_seconds() {
        assert_eq!(format_duration("PT5M30S").unwrap(), "05:30");
        assert_eq!(format_duration("PT15M").unwrap(), "15:00");
        assert_eq!(format_duration("PT1H5S").unwrap(), "1:00:05");
    }

    #[test]
    fn test_seconds_only() {
        assert_eq!(format_duration("PT45S").unwrap(), "00:45");
        assert_eq!(format_duration("PT7S").unwrap(), "00:07");
        assert_eq!(format_duration("PT0S").unwrap(), "00:00");
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(format_duration("").unwrap(), "");
        assert_eq!(format_duration("05:30").unwrap(), "05:30");
        assert_eq!(format_duration("N/A").unwrap(), "N/A");
        assert_eq!(format_duration("P1DT2H").unwrap(), "P1DT2H");
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(matches!(
            format_duration("PTxM10S"),
            Err(CatalogError::MalformedDuration(_))
        ));
        assert!(format_duration("PT1H2M3").is_err());
        assert!(format_duration("PT5S9").is_err());
        assert!(format_duration("PTM").is_err());
    }
}
