/*!
 * Tests for timecode conversion
 */

use regex::Regex;
use srtgen::timecode::{self, Timecode};

/// Every offset in the two-digit hour range renders as HH:MM:SS,mmm
#[test]
fn test_convert_acrossTwoDigitHourRange_shouldMatchPattern() {
    let pattern = Regex::new(r"^\d{2}:[0-5]\d:[0-5]\d,\d{3}$").unwrap();

    // Stride through the range with a fractional step so many millisecond
    // values and every carry boundary type get exercised
    let mut seconds = 0.0_f64;
    while seconds <= 359_999.999 {
        let code = timecode::convert(Some(seconds)).unwrap();
        assert!(pattern.is_match(&code), "{} rendered as {}", seconds, code);
        seconds += 97.3337;
    }

    for seconds in [0.0, 0.0004, 0.0005, 59.9995, 3599.9995, 359_999.999] {
        let code = timecode::convert(Some(seconds)).unwrap();
        assert!(pattern.is_match(&code), "{} rendered as {}", seconds, code);
    }
    assert_eq!(timecode::convert(Some(359_999.999)).unwrap(), "99:59:59,999");
}

/// Test carry from milliseconds up to hours
#[test]
fn test_convert_withRoundingCarry_shouldPropagateToHours() {
    assert_eq!(timecode::convert(Some(0.9996)).unwrap(), "00:00:01,000");
    assert_eq!(timecode::convert(Some(3599.9996)).unwrap(), "01:00:00,000");
    assert_eq!(timecode::convert(Some(35_999.9999)).unwrap(), "10:00:00,000");
}

/// Test that conversion is a pure function
#[test]
fn test_convert_withSameInput_shouldBeDeterministic() {
    for seconds in [1.2345, 61.0, 7322.5] {
        assert_eq!(Timecode::from_seconds(Some(seconds)), Timecode::from_seconds(Some(seconds)));
    }
}

/// Test that unusable offsets produce the invalid marker instead of failing
#[test]
fn test_convert_withAbsentOffset_shouldReturnInvalid() {
    assert!(timecode::convert(None).is_none());
    assert!(!Timecode::from_seconds(None).is_valid());
    assert_eq!(Timecode::from_seconds(Some(-0.5)), Timecode::Invalid);
}

/// Test hours beyond two digits
#[test]
fn test_convert_withHundredHours_shouldWidenHours() {
    assert_eq!(timecode::convert(Some(360_000.0)).unwrap(), "100:00:00,000");
}
