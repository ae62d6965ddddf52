use super::*;

// =============================================================================
// normalize_plate
// =============================================================================

#[test]
fn normalize_strips_separators_and_uppercases() {
    assert_eq!(normalize_plate(" 1234-bcd "), "1234BCD");
    assert_eq!(normalize_plate("m 1234 az"), "M1234AZ");
}

// =============================================================================
// validate_plate
// =============================================================================

#[test]
fn current_series() {
    assert_eq!(validate_plate("1234BCD"), Some(PlateFormat::Current));
    assert_eq!(validate_plate("0000 zzz"), Some(PlateFormat::Current));
    assert_eq!(validate_plate("9876-XYZ"), Some(PlateFormat::Current));
}

#[test]
fn current_series_rejects_vowels_and_q() {
    assert_eq!(validate_plate("1234ABC"), None);
    assert_eq!(validate_plate("1234BCE"), None);
    assert_eq!(validate_plate("1234QRS"), None);
    assert_eq!(validate_plate("1234ÑBC"), None);
}

#[test]
fn provincial_series() {
    assert_eq!(validate_plate("M1234AZ"), Some(PlateFormat::Provincial));
    assert_eq!(validate_plate("BA 5678 C"), Some(PlateFormat::Provincial));
    assert_eq!(validate_plate("GR-1234"), Some(PlateFormat::Provincial));
}

#[test]
fn special_and_trailer_series() {
    assert_eq!(validate_plate("E1234BCD"), Some(PlateFormat::Special));
    assert_eq!(validate_plate("e-1234-bcd"), Some(PlateFormat::Special));
    assert_eq!(validate_plate("R 1234 BCD"), Some(PlateFormat::Trailer));
}

#[test]
fn malformed_plates_are_rejected() {
    for bad in ["", "123BCD", "12345BCD", "1234BC", "1234BCDF", "ABC1234DEF", "1234 B C D!"] {
        assert!(!is_valid_plate(bad), "expected {bad:?} to be invalid");
    }
}
