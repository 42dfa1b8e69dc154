//! Hex color validation.

use crate::error::ValidationError;

/// Fallback color for new markers and sub-areas.
pub const DEFAULT_COLOR: &str = "#3B82F6";

/// Fallback color for the main boundary.
pub const DEFAULT_MAIN_AREA_COLOR: &str = "#ffffff";

/// Returns true for `#RGB` or `#RRGGBB` with hex digits of either case.
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Validates a hex color, returning it unchanged on success.
pub fn validate_color(value: &str) -> Result<&str, ValidationError> {
    if is_hex_color(value) {
        Ok(value)
    } else {
        Err(ValidationError::InvalidColor(value.to_string()))
    }
}

/// Expands a valid hex color into its RGB components.
pub fn hex_to_rgb(value: &str) -> Option<(u8, u8, u8)> {
    if !is_hex_color(value) {
        return None;
    }
    let digits = &value[1..];
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if digits.len() == 3 {
        // #abc is shorthand for #aabbcc
        let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
        Some((expand(0)?, expand(1)?, expand(2)?))
    } else {
        Some((channel(&digits[0..2])?, channel(&digits[2..4])?, channel(&digits[4..6])?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_short_and_long_forms() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#3B82F6"));
        assert!(is_hex_color("#a1B2c3"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_hex_color("notacolor"));
        assert!(!is_hex_color("3B82F6"));
        assert!(!is_hex_color("#3B82F"));
        assert!(!is_hex_color("#ggg"));
        assert!(!is_hex_color(""));
        assert_eq!(
            validate_color("red"),
            Err(ValidationError::InvalidColor("red".to_string()))
        );
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#3B82F6"), Some((0x3B, 0x82, 0xF6)));
        assert_eq!(hex_to_rgb("#fa0"), Some((0xFF, 0xAA, 0x00)));
        assert_eq!(hex_to_rgb("blue"), None);
    }
}
