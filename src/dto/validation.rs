//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a shirt number falls in the range worn on a futsal pitch.
pub fn validate_shirt_number(number: u8) -> Result<(), ValidationError> {
    if !(1..=99).contains(&number) {
        let mut err = ValidationError::new("shirt_number_range");
        err.message = Some(format!("Shirt number must be between 1 and 99 (got {number})").into());
        return Err(err);
    }

    Ok(())
}

/// Validates that a team color is a `#rrggbb` hex string.
///
/// # Examples
///
/// ```ignore
/// validate_team_color("#3b82f6") // Ok
/// validate_team_color("3b82f6")  // Err - missing '#'
/// validate_team_color("#3B82F6") // Err - uppercase
/// ```
pub fn validate_team_color(color: &str) -> Result<(), ValidationError> {
    let Some(digits) = color.strip_prefix('#') else {
        let mut err = ValidationError::new("team_color_format");
        err.message = Some("Team color must start with '#'".into());
        return Err(err);
    };

    if digits.len() != 6 {
        let mut err = ValidationError::new("team_color_length");
        err.message = Some(
            format!(
                "Team color must be '#' followed by 6 hex digits (got {})",
                digits.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !digits
        .chars()
        .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    {
        let mut err = ValidationError::new("team_color_format");
        err.message = Some("Team color must contain only lowercase hexadecimal digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_shirt_number_valid() {
        assert!(validate_shirt_number(1).is_ok());
        assert!(validate_shirt_number(10).is_ok());
        assert!(validate_shirt_number(99).is_ok());
    }

    #[test]
    fn test_validate_shirt_number_invalid() {
        assert!(validate_shirt_number(0).is_err());
        assert!(validate_shirt_number(100).is_err());
    }

    #[test]
    fn test_validate_team_color_valid() {
        assert!(validate_team_color("#3b82f6").is_ok());
        assert!(validate_team_color("#000000").is_ok());
        assert!(validate_team_color("#ffffff").is_ok());
    }

    #[test]
    fn test_validate_team_color_invalid() {
        assert!(validate_team_color("3b82f6").is_err()); // missing '#'
        assert!(validate_team_color("#3B82F6").is_err()); // uppercase
        assert!(validate_team_color("#3b82f").is_err()); // too short
        assert!(validate_team_color("#3b82f6a").is_err()); // too long
        assert!(validate_team_color("#3b82g6").is_err()); // invalid hex
        assert!(validate_team_color("").is_err()); // empty
    }
}
