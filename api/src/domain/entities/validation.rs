//! Field-level validation rules shared by the entity constructors and patches

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ValidationError;

pub const PERSON_NAME_MAX_CHARS: usize = 50;
pub const PLACE_TITLE_MAX_CHARS: usize = 100;
pub const AMENITY_NAME_MAX_CHARS: usize = 50;

pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);

pub const RATING_MIN: i64 = 1;
pub const RATING_MAX: i64 = 5;

/// Trim and require a non-empty value of at most `max` characters
pub fn required_text(
    field: &'static str,
    value: &str,
    max: Option<usize>,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    if let Some(max) = max {
        // Character count, not bytes
        if trimmed.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(trimmed.to_string())
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+\.[a-zA-Z]{2,}$")
            .unwrap_or_else(|e| panic!("email pattern must compile: {e}"))
    })
}

/// Email grammar: `local@domain.tld`, local part may not start with a dot
/// or contain two consecutive dots
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, _)) = email.split_once('@') else {
        return false;
    };
    !local.starts_with('.') && !local.contains("..") && email_pattern().is_match(email)
}

pub fn email(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if is_valid_email(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::InvalidEmail(value.to_string()))
    }
}

/// Inclusive range check. NaN and infinities never pass.
pub fn in_range(field: &'static str, value: f64, range: (f64, f64)) -> Result<f64, ValidationError> {
    let (min, max) = range;
    if value.is_finite() && value >= min && value <= max {
        Ok(value)
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

pub fn non_negative(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::Negative { field, value })
    }
}

/// Round half away from zero. Values too large to scale already have no
/// fractional digits and come back unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

pub fn rating(value: i64) -> Result<u8, ValidationError> {
    if (RATING_MIN..=RATING_MAX).contains(&value) {
        u8::try_from(value).map_err(|_| ValidationError::InvalidRating(value.to_string()))
    } else {
        Err(ValidationError::InvalidRating(value.to_string()))
    }
}
