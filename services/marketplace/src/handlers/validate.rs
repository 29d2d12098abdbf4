//! Request-shape checks applied before a body reaches a service.

use crate::error::MarketplaceError;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_BIO_LEN: usize = 1000;
pub const MAX_LABEL_LEN: usize = 100;
pub const MAX_ADDRESS_LEN: usize = 500;
pub const MAX_POSTAL_CODE_LEN: usize = 20;
pub const MAX_REASON_LEN: usize = 500;
pub const MAX_YEARS: i32 = 100;
pub const MAX_RADIUS_KM: i32 = 100;
pub const MAX_PREMIUM_DAYS: i64 = 3650;

pub fn length(field: &str, value: &str, min: usize, max: usize) -> Result<(), MarketplaceError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(MarketplaceError::validation(if min == 0 {
            format!("{field} must be at most {max} characters")
        } else {
            format!("{field} must be between {min} and {max} characters")
        }));
    }
    Ok(())
}

pub fn opt_length(
    field: &str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<(), MarketplaceError> {
    value.map_or(Ok(()), |v| length(field, v, min, max))
}

pub fn range<T>(field: &str, value: T, min: T, max: T) -> Result<(), MarketplaceError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(MarketplaceError::validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}

pub fn opt_range<T>(field: &str, value: Option<T>, min: T, max: T) -> Result<(), MarketplaceError>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    value.map_or(Ok(()), |v| range(field, v, min, max))
}

pub fn absolute_url(field: &str, value: &str) -> Result<(), MarketplaceError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|_| MarketplaceError::validation(format!("{field} must be a valid URL")))
}

/// Innermost value of a PATCH field, if it is being set.
pub fn set_value<T>(field: &Option<Option<T>>) -> Option<&T> {
    field.as_ref().and_then(Option::as_ref)
}
