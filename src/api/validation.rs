use chrono::NaiveDate;

use super::ApiError;
use crate::domain::parse_date;

pub fn validate_date(value: &str) -> Result<NaiveDate, ApiError> {
    parse_date(value).map_err(|_| {
        ApiError::validation(format!(
            "Invalid date: '{}'. Expected YYYY-MM-DD",
            value
        ))
    })
}

pub fn validate_limit(limit: usize) -> Result<usize, ApiError> {
    const MAX_LIMIT: usize = 1000;
    const MIN_LIMIT: usize = 1;

    if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {}. Limit must be between {} and {}",
            limit, MIN_LIMIT, MAX_LIMIT
        )));
    }
    Ok(limit)
}

pub fn validate_username(name: &str) -> Result<&str, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::validation("Username is required"));
    }

    if name.chars().count() < 3 || name.chars().count() > 32 {
        return Err(ApiError::validation(
            "Username must be between 3 and 32 characters",
        ));
    }

    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '_')
    {
        return Err(ApiError::validation(
            "Username can only contain letters, numbers, dots, hyphens, and underscores",
        ));
    }

    Ok(name)
}

pub fn validate_email(email: &str) -> Result<&str, ApiError> {
    let email = email.trim();
    let valid = email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        })
        && !email.chars().any(char::is_whitespace);

    if !valid {
        return Err(ApiError::validation(format!("Invalid email: '{}'", email)));
    }
    Ok(email)
}

pub fn validate_exercise(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Exercise name cannot be empty"));
    }
    if trimmed.chars().count() > 100 {
        return Err(ApiError::validation(
            "Exercise name must be 100 characters or less",
        ));
    }
    Ok(trimmed)
}

pub fn validate_weight(weight: f64) -> Result<f64, ApiError> {
    if !weight.is_finite() || weight <= 0.0 || weight > 1000.0 {
        return Err(ApiError::validation(format!(
            "Invalid weight: {}. Weight must be between 0 and 1000",
            weight
        )));
    }
    Ok(weight)
}

pub fn validate_rating(rating: i32) -> Result<i32, ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::validation(format!(
            "Invalid rating: {}. Rating must be between 1 and 5",
            rating
        )));
    }
    Ok(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-07").is_ok());
        assert!(validate_date("2024-02-30").is_err());
        assert!(validate_date("07/01/2024").is_err());
        assert!(validate_date("").is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert!(validate_limit(1).is_ok());
        assert!(validate_limit(1000).is_ok());
        assert!(validate_limit(0).is_err());
        assert!(validate_limit(1001).is_err());
    }

    #[test]
    fn test_validate_username() {
        assert_eq!(validate_username("  sam_lifts ").unwrap(), "sam_lifts");
        assert!(validate_username("jo").is_err());
        assert!(validate_username("a".repeat(33).as_str()).is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("sam@example.com").is_ok());
        assert!(validate_email("sam@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("sam example@x.com").is_err());
        assert!(validate_email("sam@@example.com").is_err());
    }

    #[test]
    fn test_validate_weight_and_rating() {
        assert!(validate_weight(82.5).is_ok());
        assert!(validate_weight(0.0).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_validate_exercise() {
        assert_eq!(validate_exercise(" Squat ").unwrap(), "Squat");
        assert!(validate_exercise("   ").is_err());
    }
}
