//! Common validation utilities.

use validator::ValidationError;

/// Maximum length of a section key.
pub const MAX_SECTION_KEY_LENGTH: usize = 64;

/// Maximum length of a business type slug.
pub const MAX_BUSINESS_TYPE_LENGTH: usize = 64;

/// Maximum number of keys accepted in a single ordering list.
pub const MAX_ORDER_KEYS: usize = 100;

lazy_static::lazy_static! {
    static ref SECTION_KEY_REGEX: regex::Regex = regex::Regex::new(r"^[a-z][a-z0-9_]*$").unwrap();
    static ref BUSINESS_TYPE_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap();
}

/// Validates a section key: lowercase snake_case, starting with a letter.
pub fn validate_section_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() || key.len() > MAX_SECTION_KEY_LENGTH {
        let mut err = ValidationError::new("section_key_length");
        err.message = Some("Section key must be 1-64 characters".into());
        return Err(err);
    }
    if !SECTION_KEY_REGEX.is_match(key) {
        let mut err = ValidationError::new("section_key_format");
        err.message = Some(
            "Section key may only contain lowercase letters, digits, and underscores".into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Validates a business type slug such as `tech-startup`.
pub fn validate_business_type(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() || slug.len() > MAX_BUSINESS_TYPE_LENGTH {
        let mut err = ValidationError::new("business_type_length");
        err.message = Some("Business type must be 1-64 characters".into());
        return Err(err);
    }
    if !BUSINESS_TYPE_REGEX.is_match(slug) {
        let mut err = ValidationError::new("business_type_format");
        err.message = Some(
            "Business type may only contain lowercase letters, digits, and inner hyphens".into(),
        );
        return Err(err);
    }
    Ok(())
}

/// Validates the size of an ordering list without judging its contents.
///
/// Unknown keys are tolerated downstream, so only the list length and the
/// length of each entry are bounded here.
pub fn validate_order_keys(keys: &[String]) -> Result<(), ValidationError> {
    if keys.len() > MAX_ORDER_KEYS {
        let mut err = ValidationError::new("too_many_order_keys");
        err.message = Some("Ordering may contain at most 100 keys".into());
        return Err(err);
    }
    if keys.iter().any(|k| k.len() > MAX_SECTION_KEY_LENGTH) {
        let mut err = ValidationError::new("order_key_too_long");
        err.message = Some("Ordering keys must be at most 64 characters".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_section_key() {
        assert!(validate_section_key("header").is_ok());
        assert!(validate_section_key("business_hours").is_ok());
        assert!(validate_section_key("section2").is_ok());
        assert!(validate_section_key("").is_err());
        assert!(validate_section_key("Header").is_err());
        assert!(validate_section_key("2header").is_err());
        assert!(validate_section_key("social-links").is_err());
    }

    #[test]
    fn test_validate_section_key_too_long() {
        let key = "a".repeat(MAX_SECTION_KEY_LENGTH + 1);
        let err = validate_section_key(&key).unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Section key must be 1-64 characters"
        );
        assert!(validate_section_key(&"a".repeat(MAX_SECTION_KEY_LENGTH)).is_ok());
    }

    #[test]
    fn test_validate_section_key_error_message() {
        let err = validate_section_key("about us").unwrap_err();
        assert_eq!(
            err.message.unwrap().to_string(),
            "Section key may only contain lowercase letters, digits, and underscores"
        );
    }

    #[test]
    fn test_validate_business_type() {
        assert!(validate_business_type("cafe").is_ok());
        assert!(validate_business_type("tech-startup").is_ok());
        assert!(validate_business_type("music-artist").is_ok());
        assert!(validate_business_type("a").is_ok());
        assert!(validate_business_type("-cafe").is_err());
        assert!(validate_business_type("cafe-").is_err());
        assert!(validate_business_type("Cafe").is_err());
        assert!(validate_business_type("tech_startup").is_err());
        assert!(validate_business_type("").is_err());
    }

    #[test]
    fn test_validate_order_keys() {
        let keys = vec!["header".to_string(), "Not A Key".to_string()];
        assert!(validate_order_keys(&keys).is_ok());

        let many: Vec<String> = (0..=MAX_ORDER_KEYS).map(|i| format!("s{}", i)).collect();
        assert!(validate_order_keys(&many).is_err());

        let long = vec!["x".repeat(MAX_SECTION_KEY_LENGTH + 1)];
        assert!(validate_order_keys(&long).is_err());
    }
}
