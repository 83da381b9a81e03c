//! Contact payload validation and phone-number helpers.
//!
//! Phone numbers are accepted in E.164-like form: an optional leading `+`,
//! a non-zero first digit, at most 15 digits total. Whitespace inside the
//! number is tolerated and stripped before matching.

use lazy_regex::regex_is_match;
use thiserror::Error;

/// Validation errors for shared contacts
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No contact payload in the message
    #[error("контакт не надано")]
    MissingContact,

    /// Contact has no phone number
    #[error("номер телефону не надано")]
    MissingPhone,

    /// Contact has no first name
    #[error("ім'я не надано")]
    MissingFirstName,

    /// Phone number does not match the expected format
    #[error("невірний формат номера телефону: {0}")]
    BadPhoneFormat(String),
}

/// Validates a shared contact's mandatory fields and phone format.
///
/// # Returns
/// * `Ok(())` - phone and first name are present and the phone is E.164-like
/// * `Err(ValidationError)` - with a user-presentable reason
pub fn validate_contact(phone_number: &str, first_name: &str) -> Result<(), ValidationError> {
    if phone_number.trim().is_empty() {
        return Err(ValidationError::MissingPhone);
    }

    if first_name.trim().is_empty() {
        return Err(ValidationError::MissingFirstName);
    }

    let stripped: String = phone_number.chars().filter(|c| !c.is_whitespace()).collect();
    if !regex_is_match!(r"^\+?[1-9]\d{1,14}$", &stripped) {
        return Err(ValidationError::BadPhoneFormat(phone_number.to_string()));
    }

    Ok(())
}

/// Normalizes a phone number for storage: drops everything except digits
/// and `+`, and guarantees a leading `+`.
pub fn normalize_phone(phone_number: &str) -> String {
    let cleaned: String = phone_number.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();

    if cleaned.starts_with('+') {
        cleaned
    } else {
        format!("+{}", cleaned)
    }
}

/// Masks a phone number for log output, keeping the first three and last
/// two characters visible.
pub fn mask_phone(phone_number: &str) -> String {
    let cleaned: String = phone_number.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();

    if cleaned.len() < 6 {
        return "***".to_string();
    }

    let start = &cleaned[..3];
    let end = &cleaned[cleaned.len() - 2..];
    format!("{}{}{}", start, "*".repeat(cleaned.len() - 5), end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn accepts_e164_numbers() {
        assert!(validate_contact("+380501234567", "Ann").is_ok());
        assert!(validate_contact("380501234567", "Ann").is_ok());
        assert!(validate_contact("+1 650 555 0100", "Bob").is_ok());
    }

    #[test]
    fn rejects_missing_fields() {
        assert_eq!(validate_contact("", "Ann"), Err(ValidationError::MissingPhone));
        assert_eq!(
            validate_contact("+380501234567", "  "),
            Err(ValidationError::MissingFirstName)
        );
    }

    #[test]
    fn rejects_malformed_numbers() {
        for bad in ["+0123456", "abc", "+3805o1234567", "+3801234567890123456", "7"] {
            assert!(
                matches!(validate_contact(bad, "Ann"), Err(ValidationError::BadPhoneFormat(_))),
                "expected rejection of {bad:?}"
            );
        }
    }

    #[test]
    fn normalize_adds_plus_and_strips_noise() {
        assert_eq!(normalize_phone("380 50 123-45-67"), "+380501234567");
        assert_eq!(normalize_phone("+380501234567"), "+380501234567");
    }

    #[test]
    fn mask_hides_the_middle() {
        assert_eq!(mask_phone("+380501234567"), "+38********67");
        assert_eq!(mask_phone("123"), "***");
    }
}
