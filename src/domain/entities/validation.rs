use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[0-9 \-()]{7,20}$").expect("phone pattern is valid")
});

fn error(code: &'static str, message: &str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.to_string().into());
    err
}

/// Rejects lists containing empty or whitespace-only values.
pub fn validate_no_blank_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(error("blank_entry", "Entries cannot be empty"));
    }
    Ok(())
}

/// Like [`validate_no_blank_entries`] but also requires at least one entry.
pub fn validate_required_entries(values: &[String]) -> Result<(), ValidationError> {
    if values.is_empty() {
        return Err(error("required", "At least one entry is required"));
    }
    validate_no_blank_entries(values)
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone = phone.trim();
    let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
    if PHONE_RE.is_match(phone) && (7..=15).contains(&digits) {
        Ok(())
    } else {
        Err(error("phone", "Invalid phone number"))
    }
}

pub fn validate_url(value: &str) -> Result<(), ValidationError> {
    match url::Url::parse(value) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(()),
        _ => Err(error("url", "Must be a valid http(s) URL")),
    }
}

pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("required", "Cannot be empty"))
    } else {
        Ok(())
    }
}
