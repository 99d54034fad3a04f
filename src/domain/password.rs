use std::borrow::Cow;

use validator::ValidationError;
use zxcvbn::{zxcvbn, Score};

const MIN_LENGTH: usize = 8;
const MIN_SCORE: Score = Score::Three;
const SYMBOLS: &str = "!@#$%^&*";

fn rejected(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

/// Password rule shared by job-seeker and company-admin signup.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_LENGTH {
        return Err(rejected(
            "password_length",
            format!("Must be at least {} characters", MIN_LENGTH),
        ));
    }

    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| SYMBOLS.contains(c));
    if !(has_upper && has_digit && has_symbol) {
        return Err(rejected(
            "password_complexity",
            "Must include an uppercase letter, a number and a symbol",
        ));
    }

    let estimate = zxcvbn(password, &[]);
    if estimate.score() < MIN_SCORE {
        let hint = estimate
            .feedback()
            .and_then(|feedback| feedback.warning())
            .map(|warning| warning.to_string())
            .unwrap_or_else(|| "Password is too easy to guess".to_string());
        return Err(rejected("password_strength", hint));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_passwords_fail_on_length() {
        let err = validate_password_strength("A1!a").unwrap_err();
        assert_eq!(err.code, "password_length");
    }

    #[test]
    fn passwords_without_a_symbol_fail_on_complexity() {
        let err = validate_password_strength("Password12345").unwrap_err();
        assert_eq!(err.code, "password_complexity");
    }

    #[test]
    fn guessable_passwords_fail_on_strength() {
        let err = validate_password_strength("Password1!").unwrap_err();
        assert_eq!(err.code, "password_strength");
    }

    #[test]
    fn long_mixed_passwords_pass() {
        assert!(validate_password_strength("Str0ng!Passw0rd#2024").is_ok());
    }
}
