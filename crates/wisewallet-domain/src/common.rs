//! Validation errors shared by wallet primitives.

use std::fmt;

/// Form field that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Category,
    Amount,
    Username,
    Email,
    Phone,
    Password,
    ConfirmPassword,
    Budget,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Field::Title => "title",
            Field::Category => "category",
            Field::Amount => "amount",
            Field::Username => "username",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Password => "password",
            Field::ConfirmPassword => "confirm password",
            Field::Budget => "budget",
        };
        f.write_str(label)
    }
}

/// Inline validation failure, surfaced next to the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates a monetary limit: finite and not negative. Zero means "not tracked".
pub fn validate_budget_amount(amount: f64) -> Result<f64, ValidationError> {
    if !amount.is_finite() {
        return Err(ValidationError::new(Field::Budget, "Invalid amount"));
    }
    if amount < 0.0 {
        return Err(ValidationError::new(
            Field::Budget,
            "Budget cannot be negative",
        ));
    }
    Ok(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_amount_accepts_zero_and_rejects_negative() {
        assert_eq!(validate_budget_amount(0.0), Ok(0.0));
        assert_eq!(validate_budget_amount(250.5), Ok(250.5));
        let err = validate_budget_amount(-1.0).unwrap_err();
        assert_eq!(err.field, Field::Budget);
        assert!(validate_budget_amount(f64::NAN).is_err());
    }
}
