/// Error types for the barcode popup
use thiserror::Error;

/// Why a piece of user input cannot be encoded in the selected symbology
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    #[error("{label} requires numeric digits ({expected})")]
    NoDigits {
        label: &'static str,
        expected: &'static str,
    },

    #[error("{label} supports maximum {max} digits")]
    TooManyDigits { label: &'static str, max: usize },

    #[error("{label} requires at least {min} digits")]
    TooFewDigits { label: &'static str, min: usize },

    #[error("ITF requires an even number of digits. Add or remove one digit.")]
    OddDigitCount,

    #[error("{label} requires at least one character")]
    Empty { label: &'static str },

    #[error("{label} supports: {allowed}")]
    InvalidCharacters {
        label: &'static str,
        allowed: &'static str,
    },

    #[error("Pharmacode requires a numeric value")]
    NotANumber,

    #[error("Pharmacode value must be between {min} and {max}")]
    OutOfRange { min: i64, max: i64 },

    #[error("Codabar requires at least 3 characters (start char + data + stop char)")]
    CodabarTooShort,

    #[error("Codabar start character must be A, B, C, or D")]
    CodabarBadStart,

    #[error("Codabar stop character must be A, B, C, or D")]
    CodabarBadStop,

    #[error("Codabar requires data between start and stop characters")]
    CodabarMissingData,
}

/// The rendering collaborator rejected a payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderFailure {
    pub message: String,
}

impl RenderFailure {
    pub fn new(message: impl Into<String>) -> Self {
        RenderFailure {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter text or click \"Use Current URL\"")]
    EmptyInput,

    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error(transparent)]
    Render(#[from] RenderFailure),

    #[error("{0}")]
    Collaborator(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Text shown inline under the form when generation fails
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if matches!(self, Error::EmptyInput) || message.contains("requires") {
            message
        } else if message.contains("Invalid") {
            format!("Invalid barcode data. {}", message)
        } else {
            format!("Error generating barcode: {}", message)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let failure = ValidationFailure::TooFewDigits {
            label: "EAN13",
            min: 12,
        };
        assert_eq!(failure.to_string(), "EAN13 requires at least 12 digits");

        let failure = ValidationFailure::TooManyDigits {
            label: "EAN13",
            max: 13,
        };
        assert_eq!(failure.to_string(), "EAN13 supports maximum 13 digits");
    }

    #[test]
    fn test_user_message_passes_requirements_through() {
        let err = Error::from(ValidationFailure::OddDigitCount);
        assert_eq!(
            err.user_message(),
            "ITF requires an even number of digits. Add or remove one digit."
        );
    }

    #[test]
    fn test_user_message_empty_input() {
        assert_eq!(
            Error::EmptyInput.user_message(),
            "Please enter text or click \"Use Current URL\""
        );
    }

    #[test]
    fn test_user_message_prefixes_invalid_data() {
        let err = Error::from(RenderFailure::new("Invalid character in data"));
        assert_eq!(
            err.user_message(),
            "Invalid barcode data. Invalid character in data"
        );
    }

    #[test]
    fn test_user_message_generic_prefix() {
        let err = Error::from(RenderFailure::new("Unknown bcid foo"));
        assert_eq!(
            err.user_message(),
            "Error generating barcode: Unknown bcid foo"
        );

        let err = Error::from(ValidationFailure::OutOfRange { min: 3, max: 131070 });
        assert_eq!(
            err.user_message(),
            "Error generating barcode: Pharmacode value must be between 3 and 131070"
        );
    }
}
