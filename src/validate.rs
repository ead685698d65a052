/// Input validation and normalization per symbology
///
/// Every symbology maps to exactly one [`Rule`]. `normalize` trims the input
/// and applies that rule, producing the canonical text handed to the renderer.
use crate::error::ValidationFailure;
use crate::symbology::Symbology;
use once_cell::sync::Lazy;
use regex::Regex;

pub const PHARMACODE_MIN: i64 = 3;
pub const PHARMACODE_MAX: i64 = 131070;

static CODE39_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9 \-.$/+%]+$").expect("valid regex"));
static CODE11_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9\-]+$").expect("valid regex"));
static CODABAR_DATA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9\-$:/.+]+$").expect("valid regex"));
static LEADING_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?[0-9]+").expect("valid regex"));

/// How a symbology's input is checked and canonicalized
#[derive(Debug, Clone, Copy)]
pub enum Rule {
    /// Keep only digits; the count must fall within `min..=max`
    DigitCount {
        label: &'static str,
        min: usize,
        max: usize,
        expected: &'static str,
    },
    /// Keep only digits; the count must be even
    EvenDigits,
    /// Keep only digits; any non-zero count
    Digits,
    /// Integer in `PHARMACODE_MIN..=PHARMACODE_MAX`
    Pharmacode,
    /// Non-empty text matching a character class
    Charset {
        label: &'static str,
        pattern: &'static Lazy<Regex>,
        allowed: &'static str,
        uppercase: bool,
    },
    /// Any non-empty text
    NonEmpty { label: &'static str },
    /// Start char, data, stop char
    Codabar,
    /// No rules known; trimmed text is used as-is
    PassThrough,
}

impl Symbology {
    pub fn rule(&self) -> Rule {
        match self {
            Symbology::Ean13 => Rule::DigitCount {
                label: "EAN13",
                min: 12,
                max: 13,
                expected: "12 or 13 digits",
            },
            Symbology::Ean8 => Rule::DigitCount {
                label: "EAN-8",
                min: 7,
                max: 8,
                expected: "7 or 8 digits",
            },
            Symbology::UpcA => Rule::DigitCount {
                label: "UPC-A",
                min: 11,
                max: 12,
                expected: "11 or 12 digits",
            },
            Symbology::UpcE => Rule::DigitCount {
                label: "UPC-E",
                min: 6,
                max: 8,
                expected: "6, 7, or 8 digits",
            },
            Symbology::Interleaved2of5 => Rule::EvenDigits,
            Symbology::Msi => Rule::Digits,
            Symbology::Pharmacode => Rule::Pharmacode,
            Symbology::Code39 => Rule::Charset {
                label: "Code39",
                pattern: &CODE39_CHARS,
                allowed: "A-Z, 0-9, and special characters: - . $ / + % SPACE",
                uppercase: true,
            },
            Symbology::Code11 => Rule::Charset {
                label: "Code11",
                pattern: &CODE11_CHARS,
                allowed: "numeric digits (0-9) and dash (-) only",
                uppercase: false,
            },
            Symbology::Code93 => Rule::NonEmpty { label: "Code93" },
            Symbology::RationalizedCodabar => Rule::Codabar,
            Symbology::Code128
            | Symbology::QrCode
            | Symbology::DataMatrix
            | Symbology::Pdf417
            | Symbology::AztecCode
            | Symbology::MaxiCode
            | Symbology::DotCode
            | Symbology::Other(_) => Rule::PassThrough,
        }
    }
}

/// Strip surrounding whitespace, counting a stray byte-order mark as whitespace
pub fn trim_input(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

/// Validate `raw` for `symbology` and return the canonical text to encode
pub fn normalize(raw: &str, symbology: &Symbology) -> Result<String, ValidationFailure> {
    let text = trim_input(raw);

    match symbology.rule() {
        Rule::DigitCount {
            label,
            min,
            max,
            expected,
        } => {
            let digits = digits_only(text);
            if digits.is_empty() {
                return Err(ValidationFailure::NoDigits { label, expected });
            }
            if digits.len() > max {
                return Err(ValidationFailure::TooManyDigits { label, max });
            }
            if digits.len() < min {
                return Err(ValidationFailure::TooFewDigits { label, min });
            }
            Ok(digits)
        }
        Rule::EvenDigits => {
            let digits = digits_only(text);
            if digits.is_empty() {
                return Err(ValidationFailure::NoDigits {
                    label: "ITF",
                    expected: "an even count",
                });
            }
            if digits.len() % 2 != 0 {
                return Err(ValidationFailure::OddDigitCount);
            }
            if digits.len() < 2 {
                return Err(ValidationFailure::TooFewDigits { label: "ITF", min: 2 });
            }
            Ok(digits)
        }
        Rule::Digits => {
            let digits = digits_only(text);
            if digits.is_empty() {
                return Err(ValidationFailure::NoDigits {
                    label: "MSI",
                    expected: "0-9 only",
                });
            }
            Ok(digits)
        }
        Rule::Pharmacode => normalize_pharmacode(text),
        Rule::Charset {
            label,
            pattern,
            allowed,
            uppercase,
        } => {
            if text.is_empty() {
                return Err(ValidationFailure::Empty { label });
            }
            if !pattern.is_match(text) {
                return Err(ValidationFailure::InvalidCharacters { label, allowed });
            }
            Ok(if uppercase {
                text.to_ascii_uppercase()
            } else {
                text.to_string()
            })
        }
        Rule::NonEmpty { label } => {
            if text.is_empty() {
                return Err(ValidationFailure::Empty { label });
            }
            Ok(text.to_string())
        }
        Rule::Codabar => normalize_codabar(text),
        Rule::PassThrough => Ok(text.to_string()),
    }
}

fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Leading-integer parse: optional sign then digits, trailing junk ignored
fn normalize_pharmacode(text: &str) -> Result<String, ValidationFailure> {
    let out_of_range = ValidationFailure::OutOfRange {
        min: PHARMACODE_MIN,
        max: PHARMACODE_MAX,
    };

    let matched = LEADING_INTEGER
        .find(text)
        .ok_or(ValidationFailure::NotANumber)?;

    // Too many digits for i64 is still a number, just not one in range
    let value: i64 = matched.as_str().parse().map_err(|_| out_of_range.clone())?;

    if !(PHARMACODE_MIN..=PHARMACODE_MAX).contains(&value) {
        return Err(out_of_range);
    }
    Ok(value.to_string())
}

fn normalize_codabar(text: &str) -> Result<String, ValidationFailure> {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() < 3 {
        return Err(ValidationFailure::CodabarTooShort);
    }

    let start = chars[0].to_ascii_uppercase();
    let stop = chars[chars.len() - 1].to_ascii_uppercase();
    let middle: String = chars[1..chars.len() - 1].iter().collect();

    if !is_codabar_guard(start) {
        return Err(ValidationFailure::CodabarBadStart);
    }
    if !is_codabar_guard(stop) {
        return Err(ValidationFailure::CodabarBadStop);
    }
    if middle.is_empty() {
        return Err(ValidationFailure::CodabarMissingData);
    }
    if !CODABAR_DATA.is_match(&middle) {
        return Err(ValidationFailure::InvalidCharacters {
            label: "Codabar data",
            allowed: "0-9, -, $, :, /, ., +",
        });
    }

    Ok(format!("{}{}{}", start, middle, stop))
}

fn is_codabar_guard(c: char) -> bool {
    matches!(c, 'A'..='D')
}
