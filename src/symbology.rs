/// Barcode symbologies known to the popup
use serde::{Deserialize, Serialize};
use std::fmt;

/// A barcode format, identified on the wire by its renderer id ("ean13", "qrcode", ...).
///
/// Ids the popup has no rules for are kept as `Other` and passed through
/// unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Symbology {
    Ean13,
    Ean8,
    UpcA,
    UpcE,
    Code39,
    Code93,
    Code11,
    Code128,
    Interleaved2of5,
    Msi,
    Pharmacode,
    RationalizedCodabar,
    QrCode,
    DataMatrix,
    Pdf417,
    AztecCode,
    MaxiCode,
    DotCode,
    Other(String),
}

impl Symbology {
    /// Every symbology offered in the selector, in display order
    pub const KNOWN: [Symbology; 18] = [
        Symbology::QrCode,
        Symbology::Code128,
        Symbology::Ean13,
        Symbology::Ean8,
        Symbology::UpcA,
        Symbology::UpcE,
        Symbology::Code39,
        Symbology::Code93,
        Symbology::Code11,
        Symbology::Interleaved2of5,
        Symbology::Msi,
        Symbology::Pharmacode,
        Symbology::RationalizedCodabar,
        Symbology::DataMatrix,
        Symbology::Pdf417,
        Symbology::AztecCode,
        Symbology::MaxiCode,
        Symbology::DotCode,
    ];

    pub fn from_bcid(id: &str) -> Symbology {
        match id {
            "ean13" => Symbology::Ean13,
            "ean8" => Symbology::Ean8,
            "upca" => Symbology::UpcA,
            "upce" => Symbology::UpcE,
            "code39" => Symbology::Code39,
            "code93" => Symbology::Code93,
            "code11" => Symbology::Code11,
            "code128" => Symbology::Code128,
            "interleaved2of5" => Symbology::Interleaved2of5,
            "msi" => Symbology::Msi,
            "pharmacode" => Symbology::Pharmacode,
            "rationalizedCodabar" => Symbology::RationalizedCodabar,
            "qrcode" => Symbology::QrCode,
            "datamatrix" => Symbology::DataMatrix,
            "pdf417" => Symbology::Pdf417,
            "azteccode" => Symbology::AztecCode,
            "maxicode" => Symbology::MaxiCode,
            "dotcode" => Symbology::DotCode,
            other => Symbology::Other(other.to_string()),
        }
    }

    /// Identifier understood by the rendering library
    pub fn bcid(&self) -> &str {
        match self {
            Symbology::Ean13 => "ean13",
            Symbology::Ean8 => "ean8",
            Symbology::UpcA => "upca",
            Symbology::UpcE => "upce",
            Symbology::Code39 => "code39",
            Symbology::Code93 => "code93",
            Symbology::Code11 => "code11",
            Symbology::Code128 => "code128",
            Symbology::Interleaved2of5 => "interleaved2of5",
            Symbology::Msi => "msi",
            Symbology::Pharmacode => "pharmacode",
            Symbology::RationalizedCodabar => "rationalizedCodabar",
            Symbology::QrCode => "qrcode",
            Symbology::DataMatrix => "datamatrix",
            Symbology::Pdf417 => "pdf417",
            Symbology::AztecCode => "azteccode",
            Symbology::MaxiCode => "maxicode",
            Symbology::DotCode => "dotcode",
            Symbology::Other(id) => id,
        }
    }

    /// 2D matrix codes, which hold arbitrary text
    pub fn is_matrix(&self) -> bool {
        matches!(
            self,
            Symbology::QrCode
                | Symbology::DataMatrix
                | Symbology::Pdf417
                | Symbology::AztecCode
                | Symbology::MaxiCode
                | Symbology::DotCode
        )
    }

    /// Whether switching to this symbology should prefill the active tab URL
    pub fn prefers_tab_url(&self) -> bool {
        matches!(self, Symbology::QrCode)
    }

    /// Human label derived from the id: "rationalizedCodabar" -> "Rationalized Codabar"
    pub fn display_name(&self) -> String {
        let mut chars = self.bcid().chars();
        let Some(first) = chars.next() else {
            return String::new();
        };

        let mut name: String = first.to_uppercase().collect();
        for c in chars {
            if c.is_ascii_uppercase() {
                name.push(' ');
            }
            name.push(c);
        }
        name
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Symbology::Ean13 => "Enter 12-13 digits (e.g., 123456789012)",
            Symbology::Ean8 => "Enter 7-8 digits (e.g., 1234567)",
            Symbology::UpcA => "Enter 11-12 digits (e.g., 01234567890)",
            Symbology::UpcE => "Enter 6-8 digits (e.g., 012345)",
            Symbology::Code39 => "Enter text (A-Z, 0-9, - . $ / + % SPACE)",
            Symbology::Code93 => "Enter text (ASCII characters)",
            Symbology::Code11 => "Enter digits and dash (e.g., 12345)",
            Symbology::Interleaved2of5 => "Enter even number of digits (e.g., 123456)",
            Symbology::Msi => "Enter numeric digits (e.g., 123456)",
            Symbology::Pharmacode => "Enter number between 3-131070 (e.g., 12345)",
            Symbology::RationalizedCodabar => {
                "Enter: StartChar(A-D) + Data + StopChar(A-D) (e.g., A1234B)"
            }
            _ => "Enter text or click \"Use Current URL\"",
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        let hint = match self {
            Symbology::Ean13 => {
                "EAN13 requires exactly 12 or 13 numeric digits. Check digit is auto-calculated if 12 digits provided."
            }
            Symbology::Ean8 => {
                "EAN-8 requires exactly 7 or 8 numeric digits. Check digit is auto-calculated if 7 digits provided."
            }
            Symbology::UpcA => {
                "UPC-A requires exactly 11 or 12 numeric digits. Check digit is auto-calculated if 11 digits provided."
            }
            Symbology::UpcE => {
                "UPC-E requires 6, 7, or 8 numeric digits. Check digit is auto-calculated if 6 or 7 digits provided."
            }
            Symbology::Code39 => {
                "Code39 supports uppercase letters (A-Z), digits (0-9), and special characters: - . $ / + % SPACE"
            }
            Symbology::Code93 => {
                "Code93 supports ASCII characters and provides higher density than Code39."
            }
            Symbology::Code11 => "Code11 supports numeric digits (0-9) and dash (-) character only.",
            Symbology::Interleaved2of5 => {
                "ITF requires an even number of numeric digits. Data is encoded in pairs."
            }
            Symbology::Msi => "MSI supports numeric digits only (0-9).",
            Symbology::Pharmacode => "Pharmacode accepts numeric values between 3 and 131070.",
            Symbology::RationalizedCodabar => {
                "Codabar requires start/stop characters (A, B, C, or D) and data with characters: 0-9, -, $, :, /, ., +"
            }
            Symbology::QrCode => "QR Code can encode any text, URLs, or data.",
            _ => return None,
        };
        Some(hint)
    }
}

impl Default for Symbology {
    fn default() -> Self {
        Symbology::QrCode
    }
}

impl From<String> for Symbology {
    fn from(id: String) -> Self {
        Symbology::from_bcid(&id)
    }
}

impl From<Symbology> for String {
    fn from(symbology: Symbology) -> Self {
        symbology.bcid().to_string()
    }
}

impl fmt::Display for Symbology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bcid())
    }
}
