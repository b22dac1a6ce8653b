// crates/iec61850-scl/src/error.rs

use alloc::fmt;
use alloc::string::String;
use hex::FromHexError;
use quick_xml::errors::serialize::DeError;

/// Errors that can occur while loading, resolving or emitting an SCL model.
///
/// Problems *inside* a model (an undefined type, a bad value) are not errors;
/// they are collected as [`Issue`](crate::Issue)s so that resolution can carry on.
#[derive(Debug)]
pub enum SclError {
    /// An error from the underlying `quick-xml` deserializer.
    XmlParsing(DeError),

    /// An error occurred while writing to the static-model sink.
    FmtError(fmt::Error),

    /// A `MAC-Address` P element contained invalid hex.
    HexParsing(FromHexError),

    /// A required XML element was missing (e.g., Server).
    MissingElement { element: &'static str },

    /// A required attribute was missing on an element.
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    /// An attribute had a value that could not be interpreted.
    InvalidAttributeFormat {
        attribute: &'static str,
        value: String,
    },

    /// No `<IED>` with the requested name exists in the document.
    IedNotFound { ied: String },

    /// The IED has no `<AccessPoint>` with the requested name.
    AccessPointNotFound { ied: String, access_point: String },

    /// Malformed input with no defined recovery, such as a type graph deeper
    /// than the configured ceiling. Always converted into an ERROR issue at the
    /// enclosing element.
    Structural { object: String, message: String },
}

impl From<DeError> for SclError {
    fn from(e: DeError) -> Self {
        SclError::XmlParsing(e)
    }
}

impl From<fmt::Error> for SclError {
    fn from(e: fmt::Error) -> Self {
        SclError::FmtError(e)
    }
}

impl From<FromHexError> for SclError {
    fn from(e: FromHexError) -> Self {
        SclError::HexParsing(e)
    }
}

impl fmt::Display for SclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SclError::XmlParsing(e) => write!(f, "XML parsing error: {}", e),
            SclError::FmtError(e) => write!(f, "Formatting error: {}", e),
            SclError::HexParsing(e) => write!(f, "Hex parsing error: {}", e),
            SclError::MissingElement { element } => {
                write!(f, "Missing required XML element: {}", element)
            }
            SclError::MissingAttribute { element, attribute } => {
                write!(f, "{} is missing {} attribute", element, attribute)
            }
            SclError::InvalidAttributeFormat { attribute, value } => {
                write!(f, "Invalid format for attribute {}: \"{}\"", attribute, value)
            }
            SclError::IedNotFound { ied } => write!(f, "IED \"{}\" not found", ied),
            SclError::AccessPointNotFound { ied, access_point } => write!(
                f,
                "AccessPoint \"{}\" not found on IED \"{}\"",
                access_point, ied
            ),
            SclError::Structural { object, message } => write!(f, "{}: {}", object, message),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SclError {}

#[cfg(test)]
mod tests {
    use super::SclError;
    use alloc::string::ToString;

    #[test]
    fn test_from_de_error() {
        let xml_err = quick_xml::de::from_str::<()>("<unclosed").unwrap_err();
        let scl_err: SclError = xml_err.into();
        assert!(matches!(scl_err, SclError::XmlParsing(_)));
    }

    #[test]
    fn test_from_fmt_error() {
        let scl_err: SclError = core::fmt::Error.into();
        assert!(matches!(scl_err, SclError::FmtError(_)));
    }

    #[test]
    fn test_from_hex_error() {
        let hex_err = hex::decode("ZZ").unwrap_err();
        let scl_err: SclError = hex_err.into();
        assert!(matches!(scl_err, SclError::HexParsing(_)));
    }

    #[test]
    fn test_display_structural() {
        let err = SclError::Structural {
            object: "IED1LD0/GGIO1.Ind".to_string(),
            message: "type nesting exceeds 64 levels".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "IED1LD0/GGIO1.Ind: type nesting exceeds 64 levels"
        );
    }

    #[test]
    fn test_display_missing_attribute() {
        let err = SclError::MissingAttribute {
            element: "DA",
            attribute: "bType",
        };
        assert_eq!(err.to_string(), "DA is missing bType attribute");
    }
}
