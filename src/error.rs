//! Structured error types for the pagination engine.
//!
//! Configuration errors abort the current pagination attempt. The print
//! service turns them into status events instead of letting them cross the
//! host print pipeline boundary.

use thiserror::Error;

/// The unified error type returned by all public printflow API functions.
#[derive(Debug, Error)]
pub enum PrintError {
    /// JSON input failed to parse as a document or settings file.
    #[error("Failed to parse input: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    /// A list region has no template to materialise its items with.
    #[error("List region at block {block} has no usable item template")]
    MissingItemTemplate { block: usize },

    /// A list region's item template could not be materialised.
    #[error("Item {item} of list region at block {block} could not be materialised: {message}")]
    Template {
        block: usize,
        item: usize,
        message: String,
    },

    /// A list region's items source did not resolve to an array.
    #[error("List region at block {block} is not bound to a list of items")]
    InvalidItemsSource { block: usize },

    /// The page template exposes no printable area.
    #[error("The page template has no printable area")]
    NoPrintableArea,

    /// Margins and page furniture leave no room for content.
    #[error("Printable area {width:.1} x {height:.1} leaves no room for content")]
    PrintableAreaTooSmall { width: f64, height: f64 },

    #[error("Invalid page description: {0}")]
    InvalidPageDescription(String),

    #[error("Invalid print settings: {0}")]
    InvalidSettings(String),

    /// The print host reports printing is unavailable on this device.
    #[error("Printing is not supported on this device")]
    Unsupported,

    /// Printing was requested before a document was registered.
    #[error("Printing was requested without registering a document first")]
    NotRegistered,

    /// The print host failed to carry out a request.
    #[error("Print host error: {0}")]
    Host(String),

    /// A font could not be loaded or parsed.
    #[error("Font error: {0}")]
    Font(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for PrintError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected schema. Check field names, block types and value types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        PrintError::Parse { source: e, hint }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_hint() {
        let err: PrintError = serde_json::from_str::<serde_json::Value>("{\"a\": 1,}")
            .unwrap_err()
            .into();
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to parse input"));
        assert!(msg.contains("trailing commas"));
    }

    #[test]
    fn configuration_errors_name_the_block() {
        let err = PrintError::MissingItemTemplate { block: 2 };
        assert_eq!(err.to_string(), "List region at block 2 has no usable item template");
    }
}
