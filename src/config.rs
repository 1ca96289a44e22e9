//! Print settings.
//!
//! Every field has a default, so a settings file only needs to name what it
//! changes. The CLI layers its flags on top of whatever the file provides.

use serde::{Deserialize, Serialize};

use crate::model::Document;
use crate::paginate::PageTemplate;
use crate::PrintError;

/// Configuration for one print job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrintSettings {
    /// Title stamped on every page. Falls back to the document title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Fraction of the page width reserved on each side.
    pub horizontal_margin_ratio: f64,

    /// Fraction of the page height reserved on each side.
    pub vertical_margin_ratio: f64,

    /// Template for page 1.
    #[serde(deserialize_with = "crate::paginate::first_page_template")]
    pub first_page: PageTemplate,

    /// Template for page 2 onwards.
    #[serde(deserialize_with = "crate::paginate::continuation_page_template")]
    pub continuation_page: PageTemplate,

    /// Name the print job is submitted under.
    pub job_name: String,
}

impl Default for PrintSettings {
    fn default() -> Self {
        Self {
            title: None,
            horizontal_margin_ratio: 0.05,
            vertical_margin_ratio: 0.025,
            first_page: PageTemplate::first_page(),
            continuation_page: PageTemplate::continuation_page(),
            job_name: "printflow".to_string(),
        }
    }
}

impl PrintSettings {
    /// Parse settings from JSON, then validate them.
    pub fn from_json(json: &str) -> Result<Self, PrintError> {
        let settings: PrintSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Margin ratios must leave some of the page behind.
    pub fn validate(&self) -> Result<(), PrintError> {
        let ratios = [
            ("horizontal", self.horizontal_margin_ratio),
            ("vertical", self.vertical_margin_ratio),
        ];
        for (axis, ratio) in ratios {
            if !(0.0..0.5).contains(&ratio) {
                return Err(PrintError::InvalidSettings(format!(
                    "{axis} margin ratio must be in [0, 0.5), got {ratio}"
                )));
            }
        }
        Ok(())
    }

    /// The title for `document`: the configured one wins.
    pub fn title_for(&self, document: &Document) -> String {
        self.title
            .clone()
            .or_else(|| document.title.clone())
            .unwrap_or_default()
    }
}
