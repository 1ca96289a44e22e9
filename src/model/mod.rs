//! # Document Model
//!
//! The input and output representations of the pagination engine.
//!
//! A [`Document`] is an ordered list of block-level nodes. Most blocks are
//! plain content, but a document can also contain **list regions**: a block
//! bound to a collection of data items plus a template that materialises one
//! piece of content per item. The flattener turns all of this into a flat
//! sequence of [`FlowUnit`]s, and the paginator packs those into [`Page`]s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A complete document ready for pagination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Title stamped on every page, unless the print settings override it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Data the list regions bind to (the document's view model).
    #[serde(default)]
    pub data: Value,

    /// The block-level content, in reading order.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Parse a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, crate::PrintError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A block-level node in the document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    /// Plain text. Laid out live, never measured ahead of placement.
    Paragraph {
        content: String,
        #[serde(default)]
        style: TextStyle,
    },

    /// An embedded container of stacked text blocks. Placed as one
    /// indivisible unit whose height is measured and then forced.
    Panel { parts: Vec<TextBlock> },

    /// A list region: one unit per bound item.
    List {
        /// Either an inline JSON array, or an expression such as
        /// `{"$ref": "characters"}` resolving against the document data.
        #[serde(default)]
        items: Value,
        /// Item template. Must evaluate to an array of text blocks.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        template: Option<Value>,
        /// Name the current item is bound to inside the template.
        #[serde(default = "default_binding", rename = "as")]
        binding: String,
    },
}

fn default_binding() -> String {
    "$item".to_string()
}

impl Block {
    /// Create a Paragraph block with the default style.
    pub fn paragraph(content: &str) -> Self {
        Block::Paragraph {
            content: content.to_string(),
            style: TextStyle::default(),
        }
    }

    /// Create a Panel block.
    pub fn panel(parts: Vec<TextBlock>) -> Self {
        Block::Panel { parts }
    }

    /// Create a List block bound to `items`, using the default `$item` binding.
    pub fn list(items: Value, template: Option<Value>) -> Self {
        Block::List {
            items,
            template,
            binding: default_binding(),
        }
    }
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextBlock {
    pub fn new(content: &str, style: TextStyle) -> Self {
        Self {
            content: content.to_string(),
            style,
        }
    }
}

/// Text style properties understood by the layout surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in points.
    #[serde(default = "default_font_size")]
    pub font_size: f64,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,
    /// Extra space below the block, in points.
    #[serde(default)]
    pub space_after: f64,
    #[serde(default)]
    pub bold: bool,
}

fn default_font_size() -> f64 {
    12.0
}

fn default_line_height() -> f64 {
    1.4
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            line_height: default_line_height(),
            space_after: 0.0,
            bold: false,
        }
    }
}

impl TextStyle {
    /// Height of a single line in points.
    pub fn line_advance(&self) -> f64 {
        self.font_size * self.line_height
    }
}

// ── Flow units ──────────────────────────────────────────────────

/// The payload of a flow unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum UnitContent {
    Paragraph(TextBlock),
    Panel { parts: Vec<TextBlock> },
}

impl UnitContent {
    /// Text blocks in stacking order.
    pub fn blocks(&self) -> &[TextBlock] {
        match self {
            UnitContent::Paragraph(block) => std::slice::from_ref(block),
            UnitContent::Panel { parts } => parts,
        }
    }
}

/// An atomic, indivisible piece of content placed on a page.
///
/// Units are immutable: forcing a measured height produces a new unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowUnit {
    index: usize,
    content: UnitContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    forced_height: Option<f64>,
}

impl FlowUnit {
    pub fn new(index: usize, content: UnitContent) -> Self {
        Self {
            index,
            content,
            forced_height: None,
        }
    }

    /// Position of this unit in the flattened sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn content(&self) -> &UnitContent {
        &self.content
    }

    pub fn forced_height(&self) -> Option<f64> {
        self.forced_height
    }

    /// Panels are measured once and laid out at exactly that height, so the
    /// placement pass overflows where the measurement said it would.
    pub fn needs_forced_height(&self) -> bool {
        matches!(self.content, UnitContent::Panel { .. })
    }

    /// A copy of this unit laid out at `height`.
    pub fn with_forced_height(&self, height: f64) -> Self {
        Self {
            index: self.index,
            content: self.content.clone(),
            forced_height: Some(height),
        }
    }
}

// ── Page description ────────────────────────────────────────────

/// Physical page metadata supplied by the print host, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDescriptor {
    pub page_width: f64,
    pub page_height: f64,
    /// Width of the area the printer hardware can actually mark.
    pub imageable_width: f64,
    /// Height of the area the printer hardware can actually mark.
    pub imageable_height: f64,
}

impl PageDescriptor {
    pub fn new(page_width: f64, page_height: f64, imageable_width: f64, imageable_height: f64) -> Self {
        Self {
            page_width,
            page_height,
            imageable_width,
            imageable_height,
        }
    }

    /// Build a descriptor for a standard size whose imageable rectangle is
    /// inset by `hardware_margin` on every side.
    pub fn with_hardware_margin(size: PageSize, hardware_margin: f64) -> Self {
        let (w, h) = size.dimensions();
        Self::new(
            w,
            h,
            (w - 2.0 * hardware_margin).max(0.0),
            (h - 2.0 * hardware_margin).max(0.0),
        )
    }

    /// Reject sizes no printer could report.
    pub fn validate(&self) -> Result<(), crate::PrintError> {
        let dims = [
            ("page width", self.page_width),
            ("page height", self.page_height),
            ("imageable width", self.imageable_width),
            ("imageable height", self.imageable_height),
        ];
        for (name, value) in dims {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::PrintError::InvalidPageDescription(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.page_width == 0.0 || self.page_height == 0.0 {
            return Err(crate::PrintError::InvalidPageDescription(
                "page size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Tabloid => (792.0, 1224.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

// ── Pages ───────────────────────────────────────────────────────

/// A width/height pair in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Area {
    pub width: f64,
    pub height: f64,
}

/// Which template a page was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PageKind {
    First,
    Continuation,
}

/// One printer page: the units that fit, plus the page furniture.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// 1-based page number.
    pub number: usize,
    pub kind: PageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub units: Vec<FlowUnit>,
    /// Whether more units remain after this page.
    pub has_overflow: bool,
    /// Set when a single unit taller than the page was placed anyway.
    pub clipped: bool,
    pub width: f64,
    pub height: f64,
    /// The area inside the margins.
    pub printable: Area,
    /// The part of the printable area left for flow units.
    pub content: Area,
}

impl Page {
    /// The page number as printed in the footer.
    pub fn page_number_label(&self) -> String {
        format!("- {} -", self.number)
    }
}
