//! # Pagination
//!
//! Splits a flattened unit sequence into printer pages.
//!
//! 1. Resolve the printable area: page size minus the larger of the
//!    configured margins and the printer's hardware margins, per axis
//! 2. Measure every panel at the printable width and force its height
//! 3. Build page 1 from the first-page template, placing whole units until
//!    the next one would overflow
//! 4. While the last page overflowed (and the host still shows it), build a
//!    continuation page starting where the previous one stopped
//!
//! Pages come out strictly in order, numbered from 1, and a new pass throws
//! the previous page list away wholesale.

mod builder;
mod session;

pub use builder::PageBuilder;
pub use session::{PaginationSession, SessionState};

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::PrintSettings;
use crate::model::{Area, PageDescriptor};

/// Total margin on each axis (both sides together), in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub width: f64,
    pub height: f64,
}

/// Margins for `descriptor`: the configured ratio, unless the printer's
/// imageable rectangle demands more.
pub fn compute_margins(
    descriptor: &PageDescriptor,
    horizontal_ratio: f64,
    vertical_ratio: f64,
) -> Margins {
    let width = f64::max(
        descriptor.page_width - descriptor.imageable_width,
        descriptor.page_width * horizontal_ratio * 2.0,
    );
    let height = f64::max(
        descriptor.page_height - descriptor.imageable_height,
        descriptor.page_height * vertical_ratio * 2.0,
    );
    Margins { width, height }
}

/// The area inside the margins.
pub fn printable_area(descriptor: &PageDescriptor, settings: &PrintSettings) -> Area {
    let margins = compute_margins(
        descriptor,
        settings.horizontal_margin_ratio,
        settings.vertical_margin_ratio,
    );
    Area {
        width: descriptor.page_width - margins.width,
        height: descriptor.page_height - margins.height,
    }
}

/// Fixed-height furniture on a page template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub height: f64,
}

/// The named regions of a page, resolved when the template is built.
///
/// Settings files describe a template as overrides on the built-in first
/// or continuation template, so it is only deserialized through
/// [`first_page_template`] and [`continuation_page_template`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTemplate {
    /// Whether the template has a region content can flow into.
    pub printable_area: bool,
    /// Header slot receiving the job title.
    pub title: Option<Slot>,
    /// Footer slot receiving the `- n -` page number.
    pub page_number: Option<Slot>,
}

impl PageTemplate {
    /// Page 1 opens with a larger title block.
    pub fn first_page() -> Self {
        Self {
            printable_area: true,
            title: Some(Slot { height: 36.0 }),
            page_number: Some(Slot { height: 18.0 }),
        }
    }

    pub fn continuation_page() -> Self {
        Self {
            printable_area: true,
            title: Some(Slot { height: 20.0 }),
            page_number: Some(Slot { height: 18.0 }),
        }
    }

    /// Height taken by the title and page-number slots.
    pub fn furniture_height(&self) -> f64 {
        self.title.map_or(0.0, |s| s.height) + self.page_number.map_or(0.0, |s| s.height)
    }
}

/// A template as written in a settings file. Missing fields keep the base
/// template's value; an explicit `null` slot removes the slot.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TemplateOverrides {
    printable_area: Option<bool>,
    #[serde(deserialize_with = "present_slot")]
    title: Option<Option<Slot>>,
    #[serde(deserialize_with = "present_slot")]
    page_number: Option<Option<Slot>>,
}

fn present_slot<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Option<Slot>>, D::Error> {
    Option::<Slot>::deserialize(d).map(Some)
}

impl TemplateOverrides {
    fn apply(self, base: PageTemplate) -> PageTemplate {
        PageTemplate {
            printable_area: self.printable_area.unwrap_or(base.printable_area),
            title: self.title.unwrap_or(base.title),
            page_number: self.page_number.unwrap_or(base.page_number),
        }
    }
}

pub(crate) fn first_page_template<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<PageTemplate, D::Error> {
    TemplateOverrides::deserialize(d).map(|o| o.apply(PageTemplate::first_page()))
}

pub(crate) fn continuation_page_template<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<PageTemplate, D::Error> {
    TemplateOverrides::deserialize(d).map(|o| o.apply(PageTemplate::continuation_page()))
}
