//! # Printflow
//!
//! A pagination engine for printing long, data-bound documents.
//!
//! A document is an ordered list of blocks, some of them list regions that
//! stamp out one panel per data item. Printflow flattens all of that into a
//! sequence of atomic flow units and packs them onto printer pages. A unit
//! is never split across a page boundary, and every unit lands on exactly
//! one page, in document order.
//!
//! Text layout belongs to the host. The engine only asks a
//! [`layout::LayoutSurface`] how tall things are, so the same heights drive
//! both measuring and placing. [`layout::FlowSurface`] is a built-in surface
//! for hosts without their own text engine.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [flatten]  Document tree + bound data → ordered flow units
//!       ↓
//!   [layout]   Measure panels on the surface, force their heights
//!       ↓
//!   [paginate] Page Builder fills pages, the driver chains them
//!       ↓
//!   [service]  Host print pipeline: dialog, preview, final pages
//! ```

pub mod config;
pub mod error;
pub mod flatten;
pub mod font;
pub mod layout;
pub mod model;
pub mod paginate;
pub mod sample;
pub mod service;
pub mod status;
pub mod template;
pub mod text;

pub use error::PrintError;

use config::PrintSettings;
use layout::FlowSurface;
use model::{Document, Page, PageDescriptor};
use paginate::PaginationSession;

/// Paginate a document on the built-in surface.
///
/// This is the primary entry point for hosts that don't bring their own
/// layout surface.
pub fn paginate(
    document: &Document,
    descriptor: &PageDescriptor,
    settings: &PrintSettings,
) -> Result<Vec<Page>, PrintError> {
    let units = flatten::flatten(document)?;
    let mut session = PaginationSession::new(units, settings.title_for(document));
    let mut surface = FlowSurface::new();
    let pages = session.paginate(&mut surface, descriptor, settings)?;
    Ok(pages.to_vec())
}

/// Paginate a document described as JSON.
pub fn paginate_json(
    json: &str,
    descriptor: &PageDescriptor,
    settings: &PrintSettings,
) -> Result<Vec<Page>, PrintError> {
    let document = Document::from_json(json)?;
    paginate(&document, descriptor, settings)
}
