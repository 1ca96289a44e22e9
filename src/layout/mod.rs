//! # Measurement
//!
//! The pagination core never lays text out itself. It borrows a host
//! [`LayoutSurface`], a single scratch area that is cleared, filled,
//! re-laid-out and read back. Measuring a block and placing blocks on a page
//! both go through the same surface, so both passes agree on heights.
//!
//! Panels are measured once up front and then placed with that height
//! forced. Without the forced height the placement pass could wrap a
//! panel slightly differently than the measurement pass did, and the page
//! would overflow somewhere the paginator didn't expect.

pub mod page_break;
pub mod surface;

pub use surface::FlowSurface;

use crate::model::{FlowUnit, UnitContent};

/// The host layout capability the paginator drives.
///
/// Layout is synchronous: when `invalidate_and_relayout` returns,
/// `measured_height` reflects everything added since the last `clear`.
pub trait LayoutSurface {
    /// Remove all content.
    fn clear(&mut self);

    /// Append content below whatever is already on the surface, laid out
    /// at `available_width`. With a forced height the content occupies
    /// exactly that much space regardless of its natural height.
    fn add(&mut self, content: &UnitContent, forced_height: Option<f64>, available_width: f64);

    /// Run a layout pass over the current content.
    fn invalidate_and_relayout(&mut self);

    /// Total stacked height from the last layout pass.
    fn measured_height(&self) -> f64;

    /// Whether the host still shows page `page_number`. A host may hide a
    /// page mid-layout, which ends pagination early.
    fn page_visible(&self, _page_number: usize) -> bool {
        true
    }
}

/// Natural height of `content` at `available_width`.
///
/// Runs a full layout pass on the cleared surface and clears it again
/// afterwards; nothing survives the call.
pub fn measure<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    content: &UnitContent,
    available_width: f64,
) -> f64 {
    surface.clear();
    surface.add(content, None, available_width);
    surface.invalidate_and_relayout();
    let height = surface.measured_height();
    surface.clear();
    height
}

/// Measure every unit that needs a forced height and return the sequence
/// with those heights applied. Order and indices are unchanged.
pub fn force_heights<S: LayoutSurface + ?Sized>(
    surface: &mut S,
    units: &[FlowUnit],
    available_width: f64,
) -> Vec<FlowUnit> {
    units
        .iter()
        .map(|unit| {
            if unit.needs_forced_height() {
                let height = measure(surface, unit.content(), available_width);
                unit.with_forced_height(height)
            } else {
                unit.clone()
            }
        })
        .collect()
}
