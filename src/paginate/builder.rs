//! Page Builder: fills one page from a cursor into the unit sequence.

use crate::config::PrintSettings;
use crate::layout::page_break::{decide_break, BreakDecision};
use crate::layout::LayoutSurface;
use crate::model::{Area, FlowUnit, Page, PageDescriptor, PageKind};
use crate::PrintError;

use super::{printable_area, PageTemplate};

/// Builds pages against one page description.
pub struct PageBuilder<'a, S: LayoutSurface + ?Sized> {
    surface: &'a mut S,
    descriptor: PageDescriptor,
    settings: &'a PrintSettings,
}

impl<'a, S: LayoutSurface + ?Sized> PageBuilder<'a, S> {
    pub fn new(surface: &'a mut S, descriptor: PageDescriptor, settings: &'a PrintSettings) -> Self {
        Self {
            surface,
            descriptor,
            settings,
        }
    }

    fn template(&self, kind: PageKind) -> &PageTemplate {
        match kind {
            PageKind::First => &self.settings.first_page,
            PageKind::Continuation => &self.settings.continuation_page,
        }
    }

    /// The printable area and the part of it left for content on a page of
    /// `kind`.
    pub fn content_area(&self, kind: PageKind) -> Result<(Area, Area), PrintError> {
        let template = self.template(kind);
        if !template.printable_area {
            return Err(PrintError::NoPrintableArea);
        }
        let printable = printable_area(&self.descriptor, self.settings);
        let content = Area {
            width: printable.width,
            height: printable.height - template.furniture_height(),
        };
        if content.width <= 0.0 || content.height <= 0.0 {
            return Err(PrintError::PrintableAreaTooSmall {
                width: content.width,
                height: content.height,
            });
        }
        Ok((printable, content))
    }

    pub fn page_visible(&self, page_number: usize) -> bool {
        self.surface.page_visible(page_number)
    }

    /// Fill page `page_number` with units starting at `cursor`.
    ///
    /// Returns the page and the cursor for the next page. Page 1 uses the
    /// first-page template, every other page the continuation template.
    pub fn build_page(
        &mut self,
        units: &[FlowUnit],
        cursor: usize,
        title: &str,
        page_number: usize,
    ) -> Result<(Page, usize), PrintError> {
        let kind = if page_number == 1 {
            PageKind::First
        } else {
            PageKind::Continuation
        };
        let (printable, content) = self.content_area(kind)?;
        let template = *self.template(kind);

        let remaining = units.get(cursor..).unwrap_or(&[]);

        // Let the surface stack units until one no longer fits
        let mut stacked = Vec::with_capacity(remaining.len());
        self.surface.clear();
        for unit in remaining {
            self.surface
                .add(unit.content(), unit.forced_height(), content.width);
            self.surface.invalidate_and_relayout();
            let height = self.surface.measured_height();
            stacked.push(height);
            if height > content.height {
                break;
            }
        }
        self.surface.clear();

        let (taken, clipped) = match decide_break(content.height, &stacked, remaining.len()) {
            BreakDecision::Place => (remaining.len(), false),
            BreakDecision::Split {
                units_on_current_page,
            } => (units_on_current_page, false),
            BreakDecision::Oversized => (1, true),
        };

        if clipped {
            log::warn!(
                "Unit {} is taller than page {} ({:.1}pt > {:.1}pt) and will be clipped",
                remaining[0].index(),
                page_number,
                stacked[0],
                content.height
            );
        }

        let next_cursor = cursor + taken;
        let page = Page {
            number: page_number,
            kind,
            title: template.title.map(|_| title.to_string()),
            units: remaining[..taken].to_vec(),
            has_overflow: next_cursor < units.len(),
            clipped,
            width: self.descriptor.page_width,
            height: self.descriptor.page_height,
            printable,
            content,
        };

        log::debug!(
            "Built page {} with {} unit(s), overflow: {}",
            page_number,
            taken,
            page.has_overflow
        );

        Ok((page, next_cursor))
    }
}
