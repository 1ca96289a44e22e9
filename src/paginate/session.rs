//! Pagination Driver.
//!
//! One [`PaginationSession`] per print job. It owns the flattened units,
//! the cursor into them and the pages built so far.

use crate::config::PrintSettings;
use crate::layout::{force_heights, LayoutSurface};
use crate::model::{FlowUnit, Page, PageDescriptor};
use crate::PrintError;

use super::{printable_area, PageBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No pass has run, or the last one failed.
    Idle,
    /// A pass is producing pages.
    Building,
    /// The last pass placed every unit (or the host stopped showing pages).
    Complete,
}

/// Pagination state for one print job.
#[derive(Debug, Clone)]
pub struct PaginationSession {
    units: Vec<FlowUnit>,
    title: String,
    cursor: usize,
    page_count: usize,
    pages: Vec<Page>,
    state: SessionState,
}

impl PaginationSession {
    pub fn new(units: Vec<FlowUnit>, title: impl Into<String>) -> Self {
        Self {
            units,
            title: title.into(),
            cursor: 0,
            page_count: 0,
            pages: Vec::new(),
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// The flattened units this session paginates.
    pub fn units(&self) -> &[FlowUnit] {
        &self.units
    }

    /// Pages from the last successful pass.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Page by 1-based number.
    pub fn page(&self, number: usize) -> Option<&Page> {
        number.checked_sub(1).and_then(|i| self.pages.get(i))
    }

    /// Throw away all pages and start numbering from 1 again.
    pub fn reset(&mut self) {
        self.pages.clear();
        self.cursor = 0;
        self.page_count = 0;
        self.state = SessionState::Idle;
    }

    /// Run a full pagination pass against `descriptor`.
    ///
    /// Any pages from a previous pass are discarded first. On error the
    /// session is left empty and idle; partial output is never exposed.
    pub fn paginate<S: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        descriptor: &PageDescriptor,
        settings: &PrintSettings,
    ) -> Result<&[Page], PrintError> {
        self.reset();
        self.state = SessionState::Building;

        match self.run(surface, descriptor, settings) {
            Ok(()) => {
                self.state = SessionState::Complete;
                log::info!(
                    "Paginated {} unit(s) into {} page(s)",
                    self.units.len(),
                    self.pages.len()
                );
                Ok(&self.pages)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    fn run<S: LayoutSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        descriptor: &PageDescriptor,
        settings: &PrintSettings,
    ) -> Result<(), PrintError> {
        descriptor.validate()?;
        settings.validate()?;

        let width = printable_area(descriptor, settings).width;
        let prepared = force_heights(surface, &self.units, width);

        let mut builder = PageBuilder::new(surface, *descriptor, settings);
        loop {
            let number = self.page_count + 1;
            let (page, next) = builder.build_page(&prepared, self.cursor, &self.title, number)?;
            self.page_count = number;
            self.cursor = next;

            let has_overflow = page.has_overflow;
            self.pages.push(page);

            if !has_overflow {
                break;
            }
            if !builder.page_visible(number) {
                log::info!("Page {number} was hidden by the host, stopping");
                break;
            }
        }
        Ok(())
    }
}
