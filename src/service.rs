//! # Print Service
//!
//! The facade a host print pipeline talks to. It owns the layout surface
//! and the current [`PaginationSession`], and reports everything that
//! happens as [`StatusEvent`]s instead of letting errors escape into the
//! host's callbacks.
//!
//! A print job runs in this order:
//!
//! 1. `register` flattens the document and opens a session
//! 2. `print` asks the host to show its print dialog
//! 3. `on_paginate` runs once per page description the host asks for
//! 4. `on_preview_page` and `on_add_pages` serve the frozen page list
//! 5. `on_task_completed` reports the outcome

use crate::config::PrintSettings;
use crate::flatten::flatten;
use crate::layout::LayoutSurface;
use crate::model::{Document, Page, PageDescriptor};
use crate::paginate::{printable_area, PaginationSession};
use crate::status::{LogSink, StatusEvent, StatusSink};
use crate::PrintError;

/// The host print pipeline.
pub trait PrintHost {
    /// Whether this device can print at all.
    fn is_supported(&self) -> bool;

    /// Show the host's print dialog for a job called `job_name`.
    fn show_print_ui(&mut self, job_name: &str) -> Result<(), String>;
}

/// How the host reports the end of a print task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskCompletion {
    Submitted,
    Canceled,
    Failed,
    Abandoned,
}

pub struct PrintService<S: LayoutSurface, H: PrintHost> {
    surface: S,
    host: H,
    settings: PrintSettings,
    session: Option<PaginationSession>,
    sink: Box<dyn StatusSink>,
}

impl<S: LayoutSurface, H: PrintHost> PrintService<S, H> {
    /// A service that reports status through the `log` facade.
    pub fn new(surface: S, host: H, settings: PrintSettings) -> Self {
        Self {
            surface,
            host,
            settings,
            session: None,
            sink: Box::new(LogSink),
        }
    }

    /// Send status events to `sink` instead of the log.
    pub fn with_sink(mut self, sink: impl StatusSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn settings(&self) -> &PrintSettings {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn session(&self) -> Option<&PaginationSession> {
        self.session.as_ref()
    }

    pub fn is_registered(&self) -> bool {
        self.session.is_some()
    }

    fn emit(&mut self, event: StatusEvent) {
        self.sink.status(&event);
    }

    fn fail(&mut self, error: PrintError) -> PrintError {
        self.emit(StatusEvent::error(error.to_string()));
        error
    }

    /// Prepare `document` for printing.
    ///
    /// Any previous job is torn down first, so there is only ever one
    /// session per service.
    pub fn register(&mut self, document: &Document) -> Result<(), PrintError> {
        if !self.host.is_supported() {
            return Err(self.fail(PrintError::Unsupported));
        }

        self.unregister();

        let units = match flatten(document) {
            Ok(units) => units,
            Err(e) => return Err(self.fail(e)),
        };
        let title = self.settings.title_for(document);
        log::debug!("Registering \"{}\" with {} unit(s)", title, units.len());
        self.session = Some(PaginationSession::new(units, title));

        self.emit(StatusEvent::info("Registered successfully."));
        Ok(())
    }

    /// Drop the current job, if any.
    pub fn unregister(&mut self) {
        if self.session.take().is_some() {
            self.surface.clear();
            log::debug!("Unregistered print job");
        }
    }

    /// Ask the host to open its print dialog.
    pub fn print(&mut self) -> Result<(), PrintError> {
        self.emit(StatusEvent::info("Opening Print Dialog."));

        if !self.is_registered() {
            self.emit(StatusEvent::error(
                "Attempt to open Print Dialog without registering first.",
            ));
            return Err(PrintError::NotRegistered);
        }

        match self.host.show_print_ui(&self.settings.job_name) {
            Ok(()) => {
                self.emit(StatusEvent::info("Print Dialog opened."));
                Ok(())
            }
            Err(message) => Err(self.fail(PrintError::Host(message))),
        }
    }

    pub fn on_dialog_closed(&mut self) {
        self.emit(StatusEvent::info("Print Dialog closed."));
    }

    /// Paginate the registered document for `descriptor`.
    ///
    /// Returns the page count. Any failure is reported as an error status
    /// and yields 0 pages.
    pub fn on_paginate(&mut self, descriptor: &PageDescriptor) -> usize {
        let Some(session) = self.session.as_mut() else {
            let error = PrintError::NotRegistered;
            self.emit(StatusEvent::error(error.to_string()));
            return 0;
        };

        let area = printable_area(descriptor, &self.settings);
        let result = session
            .paginate(&mut self.surface, descriptor, &self.settings)
            .map(|pages| (pages.len(), pages.iter().filter(|p| p.clipped).count()));

        self.emit(StatusEvent::info(format!(
            "Printable area is {:.1} x {:.1} on a {:.1} x {:.1} page.",
            area.width, area.height, descriptor.page_width, descriptor.page_height
        )));

        match result {
            Ok((count, clipped)) => {
                if clipped > 0 {
                    self.emit(StatusEvent::warning(format!(
                        "{clipped} page(s) hold content taller than the page and will be clipped."
                    )));
                }
                count
            }
            Err(e) => {
                self.emit(StatusEvent::error(e.to_string()));
                0
            }
        }
    }

    /// Preview page `number` (1-based).
    pub fn on_preview_page(&self, number: usize) -> Option<&Page> {
        self.session.as_ref().and_then(|s| s.page(number))
    }

    /// Every page, in order, for the final print.
    pub fn on_add_pages(&self) -> &[Page] {
        self.session.as_ref().map_or(&[], |s| s.pages())
    }

    pub fn on_task_completed(&mut self, completion: TaskCompletion) {
        let event = match completion {
            TaskCompletion::Failed => StatusEvent::error("Sorry, failed to print."),
            TaskCompletion::Submitted => StatusEvent::info("Print job submitted."),
            TaskCompletion::Canceled => StatusEvent::info("Print job canceled."),
            TaskCompletion::Abandoned => StatusEvent::info("Print job abandoned."),
        };
        self.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FlowSurface;
    use crate::model::Block;
    use crate::status::Severity;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct TestHost {
        supported: bool,
        fail_ui: bool,
        jobs: Vec<String>,
    }

    impl PrintHost for TestHost {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn show_print_ui(&mut self, job_name: &str) -> Result<(), String> {
            if self.fail_ui {
                return Err("no printers installed".to_string());
            }
            self.jobs.push(job_name.to_string());
            Ok(())
        }
    }

    fn host() -> TestHost {
        TestHost {
            supported: true,
            fail_ui: false,
            jobs: Vec::new(),
        }
    }

    type Events = Rc<RefCell<Vec<StatusEvent>>>;

    fn service(host: TestHost) -> (PrintService<FlowSurface, TestHost>, Events) {
        let events: Events = Rc::default();
        let sink = {
            let events = Rc::clone(&events);
            move |e: &StatusEvent| events.borrow_mut().push(e.clone())
        };
        let svc = PrintService::new(FlowSurface::new(), host, PrintSettings::default()).with_sink(sink);
        (svc, events)
    }

    fn document() -> Document {
        Document {
            title: Some("Stock characters".to_string()),
            data: json!(null),
            blocks: vec![Block::paragraph("Arlecchino"), Block::paragraph("Pantalone")],
        }
    }

    fn letter() -> PageDescriptor {
        PageDescriptor::new(612.0, 792.0, 576.0, 756.0)
    }

    #[test]
    fn register_then_paginate() {
        let (mut svc, events) = service(host());
        svc.register(&document()).unwrap();
        assert_eq!(events.borrow()[0], StatusEvent::info("Registered successfully."));

        assert_eq!(svc.on_paginate(&letter()), 1);
        let page = svc.on_preview_page(1).unwrap();
        assert_eq!(page.title.as_deref(), Some("Stock characters"));
        assert_eq!(svc.on_add_pages().len(), 1);
        assert!(svc.on_preview_page(2).is_none());
    }

    #[test]
    fn unsupported_device_stops_registration() {
        let (mut svc, events) = service(TestHost {
            supported: false,
            ..host()
        });
        let err = svc.register(&document()).unwrap_err();
        assert!(matches!(err, PrintError::Unsupported));
        assert!(!svc.is_registered());
        assert_eq!(events.borrow()[0].severity, Severity::Error);
    }

    #[test]
    fn print_without_registering_is_reported() {
        let (mut svc, events) = service(host());
        assert!(matches!(svc.print(), Err(PrintError::NotRegistered)));
        let events = events.borrow();
        assert_eq!(events[0], StatusEvent::info("Opening Print Dialog."));
        assert_eq!(
            events[1],
            StatusEvent::error("Attempt to open Print Dialog without registering first.")
        );
        assert!(svc.host().jobs.is_empty());
    }

    #[test]
    fn print_opens_dialog() {
        let (mut svc, events) = service(host());
        svc.register(&document()).unwrap();
        svc.print().unwrap();
        assert_eq!(svc.host().jobs, vec!["printflow".to_string()]);
        assert_eq!(
            events.borrow().last(),
            Some(&StatusEvent::info("Print Dialog opened."))
        );
    }

    #[test]
    fn dialog_receives_configured_job_name() {
        let settings = PrintSettings {
            job_name: "Scenari, act two".to_string(),
            ..Default::default()
        };
        let mut svc =
            PrintService::new(FlowSurface::new(), host(), settings).with_sink(|_: &StatusEvent| {});
        svc.register(&document()).unwrap();
        svc.print().unwrap();
        assert_eq!(svc.host().jobs, vec!["Scenari, act two".to_string()]);
    }

    #[test]
    fn host_failure_is_an_error_status() {
        let (mut svc, events) = service(TestHost {
            fail_ui: true,
            ..host()
        });
        svc.register(&document()).unwrap();
        assert!(matches!(svc.print(), Err(PrintError::Host(_))));
        assert_eq!(events.borrow().last().map(|e| e.severity), Some(Severity::Error));
    }

    #[test]
    fn flatten_failure_is_reported_and_nothing_registered() {
        let (mut svc, events) = service(host());
        let doc = Document {
            title: None,
            data: json!(null),
            blocks: vec![Block::list(json!([1]), None)],
        };
        assert!(svc.register(&doc).is_err());
        assert!(!svc.is_registered());
        assert_eq!(events.borrow()[0].severity, Severity::Error);
    }

    #[test]
    fn pagination_failure_yields_zero_pages() {
        let (mut svc, events) = service(host());
        svc.register(&document()).unwrap();
        assert_eq!(svc.on_paginate(&letter()), 1);

        // 40pt tall page: the 54pt of furniture leaves no room
        let tiny = PageDescriptor::new(612.0, 40.0, 612.0, 40.0);
        assert_eq!(svc.on_paginate(&tiny), 0);
        assert!(svc.on_add_pages().is_empty());
        assert_eq!(events.borrow().last().map(|e| e.severity), Some(Severity::Error));
    }

    #[test]
    fn paginate_before_register_yields_zero() {
        let (mut svc, events) = service(host());
        assert_eq!(svc.on_paginate(&letter()), 0);
        assert_eq!(events.borrow()[0].severity, Severity::Error);
    }

    #[test]
    fn re_registering_replaces_session() {
        let (mut svc, _) = service(host());
        svc.register(&document()).unwrap();
        svc.on_paginate(&letter());
        svc.register(&document()).unwrap();
        assert!(svc.on_add_pages().is_empty());
        svc.unregister();
        assert!(!svc.is_registered());
    }

    #[test]
    fn task_failure_is_an_error() {
        let (mut svc, events) = service(host());
        svc.on_task_completed(TaskCompletion::Failed);
        svc.on_task_completed(TaskCompletion::Submitted);
        let events = events.borrow();
        assert_eq!(events[0], StatusEvent::error("Sorry, failed to print."));
        assert_eq!(events[1].severity, Severity::Informational);
    }
}
