//! Integration tests for the printflow pipeline.
//!
//! These tests exercise the full path from document to pages.
//! They verify:
//! - Every flow unit lands on exactly one page, in document order
//! - Page numbering, titles and overflow flags are consistent
//! - Panels are never split and never overfill a page
//! - A host hiding a page ends pagination early
//! - The print service reports through its status channel

use std::cell::RefCell;
use std::rc::Rc;

use printflow::config::PrintSettings;
use printflow::flatten::flatten;
use printflow::layout::{FlowSurface, LayoutSurface};
use printflow::model::*;
use printflow::paginate::{PaginationSession, SessionState};
use printflow::sample;
use printflow::service::{PrintHost, PrintService, TaskCompletion};
use printflow::status::{Severity, StatusEvent};
use printflow::PrintError;
use serde_json::json;

// ─── Helpers ────────────────────────────────────────────────────

fn catalogue() -> Document {
    serde_json::from_value(sample::catalogue()).unwrap()
}

fn numbered_paragraphs(n: usize) -> Document {
    Document {
        title: Some("Scenari".to_string()),
        data: json!(null),
        blocks: (0..n)
            .map(|i| Block::paragraph(&format!("Scenario number {i}")))
            .collect(),
    }
}

fn character_list(n: usize) -> Document {
    let items: Vec<_> = (0..n)
        .map(|i| json!({ "name": format!("Zanni {i}"), "note": "Always hungry, never paid, forever scheming for his next meal." }))
        .collect();
    Document {
        title: None,
        data: json!({ "cast": items }),
        blocks: vec![Block::list(
            json!({ "$ref": "cast" }),
            Some(json!([
                { "content": { "$ref": "$item.name" }, "style": { "bold": true } },
                { "content": { "$ref": "$item.note" }, "style": { "spaceAfter": 6 } }
            ])),
        )],
    }
}

fn small_page() -> PageDescriptor {
    PageDescriptor::new(300.0, 400.0, 300.0, 400.0)
}

fn paginate(doc: &Document, desc: &PageDescriptor) -> Vec<Page> {
    printflow::paginate(doc, desc, &PrintSettings::default()).unwrap()
}

fn placed_indices(pages: &[Page]) -> Vec<usize> {
    pages
        .iter()
        .flat_map(|p| p.units.iter().map(|u| u.index()))
        .collect()
}

/// A surface that hides every page from `hidden_from` on.
struct HidingSurface {
    inner: FlowSurface,
    hidden_from: usize,
}

impl LayoutSurface for HidingSurface {
    fn clear(&mut self) {
        self.inner.clear();
    }

    fn add(&mut self, content: &UnitContent, forced_height: Option<f64>, available_width: f64) {
        self.inner.add(content, forced_height, available_width);
    }

    fn invalidate_and_relayout(&mut self) {
        self.inner.invalidate_and_relayout();
    }

    fn measured_height(&self) -> f64 {
        self.inner.measured_height()
    }

    fn page_visible(&self, page_number: usize) -> bool {
        page_number < self.hidden_from
    }
}

struct AlwaysHost;

impl PrintHost for AlwaysHost {
    fn is_supported(&self) -> bool {
        true
    }

    fn show_print_ui(&mut self, _job_name: &str) -> Result<(), String> {
        Ok(())
    }
}

// ─── Order and Completeness ─────────────────────────────────────

#[test]
fn test_units_placed_in_document_order() {
    let doc = numbered_paragraphs(80);
    let pages = paginate(&doc, &small_page());
    assert!(pages.len() > 1, "80 paragraphs should need several pages");

    let expected: Vec<usize> = flatten(&doc).unwrap().iter().map(|u| u.index()).collect();
    assert_eq!(placed_indices(&pages), expected);
}

#[test]
fn test_every_unit_placed_exactly_once() {
    let doc = character_list(25);
    let pages = paginate(&doc, &small_page());
    let mut seen = placed_indices(&pages);
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), 25);
    assert_eq!(placed_indices(&pages).len(), 25);
}

#[test]
fn test_placed_content_matches_flattened_content() {
    let doc = catalogue();
    let flat = flatten(&doc).unwrap();
    let pages = paginate(&doc, &small_page());
    let placed: Vec<&UnitContent> = pages
        .iter()
        .flat_map(|p| p.units.iter().map(|u| u.content()))
        .collect();
    let original: Vec<&UnitContent> = flat.iter().map(|u| u.content()).collect();
    assert_eq!(placed, original);
}

// ─── Page Structure ─────────────────────────────────────────────

#[test]
fn test_page_numbers_are_sequential() {
    let pages = paginate(&numbered_paragraphs(80), &small_page());
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.number, i + 1);
        assert_eq!(page.page_number_label(), format!("- {} -", i + 1));
    }
}

#[test]
fn test_only_last_page_has_no_overflow() {
    let pages = paginate(&numbered_paragraphs(80), &small_page());
    let (last, rest) = pages.split_last().unwrap();
    assert!(rest.iter().all(|p| p.has_overflow));
    assert!(!last.has_overflow);
}

#[test]
fn test_first_page_uses_its_own_template() {
    let pages = paginate(&numbered_paragraphs(80), &small_page());
    assert_eq!(pages[0].kind, PageKind::First);
    assert!(pages[1..].iter().all(|p| p.kind == PageKind::Continuation));
    // The first-page title block is taller
    assert!(pages[0].content.height < pages[1].content.height);
    assert!(pages.iter().all(|p| p.title.as_deref() == Some("Scenari")));
}

#[test]
fn test_panels_never_overfill_a_page() {
    let pages = paginate(&character_list(30), &small_page());
    for page in &pages {
        let used: f64 = page.units.iter().filter_map(|u| u.forced_height()).sum();
        assert!(
            page.clipped || used <= page.content.height + 1e-6,
            "page {} uses {used} of {}",
            page.number,
            page.content.height
        );
    }
}

#[test]
fn test_empty_document_prints_one_blank_page() {
    let doc = Document::default();
    let pages = paginate(&doc, &small_page());
    assert_eq!(pages.len(), 1);
    assert!(pages[0].units.is_empty());
    assert!(!pages[0].has_overflow);
}

#[test]
fn test_tall_panel_is_clipped_not_dropped() {
    let long_text = "Lazzo ".repeat(2000);
    let doc = Document {
        title: None,
        data: json!(null),
        blocks: vec![
            Block::panel(vec![TextBlock::new(&long_text, TextStyle::default())]),
            Block::paragraph("after"),
        ],
    };
    let pages = paginate(&doc, &small_page());
    assert!(pages[0].clipped);
    assert_eq!(pages[0].units.len(), 1);
    assert_eq!(placed_indices(&pages), vec![0, 1]);
}

#[test]
fn test_hardware_margin_shrinks_printable_area() {
    let doc = numbered_paragraphs(3);
    let loose = paginate(&doc, &PageDescriptor::with_hardware_margin(PageSize::Letter, 0.0));
    let tight = paginate(&doc, &PageDescriptor::with_hardware_margin(PageSize::Letter, 72.0));
    assert!(tight[0].printable.width < loose[0].printable.width);
    assert!((tight[0].printable.width - (612.0 - 144.0)).abs() < 1e-9);
}

// ─── Sessions ───────────────────────────────────────────────────

#[test]
fn test_hidden_page_stops_pagination() {
    let doc = numbered_paragraphs(80);
    let units = flatten(&doc).unwrap();
    let mut session = PaginationSession::new(units, "Scenari");
    let mut surface = HidingSurface {
        inner: FlowSurface::new(),
        hidden_from: 2,
    };
    let pages = session
        .paginate(&mut surface, &small_page(), &PrintSettings::default())
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages[1].has_overflow);
    assert_eq!(session.state(), SessionState::Complete);
}

#[test]
fn test_repagination_replaces_pages() {
    let doc = numbered_paragraphs(80);
    let mut session = PaginationSession::new(flatten(&doc).unwrap(), "Scenari");
    let mut surface = FlowSurface::new();
    let settings = PrintSettings::default();

    let small = session.paginate(&mut surface, &small_page(), &settings).unwrap().len();
    let large_desc = PageDescriptor::with_hardware_margin(PageSize::Tabloid, 18.0);
    let large = session.paginate(&mut surface, &large_desc, &settings).unwrap().len();

    assert!(large < small);
    assert_eq!(session.pages().len(), large);
    assert_eq!(session.pages()[0].number, 1);
}

// ─── Print Service ──────────────────────────────────────────────

#[test]
fn test_service_reports_full_print_job() {
    let events: Rc<RefCell<Vec<StatusEvent>>> = Rc::default();
    let sink = {
        let events = Rc::clone(&events);
        move |e: &StatusEvent| events.borrow_mut().push(e.clone())
    };
    let mut service =
        PrintService::new(FlowSurface::new(), AlwaysHost, PrintSettings::default()).with_sink(sink);

    service.register(&catalogue()).unwrap();
    service.print().unwrap();
    let count = service.on_paginate(&PageDescriptor::with_hardware_margin(PageSize::A4, 18.0));
    assert!(count >= 1);
    assert_eq!(service.on_add_pages().len(), count);
    assert_eq!(
        service.on_preview_page(1).and_then(|p| p.title.clone()),
        Some("Commedia dell'arte".to_string())
    );
    service.on_task_completed(TaskCompletion::Submitted);

    let messages: Vec<String> = events.borrow().iter().map(|e| e.message.clone()).collect();
    assert_eq!(messages[0], "Registered successfully.");
    assert_eq!(messages[1], "Opening Print Dialog.");
    assert_eq!(messages[2], "Print Dialog opened.");
    assert!(messages[3].starts_with("Printable area"));
    assert!(events.borrow().iter().all(|e| e.severity < Severity::Error));
}

#[test]
fn test_settings_title_overrides_document_title() {
    let settings = PrintSettings::from_json(r#"{ "title": "Lazzi" }"#).unwrap();
    let pages = printflow::paginate(&numbered_paragraphs(2), &small_page(), &settings).unwrap();
    assert_eq!(pages[0].title.as_deref(), Some("Lazzi"));
}

// ─── JSON Input ─────────────────────────────────────────────────

#[test]
fn test_sample_catalogue_paginates_from_json() {
    let json = serde_json::to_string(&sample::catalogue()).unwrap();
    let pages = printflow::paginate_json(&json, &small_page(), &PrintSettings::default()).unwrap();
    // 2 headings, 3 types, 8 characters
    assert_eq!(placed_indices(&pages).len(), 13);
}

#[test]
fn test_malformed_json_has_hint() {
    let err = printflow::paginate_json("{ \"blocks\": [ }", &small_page(), &PrintSettings::default())
        .unwrap_err();
    assert!(matches!(err, PrintError::Parse { .. }));
    assert!(err.to_string().contains("Hint"));
}

#[test]
fn test_list_without_template_is_rejected() {
    let json = r#"{ "blocks": [ { "type": "List", "items": [1, 2, 3] } ] }"#;
    let err = printflow::paginate_json(json, &small_page(), &PrintSettings::default()).unwrap_err();
    assert!(matches!(err, PrintError::MissingItemTemplate { block: 0 }));
}
