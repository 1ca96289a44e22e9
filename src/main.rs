use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use printflow::config::PrintSettings;
use printflow::font::{FontMetrics, TextMetrics};
use printflow::layout::FlowSurface;
use printflow::model::{Document, Page, PageDescriptor, PageSize};
use printflow::sample;
use printflow::service::{PrintHost, PrintService, TaskCompletion};

#[derive(Parser, Debug)]
#[command(name = "printflow")]
#[command(
    author,
    version,
    about = "Paginate data-bound documents into printer pages"
)]
struct Args {
    /// Input document (JSON). Reads stdin when omitted
    input: Option<PathBuf>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: Format,

    /// Print a sample document and exit
    #[arg(long)]
    example: bool,

    /// Title stamped on every page (overrides the document title)
    #[arg(long)]
    title: Option<String>,

    /// Fraction of the page width reserved on each side
    #[arg(long)]
    horizontal_margin: Option<f64>,

    /// Fraction of the page height reserved on each side
    #[arg(long)]
    vertical_margin: Option<f64>,

    /// Page size
    #[arg(short = 's', long, value_enum, default_value = "letter")]
    page_size: PageSizeArg,

    /// Margin the printer hardware cannot mark, in points
    #[arg(long, default_value = "18")]
    hardware_margin: f64,

    /// TrueType/OpenType font to measure text with
    #[arg(long)]
    font: Option<PathBuf>,

    /// Print settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// The page list as JSON
    Json,
    /// A plain-text preview of every page
    Text,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl From<PageSizeArg> for PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
            PageSizeArg::Tabloid => PageSize::Tabloid,
        }
    }
}

/// Batch host: always available, no dialog to show.
struct CliHost;

impl PrintHost for CliHost {
    fn is_supported(&self) -> bool {
        true
    }

    fn show_print_ui(&mut self, job_name: &str) -> Result<(), String> {
        log::debug!("Batch mode, skipping print dialog for '{job_name}'");
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .init();

    if args.example {
        println!("{}", serde_json::to_string_pretty(&sample::catalogue())?);
        return Ok(());
    }

    let settings = load_settings(&args)?;

    let json = read_input(args.input.as_deref())?;
    let document = Document::from_json(&json).context("Failed to parse document")?;
    log::info!("Parsed document with {} block(s)", document.blocks.len());

    let descriptor =
        PageDescriptor::with_hardware_margin(args.page_size.into(), args.hardware_margin);

    let rendered = match &args.font {
        Some(path) => {
            let metrics = FontMetrics::from_file(path)
                .with_context(|| format!("Failed to load font: {}", path.display()))?;
            run(&args, settings, &document, &descriptor, FlowSurface::with_metrics(metrics))?
        }
        None => run(&args, settings, &document, &descriptor, FlowSurface::new())?,
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Settings file first, then command-line overrides.
fn load_settings(args: &Args) -> Result<PrintSettings> {
    let mut settings = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            PrintSettings::from_json(&json).context("Failed to parse settings")?
        }
        None => PrintSettings::default(),
    };

    if let Some(title) = &args.title {
        settings.title = Some(title.clone());
    }
    if let Some(ratio) = args.horizontal_margin {
        settings.horizontal_margin_ratio = ratio;
    }
    if let Some(ratio) = args.vertical_margin {
        settings.vertical_margin_ratio = ratio;
    }
    settings.validate()?;
    Ok(settings)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut json = String::new();
            io::stdin()
                .read_to_string(&mut json)
                .context("Failed to read document from stdin")?;
            Ok(json)
        }
    }
}

fn run<M: TextMetrics>(
    args: &Args,
    settings: PrintSettings,
    document: &Document,
    descriptor: &PageDescriptor,
    surface: FlowSurface<M>,
) -> Result<String> {
    let mut service = PrintService::new(surface, CliHost, settings);
    service
        .register(document)
        .context("Failed to register document")?;
    service.print()?;

    if service.on_paginate(descriptor) == 0 {
        service.on_task_completed(TaskCompletion::Failed);
        anyhow::bail!("Pagination produced no pages");
    }

    let rendered = match args.format {
        Format::Json => serde_json::to_string_pretty(service.on_add_pages())?,
        Format::Text => render_text(service.surface(), service.on_add_pages())?,
    };

    service.on_task_completed(TaskCompletion::Submitted);
    service.on_dialog_closed();
    Ok(rendered)
}

/// Plain-text preview: title, wrapped lines, and the page-number footer.
fn render_text<M: TextMetrics>(
    surface: &FlowSurface<M>,
    pages: &[Page],
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    for page in pages {
        if let Some(title) = &page.title {
            writeln!(out, "{title}")?;
            writeln!(out, "{}", "=".repeat(title.chars().count()))?;
            writeln!(out)?;
        }
        for unit in &page.units {
            for block in unit.content().blocks() {
                for line in surface.lines(block, page.content.width) {
                    writeln!(out, "{}", line.text.trim_end())?;
                }
            }
            writeln!(out)?;
        }
        if page.clipped {
            writeln!(out, "[content clipped]")?;
        }
        writeln!(out, "{:^60}", page.page_number_label())?;
        writeln!(out, "{}", "-".repeat(60))?;
    }
    Ok(out)
}
