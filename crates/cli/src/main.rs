mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use zpl_label_core::{EditorSession, ImportMode, ProjectFile, validate_zpl};
use zpl_label_diagnostics::{self as diag, Diagnostic};
use zpl_label_settings::{LabelSettings, Orientation};

use crate::render::{Format, print_json, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "zpl-label",
    version,
    about = "ZPL label designer: create projects, export and import ZPL, validate label code"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_enum)]
    output: Option<Format>,

    /// Log debug detail to stderr (otherwise `RUST_LOG`, default warn).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Create an empty project file.
    New {
        project: PathBuf,
        /// Label width in millimetres.
        #[arg(long, default_value_t = 100.0)]
        width_mm: f64,
        /// Label height in millimetres.
        #[arg(long, default_value_t = 50.0)]
        height_mm: f64,
        /// Printer resolution (203, 300 or 600).
        #[arg(long, default_value_t = 203)]
        dpi: u32,
        /// Rotate the printed label (adds ^POI).
        #[arg(long)]
        landscape: bool,
        /// Draw a border on the design canvas.
        #[arg(long)]
        border: bool,
        /// Snap object positions to a grid of this many dots.
        #[arg(long, value_name = "DOTS")]
        grid: Option<i32>,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Export a project as ZPL.
    Export {
        project: PathBuf,
        /// Write ZPL to this file instead of stdout.
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Import a ZPL file into a project (created if missing).
    Import {
        file: PathBuf,
        /// Project file to update.
        #[arg(long)]
        project: PathBuf,
        /// Add to the existing objects instead of replacing them.
        #[arg(long)]
        append: bool,
    },

    /// Validate ZPL text, or the ZPL a `.json` project exports to.
    Validate { file: PathBuf },

    /// Explain a diagnostic ID (e.g. ZLB2001).
    Explain { id: String },
}

/// JSON body for commands that write a file.
#[derive(Debug, Serialize)]
struct Written<'a> {
    status: &'a str,
    file: String,
    objects: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnostics: Option<&'a [Diagnostic]>,
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let format = Format::resolve(cli.output);

    match cli.cmd {
        Cmd::New {
            project,
            width_mm,
            height_mm,
            dpi,
            landscape,
            border,
            grid,
            force,
        } => {
            let settings = LabelSettings {
                width_mm,
                height_mm,
                dpi,
                border,
                orientation: if landscape {
                    Orientation::Landscape
                } else {
                    Orientation::Portrait
                },
                snap_to_grid: grid.is_some(),
                grid_size: grid.unwrap_or(LabelSettings::default().grid_size),
            };
            cmd_new(&project, settings, force, format)?;
        }
        Cmd::Export { project, out } => cmd_export(&project, out.as_deref(), format)?,
        Cmd::Import {
            file,
            project,
            append,
        } => {
            let mode = if append {
                ImportMode::Append
            } else {
                ImportMode::Replace
            };
            cmd_import(&file, &project, mode, format)?;
        }
        Cmd::Validate { file } => cmd_validate(&file, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_new(path: &Path, settings: LabelSettings, force: bool, format: Format) -> Result<()> {
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    let session = EditorSession::with_settings(settings).context("invalid label settings")?;
    session
        .to_project()
        .save(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let (w, h) = session.settings().size_in_dots();
    match format {
        Format::Json => print_json(&Written {
            status: "created",
            file: path.display().to_string(),
            objects: 0,
            diagnostics: None,
        })?,
        Format::Pretty => eprintln!("created {} ({w}x{h} dots)", path.display()),
    }
    Ok(())
}

fn cmd_export(path: &Path, out: Option<&Path>, format: Format) -> Result<()> {
    let session = open_project(path)?;
    let zpl = session.export_zpl();
    // Findings are reported but never block the export.
    let vr = validate_zpl(&zpl);
    debug!(objects = session.scene().len(), issues = vr.issues.len(), "exported");

    let Some(out) = out else {
        print!("{zpl}");
        if format == Format::Pretty {
            render::render_pretty(&zpl, &path.display().to_string(), &vr.issues);
            render::print_summary(&vr.issues);
        }
        return Ok(());
    };

    fs::write(out, &zpl).with_context(|| format!("failed to write {}", out.display()))?;
    match format {
        Format::Json => print_json(&Written {
            status: "exported",
            file: out.display().to_string(),
            objects: session.scene().len(),
            diagnostics: Some(&vr.issues),
        })?,
        Format::Pretty => {
            let name = out.display().to_string();
            render::render_pretty(&zpl, &name, &vr.issues);
            render::print_summary(&vr.issues);
            eprintln!("exported {} objects to {name}", session.scene().len());
        }
    }
    Ok(())
}

fn cmd_import(file: &Path, project: &Path, mode: ImportMode, format: Format) -> Result<()> {
    let text = read_text(file)?;
    let mut session = if project.exists() {
        open_project(project)?
    } else {
        EditorSession::new()
    };

    let summary = session.import_zpl(&text, mode);
    let imported = summary.imported.len();
    if imported > 0 {
        session
            .to_project()
            .save(project)
            .with_context(|| format!("failed to save {}", project.display()))?;
    }

    let status = if imported > 0 { "imported" } else { "nothing imported" };
    match format {
        Format::Json => print_json(&Written {
            status,
            file: project.display().to_string(),
            objects: imported,
            diagnostics: Some(&summary.diagnostics),
        })?,
        Format::Pretty => {
            render::render_pretty(&text, &file.display().to_string(), &summary.diagnostics);
            render::print_summary(&summary.diagnostics);
            eprintln!("{status}: {imported} objects into {}", project.display());
        }
    }
    Ok(())
}

fn cmd_validate(file: &Path, format: Format) -> Result<()> {
    let is_project = file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let source = if is_project {
        open_project(file)?.export_zpl()
    } else {
        read_text(file)?
    };

    let vr = validate_zpl(&source);
    render_diagnostics(
        &source,
        &file.display().to_string(),
        "issues",
        &vr.issues,
        format,
    )?;
    if format == Format::Pretty && vr.ok {
        eprintln!("validation ok");
    }

    exit_on_errors(&vr.issues);
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    let text = diag::explain(id);
    match format {
        Format::Json => print_json(&serde_json::json!({
            "id": id,
            "severity": diag::default_severity(id),
            "explanation": text,
        }))?,
        Format::Pretty => {
            use ariadne::Fmt;
            match text {
                Some(text) => println!("{}: {text}", id.fg(ariadne::Color::Cyan)),
                None => println!("{id}: (no explanation available)"),
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn open_project(path: &Path) -> Result<EditorSession> {
    let project = ProjectFile::load(path)?;
    Ok(EditorSession::from_project(project))
}

/// Exit with code 1 if any diagnostic is an error.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics.iter().any(Diagnostic::is_error) {
        process::exit(1);
    }
}
