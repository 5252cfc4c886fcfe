mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use pdf_export_runtime::{ExportCommand, ExportTrigger, ExportUpdate, spawn_worker};
use pdf_paginate::constants::{DEFAULT_JPEG_QUALITY, DEFAULT_OUTPUT_FILENAME, DEFAULT_SCALE};
use pdf_paginate::{ExportOptions, ExportStatistics, ImageEncoding, ImageFileRasterizer};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfx", about = "Paginated raster-to-PDF exporter", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Slice a captured rendering across fixed-size PDF pages
    Export {
        /// Captured rendering (PNG, JPEG, ...)
        #[arg(short, long)]
        input: PathBuf,

        /// Output PDF file
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILENAME)]
        output: PathBuf,

        /// Load options from a JSON file instead of the flags below
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the effective options to a JSON file
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Output paper size
        #[arg(long, default_value = "a4", value_enum)]
        paper: PaperArg,

        /// Output orientation
        #[arg(long, default_value = "portrait", value_enum)]
        orientation: OrientationArg,

        /// Page margin in mm (uniform on all sides)
        #[arg(long, default_value = "0.0")]
        margin: f32,

        /// Capture resolution multiplier
        #[arg(long, default_value_t = DEFAULT_SCALE)]
        scale: u32,

        /// JPEG quality (1-100)
        #[arg(long, default_value_t = DEFAULT_JPEG_QUALITY)]
        quality: u8,

        /// Store slices losslessly instead of as JPEG
        #[arg(long)]
        lossless: bool,

        /// Document title
        #[arg(long)]
        title: Option<String>,

        /// Refuse captures outside this directory unless cross-origin is allowed
        #[arg(long)]
        asset_root: Option<PathBuf>,

        /// Allow captures from outside the asset root
        #[arg(long)]
        allow_cross_origin: bool,

        /// Show statistics only, don't generate PDF
        #[arg(long)]
        stats_only: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for pdf_paginate::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for pdf_paginate::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::from_verbosity(cli.verbose)
        .init()
        .context("Failed to install logger")?;

    match cli.command {
        Commands::Export {
            input,
            output,
            config,
            save_config,
            paper,
            orientation,
            margin,
            scale,
            quality,
            lossless,
            title,
            asset_root,
            allow_cross_origin,
            stats_only,
        } => {
            let options = match config {
                Some(path) => ExportOptions::load(&path)
                    .await
                    .with_context(|| format!("Failed to load {}", path.display()))?,
                None => ExportOptions {
                    paper_size: paper.into(),
                    orientation: orientation.into(),
                    margin_mm: margin,
                    scale,
                    allow_cross_origin,
                    encoding: if lossless {
                        ImageEncoding::Lossless
                    } else {
                        ImageEncoding::Jpeg { quality }
                    },
                    title,
                },
            };
            options.validate()?;

            if let Some(path) = save_config {
                options.save(&path).await?;
                println!("Saved options → {}", path.display());
            }

            let rasterizer = match asset_root {
                Some(root) => ImageFileRasterizer::with_root(root),
                None => ImageFileRasterizer::new(),
            };
            let (command_tx, mut update_rx) = spawn_worker(rasterizer);

            if stats_only {
                command_tx.send(ExportCommand::CalculateStats {
                    source: input,
                    options,
                })?;
                match update_rx.recv().await {
                    Some(ExportUpdate::StatsCalculated { stats }) => print_statistics(&stats),
                    Some(ExportUpdate::Error { message }) => bail!(message),
                    other => bail!("Unexpected worker response: {:?}", other),
                }
                return Ok(());
            }

            // Perform export
            let trigger = ExportTrigger::new();
            command_tx.send(ExportCommand::Export {
                source: input,
                options,
                output_path: output,
                trigger: trigger.try_begin()?,
            })?;

            let mut failure = None;
            while let Some(update) = update_rx.recv().await {
                match update {
                    ExportUpdate::Started { source } => {
                        log::info!("Exporting {}", source.display());
                    }
                    ExportUpdate::Complete { path, stats } => {
                        print_statistics(&stats);
                        println!("Exported {} page(s) → {}", stats.page_count, path.display());
                    }
                    ExportUpdate::Error { message } => failure = Some(message),
                    ExportUpdate::Finished => break,
                    ExportUpdate::StatsCalculated { .. } => {}
                }
            }

            if let Some(message) = failure {
                bail!(message);
            }
        }
    }

    Ok(())
}

fn print_statistics(stats: &ExportStatistics) {
    println!("Export Statistics:");
    println!(
        "  Raster: {} x {} px",
        stats.raster_width, stats.raster_height
    );
    println!("  Scale: {:.4} mm/px", stats.scale_factor);
    println!("  Rows per page: {:.2}", stats.page_height_px);
    println!("  Pages: {}", stats.page_count);
    println!("  Rows on last page: {}", stats.last_page_rows);
}
