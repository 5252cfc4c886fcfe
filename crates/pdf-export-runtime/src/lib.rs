use std::path::PathBuf;

mod handlers;
mod trigger;
mod worker;

// Re-export types from library crates
pub use pdf_paginate::{ExportOptions, ExportStatistics, ImageFileRasterizer};
pub use trigger::{ExportBusy, ExportTrigger, TriggerGuard};
pub use worker::{spawn_worker, worker_task};

/// Notification shown to the user when an export fails
pub const EXPORT_FAILED_MESSAGE: &str = "Failed to generate PDF";

/// Commands sent from the UI to the worker
#[derive(Debug)]
pub enum ExportCommand {
    /// Capture `source`, paginate it and save the PDF to `output_path`.
    ///
    /// The trigger guard is released once the export finishes, whatever
    /// the outcome.
    Export {
        source: PathBuf,
        options: ExportOptions,
        output_path: PathBuf,
        trigger: TriggerGuard,
    },
    /// Capture `source` and report how it would paginate
    CalculateStats {
        source: PathBuf,
        options: ExportOptions,
    },
}

/// Updates sent from the worker to the UI
#[derive(Debug, Clone)]
pub enum ExportUpdate {
    Started {
        source: PathBuf,
    },
    /// The PDF was saved; `stats` describes how it was paginated
    Complete {
        path: PathBuf,
        stats: ExportStatistics,
    },
    StatsCalculated {
        stats: ExportStatistics,
    },
    Error {
        message: String,
    },
    /// Cleanup ran and the trigger is enabled again
    Finished,
}
