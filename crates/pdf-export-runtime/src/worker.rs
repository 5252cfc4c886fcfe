use crate::{ExportCommand, ExportUpdate, handlers};
use pdf_paginate::ImageFileRasterizer;
use tokio::sync::mpsc;

/// Spawn the worker on the current runtime and return its channels
pub fn spawn_worker(
    rasterizer: ImageFileRasterizer,
) -> (
    mpsc::UnboundedSender<ExportCommand>,
    mpsc::UnboundedReceiver<ExportUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();

    tokio::spawn(worker_task(rasterizer, command_rx, update_tx));

    (command_tx, update_rx)
}

/// Async worker task that processes export commands and sends updates
pub async fn worker_task(
    rasterizer: ImageFileRasterizer,
    mut command_rx: mpsc::UnboundedReceiver<ExportCommand>,
    update_tx: mpsc::UnboundedSender<ExportUpdate>,
) {
    while let Some(cmd) = command_rx.recv().await {
        process_command(cmd, &rasterizer, &update_tx).await;
    }
    log::debug!("Export worker stopped: command channel closed");
}

async fn process_command(
    cmd: ExportCommand,
    rasterizer: &ImageFileRasterizer,
    update_tx: &mpsc::UnboundedSender<ExportUpdate>,
) {
    match cmd {
        ExportCommand::Export {
            source,
            options,
            output_path,
            trigger,
        } => {
            handlers::handle_export(rasterizer, source, options, output_path, update_tx).await;

            // Cleanup: re-enable the trigger before reporting
            drop(trigger);
            let _ = update_tx.send(ExportUpdate::Finished);
        }
        ExportCommand::CalculateStats { source, options } => {
            handlers::handle_calculate_stats(rasterizer, source, options, update_tx).await;
        }
    }
}
