use crate::{EXPORT_FAILED_MESSAGE, ExportUpdate};
use pdf_paginate::{
    ExportOptions, ExportStatistics, ImageFileRasterizer, Rasterizer, Result,
    calculate_statistics, export, save_pdf,
};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

pub async fn handle_export(
    rasterizer: &ImageFileRasterizer,
    source: PathBuf,
    options: ExportOptions,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<ExportUpdate>,
) {
    let _ = update_tx.send(ExportUpdate::Started {
        source: source.clone(),
    });

    match export_to_file(rasterizer, &source, &options, &output_path).await {
        Ok(stats) => {
            let _ = update_tx.send(ExportUpdate::Complete {
                path: output_path,
                stats,
            });
        }
        Err(e) => {
            log::error!("PDF generation error for {}: {e}", source.display());
            let _ = update_tx.send(ExportUpdate::Error {
                message: EXPORT_FAILED_MESSAGE.to_string(),
            });
        }
    }
}

async fn export_to_file(
    rasterizer: &ImageFileRasterizer,
    source: &Path,
    options: &ExportOptions,
    output_path: &Path,
) -> Result<ExportStatistics> {
    let doc = export(rasterizer, source, options).await?;
    let stats = doc.statistics();
    save_pdf(doc, output_path).await?;
    Ok(stats)
}

pub async fn handle_calculate_stats(
    rasterizer: &ImageFileRasterizer,
    source: PathBuf,
    options: ExportOptions,
    update_tx: &mpsc::UnboundedSender<ExportUpdate>,
) {
    let result = async {
        options.validate()?;
        let raster = rasterizer
            .capture(&source, &options.capture_options())
            .await?;
        calculate_statistics(raster.width(), raster.height(), &options)
    }
    .await;

    match result {
        Ok(stats) => {
            let _ = update_tx.send(ExportUpdate::StatsCalculated { stats });
        }
        Err(e) => {
            log::error!("Failed to calculate statistics for {}: {e}", source.display());
            let _ = update_tx.send(ExportUpdate::Error {
                message: format!("Failed to calculate statistics: {e}"),
            });
        }
    }
}
