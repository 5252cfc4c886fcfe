//! Document persistence

use crate::export::OutputDocument;
use crate::types::*;
use std::path::Path;

/// Save the exported document.
///
/// Nothing touches the filesystem until the PDF is fully serialized.
pub async fn save_pdf(doc: OutputDocument, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let page_count = doc.page_count();

    let bytes = tokio::task::spawn_blocking(move || doc.to_bytes())
        .await?
        .map_err(|e| ExportError::Persistence {
            path: path.clone(),
            source: match e {
                ExportError::Io(source) => source,
                other => std::io::Error::other(other.to_string()),
            },
        })?;

    tokio::fs::write(&path, bytes)
        .await
        .map_err(|source| ExportError::Persistence {
            path: path.clone(),
            source,
        })?;

    log::info!("Saved {} page(s) to {}", page_count, path.display());
    Ok(())
}
