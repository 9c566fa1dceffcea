//! Zip extraction for Gradle distributions

use crate::error::{ProvisionError, ProvisionResult};
use std::fs::File;
use std::path::Path;
use zip::ZipArchive;

/// Extract a zip archive into `dest_dir`, creating it if needed
pub async fn extract_zip(archive: &Path, dest_dir: &Path) -> ProvisionResult<()> {
    let archive = archive.to_path_buf();
    let dest_dir = dest_dir.to_path_buf();

    tokio::task::spawn_blocking(move || extract_zip_blocking(&archive, &dest_dir))
        .await
        .map_err(|e| ProvisionError::Internal(format!("extraction task failed: {}", e)))?
}

fn extract_zip_blocking(archive: &Path, dest_dir: &Path) -> ProvisionResult<()> {
    let fail = |reason: String| ProvisionError::Archive {
        path: archive.to_path_buf(),
        reason,
    };

    std::fs::create_dir_all(dest_dir)
        .map_err(|e| ProvisionError::io(format!("creating {}", dest_dir.display()), e))?;

    let file = File::open(archive)
        .map_err(|e| ProvisionError::io(format!("opening {}", archive.display()), e))?;
    let mut zip = ZipArchive::new(file).map_err(|e| fail(e.to_string()))?;
    zip.extract(dest_dir).map_err(|e| fail(e.to_string()))?;

    Ok(())
}
