//! File I/O around the merge and split engines

use crate::assemble::{MergeOutcome, normalize_and_merge};
use crate::cancel::CancellationFlag;
use crate::options::MergeOptions;
use crate::render::LopdfBackend;
use crate::split::{SplitOutcome, split};
use crate::types::*;
use std::path::{Path, PathBuf};

/// Read a PDF file into memory
pub async fn load_pdf_bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}

/// Read several PDF files, in order
pub async fn load_multiple(paths: &[impl AsRef<Path>]) -> Result<Vec<Vec<u8>>> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        documents.push(load_pdf_bytes(path).await?);
    }
    Ok(documents)
}

/// Write bytes produced by a merge or split
pub async fn save_bytes(bytes: &[u8], path: impl AsRef<Path>) -> Result<()> {
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Merge files with the lopdf backend on the blocking thread pool
pub async fn merge_files(
    paths: &[PathBuf],
    deletion_specs: Vec<String>,
    options: &MergeOptions,
    cancel: Option<CancellationFlag>,
) -> Result<MergeOutcome> {
    let documents = load_multiple(paths).await?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        normalize_and_merge(
            &LopdfBackend,
            &documents,
            &deletion_specs,
            &options,
            cancel.as_ref(),
        )
    })
    .await?
}

/// Split a file with the lopdf backend on the blocking thread pool
pub async fn split_file(path: impl AsRef<Path>, mode: SplitMode) -> Result<SplitOutcome> {
    let bytes = load_pdf_bytes(path).await?;
    tokio::task::spawn_blocking(move || split(&LopdfBackend, &bytes, &mode)).await?
}

/// Write each split part to `dir` as `<label>.pdf`, returning the paths.
///
/// Fails rather than overwrite a part written by the same call.
pub async fn write_split_outputs(
    outcome: &SplitOutcome,
    dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    tokio::fs::create_dir_all(dir).await?;

    let mut written: Vec<PathBuf> = Vec::with_capacity(outcome.parts.len());
    for part in &outcome.parts {
        let path = dir.join(format!("{}.pdf", part.label));
        if written.contains(&path) {
            return Err(CollateError::Io(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("two split parts are both labelled {:?}", part.label),
            )));
        }
        save_bytes(&part.bytes, &path).await?;
        written.push(path);
    }
    Ok(written)
}
