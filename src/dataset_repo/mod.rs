// CSV dataset of metrics snapshots. One file holds the whole history; every collection
// run rewrites it as old rows + new rows. The rewrite goes to a temporary file next to
// the dataset and is renamed over it, so readers see either the old or the new file.
// Concurrent writers are not coordinated: run at most one collection at a time.

mod row;

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::io::AsyncWriteExt;
use tracing::instrument;

use crate::models::MetricsSnapshot;
use row::CsvRow;

pub struct DatasetRepo {
    path: PathBuf,
}

impl DatasetRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every row in file order. A missing file is an error.
    #[instrument(skip(self), fields(repo = "dataset", operation = "load_all", path = %self.path.display()))]
    pub async fn load_all(&self) -> anyhow::Result<Vec<MetricsSnapshot>> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading dataset {}", self.path.display()))?;
        parse_csv(&bytes).with_context(|| format!("parsing dataset {}", self.path.display()))
    }

    /// Like [`load_all`](Self::load_all), but a missing file is an empty history.
    pub async fn load_existing(&self) -> anyhow::Result<Vec<MetricsSnapshot>> {
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => self.load_all().await,
            Ok(false) => Ok(Vec::new()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("checking dataset {}", self.path.display()))),
        }
    }

    /// Appends `snapshots` after the existing rows and rewrites the file. Returns the new
    /// total row count. Existing rows are re-serialized, never altered.
    #[instrument(skip(self, snapshots), fields(repo = "dataset", operation = "append_snapshots", snapshots_count = snapshots.len()))]
    pub async fn append_snapshots(&self, snapshots: &[MetricsSnapshot]) -> anyhow::Result<usize> {
        let mut rows = self.load_existing().await?;
        if snapshots.is_empty() {
            return Ok(rows.len());
        }
        rows.extend_from_slice(snapshots);
        let bytes = encode_csv(&rows)?;
        write_atomically(&self.path, &bytes).await?;
        tracing::debug!(total_rows = rows.len(), "dataset rewritten");
        Ok(rows.len())
    }
}

pub(crate) fn parse_csv(bytes: &[u8]) -> anyhow::Result<Vec<MetricsSnapshot>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(bytes);
    let mut out = Vec::new();
    for (i, record) in reader.deserialize::<CsvRow>().enumerate() {
        let row = record.with_context(|| format!("row {}", i + 1))?;
        out.push(row.into_snapshot().with_context(|| format!("row {}", i + 1))?);
    }
    Ok(out)
}

pub(crate) fn encode_csv(rows: &[MetricsSnapshot]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for (i, s) in rows.iter().enumerate() {
        writer.serialize(CsvRow::from_snapshot(i, s))?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv flush: {}", e.error()))
}

/// Write to `<dir>/.<name>.tmp-<pid>`, fsync, then rename over `path`.
async fn write_atomically(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent).await?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("dataset path has no file name")?;
    let mut tmp = TempFileGuard::new(parent.join(format!(
        ".{}.tmp-{}",
        file_name,
        std::process::id()
    )));

    async {
        let mut file = tokio::fs::File::create(tmp.path()).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(tmp.path(), path).await?;
        anyhow::Ok(())
    }
    .await
    .with_context(|| format!("writing dataset {}", path.display()))?;
    tmp.persisted();
    Ok(())
}

/// Deletes the temporary file on drop unless it was renamed into place. Covers both
/// failed writes and a write future dropped part-way (e.g. on shutdown).
struct TempFileGuard {
    path: PathBuf,
    persisted: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            persisted: false,
        }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn persisted(&mut self) {
        self.persisted = true;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if !self.persisted {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_guard_removes_unpersisted_file() {
        let dir = tempfile::tempdir().unwrap();
        let tmp_path = dir.path().join(".mqt.csv.tmp-1");
        std::fs::write(&tmp_path, b"partial").unwrap();

        drop(TempFileGuard::new(tmp_path.clone()));
        assert!(!tmp_path.exists());
    }

    #[test]
    fn temp_file_guard_keeps_persisted_path() {
        let dir = tempfile::tempdir().unwrap();
        let tmp_path = dir.path().join(".mqt.csv.tmp-1");
        let final_path = dir.path().join("mqt.csv");
        std::fs::write(&tmp_path, b"done").unwrap();

        let mut guard = TempFileGuard::new(tmp_path.clone());
        std::fs::rename(&tmp_path, &final_path).unwrap();
        guard.persisted();
        drop(guard);
        assert_eq!(std::fs::read(&final_path).unwrap(), b"done");
    }
}
