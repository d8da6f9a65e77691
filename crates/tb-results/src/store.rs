//! Run storage API.

use crate::types::{FCircRow, RunManifest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const MANIFEST_FILE: &str = "manifest.json";
const ROWS_FILE: &str = "fcirc.jsonl";

#[derive(Clone)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Store next to the study file, under `.tracebase/runs`.
    pub fn for_study(study_path: &Path) -> ResultsResult<Self> {
        let study_dir = study_path
            .parent()
            .ok_or_else(|| ResultsError::InvalidPath {
                message: "study path has no parent directory".to_string(),
            })?;
        let runs_dir = study_dir.join(".tracebase").join("runs");
        Self::new(runs_dir)
    }

    fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    /// A run is complete once both its rows and its manifest are on disk.
    pub fn has_run(&self, run_id: &str) -> bool {
        let run_dir = self.run_dir(run_id);
        run_dir.join(MANIFEST_FILE).is_file() && run_dir.join(ROWS_FILE).is_file()
    }

    /// Rows are written before the manifest, each file through a rename, so
    /// an interrupted save never looks like a cached run.
    pub fn save_run(&self, manifest: &RunManifest, rows: &[FCircRow]) -> ResultsResult<()> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;

        let mut rows_content = String::new();
        for row in rows {
            let line = serde_json::to_string(row)?;
            rows_content.push_str(&line);
            rows_content.push('\n');
        }
        write_atomic(&run_dir.join(ROWS_FILE), &rows_content)?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        write_atomic(&run_dir.join(MANIFEST_FILE), &manifest_json)?;

        Ok(())
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        let manifest_path = self.run_dir(run_id).join(MANIFEST_FILE);

        if !manifest_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_rows(&self, run_id: &str) -> ResultsResult<Vec<FCircRow>> {
        let rows_path = self.run_dir(run_id).join(ROWS_FILE);

        if !rows_path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }

        let content = fs::read_to_string(rows_path)?;
        let mut rows = Vec::new();
        for line in content.lines() {
            if !line.trim().is_empty() {
                rows.push(serde_json::from_str(line)?);
            }
        }

        Ok(rows)
    }

    /// Runs of the named study, newest first.
    pub fn list_runs(&self, study_name: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if !entry.path().is_dir() {
                continue;
            }
            let run_id = entry.file_name().to_string_lossy().to_string();
            match self.load_manifest(&run_id) {
                Ok(manifest) if manifest.study_name == study_name => runs.push(manifest),
                Ok(_) => {}
                Err(ResultsError::RunNotFound { .. }) => {
                    warn!(%run_id, "run directory has no manifest, skipping");
                }
                Err(err) => {
                    warn!(%run_id, "unreadable run manifest, skipping: {err}");
                }
            }
        }

        runs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(runs)
    }

    pub fn delete_run(&self, run_id: &str) -> ResultsResult<()> {
        let run_dir = self.run_dir(run_id);
        if run_dir.exists() {
            fs::remove_dir_all(run_dir)?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> ResultsResult<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
