//! Transaction Journal - Append-only JSONL Lifecycle Records
//!
//! Persists lifecycle events to daily JSONL files in the format
//! `journal/YYYY-MM-DD.jsonl`. Each line is a self-contained JSON
//! record. Never contains key material or calldata.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::ports::journal::{JournalEntry, TxJournal};

/// Append-only JSONL journal with daily file rotation.
pub struct JsonlJournal {
    journal_dir: PathBuf,
}

impl JsonlJournal {
    /// Create a journal under `data_dir/journal`.
    pub async fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        let journal_dir = data_dir.as_ref().join("journal");
        fs::create_dir_all(&journal_dir)
            .await
            .with_context(|| format!("Failed to create journal directory {}", journal_dir.display()))?;
        Ok(Self { journal_dir })
    }

    fn today_path(&self) -> PathBuf {
        let date = Utc::now().format("%Y-%m-%d").to_string();
        self.journal_dir.join(format!("{date}.jsonl"))
    }
}

#[async_trait]
impl TxJournal for JsonlJournal {
    #[instrument(skip(self, entry), fields(event = ?entry.event, tx_hash = %entry.tx_hash))]
    async fn record(&self, entry: &JournalEntry) -> Result<()> {
        let mut json = serde_json::to_string(entry).context("Failed to serialize journal entry")?;
        json.push('\n');

        let path = self.today_path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .context("Failed to open journal file")?;

        file.write_all(json.as_bytes())
            .await
            .context("Failed to write journal entry")?;
        file.flush().await.context("Failed to flush journal")?;

        debug!(path = %path.display(), "Journal entry appended");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn load_all(&self) -> Result<Vec<JournalEntry>> {
        let mut paths = Vec::new();
        let mut dir = fs::read_dir(&self.journal_dir).await?;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().is_some_and(|ext| ext == "jsonl") {
                paths.push(path);
            }
        }
        // File names are dates, so lexical order is chronological.
        paths.sort();

        let mut entries = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            for (line_no, line) in content.lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<JournalEntry>(line) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!(
                        file = %path.display(),
                        line = line_no + 1,
                        error = %e,
                        "Skipping malformed journal line"
                    ),
                }
            }
        }

        Ok(entries)
    }
}
