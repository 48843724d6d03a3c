use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

use crate::document::PipelineDocument;

pub struct DocumentReader;

impl DocumentReader {
    /// Read upstream pipeline output.
    ///
    /// `.json` holds a single document or an array of documents, `.jsonl`
    /// one document per line.
    pub async fn read_file(path: &Path) -> Result<Vec<PipelineDocument>> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension {
            "json" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Self::parse_json(&content).context(format!("Invalid pipeline output: {:?}", path))
            }
            "jsonl" => {
                let content = fs::read_to_string(path)
                    .await
                    .context(format!("Failed to read file: {:?}", path))?;
                Self::parse_jsonl(&content).context(format!("Invalid pipeline output: {:?}", path))
            }
            _ => anyhow::bail!("Unsupported file format: {}", extension),
        }
    }

    pub fn parse_json(content: &str) -> Result<Vec<PipelineDocument>> {
        let value: serde_json::Value =
            serde_json::from_str(content).context("Failed to parse JSON")?;

        if value.is_array() {
            Ok(serde_json::from_value(value).context("Failed to parse document list")?)
        } else {
            let doc: PipelineDocument =
                serde_json::from_value(value).context("Failed to parse document")?;
            Ok(vec![doc])
        }
    }

    pub fn parse_jsonl(content: &str) -> Result<Vec<PipelineDocument>> {
        let mut docs = Vec::new();

        for (line_no, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let doc: PipelineDocument = serde_json::from_str(line)
                .context(format!("Failed to parse document on line {}", line_no + 1))?;
            docs.push(doc);
        }

        tracing::debug!(documents = docs.len(), "Parsed JSONL pipeline output");
        Ok(docs)
    }
}
