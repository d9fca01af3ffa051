//! Writing the recommendation artifact.
//!
//! One run produces one JSON document mapping each user id to its ranked
//! application ids, written under a timestamped file name so successive runs
//! never clobber each other:
//!
//! ```text
//! out/recommend_games_20260823-141503.json
//! ```

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name template for the artifact. `[timestamp]` and `[format]` are
/// substituted at write time.
pub const ARTIFACT_TEMPLATE: &str = "recommend_games_[timestamp].[format]";

/// Timestamp layout used in artifact file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Artifact formats accepted at the output boundary.
///
/// Only JSON is actually written today. The other formats are accepted so a
/// request for them degrades to JSON with a warning instead of failing the
/// run after training already happened.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// Pretty-printed JSON document.
    Json,
    /// Unsupported, falls back to JSON.
    Xml,
    /// Unsupported, falls back to JSON.
    Html,
}

impl ArtifactFormat {
    /// Resolves to the format that will really be written, warning when a
    /// request falls back.
    pub fn effective(self) -> ArtifactFormat {
        match self {
            ArtifactFormat::Json => ArtifactFormat::Json,
            other => {
                tracing::warn!(
                    "{} output is not supported; falling back to json",
                    other.extension()
                );
                ArtifactFormat::Json
            }
        }
    }

    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactFormat::Json => "json",
            ArtifactFormat::Xml => "xml",
            ArtifactFormat::Html => "html",
        }
    }
}

/// Renders an artifact file name from a template.
pub fn render_template(template: &str, timestamp: &str, format: ArtifactFormat) -> String {
    template
        .replace("[timestamp]", timestamp)
        .replace("[format]", format.extension())
}

/// Builds the artifact path for a run starting now.
pub fn artifact_path(output_dir: &Path, format: ArtifactFormat) -> PathBuf {
    let timestamp = Local::now().format(TIMESTAMP_FORMAT).to_string();
    output_dir.join(render_template(ARTIFACT_TEMPLATE, &timestamp, format))
}

/// Writes the per-user recommendations as a pretty JSON document.
///
/// Missing parent directories are created. The map's `BTreeMap` ordering
/// keeps the document stable for a given result set.
pub fn write_artifact(path: &Path, recommendations: &BTreeMap<String, Vec<u32>>) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, recommendations)?;
    writer.flush()?;
    Ok(())
}
