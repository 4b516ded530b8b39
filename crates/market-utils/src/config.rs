//! Output directory layout

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Where intermediate files, charts, and the report are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputLayout {
    /// Directory for normalized series CSV files
    pub data_dir: PathBuf,
    /// Directory for rendered charts
    pub output_dir: PathBuf,
    /// Path of the final PDF report
    pub report_path: PathBuf,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("testfiles"),
            output_dir: PathBuf::from("output"),
            report_path: PathBuf::from("output").join("report.pdf"),
        }
    }
}

impl OutputLayout {
    /// Layout with every artifact under `root`
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            data_dir: root.join("testfiles"),
            output_dir: root.join("output"),
            report_path: root.join("output").join("report.pdf"),
        }
    }

    /// Create every directory the layout writes into
    pub fn ensure_dirs(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        std::fs::create_dir_all(&self.output_dir)?;
        if let Some(parent) = self.report_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}
