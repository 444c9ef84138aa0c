//! JSONレポート出力

use crate::error::Result;
use crate::pipeline::LinkageReport;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

pub fn write_report(report: &LinkageReport, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}
