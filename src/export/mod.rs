pub mod json;
pub mod excel;

use crate::cli::ReportFormat;
use crate::error::Result;
use crate::pipeline::LinkageReport;
use std::path::{Path, PathBuf};

pub const DEFAULT_REPORT_NAME: &str = "linkage-report";

fn output_path_for_format(output: &Path, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", DEFAULT_REPORT_NAME, extension))
    } else {
        output.with_extension(extension)
    }
}

fn output_paths_for_both(output: &Path) -> (PathBuf, PathBuf) {
    (
        output_path_for_format(output, "json"),
        output_path_for_format(output, "xlsx"),
    )
}

/// レポートを指定形式で出力し、書き出したパスを返す
pub fn export_report(
    report: &LinkageReport,
    format: ReportFormat,
    output: &Path,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    match format {
        ReportFormat::Json => {
            let path = output_path_for_format(output, "json");
            json::write_report(report, &path)?;
            written.push(path);
        }
        ReportFormat::Excel => {
            let path = output_path_for_format(output, "xlsx");
            excel::generate_excel(report, &path)?;
            written.push(path);
        }
        ReportFormat::Both => {
            let (json_path, excel_path) = output_paths_for_both(output);
            json::write_report(report, &json_path)?;
            excel::generate_excel(report, &excel_path)?;
            written.push(json_path);
            written.push(excel_path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_for_file_keeps_stem() {
        let path = output_path_for_format(Path::new("out/report.json"), "xlsx");
        assert_eq!(path, PathBuf::from("out/report.xlsx"));
    }

    #[test]
    fn test_output_path_for_dir_uses_default_name() {
        let path = output_path_for_format(Path::new("out"), "json");
        assert_eq!(path, PathBuf::from("out").join("linkage-report.json"));
    }
}
