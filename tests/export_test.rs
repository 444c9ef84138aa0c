//! JSON/Excel出力の統合テスト

use sayu_linkage::cli::ReportFormat;
use sayu_linkage::export::{self, excel, json};
use sayu_linkage::pipeline::{run_linkage, LinkageReport, RunOptions};
use sayu_linkage_common::{CanonicalVenue, LinkageOptions, Linker, MatchType, RawExhibitionRecord};
use tempfile::tempdir;

fn create_test_report() -> LinkageReport {
    let venues = vec![
        CanonicalVenue {
            id: "mmca-seoul".to_string(),
            name: "국립현대미술관 서울".to_string(),
            name_english: "MMCA Seoul".to_string(),
            city: "서울".to_string(),
            country: "KR".to_string(),
        },
        CanonicalVenue {
            id: "leeum".to_string(),
            name: "리움미술관".to_string(),
            name_english: "Leeum Museum of Art".to_string(),
            city: "서울".to_string(),
            country: "KR".to_string(),
        },
    ];
    let linker = Linker::new(venues, LinkageOptions::default()).expect("会場インデックス構築失敗");

    let records: Vec<RawExhibitionRecord> = [
        "국립현대미술관 서울",
        "MMCA",
        "Leeum",
        "알 수 없는 공간",
        "알 수 없는 공간",
    ]
    .into_iter()
    .map(RawExhibitionRecord::with_venue_name)
    .collect();

    run_linkage(&linker, &records, RunOptions::default())
}

#[test]
fn test_json_report_roundtrip() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("nested").join("report.json");

    let report = create_test_report();
    json::write_report(&report, &output_path).expect("JSON出力に失敗");
    assert!(output_path.exists(), "JSONファイルが作成されていない");

    let loaded = LinkageReport::load(&output_path).expect("JSON読み込みに失敗");
    assert_eq!(loaded.snapshot_fingerprint, report.snapshot_fingerprint);
    assert_eq!(loaded.venue_count, 2);
    assert_eq!(loaded.summary, report.summary);
    assert_eq!(loaded.decisions, report.decisions);
}

#[test]
fn test_json_report_uses_camel_case_keys() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.json");

    json::write_report(&create_test_report(), &output_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();

    for key in ["generatedAt", "snapshotFingerprint", "venueCount", "summary", "decisions"] {
        assert!(value.get(key).is_some(), "キー {} がない", key);
    }
    assert_eq!(value["summary"]["exactCount"], 1);
    assert_eq!(value["summary"]["topUnmatchedNames"][0]["name"], "알 수 없는 공간");
    assert_eq!(value["summary"]["topUnmatchedNames"][0]["count"], 2);
}

#[test]
fn test_tampered_decision_is_rejected() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.json");

    let report = create_test_report();
    let exact_index = report
        .decisions
        .iter()
        .position(|d| d.match_type() == MatchType::Exact)
        .unwrap();
    json::write_report(&report, &output_path).unwrap();

    let mut value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    value["decisions"][exact_index]["confidence"] = serde_json::json!(70);
    std::fs::write(&output_path, value.to_string()).unwrap();

    assert!(LinkageReport::load(&output_path).is_err());
}

#[test]
fn test_excel_generation() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("report.xlsx");

    let result = excel::generate_excel(&create_test_report(), &output_path);

    assert!(result.is_ok(), "Excel生成に失敗: {:?}", result.err());
    assert!(output_path.exists(), "Excelファイルが作成されていない");

    let metadata = std::fs::metadata(&output_path).expect("ファイルメタデータ取得失敗");
    assert!(metadata.len() > 0, "Excelファイルが空");
}

#[test]
fn test_export_both_formats_into_directory() {
    let dir = tempdir().expect("Failed to create temp dir");

    let written = export::export_report(&create_test_report(), ReportFormat::Both, dir.path())
        .expect("レポート出力に失敗");

    assert_eq!(written.len(), 2);
    assert_eq!(written[0], dir.path().join("linkage-report.json"));
    assert_eq!(written[1], dir.path().join("linkage-report.xlsx"));
    for path in &written {
        assert!(path.exists(), "{} が作成されていない", path.display());
    }
}
