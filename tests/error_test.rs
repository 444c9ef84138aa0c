//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use sayu_linkage::error::LinkageError;
use sayu_linkage::loader;
use sayu_linkage_common::{CanonicalVenue, LinkageOptions, Linker};
use std::path::Path;
use tempfile::tempdir;

/// 存在しないフォルダをスキャンした場合
#[test]
fn test_scan_nonexistent_folder() {
    let result = loader::scan_json_files(Path::new("/nonexistent/path/12345"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, LinkageError::FolderNotFound(_)));
}

/// 存在しない会場ファイル
#[test]
fn test_load_missing_venue_file() {
    let result = loader::load_venues(Path::new("/nonexistent/venues.json"));
    assert!(matches!(result, Err(LinkageError::FileNotFound(_))));
}

/// 空のフォルダは空のレコード列
#[test]
fn test_load_records_from_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let records = loader::load_records(dir.path()).expect("空フォルダの読み込みに失敗");
    assert!(records.is_empty());
}

/// フォルダ内の複数JSONをファイル名順に結合
#[test]
fn test_load_records_from_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(
        dir.path().join("02_artvee.json"),
        r#"[{"venue_name": "Tate Modern", "artists": "Rothko, Klee"}]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("01_culture.json"),
        r#"[{"venueNameText": "국제갤러리", "venueCity": "서울"}]"#,
    )
    .unwrap();
    std::fs::write(dir.path().join("readme.txt"), "skip").unwrap();

    let records = loader::load_records(dir.path()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].venue_name_text, "국제갤러리");
    assert_eq!(records[1].venue_name_text, "Tate Modern");
    assert_eq!(records[1].artists, vec!["Rothko", "Klee"]);
}

/// 壊れたJSON
#[test]
fn test_load_broken_json() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("records.json");
    std::fs::write(&path, "[{").unwrap();

    let result = loader::load_records(&path);
    assert!(matches!(result, Err(LinkageError::JsonParse(_))));
}

/// 重複IDの会場コレクションは読み込み失敗
#[test]
fn test_duplicate_venue_id_is_malformed() {
    let venue = CanonicalVenue {
        id: "dup".to_string(),
        name: "Space K".to_string(),
        ..Default::default()
    };
    let result = Linker::new(vec![venue.clone(), venue], LinkageOptions::default());
    let err: LinkageError = result.err().expect("重複IDが通ってしまった").into();

    assert!(matches!(err, LinkageError::Common(_)));
    assert!(err.to_string().contains("dup"), "{}", err);
}

/// LinkageErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        LinkageError::Config("テスト設定エラー".to_string()),
        LinkageError::FileNotFound("venues.json".to_string()),
        LinkageError::FolderNotFound("/path/to/folder".to_string()),
        LinkageError::InvalidInput("配列ではない".to_string()),
        LinkageError::NoRecordsFound("records".to_string()),
        LinkageError::ExcelGeneration("Excel生成エラー".to_string()),
        LinkageError::Interactive("入力中断".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: LinkageError = io_err.into();

    assert!(matches!(err, LinkageError::Io(_)));
    assert!(format!("{}", err).contains("IOエラー"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
    let err: LinkageError = json_err.into();

    assert!(matches!(err, LinkageError::JsonParse(_)));
    assert!(format!("{}", err).contains("JSON解析エラー"));
}
