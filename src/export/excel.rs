//! Excelレポート生成
//!
//! シート構成:
//! - 集計: 件数と一致率
//! - 判定: レコードごとの照合結果
//! - 未一致: 頻出の未一致会場名（人手確認用）
//! - 重複: バッチ内の重複展示

use crate::error::{LinkageError, Result};
use crate::pipeline::LinkageReport;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet, XlsxError};
use sayu_linkage_common::MatchDecision;
use std::path::Path;

const DECISION_HEADERS: &[(&str, f64)] = &[
    ("会場名（原文）", 32.0),
    ("都市", 10.0),
    ("展示タイトル", 36.0),
    ("判定", 10.0),
    ("信頼度", 8.0),
    ("会場ID", 16.0),
    ("会場名", 28.0),
    ("会場名（英語）", 28.0),
    ("フラグ", 24.0),
];

fn excel_err(context: &str) -> impl Fn(XlsxError) -> LinkageError + '_ {
    move |e| LinkageError::ExcelGeneration(format!("{}: {}", context, e))
}

pub fn generate_excel(report: &LinkageReport, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF0F0F0))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    write_summary_sheet(workbook.add_worksheet(), report, &header_format)?;
    write_decision_sheet(workbook.add_worksheet(), &report.decisions, &header_format)?;
    write_unmatched_sheet(workbook.add_worksheet(), report, &header_format)?;
    write_duplicate_sheet(workbook.add_worksheet(), report, &header_format)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    workbook
        .save(output_path)
        .map_err(excel_err("Excel保存エラー"))?;

    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, report: &LinkageReport, header: &Format) -> Result<()> {
    sheet.set_name("集計").map_err(excel_err("シート名設定エラー"))?;
    sheet.set_column_width(0, 24.0).map_err(excel_err("列幅設定エラー"))?;
    sheet.set_column_width(1, 40.0).map_err(excel_err("列幅設定エラー"))?;

    let summary = &report.summary;
    let rows: Vec<(&str, String)> = vec![
        ("生成日時", report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ("会場スナップショット", report.snapshot_fingerprint.clone()),
        ("会場数", report.venue_count.to_string()),
        ("除外した会場", report.skipped_venues.len().to_string()),
        ("レコード数", summary.total.to_string()),
        ("完全一致", summary.exact_count.to_string()),
        ("部分一致", summary.partial_count.to_string()),
        ("一致なし", summary.none_count.to_string()),
        ("要確認（フラグ付き）", summary.flagged_count.to_string()),
        ("重複展示グループ", summary.duplicate_groups.len().to_string()),
        ("一致率", format!("{:.1}%", summary.match_ratio() * 100.0)),
    ];

    for (row, (label, value)) in rows.iter().enumerate() {
        let row = row as u32;
        sheet
            .write_string_with_format(row, 0, *label, header)
            .map_err(excel_err("ラベル書き込みエラー"))?;
        sheet
            .write_string(row, 1, value)
            .map_err(excel_err("値書き込みエラー"))?;
    }

    Ok(())
}

fn write_decision_sheet(sheet: &mut Worksheet, decisions: &[MatchDecision], header: &Format) -> Result<()> {
    sheet.set_name("判定").map_err(excel_err("シート名設定エラー"))?;

    for (col, (label, width)) in DECISION_HEADERS.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *label, header)
            .map_err(excel_err("ヘッダー書き込みエラー"))?;
        sheet
            .set_column_width(col, *width)
            .map_err(excel_err("列幅設定エラー"))?;
    }
    sheet.set_freeze_panes(1, 0).map_err(excel_err("ウィンドウ枠固定エラー"))?;

    for (i, decision) in decisions.iter().enumerate() {
        let row = i as u32 + 1;
        let record = decision.record();
        let venue = decision.matched_venue();
        let flags = decision
            .flags()
            .iter()
            .map(|f| f.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        let match_type = decision.match_type().to_string();
        let cells: [&str; 9] = [
            record.venue_name_text.as_str(),
            record.venue_city.as_deref().unwrap_or(""),
            record.title.as_deref().unwrap_or(""),
            match_type.as_str(),
            "",
            venue.map(|v| v.id.as_str()).unwrap_or(""),
            venue.map(|v| v.name.as_str()).unwrap_or(""),
            venue.map(|v| v.name_english.as_str()).unwrap_or(""),
            flags.as_str(),
        ];

        for (col, value) in cells.iter().enumerate() {
            let col = col as u16;
            if col == 4 {
                sheet
                    .write_number(row, col, decision.confidence() as f64)
                    .map_err(excel_err("値書き込みエラー"))?;
            } else {
                sheet
                    .write_string(row, col, *value)
                    .map_err(excel_err("値書き込みエラー"))?;
            }
        }
    }

    Ok(())
}

fn write_unmatched_sheet(sheet: &mut Worksheet, report: &LinkageReport, header: &Format) -> Result<()> {
    sheet.set_name("未一致").map_err(excel_err("シート名設定エラー"))?;
    sheet.set_column_width(0, 40.0).map_err(excel_err("列幅設定エラー"))?;

    sheet
        .write_string_with_format(0, 0, "会場名（原文）", header)
        .map_err(excel_err("ヘッダー書き込みエラー"))?;
    sheet
        .write_string_with_format(0, 1, "件数", header)
        .map_err(excel_err("ヘッダー書き込みエラー"))?;

    for (i, unmatched) in report.summary.top_unmatched_names.iter().enumerate() {
        let row = i as u32 + 1;
        sheet
            .write_string(row, 0, &unmatched.name)
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_number(row, 1, unmatched.count as f64)
            .map_err(excel_err("値書き込みエラー"))?;
    }

    Ok(())
}

fn write_duplicate_sheet(sheet: &mut Worksheet, report: &LinkageReport, header: &Format) -> Result<()> {
    sheet.set_name("重複").map_err(excel_err("シート名設定エラー"))?;

    let headers: [(&str, f64); 6] = [
        ("種類", 10.0),
        ("タイトル", 36.0),
        ("会場", 28.0),
        ("開始日", 12.0),
        ("類似度", 8.0),
        ("レコード位置", 20.0),
    ];
    for (col, (label, width)) in headers.iter().enumerate() {
        let col = col as u16;
        sheet
            .write_string_with_format(0, col, *label, header)
            .map_err(excel_err("ヘッダー書き込みエラー"))?;
        sheet
            .set_column_width(col, *width)
            .map_err(excel_err("列幅設定エラー"))?;
    }

    for (i, group) in report.summary.duplicate_groups.iter().enumerate() {
        let row = i as u32 + 1;
        let indices = group
            .indices
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        sheet
            .write_string(row, 0, group.kind.to_string())
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_string(row, 1, &group.title)
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_string(row, 2, &group.venue_key)
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_string(row, 3, group.start_date.as_deref().unwrap_or(""))
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_number(row, 4, group.similarity as f64)
            .map_err(excel_err("値書き込みエラー"))?;
        sheet
            .write_string(row, 5, &indices)
            .map_err(excel_err("値書き込みエラー"))?;
    }

    Ok(())
}
