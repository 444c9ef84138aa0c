//! 未一致会場名の対話式確認モジュール
//!
//! linkレポートの頻出未一致会場名を順に提示し、類似会場から選んだ対応を
//! エイリアスファイルに書き出す。次回の `link --alias` で使う。

use crate::error::{LinkageError, Result};
use crate::loader;
use crate::pipeline::LinkageReport;
use dialoguer::Select;
use sayu_linkage_common::{
    normalize_name, suggest, AliasConfig, CanonicalVenue, LinkageSummary, UnmatchedName, VenueIndex,
};
use std::path::Path;

const SUGGESTION_LIMIT: usize = 5;

/// 対話アクション
pub enum ReviewAction {
    /// 会場を選択
    Link(CanonicalVenue),
    /// この名前をスキップ
    Skip,
    /// 残り全部スキップ
    SkipAll,
    /// 保存して終了
    Quit,
}

/// 確認対象の未一致名（空名・登録済みエイリアスを除く）
pub fn pending_names<'a>(summary: &'a LinkageSummary, aliases: &AliasConfig) -> Vec<&'a UnmatchedName> {
    summary
        .top_unmatched_names
        .iter()
        .filter(|u| {
            let key = normalize_name(&u.name);
            !key.is_empty() && aliases.lookup(&key).is_none()
        })
        .collect()
}

/// エイリアスの対応先にする会場名（会場名が空なら英語名）
pub fn alias_target(venue: &CanonicalVenue) -> &str {
    if venue.name.trim().is_empty() {
        &venue.name_english
    } else {
        &venue.name
    }
}

/// 対話式で未一致会場名を確認
pub fn run_interactive_review(report_path: &Path, venues_path: &Path, output_path: &Path) -> Result<()> {
    let report = LinkageReport::load(report_path)?;
    let index = VenueIndex::build(loader::load_venues(venues_path)?)?;

    let mut aliases = if output_path.exists() {
        AliasConfig::from_file(output_path)?
    } else {
        AliasConfig::default()
    };

    let pending = pending_names(&report.summary, &aliases);
    if pending.is_empty() {
        println!("✓ 確認が必要な未一致会場名はありません");
        return Ok(());
    }

    println!("🏛️ 未一致会場名: {}件", pending.len());
    println!("---\n");

    let mut added = 0;

    for (count, unmatched) in pending.iter().enumerate() {
        println!(
            "[{}/{}] {} ({}件)",
            count + 1,
            pending.len(),
            unmatched.name,
            unmatched.count
        );

        let action = prompt_review_action(&index, &unmatched.name)?;

        match action {
            ReviewAction::Link(venue) => {
                let target = alias_target(&venue).to_string();
                aliases.insert(&unmatched.name, &target);
                added += 1;
                println!("  → {} ({})\n", target, venue.id);
            }
            ReviewAction::Skip => {
                println!("  → スキップ\n");
            }
            ReviewAction::SkipAll => {
                println!("  → 残り全部スキップ\n");
                break;
            }
            ReviewAction::Quit => {
                println!("保存して終了します...");
                break;
            }
        }
    }

    if added > 0 {
        aliases.save(output_path)?;
        println!("\n✓ {}件のエイリアスを保存しました: {}", added, output_path.display());
    } else {
        println!("\n追加したエイリアスはありません");
    }

    Ok(())
}

/// 候補選択プロンプト
fn prompt_review_action(index: &VenueIndex, name: &str) -> Result<ReviewAction> {
    let suggestions = suggest(index, &normalize_name(name), SUGGESTION_LIMIT);

    if suggestions.is_empty() {
        println!("  類似する会場が見つかりません");
    }

    let mut items: Vec<String> = suggestions
        .iter()
        .map(|s| {
            let venue = s.venue.venue();
            format!(
                "{} / {} [{}] ({:.0}%)",
                venue.name,
                venue.name_english,
                venue.city,
                s.score * 100.0
            )
        })
        .collect();
    let skip_idx = items.len();
    items.push("スキップ".to_string());
    items.push("残り全部スキップ".to_string());
    items.push("保存して終了".to_string());

    let selection = Select::new()
        .with_prompt("対応する会場")
        .items(&items)
        .default(0)
        .interact()
        .map_err(|e| LinkageError::Interactive(e.to_string()))?;

    let action = match selection {
        i if i < skip_idx => ReviewAction::Link(suggestions[i].venue.venue().clone()),
        i if i == skip_idx => ReviewAction::Skip,
        i if i == skip_idx + 1 => ReviewAction::SkipAll,
        _ => ReviewAction::Quit,
    };

    Ok(action)
}
