use anyhow::Context;
use clap::Parser;
use sayu_linkage::{cli, config, export, loader, pipeline, review};
use sayu_linkage_common::{build_aliases, repair_records, Linker, MatchFlag, MatchType};
use cli::{Cli, Commands};
use config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "sayu_linkage=debug,sayu_linkage_common=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("設定ファイルの読み込みに失敗")?;

    match cli.command {
        Commands::Link { venues, records, output, format, top, preset, alias, sequential, no_city_check } => {
            println!("🏛️ sayu-linkage - 会場照合\n");

            // 1. 読み込み
            println!("[1/3] スナップショットを読み込み中...");
            let venue_list = loader::load_venues(&venues)
                .with_context(|| format!("会場ファイル: {}", venues.display()))?;
            let record_list = loader::load_records(&records)
                .with_context(|| format!("展示レコード: {}", records.display()))?;
            println!("✔ 会場 {}件 / 展示レコード {}件\n", venue_list.len(), record_list.len());

            if record_list.is_empty() {
                return Err(sayu_linkage::error::LinkageError::NoRecordsFound(
                    records.display().to_string(),
                )
                .into());
            }

            let mut options = config.linkage.clone();
            if let Some(top) = top {
                options.top_unmatched = top;
            }
            if no_city_check {
                options.check_city = false;
            }

            let custom_alias = match &alias {
                Some(path) => Some(
                    std::fs::read_to_string(path)
                        .with_context(|| format!("エイリアスファイル: {}", path.display()))?,
                ),
                None => None,
            };
            let aliases = build_aliases(
                preset.as_deref().or(config.alias_preset.as_deref()),
                custom_alias.as_deref(),
            )?;

            let linker = Linker::new(venue_list, options)?.with_aliases(aliases);
            for skipped in linker.index().skipped() {
                println!("⚠ 会場を除外: {} (#{}) {}", skipped.id, skipped.position, skipped.reason);
            }

            // 2. 照合
            println!("[2/3] 照合中...{}", if sequential { " (逐次)" } else { "" });
            let report = pipeline::run_linkage(
                &linker,
                &record_list,
                pipeline::RunOptions { sequential, progress: !cli.verbose },
            );
            print_summary(&report);

            // 3. 出力
            println!("[3/3] レポートを出力中...");
            let output_path = output.unwrap_or_else(|| std::path::PathBuf::from("."));
            for path in export::export_report(&report, format, &output_path)? {
                println!("✔ 出力: {}", path.display());
            }

            println!("\n✅ 照合完了");
        }

        Commands::Review { report, venues, output } => {
            println!("🔍 sayu-linkage - 未一致会場名の確認\n");
            review::run_interactive_review(&report, &venues, &output)?;
        }

        Commands::Repair { input, output, dry_run } => {
            println!("🔧 sayu-linkage - レコード修復\n");

            let mut records = loader::load_raw_records(&input)?;
            let corrections = repair_records(&mut records);

            if corrections.is_empty() {
                println!("✓ 修正が必要なレコードはありません");
                return Ok(());
            }

            for c in &corrections {
                println!("  #{} {}: {} → {}", c.index, c.field, c.original, c.corrected);
            }
            println!("\n修正: {}件", corrections.len());

            if dry_run {
                println!("(ドライラン: 変更は保存していません)");
            } else {
                let output = output.unwrap_or(input);
                let json = serde_json::to_string_pretty(&records)?;
                std::fs::write(&output, json)?;
                println!("✔ 保存しました: {}", output.display());
            }
        }

        Commands::Config { set_database_url, show } => {
            let mut config = config;

            if let Some(url) = set_database_url {
                config.set_database_url(url)?;
                println!("✔ データベースURLを設定しました");
            }

            if show {
                println!("設定:");
                println!("  データベースURL: {}", if config.database.get_url().is_ok() { "設定済み" } else { "未設定" });
                println!("  サービスキー: {}", if config.database.get_service_key().is_some() { "設定済み" } else { "未設定" });
                println!("  会場テーブル: {}", config.database.venues_table);
                println!("  部分一致の最小文字数: {}", config.linkage.min_partial_len);
                println!("  未一致名の上位件数: {}", config.linkage.top_unmatched);
                println!("  都市チェック: {}", if config.linkage.check_city { "有効" } else { "無効" });
                println!("  エイリアスプリセット: {}", config.alias_preset.as_deref().unwrap_or("なし"));
            }
        }
    }

    Ok(())
}

fn print_summary(report: &pipeline::LinkageReport) {
    let summary = &report.summary;
    println!("✔ 照合完了: {}件", summary.total);
    println!("  完全一致: {}", summary.exact_count);
    println!("  部分一致: {}", summary.partial_count);
    println!("  一致なし: {}", summary.none_count);
    println!("  要確認:   {}", summary.flagged_count);
    println!("  一致率:   {:.1}%", summary.match_ratio() * 100.0);
    if !summary.duplicate_groups.is_empty() {
        println!("  重複展示: {}グループ", summary.duplicate_groups.len());
    }

    if !summary.top_unmatched_names.is_empty() {
        println!("\n  頻出の未一致会場名:");
        for u in &summary.top_unmatched_names {
            println!("    {:>4}件  {}", u.count, if u.name.is_empty() { "(空)" } else { u.name.as_str() });
        }
    }

    let numeric_partial = report
        .decisions
        .iter()
        .filter(|d| d.match_type() == MatchType::Partial)
        .filter(|d| d.has_flag(MatchFlag::NumericOnlyQuery))
        .count();
    if numeric_partial > 0 {
        println!("\n  ⚠ 数字のみの会場名による部分一致: {}件（展示室番号の可能性）", numeric_partial);
    }
    println!();
}
