//! バッチ照合
//!
//! レコードごとの照合は独立しているので rayon で並列に回し、
//! 全件そろってから集計する。

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use sayu_linkage_common::{
    LinkageSummary, Linker, MalformedVenue, MatchDecision, RawExhibitionRecord, VenueIndex,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// linkコマンドの出力
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkageReport {
    pub generated_at: DateTime<Local>,
    /// 会場スナップショットの指紋（同一スナップショットの確認用）
    pub snapshot_fingerprint: String,
    pub venue_count: usize,
    #[serde(default)]
    pub skipped_venues: Vec<MalformedVenue>,
    pub summary: LinkageSummary,
    pub decisions: Vec<MatchDecision>,
}

impl LinkageReport {
    pub fn load(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// 実行オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub sequential: bool,
    /// 進捗バーを表示
    pub progress: bool,
}

/// バッチを照合してレポートを作る
pub fn run_linkage(
    linker: &Linker,
    records: &[RawExhibitionRecord],
    options: RunOptions,
) -> LinkageReport {
    let progress = if options.progress {
        let pb = ProgressBar::new(records.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let decisions: Vec<MatchDecision> = if options.sequential {
        records
            .iter()
            .map(|r| {
                let d = linker.link(r);
                progress.inc(1);
                d
            })
            .collect()
    } else {
        records
            .par_iter()
            .map(|r| {
                let d = linker.link(r);
                progress.inc(1);
                d
            })
            .collect()
    };
    progress.finish_and_clear();

    let summary = linker.summarize(&decisions);
    tracing::info!(
        total = summary.total,
        exact = summary.exact_count,
        partial = summary.partial_count,
        none = summary.none_count,
        "linkage finished"
    );

    LinkageReport {
        generated_at: Local::now(),
        snapshot_fingerprint: snapshot_fingerprint(linker.index()),
        venue_count: linker.index().len(),
        skipped_venues: linker.index().skipped().to_vec(),
        summary,
        decisions,
    }
}

/// 照合に使う会場ID・キーからSHA-256指紋を作る
pub fn snapshot_fingerprint(index: &VenueIndex) -> String {
    let mut hasher = Sha256::new();
    for entry in index.entries() {
        hasher.update(entry.venue().id.as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.name_key().as_bytes());
        hasher.update([0u8]);
        hasher.update(entry.english_key().as_bytes());
        hasher.update([0xffu8]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sayu_linkage_common::{CanonicalVenue, LinkageOptions, MatchType};

    fn linker() -> Linker {
        let venues = vec![CanonicalVenue {
            id: "v1".into(),
            name: "리움미술관".into(),
            name_english: "Leeum Museum of Art".into(),
            ..Default::default()
        }];
        Linker::new(venues, LinkageOptions::default()).unwrap()
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let linker = linker();
        let records: Vec<_> = (0..200)
            .map(|i| {
                let name = if i % 3 == 0 { "리움미술관".to_string() } else { format!("unknown {}", i) };
                RawExhibitionRecord::with_venue_name(name)
            })
            .collect();

        let parallel = run_linkage(&linker, &records, RunOptions::default());
        let sequential = run_linkage(
            &linker,
            &records,
            RunOptions { sequential: true, progress: false },
        );

        assert_eq!(parallel.decisions, sequential.decisions);
        assert_eq!(parallel.summary, sequential.summary);
        assert_eq!(parallel.decisions[0].match_type(), MatchType::Exact);
        assert_eq!(parallel.decisions[1].match_type(), MatchType::None);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = snapshot_fingerprint(linker().index());
        let b = snapshot_fingerprint(linker().index());
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);

        let empty = Linker::new(Vec::new(), LinkageOptions::default()).unwrap();
        assert_ne!(a, snapshot_fingerprint(empty.index()));
    }
}
