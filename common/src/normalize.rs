//! 会場名の正規化
//!
//! 自由記述の会場名・作家名から比較用キーを作る。
//!
//! ## 処理
//! 1. 小文字化
//! 2. 括弧付きの補足（「(Seoul)」「（서울）」など）を除去
//! 3. 空白（全角スペース含む）を単一スペースに統一し、前後を除去
//!
//! 正規化は冪等: `normalize_name(&normalize_name(x)) == normalize_name(x)`

use regex::Regex;

lazy_static::lazy_static! {
    // 最内側の括弧ペア（半角・全角の混在も許容）
    static ref QUALIFIER_RE: Regex = Regex::new(r"[(（][^()（）]*[)）]").unwrap();
    static ref NUMERIC_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

/// 会場名を比較用キーに正規化する
pub fn normalize_name(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let mut result = input.to_lowercase();

    // 入れ子の括弧に対応するため、なくなるまで繰り返す
    while QUALIFIER_RE.is_match(&result) {
        result = QUALIFIER_RE.replace_all(&result, " ").into_owned();
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Optionの会場名を正規化する（Noneは空文字）
pub fn normalize_opt(input: Option<&str>) -> String {
    input.map(normalize_name).unwrap_or_default()
}

/// 数字のみのキーか（展示室番号「407」など）
pub fn is_numeric_only(key: &str) -> bool {
    NUMERIC_RE.is_match(key)
}

/// 文字数（バイト長ではなく）
pub(crate) fn char_len(key: &str) -> usize {
    key.chars().count()
}
