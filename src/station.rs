//! 観測所レジストリ
//!
//! 観測所名 → (コード, ダウンロード先ディレクトリ) の静的マッピング。
//! 起動時に一度だけ構築され、以降は不変。

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::ScraperError;

/// ロンドニア州の監視対象観測所（名前, 観測所コード）
pub const DEFAULT_STATIONS: [(&str, &str); 4] = [
    ("jiparana", "15560000"),
    ("ariquemes", "15430000"),
    ("portovelho", "15400000"),
    ("guajara", "15250000"),
];

/// 水文観測所。構築後は不変。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Station {
    pub name: String,
    /// 検索クエリとして使用する数値コード
    pub code: String,
    /// この観測所専用のダウンロード先
    pub directory: PathBuf,
}

/// `$HOME/Downloads/hidro-telemetria-data` を返す。
/// HOMEが未設定の場合は `./downloads` にフォールバック。
pub fn default_base_dir() -> PathBuf {
    match home_dir() {
        Some(home) => home.join("Downloads").join("hidro-telemetria-data"),
        None => PathBuf::from("./downloads"),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// デフォルトの観測所リストからレジストリを構築
pub fn build_registry(base_dir: &Path) -> Result<Vec<Station>, ScraperError> {
    build_registry_with(&DEFAULT_STATIONS, base_dir)
}

/// 観測所ごとに `<base_dir>/<CapitalizedName>/` を作成し、レジストリを返す。
/// ディレクトリ作成は冪等（既存でもエラーにならない）。順序は入力順を保持。
pub fn build_registry_with(
    stations: &[(&str, &str)],
    base_dir: &Path,
) -> Result<Vec<Station>, ScraperError> {
    stations
        .iter()
        .map(|(name, code)| {
            let directory = base_dir.join(capitalize(name));
            std::fs::create_dir_all(&directory)?;
            info!("Station directory ready: {:?}", directory);
            Ok(Station {
                name: (*name).to_string(),
                code: (*code).to_string(),
                directory,
            })
        })
        .collect()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("jiparana"), "Jiparana");
        assert_eq!(capitalize("guajara"), "Guajara");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_registry_creates_station_directories() {
        let base = tempfile::tempdir().unwrap();
        let registry = build_registry(base.path()).unwrap();

        assert_eq!(registry.len(), 4);
        for suffix in ["Jiparana", "Ariquemes", "Portovelho", "Guajara"] {
            assert!(base.path().join(suffix).is_dir(), "missing {}", suffix);
        }

        assert_eq!(registry[0].name, "jiparana");
        assert_eq!(registry[0].code, "15560000");
        assert_eq!(registry[0].directory, base.path().join("Jiparana"));
        assert_eq!(registry[1].code, "15430000");
        assert_eq!(registry[2].code, "15400000");
        assert_eq!(registry[3].code, "15250000");
    }

    #[test]
    fn test_registry_is_idempotent() {
        let base = tempfile::tempdir().unwrap();
        let first = build_registry(base.path()).unwrap();
        let second = build_registry(base.path()).unwrap();
        assert_eq!(first, second);

        let entries: Vec<_> = std::fs::read_dir(base.path()).unwrap().collect();
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_registry_preserves_insertion_order() {
        let base = tempfile::tempdir().unwrap();
        let registry =
            build_registry_with(&[("zeta", "2"), ("alpha", "1")], base.path()).unwrap();
        let names: Vec<_> = registry.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }
}
