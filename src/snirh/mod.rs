//! SNIRH hidrotelemetria スクレイパーモジュール
//!
//! ポータルのメニュー遷移 → 観測所フィルター → 期間フィルター → エクスポート
//! を1観測所=1ブラウザセッションで実行する。

pub mod selectors;
mod sequencer;
mod scraper;

pub use scraper::SnirhScraper;
pub use sequencer::{selection_index, DateRange, Keystroke};
