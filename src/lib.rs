//! SNIRH hidrotelemetria スクレイパー
//!
//! ブラジルSNIRHの水文テレメトリーポータルをブラウザ自動化で操作し、
//! 観測所ごとの時系列データをエクスポート（ダウンロード）する。
//! 観測所1件につきブラウザセッション1つ、完全に逐次実行。
//!
//! # 全観測所を一括実行
//!
//! ```rust,ignore
//! use hidrotelemetria_scraper::{ScrapeRequest, ScraperService};
//! use tower::Service;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut service = ScraperService::new();
//!     let request = ScrapeRequest::new().with_headless(false);
//!
//!     let summary = service.call(request).await.unwrap();
//!     println!("Succeeded: {}, failed: {}", summary.succeeded(), summary.failed());
//! }
//! ```
//!
//! # 観測所1件だけ実行
//!
//! ```rust,ignore
//! use hidrotelemetria_scraper::{Scraper, ScraperConfig, SnirhScraper};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScraperConfig::new("15400000")
//!         .with_download_path("./downloads/Portovelho");
//!
//!     let mut scraper = SnirhScraper::new(config);
//!     scraper.execute().await.unwrap();
//! }
//! ```

pub mod config;
pub mod error;
pub mod runner;
pub mod service;
pub mod snirh;
pub mod station;
pub mod traits;

// 主要な型をリエクスポート
pub use config::{ScraperConfig, SNIRH_URL};
pub use error::ScraperError;
pub use runner::{run_stations, RunSummary, SnirhDriver, StationDriver, StationOutcome};
pub use service::{ScrapeRequest, ScraperService};
pub use snirh::{DateRange, SnirhScraper};
pub use station::{build_registry, default_base_dir, Station, DEFAULT_STATIONS};
pub use traits::Scraper;
