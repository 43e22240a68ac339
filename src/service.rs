use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use tower::Service;
use tracing::info;

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::runner::{self, RunSummary, SnirhDriver};
use crate::station;

/// 全観測所分のダウンロード実行リクエスト
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub base_dir: PathBuf,
    pub headless: bool,
    /// Noneならデフォルトの観測所リストを使う
    pub stations: Option<Vec<(String, String)>>,
}

impl Default for ScrapeRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeRequest {
    pub fn new() -> Self {
        Self {
            base_dir: station::default_base_dir(),
            headless: true,
            stations: None,
        }
    }

    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_stations(mut self, stations: Vec<(String, String)>) -> Self {
        self.stations = Some(stations);
        self
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Debug, Clone, Default)]
pub struct ScraperService {
    // 将来的な拡張用（レートリミット、キャッシュなど）
}

impl ScraperService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = RunSummary;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        info!("Scrape request received: base_dir={:?}", req.base_dir);

        Box::pin(async move {
            // レジストリ構築（ディレクトリ作成込み）。ここの失敗だけが致命的。
            let registry = match &req.stations {
                Some(stations) => {
                    let pairs: Vec<(&str, &str)> = stations
                        .iter()
                        .map(|(name, code)| (name.as_str(), code.as_str()))
                        .collect();
                    station::build_registry_with(&pairs, &req.base_dir)?
                }
                None => station::build_registry(&req.base_dir)?,
            };

            let base_config = ScraperConfig::default().with_headless(req.headless);
            let mut driver = SnirhDriver::new(base_config);

            let summary =
                runner::run_stations(&mut driver, &registry, runner::STATION_PAUSE).await;

            info!(
                "Scrape request finished: {} succeeded, {} failed",
                summary.succeeded(),
                summary.failed()
            );

            Ok(summary)
        })
    }
}
