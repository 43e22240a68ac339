//! オーケストレーションループ
//!
//! レジストリの観測所を登録順に1件ずつ処理する。失敗は観測所単位で
//! 隔離され、ログと `RunSummary` に記録された上で次の観測所へ進む。

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tokio::time::sleep;
use tracing::{error, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::snirh::SnirhScraper;
use crate::station::Station;
use crate::traits::Scraper;

/// 観測所間の待機（ポータルへの連続アクセスを避ける）
pub const STATION_PAUSE: Duration = Duration::from_secs(2);

/// 1観測所分の処理を実行する。実体は `SnirhDriver` だが、
/// ループのテストではモックに差し替える。
#[async_trait]
pub trait StationDriver: Send {
    async fn process(&mut self, station: &Station) -> Result<(), ScraperError>;
}

/// 観測所ごとに新しいブラウザセッションを立ててスクレイパーを実行するドライバ
pub struct SnirhDriver {
    base_config: ScraperConfig,
}

impl SnirhDriver {
    pub fn new(base_config: ScraperConfig) -> Self {
        Self { base_config }
    }
}

#[async_trait]
impl StationDriver for SnirhDriver {
    async fn process(&mut self, station: &Station) -> Result<(), ScraperError> {
        let mut config = self.base_config.clone();
        config.station_code = station.code.clone();
        config.download_path = station.directory.clone();

        // executeが失敗パスでもセッションを閉じる
        let mut scraper = SnirhScraper::new(config);
        scraper.execute().await
    }
}

/// 観測所1件の結果（エラーは文字列化して保持）
#[derive(Debug, Clone, Serialize)]
pub struct StationOutcome {
    pub station: String,
    pub code: String,
    pub error: Option<String>,
}

impl StationOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// 全観測所の実行結果
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub outcomes: Vec<StationOutcome>,
}

impl RunSummary {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn is_all_ok(&self) -> bool {
        self.failed() == 0
    }
}

/// 観測所を登録順に処理する。失敗しても中断せず、最後まで走り切る。
pub async fn run_stations<D: StationDriver>(
    driver: &mut D,
    stations: &[Station],
    pause: Duration,
) -> RunSummary {
    info!("Starting run for {} stations", stations.len());
    let mut outcomes = Vec::with_capacity(stations.len());

    for (i, station) in stations.iter().enumerate() {
        info!(
            "Processing station {} (code {}, dir {:?})",
            station.name.to_uppercase(),
            station.code,
            station.directory
        );

        let result = driver.process(station).await;
        let error = match result {
            Ok(()) => {
                info!("Download triggered for {}", station.name.to_uppercase());
                None
            }
            Err(e) => {
                error!("Station {} failed: {}", station.name.to_uppercase(), e);
                Some(e.to_string())
            }
        };

        outcomes.push(StationOutcome {
            station: station.name.clone(),
            code: station.code.clone(),
            error,
        });

        if i + 1 < stations.len() {
            sleep(pause).await;
        }
    }

    let summary = RunSummary { outcomes };
    info!(
        "Run finished: {} succeeded, {} failed",
        summary.succeeded(),
        summary.failed()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn station(name: &str, code: &str) -> Station {
        Station {
            name: name.to_string(),
            code: code.to_string(),
            directory: PathBuf::from("/tmp").join(name),
        }
    }

    fn registry() -> Vec<Station> {
        vec![
            station("jiparana", "15560000"),
            station("ariquemes", "15430000"),
            station("portovelho", "15400000"),
            station("guajara", "15250000"),
        ]
    }

    /// 指定した観測所だけ失敗し、処理した順序を記録するモック
    struct MockDriver {
        fail_on: Vec<&'static str>,
        processed: Vec<String>,
    }

    impl MockDriver {
        fn failing_on(fail_on: Vec<&'static str>) -> Self {
            Self {
                fail_on,
                processed: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl StationDriver for MockDriver {
        async fn process(&mut self, station: &Station) -> Result<(), ScraperError> {
            self.processed.push(station.name.clone());
            if self.fail_on.contains(&station.name.as_str()) {
                Err(ScraperError::Timeout(format!(
                    "要素 #cphCorpo_ctl01_txtPesquisa が5秒以内に現れませんでした ({})",
                    station.name
                )))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_all_stations_succeed() {
        let mut driver = MockDriver::failing_on(vec![]);
        let summary = run_stations(&mut driver, &registry(), Duration::ZERO).await;

        assert!(summary.is_all_ok());
        assert_eq!(summary.succeeded(), 4);
        assert_eq!(
            driver.processed,
            ["jiparana", "ariquemes", "portovelho", "guajara"]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_stations() {
        // ariquemesのStationSearchでタイムアウトしても後続は処理される
        let mut driver = MockDriver::failing_on(vec!["ariquemes"]);
        let summary = run_stations(&mut driver, &registry(), Duration::ZERO).await;

        assert_eq!(
            driver.processed,
            ["jiparana", "ariquemes", "portovelho", "guajara"]
        );
        assert_eq!(summary.succeeded(), 3);
        assert_eq!(summary.failed(), 1);

        let failed = &summary.outcomes[1];
        assert_eq!(failed.station, "ariquemes");
        assert!(!failed.is_success());
        assert!(failed.error.as_ref().unwrap().contains("タイムアウト"));

        assert!(summary.outcomes[2].is_success());
        assert!(summary.outcomes[3].is_success());
    }

    #[tokio::test]
    async fn test_all_failures_still_run_to_completion() {
        let mut driver =
            MockDriver::failing_on(vec!["jiparana", "ariquemes", "portovelho", "guajara"]);
        let summary = run_stations(&mut driver, &registry(), Duration::ZERO).await;

        assert_eq!(driver.processed.len(), 4);
        assert_eq!(summary.failed(), 4);
        assert!(!summary.is_all_ok());
    }

    #[test]
    fn test_summary_serializes_outcomes() {
        let summary = RunSummary {
            outcomes: vec![
                StationOutcome {
                    station: "jiparana".into(),
                    code: "15560000".into(),
                    error: None,
                },
                StationOutcome {
                    station: "ariquemes".into(),
                    code: "15430000".into(),
                    error: Some("timeout".into()),
                },
            ],
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"station\":\"jiparana\""));
        assert!(json.contains("\"error\":\"timeout\""));
    }
}
