//! 引数なしのエントリーポイント。デフォルトレジストリの全観測所を処理し、
//! 実行サマリーを出力して正常終了する（部分失敗でも終了コードは変えない）。

use tower::Service;
use tracing_subscriber::EnvFilter;

use hidrotelemetria_scraper::{ScrapeRequest, ScraperService};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut service = ScraperService::new();
    let request = ScrapeRequest::new();
    println!("Download base directory: {:?}", request.base_dir);

    match service.call(request).await {
        Ok(summary) => {
            for outcome in &summary.outcomes {
                match &outcome.error {
                    None => println!("OK   {} ({})", outcome.station.to_uppercase(), outcome.code),
                    Some(e) => {
                        println!("FAIL {} ({}): {}", outcome.station.to_uppercase(), outcome.code, e)
                    }
                }
            }
            match serde_json::to_string_pretty(&summary) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("サマリーのシリアライズに失敗: {}", e),
            }
        }
        Err(e) => {
            // レジストリ構築（ディレクトリ作成）の失敗のみここに来る
            eprintln!("起動エラー: {}", e);
        }
    }
}
