use async_trait::async_trait;

use crate::error::ScraperError;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ブラウザ初期化
    async fn initialize(&mut self) -> Result<(), ScraperError>;

    /// エントリーページから時系列ページまでのメニュー遷移
    async fn navigate(&mut self) -> Result<(), ScraperError>;

    /// 観測所・期間フィルターを適用してエクスポートを実行
    async fn export(&mut self) -> Result<(), ScraperError>;

    /// リソース解放
    async fn close(&mut self) -> Result<(), ScraperError>;

    /// 一括実行（initialize → navigate → export）。
    /// 途中で失敗してもcloseは必ず呼ばれる。
    async fn execute(&mut self) -> Result<(), ScraperError> {
        self.initialize().await?;

        let result = match self.navigate().await {
            Ok(()) => self.export().await,
            Err(e) => Err(e),
        };
        let closed = self.close().await;

        result.and(closed)
    }
}
