use std::path::PathBuf;
use std::time::Duration;

/// SNIRHポータルのエントリーURL
pub const SNIRH_URL: &str = "https://www.snirh.gov.br/hidrotelemetria";

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// 観測所コード（検索クエリとしてそのまま送信される）
    pub station_code: String,
    pub download_path: PathBuf,
    pub entry_url: String,
    pub headless: bool,
    /// 要素出現待ちの上限
    pub element_timeout: Duration,
    /// 再レンダリング待ち（ページ側に完了シグナルがないため固定値）
    pub render_grace: Duration,
    /// エクスポート後、ダウンロード完了を待つ猶予
    pub download_grace: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            station_code: String::new(),
            download_path: PathBuf::from("./downloads"),
            entry_url: SNIRH_URL.to_string(),
            headless: true,
            element_timeout: Duration::from_secs(5),
            render_grace: Duration::from_secs(5),
            download_grace: Duration::from_secs(10),
        }
    }
}

impl ScraperConfig {
    pub fn new(station_code: impl Into<String>) -> Self {
        Self {
            station_code: station_code.into(),
            ..Default::default()
        }
    }

    pub fn with_download_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = path.into();
        self
    }

    pub fn with_entry_url(mut self, url: impl Into<String>) -> Self {
        self.entry_url = url.into();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn with_render_grace(mut self, grace: Duration) -> Self {
        self.render_grace = grace;
        self
    }

    pub fn with_download_grace(mut self, grace: Duration) -> Self {
        self.download_grace = grace;
        self
    }
}
