use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::browser::{
    SetDownloadBehaviorBehavior, SetDownloadBehaviorParams,
};
use chromiumoxide::element::Element;
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::traits::Scraper;

use super::selectors;
use super::sequencer::{self, DateRange, Keystroke};

/// 要素出現待ちのポーリング間隔
const POLL_INTERVAL_MS: u64 = 250;

/// SNIRHポータルを1観測所分駆動するスクレイパー。
/// セッション（ブラウザ＋ページ）はこの構造体が所有し、外に漏れない。
pub struct SnirhScraper {
    config: ScraperConfig,
    browser: Option<Browser>,
    page: Option<Arc<Page>>,
}

impl SnirhScraper {
    pub fn new(config: ScraperConfig) -> Self {
        Self {
            config,
            browser: None,
            page: None,
        }
    }

    fn get_page(&self) -> Result<&Arc<Page>, ScraperError> {
        self.page
            .as_ref()
            .ok_or_else(|| ScraperError::BrowserInit("ブラウザが初期化されていません".into()))
    }

    /// セレクタに一致する要素が現れるまでポーリング。
    /// `element_timeout` 以内に現れなければTimeout。
    async fn wait_for_element(
        &self,
        page: &Page,
        selector: &str,
    ) -> Result<Element, ScraperError> {
        let start = std::time::Instant::now();
        loop {
            if let Ok(element) = page.find_element(selector).await {
                return Ok(element);
            }

            if start.elapsed() > self.config.element_timeout {
                return Err(ScraperError::Timeout(format!(
                    "要素 {} が{}秒以内に現れませんでした",
                    selector,
                    self.config.element_timeout.as_secs()
                )));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// JSスニペットがtrueを返すまでポーリング
    async fn wait_until_js_true(
        &self,
        page: &Page,
        js: &str,
        what: &str,
    ) -> Result<(), ScraperError> {
        let start = std::time::Instant::now();
        loop {
            let done: bool = page
                .evaluate(js)
                .await
                .map(|v| v.into_value().unwrap_or(false))
                .unwrap_or(false);
            if done {
                return Ok(());
            }

            if start.elapsed() > self.config.element_timeout {
                return Err(ScraperError::Timeout(format!(
                    "{} が{}秒以内に現れませんでした",
                    what,
                    self.config.element_timeout.as_secs()
                )));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    /// 入力フィールドの値を消す
    async fn clear_input(&self, page: &Page, selector: &str) -> Result<(), ScraperError> {
        let js = sequencer::clear_value_js(selector);
        let cleared: bool = page
            .evaluate(js.as_str())
            .await
            .map(|v| v.into_value().unwrap_or(false))
            .unwrap_or(false);
        if !cleared {
            return Err(ScraperError::Interaction(format!(
                "入力欄 {} をクリアできませんでした",
                selector
            )));
        }
        Ok(())
    }

    /// 観測所コードで検索し、結果リストの先頭エントリを選択
    async fn filter_station(&self, page: &Page) -> Result<(), ScraperError> {
        info!("Filtering station code {}", self.config.station_code);

        let search_input = self
            .wait_for_element(page, selectors::STATION_SEARCH_INPUT)
            .await?;
        self.clear_input(page, selectors::STATION_SEARCH_INPUT)
            .await?;
        search_input
            .type_str(&self.config.station_code)
            .await
            .map_err(|e| ScraperError::Interaction(format!("観測所コード入力: {}", e)))?
            .press_key("Enter")
            .await
            .map_err(|e| ScraperError::Interaction(format!("検索確定: {}", e)))?;
        debug!("Station code submitted");

        // 結果リストは非同期に差し替わり、完了シグナルが観測できない
        sleep(self.config.render_grace).await;
        self.wait_for_element(page, selectors::STATION_LIST).await?;

        let count_js = sequencer::option_count_js(selectors::STATION_LIST);
        let count: i64 = page
            .evaluate(count_js.as_str())
            .await
            .map_err(|e| ScraperError::Interaction(format!("観測所リスト読み取り: {}", e)))?
            .into_value()
            .unwrap_or(-1);

        let index = selection_index_checked(count)?;
        let select_js = sequencer::select_option_js(selectors::STATION_LIST, index);
        let selected: bool = page
            .evaluate(select_js.as_str())
            .await
            .map(|v| v.into_value().unwrap_or(false))
            .unwrap_or(false);
        if !selected {
            return Err(ScraperError::Interaction(
                "観測所リストのエントリを選択できませんでした".into(),
            ));
        }
        debug!("Selected station list entry {} of {}", index, count);

        Ok(())
    }

    /// 期間フィルターを「前日00:00〜当日08:00」に設定
    async fn filter_date(&self, page: &Page) -> Result<(), ScraperError> {
        sleep(self.config.render_grace).await;

        let range = DateRange::now();
        info!("Setting period {} - {}", range.from_date(), range.to_date());

        let date_input = self
            .wait_for_element(page, selectors::PERIOD_FROM_INPUT)
            .await?;
        self.clear_input(page, selectors::PERIOD_FROM_INPUT).await?;

        for key in range.keystrokes() {
            match key {
                Keystroke::Text(text) => date_input.type_str(&text).await,
                Keystroke::Tab => date_input.press_key("Tab").await,
                Keystroke::Enter => date_input.press_key("Enter").await,
            }
            .map_err(|e| ScraperError::Interaction(format!("期間入力: {}", e)))?;
        }
        debug!("Period filter submitted");

        Ok(())
    }

    /// エクスポートボタンをクリックし、ダウンロード完了の猶予を置く
    async fn trigger_export(&self, page: &Page) -> Result<(), ScraperError> {
        sleep(self.config.render_grace).await;

        self.wait_for_element(page, selectors::EXPORT_BUTTON)
            .await?
            .click()
            .await
            .map_err(|e| ScraperError::Interaction(format!("エクスポートクリック: {}", e)))?;
        info!("Export triggered");

        // ダウンロードはブラウザ側で進むので、閉じる前に猶予を置く
        sleep(self.config.download_grace).await;

        Ok(())
    }
}

/// 選択ポリシーを適用し、リストが空ならエラー
fn selection_index_checked(option_count: i64) -> Result<usize, ScraperError> {
    if option_count < 0 {
        return Err(ScraperError::ElementNotFound(
            "観測所リストがselect要素ではありません".into(),
        ));
    }
    sequencer::selection_index(option_count as usize).ok_or_else(|| {
        ScraperError::ElementNotFound("観測所コードに一致するエントリがありません".into())
    })
}

#[async_trait]
impl Scraper for SnirhScraper {
    async fn initialize(&mut self) -> Result<(), ScraperError> {
        info!("Initializing browser for station {}", self.config.station_code);

        // ダウンロードディレクトリを作成（冪等）
        std::fs::create_dir_all(&self.config.download_path)?;

        let download_path = self
            .config
            .download_path
            .canonicalize()
            .unwrap_or_else(|_| self.config.download_path.clone());

        // ユニークなユーザーデータディレクトリを生成
        let unique_id = format!(
            "{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        );
        let user_data_dir = std::env::temp_dir().join(format!("hidrotelemetria-{}", unique_id));

        // Chrome パスを取得
        let chrome_path = std::env::var("CHROME_PATH")
            .or_else(|_| std::env::var("CHROMIUM_PATH"))
            .unwrap_or_else(|_| "chromium".to_string());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .user_data_dir(&user_data_dir)
            .window_size(1280, 800)
            .no_sandbox()
            .request_timeout(Duration::from_secs(60))
            .arg("--disable-dev-shm-usage");

        if !self.config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("ブラウザ設定エラー: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ブラウザイベントハンドラをバックグラウンドで実行
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                debug!("Browser event: {:?}", event);
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ScraperError::BrowserInit(e.to_string()))?;

        // ダウンロードは確認なしで指定ディレクトリへ（ファイル名はサーバー側のまま）
        let download_params = SetDownloadBehaviorParams::builder()
            .behavior(SetDownloadBehaviorBehavior::Allow)
            .download_path(download_path.to_string_lossy().to_string())
            .build()
            .map_err(|e| ScraperError::BrowserInit(format!("ダウンロード設定エラー: {}", e)))?;

        page.execute(download_params)
            .await
            .map_err(|e| ScraperError::BrowserInit(format!("ダウンロード設定エラー: {}", e)))?;

        self.browser = Some(browser);
        self.page = Some(Arc::new(page));

        info!("Browser initialized");
        Ok(())
    }

    /// トップページ → メニュー → 時系列ページ
    async fn navigate(&mut self) -> Result<(), ScraperError> {
        let page = self.get_page()?.clone();
        info!("Navigating to historical series page...");

        page.goto(self.config.entry_url.as_str())
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        page.wait_for_navigation()
            .await
            .map_err(|e| ScraperError::Navigation(e.to_string()))?;
        debug!("Entry page loaded");

        // 「Acesso ao Mapa」はtextContentでしか特定できないのでJSでクリック
        self.wait_until_js_true(
            &page,
            &sequencer::click_link_by_text_js(selectors::MAP_ACCESS_LINK_TEXT),
            selectors::MAP_ACCESS_LINK_TEXT,
        )
        .await?;
        debug!("Map access link clicked");

        // 「Visualizar Dados」メニューはホバーでサブメニューが開く
        self.wait_for_element(&page, selectors::DATA_MENU_ITEM)
            .await?;
        let hover_js = sequencer::hover_js(selectors::DATA_MENU_ITEM);
        let hovered: bool = page
            .evaluate(hover_js.as_str())
            .await
            .map(|v| v.into_value().unwrap_or(false))
            .unwrap_or(false);
        if !hovered {
            return Err(ScraperError::Interaction(
                "メニュー項目にホバーできませんでした".into(),
            ));
        }
        debug!("Data menu hovered");

        self.wait_for_element(&page, selectors::HISTORICAL_SERIES_LINK)
            .await?
            .click()
            .await
            .map_err(|e| ScraperError::Navigation(format!("時系列ページリンク: {}", e)))?;
        debug!("Historical series link clicked");

        Ok(())
    }

    /// 観測所フィルター → 期間フィルター → エクスポート
    async fn export(&mut self) -> Result<(), ScraperError> {
        let page = self.get_page()?.clone();

        self.filter_station(&page).await?;
        self.filter_date(&page).await?;
        self.trigger_export(&page).await?;

        info!("Export completed for station {}", self.config.station_code);
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        info!("Closing browser...");

        // ページとブラウザの参照を解放
        self.page = None;
        self.browser = None;

        Ok(())
    }
}
