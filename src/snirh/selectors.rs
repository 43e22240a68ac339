//! セレクタレジストリ
//!
//! シーケンサーが触るDOM識別子はすべてここに集約する。
//! ポータル側のマークアップ変更への追従はこのファイルだけで済ませる。

/// トップページの「Acesso ao Mapa」リンク（textContent完全一致で検索）
pub const MAP_ACCESS_LINK_TEXT: &str = "Acesso ao Mapa";

/// 「Visualizar Dados」メニュー項目（ホバーでサブメニューが開く）
pub const DATA_MENU_ITEM: &str = "li.has-popup.static[aria-haspopup='Menu1:submenu:7'] a";

/// サブメニュー内の時系列ページへのリンク
pub const HISTORICAL_SERIES_LINK: &str =
    "ul[id='Menu1:submenu:7'] a[href='serieHistorica.aspx']";

/// 観測所コード検索ボックス
pub const STATION_SEARCH_INPUT: &str = "#cphCorpo_ctl01_txtPesquisa";

/// 検索結果の観測所リスト（select要素）
pub const STATION_LIST: &str = "#cphCorpo_ctl01_lstEstacoes";

/// 期間フィルターの開始日フィールド
pub const PERIOD_FROM_INPUT: &str = "#cphCorpo_ctl01_txtPeriodoDe";

/// エクスポートボタン
pub const EXPORT_BUTTON: &str = "#cphCorpo_btExportar";
