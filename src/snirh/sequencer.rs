//! シーケンサーの純粋部分
//!
//! 期間計算・キーストローク合成・結果リストの選択ポリシーと、
//! ページに対して評価するJavaScriptスニペットの組み立て。
//! ブラウザを持たないのでユニットテストできる。

use chrono::{Days, Local, NaiveDate, NaiveDateTime};

/// 期間フィルターの開始時刻（固定）
pub const PERIOD_START_TIME: &str = "00:00";
/// 期間フィルターの終了時刻（固定）
pub const PERIOD_END_TIME: &str = "08:00";

/// ポータルが期待する日付書式
const DATE_FORMAT: &str = "%d/%m/%Y";

/// 期間フィルターに送るキー入力1つ分
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keystroke {
    Text(String),
    Tab,
    Enter,
}

/// ダウンロード対象の期間。常に「前日00:00〜当日08:00」。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    /// 現在時刻からの期間を計算
    pub fn now() -> Self {
        Self::ending_at(Local::now().naive_local())
    }

    /// `now` の日付を終端、その前日を始端とする期間。
    /// 実行時刻の時分には依存しない。
    pub fn ending_at(now: NaiveDateTime) -> Self {
        let to = now.date();
        // NaiveDate::MIN以外では減算は失敗しない
        let from = to.checked_sub_days(Days::new(1)).unwrap_or(to);
        Self { from, to }
    }

    pub fn from_date(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn to_date(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }

    /// 開始日フィールドに流し込む複合キー入力列。
    /// Tabで日付→時刻→日付→時刻と欄を移動し、Enterでフィルターを確定する。
    pub fn keystrokes(&self) -> Vec<Keystroke> {
        vec![
            Keystroke::Text(self.from_date()),
            Keystroke::Tab,
            Keystroke::Text(PERIOD_START_TIME.to_string()),
            Keystroke::Tab,
            Keystroke::Text(self.to_date()),
            Keystroke::Tab,
            Keystroke::Text(PERIOD_END_TIME.to_string()),
            Keystroke::Tab,
            Keystroke::Enter,
        ]
    }
}

/// 観測所リストの選択ポリシー: 常に先頭エントリを選ぶ。
/// コード一致の検証はしない（複数件ヒット時の挙動は要確認のまま維持）。
pub fn selection_index(option_count: usize) -> Option<usize> {
    if option_count == 0 {
        None
    } else {
        Some(0)
    }
}

/// textContentが一致するリンクをクリックするJS。クリックできたらtrue。
pub fn click_link_by_text_js(link_text: &str) -> String {
    format!(
        r#"
        (function() {{
            var links = document.querySelectorAll('a');
            for (var i = 0; i < links.length; i++) {{
                if (links[i].textContent.trim() === '{link_text}') {{
                    links[i].click();
                    return true;
                }}
            }}
            return false;
        }})()
        "#
    )
}

/// 要素にmouseoverを送ってサブメニューを開かせるJS
pub fn hover_js(selector: &str) -> String {
    format!(
        r#"
        (function() {{
            var el = document.querySelector("{selector}");
            if (!el) {{ return false; }}
            el.dispatchEvent(new MouseEvent('mouseover', {{ bubbles: true }}));
            return true;
        }})()
        "#
    )
}

/// 入力フィールドの値を消すJS
pub fn clear_value_js(selector: &str) -> String {
    format!(
        r#"
        (function() {{
            var el = document.querySelector("{selector}");
            if (!el) {{ return false; }}
            el.value = '';
            return true;
        }})()
        "#
    )
}

/// select要素のoption数を返すJS（select要素でなければ-1）
pub fn option_count_js(selector: &str) -> String {
    format!(
        r#"
        (function() {{
            var el = document.querySelector("{selector}");
            if (!el || !el.options) {{ return -1; }}
            return el.options.length;
        }})()
        "#
    )
}

/// select要素の指定インデックスを選択しchangeイベントを発火するJS
pub fn select_option_js(selector: &str, index: usize) -> String {
    format!(
        r#"
        (function() {{
            var el = document.querySelector("{selector}");
            if (!el || !el.options || el.options.length <= {index}) {{ return false; }}
            el.selectedIndex = {index};
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return true;
        }})()
        "#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_date_range_mid_month() {
        // 2024-03-15 10:00 実行 → 14/03/2024 00:00 〜 15/03/2024 08:00
        let range = DateRange::ending_at(at(2024, 3, 15, 10, 0));
        assert_eq!(range.from_date(), "14/03/2024");
        assert_eq!(range.to_date(), "15/03/2024");
    }

    #[test]
    fn test_date_range_crosses_month_and_year() {
        let range = DateRange::ending_at(at(2024, 3, 1, 0, 30));
        assert_eq!(range.from_date(), "29/02/2024");

        let range = DateRange::ending_at(at(2025, 1, 1, 23, 59));
        assert_eq!(range.from_date(), "31/12/2024");
        assert_eq!(range.to_date(), "01/01/2025");
    }

    #[test]
    fn test_date_range_ignores_time_of_day() {
        let morning = DateRange::ending_at(at(2024, 6, 10, 0, 0));
        let night = DateRange::ending_at(at(2024, 6, 10, 23, 59));
        assert_eq!(morning, night);
    }

    #[test]
    fn test_keystroke_sequence() {
        let range = DateRange::ending_at(at(2024, 3, 15, 10, 0));
        assert_eq!(
            range.keystrokes(),
            vec![
                Keystroke::Text("14/03/2024".into()),
                Keystroke::Tab,
                Keystroke::Text("00:00".into()),
                Keystroke::Tab,
                Keystroke::Text("15/03/2024".into()),
                Keystroke::Tab,
                Keystroke::Text("08:00".into()),
                Keystroke::Tab,
                Keystroke::Enter,
            ]
        );
    }

    #[test]
    fn test_selection_always_picks_first_entry() {
        assert_eq!(selection_index(1), Some(0));
        assert_eq!(selection_index(2), Some(0));
        assert_eq!(selection_index(17), Some(0));
    }

    #[test]
    fn test_selection_with_empty_list() {
        assert_eq!(selection_index(0), None);
    }
}
