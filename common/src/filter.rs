//! 一覧ページのフィルタ状態
//!
//! URLのクエリ文字列が唯一の正。コンポーネント側の状態はこれを写すだけ。
//! ページによって使うパラメータが異なる:
//!
//! | ページ | mode | query | season | warband |
//! |---|---|---|---|---|
//! | 시즌 대백과 | o (既定 card) | o | o | - |
//! | 유랑 대백과 | - | o | - | o |
//! | 일반 유랑 목록 | o (既定 list) | o | - | - |

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// URLSearchParams 相当のエンコード対象（英数字と `-_.~` 以外）
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// 表示モード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Card,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Card => "card",
            ViewMode::List => "list",
        }
    }

    /// 表示名
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Card => "카드",
            ViewMode::List => "리스트",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            ViewMode::Card => ViewMode::List,
            ViewMode::List => ViewMode::Card,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" | "c" => Ok(ViewMode::Card),
            "list" | "l" => Ok(ViewMode::List),
            _ => Err(format!("Unknown view mode: {}. Use card or list", s)),
        }
    }
}

/// 無限スクロールを持つ一覧ページ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListPage {
    /// 시즌 대백과（영혼一覧）
    SeasonDictionary,
    /// 유랑 대백과（復刻訪問の時系列）
    TravelingEncyclopedia,
    /// 일반 유랑 목록（영혼一覧、検索もページング）
    GeneralVisits,
}

impl ListPage {
    /// セッションストレージのキー接頭辞
    pub fn cache_prefix(&self) -> &'static str {
        match self {
            ListPage::SeasonDictionary => "seasonDict",
            ListPage::TravelingEncyclopedia => "travelingEncy",
            ListPage::GeneralVisits => "soulListState_v1",
        }
    }

    /// Web版のパス
    pub fn path(&self) -> &'static str {
        match self {
            ListPage::SeasonDictionary => "/sky/SeasonDictionary",
            ListPage::TravelingEncyclopedia => "/sky/travelingSprits/travelingEncyclopedia",
            ListPage::GeneralVisits => "/sky/travelingSprits/generalVisits/list",
        }
    }

    pub fn default_view_mode(&self) -> ViewMode {
        match self {
            ListPage::SeasonDictionary => ViewMode::Card,
            ListPage::TravelingEncyclopedia | ListPage::GeneralVisits => ViewMode::List,
        }
    }

    /// 表示切替があるページか
    pub fn uses_mode(&self) -> bool {
        !matches!(self, ListPage::TravelingEncyclopedia)
    }

    pub fn uses_season(&self) -> bool {
        matches!(self, ListPage::SeasonDictionary)
    }

    pub fn uses_warband(&self) -> bool {
        matches!(self, ListPage::TravelingEncyclopedia)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ListPage::SeasonDictionary => "시즌 대백과",
            ListPage::TravelingEncyclopedia => "유랑 대백과",
            ListPage::GeneralVisits => "일반 유랑 목록",
        }
    }
}

/// フィルタ状態
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub query: String,
    pub season: Option<String>,
    pub view_mode: ViewMode,
    pub warband: bool,
}

impl FilterState {
    /// ページの既定値
    pub fn defaults(page: ListPage) -> Self {
        Self {
            view_mode: page.default_view_mode(),
            ..Default::default()
        }
    }

    /// クエリ文字列から復元（欠けたパラメータは既定値）
    ///
    /// 先頭の `?` はあってもなくてもよい。
    pub fn from_query(page: ListPage, query_string: &str) -> Self {
        let mut state = Self::defaults(page);
        for (key, value) in parse_query(query_string) {
            match key.as_str() {
                "mode" if page.uses_mode() => {
                    if let Ok(mode) = value.parse() {
                        state.view_mode = mode;
                    }
                }
                "query" => state.query = value,
                "season" if page.uses_season() && !value.is_empty() => {
                    state.season = Some(value)
                }
                "warband" if page.uses_warband() => state.warband = value == "true",
                _ => {}
            }
        }
        state
    }

    /// URLに載せるクエリ文字列（`?` なし）
    pub fn to_query(&self, page: ListPage) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if page.uses_mode() {
            pairs.push(("mode", self.view_mode.as_str().to_string()));
        }
        if !self.query.is_empty() {
            pairs.push(("query", self.query.clone()));
        }
        if page.uses_season() {
            if let Some(season) = &self.season {
                pairs.push(("season", season.clone()));
            }
        }
        if page.uses_warband() && self.warband {
            pairs.push(("warband", "true".to_string()));
        }
        encode_query(pairs.iter().map(|(k, v)| (*k, v.as_str())))
    }

    /// 検索モードかどうか
    pub fn is_search(&self) -> bool {
        !self.query.trim().is_empty()
    }

    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }
}

/// `a=1&b=%ED%95%9C` 形式をデコード（`+` は空白）
pub fn parse_query(query_string: &str) -> Vec<(String, String)> {
    query_string
        .trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// キーと値の組をクエリ文字列にエンコード
pub fn encode_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ENCODE_SET).to_string()
}

fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    percent_decode_str(&value).decode_utf8_lossy().into_owned()
}
