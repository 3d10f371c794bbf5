//! APIレスポンスのエンベロープ
//!
//! バックエンドは全て `{ "data": ... }` で包んで返す。
//! 一覧系は `data` がページオブジェクト
//! `{ content, totalPages, totalElements, last }` になる。

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// 失敗時に表示する汎用メッセージ
pub const GENERIC_ERROR_MESSAGE: &str = "데이터를 불러오는 중 오류가 발생했습니다.";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
}

/// ページオブジェクト
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: Option<u32>,
    #[serde(default)]
    pub total_elements: Option<u64>,
    #[serde(default)]
    pub last: Option<bool>,
}

impl<T> Page<T> {
    /// `page` 番目として受け取った時の総ページ数
    ///
    /// `last: true` は `totalPages` より優先する。
    pub fn effective_total_pages(&self, page: u32) -> u32 {
        match (self.last, self.total_pages) {
            (Some(true), _) => page + 1,
            (_, Some(total)) => total,
            (Some(false), None) => page + 2,
            (None, None) => page + 1,
        }
    }

    pub fn into_fetched(self, page: u32) -> FetchedPage<T> {
        let total_pages = self.effective_total_pages(page);
        let total_elements = self
            .total_elements
            .unwrap_or(self.content.len() as u64);
        FetchedPage {
            items: self.content,
            total_pages,
            total_elements,
        }
    }
}

/// 検索エンドポイントのレスポンス
///
/// デプロイによって配列のみ、またはページオブジェクトが返る。
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload<T> {
    Flat(Vec<T>),
    Paged(Page<T>),
}

/// ローダーに渡す1ページ分の結果
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
    pub total_elements: u64,
}

impl<T> FetchedPage<T> {
    /// ページングなしの配列を完結した1ページとして扱う
    pub fn single(items: Vec<T>, page: u32) -> Self {
        let total_elements = items.len() as u64;
        Self {
            items,
            total_pages: page + 1,
            total_elements,
        }
    }
}

/// `data` を取り出す
pub fn decode_data<T: DeserializeOwned>(body: &str) -> Result<T> {
    let envelope: Envelope<T> = serde_json::from_str(body)?;
    envelope
        .data
        .ok_or_else(|| Error::Envelope("응답에 data가 없습니다".into()))
}

/// ページングされた一覧を取り出す
pub fn decode_page<T: DeserializeOwned>(body: &str, page: u32) -> Result<FetchedPage<T>> {
    let data: Page<T> = decode_data(body)?;
    Ok(data.into_fetched(page))
}

/// 検索結果を取り出す（配列・ページの両形式に対応）
pub fn decode_search<T: DeserializeOwned>(body: &str, page: u32) -> Result<FetchedPage<T>> {
    match decode_data::<SearchPayload<T>>(body)? {
        SearchPayload::Paged(data) => Ok(data.into_fetched(page)),
        SearchPayload::Flat(items) => {
            tracing::warn!(
                count = items.len(),
                "search endpoint returned an unpaginated array; treating it as one complete page"
            );
            Ok(FetchedPage::single(items, page))
        }
    }
}

/// エラーボディからサーバーのメッセージを抽出
///
/// `{ "message": ... }` と `{ "error": { "message": ... } }` の両方を見る。
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = value
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| {
            value
                .get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
        })?;
    let message = message.trim();
    if message.is_empty() {
        None
    } else {
        Some(message.to_string())
    }
}

/// 2xx以外のレスポンスをエラーに変換
pub fn http_error(status: u16, body: &str) -> Error {
    let message = server_message(body).unwrap_or_else(|| format!("HTTP error! status: {}", status));
    Error::Http { status, message }
}
