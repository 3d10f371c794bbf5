//! REST APIのリクエスト先
//!
//! CLI(reqwest)とWeb(web-sys fetch)が同じパス・クエリを組み立てるための定義。
//! ボディの送り方はクライアント側の責務。

use crate::envelope::{decode_page, decode_search, FetchedPage};
use crate::error::Result;
use crate::filter::{encode_query, FilterState, ListPage};
use crate::types::ImageType;
use serde::de::DeserializeOwned;
use std::fmt;

pub const API_PREFIX: &str = "/api/v1";

/// 一覧の1ページあたり件数
pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// メソッド・パス・クエリの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    pub method: Method,
    /// `/api/v1` 以降のパス
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RequestTarget {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// 値があるときだけ付ける
    pub fn param_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    /// `/api/v1/...?...`
    pub fn path_and_query(&self) -> String {
        let mut out = format!("{}{}", API_PREFIX, self.path);
        if !self.query.is_empty() {
            out.push('?');
            out.push_str(&encode_query(
                self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            ));
        }
        out
    }

    /// ベースURLを付けた完全なURL（空のベースは同一オリジン）
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }
}

/// 一覧レスポンスの形
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{content, totalPages, ...}`
    Paged,
    /// 検索: ページオブジェクト、または配列
    Search,
}

/// 一覧取得のリクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRequest {
    pub target: RequestTarget,
    pub shape: ResponseShape,
}

impl ListRequest {
    /// レスポンスボディをページ結果に変換
    pub fn decode<T: DeserializeOwned>(&self, body: &str, page: u32) -> Result<FetchedPage<T>> {
        match self.shape {
            ResponseShape::Paged => decode_page(body, page),
            ResponseShape::Search => decode_search(body, page),
        }
    }
}

impl ListPage {
    /// フィルタとページ番号から一覧リクエストを組み立てる
    pub fn list_request(&self, filter: &FilterState, page: u32, size: u32) -> ListRequest {
        let query = filter.trimmed_query();
        match self {
            ListPage::SeasonDictionary => ListRequest {
                target: RequestTarget::get("/souls")
                    .param("page", page)
                    .param("size", size)
                    .param_opt("query", (!query.is_empty()).then_some(query))
                    .param_opt("seasonName", filter.season.as_deref()),
                shape: ResponseShape::Paged,
            },
            ListPage::TravelingEncyclopedia | ListPage::GeneralVisits if !query.is_empty() => {
                ListRequest {
                    target: search_souls(query, page, size),
                    shape: ResponseShape::Search,
                }
            }
            ListPage::TravelingEncyclopedia => ListRequest {
                target: RequestTarget::get("/souls/traveling-visits")
                    .param("page", page)
                    .param("size", size),
                shape: ResponseShape::Paged,
            },
            ListPage::GeneralVisits => ListRequest {
                target: RequestTarget::get("/souls")
                    .param("page", page)
                    .param("size", size),
                shape: ResponseShape::Paged,
            },
        }
    }
}

pub fn search_souls(query: &str, page: u32, size: u32) -> RequestTarget {
    RequestTarget::get("/souls/search")
        .param("query", query)
        .param("page", page)
        .param("size", size)
}

// 영혼

/// ピッカー用の全件
pub fn all_souls() -> RequestTarget {
    RequestTarget::get("/souls/all")
}

pub fn soul(id: i64) -> RequestTarget {
    RequestTarget::get(format!("/souls/{}", id))
}

pub fn create_soul() -> RequestTarget {
    RequestTarget::new(Method::Post, "/souls")
}

pub fn update_soul(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Put, format!("/souls/{}", id))
}

pub fn delete_soul(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Delete, format!("/souls/{}", id))
}

/// シーズンに属する영혼
pub fn souls_in_season(season_name: &str) -> RequestTarget {
    RequestTarget::get("/souls")
        .param("seasonName", season_name)
        .param("size", 100)
}

// 시즌

pub fn seasons() -> RequestTarget {
    RequestTarget::get("/seasons")
}

pub fn season(id: i64) -> RequestTarget {
    RequestTarget::get(format!("/seasons/{}", id))
}

pub fn create_season() -> RequestTarget {
    RequestTarget::new(Method::Post, "/seasons")
}

pub fn update_season(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Put, format!("/seasons/{}", id))
}

pub fn delete_season(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Delete, format!("/seasons/{}", id))
}

// 유랑 이력

pub fn traveling_visits(page: u32, size: u32) -> RequestTarget {
    RequestTarget::get("/souls/traveling-visits")
        .param("page", page)
        .param("size", size)
}

pub fn visit(id: i64) -> RequestTarget {
    RequestTarget::get(format!("/visits/{}", id))
}

pub fn create_visit() -> RequestTarget {
    RequestTarget::new(Method::Post, "/visits")
}

pub fn update_visit(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Put, format!("/visits/{}", id))
}

pub fn delete_visit(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Delete, format!("/visits/{}", id))
}

// 이미지

pub fn images(
    page: u32,
    size: u32,
    soul_id: Option<i64>,
    image_type: Option<ImageType>,
) -> RequestTarget {
    RequestTarget::get("/images")
        .param("page", page)
        .param("size", size)
        .param_opt("soulId", soul_id)
        .param_opt("imageType", image_type.map(|t| t.as_str()))
}

/// 영혼指定ありは `/images`（紐付け）、なしは `/images/upload`（一時アップロード）
pub fn upload_image(attach_to_soul: bool) -> RequestTarget {
    if attach_to_soul {
        RequestTarget::new(Method::Post, "/images")
    } else {
        RequestTarget::new(Method::Post, "/images/upload")
    }
}

pub fn delete_image(id: i64) -> RequestTarget {
    RequestTarget::new(Method::Delete, format!("/images/{}", id))
}

/// URL指定の削除（ボディ `{ "url": ... }`）
pub fn delete_image_by_url() -> RequestTarget {
    RequestTarget::new(Method::Delete, "/images")
}
