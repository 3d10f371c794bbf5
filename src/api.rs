//! REST APIクライアント（reqwest）
//!
//! リクエスト先は `sky_souls_common::endpoint` で組み立て、
//! ここでは送信とエンベロープの展開だけを行う。

use crate::error::Result;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sky_souls_common::endpoint::{self, ListRequest, Method, RequestTarget};
use sky_souls_common::envelope::{decode_data, decode_page, http_error};
use sky_souls_common::types::{
    ImageRecord, SeasonPayload, SoulPayload, UploadedImage, VisitPayload,
};
use sky_souls_common::{Error, FetchedPage, ImageType, Season, Soul, TravelingVisit, VisitRecord};
use std::time::Duration;

/// アップロードするファイル
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

enum Body<'a, B: Serialize> {
    Empty,
    Json(&'a B),
    Multipart(Form),
}

impl ApiClient {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn execute<B: Serialize>(
        &self,
        target: &RequestTarget,
        body: Body<'_, B>,
    ) -> sky_souls_common::Result<String> {
        let url = target.url(&self.base_url);
        tracing::debug!(method = %target.method, %url, "request");

        let builder = match target.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Delete => self.http.delete(&url),
        };
        let builder = match body {
            Body::Empty => builder,
            Body::Json(payload) => builder.json(payload),
            Body::Multipart(form) => builder.multipart(form),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::debug!(status = status.as_u16(), body = %text, "request failed");
            return Err(http_error(status.as_u16(), &text));
        }
        Ok(text)
    }

    async fn get_data<T: DeserializeOwned>(&self, target: &RequestTarget) -> Result<T> {
        let body = self.execute::<()>(target, Body::Empty).await?;
        Ok(decode_data(&body)?)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        target: &RequestTarget,
        payload: &B,
    ) -> Result<T> {
        let body = self.execute(target, Body::Json(payload)).await?;
        Ok(decode_data(&body)?)
    }

    /// 削除系（レスポンスボディは見ない）
    async fn send_without_data(&self, target: &RequestTarget) -> Result<()> {
        self.execute::<()>(target, Body::Empty).await?;
        Ok(())
    }

    /// 一覧の1ページ（一覧エンジンにそのまま渡せるよう共通エラーで返す）
    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: &ListRequest,
        page: u32,
    ) -> sky_souls_common::Result<FetchedPage<T>> {
        let body = self.execute::<()>(&request.target, Body::Empty).await?;
        request.decode(&body, page)
    }

    // 영혼

    pub async fn soul(&self, id: i64) -> Result<Soul> {
        self.get_data(&endpoint::soul(id)).await
    }

    pub async fn all_souls(&self) -> Result<Vec<Soul>> {
        self.get_data(&endpoint::all_souls()).await
    }

    pub async fn create_soul(&self, payload: &SoulPayload) -> Result<Soul> {
        self.send_json(&endpoint::create_soul(), payload).await
    }

    pub async fn update_soul(&self, id: i64, payload: &SoulPayload) -> Result<Soul> {
        self.send_json(&endpoint::update_soul(id), payload).await
    }

    pub async fn delete_soul(&self, id: i64) -> Result<()> {
        self.send_without_data(&endpoint::delete_soul(id)).await
    }

    pub async fn souls_in_season(&self, season_name: &str) -> Result<Vec<Soul>> {
        let body = self
            .execute::<()>(&endpoint::souls_in_season(season_name), Body::Empty)
            .await?;
        let page: FetchedPage<Soul> = decode_page(&body, 0)?;
        Ok(page.items)
    }

    // 시즌

    pub async fn seasons(&self) -> Result<Vec<Season>> {
        self.get_data(&endpoint::seasons()).await
    }

    pub async fn season(&self, id: i64) -> Result<Season> {
        self.get_data(&endpoint::season(id)).await
    }

    pub async fn create_season(&self, payload: &SeasonPayload) -> Result<Season> {
        self.send_json(&endpoint::create_season(), payload).await
    }

    pub async fn update_season(&self, id: i64, payload: &SeasonPayload) -> Result<Season> {
        self.send_json(&endpoint::update_season(id), payload).await
    }

    pub async fn delete_season(&self, id: i64) -> Result<()> {
        self.send_without_data(&endpoint::delete_season(id)).await
    }

    // 유랑 이력

    pub async fn traveling_visits(&self, page: u32, size: u32) -> Result<FetchedPage<TravelingVisit>> {
        let body = self
            .execute::<()>(&endpoint::traveling_visits(page, size), Body::Empty)
            .await?;
        Ok(decode_page(&body, page)?)
    }

    pub async fn visit(&self, id: i64) -> Result<VisitRecord> {
        self.get_data(&endpoint::visit(id)).await
    }

    pub async fn create_visit(&self, payload: &VisitPayload) -> Result<VisitRecord> {
        self.send_json(&endpoint::create_visit(), payload).await
    }

    pub async fn update_visit(&self, id: i64, payload: &VisitPayload) -> Result<VisitRecord> {
        self.send_json(&endpoint::update_visit(id), payload).await
    }

    pub async fn delete_visit(&self, id: i64) -> Result<()> {
        self.send_without_data(&endpoint::delete_visit(id)).await
    }

    // 이미지

    pub async fn images(
        &self,
        page: u32,
        size: u32,
        soul_id: Option<i64>,
        image_type: Option<ImageType>,
    ) -> Result<FetchedPage<ImageRecord>> {
        let body = self
            .execute::<()>(
                &endpoint::images(page, size, soul_id, image_type),
                Body::Empty,
            )
            .await?;
        Ok(decode_page(&body, page)?)
    }

    /// 画像をアップロードしてURLを返す
    ///
    /// `soul_id` があれば영혼に紐付け、なければ一時アップロード。
    pub async fn upload_image(
        &self,
        file: UploadFile,
        image_type: ImageType,
        soul_id: Option<i64>,
    ) -> Result<UploadedImage> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("imageType", image_type.as_str());
        if let Some(id) = soul_id {
            form = form.text("soulId", id.to_string());
        }

        let target = endpoint::upload_image(soul_id.is_some());
        let body = self.execute::<()>(&target, Body::Multipart(form)).await?;
        Ok(decode_data(&body)?)
    }

    pub async fn delete_image(&self, id: i64) -> Result<()> {
        self.send_without_data(&endpoint::delete_image(id)).await
    }

    pub async fn delete_image_by_url(&self, url: &str) -> Result<()> {
        let payload = serde_json::json!({ "url": url });
        self.execute(&endpoint::delete_image_by_url(), Body::Json(&payload))
            .await?;
        Ok(())
    }
}
