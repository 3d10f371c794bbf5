//! REST APIクライアント（web-sys fetch）
//!
//! リクエスト先とエンベロープの展開はCLIと同じ `common` を使う。

use serde::de::DeserializeOwned;
use serde::Serialize;
use sky_souls_common::endpoint::{self, ListRequest, RequestTarget};
use sky_souls_common::envelope::{decode_data, http_error};
use sky_souls_common::types::{SeasonPayload, SoulPayload, UploadedImage};
use sky_souls_common::{Error, FetchedPage, ImageType, Result, Season, Soul};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

/// ビルド時に指定するAPIのベースURL（空なら同一オリジン）
const API_BASE_URL: &str = match option_env!("SKY_SOULS_API_URL") {
    Some(url) => url,
    None => "",
};

fn js_error(value: JsValue) -> Error {
    Error::Network(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

enum Body {
    Empty,
    Json(String),
    Form(FormData),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WebApi;

impl WebApi {
    async fn execute(&self, target: &RequestTarget, body: Body) -> Result<String> {
        let url = target.url(API_BASE_URL.trim_end_matches('/'));

        let init = RequestInit::new();
        init.set_method(target.method.as_str());
        init.set_mode(RequestMode::Cors);
        let is_json = matches!(body, Body::Json(_));
        match body {
            Body::Empty => {}
            Body::Json(text) => init.set_body(&JsValue::from_str(&text)),
            Body::Form(form) => init.set_body(&form),
        }

        let request = Request::new_with_str_and_init(&url, &init).map_err(js_error)?;
        if is_json {
            request
                .headers()
                .set("Content-Type", "application/json")
                .map_err(js_error)?;
        }

        let window = web_sys::window().ok_or_else(|| Error::Network("window is unavailable".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            gloo::console::warn!(format!("{} {} -> {}", target.method, url, response.status()));
            return Err(http_error(response.status(), &text));
        }
        Ok(text)
    }

    async fn get_data<T: DeserializeOwned>(&self, target: &RequestTarget) -> Result<T> {
        let body = self.execute(target, Body::Empty).await?;
        decode_data(&body)
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        target: &RequestTarget,
        payload: &B,
    ) -> Result<T> {
        let body = self
            .execute(target, Body::Json(serde_json::to_string(payload)?))
            .await?;
        decode_data(&body)
    }

    pub async fn fetch_list<T: DeserializeOwned>(
        &self,
        request: &ListRequest,
        page: u32,
    ) -> Result<FetchedPage<T>> {
        let body = self.execute(&request.target, Body::Empty).await?;
        request.decode(&body, page)
    }

    pub async fn soul(&self, id: i64) -> Result<Soul> {
        self.get_data(&endpoint::soul(id)).await
    }

    pub async fn update_soul(&self, id: i64, payload: &SoulPayload) -> Result<Soul> {
        self.send_json(&endpoint::update_soul(id), payload).await
    }

    pub async fn delete_soul(&self, id: i64) -> Result<()> {
        self.execute(&endpoint::delete_soul(id), Body::Empty).await?;
        Ok(())
    }

    pub async fn seasons(&self) -> Result<Vec<Season>> {
        self.get_data(&endpoint::seasons()).await
    }

    pub async fn create_season(&self, payload: &SeasonPayload) -> Result<Season> {
        self.send_json(&endpoint::create_season(), payload).await
    }

    pub async fn delete_season(&self, id: i64) -> Result<()> {
        self.execute(&endpoint::delete_season(id), Body::Empty).await?;
        Ok(())
    }

    pub async fn all_souls(&self) -> Result<Vec<Soul>> {
        self.get_data(&endpoint::all_souls()).await
    }

    /// 画像アップロード（`soul_id` 指定時は영혼に紐付け）
    pub async fn upload_image(
        &self,
        file: &File,
        image_type: ImageType,
        soul_id: Option<i64>,
    ) -> Result<UploadedImage> {
        let form = FormData::new().map_err(js_error)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(js_error)?;
        form.append_with_str("imageType", image_type.as_str())
            .map_err(js_error)?;
        if let Some(id) = soul_id {
            form.append_with_str("soulId", &id.to_string())
                .map_err(js_error)?;
        }

        let target = endpoint::upload_image(soul_id.is_some());
        let body = self.execute(&target, Body::Form(form)).await?;
        decode_data(&body)
    }

    pub async fn delete_image_by_url(&self, url: &str) -> Result<()> {
        let payload = serde_json::json!({ "url": url });
        self.execute(
            &endpoint::delete_image_by_url(),
            Body::Json(serde_json::to_string(&payload)?),
        )
        .await?;
        Ok(())
    }
}
