//! 영혼への画像アップロード

use super::alert_error;
use crate::api::WebApi;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sky_souls_common::forms::validate_upload;
use sky_souls_common::{ImageType, Soul};
use web_sys::File;

#[component]
pub fn ImageUploadPage() -> impl IntoView {
    let souls = RwSignal::new(Vec::<Soul>::new());
    let soul_id = RwSignal::new(String::new());
    let image_type = RwSignal::new(ImageType::Representative);
    let file = RwSignal::new_local(None::<File>);
    let uploading = RwSignal::new(false);
    let uploaded_url = RwSignal::new(None::<String>);

    spawn_local(async move {
        match WebApi.all_souls().await {
            Ok(mut list) => {
                list.sort_by(|a, b| a.name.cmp(&b.name));
                souls.try_set(list);
            }
            Err(err) => alert_error(&err),
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Ok(id) = soul_id.get_untracked().parse::<i64>() else {
            gloo::dialogs::alert("영혼을 선택하세요.");
            return;
        };
        let Some(selected) = file.get_untracked() else {
            gloo::dialogs::alert("이미지 파일을 선택하세요.");
            return;
        };
        if let Err(err) = validate_upload(selected.size() as u64, &selected.type_()) {
            alert_error(&err);
            return;
        }

        let kind = image_type.get_untracked();
        uploading.set(true);
        spawn_local(async move {
            match WebApi.upload_image(&selected, kind, Some(id)).await {
                Ok(uploaded) => {
                    uploaded_url.try_set(Some(uploaded.url));
                    file.try_set(None);
                }
                Err(err) => alert_error(&err),
            }
            uploading.try_set(false);
        });
    };

    view! {
        <div class="image-upload">
            <h2 class="page-title">"이미지 업로드"</h2>
            <form on:submit=on_submit>
                <div class="form-group">
                    <label>"영혼"</label>
                    <select on:change=move |ev| soul_id.set(event_target_value(&ev))>
                        <option value="">"영혼 선택"</option>
                        {move || souls.get().into_iter().map(|soul| view! {
                            <option value=soul.id.to_string()>
                                {format!("{} [{}]", soul.name, soul.season_name)}
                            </option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form-group">
                    <label>"이미지 종류"</label>
                    <select on:change=move |ev| {
                        if let Ok(kind) = event_target_value(&ev).parse::<ImageType>() {
                            image_type.set(kind);
                        }
                    }>
                        {ImageType::ALL.into_iter().map(|kind| view! {
                            <option value=kind.as_str() selected=move || image_type.get() == kind>
                                {kind.label()}
                            </option>
                        }).collect_view()}
                    </select>
                </div>
                <div class="form-group">
                    <input
                        type="file"
                        accept="image/*"
                        on:change=move |ev| {
                            let input: web_sys::HtmlInputElement = event_target(&ev);
                            let selected = input.files().and_then(|files| files.get(0));
                            file.set(selected);
                        }
                    />
                </div>
                <button type="submit" class="btn btn-primary" disabled=move || uploading.get()>
                    {move || if uploading.get() { "업로드 중..." } else { "업로드" }}
                </button>
            </form>
            {move || uploaded_url.get().map(|url| view! {
                <div class="upload-result">
                    <p>"업로드 완료"</p>
                    <img src=url.clone() />
                    <code>{url}</code>
                </div>
            })}
        </div>
    }
}
