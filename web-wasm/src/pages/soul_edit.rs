//! 영혼編集ページ
//!
//! 画像は選んだ時点で一時アップロードし、保存時にURLをまとめて送る。
//! 一時画像を差し替え・削除したら古いURLはサーバーから消す。

use super::alert_error;
use crate::api::WebApi;
use crate::components::loading::LoadingIndicator;
use crate::navigation;
use crate::routes::{parse_id, soul_href};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use sky_souls_common::forms::{validate_upload, ImageSlots, SoulForm};
use sky_souls_common::{ImageType, Season};
use web_sys::File;

fn delete_stale(url: Option<String>) {
    let Some(url) = url else {
        return;
    };
    spawn_local(async move {
        if let Err(err) = WebApi.delete_image_by_url(&url).await {
            gloo::console::warn!(format!("failed to delete temporary image {}: {}", url, err));
        }
    });
}

#[component]
pub fn SoulEditPage() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();
    let soul_id = Memo::new(move |_| parse_id(params.read().get("soul_id")));

    let form = RwSignal::new(SoulForm::default());
    let slots = RwSignal::new(ImageSlots::default());
    let seasons = RwSignal::new(Vec::<Season>::new());
    let loading = RwSignal::new(true);
    let uploading = RwSignal::new(None::<ImageType>);
    let saving = RwSignal::new(false);

    Effect::new(move |_| {
        let Some(id) = soul_id.get() else {
            loading.set(false);
            return;
        };
        loading.set(true);
        spawn_local(async move {
            match WebApi.soul(id).await {
                Ok(soul) => {
                    form.try_set(SoulForm::from_soul(&soul));
                    slots.try_set(ImageSlots::from_soul(&soul));
                }
                Err(err) => alert_error(&err),
            }
            match WebApi.seasons().await {
                Ok(list) => {
                    seasons.try_set(list);
                }
                Err(err) => gloo::console::warn!(err.to_string()),
            }
            loading.try_set(false);
        });
    });

    let on_file = move |image_type: ImageType, file: File| {
        if let Err(err) = validate_upload(file.size() as u64, &file.type_()) {
            alert_error(&err);
            return;
        }
        uploading.set(Some(image_type));
        spawn_local(async move {
            match WebApi.upload_image(&file, image_type, None).await {
                Ok(uploaded) => {
                    let stale = slots
                        .try_update(|s| s.replace(image_type, uploaded.url))
                        .flatten();
                    delete_stale(stale);
                }
                Err(err) => alert_error(&err),
            }
            uploading.try_set(None);
        });
    };

    let on_remove = move |image_type: ImageType| {
        let stale = slots.try_update(|s| s.remove(image_type)).flatten();
        delete_stale(stale);
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(id) = soul_id.get_untracked() else {
            return;
        };
        let payload = match form
            .with_untracked(|f| slots.with_untracked(|s| f.to_update_payload(s.to_payload())))
        {
            Ok(payload) => payload,
            Err(err) => {
                alert_error(&err);
                return;
            }
        };
        saving.set(true);
        let navigate = navigate.clone();
        spawn_local(async move {
            match WebApi.update_soul(id, &payload).await {
                Ok(_) => {
                    gloo::dialogs::alert("수정되었습니다.");
                    navigation::mark_push();
                    navigate(&soul_href(id), Default::default());
                }
                Err(err) => alert_error(&err),
            }
            saving.try_set(false);
        });
    };

    let text_field = move |label: &'static str, get: fn(&SoulForm) -> String, set: fn(&mut SoulForm, String)| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type="text"
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    let image_slot = move |image_type: ImageType| {
        view! {
            <div class="image-slot">
                <label>{image_type.label()}</label>
                {move || slots.with(|s| s.current(image_type).map(str::to_string)).map(|url| view! {
                    <img class="slot-preview" src=url />
                    <button type="button" class="btn btn-tertiary btn-small" on:click=move |_| on_remove(image_type)>
                        "삭제"
                    </button>
                })}
                <input
                    type="file"
                    accept="image/*"
                    disabled=move || uploading.get().is_some()
                    on:change=move |ev| {
                        let input: web_sys::HtmlInputElement = event_target(&ev);
                        if let Some(file) = input.files().and_then(|files| files.get(0)) {
                            on_file(image_type, file);
                        }
                        input.set_value("");
                    }
                />
                <Show when=move || uploading.get() == Some(image_type)>
                    <span class="text-muted">"업로드 중..."</span>
                </Show>
            </div>
        }
    };

    view! {
        <div class="soul-edit">
            <h2 class="page-title">"영혼 수정"</h2>
            <Show
                when=move || !loading.get()
                fallback=|| view! { <LoadingIndicator message="불러오는 중..." /> }
            >
                <form on:submit=on_submit.clone()>
                    {text_field("영혼 이름", |f| f.name.clone(), |f, v| f.name = v)}
                    <div class="form-group">
                        <label>"시즌"</label>
                        <select on:change=move |ev| form.update(|f| f.season_id = event_target_value(&ev))>
                            <option value="">"시즌 선택"</option>
                            {move || seasons.get().into_iter().map(|season| {
                                let value = season.id.to_string();
                                let selected = form.with(|f| f.season_id == value);
                                view! { <option value=value selected=selected>{season.name}</option> }
                            }).collect_view()}
                        </select>
                    </div>
                    {text_field("순서", |f| f.order_num.clone(), |f, v| f.order_num = v)}
                    <div class="form-group">
                        <label>
                            <input
                                type="checkbox"
                                prop:checked=move || form.with(|f| f.is_season_guide)
                                on:change=move |ev| form.update(|f| f.is_season_guide = event_target_checked(&ev))
                            />
                            "시즌 가이드"
                        </label>
                    </div>
                    {text_field("키워드 (쉼표로 구분)", |f| f.keywords.clone(), |f, v| f.keywords = v)}
                    {text_field("위치", |f| f.location.clone(), |f, v| f.location = v)}
                    {text_field("제작자", |f| f.creator.clone(), |f, v| f.creator = v)}
                    <div class="form-group">
                        <label>"설명"</label>
                        <textarea
                            prop:value=move || form.with(|f| f.description.clone())
                            on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
                        />
                    </div>
                    <div class="image-slots">
                        {ImageType::ALL.into_iter().map(image_slot).collect_view()}
                    </div>
                    <button
                        type="submit"
                        class="btn btn-primary"
                        disabled=move || saving.get() || uploading.get().is_some()
                    >
                        {move || if saving.get() { "저장 중..." } else { "저장" }}
                    </button>
                </form>
            </Show>
        </div>
    }
}
