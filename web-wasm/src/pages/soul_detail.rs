//! 영혼詳細ページ

use super::alert_error;
use crate::api::WebApi;
use crate::components::loading::LoadingIndicator;
use crate::navigation;
use crate::routes::{parse_id, soul_edit_href};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};
use sky_souls_common::display::format_dotted_date;
use sky_souls_common::palette::season_color;
use sky_souls_common::{ImageType, ListPage, Soul};

#[component]
pub fn SoulDetailPage() -> impl IntoView {
    let params = use_params_map();
    let navigate = use_navigate();
    let soul_id = Memo::new(move |_| parse_id(params.read().get("soul_id")));

    let soul = RwSignal::new(None::<Soul>);
    let error = RwSignal::new(None::<String>);
    let loading = RwSignal::new(true);

    Effect::new(move |_| {
        let Some(id) = soul_id.get() else {
            error.set(Some("잘못된 영혼 ID입니다.".to_string()));
            loading.set(false);
            return;
        };
        loading.set(true);
        error.set(None);
        spawn_local(async move {
            match WebApi.soul(id).await {
                Ok(data) => {
                    soul.try_set(Some(data));
                }
                Err(err) => {
                    gloo::console::warn!(err.to_string());
                    error.try_set(Some("영혼 정보를 불러올 수 없습니다.".to_string()));
                }
            }
            loading.try_set(false);
        });
    });

    let go_back = move |_| {
        if let Some(history) = web_sys::window().and_then(|w| w.history().ok()) {
            let _ = history.back();
        }
    };

    let on_delete = move |_| {
        let Some(current) = soul.get_untracked() else {
            return;
        };
        if !gloo::dialogs::confirm(&format!("'{}'을(를) 삭제할까요?", current.name)) {
            return;
        }
        let navigate = navigate.clone();
        spawn_local(async move {
            match WebApi.delete_soul(current.id).await {
                Ok(()) => {
                    gloo::dialogs::alert("삭제되었습니다.");
                    navigation::mark_push();
                    navigate(ListPage::SeasonDictionary.path(), Default::default());
                }
                Err(err) => alert_error(&err),
            }
        });
    };

    view! {
        <div class="soul-detail">
            <div class="detail-header">
                <button class="btn btn-secondary" on:click=go_back>"← 뒤로가기"</button>
                {move || soul_id.get().map(|id| view! {
                    <a class="btn btn-primary" href=soul_edit_href(id)>"수정하기"</a>
                })}
                <button class="btn btn-tertiary" on:click=on_delete>"삭제"</button>
            </div>

            {move || {
                if loading.get() {
                    return view! { <LoadingIndicator message="불러오는 중..." /> }.into_any();
                }
                if let Some(message) = error.get() {
                    return view! { <div class="error">{message}</div> }.into_any();
                }
                match soul.get() {
                    Some(soul) => soul_body(soul).into_any(),
                    None => view! { <div class="no-data">"영혼 정보가 없습니다."</div> }.into_any(),
                }
            }}
        </div>
    }
}

fn soul_body(soul: Soul) -> impl IntoView {
    let representative = soul.representative_url().map(str::to_string);
    let extra_images: Vec<(&'static str, String)> = ImageType::ALL
        .iter()
        .filter(|t| **t != ImageType::Representative)
        .filter_map(|t| soul.image(*t).map(|img| (t.label(), img.url.clone())))
        .collect();
    let color = season_color(&soul.season_name);

    view! {
        <div class="detail-main">
            <div class="detail-image">
                {match representative {
                    Some(url) => view! { <img src=url alt=soul.name.clone() /> }.into_any(),
                    None => view! { <div class="no-image">"이미지 없음"</div> }.into_any(),
                }}
            </div>
            <div class="detail-info">
                <span class="season-badge" style=format!("background-color: {}", color)>
                    {soul.season_name.clone()}
                </span>
                {soul.is_season_guide.then(|| view! { <span class="guide-badge">"시즌 가이드"</span> })}
                <h1 class="soul-name">{soul.name.clone()}</h1>
                <dl class="info-grid">
                    <dt>"순서"</dt>
                    <dd>{soul.order_num.map(|n| format!("#{}", n)).unwrap_or_else(|| "-".to_string())}</dd>
                    {(!soul.creator.is_empty()).then(|| view! {
                        <dt>"제작자"</dt>
                        <dd>{soul.creator.clone()}</dd>
                    })}
                    <dt>"복각 횟수"</dt>
                    <dd>{format!("{}회", soul.total_visits)}</dd>
                    {(!soul.start_date.is_empty()).then(|| view! {
                        <dt>"기간"</dt>
                        <dd>{format!("{} ~ {}", format_dotted_date(&soul.start_date), format_dotted_date(&soul.end_date))}</dd>
                    })}
                </dl>
                <div class="keywords">
                    {soul.keywords.iter().map(|k| view! { <span class="keyword">{k.clone()}</span> }).collect_view()}
                </div>
                {(!soul.description.is_empty()).then(|| view! { <p class="description">{soul.description.clone()}</p> })}
                {(!soul.traveling_visits.is_empty()).then(|| view! {
                    <div class="visits-box">
                        <h3>"유랑 이력"</h3>
                        {soul.traveling_visits.iter().map(|visit| view! {
                            <div class="visit-item">
                                <span class="visit-number">
                                    {format!("{}차", visit.visit_number)}
                                    {visit.is_warband_visit.then_some(" (유랑단)")}
                                </span>
                                <span class="visit-date">
                                    {format!("{} ~ {}", visit.start_date, visit.end_date)}
                                </span>
                            </div>
                        }).collect_view()}
                    </div>
                })}
            </div>
        </div>
        <div class="additional-images">
            {extra_images.into_iter().map(|(label, url)| view! {
                <div class="image-card">
                    <h3>{label}</h3>
                    <img src=url alt=label />
                </div>
            }).collect_view()}
        </div>
    }
}
