//! 시즌一覧と追加

use super::alert_error;
use crate::api::WebApi;
use crate::components::loading::LoadingIndicator;
use leptos::prelude::*;
use leptos::task::spawn_local;
use sky_souls_common::display::format_dotted_date;
use sky_souls_common::forms::SeasonForm;
use sky_souls_common::Season;

fn reload(seasons: RwSignal<Vec<Season>>, loading: RwSignal<bool>) {
    loading.set(true);
    spawn_local(async move {
        match WebApi.seasons().await {
            Ok(mut list) => {
                list.sort_by_key(|s| s.order_num);
                seasons.try_set(list);
            }
            Err(err) => alert_error(&err),
        }
        loading.try_set(false);
    });
}

#[component]
pub fn SeasonListPage() -> impl IntoView {
    let seasons = RwSignal::new(Vec::<Season>::new());
    let loading = RwSignal::new(true);
    let form = RwSignal::new(SeasonForm::default());

    reload(seasons, loading);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let payload = match form.with_untracked(|f| f.to_payload()) {
            Ok(payload) => payload,
            Err(err) => {
                alert_error(&err);
                return;
            }
        };
        spawn_local(async move {
            match WebApi.create_season(&payload).await {
                Ok(season) => {
                    gloo::dialogs::alert(&format!("'{}' 시즌이 추가되었습니다.", season.name));
                    form.try_set(SeasonForm::default());
                    reload(seasons, loading);
                }
                Err(err) => alert_error(&err),
            }
        });
    };

    let on_delete = move |season: Season| {
        if !gloo::dialogs::confirm(&format!("'{}' 시즌을 삭제할까요?", season.name)) {
            return;
        }
        spawn_local(async move {
            match WebApi.delete_season(season.id).await {
                Ok(()) => reload(seasons, loading),
                Err(err) => alert_error(&err),
            }
        });
    };

    let field = move |label: &'static str, kind: &'static str, get: fn(&SeasonForm) -> String, set: fn(&mut SeasonForm, String)| {
        view! {
            <div class="form-group">
                <label>{label}</label>
                <input
                    type=kind
                    prop:value=move || form.with(get)
                    on:input=move |ev| form.update(|f| set(f, event_target_value(&ev)))
                />
            </div>
        }
    };

    view! {
        <div class="season-list">
            <h2 class="page-title">"시즌 관리"</h2>
            <Show
                when=move || !loading.get()
                fallback=|| view! { <LoadingIndicator message="불러오는 중..." /> }
            >
                <table class="season-table">
                    <thead>
                        <tr><th>"순서"</th><th>"이름"</th><th>"기간"</th><th></th></tr>
                    </thead>
                    <tbody>
                        {move || seasons.get().into_iter().map(|season| {
                            let row = season.clone();
                            view! {
                                <tr>
                                    <td>{season.order_num}</td>
                                    <td>
                                        <span class="season-dot" style=format!("background-color: {}", season.color) />
                                        {season.name.clone()}
                                        {season.is_collaboration.then_some(" [콜라보]")}
                                    </td>
                                    <td>{format!("{} ~ {}", format_dotted_date(&season.start_date), format_dotted_date(&season.end_date))}</td>
                                    <td>
                                        <button class="btn btn-tertiary btn-small" on:click=move |_| on_delete(row.clone())>
                                            "삭제"
                                        </button>
                                    </td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </Show>

            <form class="season-form" on:submit=on_submit>
                <h3>"시즌 추가"</h3>
                {field("시즌 이름", "text", |f| f.name.clone(), |f, v| f.name = v)}
                {field("순서", "number", |f| f.order_num.clone(), |f, v| f.order_num = v)}
                {field("시작일", "date", |f| f.start_date.clone(), |f, v| f.start_date = v)}
                {field("종료일", "date", |f| f.end_date.clone(), |f, v| f.end_date = v)}
                {field("색상", "color", |f| f.color.clone(), |f, v| f.color = v)}
                <div class="form-group">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked=move || form.with(|f| f.is_collaboration)
                            on:change=move |ev| form.update(|f| f.is_collaboration = event_target_checked(&ev))
                        />
                        "콜라보 시즌"
                    </label>
                </div>
                <button type="submit" class="btn btn-primary">"추가"</button>
            </form>
        </div>
    }
}
