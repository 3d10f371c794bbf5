//! 検索・シーズン・表示モードの操作部

use leptos::prelude::*;
use sky_souls_common::palette::{season_color, season_names};
use sky_souls_common::{FilterState, ListPage};

#[component]
pub fn FilterBar(
    page: ListPage,
    filter: Signal<FilterState>,
    on_change: Callback<FilterState>,
) -> impl IntoView {
    let (draft, set_draft) = signal(filter.get_untracked().query);

    // URLから変わった検索語を入力欄へ反映
    Effect::new(move |_| {
        set_draft.set(filter.get().query);
    });

    let submit = move || {
        on_change.run(FilterState {
            query: draft.get_untracked(),
            ..filter.get_untracked()
        });
    };

    let season_chips = page.uses_season().then(|| {
        let chip = move |label: &'static str, season: Option<&'static str>| {
            let selected = move || filter.get().season.as_deref() == season;
            let color = season.map(season_color).unwrap_or("#444");
            view! {
                <button
                    class=move || if selected() { "chip chip-selected" } else { "chip" }
                    style=format!("--chip-color: {}", color)
                    on:click=move |_| {
                        on_change.run(FilterState {
                            season: season.map(str::to_string),
                            ..filter.get_untracked()
                        })
                    }
                >
                    {label}
                </button>
            }
        };
        view! {
            <div class="season-chips">
                {chip("전체", None)}
                {season_names().map(|name| chip(name, Some(name))).collect_view()}
            </div>
        }
    });

    let mode_toggle = page.uses_mode().then(|| {
        view! {
            <button
                class="btn btn-secondary btn-small"
                on:click=move |_| {
                    let current = filter.get_untracked();
                    on_change.run(FilterState {
                        view_mode: current.view_mode.toggled(),
                        ..current
                    })
                }
            >
                {move || format!("{} 보기", filter.get().view_mode.toggled().label())}
            </button>
        }
    });

    let warband_toggle = page.uses_warband().then(|| {
        view! {
            <label class="warband-toggle">
                <input
                    type="checkbox"
                    prop:checked=move || filter.get().warband
                    on:change=move |ev| {
                        on_change.run(FilterState {
                            warband: event_target_checked(&ev),
                            ..filter.get_untracked()
                        })
                    }
                />
                "유랑단만 보기"
            </label>
        }
    });

    view! {
        <div class="filter-bar">
            <form
                class="search-form"
                on:submit=move |ev| {
                    ev.prevent_default();
                    submit();
                }
            >
                <input
                    type="search"
                    placeholder="영혼 이름 검색"
                    prop:value=move || draft.get()
                    on:input=move |ev| set_draft.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary btn-small">"검색"</button>
                <Show when=move || filter.get() != FilterState::defaults(page)>
                    <button
                        type="button"
                        class="btn btn-tertiary btn-small"
                        on:click=move |_| {
                            on_change.run(FilterState {
                                view_mode: filter.get_untracked().view_mode,
                                ..FilterState::defaults(page)
                            })
                        }
                    >
                        "전체 보기"
                    </button>
                </Show>
            </form>
            {season_chips}
            <div class="filter-toggles">
                {mode_toggle}
                {warband_toggle}
            </div>
        </div>
    }
}
