//! 無限スクロールの一覧ページ（3種）

use crate::components::entry::{render_entry, today, ListEntry};
use crate::components::filter_bar::FilterBar;
use crate::components::loading::{ErrorBox, LoadingIndicator};
use crate::list_view::{use_list_view, WebListItem};
use leptos::prelude::*;
use sky_souls_common::{FilterState, ListPage, Soul, TravelingVisit, ViewMode};

fn list_screen<T>(page: ListPage) -> impl IntoView
where
    T: WebListItem + ListEntry,
{
    let view = use_list_view::<T>(page);
    let filter = Signal::derive(move || view.filter());
    let on_change = Callback::new(move |next: FilterState| view.change_filter(next));
    let anchored = page == ListPage::GeneralVisits;

    let mode = move || view.state.with(|c| c.filter().view_mode);
    let error = move || view.state.with(|c| c.list().error().map(str::to_string));
    let fetching = move || view.state.with(|c| c.list().is_fetching());
    let total = move || view.state.with(|c| c.list().total_elements());

    let entries = move || {
        let today = today();
        view.state.with(|c| {
            let filter = c.filter();
            c.list()
                .iter()
                .filter(|item| item.visible_under(filter))
                .map(|item| item.to_entry(today))
                .collect::<Vec<_>>()
        })
    };

    let items = move || {
        let mode = mode();
        entries()
            .into_iter()
            .map(|entry| render_entry(mode, entry, anchored, move |soul_id| view.open_detail(soul_id)))
            .collect_view()
    };

    let is_empty = move || !fetching() && error().is_none() && entries().is_empty();

    view! {
        <div class="list-page">
            <h2 class="page-title">{page.title()}</h2>
            <FilterBar page=page filter=filter on_change=on_change />
            <p class="list-summary">{move || format!("전체 {}건", total())}</p>

            {move || error().map(|message| view! {
                <ErrorBox message=message on_retry=move || view.retry() />
            })}

            <div class=move || if mode() == ViewMode::Card { "soul-grid" } else { "soul-list" }>
                {items}
            </div>

            <Show when=is_empty>
                <p class="text-muted">"검색 결과가 없습니다."</p>
            </Show>
            <Show when=fetching>
                <LoadingIndicator message="불러오는 중..." />
            </Show>

            <div node_ref=view.sentinel class="scroll-sentinel" />
        </div>
    }
}

#[component]
pub fn SeasonDictionaryPage() -> impl IntoView {
    list_screen::<Soul>(ListPage::SeasonDictionary)
}

#[component]
pub fn TravelingEncyclopediaPage() -> impl IntoView {
    list_screen::<TravelingVisit>(ListPage::TravelingEncyclopedia)
}

#[component]
pub fn GeneralVisitsPage() -> impl IntoView {
    list_screen::<Soul>(ListPage::GeneralVisits)
}
