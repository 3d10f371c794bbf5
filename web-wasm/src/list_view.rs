//! 一覧ページの状態フック
//!
//! `ViewStateController` をシグナルに載せ、DOM側の仕事
//! （番兵の IntersectionObserver、遅延スクロール、URL同期）を受け持つ。

use crate::api::WebApi;
use crate::navigation;
use crate::routes::{anchor_soul_id, list_href, soul_anchor, soul_href};
use crate::session_store::SessionStore;
use gloo::timers::callback::Timeout;
use js_sys::Array;
use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sky_souls_common::{
    FilterState, ListItem, ListPage, MountAction, ObserverChange, PageRequest, Restoration,
    ScrollTrigger, ViewStateController, ROOT_MARGIN,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// 復元時にスクロールを当てるまでの待ち時間（描画完了待ち）
const RESTORE_DELAY_MS: u32 = 100;

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub trait WebListItem:
    ListItem<Key: Send + Sync> + Clone + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> WebListItem for T
where
    T: ListItem + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    T::Key: Send + Sync,
{
}

pub struct ListView<T: WebListItem> {
    pub page: ListPage,
    pub state: RwSignal<ViewStateController<T, SessionStore>>,
    pub sentinel: NodeRef<html::Div>,
    observer: StoredValue<Option<(IntersectionObserver, ObserverCallback)>, LocalStorage>,
    navigate: Callback<(String, bool)>,
}

impl<T: WebListItem> Clone for ListView<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: WebListItem> Copy for ListView<T> {}

/// 一覧ページのマウント時に呼ぶ
pub fn use_list_view<T: WebListItem>(page: ListPage) -> ListView<T> {
    let location = use_location();
    let navigate = use_navigate();
    let view = ListView {
        page,
        state: RwSignal::new(ViewStateController::new(page, SessionStore)),
        sentinel: NodeRef::new(),
        observer: StoredValue::new_local(None),
        navigate: Callback::new(move |(href, replace): (String, bool)| {
            navigation::mark_push();
            navigate(
                &href,
                NavigateOptions {
                    replace,
                    scroll: false,
                    ..Default::default()
                },
            );
        }),
    };

    let url_filter = FilterState::from_query(page, &location.search.get_untracked());
    let action = view
        .state
        .try_update(|c| c.mount(navigation::current(), url_filter));
    match action {
        Some(MountAction::Restore(restoration)) => view.schedule_restore(restoration),
        Some(MountAction::Fetch(request)) => view.fetch(request),
        None => {}
    }

    // 番兵が描画されたら監視を始める
    Effect::new(move |_| {
        if view.sentinel.get().is_some() {
            view.ensure_observer();
            view.sync_observer();
        }
    });

    // 戻る・進むなどでクエリだけが変わった場合
    Effect::new(move |prev: Option<String>| {
        let search = location.search.get();
        if prev.is_some() && prev.as_deref() != Some(search.as_str()) {
            let filter = FilterState::from_query(page, &search);
            if let Some(request) = view.state.try_update(|c| c.sync_url(filter)).flatten() {
                scroll_to(0.0);
                view.fetch(request);
            }
        }
        search
    });

    on_cleanup(move || {
        view.observer.update_value(|observer| {
            if let Some((observer, _)) = observer.take() {
                observer.disconnect();
            }
        });
        view.state.try_update(|c| c.teardown());
    });

    view
}

impl<T: WebListItem> ListView<T> {
    fn fetch(self, request: PageRequest) {
        let list_request = self.state.with_untracked(|c| c.list_request(&request));
        spawn_local(async move {
            let result = WebApi.fetch_list::<T>(&list_request, request.page).await;
            // アンマウント後の結果は捨てる
            if self.state.try_update(|c| c.apply(request, result)).is_some() {
                self.sync_observer();
            }
        });
    }

    fn ensure_observer(self) {
        let exists = self.observer.with_value(|o| o.is_some());
        if exists {
            return;
        }

        let callback: ObserverCallback = Closure::new(move |entries: Array, _: IntersectionObserver| {
            let visible = entries
                .iter()
                .map(|entry| entry.unchecked_into::<IntersectionObserverEntry>())
                .any(|entry| entry.is_intersecting());
            if !visible {
                return;
            }
            if let Some(request) = self.state.try_update(|c| c.on_sentinel_visible()).flatten() {
                self.fetch(request);
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_root_margin(ROOT_MARGIN);
        match IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init) {
            Ok(observer) => self.observer.set_value(Some((observer, callback))),
            Err(err) => gloo::console::error!("IntersectionObserver", err),
        }
    }

    /// 一覧の状態に合わせて番兵の監視を付け外しする
    fn sync_observer(self) {
        let Some((change, wanted)) = self
            .state
            .try_update(|c| (c.sync_observer(), ScrollTrigger::should_observe(c.list())))
        else {
            return;
        };
        let Some(sentinel) = self.sentinel.get_untracked() else {
            return;
        };

        self.observer.with_value(|observer| {
            let Some((observer, _)) = observer else {
                return;
            };
            match change {
                ObserverChange::Detach => observer.disconnect(),
                // 番兵が見えたままだと交差イベントが来ないので付け直す
                ObserverChange::Attach | ObserverChange::Keep if wanted => {
                    observer.disconnect();
                    observer.observe(&sentinel);
                }
                ObserverChange::Attach | ObserverChange::Keep => {}
            }
        });
    }

    fn schedule_restore(self, restoration: Restoration) {
        let href = list_href(self.page, &restoration.filter.to_query(self.page));
        if current_href().as_deref() != Some(href.as_str()) {
            self.navigate.run((href, true));
        }

        let anchor = (self.page == ListPage::GeneralVisits)
            .then(current_hash)
            .flatten()
            .and_then(|hash| anchor_soul_id(&hash));

        Timeout::new(RESTORE_DELAY_MS, move || {
            scroll_to(restoration.scroll_y);
            if let Some(soul_id) = anchor {
                scroll_to_anchor(soul_id);
            }
            if self.state.try_update(|c| c.finish_restore()).is_some() {
                self.sync_observer();
            }
        })
        .forget();
    }

    /// 表示モード・検索・シーズンの変更
    pub fn change_filter(self, filter: FilterState) {
        let filter = FilterState::from_query(self.page, &filter.to_query(self.page));
        let Some(change) = self.state.try_update(|c| c.change_filter(filter)) else {
            return;
        };
        scroll_to(0.0);
        self.navigate
            .run((list_href(self.page, &change.query_string), false));
        self.fetch(change.request);
    }

    pub fn retry(self) {
        if let Some(request) = self.state.try_update(|c| c.retry()).flatten() {
            self.fetch(request);
        }
    }

    /// 詳細へ移る直前にスナップショットを保存
    pub fn open_detail(self, soul_id: i64) {
        let scroll_y = web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or(0.0);
        let saved = self
            .state
            .try_update(|c| c.capture(scroll_y, js_sys::Date::now() as i64))
            .unwrap_or(false);
        if !saved {
            gloo::console::warn!("list snapshot was not saved");
        }

        if self.page == ListPage::GeneralVisits {
            replace_hash(&soul_anchor(soul_id));
        }
        self.navigate.run((soul_href(soul_id), false));
    }

    pub fn filter(self) -> FilterState {
        self.state.with(|c| c.filter().clone())
    }
}

fn scroll_to(y: f64) {
    if let Some(window) = web_sys::window() {
        window.scroll_to_with_x_and_y(0.0, y);
    }
}

fn scroll_to_anchor(soul_id: i64) {
    let element = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(&soul_anchor(soul_id)));
    if let Some(element) = element {
        element.scroll_into_view();
    }
}

fn current_href() -> Option<String> {
    let location = web_sys::window()?.location();
    let path = location.pathname().ok()?;
    let search = location.search().ok()?;
    Some(format!("{}{}", path, search))
}

fn current_hash() -> Option<String> {
    web_sys::window()?.location().hash().ok()
}

/// ルーターを通さずにハッシュだけ書き換える
fn replace_hash(anchor: &str) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Some(href) = current_href() else {
        return;
    };
    if let Ok(history) = window.history() {
        let url = format!("{}#{}", href, anchor);
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&url));
    }
}
