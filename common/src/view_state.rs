//! 一覧ページの表示状態の保存と復元
//!
//! 詳細ページへ移る直前に一覧の状態（スクロール位置・フィルタ・読み込み済み項目）を
//! セッションストアへ書き、戻ってきたときに一度だけ読み出して消す。
//!
//! 状態遷移:
//! - マウント時、戻る操作でスナップショットがあれば `Restoring`（通信しない）
//! - それ以外は `FreshEntry` から0ページ目を置き換え取得して `Live`
//! - `Restoring` はホストが遅延スクロールを適用した後 `finish_restore` で `Live`

use crate::envelope::FetchedPage;
use crate::error::{Error, Result};
use crate::filter::{FilterState, ListPage};
use crate::listing::{ApplyOutcome, ListItem, LoadMode, PageRequest, PagedItem, PagedList};
use crate::endpoint::{ListRequest, DEFAULT_PAGE_SIZE};
use crate::scroll::{ObserverChange, ScrollTrigger};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 文字列キーのセッションストア
///
/// ブラウザでは sessionStorage、CLIではキャッシュディレクトリのファイル。
pub trait ViewStateStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str);
}

/// メモリ上のストア
///
/// `with_quota` で容量超過の書き込み失敗を再現できる。
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            quota_bytes: Some(quota_bytes),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl ViewStateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(quota) = self.quota_bytes {
            let needed = self.used_bytes_without(key) + key.len() + value.len();
            if needed > quota {
                return Err(Error::Storage(format!(
                    "quota exceeded: {} > {} bytes",
                    needed, quota
                )));
            }
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// 復元用スナップショット
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreSnapshot<T> {
    pub scroll_y: f64,
    pub filter: FilterState,
    /// 読み込み済みの最終ページ
    pub page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub items: Vec<PagedItem<T>>,
    pub timestamp_ms: i64,
}

/// `<prefix>_state` に入る部分
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SavedState {
    filter: FilterState,
    page: u32,
    total_pages: u32,
    total_elements: u64,
    timestamp: i64,
}

/// ページ単位のスナップショット置き場
///
/// キーは `<prefix>_scrollY` / `<prefix>_state` / `<prefix>_items`。
/// `scrollY` の有無が「復元待ちがあるか」の判定になるので最後に書く。
#[derive(Debug, Clone)]
pub struct PageCache<S> {
    store: S,
    prefix: String,
}

impl<S: ViewStateStore> PageCache<S> {
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn for_page(store: S, page: ListPage) -> Self {
        Self::new(store, page.cache_prefix())
    }

    pub fn scroll_key(&self) -> String {
        format!("{}_scrollY", self.prefix)
    }

    pub fn state_key(&self) -> String {
        format!("{}_state", self.prefix)
    }

    pub fn items_key(&self) -> String {
        format!("{}_items", self.prefix)
    }

    pub fn keys(&self) -> [String; 3] {
        [self.scroll_key(), self.state_key(), self.items_key()]
    }

    /// 復元待ちのスナップショットがあるか
    pub fn has_snapshot(&self) -> bool {
        self.store.get(&self.scroll_key()).is_some()
    }

    /// スナップショットを読む（消さない）
    ///
    /// 無ければ `Ok(None)`、壊れていれば `Err`。
    pub fn load<T: DeserializeOwned>(&self) -> Result<Option<RestoreSnapshot<T>>> {
        let Some(raw_scroll) = self.store.get(&self.scroll_key()) else {
            return Ok(None);
        };
        let scroll_y: f64 = raw_scroll
            .trim()
            .parse()
            .map_err(|_| Error::Storage(format!("invalid scroll offset: {}", raw_scroll)))?;
        let raw_state = self
            .store
            .get(&self.state_key())
            .ok_or_else(|| Error::Storage(format!("{} is missing", self.state_key())))?;
        let raw_items = self
            .store
            .get(&self.items_key())
            .ok_or_else(|| Error::Storage(format!("{} is missing", self.items_key())))?;

        let state: SavedState = serde_json::from_str(&raw_state)?;
        let items: Vec<PagedItem<T>> = serde_json::from_str(&raw_items)?;

        Ok(Some(RestoreSnapshot {
            scroll_y,
            filter: state.filter,
            page: state.page,
            total_pages: state.total_pages,
            total_elements: state.total_elements,
            items,
            timestamp_ms: state.timestamp,
        }))
    }

    /// スナップショットを書く
    ///
    /// 途中で失敗したら書いた分を消して、中途半端な復元が起きないようにする。
    pub fn save<T: Serialize>(&mut self, snapshot: &RestoreSnapshot<T>) -> Result<()> {
        let state = SavedState {
            filter: snapshot.filter.clone(),
            page: snapshot.page,
            total_pages: snapshot.total_pages,
            total_elements: snapshot.total_elements,
            timestamp: snapshot.timestamp_ms,
        };
        let raw_items = serde_json::to_string(&snapshot.items)?;
        let raw_state = serde_json::to_string(&state)?;

        let result = self
            .store
            .set(&self.items_key(), &raw_items)
            .and_then(|_| self.store.set(&self.state_key(), &raw_state))
            .and_then(|_| {
                self.store
                    .set(&self.scroll_key(), &snapshot.scroll_y.to_string())
            });
        if result.is_err() {
            self.clear();
        }
        result
    }

    /// 全キーを消す
    pub fn clear(&mut self) {
        for key in self.keys() {
            self.store.remove(&key);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// どう遷移してきたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationType {
    Push,
    /// 戻る・進む
    Pop,
    Replace,
    /// 判別できない（リロード等）。スナップショットの有無で判断する
    Unknown,
}

impl NavigationType {
    /// PerformanceNavigationTiming.type の値から
    pub fn from_timing_type(value: &str) -> Self {
        match value {
            "back_forward" => NavigationType::Pop,
            "navigate" => NavigationType::Push,
            _ => NavigationType::Unknown,
        }
    }

    fn may_restore(&self) -> bool {
        matches!(self, NavigationType::Pop | NavigationType::Unknown)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    FreshEntry,
    Restoring,
    Live,
}

/// 復元結果（ホストはこの位置へ遅延スクロールする）
#[derive(Debug, Clone, PartialEq)]
pub struct Restoration {
    pub scroll_y: f64,
    pub filter: FilterState,
    pub restored: usize,
}

/// マウント時の決定（どちらか一方だけ）
#[derive(Debug, Clone, PartialEq)]
pub enum MountAction {
    Restore(Restoration),
    Fetch(PageRequest),
}

/// フィルタ変更の結果
#[derive(Debug, Clone, PartialEq)]
pub struct FilterChange {
    pub request: PageRequest,
    /// 履歴に積むクエリ文字列（`?` なし）
    pub query_string: String,
}

/// URL・セッションストア・メモリ上の一覧を突き合わせるコントローラ
pub struct ViewStateController<T: ListItem, S: ViewStateStore> {
    page: ListPage,
    page_size: u32,
    cache: PageCache<S>,
    list: PagedList<T>,
    trigger: ScrollTrigger,
    filter: FilterState,
    phase: Phase,
}

impl<T, S> ViewStateController<T, S>
where
    T: ListItem + Clone + Serialize + DeserializeOwned,
    S: ViewStateStore,
{
    pub fn new(page: ListPage, store: S) -> Self {
        Self {
            page,
            page_size: DEFAULT_PAGE_SIZE,
            cache: PageCache::for_page(store, page),
            list: PagedList::new(),
            trigger: ScrollTrigger::new(),
            filter: FilterState::defaults(page),
            phase: Phase::FreshEntry,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// マウント時の判定
    ///
    /// 戻る操作（または判別不能）でスナップショットがあれば復元、
    /// それ以外は0ページ目を取得する。
    pub fn mount(&mut self, navigation: NavigationType, url_filter: FilterState) -> MountAction {
        self.phase = Phase::FreshEntry;
        self.trigger.detach();

        if navigation.may_restore() {
            match self.cache.load::<T>() {
                Ok(Some(snapshot)) if !snapshot.items.is_empty() => {
                    let restoration = Restoration {
                        scroll_y: snapshot.scroll_y,
                        filter: snapshot.filter.clone(),
                        restored: snapshot.items.len(),
                    };
                    self.filter = snapshot.filter;
                    self.list.restore(
                        snapshot.items,
                        snapshot.page,
                        snapshot.total_pages,
                        snapshot.total_elements,
                    );
                    self.phase = Phase::Restoring;
                    tracing::debug!(
                        page = ?self.page,
                        restored = restoration.restored,
                        scroll_y = restoration.scroll_y,
                        "restoring list view from session snapshot"
                    );
                    return MountAction::Restore(restoration);
                }
                Ok(Some(_)) => {
                    tracing::debug!(page = ?self.page, "empty snapshot; fetching fresh");
                    self.cache.clear();
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(page = ?self.page, error = %err, "discarding malformed view snapshot");
                    self.cache.clear();
                }
            }
        } else if self.cache.has_snapshot() {
            self.cache.clear();
        }

        self.filter = url_filter;
        self.list.reset();
        let request = self.list.begin(0, LoadMode::Replace);
        self.phase = Phase::Live;
        MountAction::Fetch(request)
    }

    /// 遅延スクロール適用後に呼ぶ。消費したキーを消して `Live` へ
    pub fn finish_restore(&mut self) -> bool {
        if self.phase != Phase::Restoring {
            return false;
        }
        self.cache.clear();
        self.phase = Phase::Live;
        true
    }

    /// URLのフィルタが変わったとき（履歴の戻る・進む等）
    ///
    /// 復元中は取得しない。
    pub fn sync_url(&mut self, url_filter: FilterState) -> Option<PageRequest> {
        if self.phase != Phase::Live || url_filter == self.filter {
            return None;
        }
        self.cache.clear();
        self.filter = url_filter;
        self.list.reset();
        Some(self.list.begin(0, LoadMode::Replace))
    }

    /// ユーザー操作によるフィルタ変更（検索・シーズン選択・表示切替）
    ///
    /// スクロールを先頭に戻すのはホスト側。
    pub fn change_filter(&mut self, filter: FilterState) -> FilterChange {
        self.cache.clear();
        self.phase = Phase::Live;
        self.filter = filter;
        self.list.reset();
        let request = self.list.begin(0, LoadMode::Replace);
        FilterChange {
            request,
            query_string: self.filter.to_query(self.page),
        }
    }

    /// 詳細ページへ移る直前のスナップショット保存
    ///
    /// 書き込み失敗は握りつぶす（戻ったときに通常取得になるだけ）。
    pub fn capture(&mut self, scroll_y: f64, timestamp_ms: i64) -> bool {
        let Some(range) = self.list.range() else {
            return false;
        };
        let snapshot = RestoreSnapshot {
            scroll_y,
            filter: self.filter.clone(),
            page: range.max,
            total_pages: self.list.total_pages(),
            total_elements: self.list.total_elements(),
            items: self.list.snapshot_items(),
            timestamp_ms,
        };
        match self.cache.save(&snapshot) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(page = ?self.page, error = %err, "failed to save view snapshot");
                false
            }
        }
    }

    /// ユーザー操作による再取得
    ///
    /// 次ページの追加に失敗していた場合は読み込み済みの項目を残して同じページを、
    /// それ以外は現在のフィルタで0ページ目から取り直す。
    pub fn retry(&mut self) -> Option<PageRequest> {
        if self.list.is_fetching() {
            return None;
        }
        self.phase = Phase::Live;
        if self.list.failed_mode() == Some(LoadMode::Append) {
            if let Some(next) = self.list.next_page() {
                return Some(self.list.begin(next, LoadMode::Append));
            }
        }
        self.list.reset();
        Some(self.list.begin(0, LoadMode::Replace))
    }

    pub fn apply(
        &mut self,
        request: PageRequest,
        result: Result<FetchedPage<T>>,
    ) -> ApplyOutcome {
        self.list.apply(request, result)
    }

    /// 番兵が見えた
    pub fn on_sentinel_visible(&mut self) -> Option<PageRequest> {
        if self.phase != Phase::Live {
            return None;
        }
        self.trigger.on_intersect(&mut self.list)
    }

    /// 監視の付け外し
    pub fn sync_observer(&mut self) -> ObserverChange {
        self.trigger.sync(&self.list)
    }

    /// アンマウント時
    pub fn teardown(&mut self) {
        self.trigger.detach();
    }

    /// リクエストに対応するAPI呼び出し
    pub fn list_request(&self, request: &PageRequest) -> ListRequest {
        self.page
            .list_request(&self.filter, request.page, self.page_size)
    }

    pub fn page(&self) -> ListPage {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn list(&self) -> &PagedList<T> {
        &self.list
    }

    pub fn cache(&self) -> &PageCache<S> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut PageCache<S> {
        &mut self.cache
    }

    pub fn into_store(self) -> S {
        self.cache.into_store()
    }
}
