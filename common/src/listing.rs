//! 無限スクロール一覧のページ結合エンジン
//!
//! 取得したページを順序付きコレクションへ結合する。
//! - 重複排除はキー→インデックスのマップを差分更新（毎回の再構築はしない）
//! - `LoadedRange` は読み込み済みページの連続区間
//! - リクエストはフィルタセッション番号付き。古いセッションの応答は捨てる

use crate::envelope::FetchedPage;
use crate::error::Error;
use crate::types::{Soul, TravelingVisit};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// 一覧に並べられるレコード
pub trait ListItem {
    type Key: Eq + Hash + Clone + Debug;

    /// 重複判定に使う同一性キー
    fn key(&self) -> Self::Key;
}

impl ListItem for Soul {
    type Key = i64;

    fn key(&self) -> i64 {
        self.id
    }
}

/// 유랑 대백과は同じ영혼が訪問ごとに現れるので `globalOrder` まで含める
impl ListItem for TravelingVisit {
    type Key = (i64, i32);

    fn key(&self) -> (i64, i32) {
        (self.id, self.global_order)
    }
}

/// 取得元ページ番号付きのレコード
///
/// `__page` は復元時の範囲計算にだけ使う。描画では見ない。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagedItem<T> {
    #[serde(rename = "__page")]
    pub page: u32,
    #[serde(flatten)]
    pub item: T,
}

/// 読み込み済みページの閉区間
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedRange {
    pub min: u32,
    pub max: u32,
}

impl LoadedRange {
    pub fn single(page: u32) -> Self {
        Self {
            min: page,
            max: page,
        }
    }
}

/// 取得モード
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// コレクションを置き換える（フィルタ変更・初回）
    Replace,
    /// 末尾に追加する（次ページ）
    Append,
}

/// 発行済みリクエスト
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 発行時のフィルタセッション番号
    pub session: u64,
    pub page: u32,
    pub mode: LoadMode,
}

/// 応答適用の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied { added: usize },
    /// 発行後にフィルタが変わった
    Stale,
    Failed,
}

/// ページング一覧の状態
#[derive(Debug, Clone)]
pub struct PagedList<T: ListItem> {
    items: Vec<PagedItem<T>>,
    index: HashMap<T::Key, usize>,
    range: Option<LoadedRange>,
    total_pages: u32,
    total_elements: u64,
    session: u64,
    in_flight: Option<PageRequest>,
    error: Option<String>,
    /// 直近に失敗した取得のモード
    failed_mode: Option<LoadMode>,
}

impl<T: ListItem> Default for PagedList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            range: None,
            total_pages: 0,
            total_elements: 0,
            session: 0,
            in_flight: None,
            error: None,
            failed_mode: None,
        }
    }
}

impl<T: ListItem> PagedList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// リクエストを発行済みにする
    pub fn begin(&mut self, page: u32, mode: LoadMode) -> PageRequest {
        let request = PageRequest {
            session: self.session,
            page,
            mode,
        };
        self.in_flight = Some(request);
        request
    }

    /// 応答を適用する
    pub fn apply(
        &mut self,
        request: PageRequest,
        result: Result<FetchedPage<T>, Error>,
    ) -> ApplyOutcome {
        if request.session != self.session {
            tracing::debug!(
                request_session = request.session,
                current_session = self.session,
                page = request.page,
                "discarding response from an abandoned filter session"
            );
            return ApplyOutcome::Stale;
        }
        if self.in_flight == Some(request) {
            self.in_flight = None;
        }

        match result {
            Ok(fetched) => {
                self.error = None;
                self.failed_mode = None;
                self.total_pages = fetched.total_pages;
                self.total_elements = fetched.total_elements;
                let added = match request.mode {
                    LoadMode::Replace => {
                        self.clear_items();
                        let added = self.merge(request.page, fetched.items);
                        self.range = Some(LoadedRange::single(request.page));
                        added
                    }
                    LoadMode::Append => {
                        let added = self.merge(request.page, fetched.items);
                        self.range = Some(match self.range {
                            Some(range) => LoadedRange {
                                min: range.min,
                                max: range.max.max(request.page),
                            },
                            None => LoadedRange::single(request.page),
                        });
                        added
                    }
                };
                ApplyOutcome::Applied { added }
            }
            Err(err) => {
                tracing::warn!(page = request.page, error = %err, "page fetch failed");
                self.error = Some(err.user_message());
                self.failed_mode = Some(request.mode);
                if request.mode == LoadMode::Replace {
                    self.clear_items();
                    self.range = None;
                    self.total_pages = 0;
                    self.total_elements = 0;
                }
                ApplyOutcome::Failed
            }
        }
    }

    /// 新しいフィルタセッションを始める
    pub fn reset(&mut self) {
        self.session += 1;
        self.clear_items();
        self.range = None;
        self.total_pages = 0;
        self.total_elements = 0;
        self.in_flight = None;
        self.error = None;
        self.failed_mode = None;
    }

    /// スナップショットから再構築する
    ///
    /// 範囲の下端は `__page` の最小値、上端は保存時の最終ページ。
    pub fn restore(
        &mut self,
        items: Vec<PagedItem<T>>,
        last_page: u32,
        total_pages: u32,
        total_elements: u64,
    ) {
        self.reset();
        let min = items.iter().map(|entry| entry.page).min();
        let max = items.iter().map(|entry| entry.page).max();
        for entry in items {
            self.push_unique(entry);
        }
        self.range = match (min, max) {
            (Some(min), Some(max)) => Some(LoadedRange {
                min: min.min(last_page),
                max: max.max(last_page),
            }),
            _ => None,
        };
        self.total_pages = total_pages;
        self.total_elements = total_elements;
    }

    /// 追加で読めるページがあるか
    pub fn has_more(&self) -> bool {
        self.range
            .map(|range| range.max + 1 < self.total_pages)
            .unwrap_or(false)
    }

    /// 次に読むページ
    pub fn next_page(&self) -> Option<u32> {
        if self.has_more() {
            self.range.map(|range| range.max + 1)
        } else {
            None
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// 置き換え取得中（初回ロード表示用）
    pub fn is_replacing(&self) -> bool {
        matches!(
            self.in_flight,
            Some(PageRequest {
                mode: LoadMode::Replace,
                ..
            })
        )
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn range(&self) -> Option<LoadedRange> {
        self.range
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_elements(&self) -> u64 {
        self.total_elements
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// 失敗したまま止まっている取得のモード
    pub fn failed_mode(&self) -> Option<LoadMode> {
        self.failed_mode
    }

    pub fn entries(&self) -> &[PagedItem<T>] {
        &self.items
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|entry| &entry.item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &T::Key) -> bool {
        self.index.contains_key(key)
    }

    /// キーの表示位置
    pub fn position(&self, key: &T::Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    fn clear_items(&mut self) {
        self.items.clear();
        self.index.clear();
    }

    fn merge(&mut self, page: u32, incoming: Vec<T>) -> usize {
        let mut added = 0;
        for item in incoming {
            if self.push_unique(PagedItem { page, item }) {
                added += 1;
            }
        }
        added
    }

    fn push_unique(&mut self, entry: PagedItem<T>) -> bool {
        let key = entry.item.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.items.len());
        self.items.push(entry);
        true
    }
}

impl<T: ListItem + Clone> PagedList<T> {
    /// スナップショット用の複製
    pub fn snapshot_items(&self) -> Vec<PagedItem<T>> {
        self.items.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soul(id: i64) -> Soul {
        Soul {
            id,
            name: format!("영혼{}", id),
            ..Default::default()
        }
    }

    fn page_of(ids: std::ops::Range<i64>, total_pages: u32) -> FetchedPage<Soul> {
        let items: Vec<Soul> = ids.map(soul).collect();
        FetchedPage {
            total_elements: items.len() as u64 * total_pages as u64,
            items,
            total_pages,
        }
    }

    fn ids(list: &PagedList<Soul>) -> Vec<i64> {
        list.iter().map(|s| s.id).collect()
    }

    #[test]
    fn test_replace_sets_single_page_range() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        assert!(list.is_fetching());
        assert!(list.is_replacing());

        let outcome = list.apply(req, Ok(page_of(0..20, 3)));

        assert_eq!(outcome, ApplyOutcome::Applied { added: 20 });
        assert_eq!(list.range(), Some(LoadedRange::single(0)));
        assert!(!list.is_fetching());
        assert!(list.has_more());
        assert_eq!(list.next_page(), Some(1));
    }

    #[test]
    fn test_append_drops_overlapping_ids() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 4)));

        // バックエンドのページがずれて5件重複
        let req = list.begin(1, LoadMode::Append);
        let outcome = list.apply(req, Ok(page_of(15..35, 4)));
        assert_eq!(outcome, ApplyOutcome::Applied { added: 15 });

        let req = list.begin(2, LoadMode::Append);
        list.apply(req, Ok(page_of(30..50, 4)));

        let got = ids(&list);
        let mut unique = got.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(got.len(), unique.len());
        assert_eq!(got, (0..50).collect::<Vec<_>>());
        assert_eq!(list.position(&15), Some(15));
    }

    #[test]
    fn test_replace_dedups_within_page() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        let fetched = FetchedPage {
            items: vec![soul(1), soul(2), soul(1)],
            total_pages: 1,
            total_elements: 3,
        };
        list.apply(req, Ok(fetched));
        assert_eq!(ids(&list), vec![1, 2]);
    }

    #[test]
    fn test_range_max_is_monotonic_until_replace() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 5)));

        let mut last_max = 0;
        for page in 1..4 {
            let req = list.begin(page, LoadMode::Append);
            list.apply(req, Ok(page_of(page as i64 * 20..page as i64 * 20 + 20, 5)));
            let max = list.range().map(|r| r.max).unwrap_or(0);
            assert!(max >= last_max);
            last_max = max;
        }
        assert_eq!(list.range(), Some(LoadedRange { min: 0, max: 3 }));

        // 古いページが遅れて届いても上端は下がらない
        let req = list.begin(1, LoadMode::Append);
        list.apply(req, Ok(page_of(20..40, 5)));
        assert_eq!(list.range().map(|r| r.max), Some(3));

        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(100..120, 2)));
        assert_eq!(list.range(), Some(LoadedRange::single(0)));
        assert_eq!(list.len(), 20);
    }

    #[test]
    fn test_three_pages_then_exhausted() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 3)));

        while let Some(next) = list.next_page() {
            let req = list.begin(next, LoadMode::Append);
            let start = next as i64 * 20;
            list.apply(req, Ok(page_of(start..start + 20, 3)));
        }

        assert_eq!(list.len(), 60);
        assert!(!list.has_more());
        assert_eq!(list.next_page(), None);
    }

    #[test]
    fn test_replace_failure_clears_and_retry_repopulates() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 3)));

        list.reset();
        let req = list.begin(0, LoadMode::Replace);
        let outcome = list.apply(
            req,
            Err(Error::Http {
                status: 500,
                message: "HTTP error! status: 500".to_string(),
            }),
        );

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(list.is_empty());
        assert_eq!(list.range(), None);
        assert_eq!(list.error(), Some("HTTP error! status: 500"));
        assert!(!list.is_fetching());

        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 3)));
        assert_eq!(list.len(), 20);
        assert_eq!(list.error(), None);
        assert_eq!(list.range(), Some(LoadedRange::single(0)));
    }

    #[test]
    fn test_append_failure_keeps_items() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 3)));

        let req = list.begin(1, LoadMode::Append);
        let outcome = list.apply(req, Err(Error::Network("connection reset".into())));

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert_eq!(list.len(), 20);
        assert_eq!(list.range(), Some(LoadedRange::single(0)));
        assert!(list.error().is_some());
        assert!(list.has_more());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut list = PagedList::new();
        let req = list.begin(0, LoadMode::Replace);
        list.apply(req, Ok(page_of(0..20, 3)));
        let slow = list.begin(1, LoadMode::Append);

        // フィルタ変更後に新しい取得を開始
        list.reset();
        let fresh = list.begin(0, LoadMode::Replace);

        let outcome = list.apply(slow, Ok(page_of(20..40, 3)));
        assert_eq!(outcome, ApplyOutcome::Stale);
        assert!(list.is_empty());
        assert_eq!(list.in_flight(), Some(fresh));

        list.apply(fresh, Ok(page_of(500..510, 1)));
        assert_eq!(ids(&list), (500..510).collect::<Vec<_>>());
    }

    #[test]
    fn test_restore_rebuilds_range_from_markers() {
        let entries: Vec<PagedItem<Soul>> = (0..60)
            .map(|id| PagedItem {
                page: (id / 20) as u32,
                item: soul(id),
            })
            .collect();

        let mut list = PagedList::new();
        list.restore(entries, 2, 5, 100);

        assert_eq!(list.len(), 60);
        assert_eq!(list.range(), Some(LoadedRange { min: 0, max: 2 }));
        assert_eq!(list.next_page(), Some(3));
        assert!(list.contains(&59));
    }

    #[test]
    fn test_traveling_visits_keep_repeated_soul() {
        let mut list: PagedList<TravelingVisit> = PagedList::new();
        let visit = |id, global_order| TravelingVisit {
            id,
            global_order,
            ..Default::default()
        };
        let req = list.begin(0, LoadMode::Replace);
        list.apply(
            req,
            Ok(FetchedPage {
                items: vec![visit(7, 40), visit(7, 12), visit(7, -2), visit(7, 40)],
                total_pages: 1,
                total_elements: 4,
            }),
        );
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_paged_item_serde_marker() {
        let entry = PagedItem {
            page: 2,
            item: soul(9),
        };
        let json = serde_json::to_value(&entry).expect("シリアライズ失敗");
        assert_eq!(json["__page"], 2);
        assert_eq!(json["id"], 9);

        let back: PagedItem<Soul> = serde_json::from_value(json).expect("デシリアライズ失敗");
        assert_eq!(back, entry);
    }
}
