//! 無限スクロールのトリガー
//!
//! リスト末尾の番兵要素がビューポートに入ったら次ページを要求する。
//! 監視の付け外しとリクエスト発行の判定だけを持ち、DOMには触れない。

use crate::listing::{ListItem, LoadMode, PageRequest, PagedList};

/// IntersectionObserver の rootMargin
pub const ROOT_MARGIN: &str = "100px";

/// 監視状態の変更指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverChange {
    Attach,
    Detach,
    Keep,
}

/// 番兵の監視状態
#[derive(Debug, Clone, Default)]
pub struct ScrollTrigger {
    /// 監視中のフィルタセッション
    observing: Option<u64>,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// 監視すべき状態か（1ページ以上読み込み済みで続きがある）
    ///
    /// 取得に失敗した後は利用者が再試行するまで番兵を止めておく。
    pub fn should_observe<T: ListItem>(list: &PagedList<T>) -> bool {
        list.range().is_some() && list.has_more() && list.failed_mode().is_none()
    }

    pub fn is_observing(&self) -> bool {
        self.observing.is_some()
    }

    /// 一覧の状態に合わせて監視を付け直す
    ///
    /// セッションが変わった場合は付け直し（Attach）になる。
    pub fn sync<T: ListItem>(&mut self, list: &PagedList<T>) -> ObserverChange {
        let wanted = Self::should_observe(list).then(|| list.session());
        let change = match (self.observing, wanted) {
            (None, None) => ObserverChange::Keep,
            (Some(_), None) => ObserverChange::Detach,
            (Some(current), Some(next)) if current == next => ObserverChange::Keep,
            (_, Some(_)) => ObserverChange::Attach,
        };
        self.observing = wanted;
        change
    }

    /// 番兵が見えた時の処理
    ///
    /// 取得中のイベントは捨てる（キューイングしない）。
    pub fn on_intersect<T: ListItem>(&self, list: &mut PagedList<T>) -> Option<PageRequest> {
        if list.is_fetching() {
            return None;
        }
        let next = list.next_page()?;
        Some(list.begin(next, LoadMode::Append))
    }

    /// コンポーネント破棄時
    pub fn detach(&mut self) {
        self.observing = None;
    }
}
