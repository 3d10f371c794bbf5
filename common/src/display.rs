//! 日付表示と訪問ステータス

use chrono::NaiveDate;

/// `2024-03-15` → `24.03.15`（狭い画面向け）
///
/// 形式が違えばそのまま返す。
pub fn format_compact_date(date: &str) -> String {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return date.to_string();
    }
    let year = parts[0]
        .char_indices()
        .rev()
        .nth(1)
        .map(|(idx, _)| &parts[0][idx..])
        .unwrap_or(parts[0]);
    format!("{}.{}.{}", year, parts[1], parts[2])
}

/// `2024-03-15` → `2024.03.15`
pub fn format_dotted_date(date: &str) -> String {
    if date.is_empty() {
        return String::new();
    }
    date.replace('-', ".")
}

/// `start ~ end`
pub fn format_period(start: &str, end: &str, compact: bool) -> String {
    if compact {
        format!("{} ~ {}", format_compact_date(start), format_compact_date(end))
    } else {
        format!("{} ~ {}", start, end)
    }
}

/// 유랑 이력の状態バッジ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitStatus {
    Active,
    Ended,
    Upcoming,
}

impl VisitStatus {
    /// 開始日・終了日（`YYYY-MM-DD`）と今日から判定。日付が読めなければ `None`
    pub fn on(start_date: &str, end_date: &str, today: NaiveDate) -> Option<Self> {
        let start = NaiveDate::parse_from_str(start_date.trim(), "%Y-%m-%d").ok()?;
        let end = NaiveDate::parse_from_str(end_date.trim(), "%Y-%m-%d").ok()?;
        Some(if today >= start && today <= end {
            VisitStatus::Active
        } else if today > end {
            VisitStatus::Ended
        } else {
            VisitStatus::Upcoming
        })
    }

    pub fn label(&self) -> &'static str {
        match self {
            VisitStatus::Active => "진행중",
            VisitStatus::Ended => "종료",
            VisitStatus::Upcoming => "예정",
        }
    }

    /// CSSクラス名
    pub fn css_class(&self) -> &'static str {
        match self {
            VisitStatus::Active => "badge-active",
            VisitStatus::Ended => "badge-ended",
            VisitStatus::Upcoming => "badge-upcoming",
        }
    }
}
