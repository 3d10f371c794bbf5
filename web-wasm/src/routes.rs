//! ルートのパスとリンク生成

use sky_souls_common::ListPage;

pub const SOUL_DETAIL: &str = "/sky/SeasonDictionary/souls";
pub const SEASON_LIST: &str = "/sky/SeasonDictionary/seasons";
pub const IMAGE_UPLOAD: &str = "/sky/SeasonDictionary/Images/upload";

/// 一覧ページのURL（クエリが空なら付けない）
pub fn list_href(page: ListPage, query_string: &str) -> String {
    if query_string.is_empty() {
        page.path().to_string()
    } else {
        format!("{}?{}", page.path(), query_string)
    }
}

pub fn soul_href(soul_id: i64) -> String {
    format!("{}/{}", SOUL_DETAIL, soul_id)
}

pub fn soul_edit_href(soul_id: i64) -> String {
    format!("{}/{}/edit", SOUL_DETAIL, soul_id)
}

/// 一般 유랑 목록で使う要素ID
pub fn soul_anchor(soul_id: i64) -> String {
    format!("soul-{}", soul_id)
}

/// `#soul-<id>` から영혼IDを取り出す
pub fn anchor_soul_id(hash: &str) -> Option<i64> {
    hash.trim_start_matches('#')
        .strip_prefix("soul-")?
        .parse()
        .ok()
}

/// パスパラメータのID
pub fn parse_id(raw: Option<String>) -> Option<i64> {
    raw?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_href() {
        assert_eq!(
            list_href(ListPage::SeasonDictionary, ""),
            "/sky/SeasonDictionary"
        );
        assert_eq!(
            list_href(ListPage::GeneralVisits, "mode=card"),
            "/sky/travelingSprits/generalVisits/list?mode=card"
        );
    }

    #[test]
    fn test_soul_links() {
        assert_eq!(soul_href(12), "/sky/SeasonDictionary/souls/12");
        assert_eq!(soul_edit_href(12), "/sky/SeasonDictionary/souls/12/edit");
    }

    #[test]
    fn test_anchor_round_trip() {
        assert_eq!(anchor_soul_id(&format!("#{}", soul_anchor(77))), Some(77));
        assert_eq!(anchor_soul_id("#soul-"), None);
        assert_eq!(anchor_soul_id("#top"), None);
        assert_eq!(anchor_soul_id(""), None);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Some(" 5 ".to_string())), Some(5));
        assert_eq!(parse_id(Some("abc".to_string())), None);
        assert_eq!(parse_id(None), None);
    }
}
