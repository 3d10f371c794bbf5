//! シーズン名と表示色

/// 未登録シーズンの色
pub const FALLBACK_COLOR: &str = "#888";

/// シーズン名 → バッジ色（チップの並び順を兼ねる）
pub const SEASON_COLORS: &[(&str, &str)] = &[
    ("감사", "#FFD700"),
    ("빛 추적자", "#FF6347"),
    ("친밀", "#4CAF50"),
    ("리듬", "#3F51B5"),
    ("마법", "#9C27B0"),
    ("낙원", "#FF5722"),
    ("예언", "#9E9E9E"),
    ("꿈", "#00BCD4"),
    ("협력", "#8BC34A"),
    ("어린왕자", "#FFC107"),
    ("비행", "#03A9F4"),
    ("심해", "#2196F3"),
    ("공연", "#FF4081"),
    ("파편", "#607D8B"),
    ("오로라", "#673AB7"),
    ("기억", "#009688"),
    ("성장", "#8BC34A"),
    ("순간", "#FF9800"),
    ("재생", "#3F51B5"),
    ("구색록", "#A1887F"),
    ("보금자리", "#795548"),
    ("듀엣", "#FFEB3B"),
    ("무민", "#CDDC39"),
    ("광채", "#FF1493"),
    ("파랑새", "#1E90FF"),
    ("불씨", "#FF4500"),
];

pub fn season_color(season_name: &str) -> &'static str {
    SEASON_COLORS
        .iter()
        .find(|(name, _)| *name == season_name.trim())
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}

/// シーズン選択チップの名前一覧
pub fn season_names() -> impl Iterator<Item = &'static str> {
    SEASON_COLORS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_seasons() {
        assert_eq!(season_color("감사"), "#FFD700");
        assert_eq!(season_color(" 빛 추적자 "), "#FF6347");
        assert_eq!(season_color("미지의 시즌"), FALLBACK_COLOR);
    }

    #[test]
    fn test_season_names_order() {
        let names: Vec<_> = season_names().collect();
        assert_eq!(names.first(), Some(&"감사"));
        assert_eq!(names.len(), SEASON_COLORS.len());
    }
}
