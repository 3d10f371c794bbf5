//! 入力フォームの検証とリクエストボディへの変換
//!
//! Web・CLIどちらも文字列入力をそのまま受け取り、ここで型付きのペイロードにする。

use crate::error::{Error, Result};
use crate::types::{
    ImagePayload, ImageType, Season, SeasonPayload, Soul, SoulPayload, VisitPayload, VisitRecord,
};
use chrono::NaiveDate;
use std::collections::HashMap;

/// アップロード上限（10MB）
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// 시즌作成フォームの既定色
pub const DEFAULT_SEASON_COLOR: &str = "#667eea";

/// `a, b,,c` → `["a", "b", "c"]`
pub fn parse_keywords(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .collect()
}

fn required<'a>(value: &'a str, label: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::Validation(format!("{}을(를) 입력해주세요.", label)))
    } else {
        Ok(value)
    }
}

fn parse_int<T: std::str::FromStr>(value: &str, label: &str) -> Result<T> {
    required(value, label)?
        .parse()
        .map_err(|_| Error::Validation(format!("{}은(는) 숫자여야 합니다.", label)))
}

/// `YYYY-MM-DD` を検証して正規化した文字列を返す
pub fn parse_date(value: &str, label: &str) -> Result<String> {
    let value = required(value, label)?;
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| Error::Validation(format!("{} 형식이 올바르지 않습니다 (YYYY-MM-DD).", label)))
}

/// 開始日・終了日を検証（開始 ≤ 終了）
pub fn parse_period(start: &str, end: &str) -> Result<(String, String)> {
    let start = parse_date(start, "시작일")?;
    let end = parse_date(end, "종료일")?;
    // 正規化済みの YYYY-MM-DD は文字列比較で順序が決まる
    if start > end {
        return Err(Error::Validation(
            "종료일은 시작일 이후여야 합니다.".to_string(),
        ));
    }
    Ok((start, end))
}

/// アップロードファイルの検証
pub fn validate_upload(size_bytes: u64, mime_type: &str) -> Result<()> {
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(Error::Validation(
            "파일 크기는 10MB를 초과할 수 없습니다.".to_string(),
        ));
    }
    if !mime_type.starts_with("image/") {
        return Err(Error::Validation(
            "이미지 파일만 업로드 가능합니다.".to_string(),
        ));
    }
    Ok(())
}

/// 영혼フォーム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoulForm {
    pub name: String,
    pub season_id: String,
    pub order_num: String,
    pub is_season_guide: bool,
    pub keywords: String,
    pub description: String,
    pub creator: String,
    pub location: String,
}

impl SoulForm {
    pub fn from_soul(soul: &Soul) -> Self {
        Self {
            name: soul.name.clone(),
            season_id: soul.season_id.map(|id| id.to_string()).unwrap_or_default(),
            order_num: soul.order_num.map(|n| n.to_string()).unwrap_or_default(),
            is_season_guide: soul.is_season_guide,
            keywords: soul.keywords.join(", "),
            description: soul.description.clone(),
            creator: soul.creator.clone(),
            location: soul.location.clone(),
        }
    }

    /// 作成用ボディ。시즌名と期間は選んだ시즌からコピーする
    pub fn to_create_payload(&self, seasons: &[Season]) -> Result<SoulPayload> {
        let mut payload = self.base_payload()?;
        let season = seasons
            .iter()
            .find(|s| s.id == payload.season_id)
            .ok_or_else(|| Error::Validation("선택한 시즌을 찾을 수 없습니다.".to_string()))?;
        payload.season_name = Some(season.name.clone());
        payload.start_date = Some(season.start_date.clone());
        payload.end_date = Some(season.end_date.clone());
        Ok(payload)
    }

    /// 更新用ボディ（画像スロットの現在値を含める）
    pub fn to_update_payload(&self, images: Vec<ImagePayload>) -> Result<SoulPayload> {
        let mut payload = self.base_payload()?;
        let location = self.location.trim();
        if !location.is_empty() {
            payload.location = Some(location.to_string());
        }
        payload.images = images;
        Ok(payload)
    }

    fn base_payload(&self) -> Result<SoulPayload> {
        Ok(SoulPayload {
            name: required(&self.name, "영혼 이름")?.to_string(),
            season_id: parse_int(&self.season_id, "시즌")?,
            order_num: parse_int(&self.order_num, "순서")?,
            is_season_guide: self.is_season_guide,
            keywords: parse_keywords(&self.keywords),
            description: self.description.trim().to_string(),
            creator: self.creator.trim().to_string(),
            ..Default::default()
        })
    }
}

/// 시즌フォーム
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonForm {
    pub name: String,
    pub order_num: String,
    pub start_date: String,
    pub end_date: String,
    pub color: String,
    pub is_collaboration: bool,
}

impl Default for SeasonForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            order_num: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            color: DEFAULT_SEASON_COLOR.to_string(),
            is_collaboration: false,
        }
    }
}

impl SeasonForm {
    pub fn from_season(season: &Season) -> Self {
        Self {
            name: season.name.clone(),
            order_num: season.order_num.to_string(),
            start_date: season.start_date.clone(),
            end_date: season.end_date.clone(),
            color: season.color.clone(),
            is_collaboration: season.is_collaboration,
        }
    }

    pub fn to_payload(&self) -> Result<SeasonPayload> {
        let (start_date, end_date) = parse_period(&self.start_date, &self.end_date)?;
        let color = self.color.trim();
        Ok(SeasonPayload {
            name: required(&self.name, "시즌 이름")?.to_string(),
            order_num: parse_int(&self.order_num, "순서")?,
            start_date,
            end_date,
            color: if color.is_empty() {
                DEFAULT_SEASON_COLOR.to_string()
            } else {
                color.to_string()
            },
            is_collaboration: self.is_collaboration,
        })
    }
}

/// 유랑 이력フォーム
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitForm {
    pub soul_id: String,
    pub visit_number: String,
    pub start_date: String,
    pub end_date: String,
    pub is_warband_visit: bool,
}

impl VisitForm {
    pub fn from_record(record: &VisitRecord) -> Self {
        Self {
            soul_id: record.soul_id.to_string(),
            visit_number: record.visit_number.to_string(),
            start_date: record.start_date.clone(),
            end_date: record.end_date.clone(),
            is_warband_visit: record.is_warband_visit,
        }
    }

    pub fn to_payload(&self) -> Result<VisitPayload> {
        let (start_date, end_date) = parse_period(&self.start_date, &self.end_date)?;
        Ok(VisitPayload {
            soul_id: parse_int(&self.soul_id, "영혼")?,
            visit_number: parse_int(&self.visit_number, "방문 차수")?,
            start_date,
            end_date,
            is_warband_visit: self.is_warband_visit,
        })
    }
}

/// 編集画面の画像スロット
///
/// 読み込み時のURL（original）と編集中のURL（current）を持つ。
/// 編集中に上げた一時画像を差し替え・削除したときは、そのURLをサーバーから消す。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageSlots {
    original: HashMap<ImageType, String>,
    current: HashMap<ImageType, String>,
}

impl ImageSlots {
    pub fn from_soul(soul: &Soul) -> Self {
        let original: HashMap<ImageType, String> = soul
            .images
            .iter()
            .map(|img| (img.image_type, img.url.clone()))
            .collect();
        Self {
            current: original.clone(),
            original,
        }
    }

    pub fn current(&self, image_type: ImageType) -> Option<&str> {
        self.current.get(&image_type).map(String::as_str)
    }

    fn is_original(&self, image_type: ImageType, url: &str) -> bool {
        self.original.get(&image_type).map(String::as_str) == Some(url)
    }

    /// 新しいURLに差し替える。削除すべき一時画像のURLを返す
    pub fn replace(&mut self, image_type: ImageType, url: String) -> Option<String> {
        let previous = self.current.insert(image_type, url)?;
        if self.is_original(image_type, &previous) {
            None
        } else {
            Some(previous)
        }
    }

    /// スロットを空にする。削除すべき一時画像のURLを返す
    pub fn remove(&mut self, image_type: ImageType) -> Option<String> {
        let previous = self.current.remove(&image_type)?;
        if self.is_original(image_type, &previous) {
            None
        } else {
            Some(previous)
        }
    }

    /// 更新ボディ用（種類の定義順）
    pub fn to_payload(&self) -> Vec<ImagePayload> {
        ImageType::ALL
            .iter()
            .filter_map(|image_type| {
                self.current.get(image_type).map(|url| ImagePayload {
                    image_type: *image_type,
                    url: url.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SoulImage;

    fn season() -> Season {
        Season {
            id: 7,
            name: "감사".to_string(),
            order_num: 1,
            start_date: "2019-07-18".to_string(),
            end_date: "2019-10-07".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(
            parse_keywords(" 망토, 머리 ,, 소품 "),
            vec!["망토", "머리", "소품"]
        );
        assert!(parse_keywords(" , ").is_empty());
    }

    #[test]
    fn test_soul_create_copies_season() {
        let form = SoulForm {
            name: "감사하는 정령".to_string(),
            season_id: "7".to_string(),
            order_num: "3".to_string(),
            keywords: "망토, 머리".to_string(),
            ..Default::default()
        };
        let payload = form.to_create_payload(&[season()]).expect("変換失敗");

        assert_eq!(payload.season_name.as_deref(), Some("감사"));
        assert_eq!(payload.start_date.as_deref(), Some("2019-07-18"));
        assert_eq!(payload.order_num, 3);
        assert_eq!(payload.keywords.len(), 2);
    }

    #[test]
    fn test_soul_form_errors() {
        let form = SoulForm {
            name: "  ".to_string(),
            ..Default::default()
        };
        let err = form.to_create_payload(&[season()]).unwrap_err();
        assert!(err.user_message().contains("영혼 이름"));

        let form = SoulForm {
            name: "a".to_string(),
            season_id: "99".to_string(),
            order_num: "x".to_string(),
            ..Default::default()
        };
        let err = form.to_create_payload(&[season()]).unwrap_err();
        assert!(err.user_message().contains("숫자"));

        let form = SoulForm {
            order_num: "1".to_string(),
            ..form
        };
        let err = form.to_create_payload(&[season()]).unwrap_err();
        assert_eq!(err.user_message(), "선택한 시즌을 찾을 수 없습니다.");
    }

    #[test]
    fn test_season_period_order() {
        let form = SeasonForm {
            name: "리듬".to_string(),
            order_num: "4".to_string(),
            start_date: "2020-02-01".to_string(),
            end_date: "2020-01-01".to_string(),
            ..Default::default()
        };
        assert!(form.to_payload().is_err());

        let form = SeasonForm {
            end_date: "2020-03-01".to_string(),
            color: String::new(),
            ..form
        };
        let payload = form.to_payload().expect("変換失敗");
        assert_eq!(payload.color, DEFAULT_SEASON_COLOR);
    }

    #[test]
    fn test_visit_form_rejects_bad_date() {
        let form = VisitForm {
            soul_id: "1".to_string(),
            visit_number: "2".to_string(),
            start_date: "2024/01/01".to_string(),
            end_date: "2024-01-05".to_string(),
            is_warband_visit: true,
        };
        assert!(matches!(form.to_payload(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_validate_upload() {
        assert!(validate_upload(1024, "image/png").is_ok());
        assert!(validate_upload(MAX_UPLOAD_BYTES + 1, "image/png").is_err());
        assert!(validate_upload(10, "application/pdf").is_err());
    }

    #[test]
    fn test_image_slots_cleanup_urls() {
        let soul = Soul {
            images: vec![SoulImage {
                id: Some(1),
                image_type: ImageType::Representative,
                url: "https://cdn/orig.png".to_string(),
            }],
            ..Default::default()
        };
        let mut slots = ImageSlots::from_soul(&soul);

        // 元画像の差し替えでは何も消さない
        assert_eq!(
            slots.replace(ImageType::Representative, "https://cdn/tmp1.png".to_string()),
            None
        );
        // 一時画像を差し替えると一時画像を消す
        assert_eq!(
            slots.replace(ImageType::Representative, "https://cdn/tmp2.png".to_string()),
            Some("https://cdn/tmp1.png".to_string())
        );
        assert_eq!(
            slots.remove(ImageType::Representative),
            Some("https://cdn/tmp2.png".to_string())
        );
        assert_eq!(slots.replace(ImageType::Wearing, "https://cdn/w.png".to_string()), None);

        let payload = slots.to_payload();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload[0].image_type, ImageType::Wearing);
    }
}
