//! 管理系サブコマンド（영혼・시즌・유랑 이력・이미지・セッション）

use crate::api::{ApiClient, UploadFile};
use crate::cli::{ImageAction, SeasonAction, SeasonArgs, SoulAction, SoulArgs, VisitAction, VisitArgs};
use crate::error::{Result, SkySoulsError};
use crate::render;
use crate::store::FileStore;
use dialoguer::{Confirm, Input, Select};
use sky_souls_common::display::VisitStatus;
use sky_souls_common::forms::{validate_upload, ImageSlots, SeasonForm, SoulForm, VisitForm};
use sky_souls_common::{ListPage, PageCache};
use std::path::Path;

/// 削除前の確認（`--yes` で省略）
fn confirm(prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

/// 未指定なら対話入力
fn text_or_prompt(value: Option<String>, label: &str, initial: &str) -> Result<String> {
    if let Some(value) = value {
        return Ok(value);
    }
    let input: String = Input::new()
        .with_prompt(label)
        .with_initial_text(initial.to_string())
        .allow_empty(true)
        .interact_text()?;
    Ok(input)
}

/// 画像ファイルを読み込み、形式とサイズを検証
pub fn read_upload(path: &Path) -> Result<UploadFile> {
    if !path.exists() {
        return Err(SkySoulsError::FileNotFound(path.display().to_string()));
    }
    let bytes = std::fs::read(path)?;
    let format = image::guess_format(&bytes)
        .map_err(|e| SkySoulsError::ImageFormat(format!("{}: {}", path.display(), e)))?;
    let mime_type = format.to_mime_type().to_string();
    validate_upload(bytes.len() as u64, &mime_type)?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());
    Ok(UploadFile {
        file_name,
        mime_type,
        bytes,
    })
}

fn apply_soul_args(form: &mut SoulForm, args: SoulArgs) {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(id) = args.season_id {
        form.season_id = id.to_string();
    }
    if let Some(order) = args.order {
        form.order_num = order.to_string();
    }
    if let Some(keywords) = args.keywords {
        form.keywords = keywords;
    }
    if let Some(description) = args.description {
        form.description = description;
    }
    if let Some(creator) = args.creator {
        form.creator = creator;
    }
    if let Some(location) = args.location {
        form.location = location;
    }
    if let Some(guide) = args.guide {
        form.is_season_guide = guide;
    }
}

pub async fn soul(api: &ApiClient, action: SoulAction) -> Result<()> {
    match action {
        SoulAction::Show { id } => {
            let soul = api.soul(id).await?;
            render::print_soul_detail(&soul);
        }

        SoulAction::Create(args) => {
            println!("🕊  영혼 생성\n");
            let seasons = api.seasons().await?;
            let season_id = match args.season_id {
                Some(id) => id,
                None => {
                    let labels: Vec<String> =
                        seasons.iter().map(|s| format!("{} (#{})", s.name, s.id)).collect();
                    if labels.is_empty() {
                        return Err(SkySoulsError::InvalidArgument(
                            "시즌이 없습니다. 먼저 시즌을 생성해주세요.".into(),
                        ));
                    }
                    let index = Select::new()
                        .with_prompt("시즌")
                        .items(&labels)
                        .default(0)
                        .interact()?;
                    seasons[index].id
                }
            };
            let form = SoulForm {
                name: text_or_prompt(args.name, "영혼 이름", "")?,
                season_id: season_id.to_string(),
                order_num: text_or_prompt(args.order.map(|n| n.to_string()), "순서", "")?,
                is_season_guide: args.guide.unwrap_or(false),
                keywords: text_or_prompt(args.keywords, "키워드 (쉼표 구분)", "")?,
                description: text_or_prompt(args.description, "설명", "")?,
                creator: text_or_prompt(args.creator, "작성자", "")?,
                location: args.location.unwrap_or_default(),
            };
            let payload = form.to_create_payload(&seasons)?;
            let created = api.create_soul(&payload).await?;
            println!("✔ 영혼이 성공적으로 생성되었습니다! (#{})", created.id);
        }

        SoulAction::Update {
            id,
            fields,
            images,
            remove_images,
        } => {
            let soul = api.soul(id).await?;
            let mut form = SoulForm::from_soul(&soul);
            apply_soul_args(&mut form, fields);
            let mut slots = ImageSlots::from_soul(&soul);

            for assignment in images {
                let file = read_upload(&assignment.path)?;
                let uploaded = api.upload_image(file, assignment.image_type, None).await?;
                println!("✔ {} 업로드: {}", assignment.image_type.label(), uploaded.url);
                if let Some(stale) = slots.replace(assignment.image_type, uploaded.url) {
                    delete_stale_upload(api, &stale).await;
                }
            }
            for image_type in remove_images {
                if let Some(stale) = slots.remove(image_type) {
                    delete_stale_upload(api, &stale).await;
                }
            }

            let payload = form.to_update_payload(slots.to_payload())?;
            let updated = api.update_soul(id, &payload).await?;
            println!("✔ 영혼이 수정되었습니다: {}", updated.name);
        }

        SoulAction::Delete { id, yes } => {
            if confirm("정말 이 영혼을 삭제하시겠습니까?", yes)? {
                api.delete_soul(id).await?;
                println!("✔ 영혼이 삭제되었습니다");
            }
        }
    }
    Ok(())
}

/// 差し替えで不要になった一時画像を消す（失敗はログのみ）
async fn delete_stale_upload(api: &ApiClient, url: &str) {
    if let Err(err) = api.delete_image_by_url(url).await {
        tracing::warn!(%url, error = %err, "failed to delete superseded upload");
    }
}

fn season_form_with(mut form: SeasonForm, args: SeasonArgs) -> SeasonForm {
    if let Some(name) = args.name {
        form.name = name;
    }
    if let Some(order) = args.order {
        form.order_num = order.to_string();
    }
    if let Some(start) = args.start {
        form.start_date = start;
    }
    if let Some(end) = args.end {
        form.end_date = end;
    }
    if let Some(color) = args.color {
        form.color = color;
    }
    if let Some(collaboration) = args.collaboration {
        form.is_collaboration = collaboration;
    }
    form
}

pub async fn season(api: &ApiClient, action: SeasonAction) -> Result<()> {
    match action {
        SeasonAction::List => {
            let mut seasons = api.seasons().await?;
            seasons.sort_by_key(|s| s.order_num);
            println!("시즌 목록 ({}개)", seasons.len());
            for season in &seasons {
                render::print_season_row(season);
            }
        }

        SeasonAction::Show { id } => {
            let season = api.season(id).await?;
            render::print_season_row(&season);
            let souls = api.souls_in_season(&season.name).await?;
            println!("  영혼 {}명", souls.len());
            for soul in &souls {
                println!(
                    "    {} {}",
                    soul.order_num.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
                    soul.name
                );
            }
        }

        SeasonAction::Create(args) => {
            println!("🗓  시즌 생성\n");
            let form = SeasonForm {
                name: text_or_prompt(args.name, "시즌 이름", "")?,
                order_num: text_or_prompt(args.order.map(|n| n.to_string()), "순서", "")?,
                start_date: text_or_prompt(args.start, "시작일 (YYYY-MM-DD)", "")?,
                end_date: text_or_prompt(args.end, "종료일 (YYYY-MM-DD)", "")?,
                color: args.color.unwrap_or_else(|| SeasonForm::default().color),
                is_collaboration: args.collaboration.unwrap_or(false),
            };
            let created = api.create_season(&form.to_payload()?).await?;
            println!("✔ 시즌이 성공적으로 생성되었습니다! (#{})", created.id);
        }

        SeasonAction::Update { id, fields } => {
            let season = api.season(id).await?;
            let form = season_form_with(SeasonForm::from_season(&season), fields);
            let updated = api.update_season(id, &form.to_payload()?).await?;
            println!("✔ 시즌이 수정되었습니다: {}", updated.name);
        }

        SeasonAction::Delete { id, yes } => {
            if confirm("정말 이 시즌을 삭제하시겠습니까?", yes)? {
                api.delete_season(id).await?;
                println!("✔ 시즌이 삭제되었습니다");
            }
        }
    }
    Ok(())
}

fn visit_form_with(mut form: VisitForm, args: VisitArgs) -> VisitForm {
    if let Some(soul_id) = args.soul_id {
        form.soul_id = soul_id.to_string();
    }
    if let Some(number) = args.number {
        form.visit_number = number.to_string();
    }
    if let Some(start) = args.start {
        form.start_date = start;
    }
    if let Some(end) = args.end {
        form.end_date = end;
    }
    if let Some(warband) = args.warband {
        form.is_warband_visit = warband;
    }
    form
}

pub async fn visit(api: &ApiClient, action: VisitAction, page_size: u32) -> Result<()> {
    match action {
        VisitAction::List { page } => {
            let fetched = api.traveling_visits(page, page_size).await?;
            let today = chrono::Local::now().date_naive();
            println!(
                "유랑 이력 {}/{} 페이지 (전체 {}건)",
                page + 1,
                fetched.total_pages.max(1),
                fetched.total_elements
            );
            for visit in &fetched.items {
                let status = VisitStatus::on(&visit.start_date, &visit.end_date, today);
                render::print_visit_row(visit, status);
            }
        }

        VisitAction::Show { id } => {
            let record = api.visit(id).await?;
            render::print_visit_record(&record);
        }

        VisitAction::Create(args) => {
            println!("🧳 유랑 이력 생성\n");
            let soul_id = match args.soul_id {
                Some(id) => id,
                None => {
                    let souls = api.all_souls().await?;
                    if souls.is_empty() {
                        return Err(SkySoulsError::InvalidArgument("영혼이 없습니다.".into()));
                    }
                    let labels: Vec<String> = souls
                        .iter()
                        .map(|s| format!("{} [{}]", s.name, s.season_name))
                        .collect();
                    let index = Select::new()
                        .with_prompt("영혼")
                        .items(&labels)
                        .default(0)
                        .interact()?;
                    souls[index].id
                }
            };
            let form = VisitForm {
                soul_id: soul_id.to_string(),
                visit_number: text_or_prompt(args.number.map(|n| n.to_string()), "방문 차수", "")?,
                start_date: text_or_prompt(args.start, "시작일 (YYYY-MM-DD)", "")?,
                end_date: text_or_prompt(args.end, "종료일 (YYYY-MM-DD)", "")?,
                is_warband_visit: args.warband.unwrap_or(false),
            };
            let created = api.create_visit(&form.to_payload()?).await?;
            println!("✔ 유랑 이력이 성공적으로 생성되었습니다! (#{})", created.id);
        }

        VisitAction::Update { id, fields } => {
            let record = api.visit(id).await?;
            let form = visit_form_with(VisitForm::from_record(&record), fields);
            api.update_visit(id, &form.to_payload()?).await?;
            println!("✔ 유랑 이력이 수정되었습니다");
        }

        VisitAction::Delete { id, yes } => {
            if confirm("정말 이 유랑 이력을 삭제하시겠습니까?", yes)? {
                api.delete_visit(id).await?;
                println!("✔ 유랑 이력이 삭제되었습니다");
            }
        }
    }
    Ok(())
}

pub async fn image(api: &ApiClient, action: ImageAction, page_size: u32) -> Result<()> {
    match action {
        ImageAction::List {
            page,
            soul_id,
            image_type,
        } => {
            let fetched = api.images(page, page_size, soul_id, image_type).await?;
            println!(
                "이미지 {}/{} 페이지 (전체 {}건)",
                page + 1,
                fetched.total_pages.max(1),
                fetched.total_elements
            );
            for image in &fetched.items {
                render::print_image_row(image);
            }
        }

        ImageAction::Upload {
            file,
            image_type,
            soul_id,
        } => {
            let upload = read_upload(&file)?;
            println!(
                "- {} ({}, {} bytes) 업로드 중...",
                upload.file_name,
                upload.mime_type,
                upload.bytes.len()
            );
            let uploaded = api.upload_image(upload, image_type, soul_id).await?;
            println!("✔ 이미지가 성공적으로 업로드되었습니다!");
            println!("  URL: {}", uploaded.url);
        }

        ImageAction::Delete { id, yes } => {
            if confirm("이미지를 삭제하시겠습니까?", yes)? {
                api.delete_image(id).await?;
                println!("✔ 이미지가 삭제되었습니다");
            }
        }

        ImageAction::DeleteUrl { url, yes } => {
            if confirm("이미지를 삭제하시겠습니까?", yes)? {
                api.delete_image_by_url(&url).await?;
                println!("✔ 이미지가 삭제되었습니다");
            }
        }
    }
    Ok(())
}

/// スナップショット置き場の表示・削除
pub fn session(mut store: FileStore, info: bool, clear: bool) -> Result<()> {
    if info || !clear {
        println!("세션 저장소: {}", store.dir().display());
        for page in [
            ListPage::SeasonDictionary,
            ListPage::TravelingEncyclopedia,
            ListPage::GeneralVisits,
        ] {
            let cache = PageCache::for_page(store.clone(), page);
            println!(
                "  {}: {}",
                page.title(),
                if cache.has_snapshot() { "복원 대기" } else { "-" }
            );
        }
        for entry in store.entries() {
            println!("    {} ({} bytes)", entry.key, entry.size);
        }
    }

    if clear {
        let removed = store.clear_all()?;
        println!("✔ {}개 항목을 삭제했습니다", removed);
    }
    Ok(())
}
