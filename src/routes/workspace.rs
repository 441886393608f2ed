use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::Redirect;
use rocket::tokio::io::AsyncReadExt;
use rocket::tokio::task;
use rocket::{Route, State};
use rocket_dyn_templates::Template;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::ai::{strategist, Generator};
use crate::color::{Channel, ColorHistory, ColorPicker, Rgb, Surface};
use crate::db::DbPool;
use crate::ingest::{IngestError, ACCEPTED_EXTENSIONS, MAX_UPLOAD_BYTES};
use crate::models::local_store::{LocalStore, GUIDE_SHOWN_KEY};
use crate::models::profile::{self, BrandSettings, ProfileBook, SaveOutcome};
use crate::models::settings::{LinkSlot, SettingsUpdate, Tone};
use crate::models::strategy::{AiFullStrategyResponse, VariantName};
use crate::render::{self, PreviewTheme, SandboxedPreview, Viewport};
use crate::session::{Notice, Pending, SessionId, SessionState, SessionStore};

pub const EMPTY_CONTENT_ERROR: &str = "Nội dung bài viết blog không được để trống.";
pub const BUSY_ERROR: &str = "Đang phân tích, vui lòng chờ.";
const SAVE_PROFILE_ERROR: &str = "Lỗi: Không thể lưu profile.";
const DELETE_PROFILE_ERROR: &str = "Lỗi: Không thể xóa profile.";

type Sessions = State<Arc<SessionStore>>;

fn home() -> Redirect {
    Redirect::to("/")
}

// ── Page ──────────────────────────────────────────────

#[get("/")]
pub fn index(pool: &State<DbPool>, sessions: &Sessions, sid: SessionId) -> Template {
    let first_visit = !LocalStore::get_flag(pool, GUIDE_SHOWN_KEY);
    if first_visit {
        if let Err(e) = LocalStore::set_flag(pool, GUIDE_SHOWN_KEY) {
            log::error!("Failed to record guide flag: {}", e);
        }
    }
    render_workspace(pool, sessions, &sid, first_visit)
}

#[get("/guide")]
pub fn guide(pool: &State<DbPool>, sessions: &Sessions, sid: SessionId) -> Template {
    render_workspace(pool, sessions, &sid, true)
}

fn render_workspace(pool: &DbPool, sessions: &SessionStore, sid: &SessionId, show_guide: bool) -> Template {
    let profiles = ProfileBook::load(pool);
    let history = ColorHistory::load(pool);
    let context = sessions.view(&sid.0, |s| {
        workspace_context(s, &profiles, &history, show_guide)
    });
    Template::render("workspace", &context)
}

fn workspace_context(
    s: &mut SessionState,
    profiles: &ProfileBook,
    history: &ColorHistory,
    show_guide: bool,
) -> Value {
    let notice = s.notice.take();
    let input_error = s.input_error.take();
    let settings = &s.settings;

    let tones: Vec<Value> = Tone::ALL
        .iter()
        .map(|t| json!({ "label": t.label(), "selected": *t == settings.tone }))
        .collect();

    let links: Vec<Value> = LinkSlot::ALL
        .iter()
        .map(|slot| {
            json!({
                "key": slot.key(),
                "label": slot.form_label(),
                "value": settings.cta_links.get(*slot),
            })
        })
        .collect();

    let tracking = &settings.tracking;
    let tracking_fields = json!([
        { "key": "page_slug", "label": "Page Slug", "value": tracking.page_slug },
        { "key": "utm_source", "label": "UTM Source", "value": tracking.utm_source },
        { "key": "utm_medium", "label": "UTM Medium", "value": tracking.utm_medium },
        { "key": "utm_campaign", "label": "UTM Campaign", "value": tracking.utm_campaign },
    ]);

    let pending = s.pending.as_ref().map(|p| match p {
        Pending::OverwriteProfile { name, existing } => json!({
            "kind": "overwrite",
            "name": name,
            "prompt": profile::overwrite_prompt(existing),
        }),
        Pending::DeleteProfile { name } => json!({
            "kind": "delete",
            "name": name,
            "prompt": profile::delete_prompt(name),
        }),
    });

    let picker = s.picker.as_ref().map(|p| {
        let rgb = p.rgb();
        let hsv = p.hsv();
        json!({
            "hex": p.hex(),
            "initial": p.initial(),
            "channels": [
                { "key": "h", "label": "H", "value": hsv.h.round() as i64, "max": 360 },
                { "key": "s", "label": "S", "value": hsv.s.round() as i64, "max": 100 },
                { "key": "v", "label": "V", "value": hsv.v.round() as i64, "max": 100 },
                { "key": "r", "label": "R", "value": rgb.r, "max": 255 },
                { "key": "g", "label": "G", "value": rgb.g, "max": 255 },
                { "key": "b", "label": "B", "value": rgb.b, "max": 255 },
            ],
            "stamp": p.hex().trim_start_matches('#').to_string()
                + &format!("{:.0}{:.0}{:.0}", hsv.h, hsv.s, hsv.v),
            "plane_width": render::PLANE_WIDTH,
            "plane_height": render::PLANE_HEIGHT,
            "hue_width": render::HUE_WIDTH,
            "hue_height": render::HUE_HEIGHT,
        })
    });

    json!({
        "settings": {
            "primary_color": settings.primary_color,
            "tones": tones,
            "links": links,
            "tracking": tracking_fields,
            "tracking_preview": settings.tracking_preview(),
        },
        "profiles": profiles.profiles().iter().map(|p| &p.name).collect::<Vec<_>>(),
        "selected_profile": s.selected_profile,
        "pending": pending,
        "notice": notice.map(|n| json!({ "kind": n.kind.as_str(), "message": n.message })),
        "picker": picker,
        "history": history.colors(),
        "draft": {
            "content": s.draft.content,
            "file_name": s.draft.file_name,
            "char_count": s.draft.char_count(),
        },
        "input_error": input_error,
        "accept": ACCEPTED_EXTENSIONS,
        "generating": s.is_generating(),
        "result": s.result.as_ref().map(result_context),
        "generation_error": s.generation_error,
        "themes": PreviewTheme::ALL.iter().map(|t| t.key()).collect::<Vec<_>>(),
        "viewports": Viewport::ALL
            .iter()
            .map(|v| json!({ "key": v.key(), "label": v.label() }))
            .collect::<Vec<_>>(),
        "show_guide": show_guide,
    })
}

fn result_context(result: &AiFullStrategyResponse) -> Value {
    let analysis: Vec<Value> = result
        .analysis
        .iter()
        .enumerate()
        .map(|(i, item)| json!({ "title": item.title, "content": item.content, "open": i < 2 }))
        .collect();

    let pairs: Vec<Value> = result
        .ab_test_pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| {
            let variants: Vec<Value> = pair
                .variants
                .iter()
                .map(|v| {
                    json!({
                        "name": v.variant_name.as_str(),
                        "role": v.variant_name.role(),
                        "explanation": v.preview_explanation,
                        "code_display": render::code_for_display(&result.shared_css, &v.html_block),
                        "code_clipboard": render::code_for_clipboard(&result.shared_css, &v.html_block),
                    })
                })
                .collect();
            json!({
                "index": i,
                "position": pair.position,
                "reasoning": pair.reasoning,
                "variants": variants,
            })
        })
        .collect();

    json!({
        "overall_strategy": result.overall_strategy,
        "analysis": analysis,
        "risks": result.risks_and_recommendations,
        "shared_css_plain": render::strip_style_tags(&result.shared_css),
        "pairs": pairs,
    })
}

// ── Settings ──────────────────────────────────────────

#[derive(FromForm)]
pub struct SettingsForm {
    #[field(name = "primaryColor")]
    pub primary_color: String,
    pub tone: String,
    #[field(name = "ctaLinks")]
    pub cta_links: HashMap<String, String>,
    pub tracking: HashMap<String, String>,
}

impl SettingsForm {
    fn updates(&self) -> Result<Vec<SettingsUpdate>, String> {
        let mut updates = vec![
            SettingsUpdate::from_field("primaryColor", &self.primary_color)?,
            SettingsUpdate::from_field("tone", &self.tone)?,
        ];
        for (key, value) in &self.cta_links {
            updates.push(SettingsUpdate::from_field(&format!("ctaLinks.{}", key), value)?);
        }
        for (key, value) in &self.tracking {
            updates.push(SettingsUpdate::from_field(&format!("tracking.{}", key), value)?);
        }
        Ok(updates)
    }
}

#[post("/settings", data = "<form>")]
pub fn settings_save(sessions: &Sessions, sid: SessionId, form: Form<SettingsForm>) -> Redirect {
    let updates = form.updates();
    sessions.with(&sid.0, |s| match updates {
        Ok(updates) => {
            for update in updates {
                s.settings.apply(update);
            }
        }
        Err(e) => {
            log::warn!("Rejected settings form: {}", e);
            s.notice = Some(Notice::error(e));
        }
    });
    home()
}

// ── Profiles ──────────────────────────────────────────

#[derive(FromForm)]
pub struct ProfileForm {
    pub name: String,
    pub confirmed: bool,
}

#[post("/profiles/save", data = "<form>")]
pub fn profile_save(
    pool: &State<DbPool>,
    sessions: &Sessions,
    sid: SessionId,
    form: Form<ProfileForm>,
) -> Redirect {
    let brand = sessions.with(&sid.0, |s| {
        s.pending = None;
        BrandSettings::from_settings(&s.settings)
    });
    let outcome = ProfileBook::update(pool, |book| book.save(&form.name, brand, form.confirmed));
    sessions.with(&sid.0, |s| match outcome {
        Ok(Ok(SaveOutcome::Saved)) => {
            s.selected_profile = Some(form.name.trim().to_string());
            s.notice = Some(Notice::success("Đã lưu!"));
        }
        Ok(Ok(SaveOutcome::NeedsConfirmation { existing })) => {
            s.pending = Some(Pending::OverwriteProfile {
                name: form.name.trim().to_string(),
                existing,
            });
        }
        Ok(Err(e)) => s.notice = Some(Notice::error(e)),
        Err(e) => {
            log::error!("Failed to save profiles: {}", e);
            s.notice = Some(Notice::error(SAVE_PROFILE_ERROR));
        }
    });
    home()
}

#[derive(FromForm)]
pub struct ProfileSelectForm {
    pub name: String,
}

#[post("/profiles/load", data = "<form>")]
pub fn profile_load(
    pool: &State<DbPool>,
    sessions: &Sessions,
    sid: SessionId,
    form: Form<ProfileSelectForm>,
) -> Redirect {
    let book = ProfileBook::load(pool);
    sessions.with(&sid.0, |s| match book.find(&form.name) {
        Some(p) => {
            p.settings.apply_to(&mut s.settings);
            s.selected_profile = Some(p.name.clone());
        }
        None => s.selected_profile = None,
    });
    home()
}

#[post("/profiles/delete", data = "<form>")]
pub fn profile_delete(
    pool: &State<DbPool>,
    sessions: &Sessions,
    sid: SessionId,
    form: Form<ProfileForm>,
) -> Redirect {
    let name = form.name.clone();
    if name.is_empty() {
        return home();
    }
    if !form.confirmed {
        sessions.with(&sid.0, |s| s.pending = Some(Pending::DeleteProfile { name }));
        return home();
    }

    let outcome = ProfileBook::update(pool, |book| book.delete(&name));
    sessions.with(&sid.0, |s| {
        s.pending = None;
        match outcome {
            Ok(true) => {
                s.selected_profile = None;
                s.notice = Some(Notice::success(format!("Đã xóa profile \"{}\".", name)));
            }
            Ok(false) => s.selected_profile = None,
            Err(e) => {
                log::error!("Failed to delete profile: {}", e);
                s.notice = Some(Notice::error(DELETE_PROFILE_ERROR));
            }
        }
    });
    home()
}

#[post("/profiles/cancel")]
pub fn profile_cancel(sessions: &Sessions, sid: SessionId) -> Redirect {
    sessions.with(&sid.0, |s| s.pending = None);
    home()
}

// ── Color picker ──────────────────────────────────────

#[derive(FromForm)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Click position from an `<input type="image" name="at">`.
#[derive(FromForm)]
pub struct ClickForm {
    pub at: Point,
}

#[derive(FromForm)]
pub struct ChannelForm {
    pub channel: String,
    pub value: String,
}

#[derive(FromForm)]
pub struct HexForm {
    pub hex: String,
}

#[derive(FromForm)]
pub struct SwatchForm {
    pub color: String,
}

#[post("/picker/open")]
pub fn picker_open(sessions: &Sessions, sid: SessionId) -> Redirect {
    sessions.with(&sid.0, |s| {
        s.picker = match s.picker {
            Some(_) => None,
            None => Some(ColorPicker::open(&s.settings.primary_color)),
        };
    });
    home()
}

fn drag_to(sessions: &SessionStore, sid: &SessionId, surface: Surface, at: &Point) {
    let rect = match surface {
        Surface::Plane => render::plane_rect(),
        Surface::HueBar => render::hue_rect(),
    };
    sessions.with(&sid.0, |s| {
        if let Some(picker) = s.picker.as_mut() {
            // A click is a drag that starts and ends on the same point.
            let _drag = picker.begin_drag(surface, rect, at.x, at.y);
        }
    });
}

#[post("/picker/plane", data = "<form>")]
pub fn picker_plane(sessions: &Sessions, sid: SessionId, form: Form<ClickForm>) -> Redirect {
    drag_to(sessions, &sid, Surface::Plane, &form.at);
    home()
}

#[post("/picker/hue", data = "<form>")]
pub fn picker_hue(sessions: &Sessions, sid: SessionId, form: Form<ClickForm>) -> Redirect {
    drag_to(sessions, &sid, Surface::HueBar, &form.at);
    home()
}

#[post("/picker/channel", data = "<form>")]
pub fn picker_channel(sessions: &Sessions, sid: SessionId, form: Form<ChannelForm>) -> Redirect {
    if let Some(channel) = Channel::from_key(&form.channel) {
        sessions.with(&sid.0, |s| {
            if let Some(picker) = s.picker.as_mut() {
                picker.set_channel(channel, &form.value);
            }
        });
    }
    home()
}

#[post("/picker/hex", data = "<form>")]
pub fn picker_hex(sessions: &Sessions, sid: SessionId, form: Form<HexForm>) -> Redirect {
    sessions.with(&sid.0, |s| {
        if let Some(picker) = s.picker.as_mut() {
            picker.set_hex(&form.hex);
        }
    });
    home()
}

#[post("/picker/ok")]
pub fn picker_ok(pool: &State<DbPool>, sessions: &Sessions, sid: SessionId) -> Redirect {
    let committed = sessions.with(&sid.0, |s| {
        let color = s.picker.take()?.commit();
        s.settings.primary_color = color.clone();
        Some(color)
    });
    if let Some(color) = committed {
        if let Err(e) = ColorHistory::record(pool, &color) {
            log::error!("Failed to save color history: {}", e);
        }
    }
    home()
}

#[post("/picker/cancel")]
pub fn picker_cancel(sessions: &Sessions, sid: SessionId) -> Redirect {
    sessions.with(&sid.0, |s| s.picker = None);
    home()
}

/// Swatch click: set the color, leave the history order alone. Anything
/// but a hex color is ignored.
#[post("/picker/history", data = "<form>")]
pub fn picker_history(sessions: &Sessions, sid: SessionId, form: Form<SwatchForm>) -> Redirect {
    let Some(color) = Rgb::from_hex(&form.color).map(|c| c.to_hex()) else {
        log::warn!("Ignored swatch value {:?}", form.color);
        return home();
    };
    sessions.with(&sid.0, |s| {
        if s.picker.is_some() {
            s.picker = Some(ColorPicker::open(&color));
        }
        s.settings.primary_color = color;
    });
    home()
}

#[get("/picker/plane.svg")]
pub fn picker_plane_svg(sessions: &Sessions, sid: SessionId) -> Option<(ContentType, String)> {
    sessions.view(&sid.0, |s| s.picker.as_ref().map(render::plane_svg))
        .map(|svg| (ContentType::SVG, svg))
}

#[get("/picker/hue.svg")]
pub fn picker_hue_svg(sessions: &Sessions, sid: SessionId) -> Option<(ContentType, String)> {
    sessions.view(&sid.0, |s| s.picker.as_ref().map(render::hue_svg))
        .map(|svg| (ContentType::SVG, svg))
}

// ── Content ───────────────────────────────────────────

#[derive(FromForm)]
pub struct ContentForm {
    pub content: String,
}

fn apply_content(s: &mut SessionState, text: String) {
    // Textareas post CRLF line breaks.
    let text = text.replace("\r\n", "\n");
    // Re-submitting an unchanged upload keeps its filename.
    if s.draft.content != text {
        s.draft.edit(text);
    }
}

#[post("/content", data = "<form>")]
pub fn content_save(sessions: &Sessions, sid: SessionId, form: Form<ContentForm>) -> Redirect {
    let text = form.into_inner().content;
    sessions.with(&sid.0, |s| apply_content(s, text));
    home()
}

#[derive(FromForm)]
pub struct UploadForm<'f> {
    pub file: TempFile<'f>,
}

async fn read_upload(file: &TempFile<'_>) -> Result<Vec<u8>, IngestError> {
    if file.len() > MAX_UPLOAD_BYTES {
        return Err(IngestError::Unreadable(format!("{} bytes", file.len())));
    }
    let mut bytes = Vec::with_capacity(file.len() as usize);
    let mut reader = Box::pin(
        file.open()
            .await
            .map_err(|e| IngestError::Unreadable(e.to_string()))?,
    );
    reader
        .read_to_end(&mut bytes)
        .await
        .map_err(|e| IngestError::Unreadable(e.to_string()))?;
    Ok(bytes)
}

#[post("/content/upload", data = "<form>")]
pub async fn content_upload(
    sessions: &Sessions,
    sid: SessionId,
    form: Option<Form<UploadForm<'_>>>,
) -> Redirect {
    let Some(form) = form else {
        log::warn!("Upload rejected by form parser");
        sessions.with(&sid.0, |s| {
            s.input_error = Some(IngestError::Unreadable(String::new()).to_string())
        });
        return home();
    };

    let file_name = form
        .file
        .raw_name()
        .map(|n| n.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_default();

    let bytes = read_upload(&form.file).await;
    sessions.with(&sid.0, |s| {
        let outcome = bytes.and_then(|b| s.draft.load_file(&file_name, &b));
        match outcome {
            Ok(()) => {
                s.input_error = None;
                log::info!("Loaded {} ({} chars)", file_name, s.draft.char_count());
            }
            Err(e) => s.input_error = Some(e.to_string()),
        }
    });
    home()
}

// ── Generate ──────────────────────────────────────────

/// Runs one generation for the session. The content textarea can submit
/// straight here, in which case its text is saved first.
#[post("/generate", data = "<form>")]
pub async fn generate(
    sessions: &Sessions,
    generator: &State<Arc<dyn Generator>>,
    sid: SessionId,
    form: Option<Form<ContentForm>>,
) -> Redirect {
    let (settings, blog) = sessions.with(&sid.0, |s| {
        if let Some(form) = form {
            apply_content(s, form.into_inner().content);
        }
        (s.settings.clone(), s.draft.content.clone())
    });

    if blog.trim().is_empty() {
        sessions.with(&sid.0, |s| s.generation_error = Some(EMPTY_CONTENT_ERROR.to_string()));
        return home();
    }

    let Some(_ticket) = sessions.try_begin_generation(&sid.0) else {
        sessions.with(&sid.0, |s| s.notice = Some(Notice::error(BUSY_ERROR)));
        return home();
    };
    sessions.with(&sid.0, |s| {
        s.result = None;
        s.generation_error = None;
    });

    let generator = Arc::clone(generator.inner());
    let outcome = if generator.is_configured() {
        task::spawn_blocking(move || strategist::generate_strategy(&*generator, &settings, &blog))
            .await
            .map_err(|e| e.to_string())
            .and_then(|r| r.map_err(|e| e.0))
    } else {
        Err("Server configuration error".to_string())
    };

    sessions.with(&sid.0, |s| match outcome {
        Ok(strategy) => s.result = Some(strategy),
        Err(message) => {
            log::error!("Workspace generation failed: {}", message);
            s.generation_error = Some(message);
        }
    });
    home()
}

// ── Preview ───────────────────────────────────────────

#[get("/preview/<pair>/<variant>?<theme>&<viewport>")]
pub fn preview(
    sessions: &Sessions,
    sid: SessionId,
    pair: usize,
    variant: &str,
    theme: Option<&str>,
    viewport: Option<&str>,
) -> Option<SandboxedPreview> {
    let name = VariantName::from_str(variant)?;
    let theme = PreviewTheme::from_query(theme);
    let viewport = Viewport::from_query(viewport);
    sessions.view(&sid.0, |s| {
        let result = s.result.as_ref()?;
        let v = result.ab_test_pairs.get(pair)?.variant(name)?;
        Some(SandboxedPreview(render::preview_document(
            &result.shared_css,
            &v.html_block,
            theme,
            viewport,
        )))
    })
}

pub fn routes() -> Vec<Route> {
    routes![
        index,
        guide,
        settings_save,
        profile_save,
        profile_load,
        profile_delete,
        profile_cancel,
        picker_open,
        picker_plane,
        picker_hue,
        picker_channel,
        picker_hex,
        picker_ok,
        picker_cancel,
        picker_history,
        picker_plane_svg,
        picker_hue_svg,
        content_save,
        content_upload,
        generate,
        preview,
    ]
}
