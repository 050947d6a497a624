#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use clap::Parser;
use disease_prediction_support::{
    config,
    i18n::{self, keys, Language, Translator},
    profile::{ProfileTable, SYMPTOM_SLOTS},
    session::{self, Phase, Session},
};
use eframe::{egui, App, Frame};
use image::GenericImageView;
use rfd::FileDialog;
use std::{fs, path::Path, path::PathBuf};

const TITLE_COLOR: egui::Color32 = egui::Color32::from_rgb(0x4a, 0x90, 0xe2);
const PREDICTION_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0x57, 0x22);

#[derive(Debug, Parser)]
#[command(name = "disease_prediction_support", version)]
struct GuiArgs {
    /// 언어 코드(en/vi) 또는 auto
    #[arg(short = 'L', long, default_value = "auto")]
    lang: String,
    /// 설정 파일 경로
    #[arg(long, default_value = config::CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> Result<(), eframe::Error> {
    let args = GuiArgs::parse();
    let (mut app_cfg, config_error) = match config::load_from(&args.config) {
        Ok((cfg, origin)) => {
            config::init_logging(&cfg.log_filter);
            origin.log(&args.config);
            (cfg, None)
        }
        Err(e) => {
            let cfg = config::Config::default();
            config::init_logging(&cfg.log_filter);
            tracing::warn!(path = %args.config.display(), "config error, using defaults: {e}");
            (cfg, Some(e.to_string()))
        }
    };
    if args.lang != "auto" {
        app_cfg.language = args.lang.clone();
    }

    let mut viewport = egui::ViewportBuilder::default().with_inner_size(egui::vec2(760.0, 640.0));
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    let config_path = args.config;
    eframe::run_native(
        "Disease Prediction Model",
        options,
        Box::new(move |cc| {
            let app = GuiApp::new(app_cfg, config_path, config_error);
            if let Some(path) = app.config.font_path.clone() {
                if let Err(e) = load_custom_font(&cc.egui_ctx, &path) {
                    tracing::warn!("font error: {e}");
                }
            }
            Box::new(app)
        }),
    )
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "../assets/icon.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let bytes = fs::read(path).ok()?;
    let img = image::load_from_memory(&bytes).ok()?;
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: img.to_rgba8().into_raw(),
        width: w,
        height: h,
    })
}

/// 공통: 바이너리 폰트 바이트를 egui에 등록.
fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    fonts
        .families
        .entry(egui::FontFamily::Proportional)
        .or_default()
        .insert(0, font_name.clone());
    fonts
        .families
        .entry(egui::FontFamily::Monospace)
        .or_default()
        .insert(0, font_name);
    ctx.set_fonts(fonts);
}

/// 사용자가 선택한 경로의 폰트를 egui에 등록한다.
fn load_custom_font(ctx: &egui::Context, path: &str) -> Result<(), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err(format!("Font file not found: {path}"));
    }
    let bytes = fs::read(p).map_err(|e| format!("Failed to read font file: {e}"))?;
    apply_font_bytes(ctx, bytes, "user_font");
    Ok(())
}

struct GuiApp {
    config: config::Config,
    config_path: PathBuf,
    session: Session,
    status: Option<String>,
    /// 시작할 때 설정 파일을 읽지 못했으면 그 오류. 이때는 사용자 파일을 덮어쓰지 않는다.
    config_error: Option<String>,
}

impl GuiApp {
    fn new(config: config::Config, config_path: PathBuf, config_error: Option<String>) -> Self {
        let language = i18n::resolve_language("auto", Some(config.language.as_str()));
        let profiles = match ProfileTable::from_config(&config) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!("profile table error, using built-in profiles: {e}");
                built_in_profiles(&config)
            }
        };
        Self {
            session: Session::new(profiles, language),
            config,
            config_path,
            status: config_error.as_ref().map(|e| format!("Config error: {e}")),
            config_error,
        }
    }

    fn save_config(&mut self) {
        if let Some(err) = &self.config_error {
            self.status = Some(format!("Config not saved ({}): {err}", self.config_path.display()));
            return;
        }
        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!("config save failed: {e}");
            self.status = Some(format!("Save error: {e}"));
        }
    }

    fn change_language(&mut self, language: Language) {
        self.session.select_language(language);
        self.config.language = language.as_code().to_string();
        self.status = None;
        self.save_config();
    }

    fn change_data_dir(&mut self, dir: PathBuf) {
        self.session.set_data_dir(dir.clone());
        self.config.data_dir = dir;
        self.save_config();
    }

    fn ui_top_bar(&mut self, ui: &mut egui::Ui) {
        let tr = self.session.labels().clone();
        let mut selected = self.session.language();
        ui.horizontal(|ui| {
            ui.label(tr.t(keys::APP_SELECT_LANGUAGE));
            egui::ComboBox::from_id_source("language")
                .selected_text(selected.selector())
                .show_ui(ui, |ui| {
                    for lang in self.session.languages() {
                        ui.selectable_value(&mut selected, lang, lang.selector());
                    }
                });
            ui.separator();
            if ui
                .button(tr.t(keys::GUI_OPEN_DATA_DIR))
                .on_hover_text(tr.t(keys::GUI_OPEN_DATA_DIR_TIP))
                .clicked()
            {
                if let Some(dir) = FileDialog::new()
                    .set_directory(self.session.data_dir())
                    .pick_folder()
                {
                    self.change_data_dir(dir);
                }
            }
            if ui.button(tr.t(keys::GUI_RELOAD)).clicked() {
                self.session.reload();
            }
            if ui.button(tr.t(keys::GUI_FONT)).clicked() {
                if let Some(path) = FileDialog::new()
                    .add_filter("font", &["ttf", "ttc", "otf"])
                    .pick_file()
                {
                    let path = path.display().to_string();
                    match load_custom_font(ui.ctx(), &path) {
                        Ok(()) => {
                            self.config.font_path = Some(path);
                            self.save_config();
                        }
                        Err(e) => self.status = Some(e),
                    }
                }
            }
        });
        ui.small(format!(
            "{}: {}",
            tr.t(keys::GUI_DATA_DIR),
            self.session.data_dir().display()
        ));
        if selected != self.session.language() {
            self.change_language(selected);
        }
    }

    fn ui_form(&mut self, ui: &mut egui::Ui, tr: &Translator) {
        ui.heading(tr.t(keys::FORM_SELECT_SYMPTOMS));
        ui.add_space(6.0);
        let mut submit = false;
        ui.group(|ui| {
            ui.columns(2, |cols| {
                for slot in 0..SYMPTOM_SLOTS {
                    let ui = &mut cols[slot / 2];
                    symptom_combo(ui, &mut self.session, slot, &tr.t(keys::SYMPTOM_LABELS[slot]));
                    ui.add_space(6.0);
                }
            });
            submit = ui
                .button(tr.t(keys::FORM_PREDICT_BUTTON))
                .on_hover_text(tr.t(keys::FORM_PREDICT_TIP))
                .clicked();
        });
        if submit {
            if let Err(e) = self.session.submit() {
                self.status = Some(e.to_string());
            }
        }
    }

    fn ui_result(&self, ui: &mut egui::Ui, tr: &Translator) {
        let Some(result) = self.session.last_prediction() else {
            return;
        };
        ui.add_space(12.0);
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new(format!("{}: {}", tr.t(keys::RESULT_PREDICTION), result.label))
                        .color(PREDICTION_COLOR)
                        .size(18.0),
                );
            });
            if let Some(info) = &result.info {
                ui.add_space(8.0);
                ui.label(format!("{}: {}", tr.t(keys::RESULT_PREDICTED_DISEASE), result.normalized));
                ui.label(format!("{}: {}", tr.t(keys::RESULT_DESCRIPTION_LABEL), info.description));
                ui.add_space(4.0);
                ui.strong(format!("{}:", tr.t(keys::RESULT_RECOMMENDATIONS)));
                for line in result.precaution_lines(tr) {
                    ui.label(line);
                }
            }
        });
    }
}

fn built_in_profiles(cfg: &config::Config) -> ProfileTable {
    ProfileTable::built_in(cfg.data_dir.clone())
        .unwrap_or_else(|_| ProfileTable::empty(cfg.data_dir.clone()))
        .with_pack_dir(cfg.language_pack_dir.clone())
}

fn symptom_combo(ui: &mut egui::Ui, session: &mut Session, slot: usize, label: &str) {
    let options = session.symptom_options(slot).to_vec();
    let mut current = session.selection(slot).unwrap_or_default().to_string();
    ui.small(label);
    egui::ComboBox::from_id_source(("symptom", slot))
        .selected_text(current.clone())
        .width(ui.available_width())
        .show_ui(ui, |ui| {
            for opt in &options {
                ui.selectable_value(&mut current, opt.clone(), opt.as_str());
            }
        })
        .response
        .on_hover_text(label);
    if session.selection(slot) != Some(current.as_str()) {
        // slot은 항상 0..SYMPTOM_SLOTS 범위
        let _ = session.set_selection(slot, current);
    }
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.visuals.panel_fill = style
            .visuals
            .panel_fill
            .linear_multiply(self.config.window_alpha.clamp(0.3, 1.0));
        ctx.set_style(style);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            self.ui_top_bar(ui);
        });

        let tr = self.session.labels().clone();
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.label(
                            egui::RichText::new(tr.t(keys::APP_TITLE))
                                .color(TITLE_COLOR)
                                .size(28.0)
                                .strong(),
                        );
                        ui.add_space(8.0);
                        ui.label(tr.t(keys::APP_DESCRIPTION));
                    });
                    ui.add_space(16.0);

                    match self.session.phase() {
                        Phase::ResourcesLoading => {
                            ui.spinner();
                        }
                        Phase::ResourcesUnavailable => {
                            if let Some(err) = self.session.load_error() {
                                ui.colored_label(
                                    ui.visuals().error_fg_color,
                                    session::describe_load_error(err, &tr),
                                );
                            }
                            ui.label(tr.t(keys::ERROR_RESOURCES_UNAVAILABLE));
                        }
                        Phase::FormReady | Phase::ResultDisplayed => {
                            self.ui_form(ui, &tr);
                            self.ui_result(ui, &tr);
                        }
                    }

                    if let Some(msg) = &self.status {
                        ui.add_space(8.0);
                        ui.small(msg);
                    }
                });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_language(lang: &str) -> (GuiApp, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tmpdir");
        let cfg = config::Config {
            language: lang.into(),
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
            ..config::Config::default()
        };
        let app = GuiApp::new(cfg, dir.path().join("config.toml"), None);
        (app, dir)
    }

    #[test]
    fn sample_data_opens_form() {
        let (app, _dir) = app_with_language("en");
        assert_eq!(app.session.phase(), Phase::FormReady);
        assert_eq!(app.session.symptom_options(0).first().map(String::as_str), Some("itching"));
    }

    #[test]
    fn language_change_is_saved_and_resets_prediction() {
        let (mut app, dir) = app_with_language("en");
        app.session.submit().expect("submit");
        assert_eq!(app.session.phase(), Phase::ResultDisplayed);

        app.change_language(Language::Vietnamese);
        assert_eq!(app.session.phase(), Phase::FormReady);
        assert!(app.session.last_prediction().is_none());
        let (saved, _) = config::load_from(&dir.path().join("config.toml")).expect("load");
        assert_eq!(saved.language, "vi");
    }

    #[test]
    fn unreadable_config_is_never_overwritten() {
        let dir = tempfile::tempdir().expect("tmpdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "language = [").expect("write");
        let err = config::load_from(&path).expect_err("malformed config");
        let cfg = config::Config {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
            ..config::Config::default()
        };
        let mut app = GuiApp::new(cfg, path.clone(), Some(err.to_string()));
        assert!(app.status.is_some());

        app.change_language(Language::Vietnamese);
        assert_eq!(app.session.language(), Language::Vietnamese);
        assert_eq!(fs::read_to_string(&path).expect("read"), "language = [");
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with("Config not saved")));
    }

    #[test]
    fn missing_data_dir_disables_form() {
        let (mut app, dir) = app_with_language("en");
        app.change_data_dir(dir.path().join("nowhere"));
        assert_eq!(app.session.phase(), Phase::ResourcesUnavailable);
        assert!(app.session.symptom_options(0).is_empty());
    }
}
