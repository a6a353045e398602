#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

//! eframe/egui 기반 데스크톱 GUI 진입점.

use eframe::{egui, App, Frame};
use image::GenericImageView;
use std::{env, fs, path::Path};
use hvac_duct_calculator::{
    app::CalculationSession,
    config,
    duct::DuctRoughness,
    i18n::{self, keys},
    report::{format_pressure_loss, format_velocity},
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// 결과 칸이 비어 있을 때 표시하는 문자.
const EMPTY_RESULT: &str = "—";

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // CLI 언어 옵션 처리: --lang xx 또는 --lang=xx (xx: auto/en-us/ko)
    let mut cli_lang: Option<String> = None;
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let a = &args[i];
        if let Some(val) = a.strip_prefix("--lang=") {
            cli_lang = Some(val.to_string());
        } else if (a == "--lang" || a == "-L") && i + 1 < args.len() {
            cli_lang = Some(args[i + 1].clone());
            i += 1;
        }
        i += 1;
    }

    let app_cfg = config::load_or_default().unwrap_or_else(|e| {
        warn!("{e}; using default settings");
        config::Config::default()
    });
    let lang = i18n::resolve_language(
        cli_lang.as_deref().unwrap_or("auto"),
        Some(app_cfg.language.as_str()),
    );

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(egui::vec2(900.0, 650.0))
        .with_min_inner_size(egui::vec2(800.0, 550.0))
        .with_transparent(true);
    if let Some(icon) = load_app_icon() {
        viewport = viewport.with_icon(icon);
    }
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };
    eframe::run_native(
        "HVAC Duct Calculator v1.4",
        options,
        Box::new(move |cc| {
            if lang.starts_with("ko") {
                if let Err(e) = setup_fonts(&cc.egui_ctx) {
                    warn!("Font error: {e}");
                }
            }
            Box::new(GuiApp::new(app_cfg, &lang, &cc.egui_ctx))
        }),
    )
}

fn load_png(path: &str) -> Option<image::DynamicImage> {
    let bytes = fs::read(path).ok()?;
    image::load_from_memory(&bytes).ok()
}

fn load_app_icon() -> Option<egui::IconData> {
    let search = ["icon.png", "assets/icon.png", "flexduct.png", "assets/flexduct.png"];
    let path = search.iter().find(|p| Path::new(*p).exists())?;
    let img = load_png(path)?;
    let (w, h) = img.dimensions();
    Some(egui::IconData {
        rgba: img.to_rgba8().into_raw(),
        width: w,
        height: h,
    })
}

/// 홈 화면 카드 이미지를 텍스처로 올린다. 파일이 없으면 None.
fn load_card_texture(ctx: &egui::Context, name: &str) -> Option<egui::TextureHandle> {
    let path = [name.to_string(), format!("assets/{name}")]
        .into_iter()
        .find(|p| Path::new(p).exists())?;
    let img = match load_png(&path) {
        Some(img) => img,
        None => {
            warn!("Error loading {path}");
            return None;
        }
    };
    let size = [img.width() as usize, img.height() as usize];
    let rgba = img.to_rgba8();
    let color = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Some(ctx.load_texture(name, color, Default::default()))
}

fn apply_font_bytes(ctx: &egui::Context, bytes: Vec<u8>, name: &str) {
    let mut fonts = egui::FontDefinitions::default();
    let font_name = name.to_string();
    fonts
        .font_data
        .insert(font_name.clone(), egui::FontData::from_owned(bytes));
    for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
        fonts
            .families
            .entry(family)
            .or_default()
            .insert(0, font_name.clone());
    }
    ctx.set_fonts(fonts);
}

/// 한글 표시용 폰트를 찾는다.
/// 1) assets/fonts/malgun.ttf
/// 2) Windows 시스템 폰트(맑은 고딕/굴림)
/// 3) 리눅스 Noto CJK
fn setup_fonts(ctx: &egui::Context) -> Result<(), String> {
    let mut candidates = vec![Path::new("assets/fonts/malgun.ttf").to_path_buf()];
    if let Some(windir) = env::var_os("WINDIR") {
        let fonts = Path::new(&windir).join("Fonts");
        candidates.push(fonts.join("malgun.ttf"));
        candidates.push(fonts.join("gulim.ttc"));
    }
    candidates.push("/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc".into());
    for p in candidates {
        if p.exists() {
            let bytes = fs::read(&p)
                .map_err(|e| format!("Failed to read font ({}): {e}", p.display()))?;
            apply_font_bytes(ctx, bytes, "korean_font");
            return Ok(());
        }
    }
    Err("Korean font not found; falling back to default font.".into())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Page {
    Home,
    FlexibleDuct,
    Credits,
}

impl Page {
    fn title_key(&self) -> &'static str {
        match self {
            Page::Home => keys::HOME_TITLE,
            Page::FlexibleDuct => keys::HOME_FLEX_CARD,
            Page::Credits => keys::CREDITS_TITLE,
        }
    }
}

/// 제목 + 본문 안내창.
struct InfoPopup {
    title: String,
    body: String,
}

struct GuiApp {
    tr: i18n::Translator,
    language_pack_dir: Option<String>,
    lang_input: String,
    window_alpha: f32,
    page: Page,
    session: CalculationSession,
    status: String,
    result_velocity: String,
    result_pressure_loss: String,
    show_full_results: bool,
    show_preferences: bool,
    popup: Option<InfoPopup>,
    flex_texture: Option<egui::TextureHandle>,
    rect_texture: Option<egui::TextureHandle>,
}

impl GuiApp {
    fn new(cfg: config::Config, lang: &str, ctx: &egui::Context) -> Self {
        let tr = i18n::Translator::new_with_pack(lang, cfg.language_pack_dir.as_deref());
        let status = tr.t(keys::STATUS_READY);
        Self {
            lang_input: cfg.language.clone(),
            language_pack_dir: cfg.language_pack_dir,
            window_alpha: cfg.window_alpha,
            page: Page::Home,
            session: CalculationSession::new(cfg.defaults),
            status,
            result_velocity: EMPTY_RESULT.into(),
            result_pressure_loss: EMPTY_RESULT.into(),
            show_full_results: false,
            show_preferences: false,
            popup: None,
            flex_texture: load_card_texture(ctx, "flexduct.png"),
            rect_texture: load_card_texture(ctx, "recduct.png"),
            tr,
        }
    }

    fn show_page(&mut self, page: Page) {
        self.page = page;
        let name = self.tr.t(page.title_key());
        self.status = self.tr.t_with(keys::STATUS_VIEWING, &[("page", &name)]);
    }

    fn info(&mut self, title_key: &str, body_key: &str) {
        self.popup = Some(InfoPopup {
            title: self.tr.t(title_key),
            body: self.tr.t(body_key),
        });
    }

    fn perform_calculation(&mut self) {
        match self.session.calculate() {
            Ok(result) => {
                self.result_velocity = format_velocity(&result.velocity);
                self.result_pressure_loss = format_pressure_loss(result.total_pressure_loss);
                self.status = self.tr.t(keys::STATUS_DONE);
            }
            Err(e) => {
                // 이전 결과는 그대로 둔다.
                self.popup = Some(InfoPopup {
                    title: self.tr.t(keys::INVALID_INPUT),
                    body: e.to_string(),
                });
                self.status = self.tr.t(keys::STATUS_ERROR);
            }
        }
    }

    fn reset_inputs(&mut self) {
        self.session.reset();
        self.result_velocity = EMPTY_RESULT.into();
        self.result_pressure_loss = EMPTY_RESULT.into();
        self.status = self.tr.t(keys::STATUS_RESET);
    }

    fn ui_menu_bar(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr.t(keys::MENU_INFO), |ui| {
                if ui.button(tr.t(keys::MENU_ABOUT)).clicked() {
                    self.info(keys::MENU_ABOUT, keys::ABOUT_BODY);
                    ui.close_menu();
                }
                if ui.button(tr.t(keys::CREDITS_TITLE)).clicked() {
                    self.show_page(Page::Credits);
                    ui.close_menu();
                }
            });
            ui.menu_button(tr.t(keys::MENU_SETTINGS), |ui| {
                if ui.button(tr.t(keys::MENU_PREFERENCES)).clicked() {
                    self.show_preferences = true;
                    ui.close_menu();
                }
            });
            ui.menu_button(tr.t(keys::MENU_HELP), |ui| {
                if ui.button(tr.t(keys::MENU_USER_GUIDE)).clicked() {
                    self.info(keys::MENU_USER_GUIDE, keys::USER_GUIDE_BODY);
                    ui.close_menu();
                }
                if ui.button(tr.t(keys::MENU_FAQ)).clicked() {
                    self.info(keys::MENU_FAQ, keys::FAQ_BODY);
                    ui.close_menu();
                }
            });
        });
    }

    fn ui_home(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.heading(egui::RichText::new(tr.t(keys::HOME_TITLE)).size(24.0).strong());
            ui.add_space(10.0);
            ui.label(tr.t(keys::HOME_SUBTITLE));
            ui.add_space(20.0);
        });
        ui.columns(2, |cols| {
            egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
                ui.vertical_centered(|ui| {
                    ui.strong(tr.t(keys::HOME_FLEX_CARD));
                    card_image(ui, self.flex_texture.as_ref(), "Flexible Duct Image");
                    if ui
                        .add(egui::Button::new(tr.t(keys::HOME_OPEN_CALCULATOR)).min_size(egui::vec2(160.0, 28.0)))
                        .clicked()
                    {
                        self.show_page(Page::FlexibleDuct);
                    }
                });
            });
            egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
                ui.vertical_centered(|ui| {
                    ui.strong(tr.t(keys::HOME_RECT_CARD));
                    card_image(ui, self.rect_texture.as_ref(), "Rectangular Duct Image");
                    ui.add_enabled(
                        false,
                        egui::Button::new(tr.t(keys::HOME_COMING_SOON)).min_size(egui::vec2(160.0, 28.0)),
                    )
                    .on_disabled_hover_text(tr.t(keys::HOME_RECT_PLACEHOLDER));
                });
            });
        });
        ui.add_space(30.0);
        ui.vertical_centered(|ui| {
            if ui.button(tr.t(keys::HOME_EXIT)).clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });
    }

    fn ui_flexible_duct(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.vertical_centered(|ui| {
            ui.heading(egui::RichText::new(tr.t(keys::HOME_FLEX_CARD)).size(20.0).strong());
        });
        ui.add_space(12.0);
        let mut calculate = false;
        let mut reset = false;
        let mut back = false;
        ui.columns(2, |cols| {
            let form = &mut self.session.form;
            egui::Frame::group(cols[0].style()).show(&mut cols[0], |ui| {
                ui.strong(tr.t(keys::INPUT_PARAMETERS));
                ui.add_space(6.0);
                egui::Grid::new("flex_inputs")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        for (key, value) in [
                            (keys::DUCT_DIAMETER, &mut form.duct_diameter_in),
                            (keys::AIR_FLOW, &mut form.air_flow_cfm),
                            (keys::DUCT_LENGTH, &mut form.duct_length_ft),
                        ] {
                            ui.label(format!("{}:", tr.t(key)));
                            ui.add(egui::TextEdit::singleline(value).desired_width(120.0));
                            ui.end_row();
                        }

                        ui.label(tr.t(keys::BENDS));
                        ui.horizontal(|ui| {
                            for (label, value) in [
                                ("45°:", &mut form.bend_45),
                                ("90°:", &mut form.bend_90),
                                ("180°:", &mut form.bend_180),
                            ] {
                                ui.label(label);
                                ui.add(egui::TextEdit::singleline(value).desired_width(40.0));
                            }
                        });
                        ui.end_row();

                        ui.label(format!("{}:", tr.t(keys::ROUGHNESS)));
                        egui::ComboBox::from_id_source("roughness_choice")
                            .selected_text(form.roughness.label())
                            .show_ui(ui, |ui| {
                                for r in DuctRoughness::ALL {
                                    ui.selectable_value(&mut form.roughness, r, r.label());
                                }
                            });
                        ui.end_row();

                        ui.label(format!("{}:", tr.t(keys::COMPRESSION)));
                        ui.horizontal(|ui| {
                            ui.add(
                                egui::DragValue::new(&mut form.compression_percent)
                                    .clamp_range(0.0..=100.0)
                                    .speed(0.5),
                            );
                            ui.add(
                                egui::Slider::new(&mut form.compression_percent, 0.0..=100.0)
                                    .show_value(false),
                            );
                        });
                        ui.end_row();

                        ui.label(format!("{}:", tr.t(keys::SAFETY_FACTOR)));
                        ui.horizontal(|ui| {
                            ui.add_enabled(
                                form.safety_factor_enabled,
                                egui::TextEdit::singleline(&mut form.safety_factor_percent)
                                    .desired_width(60.0),
                            );
                            ui.checkbox(
                                &mut form.safety_factor_enabled,
                                tr.t(keys::SAFETY_FACTOR_ENABLE),
                            );
                        });
                        ui.end_row();
                    });
                ui.add_space(12.0);
                ui.horizontal(|ui| {
                    calculate = ui.button(tr.t(keys::CALCULATE)).clicked();
                    reset = ui.button(tr.t(keys::RESET_INPUTS)).clicked();
                });
                ui.add_space(8.0);
                back = ui.button(tr.t(keys::BACK_HOME)).clicked();
            });

            egui::Frame::group(cols[1].style()).show(&mut cols[1], |ui| {
                ui.strong(tr.t(keys::RESULTS));
                ui.add_space(6.0);
                egui::Grid::new("flex_results")
                    .num_columns(2)
                    .spacing([12.0, 8.0])
                    .show(ui, |ui| {
                        ui.label(tr.t(keys::RESULT_VELOCITY));
                        ui.monospace(&self.result_velocity);
                        ui.end_row();
                        ui.label(tr.t(keys::RESULT_PRESSURE_LOSS));
                        ui.monospace(&self.result_pressure_loss);
                        ui.end_row();
                    });
                ui.add_space(20.0);
                if ui.button(tr.t(keys::SEE_FULL_RESULTS)).clicked() {
                    self.show_full_results = true;
                }
            });
        });
        if calculate {
            self.perform_calculation();
        }
        if reset {
            self.reset_inputs();
        }
        if back {
            self.show_page(Page::Home);
        }
    }

    fn ui_credits(&mut self, ui: &mut egui::Ui) {
        let tr = self.tr.clone();
        ui.vertical_centered(|ui| {
            ui.add_space(10.0);
            ui.heading(egui::RichText::new(tr.t(keys::CREDITS_TITLE)).size(24.0).strong());
            ui.add_space(20.0);
            ui.label(tr.t(keys::CREDITS_BODY));
            ui.add_space(30.0);
            if ui.button(tr.t(keys::BACK_HOME)).clicked() {
                self.show_page(Page::Home);
            }
        });
    }

    fn ui_full_results(&mut self, ctx: &egui::Context) {
        if !self.show_full_results {
            return;
        }
        let Some(report) = self.session.full_report() else {
            self.show_full_results = false;
            self.info(keys::SEE_FULL_RESULTS, keys::NO_RESULTS);
            return;
        };
        let tr = self.tr.clone();
        egui::Window::new(tr.t(keys::FULL_RESULTS_TITLE))
            .collapsible(false)
            .resizable(true)
            .default_size(egui::vec2(500.0, 550.0))
            .open(&mut self.show_full_results)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (heading, rows) in [
                        (keys::SECTION_INPUTS, &report.inputs),
                        (keys::SECTION_CALCULATED, &report.calculated),
                    ] {
                        ui.strong(tr.t(heading));
                        egui::Grid::new(heading)
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                for row in rows {
                                    ui.label(format!("{}:", row.label));
                                    ui.with_layout(
                                        egui::Layout::right_to_left(egui::Align::Center),
                                        |ui| ui.monospace(&row.value),
                                    );
                                    ui.end_row();
                                }
                            });
                        ui.add_space(6.0);
                    }
                });
            });
    }

    fn ui_preferences(&mut self, ctx: &egui::Context) {
        if !self.show_preferences {
            return;
        }
        let tr = self.tr.clone();
        let mut apply_lang = false;
        egui::Window::new(tr.t(keys::MENU_PREFERENCES))
            .collapsible(false)
            .resizable(false)
            .open(&mut self.show_preferences)
            .show(ctx, |ui| {
                ui.label(tr.t(keys::PREFERENCES_LANGUAGE));
                egui::ComboBox::from_id_source("lang_choice")
                    .selected_text(&self.lang_input)
                    .show_ui(ui, |ui| {
                        for (code, label) in [("auto", "System"), ("en-us", "English (US)"), ("ko", "한국어")] {
                            if ui.selectable_value(&mut self.lang_input, code.into(), label).changed() {
                                apply_lang = true;
                            }
                        }
                    });
                ui.separator();
                ui.label(tr.t(keys::PREFERENCES_ALPHA));
                ui.add(egui::Slider::new(&mut self.window_alpha, 0.3..=1.0).text("alpha"));
            });
        if apply_lang {
            let resolved = i18n::resolve_language(&self.lang_input, None);
            if resolved.starts_with("ko") {
                if let Err(e) = setup_fonts(ctx) {
                    warn!("Font error: {e}");
                }
            }
            self.tr = i18n::Translator::new_with_pack(&resolved, self.language_pack_dir.as_deref());
            self.show_page(self.page);
        }
    }

    fn ui_popup(&mut self, ctx: &egui::Context) {
        let mut close = false;
        if let Some(popup) = &self.popup {
            egui::Window::new(&popup.title)
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
                .show(ctx, |ui| {
                    ui.label(&popup.body);
                    ui.add_space(8.0);
                    close = ui.button(self.tr.t(keys::CLOSE)).clicked();
                });
        }
        if close {
            self.popup = None;
        }
    }
}

fn card_image(ui: &mut egui::Ui, texture: Option<&egui::TextureHandle>, fallback: &str) {
    ui.add_space(6.0);
    match texture {
        Some(tex) => {
            ui.add(egui::Image::new(tex).fit_to_exact_size(egui::vec2(120.0, 120.0)));
        }
        None => {
            ui.add_sized(
                egui::vec2(120.0, 120.0),
                egui::Label::new(egui::RichText::new(fallback).color(egui::Color32::GRAY)),
            );
        }
    }
    ui.add_space(6.0);
}

impl App for GuiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let mut style = (*ctx.style()).clone();
        style.interaction.selectable_labels = false;
        style.visuals.window_fill = style.visuals.window_fill.linear_multiply(self.window_alpha);
        style.visuals.panel_fill = style.visuals.panel_fill.linear_multiply(self.window_alpha);
        ctx.set_style(style);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.ui_menu_bar(ui));

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| ui.label(&self.status));
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.page {
            Page::Home => self.ui_home(ctx, ui),
            Page::FlexibleDuct => self.ui_flexible_duct(ui),
            Page::Credits => self.ui_credits(ui),
        });

        self.ui_full_results(ctx);
        self.ui_preferences(ctx);
        self.ui_popup(ctx);
    }
}
