use codeconvert::config::AppConfig;
use codeconvert::llm::gemini::GeminiBuilder;
use codeconvert::upload::SUPPORTED_EXTENSIONS;
use codeconvert::*;
use eframe::egui::{Button, Color32, RichText, TextEdit};
use eframe::{Frame, egui};
use egui_commonmark::{CommonMarkCache, CommonMarkViewer};
use std::future::Future;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::{panic, thread};

fn main() {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Ignoring invalid CODECONVERT_* settings: {}", e);
        AppConfig::default()
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("CodeConvert")
            .with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };

    eframe::run_native(
        "CodeConvert",
        options,
        Box::new(|_cc| {
            Ok(Box::new(CodeConvertGui {
                llm_builder: GeminiBuilder::new(config),
                session: SessionState::default(),
                tab: Tab::Converter,
                convert: Request::default(),
                debug: Request::default(),
                upload_error: None,
                preview: None,
                commonmark_cache: CommonMarkCache::default(),
            }))
        }),
    )
    .expect("eframe/egui run failed");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Converter,
    Debugger,
}

/// At most one call in flight per feature; the last outcome stays on screen until the next one.
struct Request<T> {
    rx: Option<Receiver<Result<T, Alert>>>,
    outcome: Option<Result<T, Alert>>,
}

impl<T> Default for Request<T> {
    fn default() -> Self {
        Request {
            rx: None,
            outcome: None,
        }
    }
}

impl<T: Send + 'static> Request<T> {
    fn in_flight(&self) -> bool {
        self.rx.is_some()
    }

    fn poll(&mut self) {
        let Some(rx) = self.rx.as_ref() else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.outcome = Some(outcome);
                self.rx = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.outcome = Some(Err(Alert {
                    message: "Crash!".to_owned(),
                    link: None,
                }));
                self.rx = None;
            }
        }
    }

    /// Runs `job` to completion on a worker thread with its own single-threaded runtime.
    fn start<F>(&mut self, ctx: &egui::Context, job: impl FnOnce() -> F + Send + 'static)
    where
        F: Future<Output = Result<T, Alert>>,
    {
        let (tx, rx) = std::sync::mpsc::channel();
        let ctx = ctx.clone();
        self.outcome = None;
        self.rx = Some(rx);

        thread::spawn(move || {
            let outcome = panic::catch_unwind(panic::AssertUnwindSafe(|| {
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| Alert {
                        message: format!("Could not start request: {}", e),
                        link: None,
                    })
                    .and_then(|rt| rt.block_on(job()))
            }));
            // A panic drops `tx` unsent, which `poll` reports
            if let Ok(outcome) = outcome {
                let _ = tx.send(outcome);
            }
            ctx.request_repaint();
        });
    }
}

struct CodeConvertGui {
    llm_builder: GeminiBuilder,
    session: SessionState,
    tab: Tab,
    convert: Request<ConvertOutput>,
    debug: Request<String>,
    upload_error: Option<String>,
    preview: Option<egui::TextureHandle>,
    commonmark_cache: CommonMarkCache,
}

impl eframe::App for CodeConvertGui {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.convert.poll();
        self.debug.poll();

        egui::SidePanel::left("sidebar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.heading("Settings");
                ui.add_space(8.0);

                let label = ui.label("Enter Google API Key");
                ui.add(TextEdit::singleline(&mut self.session.api_key).password(true))
                    .labelled_by(label.id);

                ui.add_space(8.0);
                ui.label("Select Model");
                egui::ComboBox::from_id_salt("model")
                    .selected_text(self.session.selected_model.id())
                    .show_ui(ui, |ui| {
                        for model in Model::ALL {
                            ui.selectable_value(&mut self.session.selected_model, model, model.id());
                        }
                    });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("CodeConvert");
            ui.label("Modernize Legacy Code & Debug Screenshots Instantly");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.tab, Tab::Converter, "Language Converter");
                ui.selectable_value(&mut self.tab, Tab::Debugger, "Debug from Screenshot");
            });
            ui.separator();

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| match self.tab {
                    Tab::Converter => self.converter_tab(ui),
                    Tab::Debugger => self.debugger_tab(ui),
                });
        });
    }
}

impl CodeConvertGui {
    fn converter_tab(&mut self, ui: &mut egui::Ui) {
        ui.columns(2, |cols| {
            let input = &mut self.session.convert;

            egui::ComboBox::from_label("From")
                .selected_text(input.source_language.name())
                .show_ui(&mut cols[0], |ui| {
                    for lang in SourceLanguage::ALL {
                        ui.selectable_value(&mut input.source_language, lang, lang.name());
                    }
                });
            cols[0].add(
                TextEdit::multiline(&mut input.source_code)
                    .hint_text("Paste Legacy Code Here")
                    .code_editor()
                    .desired_rows(18)
                    .desired_width(f32::INFINITY),
            );

            let ui = &mut cols[1];
            egui::ComboBox::from_label("To")
                .selected_text(input.target_language.name())
                .show_ui(ui, |ui| {
                    for lang in TargetLanguage::ALL {
                        ui.selectable_value(&mut input.target_language, lang, lang.name());
                    }
                });

            let btn = ui.add_enabled(!self.convert.in_flight(), Button::new("Convert Code"));
            if btn.clicked() {
                let llm_builder = self.llm_builder.clone();
                let session = self.session.clone();
                self.convert.start(ui.ctx(), move || async move {
                    convert_code(&llm_builder, &session).await
                });
            }

            if self.convert.in_flight() {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Converting logic...");
                });
            }

            match &self.convert.outcome {
                Some(Ok(output)) => {
                    ui.label(RichText::new(&output.language_tag).monospace().weak());
                    let mut code = output.code.as_str();
                    ui.add(
                        TextEdit::multiline(&mut code)
                            .code_editor()
                            .desired_rows(18)
                            .desired_width(f32::INFINITY),
                    );
                    ui.colored_label(Color32::DARK_GREEN, "Conversion Complete!");
                }
                Some(Err(alert)) => show_alert(ui, alert),
                None => {}
            }
        });
    }

    fn debugger_tab(&mut self, ui: &mut egui::Ui) {
        ui.label("Upload a screenshot of a terminal error or a code snippet from a YouTube tutorial.");

        let btn = ui
            .add_enabled(!self.debug.in_flight(), Button::new("Upload Image"))
            .on_hover_text("Browse for a jpg, png or jpeg file");
        if btn.clicked() {
            if let Some(path) = rfd::FileDialog::new()
                .add_filter("Image", &SUPPORTED_EXTENSIONS)
                .pick_file()
            {
                match UploadedImage::from_path(&path) {
                    Ok(image) => {
                        self.preview = Some(load_preview(ui.ctx(), &image));
                        self.session.debug.image = Some(Arc::new(image));
                        self.debug.outcome = None;
                        self.upload_error = None;
                    }
                    Err(e) => {
                        log::warn!("Rejected upload {}: {}", path.display(), e);
                        self.upload_error = Some(e.to_string());
                    }
                }
            }
        }

        if let Some(err) = self.upload_error.as_ref() {
            ui.colored_label(Color32::RED, err);
        }

        let Some(preview) = self.preview.as_ref() else {
            return;
        };
        ui.add(egui::Image::from_texture(preview).max_width(ui.available_width()));
        ui.label(RichText::new("Uploaded Snippet").small().weak());

        let btn = ui.add_enabled(!self.debug.in_flight(), Button::new("Analyze & Fix"));
        if btn.clicked() {
            let llm_builder = self.llm_builder.clone();
            let session = self.session.clone();
            self.debug.start(ui.ctx(), move || async move {
                debug_screenshot(&llm_builder, &session).await
            });
        }

        if self.debug.in_flight() {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Scanning pixels...");
            });
        }

        match &self.debug.outcome {
            Some(Ok(text)) => {
                CommonMarkViewer::new().show(ui, &mut self.commonmark_cache, text);
            }
            Some(Err(alert)) => show_alert(ui, alert),
            None => {}
        }
    }
}

fn show_alert(ui: &mut egui::Ui, alert: &Alert) {
    ui.colored_label(Color32::RED, &alert.message);
    if let Some(link) = alert.link.as_ref() {
        ui.hyperlink_to(&link.label, &link.url);
    }
}

fn load_preview(ctx: &egui::Context, image: &UploadedImage) -> egui::TextureHandle {
    let pixels = image.pixels();
    let size = [pixels.width() as usize, pixels.height() as usize];
    ctx.load_texture(
        "uploaded-snippet",
        egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_raw()),
        egui::TextureOptions::default(),
    )
}
