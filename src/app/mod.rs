use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Pos2, Vec2};
use tracing::{error, info};

use crate::art::{ArtConfig, ArtError, Bounds, InputQueue, Scene};
use crate::data::{DatasetStats, LoadOptions, LoadedDataset, load_dataset};

mod canvas;
mod render_utils;
mod screenshot;
mod ui;

#[derive(Clone, Debug)]
pub struct LaunchOptions {
    pub load: LoadOptions,
    pub art: ArtConfig,
    pub initial_size: Vec2,
    pub screenshot_dir: PathBuf,
}

pub struct GeometricArtApp {
    options: LaunchOptions,
    state: AppState,
    reload_rx: Option<Receiver<Result<LoadedDataset, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<LoadedDataset, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    scene: Scene,
    stats: DatasetStats,
    source_label: String,
    metric_label: String,
    source_rows: usize,
    entity_groups: usize,
    from_cache: bool,
    queue: InputQueue,
    last_pointer: Option<Pos2>,
    show_info_panel: bool,
    screenshot_dir: PathBuf,
    screenshot_pending: bool,
    search: String,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
}

impl GeometricArtApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, options: LaunchOptions) -> Self {
        let state = Self::start_load(options.load.clone());
        Self {
            options,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(options: LoadOptions) -> Receiver<Result<LoadedDataset, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&options).map_err(|error| format!("{error:#}"));
            if let Err(message) = &result {
                error!(%message, "dataset load failed");
            }
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(options: LoadOptions) -> AppState {
        info!(path = %options.data_path.display(), "loading dataset");
        AppState::Loading {
            rx: Self::spawn_load(options),
        }
    }
}

fn ready_state(result: Result<LoadedDataset, String>, options: &LaunchOptions) -> AppState {
    let result =
        result.and_then(|loaded| ViewModel::new(loaded, options).map_err(|error| error.to_string()));
    match result {
        Ok(model) => AppState::Ready(Box::new(model)),
        Err(error) => AppState::Error(error),
    }
}

impl eframe::App for GeometricArtApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(ready_state(result, &self.options)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading dataset...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load dataset");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.options.load.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.options.load.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(result) => transition = Some(ready_state(result, &self.options)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition = Some(AppState::Error(
                                "Background load worker disconnected".to_owned(),
                            ));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(loaded: LoadedDataset, options: &LaunchOptions) -> Result<Self, ArtError> {
        let bounds = Bounds::from_size(options.initial_size)?;
        let LoadedDataset {
            cached,
            source_rows,
            entity_groups,
        } = loaded;
        let scene = Scene::new(cached.dataset, &options.art, bounds)?;

        Ok(Self {
            scene,
            stats: cached.stats,
            source_label: options
                .load
                .data_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| options.load.data_path.display().to_string()),
            metric_label: options.load.metric_column.clone(),
            source_rows,
            entity_groups,
            from_cache: cached.from_cache,
            queue: InputQueue::new(),
            last_pointer: None,
            show_info_panel: false,
            screenshot_dir: options.screenshot_dir.clone(),
            screenshot_pending: false,
            search: String::new(),
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
        })
    }
}
