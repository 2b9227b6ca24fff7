// Submodules
mod message;

// Re-exports
pub use message::Message;

use std::path::PathBuf;

#[allow(unused_imports)]
use log::{debug, info, warn, error};

use glam::Vec3;
use iced::{Element, Task, Theme};

use crate::dataset::DatasetIndex;
use crate::file_io;
use crate::loading::{LoadingPhase, SpriteLoadPlan};
use crate::panel::HoverPanel;
use crate::scene::camera::OrbitCamera;
use crate::scene::picking::{self, HoverDispatcher};
use crate::scene::widget::SceneCanvas;
use crate::scene::Scene;
use crate::settings::UserSettings;
use crate::sprite_cache::{self, SpriteCache};
use crate::ui;

const BACKGROUND: [f32; 4] = [0.10, 0.11, 0.13, 1.0];

/// Everything main() resolves before the event loop starts.
pub struct Flags {
    pub data_dir: PathBuf,
    pub scene: Scene,
    pub settings: UserSettings,
}

pub struct HoverLens {
    pub data_dir: PathBuf,
    pub image_dir: PathBuf,
    pub scene: Scene,
    pub canvas: SceneCanvas,
    pub index: DatasetIndex,
    pub sprites: SpriteCache,
    pub panels: Vec<HoverPanel>,
    pub dispatcher: HoverDispatcher,
    pub phase: LoadingPhase,
    plan: Option<SpriteLoadPlan>,
    pub viewport: (f32, f32),
    pointer: Option<(f32, f32)>,
    pub panel_offset: f32,
    pub panel_max_width: f32,
    pub max_ray_distance: f32,
    sprite_batch_size: usize,
    pub show_footer: bool,
}

impl HoverLens {
    pub fn new(flags: Flags) -> (Self, Task<Message>) {
        let Flags {
            data_dir,
            scene,
            settings,
        } = flags;

        info!("Initializing HoverLens with settings:");
        info!("  data_file: {}", settings.data_file);
        info!("  image_subfolder: {}", settings.image_subfolder);
        info!("  sprite_batch_size: {}", settings.sprite_batch_size);
        info!("  max_ray_distance: {}", settings.max_ray_distance);
        info!("  show_footer: {}", settings.show_footer);

        let camera = OrbitCamera::new(
            Vec3::from_array(scene.camera.target),
            scene.camera.radius,
            scene.camera.yaw_deg,
            scene.camera.pitch_deg,
        );
        let mut canvas = SceneCanvas::new(camera, BACKGROUND);
        canvas.instances = scene.instances(None);

        let csv_path = data_dir.join(&settings.data_file);
        let image_dir = sprite_cache::image_dir(&data_dir, &settings.image_subfolder);

        let app = Self {
            data_dir,
            image_dir,
            scene,
            canvas,
            index: DatasetIndex::default(),
            sprites: SpriteCache::new(),
            panels: Vec::new(),
            dispatcher: HoverDispatcher::new(),
            phase: LoadingPhase::LoadingDataset,
            plan: None,
            viewport: (1.0, 1.0),
            pointer: None,
            panel_offset: settings.panel_offset,
            panel_max_width: settings.panel_max_width,
            max_ray_distance: settings.max_ray_distance,
            sprite_batch_size: settings.sprite_batch_size,
            show_footer: settings.show_footer,
        };

        let task = Task::perform(
            async move { DatasetIndex::from_file(&csv_path) },
            Message::DatasetLoaded,
        );

        (app, task)
    }

    pub fn title(&self) -> String {
        String::from("HoverLens")
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::DatasetLoaded(Ok(index)) => self.on_dataset_loaded(index),
            Message::DatasetLoaded(Err(reason)) => {
                error!("{}", reason);
                self.phase = LoadingPhase::Failed(reason);
                Task::none()
            }
            Message::SpriteBatchLoaded(results) => self.on_batch_loaded(results),
            Message::ScenePointer(position) => {
                self.pointer = position;
                self.refresh_hover();
                Task::none()
            }
            Message::SceneClicked => {
                if let Some(index) = self.dispatcher.current() {
                    if let Some(panel) = self.panels.get_mut(index) {
                        panel.cycle_image();
                    }
                }
                Task::none()
            }
            Message::SceneScrolled(steps) => {
                if steps != 0.0 {
                    let hovered = self
                        .dispatcher
                        .current()
                        .and_then(|index| self.panels.get_mut(index))
                        .filter(|panel| panel.is_visible());
                    match hovered {
                        Some(panel) => panel.scroll_year(if steps > 0.0 { 1 } else { -1 }),
                        None => {
                            self.canvas.camera.zoom(steps);
                            self.refresh_hover();
                        }
                    }
                }
                Task::none()
            }
            Message::CameraOrbit(dx, dy) => {
                self.canvas.camera.orbit(dx, dy);
                self.refresh_hover();
                Task::none()
            }
            Message::SceneResized(width, height) => {
                self.viewport = (width, height);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        ui::build_ui(self)
    }

    /// The panel currently raised by the dispatcher, if any.
    pub fn hovered_panel(&self) -> Option<&HoverPanel> {
        self.dispatcher
            .current()
            .and_then(|index| self.panels.get(index))
            .filter(|panel| panel.is_visible())
    }

    fn on_dataset_loaded(&mut self, index: DatasetIndex) -> Task<Message> {
        self.panels = self
            .scene
            .objects
            .iter()
            .enumerate()
            .map(|(object_index, object)| {
                let entries = object
                    .tag
                    .as_deref()
                    .and_then(|tag| index.entries_for_tag(tag))
                    .map(<[_]>::to_vec)
                    .unwrap_or_default();
                if object.is_hoverable() && entries.is_empty() {
                    warn!(
                        "No data found for tag '{}' on '{}'",
                        object.tag.as_deref().unwrap_or(""),
                        object.name
                    );
                }
                HoverPanel::new(object_index, &object.name, entries)
            })
            .collect();

        let referenced = index.unique_image_names();
        let on_disk = file_io::get_image_paths(&self.image_dir).len();
        debug!(
            "{} images referenced by the dataset, {} image files in {:?}",
            referenced.len(),
            on_disk,
            self.image_dir
        );

        self.index = index;

        let mut plan = SpriteLoadPlan::new(referenced, self.sprite_batch_size);
        if plan.is_finished() {
            self.finish_loading();
            return Task::none();
        }

        self.phase = LoadingPhase::LoadingSprites {
            loaded: 0,
            total: plan.total(),
        };
        let batch = plan.next_batch().unwrap_or_default();
        self.plan = Some(plan);
        self.load_batch_task(batch)
    }

    fn on_batch_loaded(
        &mut self,
        results: Vec<(String, Option<sprite_cache::DecodedImage>)>,
    ) -> Task<Message> {
        let attempted = results.len();
        for (name, decoded) in results {
            if let Some(decoded) = decoded {
                self.sprites.insert_decoded(&name, decoded);
            }
        }

        let Some(plan) = self.plan.as_mut() else {
            return Task::none();
        };
        plan.record_loaded(attempted);
        self.phase = LoadingPhase::LoadingSprites {
            loaded: plan.loaded(),
            total: plan.total(),
        };

        match plan.next_batch() {
            Some(batch) => self.load_batch_task(batch),
            None => {
                self.finish_loading();
                Task::none()
            }
        }
    }

    fn load_batch_task(&self, batch: Vec<String>) -> Task<Message> {
        let dir = self.image_dir.clone();
        Task::perform(
            sprite_cache::load_batch(dir, batch),
            Message::SpriteBatchLoaded,
        )
    }

    fn finish_loading(&mut self) {
        self.phase = LoadingPhase::Ready;
        self.canvas.interactive = true;
        info!("All images loaded. Cache size: {}", self.sprites.len());
    }

    /// Re-run the pick against the last pointer position and apply the
    /// hide/show transition when the hovered object changed.
    fn refresh_hover(&mut self) {
        if !self.phase.is_ready() {
            return;
        }

        let hit = self.pointer.and_then(|position| {
            let ray = self.canvas.camera.screen_ray(position, self.viewport);
            picking::pick(&ray, &self.scene.objects, self.max_ray_distance)
        });

        if let Some(change) = self.dispatcher.transition(hit) {
            if let Some(left) = change.left {
                if let Some(panel) = self.panels.get_mut(left) {
                    panel.hide();
                }
            }
            if let Some(entered) = change.entered {
                if let Some(panel) = self.panels.get_mut(entered) {
                    panel.show();
                }
            }
            self.canvas.instances = self.scene.instances(self.dispatcher.current());
            self.canvas.hovering = self.hovered_panel().is_some();
        }
    }
}
