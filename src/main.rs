#![windows_subsystem = "windows"]

mod app;
mod config;
mod dataset;
mod file_io;
mod loading;
mod panel;
mod scene;
mod settings;
mod sprite_cache;
mod ui;

#[allow(unused_imports)]
use log::{Level, trace, debug, info, warn, error};

use std::path::PathBuf;

use clap::Parser;
use iced::Size;

use crate::app::{Flags, HoverLens};
use crate::config::CONFIG;
use crate::scene::Scene;
use crate::settings::UserSettings;

const APP_NAME: &str = "hoverlens";

#[derive(Parser, Debug)]
#[command(name = "hoverlens", version, about = "Interactive 3D scene with hover data panels")]
struct Args {
    /// Directory holding the dataset CSV, the scene file and the images
    #[arg(default_value = "data")]
    data_dir: PathBuf,

    /// Scene file to load (defaults to <data_dir>/scene.yaml)
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Custom settings file path
    #[arg(long)]
    settings: Option<String>,
}

pub fn main() -> iced::Result {
    let args = Args::parse();

    let shared_log_buffer = file_io::setup_logger(APP_NAME);
    file_io::setup_panic_hook(APP_NAME, shared_log_buffer);

    info!("HoverLens starting, data dir: {:?}", args.data_dir);

    let scene_path = args
        .scene
        .clone()
        .unwrap_or_else(|| args.data_dir.join("scene.yaml"));
    let scene = match Scene::from_file(&scene_path) {
        Ok(scene) => scene,
        Err(reason) => {
            error!("{}", reason);
            std::process::exit(1);
        }
    };

    let settings = UserSettings::load(args.settings.as_deref());
    let window_size = Size::new(CONFIG.window_width as f32, CONFIG.window_height as f32);

    let flags = Flags {
        data_dir: args.data_dir,
        scene,
        settings,
    };

    iced::application(HoverLens::title, HoverLens::update, HoverLens::view)
        .theme(HoverLens::theme)
        .window_size(window_size)
        .antialiasing(true)
        .run_with(move || HoverLens::new(flags))
}
