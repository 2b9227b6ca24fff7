use once_cell::sync::Lazy;
use crate::settings::UserSettings;

// Default values for configuration
// These serve as fallback values and can be used for "reset to defaults" functionality
pub const DEFAULT_WINDOW_WIDTH: u32 = 1280;
pub const DEFAULT_WINDOW_HEIGHT: u32 = 800;
pub const DEFAULT_DATA_FILE: &str = "DATA.csv";
pub const DEFAULT_IMAGE_SUBFOLDER: &str = "";
pub const DEFAULT_SPRITE_BATCH_SIZE: usize = 8;
pub const DEFAULT_MAX_RAY_DISTANCE: f32 = 100.0;
pub const DEFAULT_PANEL_OFFSET: f32 = 2.5;
pub const DEFAULT_PANEL_MAX_WIDTH: f32 = 360.0;

pub struct Config {
    pub window_width: u32,      // Default window width
    pub window_height: u32,     // Default window height
}

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    // Load settings from YAML file
    let settings = UserSettings::load(None);

    Config {
        window_width: settings.window_width,
        window_height: settings.window_height,
    }
});
