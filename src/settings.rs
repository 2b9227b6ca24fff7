use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use log::{debug, info, warn, error};

use crate::config;

/// User-specific settings that persist across app sessions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    /// Window width at startup
    #[serde(default = "default_window_width")]
    pub window_width: u32,

    /// Window height at startup
    #[serde(default = "default_window_height")]
    pub window_height: u32,

    /// Name of the dataset CSV file inside the data directory
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Subfolder inside the data directory where images live
    /// (empty = images next to the CSV)
    #[serde(default)]
    pub image_subfolder: String,

    /// Vertical offset of the hover panel anchor above an object, in
    /// world units
    #[serde(default = "default_panel_offset")]
    pub panel_offset: f32,

    /// Maximum width of the hover panel in logical pixels
    #[serde(default = "default_panel_max_width")]
    pub panel_max_width: f32,

    /// Max distance for the hover raycast, in world units
    #[serde(default = "default_max_ray_distance")]
    pub max_ray_distance: f32,

    /// How many images are read concurrently per loading batch
    #[serde(default = "default_sprite_batch_size")]
    pub sprite_batch_size: usize,

    /// Toggle footer visibility
    #[serde(default = "default_show_footer")]
    pub show_footer: bool,
}

fn default_window_width() -> u32 {
    config::DEFAULT_WINDOW_WIDTH
}

fn default_window_height() -> u32 {
    config::DEFAULT_WINDOW_HEIGHT
}

fn default_data_file() -> String {
    config::DEFAULT_DATA_FILE.to_string()
}

fn default_panel_offset() -> f32 {
    config::DEFAULT_PANEL_OFFSET
}

fn default_panel_max_width() -> f32 {
    config::DEFAULT_PANEL_MAX_WIDTH
}

fn default_max_ray_distance() -> f32 {
    config::DEFAULT_MAX_RAY_DISTANCE
}

fn default_sprite_batch_size() -> usize {
    config::DEFAULT_SPRITE_BATCH_SIZE
}

fn default_show_footer() -> bool {
    true
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            data_file: default_data_file(),
            image_subfolder: String::new(),
            panel_offset: default_panel_offset(),
            panel_max_width: default_panel_max_width(),
            max_ray_distance: default_max_ray_distance(),
            sprite_batch_size: default_sprite_batch_size(),
            show_footer: default_show_footer(),
        }
    }
}

impl UserSettings {
    /// Get the path to the settings file
    /// On macOS: ~/Library/Application Support/HoverLens/settings.yaml
    /// On Linux: ~/.config/hoverlens/settings.yaml
    /// On Windows: C:\Users\<user>\AppData\Roaming\HoverLens\settings.yaml
    pub fn settings_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."));

        let app_config_dir = config_dir.join("HoverLens");
        app_config_dir.join("settings.yaml")
    }

    /// Load settings from the YAML file
    /// If custom_path is provided, uses that path; otherwise uses the default settings path
    pub fn load(custom_path: Option<&str>) -> Self {
        let path = match custom_path {
            Some(p) => {
                info!("Using custom settings path: {}", p);
                PathBuf::from(p)
            }
            None => Self::settings_path(),
        };

        if !path.exists() {
            info!("Settings file not found at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(contents) => {
                match serde_yaml::from_str::<UserSettings>(&contents) {
                    Ok(settings) => {
                        info!("Loaded settings from {:?}", path);
                        debug!(
                            "Settings: data_file={}, image_subfolder={}, batch={}, footer={}",
                            settings.data_file,
                            settings.image_subfolder,
                            settings.sprite_batch_size,
                            settings.show_footer
                        );
                        settings
                    }
                    Err(e) => {
                        error!("Failed to parse settings file at {:?}: {}", path, e);
                        warn!("Using default settings");
                        Self::default()
                    }
                }
            }
            Err(e) => {
                error!("Failed to read settings file at {:?}: {}", path, e);
                warn!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to the YAML file while preserving comments
    #[allow(dead_code)]
    pub fn save(&self) -> Result<(), String> {
        let path = Self::settings_path();

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)
                    .map_err(|e| format!("Failed to create settings directory: {}", e))?;
            }
        }

        // If file exists, try to preserve comments by doing in-place value updates
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(contents) => {
                    let updated = self.update_yaml_values(&contents);
                    fs::write(&path, updated)
                        .map_err(|e| format!("Failed to write settings file: {}", e))?;
                    info!("Saved settings to {:?} (comments preserved)", path);
                    return Ok(());
                }
                Err(e) => {
                    warn!("Failed to read existing settings file for comment preservation: {}", e);
                    // Fall through to create new file
                }
            }
        }

        // File doesn't exist or couldn't be read, create with comments
        let yaml = self.to_yaml_with_comments();
        fs::write(&path, yaml)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Update YAML values while preserving existing comments and structure
    fn update_yaml_values(&self, yaml_content: &str) -> String {
        let mut result = yaml_content.to_string();

        // Update each field using regex to replace the value while keeping comments
        result = Self::replace_yaml_value(&result, "window_width", &self.window_width.to_string());
        result = Self::replace_yaml_value(&result, "window_height", &self.window_height.to_string());
        result = Self::replace_yaml_value(&result, "data_file", &format!("\"{}\"", self.data_file));
        result = Self::replace_yaml_value(&result, "image_subfolder", &format!("\"{}\"", self.image_subfolder));
        result = Self::replace_yaml_value(&result, "panel_offset", &self.panel_offset.to_string());
        result = Self::replace_yaml_value(&result, "panel_max_width", &self.panel_max_width.to_string());
        result = Self::replace_yaml_value(&result, "max_ray_distance", &self.max_ray_distance.to_string());
        result = Self::replace_yaml_value(&result, "sprite_batch_size", &self.sprite_batch_size.to_string());
        result = Self::replace_yaml_value(&result, "show_footer", &self.show_footer.to_string());

        result
    }

    /// Replace a YAML key's value while preserving the rest of the line
    fn replace_yaml_value(yaml: &str, key: &str, new_value: &str) -> String {
        let pattern = format!(r"(?m)^(\s*{}\s*:\s*).*$", regex::escape(key));
        let replacement = format!("${{1}}{}", new_value);

        // Use regex crate for replacement
        match regex::Regex::new(&pattern) {
            Ok(re) => re.replace_all(yaml, replacement.as_str()).to_string(),
            Err(e) => {
                warn!("Failed to create regex for key '{}': {}", key, e);
                yaml.to_string()
            }
        }
    }

    /// Generate YAML content with comments for new files
    fn to_yaml_with_comments(&self) -> String {
        format!(
            r#"# HoverLens User Settings
# This file is loaded automatically when the application starts.
# Settings specified here will override the default values.

# Window size at startup
window_width: {}
window_height: {}

# Name of the dataset CSV file inside the data directory
data_file: "{}"

# Subfolder inside the data directory where images live
# (empty = images next to the CSV)
image_subfolder: "{}"

# Vertical offset of the hover panel anchor above an object (world units)
panel_offset: {}

# Maximum width of the hover panel (logical pixels)
panel_max_width: {}

# Max distance for the hover raycast (world units)
max_ray_distance: {}

# How many images are read concurrently per loading batch
sprite_batch_size: {}

# Show the footer with dataset information
show_footer: {}
"#,
            self.window_width,
            self.window_height,
            self.data_file,
            self.image_subfolder,
            self.panel_offset,
            self.panel_max_width,
            self.max_ray_distance,
            self.sprite_batch_size,
            self.show_footer
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let settings: UserSettings =
            serde_yaml::from_str("data_file: \"towns.csv\"\nshow_footer: false\n").unwrap();
        assert_eq!(settings.data_file, "towns.csv");
        assert!(!settings.show_footer);
        assert_eq!(settings.window_width, config::DEFAULT_WINDOW_WIDTH);
        assert_eq!(settings.sprite_batch_size, config::DEFAULT_SPRITE_BATCH_SIZE);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = UserSettings::load(Some("/nonexistent/hoverlens/settings.yaml"));
        assert_eq!(settings.data_file, config::DEFAULT_DATA_FILE);
        assert!(settings.show_footer);
    }

    #[test]
    fn test_value_replacement_keeps_comments() {
        let yaml = "# keep this comment\ndata_file: \"DATA.csv\"  \nshow_footer: true\n";
        let mut settings = UserSettings::default();
        settings.data_file = "other.csv".to_string();
        settings.show_footer = false;
        let updated = settings.update_yaml_values(yaml);
        assert!(updated.contains("# keep this comment"));
        assert!(updated.contains("data_file: \"other.csv\""));
        assert!(updated.contains("show_footer: false"));
    }
}
