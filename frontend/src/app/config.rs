use serde::Deserialize;
use std::path::PathBuf;

/// Prefix shared by every configuration variable
pub const ENV_PREFIX: &str = "TOPONYM_";

/// How the fetched map is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Save the map to disk and show it in our own window until closed
    #[default]
    Window,
    /// Decode the map in memory and hand it to the system image viewer
    Native,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub geocoder_api_key: String,

    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    #[serde(default = "default_static_map_url")]
    pub static_map_url: String,

    // Endpoint for in-memory map fetches; kept separate from the static map one
    #[serde(default = "default_static_map_url")]
    pub image_url: String,

    #[serde(default = "default_map_file")]
    pub map_file: PathBuf,

    #[serde(default = "default_layer")]
    pub layer: String,

    #[serde(default = "default_marker_style")]
    pub marker_style: String,

    #[serde(default)]
    pub display: DisplayMode,
}

impl Config {
    /// Load configuration from `TOPONYM_*` environment variables
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env::<Config>()
    }
}

fn default_geocoder_url() -> String {
    "https://geocode-maps.yandex.ru/1.x/".to_string()
}

fn default_static_map_url() -> String {
    "https://static-maps.yandex.ru/1.x/".to_string()
}

fn default_map_file() -> PathBuf {
    PathBuf::from(static_map::DEFAULT_MAP_FILE)
}

fn default_layer() -> String {
    "map".to_string()
}

fn default_marker_style() -> String {
    "pm2lbl57".to_string()
}
