use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Built-in defaults
// ---------------------------------------------------------------------------

/// Dataset file opened at startup, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/test-00000-of-00001 (1).parquet";

pub const WINDOW_TITLE: &str = "LongVideoBench Dataset Viewer";

pub const EMBED_URL_PREFIX: &str = "https://www.youtube.com/embed/";
pub const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Granularity of the duration range sliders, in seconds.
pub const DURATION_STEP: f64 = 1.0;

/// Startup settings for the viewer window.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub data_path: PathBuf,
    pub inner_size: [f32; 2],
    pub min_inner_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            inner_size: [1280.0, 860.0],
            min_inner_size: [720.0, 480.0],
        }
    }
}
