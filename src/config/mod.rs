pub mod load;
pub mod save;
pub mod types;

pub use types::{
    ClipMode, Config, HighlightSettings, Language, MAX_RECENT_PATHS, UserSettings,
    VideoExtensions,
};
