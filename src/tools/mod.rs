mod ffprobe_info;
mod path_validator;
mod tool_resolver;
mod video_scanner;

pub use ffprobe_info::{Chapter, FfprobeProber, MediaInfo, MediaProber, parse_probe_output};
pub use path_validator::{ensure_directory_exists, validate_path_exists};
pub use tool_resolver::{ResolvedTools, SystemToolResolver, Tool, ToolResolver};
pub use video_scanner::{FileLister, VideoFileLister};
