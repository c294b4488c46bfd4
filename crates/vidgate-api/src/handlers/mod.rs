pub mod download;
pub mod video_info;
