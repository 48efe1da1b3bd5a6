pub mod duration;
pub mod file_name;
pub mod temp_dir;
pub mod video_id;
