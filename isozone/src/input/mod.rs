pub mod clip_reader;
pub mod points_reader;
