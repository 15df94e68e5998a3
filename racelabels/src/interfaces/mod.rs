pub mod scripting;
pub mod time_format;
