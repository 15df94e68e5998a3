pub mod cache;
pub mod compiler;
pub mod context;
pub mod external_data;
pub mod handle_tick;
pub mod render;
pub mod rounding;
pub mod session;
pub mod session_fields;
pub mod standing_fields;
pub mod theme;
pub mod tokens;
pub mod translation;
