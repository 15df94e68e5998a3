pub mod read_external_data;
pub mod read_snapshot;
pub mod read_theme_pars;
pub mod render_opts;
