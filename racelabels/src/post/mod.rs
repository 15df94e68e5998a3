pub mod render_report;
