use crate::core::cache::CacheStats;
use anyhow::Context;
use serde::Serialize;
use std::fmt::Write;
use std::fs::OpenOptions;
use std::path::Path;

/// RenderedLabel is the text of one theme label in one tick.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RenderedLabel {
    pub name: String,
    pub text: String,
}

/// RenderReport contains everything rendered during one tick.
///
/// * `tick` - 1-based tick number
/// * `session` - Id of the running session, -1 if the snapshot had none
/// * `cache` - Cache hits and misses of this tick
#[derive(Debug, Serialize, Clone)]
pub struct RenderReport {
    pub tick: u64,
    pub session: i32,
    pub labels: Vec<RenderedLabel>,
    pub cache: CacheStats,
}

impl RenderReport {
    /// format_labels lays the labels out as `name: text` lines. Multi-line labels are indented
    /// below their name.
    pub fn format_labels(&self) -> String {
        let width = self.labels.iter().map(|l| l.name.len()).max().unwrap_or(0);
        let mut out = String::new();

        for label in self.labels.iter() {
            let mut lines = label.text.lines();
            let first = lines.next().unwrap_or("");
            // writing into a String cannot fail
            let _ = writeln!(&mut out, "{:width$} | {}", label.name, first, width = width);
            for line in lines {
                let _ = writeln!(&mut out, "{:width$} | {}", "", line, width = width);
            }
        }
        out
    }

    /// print_labels prints the rendered labels of the tick to the console output.
    pub fn print_labels(&self) {
        println!(
            "RESULT: Tick {} (session {}, cache hits {}, misses {})",
            self.tick, self.session, self.cache.hits, self.cache.misses
        );
        print!("{}", self.format_labels());
    }
}

/// write_reports_to_file writes all reports as a JSON array and returns the path written to.
pub fn write_reports_to_file(reports: &[RenderReport], path: &Path) -> anyhow::Result<String> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .context(format!("Failed to create output directory {}!", dir.display()))?;
    }
    let fh = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)
        .context(format!("Failed to open output file {}!", path.display()))?;
    serde_json::to_writer_pretty(&fh, reports)
        .context(format!("Failed to write output file {}!", path.display()))?;

    Ok(path.to_string_lossy().into_owned())
}
