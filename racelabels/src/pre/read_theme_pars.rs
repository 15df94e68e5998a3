use crate::core::theme::ThemePars;
use anyhow::Context;
use std::fs::OpenOptions;
use std::path::Path;

/// read_theme_pars reads the JSON file and decodes the JSON string into the theme parameters
/// struct.
pub fn read_theme_pars(filepath: &Path) -> anyhow::Result<ThemePars> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open theme file {}!", filepath.display()))?;
    let pars = serde_json::from_reader(&fh)
        .context(format!("Failed to parse theme file {}!", filepath.display()))?;
    Ok(pars)
}
