use crate::core::session::RaceWeekend;
use anyhow::Context;
use helpers::general::InputValueError;
use std::fs::OpenOptions;
use std::io::Read;
use std::path::Path;

/// read_snapshot reads one telemetry snapshot (a whole race weekend) from a JSON file.
pub fn read_snapshot(filepath: &Path) -> anyhow::Result<RaceWeekend> {
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!("Failed to open snapshot file {}!", filepath.display()))?;
    parse_snapshot(fh).context(format!("Failed to parse snapshot file {}!", filepath.display()))
}

/// parse_snapshot decodes a snapshot and checks that it points at an existing session with a
/// unique id.
pub fn parse_snapshot<R: Read>(reader: R) -> anyhow::Result<RaceWeekend> {
    let weekend: RaceWeekend = serde_json::from_reader(reader)?;

    if weekend.current_session().is_none() {
        return Err(InputValueError).context(format!(
            "Current session {} does not exist, the snapshot holds {} sessions!",
            weekend.current_session,
            weekend.sessions.len()
        ));
    }

    for (idx, session) in weekend.sessions.iter().enumerate() {
        if weekend.sessions[..idx].iter().any(|s| s.id == session.id) {
            return Err(InputValueError)
                .context(format!("Session id {} is used twice!", session.id));
        }
    }

    Ok(weekend)
}
