use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use racelabels::core::external_data::ExternalData;
use racelabels::core::handle_tick::{handle_ticks, LabelEngine};
use racelabels::core::theme::Theme;
use racelabels::interfaces::scripting::ScriptRegistry;
use racelabels::post::render_report::write_reports_to_file;
use racelabels::pre::read_external_data::read_external_data;
use racelabels::pre::read_snapshot::read_snapshot;
use racelabels::pre::read_theme_pars::read_theme_pars;
use racelabels::pre::render_opts::RenderOpts;
use std::thread;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    // get render options from the command line arguments
    let render_opts: RenderOpts = RenderOpts::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if render_opts.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();

    // load theme and compile its labels
    info!("Reading theme from {:?}", render_opts.theme_path);
    let theme_pars = read_theme_pars(&render_opts.theme_path)?;
    let scripts = ScriptRegistry::with_builtin_scripts();
    let theme = Theme::new(&theme_pars, &scripts);

    // load external data
    let external = match &render_opts.data_path {
        Some(data_path) => {
            info!("Reading external data from {:?}", data_path);
            read_external_data(
                data_path,
                render_opts.teams_path.as_deref(),
                theme.points_col,
            )?
        }
        None => {
            if render_opts.teams_path.is_some() {
                warn!("Team data is ignored without a driver data file");
            }
            ExternalData::default()
        }
    };

    info!(
        "Rendering theme {} with {} labels over {} snapshots",
        theme.name,
        theme.labels.len(),
        render_opts.snapshot_paths.len()
    );

    // EXECUTION -----------------------------------------------------------------------------------
    // snapshots are read on their own thread and handed over one tick at a time
    let (tx, rx) = flume::unbounded();
    let snapshot_paths = render_opts.snapshot_paths.clone();

    let reader = thread::spawn(move || -> anyhow::Result<()> {
        for snapshot_path in snapshot_paths.iter() {
            let weekend = read_snapshot(snapshot_path)?;
            tx.send(weekend)
                .context("Failed to send snapshot to the renderer!")?;
        }
        Ok(())
    });

    let t_start = Instant::now();
    let mut engine = LabelEngine::new(theme, external, scripts);
    let reports = handle_ticks(&mut engine, &rx);
    info!("Execution time: {}ms", t_start.elapsed().as_millis());

    match reader.join() {
        Ok(result) => result?,
        Err(_) => anyhow::bail!("Snapshot reader thread panicked!"),
    }

    // POST-PROCESSING -----------------------------------------------------------------------------
    if let Some(output_path) = &render_opts.output_path {
        let written = write_reports_to_file(&reports, output_path)?;
        info!("Report written to {}", written);
    } else {
        for report in reports.iter() {
            report.print_labels();
        }
    }

    Ok(())
}
