use crate::core::cache::TickCache;
use crate::core::context::RenderContext;
use crate::core::external_data::ExternalData;
use crate::core::render::{render_session_label, render_standing_label};
use crate::core::session::{RaceWeekend, SessionSnapshot, SessionType};
use crate::core::theme::{Dataset, Theme, ThemeLabel};
use crate::interfaces::scripting::ScriptRegistry;
use crate::interfaces::time_format::{ClockTimeFormatter, TimeFormatter};
use crate::post::render_report::{RenderReport, RenderedLabel};
use flume::Receiver;
use log::{debug, info};

/// LabelEngine owns everything that lives longer than one tick: the theme with its compiled
/// labels, the external data tables, the script registry and the tick cache.
pub struct LabelEngine {
    pub theme: Theme,
    pub external: ExternalData,
    pub scripts: ScriptRegistry,
    timer: Box<dyn TimeFormatter>,
    cache: TickCache,
    tick: u64,
}

impl LabelEngine {
    pub fn new(theme: Theme, external: ExternalData, scripts: ScriptRegistry) -> LabelEngine {
        LabelEngine {
            theme,
            external,
            scripts,
            timer: Box::new(ClockTimeFormatter),
            cache: TickCache::new(),
            tick: 0,
        }
    }

    pub fn with_timer(mut self, timer: Box<dyn TimeFormatter>) -> LabelEngine {
        self.timer = timer;
        self
    }

    /// render_tick renders every label of the theme against a new snapshot.
    pub fn render_tick(&mut self, weekend: &RaceWeekend) -> RenderReport {
        self.tick += 1;
        let ctx = RenderContext {
            weekend,
            theme: &self.theme,
            external: &self.external,
            scripts: &self.scripts,
            timer: self.timer.as_ref(),
        };
        let report = render_tick(&ctx, &mut self.cache, self.tick);

        debug!(
            "Tick {}: rendered {} labels, cache hits {}, misses {}",
            report.tick,
            report.labels.len(),
            report.cache.hits,
            report.cache.misses
        );
        report
    }
}

/// render_tick invalidates the cache once and then renders the theme labels in order.
pub fn render_tick(ctx: &RenderContext, cache: &mut TickCache, tick: u64) -> RenderReport {
    cache.begin_tick();

    let labels = ctx
        .theme
        .labels
        .iter()
        .map(|label| RenderedLabel {
            name: label.pars.name.to_owned(),
            text: render_theme_label(label, ctx, cache),
        })
        .collect();

    RenderReport {
        tick,
        session: ctx
            .weekend
            .current_session()
            .map_or(-1, |session| session.id),
        labels,
        cache: cache.stats(),
    }
}

/// The session a label reads from, the running session unless the label names a session type.
fn label_session<'a>(label: &ThemeLabel, weekend: &'a RaceWeekend) -> Option<&'a SessionSnapshot> {
    match label.pars.session {
        SessionType::None => weekend.current_session(),
        session_type => weekend.find_session_by_type(session_type),
    }
}

fn render_theme_label(label: &ThemeLabel, ctx: &RenderContext, cache: &mut TickCache) -> String {
    let session = match label_session(label, ctx.weekend) {
        Some(session) => session,
        None => {
            debug!("Label {} has no session to render from", label.pars.name);
            return String::new();
        }
    };

    match label.pars.dataset {
        Dataset::SessionState => render_session_label(&label.compiled, session, ctx, cache),
        Dataset::Followed => {
            let followed = ctx.weekend.followed_standing(session);
            render_standing_label(&label.compiled, &followed, session, ctx, cache)
        }
        Dataset::Standing => {
            let rank = label.pars.offset as i32 + 1;
            match session.find_position(
                rank,
                label.pars.order,
                label.pars.class.as_deref(),
                ctx.external,
            ) {
                Some(standing) => {
                    render_standing_label(&label.compiled, standing, session, ctx, cache)
                }
                None => String::new(),
            }
        }
    }
}

/// handle_ticks renders every snapshot received on the channel until all senders are dropped,
/// and returns the reports in arrival order.
pub fn handle_ticks(engine: &mut LabelEngine, rx: &Receiver<RaceWeekend>) -> Vec<RenderReport> {
    info!("Rendering {} labels per tick", engine.theme.labels.len());

    let reports: Vec<RenderReport> = rx.iter().map(|weekend| engine.render_tick(&weekend)).collect();

    info!("Rendered {} ticks", reports.len());
    reports
}
