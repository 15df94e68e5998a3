use crate::core::external_data::ExternalData;
use crate::core::session::RaceWeekend;
use crate::core::theme::Theme;
use crate::interfaces::scripting::ScriptRegistry;
use crate::interfaces::time_format::TimeFormatter;

/// RenderContext bundles the read-only inputs of one tick. It is built by the tick driver and
/// passed into every field computation and render call.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub weekend: &'a RaceWeekend,
    pub theme: &'a Theme,
    pub external: &'a ExternalData,
    pub scripts: &'a ScriptRegistry,
    pub timer: &'a dyn TimeFormatter,
}
