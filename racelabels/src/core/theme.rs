use crate::core::compiler::CompiledLabel;
use crate::core::rounding::Rounding;
use crate::core::session::{DataOrder, SessionType};
use crate::core::tokens::{SessionField, StandingField};
use crate::core::translation::TranslationTable;
use crate::interfaces::scripting::ScriptRegistry;
use serde::Deserialize;
use std::collections::HashMap;

/// Which entity a label is rendered against.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    Standing,
    Followed,
    SessionState,
}

impl Default for Dataset {
    fn default() -> Self {
        Dataset::Standing
    }
}

/// * `name` - Label name used in reports
/// * `text` - Template text with `{token}` placeholders
/// * `rounding` - Decimal places of numeric fields, clamped to 0..=3
/// * `uppercase` - Upper-case the rendered text
/// * `dataset` - Entity the label is rendered against
/// * `session` - Session to take the entity from, `none` selects the current session
/// * `order` - Standing order used to pick the standing
/// * `offset` - 0-based rank within `order`
/// * `class` - Optional car class filter applied before `offset`
#[derive(Debug, Deserialize, Clone)]
pub struct LabelPars {
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub rounding: Rounding,
    #[serde(default)]
    pub uppercase: bool,
    #[serde(default)]
    pub dataset: Dataset,
    #[serde(default)]
    pub session: SessionType,
    #[serde(default)]
    pub order: DataOrder,
    #[serde(default)]
    pub offset: usize,
    #[serde(default)]
    pub class: Option<String>,
}

/// * `name` - Theme name
/// * `switch_sign` - Show "+" for cars ahead and "-" for cars behind instead of the reverse
/// * `allow_retire` - Report cars that left the world as out
/// * `lap_countdown_from` - Laps remaining from which the lap counter counts down
/// * `points_col` - External data column holding championship points, 0 if none
/// * `translation` - Translations of the label vocabulary
/// * `cars` / `car_classes` - Display names by car id
#[derive(Debug, Deserialize, Clone)]
pub struct ThemePars {
    pub name: String,
    #[serde(default)]
    pub switch_sign: bool,
    #[serde(default)]
    pub allow_retire: bool,
    #[serde(default = "default_lap_countdown_from")]
    pub lap_countdown_from: i32,
    #[serde(default)]
    pub points_col: usize,
    #[serde(default)]
    pub translation: HashMap<String, String>,
    #[serde(default)]
    pub cars: HashMap<i32, String>,
    #[serde(default)]
    pub car_classes: HashMap<i32, String>,
    #[serde(default)]
    pub labels: Vec<LabelPars>,
}

fn default_lap_countdown_from() -> i32 {
    3
}

#[derive(Debug, Clone)]
pub struct ThemeLabel {
    pub pars: LabelPars,
    pub compiled: CompiledLabel,
}

/// Theme is the loaded, immutable presentation configuration. Labels are compiled once here and
/// reused on every tick.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub translation: TranslationTable,
    pub allow_retire: bool,
    pub lap_countdown_from: i32,
    pub points_col: usize,
    pub labels: Vec<ThemeLabel>,
    cars: HashMap<i32, String>,
    car_classes: HashMap<i32, String>,
}

impl Theme {
    pub fn new(theme_pars: &ThemePars, scripts: &ScriptRegistry) -> Theme {
        let script_names = scripts.available_script_names();

        let labels = theme_pars
            .labels
            .iter()
            .map(|pars| {
                let compiled = match pars.dataset {
                    Dataset::SessionState => CompiledLabel::compile::<SessionField>(
                        &pars.text,
                        &script_names,
                        pars.rounding,
                        pars.uppercase,
                    ),
                    Dataset::Standing | Dataset::Followed => {
                        CompiledLabel::compile::<StandingField>(
                            &pars.text,
                            &script_names,
                            pars.rounding,
                            pars.uppercase,
                        )
                    }
                };
                ThemeLabel {
                    pars: pars.to_owned(),
                    compiled,
                }
            })
            .collect();

        Theme {
            name: theme_pars.name.to_owned(),
            translation: TranslationTable::new(&theme_pars.translation, theme_pars.switch_sign),
            allow_retire: theme_pars.allow_retire,
            lap_countdown_from: theme_pars.lap_countdown_from,
            points_col: theme_pars.points_col,
            labels,
            cars: theme_pars.cars.to_owned(),
            car_classes: theme_pars.car_classes.to_owned(),
        }
    }

    /// car_name returns the display name of a car model, or its id if the theme has none.
    pub fn car_name(&self, car_id: i32) -> String {
        self.cars
            .get(&car_id)
            .cloned()
            .unwrap_or_else(|| car_id.to_string())
    }

    /// car_class returns the display name of the class of a car model. Without a theme entry the
    /// class name reported by the session is used, and the car id if that is empty too.
    pub fn car_class(&self, car_id: i32, reported: &str) -> String {
        match self.car_classes.get(&car_id) {
            Some(name) => name.to_owned(),
            None if !reported.is_empty() => reported.to_owned(),
            None => car_id.to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            name: String::new(),
            translation: TranslationTable::default(),
            allow_retire: false,
            lap_countdown_from: default_lap_countdown_from(),
            points_col: 0,
            labels: Vec::new(),
            cars: HashMap::new(),
            car_classes: HashMap::new(),
        }
    }
}
