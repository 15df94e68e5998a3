use std::collections::HashMap;

/// Words every theme can translate. Words missing from the theme translate to themselves.
pub const VOCABULARY: [&str; 20] = [
    "lap",
    "laps",
    "minutes",
    "of",
    "race",
    "qualify",
    "practice",
    "out",
    "remaining",
    "gridding",
    "pacelap",
    "finallap",
    "finishing",
    "leader",
    "invalid",
    "replay",
    "Clear",
    "Partly Cloudy",
    "Mostly Cloudy",
    "Overcast",
];

pub const AHEAD: &str = "ahead";
pub const BEHIND: &str = "behind";

/// TranslationTable maps the fixed vocabulary and the two gap signs to locale strings. It is
/// immutable once the theme is loaded.
#[derive(Debug, Clone)]
pub struct TranslationTable {
    words: HashMap<String, String>,
}

impl TranslationTable {
    /// By default a car ahead is marked with "-" and a car behind with "+", `switch_sign`
    /// swaps the two glyphs.
    pub fn new(translated: &HashMap<String, String>, switch_sign: bool) -> TranslationTable {
        let mut words = HashMap::with_capacity(VOCABULARY.len() + 2);

        for word in VOCABULARY.iter() {
            let value = translated
                .get(*word)
                .map(|w| w.trim())
                .filter(|w| !w.is_empty())
                .unwrap_or(*word);
            words.insert((*word).to_owned(), value.to_owned());
        }

        let (ahead, behind) = if switch_sign { ("+", "-") } else { ("-", "+") };
        words.insert(AHEAD.to_owned(), ahead.to_owned());
        words.insert(BEHIND.to_owned(), behind.to_owned());

        TranslationTable { words }
    }

    /// translate is total: unknown keys come back unchanged.
    pub fn translate<'a>(&'a self, key: &'a str) -> &'a str {
        self.words.get(key).map_or(key, |w| w.as_str())
    }

    pub fn ahead(&self) -> &str {
        self.translate(AHEAD)
    }

    pub fn behind(&self) -> &str {
        self.translate(BEHIND)
    }

    /// lap_count renders "3 laps" / "1 lap" with the translated unit.
    pub fn lap_count(&self, laps: i32) -> String {
        let unit = if laps > 1 { "laps" } else { "lap" };
        format!("{} {}", laps, self.translate(unit))
    }
}

impl Default for TranslationTable {
    fn default() -> Self {
        TranslationTable::new(&HashMap::new(), false)
    }
}
