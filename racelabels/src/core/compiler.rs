use crate::core::rounding::Rounding;
use crate::core::tokens::TokenSet;
use log::{debug, warn};

const SCRIPT_PREFIX: &str = "script";
const EXTERNAL_PREFIX: &str = "external";

/// ScriptPlaceholder is one `{script:<name>:<method>}` call found in a template. The
/// placeholder text stays in the compiled format and is replaced by the script result at render
/// time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPlaceholder {
    pub script: String,
    pub method: String,
    pub placeholder: String,
}

/// CompiledLabel is a label template rewritten into positional form: every known token became
/// its slot, e.g. `{gap}` -> `{18}`, and external columns became `{slot|fallback}` references.
///
/// * `source` - Template as written by the theme author
/// * `format` - Positional format rendered against a field set
/// * `scripts` - Script calls to resolve at render time, each listed once
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledLabel {
    pub source: String,
    pub format: String,
    pub scripts: Vec<ScriptPlaceholder>,
    pub rounding: Rounding,
    pub uppercase: bool,
}

impl CompiledLabel {
    /// compile never fails. Fragments it cannot resolve are removed (`{external...}`,
    /// `{script...}`) or left for the renderer to flag (unknown token names), so that a broken
    /// template still produces a visible label.
    pub fn compile<F: TokenSet>(
        source: &str,
        script_names: &[&str],
        rounding: Rounding,
        uppercase: bool,
    ) -> CompiledLabel {
        let (format, scripts) = compile_template::<F>(source, script_names);
        CompiledLabel {
            source: source.to_owned(),
            format,
            scripts,
            rounding,
            uppercase,
        }
    }
}

enum Fragment {
    Keep(String),
    Script(ScriptPlaceholder),
    Drop,
}

enum Part {
    Slot(usize),
    External(usize),
    Malformed,
    Unknown,
}

/// compile_template scans the template once, classifying every `{...}` fragment as token,
/// external reference, script call or literal.
pub fn compile_template<F: TokenSet>(
    source: &str,
    script_names: &[&str],
) -> (String, Vec<ScriptPlaceholder>) {
    let mut format = String::with_capacity(source.len());
    let mut scripts: Vec<ScriptPlaceholder> = Vec::new();
    let mut rest = source;

    while let Some(open) = rest.find('{') {
        format.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        // escaped brace
        if after.starts_with('{') {
            format.push_str("{{");
            rest = &after[1..];
            continue;
        }

        let close = match after.find('}') {
            Some(close) => close,
            None => {
                // unterminated, kept verbatim so the renderer reports it
                format.push_str(&rest[open..]);
                rest = "";
                break;
            }
        };

        match classify::<F>(&after[..close], script_names) {
            Fragment::Keep(inner) => {
                format.push('{');
                format.push_str(&inner);
                format.push('}');
            }
            Fragment::Script(call) => {
                format.push_str(&call.placeholder);
                if !scripts.contains(&call) {
                    scripts.push(call);
                }
            }
            Fragment::Drop => {}
        }
        rest = &after[close + 1..];
    }
    format.push_str(rest);

    (format, scripts)
}

fn classify<F: TokenSet>(inner: &str, script_names: &[&str]) -> Fragment {
    if inner.starts_with(SCRIPT_PREFIX) {
        return classify_script(inner, script_names);
    }

    let (primary, fallback) = match inner.split_once('|') {
        Some((primary, fallback)) => (primary, Some(fallback)),
        None => (inner, None),
    };

    let fallback = match fallback {
        None => None,
        Some("") => Some(String::new()),
        Some(name) => match resolve_part::<F>(name) {
            Part::Slot(slot) => Some(slot.to_string()),
            _ => return Fragment::Keep(inner.to_owned()),
        },
    };

    match (resolve_part::<F>(primary), fallback) {
        (Part::Slot(slot), None) => Fragment::Keep(slot.to_string()),
        (Part::Slot(slot), Some(fallback)) => Fragment::Keep(format!("{}|{}", slot, fallback)),
        // a missing external column renders empty unless a fallback field is given
        (Part::External(slot), fallback) => {
            Fragment::Keep(format!("{}|{}", slot, fallback.unwrap_or_default()))
        }
        (Part::Malformed, Some(fallback)) if !fallback.is_empty() => Fragment::Keep(fallback),
        (Part::Malformed, _) => {
            debug!("Removed unresolved external reference {{{}}}", inner);
            Fragment::Drop
        }
        (Part::Unknown, _) => Fragment::Keep(inner.to_owned()),
    }
}

fn classify_script(inner: &str, script_names: &[&str]) -> Fragment {
    for script in script_names {
        let prefix = format!("{}:{}:", SCRIPT_PREFIX, script);
        if let Some(method) = inner.strip_prefix(prefix.as_str()) {
            return Fragment::Script(ScriptPlaceholder {
                script: (*script).to_owned(),
                method: method.to_owned(),
                placeholder: format!("{{{}}}", inner),
            });
        }
    }

    warn!("Script call not found: {{{}}}", inner);
    Fragment::Drop
}

fn resolve_part<F: TokenSet>(part: &str) -> Part {
    if let Some(field) = F::from_name(part) {
        return Part::Slot(field.slot());
    }
    if !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()) {
        return match part.parse::<usize>() {
            Ok(slot) => Part::Slot(slot),
            Err(_) => Part::Unknown,
        };
    }
    if part.starts_with(EXTERNAL_PREFIX) {
        if !F::EXTERNAL {
            return Part::Malformed;
        }
        return match part
            .strip_prefix("external:")
            .and_then(|n| n.parse::<usize>().ok())
        {
            Some(n) => Part::External(F::external_slot(n)),
            None => Part::Malformed,
        };
    }
    Part::Unknown
}
