use crate::core::cache::{EntityKey, TickCache};
use crate::core::compiler::CompiledLabel;
use crate::core::context::RenderContext;
use crate::core::session::{SessionSnapshot, StandingEntry};
use crate::core::session_fields::compute_session_fields;
use crate::core::standing_fields::compute_standing_fields;
use crate::core::tokens::{FieldValues, TokenSet};
use crate::interfaces::scripting::{ScriptCall, ScriptTarget};
use std::fmt;

/// Text shown instead of a label whose format does not match its fields.
pub const INVALID_MARKER: &str = "[invalid]";

/// FormatError is returned when a positional format references a slot that does not exist or
/// is not well formed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatError {
    pub fragment: String,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid format fragment {}", self.fragment)
    }
}

impl std::error::Error for FormatError {}

/// substitute replaces every `{N}` slot of a positional format with the text `lookup` returns
/// for it. `{A|B}` takes slot A if it exists and slot B otherwise, an empty B renders nothing.
/// `{{` and `}}` render single braces, a `}` that closes nothing is literal text.
pub fn substitute<'v, L>(format: &str, lookup: L) -> Result<String, FormatError>
where
    L: Fn(usize) -> Option<&'v str>,
{
    let mut out = String::with_capacity(format.len());
    let mut chars = format.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' if matches!(chars.peek(), Some((_, '{'))) => {
                chars.next();
                out.push('{');
            }
            '}' if matches!(chars.peek(), Some((_, '}'))) => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let rest = &format[pos + 1..];
                let close = rest.find('}').ok_or_else(|| FormatError {
                    fragment: format[pos..].to_owned(),
                })?;
                let inner = &rest[..close];
                out.push_str(resolve_slot(inner, &lookup)?);
                // skip the slot text and its closing brace
                for _ in 0..inner.chars().count() + 1 {
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn resolve_slot<'v, L>(inner: &str, lookup: &L) -> Result<&'v str, FormatError>
where
    L: Fn(usize) -> Option<&'v str>,
{
    let invalid = || FormatError {
        fragment: format!("{{{}}}", inner),
    };
    let parse = |slot: &str| slot.parse::<usize>().map_err(|_| invalid());

    match inner.split_once('|') {
        None => lookup(parse(inner)?).ok_or_else(invalid),
        Some((primary, "")) => Ok(lookup(parse(primary)?).unwrap_or("")),
        Some((primary, fallback)) => {
            let primary = parse(primary)?;
            let fallback = parse(fallback)?;
            lookup(primary).or_else(|| lookup(fallback)).ok_or_else(invalid)
        }
    }
}

/// splice_scripts replaces the script placeholders of a compiled label with their results in a
/// single left-to-right pass. Results are brace-escaped so that they render literally.
fn splice_scripts(label: &CompiledLabel, results: &[String]) -> String {
    let format = label.format.as_str();
    let mut out = String::with_capacity(format.len());
    let mut idx = 0;

    'scan: while idx < format.len() {
        let rest = &format[idx..];
        if rest.starts_with("{{") {
            out.push_str("{{");
            idx += 2;
            continue;
        }
        if rest.starts_with('{') {
            for (call, result) in label.scripts.iter().zip(results) {
                if rest.starts_with(call.placeholder.as_str()) {
                    out.push_str(&result.replace('{', "{{").replace('}', "}}"));
                    idx += call.placeholder.len();
                    continue 'scan;
                }
            }
        }
        // advance by one full character
        let c = rest.chars().next().unwrap_or_default();
        out.push(c);
        idx += c.len_utf8().max(1);
    }

    out
}

/// render_label turns a compiled label into display text against one field set. Script results
/// must be given in the order of `label.scripts`.
pub fn render_label<F: TokenSet>(
    label: &CompiledLabel,
    fields: &FieldValues<F>,
    script_results: &[String],
) -> String {
    let format = if label.scripts.is_empty() {
        label.format.clone()
    } else {
        splice_scripts(label, script_results)
    };

    let text = match substitute(&format, |slot| fields.slot(slot)) {
        Ok(text) => text.replace("\\n", "\n"),
        Err(_) => INVALID_MARKER.to_owned(),
    };

    if label.uppercase {
        text.to_uppercase()
    } else {
        text
    }
}

fn invoke_scripts(label: &CompiledLabel, call: &ScriptCall, ctx: &RenderContext) -> Vec<String> {
    label
        .scripts
        .iter()
        .map(|s| ctx.scripts.invoke(&s.script, &s.method, call))
        .collect()
}

/// render_standing_label renders a label against one driver standing. The standing fields are
/// taken from the tick cache when another label already needed them.
pub fn render_standing_label(
    label: &CompiledLabel,
    standing: &StandingEntry,
    session: &SessionSnapshot,
    ctx: &RenderContext,
    cache: &mut TickCache,
) -> String {
    let key = EntityKey::standing(session.id, standing.driver.car_idx);
    let fields = cache.standings.get_or_compute(key, label.rounding, || {
        compute_standing_fields(standing, session, label.rounding, ctx)
    });

    let call = ScriptCall {
        target: ScriptTarget::Standing(standing),
        session,
        rounding: label.rounding,
        external: ctx.external,
    };
    let results = invoke_scripts(label, &call, ctx);

    render_label(label, &*fields, &results)
}

/// render_session_label renders a label against the state of one session.
pub fn render_session_label(
    label: &CompiledLabel,
    session: &SessionSnapshot,
    ctx: &RenderContext,
    cache: &mut TickCache,
) -> String {
    let key = EntityKey::session(session.id);
    let fields = cache.sessions.get_or_compute(key, label.rounding, || {
        compute_session_fields(session, label.rounding, ctx)
    });

    let call = ScriptCall {
        target: ScriptTarget::Session,
        session,
        rounding: label.rounding,
        external: ctx.external,
    };
    let results = invoke_scripts(label, &call, ctx);

    render_label(label, &*fields, &results)
}
