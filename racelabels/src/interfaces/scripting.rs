use crate::core::external_data::ExternalData;
use crate::core::rounding::Rounding;
use crate::core::session::{SessionSnapshot, StandingEntry};
use log::warn;

/// The entity a script call is rendered for.
#[derive(Debug, Clone, Copy)]
pub enum ScriptTarget<'a> {
    Standing(&'a StandingEntry),
    Session,
}

/// Everything a script provider may look at while producing its text.
#[derive(Debug, Clone, Copy)]
pub struct ScriptCall<'a> {
    pub target: ScriptTarget<'a>,
    pub session: &'a SessionSnapshot,
    pub rounding: Rounding,
    pub external: &'a ExternalData,
}

/// ScriptProvider is one named script that label templates can call as
/// `{script:<name>:<method>}`. Unknown methods must produce text (empty or an error message),
/// never a panic.
pub trait ScriptProvider {
    fn name(&self) -> &str;

    fn invoke(&self, method: &str, call: &ScriptCall) -> String;
}

/// ScriptRegistry is the set of script providers available to a theme, resolved by name.
#[derive(Default)]
pub struct ScriptRegistry {
    providers: Vec<Box<dyn ScriptProvider>>,
}

impl ScriptRegistry {
    pub fn new() -> ScriptRegistry {
        ScriptRegistry::default()
    }

    /// with_builtin_scripts returns a registry with every script shipped with the crate.
    pub fn with_builtin_scripts() -> ScriptRegistry {
        let mut registry = ScriptRegistry::new();
        registry.register(Box::new(TeamDataScript));
        registry
    }

    /// register adds a provider. A provider with the same name replaces the older one.
    pub fn register(&mut self, provider: Box<dyn ScriptProvider>) {
        self.providers.retain(|p| p.name() != provider.name());
        self.providers.push(provider);
    }

    pub fn available_script_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn invoke(&self, script: &str, method: &str, call: &ScriptCall) -> String {
        match self.providers.iter().find(|p| p.name() == script) {
            Some(provider) => provider.invoke(method, call),
            None => {
                warn!("Script {} is not loaded", script);
                String::new()
            }
        }
    }
}

impl std::fmt::Debug for ScriptRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("ScriptRegistry")
            .field("providers", &self.available_script_names())
            .finish()
    }
}

/// TeamDataScript exposes the external team table. The method is the 0-based column of the
/// team row, e.g. `{script:team:0}`.
#[derive(Debug, Clone, Copy)]
pub struct TeamDataScript;

impl ScriptProvider for TeamDataScript {
    fn name(&self) -> &str {
        "team"
    }

    fn invoke(&self, method: &str, call: &ScriptCall) -> String {
        let standing = match call.target {
            ScriptTarget::Standing(standing) => standing,
            ScriptTarget::Session => return String::new(),
        };
        let column = match method.trim().parse::<usize>() {
            Ok(column) => column,
            Err(_) => return String::new(),
        };

        call.external
            .team_data_for(standing.driver.team_id)
            .get(column)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::session::DriverInfo;

    struct Echo;

    impl ScriptProvider for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn invoke(&self, method: &str, _call: &ScriptCall) -> String {
            format!("echo:{}", method)
        }
    }

    fn call_for<'a>(
        standing: &'a StandingEntry,
        session: &'a SessionSnapshot,
        external: &'a ExternalData,
    ) -> ScriptCall<'a> {
        ScriptCall {
            target: ScriptTarget::Standing(standing),
            session,
            rounding: Rounding::default(),
            external,
        }
    }

    #[test]
    fn invokes_by_name_and_tolerates_unknown_scripts() {
        let mut registry = ScriptRegistry::new();
        registry.register(Box::new(Echo));
        let standing = StandingEntry::default();
        let session = SessionSnapshot::default();
        let external = ExternalData::default();
        let call = call_for(&standing, &session, &external);

        assert_eq!(registry.invoke("echo", "hello", &call), "echo:hello");
        assert_eq!(registry.invoke("missing", "hello", &call), "");
    }

    #[test]
    fn registering_twice_keeps_one_provider() {
        let mut registry = ScriptRegistry::with_builtin_scripts();
        registry.register(Box::new(TeamDataScript));
        assert_eq!(registry.available_script_names(), vec!["team"]);
    }

    #[test]
    fn team_script_reads_team_columns() {
        let standing = StandingEntry {
            driver: DriverInfo {
                team_id: 3,
                ..DriverInfo::default()
            },
            ..StandingEntry::default()
        };
        let session = SessionSnapshot::default();
        let external = ExternalData::new(
            Vec::new(),
            vec![(3, vec!["Red Team".to_owned(), "RT".to_owned()])],
            Vec::new(),
        );
        let call = call_for(&standing, &session, &external);

        assert_eq!(TeamDataScript.invoke("1", &call), "RT");
        assert_eq!(TeamDataScript.invoke("5", &call), "");
        assert_eq!(TeamDataScript.invoke("name", &call), "");
    }
}
