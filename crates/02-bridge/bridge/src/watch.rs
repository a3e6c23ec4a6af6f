//! Predicate-based watch selection over the engine's atom enumeration.

use std::collections::HashSet;

use engine_abi::PropagateInit;

use crate::command::HostCommand;
use crate::error::BridgeResult;
use crate::host::HostRuntime;

/// Token selecting every atom regardless of predicate name.
pub const WATCH_ALL_TOKEN: &str = "*";

/// Which predicates the controller wants to observe.
///
/// Immutable after bridge construction; supplied at session start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WatchSpec {
    /// Watch every atom.
    All,
    /// Watch atoms whose predicate name is exactly in the set.
    Names(HashSet<String>),
}

impl WatchSpec {
    /// Parses a whitespace-delimited predicate list. A lone `*` token
    /// anywhere selects everything.
    pub fn parse(text: &str) -> Self {
        let mut names = HashSet::new();
        for token in text.split_whitespace() {
            if token == WATCH_ALL_TOKEN {
                return WatchSpec::All;
            }
            names.insert(token.to_string());
        }
        WatchSpec::Names(names)
    }

    /// Exact-match test against a predicate name. No wildcards within names.
    pub fn matches(&self, predicate: &str) -> bool {
        match self {
            WatchSpec::All => true,
            WatchSpec::Names(names) => names.contains(predicate),
        }
    }
}

/// Registers watches for every atom matching `spec`.
///
/// Each matching atom gets a watch on both polarities of its solver literal
/// and one `RegisterWatch` event. Atoms are visited once, so none is watched
/// twice under [`WatchSpec::All`]. Any engine or host failure aborts
/// registration; solving cannot proceed interactively without the requested
/// watches. Returns the number of watched atoms.
pub fn register_watches(
    spec: &WatchSpec,
    init: &mut dyn PropagateInit,
    host: &dyn HostRuntime,
) -> BridgeResult<usize> {
    let mut watched = 0;
    for atom in init.symbolic_atoms() {
        if !spec.matches(&atom.name) {
            continue;
        }
        let literal = init.solver_literal(atom.literal)?;
        init.add_watch(literal)?;
        init.add_watch(-literal)?;
        host.execute(HostCommand::RegisterWatch {
            literal,
            atom: atom.text,
        })?;
        watched += 1;
    }
    Ok(watched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_token_wins_over_names() {
        let spec = WatchSpec::parse("p q * r");
        assert_eq!(spec, WatchSpec::All);
        assert!(spec.matches("anything"));
    }

    #[test]
    fn names_match_exactly() {
        let spec = WatchSpec::parse("p  edge");
        assert!(spec.matches("p"));
        assert!(spec.matches("edge"));
        assert!(!spec.matches("edges"));
        assert!(!spec.matches("P"));
    }

    #[test]
    fn empty_text_matches_nothing() {
        let spec = WatchSpec::parse("   ");
        assert!(!spec.matches("p"));
    }
}
