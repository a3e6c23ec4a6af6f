//! Fact-program engine implementing the engine ABI.
//!
//! `FactEngine` grounds programs consisting solely of facts and drives a
//! registered propagator through the same callback sequence a full engine
//! would use for such a program: `init`, one `propagate` batch covering the
//! watched literals, one `check` over the total assignment, and one model
//! event. It exists so the bridge and session layers can be exercised
//! end-to-end without a real solving engine; production deployments bind a
//! real engine behind the same [`Engine`] trait.

mod program;

use engine_abi::{
    Assignment, Engine, EngineError, Lit, Model, ProgramSource, PropagateControl, PropagateInit,
    Propagator, RunStats, SolveEventHandler, SymbolicAtom,
};
use log::debug;
use smallvec::SmallVec;

use crate::program::parse_facts;

/// Initialization context over a fixed atom table.
///
/// Program literals and solver literals coincide in this engine. Also usable
/// directly by extension tests that need a standalone init view.
#[derive(Debug, Default)]
pub struct StaticInit {
    /// Atom table exposed to the propagator.
    pub atoms: Vec<SymbolicAtom>,
    /// Watch requests received, in call order, polarities included.
    pub watches: Vec<Lit>,
}

impl StaticInit {
    pub fn new(atoms: Vec<SymbolicAtom>) -> Self {
        Self {
            atoms,
            watches: Vec::new(),
        }
    }

    fn check_range(&self, lit: Lit) -> Result<(), EngineError> {
        if lit.atom() as usize > self.atoms.len() {
            return Err(EngineError::WatchOutOfRange(lit));
        }
        Ok(())
    }

    /// Watched variable indices, deduplicated, in first-watch order.
    pub fn watched_atoms(&self) -> Vec<u32> {
        let mut seen = Vec::new();
        for watch in &self.watches {
            let atom = watch.atom();
            if !seen.contains(&atom) {
                seen.push(atom);
            }
        }
        seen
    }
}

impl PropagateInit for StaticInit {
    fn symbolic_atoms(&self) -> Vec<SymbolicAtom> {
        self.atoms.clone()
    }

    fn solver_literal(&self, program_lit: Lit) -> Result<Lit, EngineError> {
        self.check_range(program_lit)?;
        Ok(program_lit)
    }

    fn add_watch(&mut self, lit: Lit) -> Result<(), EngineError> {
        self.check_range(lit)?;
        self.watches.push(lit);
        Ok(())
    }
}

/// Propagation context over a fixed assignment snapshot.
#[derive(Clone, Debug, Default)]
pub struct StaticControl {
    /// Assignment returned to the propagator, in iteration order.
    pub assignment: Assignment,
    /// Worker thread id reported to callbacks.
    pub thread: u32,
}

impl StaticControl {
    pub fn new(assignment: Assignment) -> Self {
        Self {
            assignment,
            thread: 0,
        }
    }
}

impl PropagateControl for StaticControl {
    fn thread_id(&self) -> u32 {
        self.thread
    }

    fn assignment(&self) -> Assignment {
        self.assignment.clone()
    }
}

struct RegisteredPropagator {
    propagator: Box<dyn Propagator>,
    lock_per_thread: bool,
}

/// Minimal engine over fact programs.
#[derive(Default)]
pub struct FactEngine {
    program: String,
    atoms: Vec<SymbolicAtom>,
    propagator: Option<RegisteredPropagator>,
    max_models: Option<u64>,
    stats: RunStats,
}

impl std::fmt::Debug for FactEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactEngine")
            .field("program", &self.program)
            .field("atoms", &self.atoms)
            .field("propagator", &self.propagator.is_some())
            .field("max_models", &self.max_models)
            .field("stats", &self.stats)
            .finish()
    }
}

impl FactEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ground atoms, valid after [`Engine::ground`].
    pub fn atoms(&self) -> &[SymbolicAtom] {
        &self.atoms
    }

    /// Model limit parsed from `-n` / `--models`, if any.
    pub fn max_models(&self) -> Option<u64> {
        self.max_models
    }

    /// Whether the registered propagator asked for per-thread locking.
    pub fn propagator_lock(&self) -> Option<bool> {
        self.propagator.as_ref().map(|r| r.lock_per_thread)
    }

    fn parse_model_count(token: &str, value: Option<&str>) -> Result<u64, EngineError> {
        value
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| EngineError::Options {
                token: token.to_string(),
            })
    }
}

impl Engine for FactEngine {
    fn configure(&mut self, args: &[String]) -> Result<Vec<String>, EngineError> {
        let mut files = Vec::new();
        // First token is the fixed program name.
        let mut iter = args.iter().skip(1);
        while let Some(token) = iter.next() {
            match token.as_str() {
                "-n" | "--models" => {
                    let value = iter.next();
                    self.max_models =
                        Some(Self::parse_model_count(token, value.map(String::as_str))?);
                }
                t if t.starts_with("--models=") => {
                    let value = t.split_once('=').map(|(_, v)| v);
                    self.max_models = Some(Self::parse_model_count(t, value)?);
                }
                t if t.starts_with('-') && t.len() > 1 => {
                    return Err(EngineError::Options {
                        token: t.to_string(),
                    });
                }
                _ => files.push(token.clone()),
            }
        }
        Ok(files)
    }

    fn load(&mut self, source: ProgramSource<'_>) -> Result<(), EngineError> {
        match source {
            ProgramSource::Stdin(text) => {
                self.program.push_str(text);
                Ok(())
            }
            ProgramSource::File(_) => Err(EngineError::Unsupported("file program sources")),
        }
    }

    fn ground(&mut self, part: &str, _params: &[String]) -> Result<(), EngineError> {
        if part != "base" {
            return Err(EngineError::Unsupported("non-base program parts"));
        }
        let facts = parse_facts(&self.program)?;
        self.atoms = facts
            .into_iter()
            .enumerate()
            .map(|(idx, fact)| SymbolicAtom {
                name: fact.name,
                text: fact.text,
                literal: Lit::new(idx as i32 + 1),
            })
            .collect();
        debug!("grounded {} atoms", self.atoms.len());
        Ok(())
    }

    fn register_propagator(&mut self, propagator: Box<dyn Propagator>, lock_per_thread: bool) {
        self.propagator = Some(RegisteredPropagator {
            propagator,
            lock_per_thread,
        });
    }

    fn solve(&mut self, handler: &mut dyn SolveEventHandler) -> Result<i32, EngineError> {
        let assignment: Assignment = self.atoms.iter().map(|a| (a.literal, true)).collect();

        if let Some(registered) = self.propagator.as_mut() {
            let mut init = StaticInit::new(self.atoms.clone());
            registered
                .propagator
                .init(&mut init)
                .map_err(EngineError::Propagator)?;

            // Facts become implied in one batch, in literal order, restricted
            // to watched variables.
            let watched = init.watched_atoms();
            let changes: SmallVec<[Lit; 8]> = self
                .atoms
                .iter()
                .map(|a| a.literal)
                .filter(|lit| watched.contains(&lit.atom()))
                .collect();

            let mut ctl = StaticControl::new(assignment.clone());
            if !changes.is_empty() {
                registered
                    .propagator
                    .propagate(&mut ctl, &changes)
                    .map_err(EngineError::Propagator)?;
            }
            registered
                .propagator
                .check(&mut ctl)
                .map_err(EngineError::Propagator)?;
        }

        let model = Model {
            literals: self.atoms.iter().map(|a| a.literal).collect(),
        };
        handler.on_model(&model).map_err(EngineError::Handler)?;

        // Fact programs never conflict.
        self.stats = RunStats {
            conflicts_analyzed: 0,
        };
        Ok(0)
    }

    fn statistics(&self) -> RunStats {
        self.stats
    }
}
