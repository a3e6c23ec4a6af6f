//! Engine ABI types shared between the solving engine and its extensions.
//!
//! This crate defines the protocol boundary between an opaque solving engine
//! (layer 01) and extension code such as the propagator bridge (layer 02),
//! with no bridge-specific dependencies. Engines expose atom enumeration,
//! literal watch registration, and a literal-indexed partial assignment; the
//! search, grounding, and enumeration algorithms behind those hooks are not
//! part of the contract.

use std::fmt;
use std::ops::Neg;

use thiserror::Error;

/// Signed reference to a solver-internal boolean variable.
///
/// The sign encodes polarity: positive means the underlying atom is true.
/// Zero is not a valid literal; the grounder numbers variables from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Lit(i32);

impl Lit {
    /// Wraps a raw solver literal. `raw` must be nonzero.
    pub fn new(raw: i32) -> Self {
        debug_assert_ne!(raw, 0, "literal 0 is reserved by the engine");
        Self(raw)
    }

    /// Raw signed value as supplied by the engine.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Unsigned variable index, ignoring polarity.
    pub fn atom(self) -> u32 {
        self.0.unsigned_abs()
    }

    /// Whether this literal asserts the positive polarity.
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl Neg for Lit {
    type Output = Lit;

    fn neg(self) -> Lit {
        Lit(-self.0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ground atom as enumerated by the engine at propagator initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SymbolicAtom {
    /// Predicate name, without arguments.
    pub name: String,
    /// Human-readable rendering of the full atom, e.g. `edge(1,2)`.
    pub text: String,
    /// Program literal assigned by the grounder.
    pub literal: Lit,
}

/// Ordered partial truth assignment, in the engine's iteration order.
pub type Assignment = Vec<(Lit, bool)>;

/// Complete satisfying assignment reported through the solve event handler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Model {
    /// Literals true in the model.
    pub literals: Vec<Lit>,
}

/// Statistics subset read from the engine after solving completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Conflicts analyzed during search.
    pub conflicts_analyzed: u64,
}

/// Errors surfaced by the engine through the narrow contract.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("parse error: {message}")]
    Parse { message: String },

    #[error("unrecognized option `{token}`")]
    Options { token: String },

    #[error("cannot watch literal {0}: no such solver variable")]
    WatchOutOfRange(Lit),

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("propagator failed: {0}")]
    Propagator(#[source] anyhow::Error),

    #[error("solve event handler failed: {0}")]
    Handler(#[source] anyhow::Error),
}

/// Initialization-time view handed to [`Propagator::init`].
pub trait PropagateInit {
    /// Enumerates every ground atom known to the engine.
    fn symbolic_atoms(&self) -> Vec<SymbolicAtom>;

    /// Maps a program literal to the solver literal backing it.
    fn solver_literal(&self, program_lit: Lit) -> Result<Lit, EngineError>;

    /// Requests notification whenever `lit` becomes determined.
    fn add_watch(&mut self, lit: Lit) -> Result<(), EngineError>;
}

/// Solving-time view handed to propagation callbacks.
pub trait PropagateControl {
    /// Identifier of the engine worker thread invoking the callback.
    fn thread_id(&self) -> u32;

    /// Snapshot of the current partial assignment. Regenerated per call;
    /// callers must not retain it across callbacks.
    fn assignment(&self) -> Assignment;
}

/// Engine extension invoked at defined points during search.
///
/// The engine drives every transition; implementations never choose when a
/// callback fires. `undo` runs during engine state unwinding and therefore
/// must not fail or panic.
pub trait Propagator: Send {
    /// Called once before solving with the full atom enumeration.
    fn init(&mut self, init: &mut dyn PropagateInit) -> anyhow::Result<()>;

    /// Called with each batch of newly implied watched literals.
    fn propagate(&mut self, ctl: &mut dyn PropagateControl, changes: &[Lit]) -> anyhow::Result<()>;

    /// Called with each batch of retracted watched literals. Must not fail.
    fn undo(&mut self, ctl: &dyn PropagateControl, changes: &[Lit]);

    /// Called on total candidate assignments.
    fn check(&mut self, ctl: &mut dyn PropagateControl) -> anyhow::Result<()>;

    /// Asked for the next decision literal. `None` lets the engine choose.
    fn decide(&mut self, thread_id: u32, assignment: &Assignment, fallback: Lit) -> Option<Lit> {
        let _ = (thread_id, assignment, fallback);
        None
    }
}

/// Extension that observes nothing and never interferes with search.
#[derive(Debug, Default)]
pub struct NoopPropagator;

impl Propagator for NoopPropagator {
    fn init(&mut self, _init: &mut dyn PropagateInit) -> anyhow::Result<()> {
        Ok(())
    }

    fn propagate(&mut self, _ctl: &mut dyn PropagateControl, _changes: &[Lit]) -> anyhow::Result<()> {
        Ok(())
    }

    fn undo(&mut self, _ctl: &dyn PropagateControl, _changes: &[Lit]) {}

    fn check(&mut self, _ctl: &mut dyn PropagateControl) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Receiver for solve events.
pub trait SolveEventHandler {
    /// Called once per satisfying assignment. Returning `Ok(false)` stops
    /// enumeration.
    fn on_model(&mut self, model: &Model) -> anyhow::Result<bool>;
}

/// Program source handed to [`Engine::load`].
#[derive(Clone, Copy, Debug)]
pub enum ProgramSource<'a> {
    /// Program text supplied through the conventional standard-input slot.
    Stdin(&'a str),
    /// Named file argument passed through the engine's option parser.
    File(&'a str),
}

/// Narrow surface of the solving engine consumed by the session driver.
pub trait Engine {
    /// Feeds pre-tokenized arguments (program name first) to the engine's own
    /// parser. Returns positional file arguments for the driver to load.
    fn configure(&mut self, args: &[String]) -> Result<Vec<String>, EngineError>;

    /// Loads one program source.
    fn load(&mut self, source: ProgramSource<'_>) -> Result<(), EngineError>;

    /// Grounds the named program part with the given parameters.
    fn ground(&mut self, part: &str, params: &[String]) -> Result<(), EngineError>;

    /// Registers the single propagator for this session. `lock_per_thread`
    /// requests per-worker-thread locking inside the engine.
    fn register_propagator(&mut self, propagator: Box<dyn Propagator>, lock_per_thread: bool);

    /// Runs solving to completion, reporting models through `handler`.
    /// Returns the engine's standard driver exit code.
    fn solve(&mut self, handler: &mut dyn SolveEventHandler) -> Result<i32, EngineError>;

    /// Statistics tree subset, valid after [`Engine::solve`] returns.
    fn statistics(&self) -> RunStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_polarity_round_trip() {
        let lit = Lit::new(7);
        assert!(lit.is_positive());
        assert_eq!((-lit).get(), -7);
        assert_eq!((-lit).atom(), 7);
        assert_eq!(format!("{}", -lit), "-7");
    }

    #[test]
    fn noop_propagator_never_decides() {
        let mut noop = NoopPropagator;
        let assignment = vec![(Lit::new(1), true)];
        assert_eq!(noop.decide(0, &assignment, Lit::new(1)), None);
    }
}
