//! Structured host commands and their wire rendering.

use engine_abi::Lit;
use std::fmt;

/// Callback kinds with independently configurable wait times.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Propagate,
    Undo,
    Check,
    Decide,
    OnModel,
}

/// One operation executed by the controller runtime.
///
/// Commands are kept structured until the host boundary; serialization
/// happens in [`HostCommand::render`]. An empty `Check` assignment renders a
/// well-formed empty list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCommand {
    /// A watch was registered for `literal`, rendering the watched atom.
    RegisterWatch { literal: Lit, atom: String },
    /// `literal` became implied during propagation.
    Propagate { literal: Lit },
    /// `literal` was retracted during backtracking.
    Undo { literal: Lit },
    /// Full partial assignment as signed literals (negative means false).
    Check { assignment: Vec<Lit> },
    /// Solving started.
    Start,
    /// A satisfying assignment was found. Carries no model content.
    OnModel,
    /// Final statistics, emitted before [`HostCommand::Finish`].
    Stats { conflicts_analyzed: u64 },
    /// Solving finished.
    Finish,
}

impl HostCommand {
    /// Host-side operation name, used in error reports.
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::RegisterWatch { .. } => "interface_register_watch",
            HostCommand::Propagate { .. } => "interface_propagate",
            HostCommand::Undo { .. } => "interface_undo",
            HostCommand::Check { .. } => "interface_check",
            HostCommand::Start => "interface_start",
            HostCommand::OnModel => "interface_on_model",
            HostCommand::Stats { .. } => "num_learned_nogoods",
            HostCommand::Finish => "interface_finish",
        }
    }

    /// Renders the command as the statement executed by the controller
    /// runtime.
    pub fn render(&self) -> String {
        match self {
            HostCommand::RegisterWatch { literal, atom } => format!(
                "interface_register_watch({literal},'{}');",
                escape_single_quoted(atom)
            ),
            HostCommand::Propagate { literal } => format!("interface_propagate({literal});"),
            HostCommand::Undo { literal } => format!("interface_undo({literal});"),
            HostCommand::Check { assignment } => {
                let items: Vec<String> =
                    assignment.iter().map(|lit| format!("'{lit}'")).collect();
                format!("interface_check([{}]);", items.join(","))
            }
            HostCommand::Start => "interface_start();".to_string(),
            HostCommand::OnModel => "interface_on_model();".to_string(),
            HostCommand::Stats { conflicts_analyzed } => {
                format!("num_learned_nogoods = {conflicts_analyzed};")
            }
            HostCommand::Finish => "interface_finish();".to_string(),
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Escapes atom text for embedding in a single-quoted literal.
fn escape_single_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_watch_registration() {
        let cmd = HostCommand::RegisterWatch {
            literal: Lit::new(3),
            atom: "edge(1,2)".to_string(),
        };
        assert_eq!(cmd.render(), "interface_register_watch(3,'edge(1,2)');");
    }

    #[test]
    fn renders_signed_assignment() {
        let cmd = HostCommand::Check {
            assignment: vec![Lit::new(1), Lit::new(-2), Lit::new(5)],
        };
        assert_eq!(cmd.render(), "interface_check(['1','-2','5']);");
    }

    /// Regression: an empty assignment must render a well-formed empty list,
    /// not a truncated payload.
    #[test]
    fn renders_empty_assignment() {
        let cmd = HostCommand::Check { assignment: vec![] };
        assert_eq!(cmd.render(), "interface_check([]);");
    }

    #[test]
    fn escapes_quoted_atom_text() {
        let cmd = HostCommand::RegisterWatch {
            literal: Lit::new(1),
            atom: r#"label('x\y')"#.to_string(),
        };
        assert_eq!(
            cmd.render(),
            r#"interface_register_watch(1,'label(\'x\\y\')');"#
        );
    }

    #[test]
    fn renders_scalar_commands() {
        assert_eq!(HostCommand::Start.render(), "interface_start();");
        assert_eq!(HostCommand::OnModel.render(), "interface_on_model();");
        assert_eq!(HostCommand::Finish.render(), "interface_finish();");
        assert_eq!(
            HostCommand::Stats {
                conflicts_analyzed: 42
            }
            .render(),
            "num_learned_nogoods = 42;"
        );
        assert_eq!(
            HostCommand::Undo {
                literal: Lit::new(-4)
            }
            .render(),
            "interface_undo(-4);"
        );
    }
}
