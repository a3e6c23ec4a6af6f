#![cfg(all(test, not(target_arch = "wasm32")))]

use bridge::HostCommand;
use engine_abi::Lit;
use engine_mock::FactEngine;
use mock_host::Harness;

fn run_session(program: &str, options: &str, watched: &str) -> (i32, Vec<HostCommand>) {
    let harness = Harness::new();
    // An always-willing controller: zero waits, resume held high.
    harness.resume.set(true);
    let mut engine = FactEngine::new();
    let code = session::run(
        &mut engine,
        harness.host.clone(),
        harness.signal(),
        program,
        options,
        watched,
    );
    (code, harness.drain())
}

/// The canonical single-fact scenario: one watch registration, the start
/// marker, a check containing the positive literal, one model event, the
/// statistics assignment, and the finish marker, in that order.
#[test]
fn single_fact_session_emits_protocol_in_order() {
    let (code, commands) = run_session("p.", "", "p");
    assert_eq!(code, 0);
    assert_eq!(
        commands,
        vec![
            HostCommand::RegisterWatch {
                literal: Lit::new(1),
                atom: "p".to_string()
            },
            HostCommand::Start,
            HostCommand::Propagate {
                literal: Lit::new(1)
            },
            HostCommand::Check {
                assignment: vec![Lit::new(1)]
            },
            HostCommand::OnModel,
            HostCommand::Stats {
                conflicts_analyzed: 0
            },
            HostCommand::Finish,
        ]
    );
}

#[test]
fn universal_marker_watches_every_fact() {
    let (code, commands) = run_session("q. r(1).", "", "*");
    assert_eq!(code, 0);
    assert_eq!(
        &commands[..3],
        &[
            HostCommand::RegisterWatch {
                literal: Lit::new(1),
                atom: "q".to_string()
            },
            HostCommand::RegisterWatch {
                literal: Lit::new(2),
                atom: "r(1)".to_string()
            },
            HostCommand::Start,
        ]
    );
    assert!(commands.contains(&HostCommand::Check {
        assignment: vec![Lit::new(1), Lit::new(2)]
    }));
}

/// Check events carry the entire assignment, not just watched literals.
#[test]
fn check_includes_unwatched_literals() {
    let (code, commands) = run_session("p. q.", "", "q");
    assert_eq!(code, 0);
    let registrations: Vec<&HostCommand> = commands
        .iter()
        .filter(|cmd| matches!(cmd, HostCommand::RegisterWatch { .. }))
        .collect();
    assert_eq!(
        registrations,
        [&HostCommand::RegisterWatch {
            literal: Lit::new(2),
            atom: "q".to_string()
        }]
    );
    assert!(commands.contains(&HostCommand::Check {
        assignment: vec![Lit::new(1), Lit::new(2)]
    }));
    // Only the watched literal propagates.
    assert!(commands.contains(&HostCommand::Propagate {
        literal: Lit::new(2)
    }));
    assert!(!commands.contains(&HostCommand::Propagate {
        literal: Lit::new(1)
    }));
}

/// An empty program still produces a well-formed zero-element check event.
#[test]
fn empty_program_session_emits_empty_check() {
    let (code, commands) = run_session("", "", "*");
    assert_eq!(code, 0);
    let check = commands
        .iter()
        .find(|cmd| matches!(cmd, HostCommand::Check { .. }))
        .expect("check event present");
    assert_eq!(
        check,
        &HostCommand::Check {
            assignment: Vec::new()
        }
    );
    assert_eq!(check.render(), "interface_check([]);");
}

#[test]
fn statistics_precede_finish() {
    let (_, commands) = run_session("p.", "", "p");
    let stats_idx = commands
        .iter()
        .position(|cmd| matches!(cmd, HostCommand::Stats { .. }))
        .expect("stats emitted");
    let finish_idx = commands
        .iter()
        .position(|cmd| matches!(cmd, HostCommand::Finish))
        .expect("finish emitted");
    assert!(stats_idx < finish_idx);
}
