#![cfg(all(test, not(target_arch = "wasm32")))]

use std::thread;
use std::time::Duration;

use bridge::HostCommand;
use engine_mock::FactEngine;
use mock_host::Harness;

/// The engine thread must stay parked at the first suspension point until
/// the controller raises the resume flag, and the command stream must stay
/// observable while it is parked.
#[test]
fn session_suspends_until_controller_resumes() {
    let harness = Harness::new();
    let host = harness.host.clone();
    let signal = harness.signal();
    let resume = harness.resume.clone();
    let commands = harness.commands.clone();

    let worker = thread::spawn(move || {
        let mut engine = FactEngine::new();
        session::run(&mut engine, host, signal, "p.", "", "p")
    });

    // Events up to the first suspension arrive while the worker is parked.
    let timeout = Duration::from_secs(10);
    assert!(matches!(
        commands.recv_timeout(timeout).unwrap(),
        HostCommand::RegisterWatch { .. }
    ));
    assert!(matches!(
        commands.recv_timeout(timeout).unwrap(),
        HostCommand::Start
    ));
    assert!(matches!(
        commands.recv_timeout(timeout).unwrap(),
        HostCommand::Propagate { .. }
    ));

    // The propagate callback emitted its event and is now gated. Give the
    // worker ample time to prove it does not run ahead on its own.
    thread::sleep(Duration::from_millis(300));
    assert!(
        !worker.is_finished(),
        "worker must stay suspended until the controller resumes"
    );

    resume.set(true);
    let code = worker.join().unwrap();
    assert_eq!(code, 0);

    let rest: Vec<HostCommand> = commands.try_iter().collect();
    assert!(rest.contains(&HostCommand::Finish));
}
