//! Drive a simulated DS8R through a typical session
//!
//! ```text
//! cargo run --example simulated_session
//! RUST_LOG=debug cargo run --example simulated_session
//! ```

use ds8r_core::hal::SimulatedStimulator;
use ds8r_core::params::{Mode, Polarity};
use ds8r_core::session::StimulationSession;
use ds8r_core::StimError;
use std::thread;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), StimError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut session = StimulationSession::new(SimulatedStimulator::default());

    // Print every device call as JSON from another thread
    let events = session.subscribe();
    let printer = thread::spawn(move || {
        for event in events.iter() {
            match event.to_json() {
                Ok(json) => println!("{}", json),
                Err(e) => warn!(error = %e, "failed to encode event"),
            }
        }
    });

    session.run(false)?;

    session.set_mode(Mode::Biphasic)?;
    session.set_polarity(Polarity::Alternating)?;
    session.set_demand(80)?;
    session.set_pulse_width(400)?;
    session.set_dwell(50)?;
    for _ in 0..3 {
        session.run(false)?;
    }

    session.set_demand(124)?;
    match session.run(false) {
        Err(e) if e.is_interlock() => warn!(error = %e, "refused as expected"),
        other => info!(?other, "unexpected interlock outcome"),
    }

    let report = session.run(true)?;
    info!(forced = report.forced, "forced run complete");

    session.set_enabled(false)?;
    let state = session.get_state(true)?;
    info!(enabled = state.enabled, "final device state");

    let pulses = session.device().delivered_pulses().len();
    info!(pulses, "simulator delivered pulses");

    drop(session);
    let _ = printer.join();
    Ok(())
}
