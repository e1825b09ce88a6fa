// tests/session_integration.rs
//! Integration tests for the session controller against the simulator

use ds8r_core::hal::{DeviceCall, DeviceOperation, DeviceParameters, SimulatedStimulator, StatusCode};
use ds8r_core::hal::simulator::PulseDirection;
use ds8r_core::params::{Mode, Polarity, Source, StimulationConfig};
use ds8r_core::session::{SessionPhase, StimulationSession};
use ds8r_core::StimError;

fn session() -> StimulationSession<SimulatedStimulator> {
    StimulationSession::new(SimulatedStimulator::default())
}

#[test]
fn test_default_run_uploads_then_triggers() {
    let mut s = session();

    let report = s.run(false).expect("default run must succeed");

    assert_eq!(report.upload_status, StatusCode(0));
    assert_eq!(report.trigger_status, StatusCode(0));
    assert!(!report.forced);

    let expected = DeviceParameters::from_array([1, 1, 1, 20, 100, 1, 100, 1]);
    assert_eq!(s.device().calls(), &[DeviceCall::Set(expected), DeviceCall::Trigger]);
    assert_eq!(s.phase(), SessionPhase::Triggered);
}

#[test]
fn test_run_at_limit_succeeds() {
    let mut s = session();
    s.config_mut().demand = 100;

    s.run(false).expect("demand at the limit is allowed");

    assert_eq!(s.device().call_count(DeviceOperation::Set), 1);
    assert_eq!(s.device().call_count(DeviceOperation::Trigger), 1);
    assert_eq!(s.device().uploads()[0].demand, 100);
}

#[test]
fn test_run_above_limit_refused_without_device_calls() {
    let mut s = session();
    s.config_mut().demand = 101;

    let err = s.run(false).unwrap_err();
    match err {
        StimError::InterlockViolation { demand, limit } => {
            assert_eq!(demand, 101);
            assert_eq!(limit, 100);
        }
        other => panic!("Expected interlock violation, got {:?}", other),
    }

    assert!(s.device().calls().is_empty());
    assert_eq!(s.config().demand, 101);
}

#[test]
fn test_forced_run_at_maximum() {
    let mut s = session();
    s.config_mut().demand = 150;

    let report = s.run(true).expect("forced run must succeed");

    assert!(report.forced);
    assert_eq!(s.device().uploads()[0].demand, 150);
    assert_eq!(s.device().delivered_pulses().len(), 1);
}

#[test]
fn test_force_does_not_bypass_domain_validation() {
    let mut s = session();
    s.config_mut().demand = 151;

    let err = s.run(true).unwrap_err();
    assert!(matches!(err, StimError::InvalidParameters(_)));
    assert!(s.device().calls().is_empty());
}

#[test]
fn test_get_state_replaces_local_edits() {
    let resident = DeviceParameters::from_array([2, 3, 2, 75, 400, 20, 50, 0]);
    let mut s = StimulationSession::new(SimulatedStimulator::with_resident(resident));

    s.set_demand(10).expect("lenient setter");
    s.set_pulse_width(900).expect("lenient setter");
    s.set_enabled(true).expect("upload succeeds");
    s.device_mut().clear_history();

    // Local edits after the last upload are discarded by the read-back
    s.config_mut().demand = 33;
    s.config_mut().mode = Mode::Biphasic;

    let state = s.get_state(false).expect("get must succeed");

    let mut uploaded = StimulationConfig::default();
    uploaded.demand = 10;
    uploaded.pulse_width = 900;
    assert_eq!(state, uploaded);
    assert_eq!(*s.config(), uploaded);
    assert_eq!(s.reported_state(), Some(&uploaded));
    assert_eq!(s.device().calls(), &[DeviceCall::Get]);
}

#[test]
fn test_get_state_reads_all_eight_fields() {
    let resident = DeviceParameters::from_array([2, 3, 2, 75, 400, 20, 50, 0]);
    let mut s = StimulationSession::new(SimulatedStimulator::with_resident(resident));

    let state = s.get_state(true).expect("get must succeed");

    assert_eq!(state.mode, Mode::Biphasic);
    assert_eq!(state.polarity, Polarity::Alternating);
    assert_eq!(state.source, Source::External);
    assert_eq!(state.demand, 75);
    assert_eq!(state.pulse_width, 400);
    assert_eq!(state.dwell, 20);
    assert_eq!(state.recovery, 50);
    assert!(!state.enabled);
}

#[test]
fn test_get_state_keeps_out_of_domain_values() {
    let resident = DeviceParameters::from_array([9, 1, 1, 400, 55, 1, 100, 5]);
    let mut s = StimulationSession::new(SimulatedStimulator::with_resident(resident));

    let state = s.get_state(false).expect("get must succeed");

    assert_eq!(state.mode, Mode::Unknown(9));
    assert_eq!(state.demand, 400);
    assert!(state.enabled);

    let report = state.validate().unwrap_err();
    assert_eq!(report.fields(), vec!["mode", "demand", "pulse_width"]);
}

#[test]
fn test_set_enabled_uploads_once_without_trigger() {
    let mut s = session();

    s.set_enabled(false).expect("disable");
    assert!(!s.config().enabled);
    assert_eq!(s.device().calls().len(), 1);
    assert_eq!(s.device().uploads()[0].enabled, 0);

    s.device_mut().clear_history();

    s.set_enabled(true).expect("enable");
    assert!(s.config().enabled);
    assert_eq!(s.device().calls().len(), 1);
    assert_eq!(s.device().uploads()[0].enabled, 1);
    assert_eq!(s.device().call_count(DeviceOperation::Trigger), 0);
}

#[test]
fn test_trigger_without_upload_fires_resident_parameters() {
    let resident = DeviceParameters::from_array([1, 2, 1, 60, 200, 1, 100, 1]);
    let mut s = StimulationSession::new(SimulatedStimulator::with_resident(resident));
    s.config_mut().demand = 5;

    s.trigger_pulse().expect("trigger");

    let pulses = s.device().delivered_pulses();
    assert_eq!(pulses.len(), 1);
    assert_eq!(pulses[0].parameters.demand, 60);
    assert_eq!(pulses[0].direction, PulseDirection::Negative);
    assert_eq!(s.phase(), SessionPhase::Configured);
}

#[test]
fn test_disabled_output_delivers_nothing() {
    let mut s = session();
    s.set_enabled(false).expect("disable");

    s.trigger_pulse().expect("trigger is still invoked");

    assert_eq!(s.device().call_count(DeviceOperation::Trigger), 1);
    assert!(s.device().delivered_pulses().is_empty());
}

#[test]
fn test_alternating_polarity_across_runs() {
    let mut s = session();
    s.set_polarity(Polarity::Alternating).expect("known polarity");

    for _ in 0..3 {
        s.run(false).expect("run");
    }

    let directions: Vec<PulseDirection> =
        s.device().delivered_pulses().iter().map(|p| p.direction).collect();
    assert_eq!(
        directions,
        vec![PulseDirection::Positive, PulseDirection::Negative, PulseDirection::Positive]
    );
}

#[test]
fn test_events_follow_calls() {
    let mut s = session();
    let rx = s.subscribe();

    s.set_enabled(false).expect("disable");
    s.trigger_pulse().expect("trigger");
    s.get_state(false).expect("get");

    let ops: Vec<DeviceOperation> = rx.try_iter().map(|e| e.operation).collect();
    assert_eq!(
        ops,
        vec![DeviceOperation::Set, DeviceOperation::Trigger, DeviceOperation::Get]
    );
}

#[test]
fn test_builder_config_runs() {
    let config = StimulationConfig::builder()
        .mode(Mode::Biphasic)
        .polarity(Polarity::Negative)
        .demand_milliamps(4.5)
        .pulse_width(500)
        .dwell(100)
        .recovery(40)
        .build()
        .expect("valid configuration");

    let mut s = StimulationSession::with_config(SimulatedStimulator::default(), config);
    s.run(false).expect("run");

    assert_eq!(
        s.device().uploads()[0],
        DeviceParameters::from_array([2, 2, 1, 45, 500, 100, 40, 1])
    );
}

#[test]
fn test_sessions_share_serialized_device() {
    use ds8r_core::hal::SerializedDevice;
    use std::thread;

    let shared = SerializedDevice::new(SimulatedStimulator::default());

    let workers: Vec<_> = [20, 40, 60]
        .into_iter()
        .map(|demand| {
            let device = shared.clone();
            thread::spawn(move || {
                let mut s = StimulationSession::new(device);
                s.set_demand(demand).expect("lenient setter");
                for _ in 0..10 {
                    s.run(false).expect("run");
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().expect("session thread panicked");
    }

    shared.with_device(|sim| {
        assert_eq!(sim.call_count(DeviceOperation::Set), 30);
        assert_eq!(sim.call_count(DeviceOperation::Trigger), 30);
    });
}

#[test]
fn test_refused_disable_keeps_local_flag() {
    let resident = DeviceParameters::from_array([1, 1, 1, 400, 100, 1, 100, 1]);
    let mut s = StimulationSession::new(SimulatedStimulator::with_resident(resident));
    s.get_state(false).expect("get must succeed");
    s.device_mut().clear_history();

    let err = s.set_enabled(false).unwrap_err();

    assert!(matches!(err, StimError::InvalidParameters(ref r) if r.fields() == vec!["demand"]));
    assert!(s.config().enabled);
    assert_eq!(s.phase(), SessionPhase::Configured);
    assert_eq!(s.device().call_count(DeviceOperation::Set), 0);
    assert_eq!(s.device().resident_parameters().enabled, 1);
}

#[test]
fn test_failed_enable_upload_keeps_phase() {
    let mut s = session();
    s.run(false).expect("run");
    s.device_mut().fail_next(DeviceOperation::Set);

    assert!(s.set_enabled(false).is_err());

    assert!(s.config().enabled);
    assert_eq!(s.phase(), SessionPhase::Triggered);
}

#[test]
fn test_verbose_only_changes_logging() {
    let resident = DeviceParameters::from_array([2, 3, 2, 75, 400, 20, 50, 0]);
    let mut quiet = StimulationSession::new(SimulatedStimulator::with_resident(resident));
    let mut verbose = StimulationSession::new(SimulatedStimulator::with_resident(resident));

    let quiet_state = quiet.get_state(false).expect("get must succeed");
    let verbose_state = verbose.get_state(true).expect("get must succeed");

    assert_eq!(quiet_state, verbose_state);
    assert_eq!(quiet.config(), verbose.config());
    assert_eq!(quiet.reported_state(), verbose.reported_state());
    assert_eq!(quiet.device().calls(), verbose.device().calls());
    assert_eq!(quiet.phase(), verbose.phase());
    assert_eq!(
        quiet.last_status(DeviceOperation::Get),
        verbose.last_status(DeviceOperation::Get)
    );
}
