
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ds8r_core::hal::{DeviceParameters, SimulatedStimulator};
use ds8r_core::params::{validate, Mode, Polarity, StimulationConfig};
use ds8r_core::session::StimulationSession;

const DEMANDS: &[i32] = &[1, 20, 100, 150];

fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let valid = StimulationConfig::builder()
        .mode(Mode::Biphasic)
        .polarity(Polarity::Alternating)
        .demand(80)
        .pulse_width(400)
        .build()
        .expect("valid configuration");

    let invalid = StimulationConfig {
        demand: 0,
        pulse_width: 55,
        dwell: 991,
        recovery: 9,
        ..Default::default()
    };

    group.bench_function("valid_config", |b| b.iter(|| validate(black_box(&valid))));
    group.bench_function("four_violations", |b| b.iter(|| validate(black_box(&invalid))));

    group.bench_function("to_device_parameters", |b| {
        b.iter(|| DeviceParameters::from(black_box(&valid)))
    });

    group.finish();
}

fn benchmark_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    for &demand in DEMANDS {
        group.bench_with_input(BenchmarkId::new("run", demand), &demand, |b, &demand| {
            let mut session = StimulationSession::new(SimulatedStimulator::default());
            session.config_mut().demand = demand;

            b.iter(|| {
                let _ = black_box(session.run(true));
                session.device_mut().clear_history();
            });
        });
    }

    group.bench_function("get_state", |b| {
        let mut session = StimulationSession::new(SimulatedStimulator::default());
        b.iter(|| {
            let _ = black_box(session.get_state(false));
            session.device_mut().clear_history();
        });
    });

    group.bench_function("refused_run", |b| {
        let mut session = StimulationSession::new(SimulatedStimulator::default());
        session.config_mut().demand = 120;
        b.iter(|| black_box(session.run(false)).is_err());
    });

    group.finish();
}

criterion_group!(benches, benchmark_validation, benchmark_session);
criterion_main!(benches);
