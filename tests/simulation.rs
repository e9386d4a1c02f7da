use std::path::PathBuf;

use float_cmp::approx_eq;
use mechsim::modal::static_equilibrium;
use mechsim::physics::{mechanical_energy, momentum};
use mechsim::scenario::ScenarioConfig;
use mechsim::{ConfigurationError, MultiMechanicalSystem, SimulationStatus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

/// 結合のない1質点の系
pub fn single_body(m: f64, c: f64, k: f64, x0: f64, v0: f64) -> MultiMechanicalSystem {
    MultiMechanicalSystem::new(&[m], &[c], &[k], &[x0], &[v0], &[], &[]).unwrap()
}

/// 3質点の連鎖
pub fn chained_springs() -> MultiMechanicalSystem {
    MultiMechanicalSystem::new(
        &[1.0, 1.0, 1.0],
        &[0.1, 0.1, 0.1],
        &[2.0, 2.0, 2.0],
        &[1.0, 0.0, -1.0],
        &[0.0, 0.0, 0.0],
        &[(0, 1), (1, 2)],
        &[1.0, 1.0],
    )
    .unwrap()
}

fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

// ==================================================================================
// 時系列の形
// ==================================================================================

#[test_case(10.0, 0.01 ; "chain horizon")]
#[test_case(1.0, 0.1 ; "ten steps")]
#[test_case(1.0, 0.3 ; "horizon not a multiple of step")]
#[test_case(0.05, 0.1 ; "horizon shorter than step")]
#[test_case(3.7, 0.25 ; "quarter steps")]
fn sample_count_and_time_grid(t_end: f64, h: f64) {
    let mut sys = single_body(1.0, 0.2, 3.0, 0.5, -0.1);
    sys.simulate(t_end, h).unwrap();

    let times = sys.trajectory().times();
    let steps = mechsim::system::step_count(t_end, h).unwrap();
    assert_eq!(times.len(), steps + 1);
    assert_eq!(times[0], 0.0);
    assert!(times.windows(2).all(|w| w[1] > w[0]), "時刻が単調増加していない");

    let last = *times.last().unwrap();
    assert!(approx_eq!(f64, last, steps as f64 * h, epsilon = 1e-12));
    assert!(t_end - last < h + 1e-12, "最終時刻が T から1ステップ以上離れている");
    assert!(last <= t_end + 1e-9);
    assert_eq!(sys.status(), SimulationStatus::Simulated);
}

// ==================================================================================
// 解析解との比較
// ==================================================================================

#[test]
fn undamped_single_body_matches_analytic_solution() {
    let (m, k, x0, v0): (f64, f64, f64, f64) = (1.5, 3.0, 0.8, -0.4);
    let omega = (k / m).sqrt();
    let mut sys = single_body(m, 0.0, k, x0, v0);
    sys.simulate(10.0, 0.01).unwrap();

    let traj = sys.trajectory();
    for (t, x) in traj.times().iter().zip(traj.positions()) {
        let exact = x0 * (omega * t).cos() + v0 / omega * (omega * t).sin();
        assert!((x[0] - exact).abs() < 1e-7, "t = {t}: {} != {exact}", x[0]);
    }
}

#[test]
fn global_error_is_fourth_order() {
    let (m, k, x0, v0): (f64, f64, f64, f64) = (1.0, 4.0, 1.0, 0.0);
    let omega = (k / m).sqrt();
    let t_end = 5.0;
    let error = |h: f64| {
        let mut sys = single_body(m, 0.0, k, x0, v0);
        sys.simulate(t_end, h).unwrap();
        let t = sys.time();
        (sys.positions()[0] - (omega * t).cos()).abs()
    };
    let ratio = error(0.05) / error(0.025);
    assert!(ratio > 12.0 && ratio < 20.0, "ratio = {ratio}");
}

#[test]
fn damped_single_body_energy_never_increases() {
    let (m, c, k): (f64, f64, f64) = (1.0, 0.3, 2.0);
    let mut sys = single_body(m, c, k, 1.0, 0.5);
    sys.simulate(20.0, 0.01).unwrap();

    let traj = sys.trajectory();
    let energies = traj
        .positions()
        .iter()
        .zip(traj.velocities())
        .map(|(x, v)| 0.5 * m * v[0] * v[0] + 0.5 * k * x[0] * x[0])
        .collect::<Vec<_>>();
    for (i, w) in energies.windows(2).enumerate() {
        assert!(w[1] <= w[0] + 1e-12, "ステップ {i} でエネルギーが増加: {} -> {}", w[0], w[1]);
    }
    assert!(energies.last().unwrap() < &(0.01 * energies[0]));
}

#[test]
fn undamped_chain_conserves_energy() {
    let mut sys = MultiMechanicalSystem::new(
        &[1.0, 2.0, 0.5],
        &[0.0, 0.0, 0.0],
        &[1.0, 0.5, 2.0],
        &[0.3, -0.2, 0.1],
        &[0.0, 0.4, 0.0],
        &[(0, 1), (1, 2), (0, 2)],
        &[1.0, 0.7, 0.2],
    )
    .unwrap();
    let e0 = sys.energy();
    sys.simulate(10.0, 0.005).unwrap();
    assert!(((sys.energy() - e0) / e0).abs() < 1e-8);
}

// ==================================================================================
// 結合ばねの対称性
// ==================================================================================

#[test]
fn coupled_pair_conserves_position_sum() {
    let mut sys = MultiMechanicalSystem::new(
        &[1.0, 1.0],
        &[0.0, 0.0],
        &[0.0, 0.0],
        &[1.0, -0.25],
        &[0.0, 0.0],
        &[(0, 1)],
        &[3.0],
    )
    .unwrap();
    sys.simulate(10.0, 0.01).unwrap();

    for x in sys.trajectory().positions() {
        assert!((x[0] + x[1] - 0.75).abs() < 1e-10);
    }
}

#[test]
fn unequal_masses_conserve_momentum_and_centre_of_mass_motion() {
    let masses = [1.0, 3.0];
    let mut sys = MultiMechanicalSystem::new(
        &masses,
        &[0.0, 0.0],
        &[0.0, 0.0],
        &[0.6, -0.2],
        &[0.9, 0.1],
        &[(1, 0)],
        &[4.0],
    )
    .unwrap();
    let p0 = momentum(sys.config(), sys.velocities());
    let weighted = |x: &[f64]| masses.iter().zip(x).map(|(m, x)| m * x).sum::<f64>();
    let c0 = weighted(sys.positions());

    sys.simulate(5.0, 0.01).unwrap();
    let traj = sys.trajectory();
    for ((t, x), v) in traj.times().iter().zip(traj.positions()).zip(traj.velocities()) {
        assert!((momentum(sys.config(), v) - p0).abs() < 1e-10);
        assert!((weighted(x) - (c0 + p0 * t)).abs() < 1e-9);
    }
}

// ==================================================================================
// 構成エラー
// ==================================================================================

#[test]
fn rejects_mass_damping_length_mismatch() {
    let err = MultiMechanicalSystem::new(&[1.0, 1.0], &[0.1], &[1.0, 1.0], &[0.0, 0.0], &[0.0, 0.0], &[], &[])
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::LengthMismatch { field: "dampings", .. }));
}

#[test]
fn rejects_coupling_to_index_n() {
    let err = MultiMechanicalSystem::new(
        &[1.0, 1.0, 1.0],
        &[0.0, 0.0, 0.0],
        &[1.0, 1.0, 1.0],
        &[0.0, 0.0, 0.0],
        &[0.0, 0.0, 0.0],
        &[(0, 1), (2, 3)],
        &[1.0, 1.0],
    )
    .unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::CouplingIndexOutOfRange {
            coupling: 1,
            index: 3,
            bodies: 3
        }
    );
}

#[test_case(0.0, 0.01 => matches Err(ConfigurationError::InvalidDuration(_)) ; "zero horizon")]
#[test_case(-5.0, 0.01 => matches Err(ConfigurationError::InvalidDuration(_)) ; "negative horizon")]
#[test_case(10.0, 0.0 => matches Err(ConfigurationError::InvalidStep(_)) ; "zero step")]
#[test_case(10.0, -0.01 => matches Err(ConfigurationError::InvalidStep(_)) ; "negative step")]
fn rejects_bad_simulation_window(t_end: f64, h: f64) -> mechsim::Result<()> {
    let mut sys = chained_springs();
    let result = sys.simulate(t_end, h);
    assert!(sys.trajectory().is_empty());
    assert_eq!(sys.time(), 0.0);
    result
}

// ==================================================================================
// 3質点の連鎖
// ==================================================================================

#[test]
fn chained_springs_end_to_end() {
    let mut sys = chained_springs();
    sys.simulate(10.0, 0.01).unwrap();

    let traj = sys.trajectory();
    assert_eq!(traj.len(), 1001);
    assert!(traj.positions().iter().all(|x| x.len() == 3));
    assert!(traj.positions().iter().flatten().all(|x| x.is_finite()));
    assert!(traj.velocities().iter().flatten().all(|v| v.is_finite()));

    let amplitude = |samples: &[Vec<f64>]| samples.iter().flatten().fold(0.0_f64, |a, x| a.max(x.abs()));
    let early = amplitude(&traj.positions()[..100]);
    let late = amplitude(&traj.positions()[901..]);
    assert!(late < early, "振幅が減衰していない: {early} -> {late}");

    let (x0, v0) = (traj.positions()[0].clone(), traj.velocities()[0].clone());
    let e0 = mechanical_energy(sys.config(), &x0, &v0);
    assert!(sys.energy() < e0);
    assert!(approx_eq!(f64, sys.time(), 10.0, epsilon = 1e-12));
}

#[test]
fn chained_springs_scenario_file_matches_builtin() {
    let scenario = ScenarioConfig::from_yaml_file(scenario_path("chained_springs.yaml")).unwrap();
    assert_eq!(scenario, ScenarioConfig::chained_springs());

    let mut from_file = scenario.build().unwrap();
    from_file.simulate(scenario.simulation.t_end, scenario.simulation.step).unwrap();
    let mut builtin = chained_springs();
    builtin.simulate(10.0, 0.01).unwrap();
    assert_eq!(from_file.trajectory(), builtin.trajectory());
}

#[test]
fn free_pair_scenario_keeps_centre_of_mass() {
    let scenario = ScenarioConfig::from_yaml_file(scenario_path("free_pair.yaml")).unwrap();
    let mut sys = scenario.build().unwrap();
    sys.simulate(scenario.simulation.t_end, scenario.simulation.step).unwrap();

    for x in sys.trajectory().positions() {
        assert!((1.0 * x[0] + 3.0 * x[1]).abs() < 1e-9);
    }
}

// ==================================================================================
// 一定の外力と重力
// ==================================================================================

#[test]
fn forced_body_rests_at_static_equilibrium() {
    let (m, k, f, g): (f64, f64, f64, f64) = (2.0, 5.0, 1.5, -9.8);
    let x_eq = (f + m * g) / k;
    let mut sys = single_body(m, 0.4, k, x_eq, 0.0);
    sys.set_external_forces(&[f]).unwrap();
    sys.set_gravity(&[g]).unwrap();
    sys.simulate(10.0, 0.01).unwrap();

    for x in sys.trajectory().positions() {
        assert!((x[0] - x_eq).abs() < 1e-10, "{} != {x_eq}", x[0]);
    }
}

#[test]
fn undamped_forced_body_conserves_energy() {
    let mut sys = single_body(1.0, 0.0, 3.0, 0.5, 0.0);
    sys.set_external_forces(&[2.0]).unwrap();
    let e0 = sys.energy();
    sys.simulate(10.0, 0.005).unwrap();
    assert!(((sys.energy() - e0) / e0).abs() < 1e-8);
}

#[test]
fn hanging_chain_settles_at_static_equilibrium() {
    let scenario = ScenarioConfig::from_yaml_file(scenario_path("hanging_chain.yaml")).unwrap();
    let mut sys = scenario.build().unwrap();
    let x_eq = static_equilibrium(sys.config()).unwrap();
    sys.simulate(scenario.simulation.t_end, scenario.simulation.step).unwrap();

    for (x, expected) in sys.positions().iter().zip(&x_eq) {
        assert!((x - expected).abs() < 1e-3, "{x} != {expected}");
    }
    assert!(sys.velocities().iter().all(|v| v.abs() < 1e-3));
}

// ==================================================================================
// ランダムな構成
// ==================================================================================

#[test]
fn random_configurations_produce_finite_trajectories() {
    let mut rng = StdRng::seed_from_u64(2024);
    for _ in 0..20 {
        let bodies = rng.random_range(1..6);
        let scenario = ScenarioConfig::random_chain(bodies, &mut rng);
        let mut sys = scenario.build().unwrap();
        let t_end = rng.random_range(0.5..3.0);
        sys.simulate(t_end, 0.01).unwrap();

        let traj = sys.trajectory();
        assert_eq!(traj.len(), mechsim::system::step_count(t_end, 0.01).unwrap() + 1);
        assert_eq!(traj.num_bodies(), bodies);
        assert!(traj.positions().iter().flatten().all(|x| x.is_finite()));
    }
}
