use fabsim::simulation::cloth::ClothSimulator;
use fabsim::simulation::forces::{
    spring_damper, BendSprings, Force, StructuralShearSprings,
};
use fabsim::simulation::params::Parameters;
use fabsim::simulation::states::{ClothState, NVec3};
use fabsim::{Scenario, ScenarioConfig};

use std::f64::consts::SQRT_2;

/// Default physics parameters for a small test fabric
pub fn test_params(rows: usize, cols: usize) -> Parameters {
    Parameters {
        rows,
        cols,
        dx: 0.5,
        dt: 0.01,
        short_spring: 40.0,
        long_spring: 15.0,
        short_damp: 2.0,
        long_damp: 1.0,
        mass: 1.0,
        gravity: 0.0,
        wind_influence: 0.0,
    }
}

/// Build a sine-perturbed sheet with a deterministic nonuniform velocity
/// field, so damper terms are exercised alongside the springs
pub fn perturbed_state() -> ClothState {
    let mut state = ClothState::flat_grid(6, 7, 0.5);
    for (k, v) in state.velocity.iter_mut().enumerate() {
        let kf = k as f64;
        *v = NVec3::new((kf * 0.37).sin(), (kf * 0.13).cos(), (kf * 0.07).sin());
    }
    state
}

fn net_force(out: &[NVec3]) -> NVec3 {
    out.iter().fold(NVec3::zeros(), |acc, f| acc + f)
}

// ==================================================================================
// Spring primitive tests
// ==================================================================================

#[test]
fn spring_at_rest_length_is_force_free() {
    let pa = NVec3::new(0.0, 0.0, 0.0);
    let pb = NVec3::new(0.75, 0.0, 0.0);
    let zero = NVec3::zeros();

    // Distance exactly equals the rest length, zero relative velocity
    let f = spring_damper(&pa, &pb, &zero, &zero, 0.75, 40.0, 2.0);
    assert_eq!(f, NVec3::zeros(), "rest-length spring must be exactly zero");
}

#[test]
fn stretched_spring_pulls_back_along_the_edge() {
    let pa = NVec3::new(0.0, 0.0, 0.0);
    let pb = NVec3::new(1.0, 0.0, 0.0);
    let zero = NVec3::zeros();

    // Rest length 0.5, so the edge is stretched and a pulls toward b
    let f = spring_damper(&pa, &pb, &zero, &zero, 0.5, 40.0, 2.0);
    assert!(f.x > 0.0, "force on a should point toward b, got {f:?}");
    assert_eq!(f.y, 0.0);
    assert_eq!(f.z, 0.0);
}

#[test]
fn coincident_vertices_contribute_nothing() {
    let p = NVec3::new(1.0, 2.0, 3.0);
    let va = NVec3::new(0.0, 1.0, 0.0);
    let vb = NVec3::new(0.0, -1.0, 0.0);

    // Zero-length edge: the whole pair (spring and damper) is skipped
    let f = spring_damper(&p, &p, &va, &vb, 0.5, 40.0, 2.0);
    assert_eq!(f, NVec3::zeros());
}

// ==================================================================================
// Force conservation tests
// ==================================================================================

#[test]
fn short_springs_conserve_momentum() {
    let state = perturbed_state();
    let term = StructuralShearSprings {
        stiffness: 40.0,
        damping: 2.0,
        dx: 0.5,
    };

    let mut out = vec![NVec3::zeros(); state.vertex_count()];
    term.accumulate(&NVec3::zeros(), &state, &mut out);

    let net = net_force(&out);
    assert!(
        net.norm() < 1e-9,
        "net structural/shear force not zero: {net:?}"
    );
}

#[test]
fn bend_springs_conserve_momentum() {
    let state = perturbed_state();
    let term = BendSprings {
        stiffness: 15.0,
        damping: 1.0,
        dx: 0.5,
    };

    let mut out = vec![NVec3::zeros(); state.vertex_count()];
    term.accumulate(&NVec3::zeros(), &state, &mut out);

    let net = net_force(&out);
    assert!(net.norm() < 1e-9, "net bend force not zero: {net:?}");
}

// ==================================================================================
// Accessor / topology tests
// ==================================================================================

#[test]
fn counts_and_extents() {
    let mut params = test_params(4, 5);
    params.dx = 0.3;
    let sim = ClothSimulator::new(params).unwrap();

    assert_eq!(sim.row_count(), 4);
    assert_eq!(sim.column_count(), 5);
    assert_eq!(sim.vertex_count(), 20);
    assert_eq!(sim.triangle_count(), 24);
    assert!((sim.width() - 4.0 * 0.3).abs() < 1e-12);
    assert!((sim.depth() - 3.0 * 0.3).abs() < 1e-12);
}

#[test]
#[should_panic]
fn out_of_range_accessor_panics() {
    let sim = ClothSimulator::new(test_params(2, 2)).unwrap();
    let _ = sim.position(4);
}

#[test]
fn invalid_configurations_are_rejected() {
    let mut p = test_params(1, 5);
    assert!(ClothSimulator::new(p.clone()).is_err(), "rows < 2");

    p = test_params(4, 5);
    p.dx = 0.0;
    assert!(ClothSimulator::new(p.clone()).is_err(), "dx = 0");

    p = test_params(4, 5);
    p.dt = -0.01;
    assert!(ClothSimulator::new(p.clone()).is_err(), "dt < 0");

    p = test_params(4, 5);
    p.mass = 0.0;
    assert!(ClothSimulator::new(p.clone()).is_err(), "mass = 0");

    p = test_params(4, 5);
    p.short_spring = f64::NAN;
    assert!(ClothSimulator::new(p).is_err(), "NaN stiffness");
}

// ==================================================================================
// Update clock tests
// ==================================================================================

#[test]
fn sub_dt_updates_leave_state_untouched() {
    let mut params = test_params(4, 5);
    params.gravity = -9.81;
    let mut sim = ClothSimulator::new(params).unwrap();

    let positions = sim.positions().to_vec();
    let velocities = sim.state().velocity.clone();
    let normals = sim.normals().to_vec();

    // 3 x 0.003 s accumulates to 0.009 s, still below dt = 0.01 s
    for _ in 0..3 {
        sim.update(0.003, NVec3::zeros());
    }
    assert_eq!(sim.positions(), &positions[..], "positions mutated early");
    assert_eq!(sim.state().velocity, velocities, "velocities mutated early");
    assert_eq!(sim.normals(), &normals[..], "normals mutated early");

    // The fourth call crosses dt and must run a real step
    sim.update(0.003, NVec3::zeros());
    assert_ne!(sim.positions(), &positions[..], "step never executed");
}

#[test]
fn leftover_time_is_discarded() {
    let mut params = test_params(4, 5);
    params.gravity = -9.81;

    let mut a = ClothSimulator::new(params.clone()).unwrap();
    let mut b = ClothSimulator::new(params).unwrap();

    // One oversized frame vs one exact frame: both run exactly one step
    a.update(0.025, NVec3::zeros());
    b.update(0.01, NVec3::zeros());
    assert_eq!(a.positions(), b.positions());

    // The 0.015 s left over was discarded, so this stays below dt
    a.update(0.004, NVec3::zeros());
    assert_eq!(a.positions(), b.positions());
}

// ==================================================================================
// Step behaviour tests
// ==================================================================================

#[test]
fn boundary_frames_copy_the_adjacent_interior() {
    let mut params = test_params(5, 6);
    params.gravity = -9.81;
    params.wind_influence = 0.8;
    let mut sim = ClothSimulator::new(params).unwrap();

    let wind = NVec3::new(1.0, 0.0, 0.5);
    for _ in 0..10 {
        sim.update(0.01, wind);

        let m = sim.row_count();
        let n = sim.column_count();
        for j in 0..m {
            assert_eq!(
                sim.normal(j * n + n - 1),
                sim.normal(j * n + n - 2),
                "last-column normal differs in row {j}"
            );
        }
        for i in 0..n {
            assert_eq!(
                sim.normal((m - 1) * n + i),
                sim.normal((m - 2) * n + i),
                "last-row normal differs in column {i}"
            );
        }
    }
}

#[test]
fn flat_minimal_grid_stays_in_equilibrium() {
    let mut sim = ClothSimulator::new(test_params(2, 2)).unwrap();

    // Flatten the construction-time sine perturbation so every edge starts
    // exactly at its rest length
    {
        let state = sim.state_mut();
        for p in state.curr_pos.iter_mut() {
            p.y = 0.0;
        }
        for p in state.prev_pos.iter_mut() {
            p.y = 0.0;
        }
    }
    let initial = sim.positions().to_vec();

    for _ in 0..2000 {
        sim.update(0.01, NVec3::zeros());
    }

    for (k, (p, q)) in sim.positions().iter().zip(&initial).enumerate() {
        assert!(
            (p - q).norm() < 1e-9,
            "vertex {k} drifted from rest: {p:?} vs {q:?}"
        );
    }
}

#[test]
fn perturbed_minimal_grid_does_not_gain_energy() {
    let mut sim = ClothSimulator::new(test_params(2, 2)).unwrap();

    let max_height = |sim: &ClothSimulator| {
        sim.positions()
            .iter()
            .map(|p| p.y.abs())
            .fold(0.0f64, f64::max)
    };
    let initial_amplitude = max_height(&sim);
    assert!(initial_amplitude > 0.0, "sheet should start perturbed");

    for _ in 0..20_000 {
        sim.update(0.01, NVec3::zeros());
    }

    for p in sim.positions() {
        assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
    }
    assert!(
        max_height(&sim) <= initial_amplitude * 1.5,
        "amplitude grew: {} -> {}",
        initial_amplitude,
        max_height(&sim)
    );
}

#[test]
fn cloth_falls_under_gravity() {
    let mut params = test_params(4, 5);
    params.gravity = -9.81;
    let mut sim = ClothSimulator::new(params).unwrap();

    let mean_y = |sim: &ClothSimulator| {
        sim.positions().iter().map(|p| p.y).sum::<f64>() / sim.vertex_count() as f64
    };
    let before = mean_y(&sim);

    for _ in 0..100 {
        sim.update(0.01, NVec3::zeros());
    }

    assert!(
        mean_y(&sim) < before - 0.01,
        "sheet did not fall: {before} -> {}",
        mean_y(&sim)
    );
}

#[test]
fn vertical_wind_lifts_the_sheet() {
    let mut params = test_params(4, 5);
    params.wind_influence = 1.0;
    let mut sim = ClothSimulator::new(params).unwrap();

    let mean_y = |sim: &ClothSimulator| {
        sim.positions().iter().map(|p| p.y).sum::<f64>() / sim.vertex_count() as f64
    };
    let before = mean_y(&sim);

    // Up-facing normals take the full brunt of an upward wind
    let wind = NVec3::new(0.0, 5.0, 0.0);
    for _ in 0..50 {
        sim.update(0.01, wind);
    }

    assert!(
        mean_y(&sim) > before + 1e-3,
        "sheet was not lifted: {before} -> {}",
        mean_y(&sim)
    );
}

#[test]
fn coincident_vertices_keep_the_step_finite() {
    let mut sim = ClothSimulator::new(test_params(3, 3)).unwrap();

    // Collapse one structural edge onto a single point
    {
        let state = sim.state_mut();
        let a = state.idx(0, 0);
        let b = state.idx(0, 1);
        state.curr_pos[b] = state.curr_pos[a];
        state.prev_pos[b] = state.prev_pos[a];
    }

    for _ in 0..20 {
        sim.update(0.01, NVec3::zeros());
    }

    for p in sim.positions() {
        assert!(
            p.x.is_finite() && p.y.is_finite() && p.z.is_finite(),
            "NaN leaked out of a degenerate edge: {p:?}"
        );
    }
    for n in sim.normals() {
        assert!(n.x.is_finite() && n.y.is_finite() && n.z.is_finite());
    }
}

#[test]
fn shear_rest_length_uses_sqrt_two() {
    // A flat grid has diagonals at exactly sqrt(2) * dx, so shear springs
    // must be silent on it
    let mut state = ClothState::flat_grid(3, 3, 0.5);
    for p in state.curr_pos.iter_mut() {
        p.y = 0.0;
    }

    let term = StructuralShearSprings {
        stiffness: 40.0,
        damping: 2.0,
        dx: 0.5,
    };
    let mut out = vec![NVec3::zeros(); state.vertex_count()];
    term.accumulate(&NVec3::zeros(), &state, &mut out);

    for (k, f) in out.iter().enumerate() {
        assert!(
            f.norm() < 1e-12,
            "flat sheet should be force-free, vertex {k} got {f:?}"
        );
    }

    // And a diagonal stretched past sqrt(2) * dx pulls back
    let zero = NVec3::zeros();
    let f = spring_damper(
        &NVec3::new(0.0, 0.0, 0.0),
        &NVec3::new(1.0, 0.0, 1.0),
        &zero,
        &zero,
        SQRT_2 * 0.5,
        40.0,
        2.0,
    );
    assert!(f.x > 0.0 && f.z > 0.0);
}

// ==================================================================================
// Scenario / configuration tests
// ==================================================================================

#[test]
fn yaml_scenario_builds_a_simulator() {
    let yaml = r#"
grid:
  rows: 8
  cols: 6
parameters:
  dx: 0.25
  dt: 0.001
  short_spring: 400.0
  long_spring: 150.0
  short_damp: 2.0
  long_damp: 1.0
  mass: 0.5
  gravity: -9.81
  wind_influence: 0.8
run:
  frame_dt: 0.016
  t_end: 1.0
  wind: [4.0, 0.0, 1.5]
"#;

    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();

    assert_eq!(scenario.simulator.vertex_count(), 48);
    assert_eq!(scenario.simulator.triangle_count(), 70);
    assert_eq!(scenario.wind, NVec3::new(4.0, 0.0, 1.5));
}

#[test]
fn malformed_scenarios_are_rejected() {
    let yaml = r#"
grid:
  rows: 8
  cols: 6
parameters:
  dx: 0.25
  dt: 0.001
  short_spring: 400.0
  long_spring: 150.0
  short_damp: 2.0
  long_damp: 1.0
  mass: 0.5
  gravity: -9.81
  wind_influence: 0.8
run:
  frame_dt: 0.016
  t_end: 1.0
  wind: [4.0, 0.0]
"#;

    let cfg: ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    assert!(Scenario::build_scenario(cfg).is_err(), "2-component wind");
}
