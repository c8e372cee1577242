use approx::assert_relative_eq;
use integration_tests::{FOOTHOLDS, LOADS, SPLINE, SWING_FOOT, Walk};
use nalgebra::{DMatrix, DVector};
use strider_core::{Bound, VariableError};

#[test]
fn problem_stacks_every_part() {
    let problem = Walk::default().problem().unwrap();
    let variables = problem.variables();

    // 3 segments · 2 dims · 4 coeffs, 7 samples · 2 feet, 2 feet · 2 dims, 6 nodes · 6
    assert_eq!(variables.optimization_variable_count(), 24 + 14 + 4 + 36);
    assert_eq!(variables.column_offset(LOADS).unwrap(), 24);
    assert_eq!(variables.column_offset(SWING_FOOT).unwrap(), 24 + 14 + 4);

    // dynamics 7 · 2, swing 3 nodes · 4, junctions 2 · 2 derivatives · 2 dims
    assert_eq!(problem.constraint_count(), 14 + 12 + 8);
    assert_eq!(problem.constraint_values().len(), problem.constraint_count());
    assert!(
        problem
            .constraint_bounds()
            .iter()
            .all(|b| *b == Bound::ZERO)
    );

    let bounds = variables.optimization_variable_bounds();
    assert_eq!(bounds[24], Bound::NON_NEGATIVE);
    assert_eq!(bounds[0], Bound::NO_BOUND);

    let names: Vec<_> = problem.constraints().map(|c| c.name().to_owned()).collect();
    assert_eq!(names, ["dynamic com", "swing ee1-motion", "junction com"]);
}

#[test]
fn jacobian_matches_finite_differences() {
    let mut problem = Walk::default().problem().unwrap();
    let x = problem.variables().optimization_variables();
    let jac = DMatrix::from(&problem.jacobian());
    let g = problem.constraint_values();
    let eps = 1e-6;

    assert_eq!(jac.shape(), (g.len(), x.len()));
    for col in 0..x.len() {
        let mut x_eps = x.clone();
        x_eps[col] += eps;
        problem.push_iterate(&x_eps).unwrap();
        let numeric = (problem.constraint_values() - &g) / eps;
        for row in 0..g.len() {
            assert_relative_eq!(
                jac[(row, col)],
                numeric[row],
                epsilon = 1e-4,
                max_relative = 1e-4
            );
        }
    }
}

#[test]
fn blocks_land_in_their_own_columns() {
    let problem = Walk::default().problem().unwrap();
    let variables = problem.variables();
    let jac = problem.jacobian();

    let nodes_start = variables.column_offset(SWING_FOOT).unwrap();
    let footholds_start = variables.column_offset(FOOTHOLDS).unwrap();
    let spline_len = variables.get_variables(SPLINE).unwrap().len();

    for (row, col, _) in jac.triplet_iter() {
        match row {
            // dynamics rows never touch the swing foot
            0..14 => assert!(col < nodes_start),
            // swing rows only touch the swing foot
            14..26 => assert!(col >= nodes_start),
            // junction rows only touch the spline
            _ => assert!(col < spline_len),
        }
    }
    assert!(
        jac.triplet_iter()
            .any(|(row, col, _)| row < 14 && (footholds_start..nodes_start).contains(&col))
    );
}

#[test]
fn iterates_of_the_wrong_length_are_rejected() {
    let mut problem = Walk::default().problem().unwrap();
    let before = problem.constraint_values();

    let err = problem.push_iterate(&DVector::zeros(5)).unwrap_err();
    assert!(matches!(err, VariableError::LengthMismatch { got: 5, .. }));
    assert_eq!(problem.constraint_values(), before);
}

#[test]
fn pushed_iterate_reaches_every_consumer() {
    let mut problem = Walk::default().problem().unwrap();
    let mut x = problem.variables().optimization_variables();
    let offset = problem.variables().column_offset(SWING_FOOT).unwrap();

    // move node 2 of the swing foot in x, the first swing row belongs to node 1
    x[offset + 2 * 6] += 0.1;
    problem.push_iterate(&x).unwrap();

    let g = problem.constraint_values();
    let before = Walk::default().problem().unwrap().constraint_values();
    assert_relative_eq!(g[14] - before[14], -0.05, epsilon = 1e-12);
    assert_eq!(
        problem.component(SWING_FOOT).unwrap().values(),
        x.rows(offset, 36).into_owned()
    );
}

#[test]
fn evaluated_parts_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}

    assert_send_sync::<strider_spline::ComSpline>();
    assert_send_sync::<strider_dynamics::LinearInvertedPendulum>();
    assert_send_sync::<strider_constraints::DynamicConstraint>();
    assert_send_sync::<strider_constraints::SwingConstraint>();
    assert_send_sync::<strider_constraints::SplineJunctionConstraint>();
    assert_send_sync::<strider_core::OptimizationVariables>();
}
