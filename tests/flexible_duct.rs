//! 플렉시블 덕트 계산 회귀/성질 테스트.
use assert_approx_eq::assert_approx_eq;
use hvac_duct_calculator::duct::{
    calculate_flexible_duct, compute, friction_factor, BendCounts, FlexDuctInput, Velocity,
};
use proptest::prelude::*;

fn input(length_ft: f64, bends: BendCounts, safety_factor: f64) -> FlexDuctInput {
    FlexDuctInput {
        duct_diameter_in: 6.0,
        air_flow_cfm: 1000.0,
        duct_length_ft: length_ft,
        bend_counts: bends,
        roughness_value: 0.009,
        compression_percent: 0.0,
        safety_factor,
    }
}

#[test]
fn reference_case_matches_hand_calculation() {
    let res = compute(&input(10.0, BendCounts::new(), 1.10));
    assert_approx_eq!(res.details.area_ft2, 0.19635, 1e-5);
    let v = res.velocity.fpm().expect("area is positive");
    assert_approx_eq!(v, 5093.0, 0.05);
    assert_approx_eq!(res.details.reynolds, 8.5 * 6.0 * v, 1e-6);

    // 손계산: f, Pf, 총 손실
    let re = 8.5 * 6.0 * v;
    let arg: f64 = 0.009 / (3.7 * 6.0) + 5.74 / re.powf(0.9);
    let f = 0.25 / arg.log10().powi(2);
    let pf = (12.0 * f * 10.0 / 6.0) * 0.075 * (v / 1097.0).powi(2);
    assert_approx_eq!(res.details.friction_factor, f, 1e-12);
    assert_approx_eq!(res.details.raw_pressure_loss_in_wg, pf, 1e-12);
    assert_approx_eq!(res.total_pressure_loss, pf * 1.10, 1e-12);
    assert_eq!(res.details.safety_factor, 1.10);
    assert_eq!(res.details.total_pressure_loss_in_wg, res.total_pressure_loss);
}

#[test]
fn zero_area_is_not_a_failure() {
    let res = calculate_flexible_duct(0.0, 1000.0, 10.0, &BendCounts::new(), 0.009, 0.0, 1.1);
    assert_eq!(res.velocity, Velocity::UndefinedZeroArea);
    assert_eq!(res.details.friction_factor, 0.0);
    assert!(res.total_pressure_loss.is_finite());
}

#[test]
fn bends_add_equivalent_length() {
    let bends = BendCounts::from_labels([("90", 1), ("45", 2), ("180", 0)]).unwrap();
    let res = compute(&input(10.0, bends, 1.0));
    assert_eq!(res.details.equivalent_length_ft, 40.0);
}

#[test]
fn repeated_calls_are_bit_identical() {
    let i = input(25.0, BendCounts::from_counts(1, 2, 3), 1.15);
    let a = compute(&i);
    let b = compute(&i);
    assert_eq!(a.total_pressure_loss.to_bits(), b.total_pressure_loss.to_bits());
    assert_eq!(a, b);
}

#[test]
fn nonphysical_log_argument_falls_back_to_zero() {
    assert_eq!(friction_factor(0.009, 6.0, 0.0), 0.0);
    assert_eq!(friction_factor(-1.0, 6.0, 1.0e6), 0.0);
    let mut i = input(10.0, BendCounts::new(), 1.1);
    i.roughness_value = -1.0;
    let res = compute(&i);
    assert_eq!(res.details.friction_factor, 0.0);
    assert_eq!(res.total_pressure_loss, 0.0);
}

#[test]
fn compression_raises_loss() {
    let base = compute(&input(10.0, BendCounts::new(), 1.1));
    let mut squeezed = input(10.0, BendCounts::new(), 1.1);
    squeezed.compression_percent = 15.0;
    let res = compute(&squeezed);
    assert!(res.details.pdcf > 1.0);
    assert_approx_eq!(
        res.total_pressure_loss,
        base.total_pressure_loss * res.details.pdcf,
        1e-12
    );
}

proptest! {
    #[test]
    fn loss_increases_with_length(l in 0.0f64..500.0, extra in 0.5f64..100.0) {
        let short = compute(&input(l, BendCounts::new(), 1.1));
        let long = compute(&input(l + extra, BendCounts::new(), 1.1));
        prop_assert!(long.total_pressure_loss > short.total_pressure_loss);
    }

    #[test]
    fn loss_increases_with_each_bend(n45 in 0u32..20, n90 in 0u32..20, n180 in 0u32..20, which in 0usize..3) {
        let before = compute(&input(10.0, BendCounts::from_counts(n45, n90, n180), 1.1));
        let bumped = match which {
            0 => BendCounts::from_counts(n45 + 1, n90, n180),
            1 => BendCounts::from_counts(n45, n90 + 1, n180),
            _ => BendCounts::from_counts(n45, n90, n180 + 1),
        };
        let after = compute(&input(10.0, bumped, 1.1));
        prop_assert!(after.total_pressure_loss > before.total_pressure_loss);
    }

    #[test]
    fn safety_factor_is_a_pure_multiplier(k in 0.01f64..10.0) {
        let one = compute(&input(10.0, BendCounts::from_counts(1, 1, 1), k));
        let two = compute(&input(10.0, BendCounts::from_counts(1, 1, 1), 2.0 * k));
        prop_assert_eq!(two.total_pressure_loss, 2.0 * one.total_pressure_loss);
    }
}
