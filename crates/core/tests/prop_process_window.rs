//! Property-based tests for the process-window models using proptest.
//!
//! Covers: cross-section area and perimeter positivity, monotone E(J), J_LOC ≥ J_ss, the
//! coherence-length identity, onset bisection accuracy and the Knudsen cut-off.

use flash_window_core::core_types::{area_and_perimeter, Kelvin};
use flash_window_core::physics::flash_threshold::BISECTION_LOWER_BOUND;
use flash_window_core::physics::{
    churchill_chu_nusselt, coherence_length_um, convection_state, field_at,
    find_onset_current_density, flash_threshold, FieldCurve, GasRegime,
};
use flash_window_core::{
    evaluate, Environment, GasAtmosphere, GasMixture, GeometrySpec, MaterialDatabase,
    ProcessParameters, Specimen, Torr,
};
use proptest::prelude::*;

fn any_shape() -> impl Strategy<Value = GeometrySpec> {
    prop_oneof![
        (0.1f64..1000.0, 0.01f64..20.0).prop_map(|(thickness_um, width_mm)| {
            GeometrySpec::Foil {
                thickness_um,
                width_mm,
            }
        }),
        (0.1f64..2000.0).prop_map(|diameter_um| GeometrySpec::Wire { diameter_um }),
        (0.0f64..10.0, 0.1f64..1000.0).prop_map(|(inner_diameter_mm, wall_thickness_um)| {
            GeometrySpec::Tube {
                inner_diameter_mm,
                wall_thickness_um,
            }
        }),
    ]
}

fn builtin_key() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["Ti", "Ni", "Pt", "Fe", "W", "Cu", "Al", "Re"])
}

// ── Geometry ─────────────────────────────────────────────────────────

proptest! {
    /// Every shape with positive dimensions has a positive area and perimeter.
    #[test]
    fn area_and_perimeter_are_positive(shape in any_shape()) {
        let (area, perimeter) = area_and_perimeter(&shape);
        prop_assert!(area > 0.0, "area = {}", area);
        prop_assert!(perimeter > 0.0, "perimeter = {}", perimeter);
    }
}

// ── Field curve and flash threshold ──────────────────────────────────

proptest! {
    /// E(J) never decreases along the sampled curve.
    #[test]
    fn field_curve_is_monotone(
        key in builtin_key(),
        j_loc in 0.5f64..500.0,
        samples in 2usize..200,
    ) {
        let db = MaterialDatabase::builtin();
        let material = db.get(key).expect("built-in key");
        let curve = FieldCurve::new(material, j_loc, samples);
        let fields: Vec<f64> = curve.iter().map(|s| s.e).collect();
        prop_assert!(!fields.is_empty());
        for w in fields.windows(2) {
            prop_assert!(w[1] >= w[0], "E dropped from {} to {}", w[0], w[1]);
        }
    }

    /// r·E_flash recovers the voltivity for any gauge long enough to clear the r floor.
    #[test]
    fn coherence_length_identity(voltivity in 100.0f64..2000.0, gauge_mm in 0.02f64..100.0) {
        let r = coherence_length_um(gauge_mm);
        let product = r * flash_threshold(voltivity, gauge_mm);
        prop_assert!((product - voltivity).abs() < 1e-9 * voltivity);
    }

    /// The onset is either 0 or a point where E(J) meets E_flash within 1e-3 V/cm.
    #[test]
    fn onset_bisection_accuracy(
        key in builtin_key(),
        j_loc in 1.0f64..500.0,
        e_flash in 0.01f64..3.0,
    ) {
        let db = MaterialDatabase::builtin();
        let material = db.get(key).expect("built-in key");
        let j = find_onset_current_density(material, j_loc, e_flash);
        prop_assert!((0.0..=j_loc).contains(&j));
        if j > 0.0 && field_at(material, BISECTION_LOWER_BOUND, j_loc) < e_flash {
            prop_assert!((field_at(material, j, j_loc) - e_flash).abs() < 1e-3);
        }
    }
}

// ── Steady state ─────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// J_LOC never falls below J_ss, for any geometry, ramp and fixed h.
    #[test]
    fn loc_at_least_steady_state(
        key in builtin_key(),
        shape in any_shape(),
        gauge in 1.0f64..50.0,
        ramp in 1.0f64..10_000.0,
        h in 0.0f64..200.0,
    ) {
        let db = MaterialDatabase::builtin();
        let params = ProcessParameters::default()
            .with_ramp_rate(ramp)
            .with_environment(Environment::Fixed { h });
        let r = evaluate(&db, key, &Specimen::new(shape, gauge), &params).expect("built-in key");
        prop_assert!(r.j_loc >= r.j_ss, "J_LOC {} < J_ss {}", r.j_loc, r.j_ss);
        prop_assert!(r.j_flash >= 0.0 && r.j_flash <= r.j_loc);
        prop_assert!((0.0..=100.0).contains(&r.flash_window_percent));
    }
}

// ── Gas convection ───────────────────────────────────────────────────

proptest! {
    /// Past Kn = 0.1 the convective coefficient is exactly zero; in the continuum
    /// regime it is the unmodified Churchill–Chu value.
    #[test]
    fn knudsen_cut_off(
        torr in 1e-6f64..760.0,
        diameter_um in 10.0f64..5000.0,
        surface in 400.0f64..3000.0,
    ) {
        let atm = GasAtmosphere::new(GasMixture::argon(), Torr::new(torr));
        let d = diameter_um * 1e-6;
        let state = convection_state(&atm, Kelvin::new(surface), d);
        match state.regime {
            GasRegime::FreeMolecular => prop_assert_eq!(state.h_conv, 0.0),
            GasRegime::Continuum => {
                let film = Kelvin::new(0.5 * (surface + 300.0));
                let k = atm.mixture.properties_at(film).conductivity;
                let expected = state.nusselt * k / d;
                prop_assert!((state.h_conv - expected).abs() <= 1e-9 * expected);
                let prandtl = atm.mixture.properties_at(film).prandtl();
                prop_assert_eq!(state.nusselt, churchill_chu_nusselt(state.rayleigh, prandtl));
            }
            GasRegime::Slip => prop_assert!(state.h_conv > 0.0),
        }
    }
}
