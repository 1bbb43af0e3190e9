use nanosim::core::{correct, Colour, Particle};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-10.0f64..10.0)
}

fn offset() -> impl Strategy<Value = [f64; 3]> {
    prop::array::uniform3(-2.0f64..2.0)
}

fn shifted(a: [f64; 3], o: [f64; 3]) -> [f64; 3] {
    [a[0] + o[0], a[1] + o[1], a[2] + o[2]]
}

fn particle(r: [f64; 3], radius: f64) -> Particle {
    Particle::lattice(r, radius, Colour::Olive).expect("valid test particle")
}

proptest! {
    /// Separated spheres are left exactly where they are.
    #[test]
    fn correction_is_noop_when_apart(a in point(), b in point(), r1 in 0.05f64..2.0, r2 in 0.05f64..2.0) {
        let mut moving = particle(a, r1);
        let still = particle(b, r2);
        prop_assume!(moving.distance_to(&still) >= r1 + r2);
        let moved = correct(&mut moving, &still).expect("no contact cannot fail");
        prop_assert!(!moved);
        prop_assert_eq!(moving.r, a);
    }

    /// Overlapping spheres end up exactly touching, pushed directly away.
    #[test]
    fn correction_restores_tangency(a in point(), o in offset(), r1 in 0.5f64..2.0, r2 in 0.5f64..2.0) {
        let b = shifted(a, o);
        let mut moving = particle(a, r1);
        let still = particle(b, r2);
        let d0 = moving.distance_to(&still);
        prop_assume!(d0 > 1e-3 && d0 < r1 + r2);
        let moved = correct(&mut moving, &still).expect("distinct centres");
        prop_assert!(moved);
        prop_assert!((moving.distance_to(&still) - (r1 + r2)).abs() < 1e-9);
        prop_assert_eq!(still.r, b);
        // Displacement is parallel to the original centre offset.
        for k in 0..3 {
            let before = a[k] - b[k];
            let after = moving.r[k] - b[k];
            prop_assert!((after - before * (r1 + r2) / d0).abs() < 1e-9);
        }
    }

    /// Correcting twice changes nothing the second time.
    #[test]
    fn correction_is_idempotent(a in point(), o in offset(), r in 0.05f64..2.0) {
        let b = shifted(a, o);
        let mut moving = particle(a, r);
        let still = particle(b, r);
        prop_assume!(moving.distance_to(&still) > 1e-3);
        correct(&mut moving, &still).expect("distinct centres");
        let once = moving.r;
        correct(&mut moving, &still).expect("distinct centres");
        prop_assert!(once.iter().zip(moving.r.iter()).all(|(x, y)| (x - y).abs() < 1e-9));
    }
}
