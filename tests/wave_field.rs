//! Wave field behaviour through the public API: eviction, decay, sampling.

use ripple_engine::sim::{
    DecayModel, EvictionPolicy, NEGLIGIBLE_AMPLITUDE, RippleShape, WaveConfig, WaveField,
};

fn config(capacity: usize, eviction: EvictionPolicy, decay: DecayModel) -> WaveConfig {
    WaveConfig { capacity, eviction, decay, shape: RippleShape::Centre, min_spread: 0.0 }
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

mod sampling {
    use super::*;

    #[test]
    fn centre_height_matches_formula() {
        let decay = DecayModel::Linear { spread_step: 1.999, amplitude_step: 0.01 };
        let mut field = WaveField::new(&config(4, EvictionPolicy::RoundRobin, decay)).unwrap();
        field.inject(5.0, 5.0, 1.0);
        field.advance(1.0 / 60.0);

        let s = field.sources()[0];
        assert!(approx(s.spread(), 2.0));
        let expected = s.spread().sin() * s.amplitude();
        assert!(approx(field.sample(5.0, 5.0), expected));
    }

    #[test]
    fn negligible_sources_are_excluded() {
        let decay = DecayModel::Linear { spread_step: 1.0, amplitude_step: 0.0 };
        let mut field = WaveField::new(&config(2, EvictionPolicy::RoundRobin, decay)).unwrap();
        field.inject(4.0, 4.0, NEGLIGIBLE_AMPLITUDE);
        for _ in 0..3 {
            field.advance(1.0 / 60.0);
        }
        for y in 0..9 {
            for x in 0..9 {
                assert_eq!(field.sample(x as f32, y as f32), 0.0);
            }
        }
    }

    #[test]
    fn cells_outside_the_ring_are_flat() {
        let decay = DecayModel::Linear { spread_step: 1.0, amplitude_step: 0.0 };
        let mut field = WaveField::new(&config(1, EvictionPolicy::RoundRobin, decay)).unwrap();
        field.inject(0.0, 0.0, 1.0);
        field.advance(1.0);
        field.advance(1.0);
        assert_eq!(field.sample(3.0, 0.0), 0.0);
        assert_ne!(field.sample(1.0, 0.0), 0.0);
    }
}

mod decay {
    use super::*;

    #[test]
    fn inverse_spread_thins_to_nothing() {
        let decay = DecayModel::InverseSpread { spread_rate: 30.0 };
        let mut field = WaveField::new(&config(1, EvictionPolicy::WeakestFirst, decay)).unwrap();
        field.inject(0.0, 0.0, 1.0);

        let mut last = field.sources()[0];
        for _ in 0..600 {
            field.advance(1.0 / 60.0);
            let s = field.sources()[0];
            assert!(s.spread() >= last.spread());
            assert!(s.amplitude() <= last.amplitude());
            assert!(s.amplitude() >= 0.0);
            let target = s.start_amplitude() / s.spread().max(1.0);
            assert!((s.target_amplitude() - target).abs() < 1e-6);
            last = s;
        }
        assert!(last.amplitude() < NEGLIGIBLE_AMPLITUDE);
        assert!(!last.is_active());
    }

    #[test]
    fn zero_step_changes_nothing() {
        for decay in [
            DecayModel::Linear { spread_step: 1.0, amplitude_step: 0.01 },
            DecayModel::InverseSpread { spread_rate: 30.0 },
        ] {
            let mut field = WaveField::new(&config(3, EvictionPolicy::RoundRobin, decay)).unwrap();
            field.inject(1.0, 2.0, 0.8);
            field.advance(0.1);
            let snapshot = |field: &WaveField| -> Vec<(f32, f32)> {
                field.sources().iter().map(|s| (s.spread(), s.amplitude())).collect()
            };
            let before = snapshot(&field);
            field.advance(0.0);
            let after = snapshot(&field);
            assert_eq!(before, after);
        }
    }
}

mod eviction {
    use super::*;

    #[test]
    fn round_robin_wraps_after_three() {
        let decay = DecayModel::Linear { spread_step: 1.0, amplitude_step: 0.01 };
        let mut field = WaveField::new(&config(3, EvictionPolicy::RoundRobin, decay)).unwrap();
        let slots: Vec<usize> = (0..4).map(|i| field.inject(i as f32, 0.0, 1.0)).collect();
        assert_eq!(slots, vec![0, 1, 2, 0]);
        assert_eq!(field.eviction().policy(), EvictionPolicy::RoundRobin);
        assert_eq!(field.eviction().cursor(), 1);
        assert_eq!(field.sources()[0].position(), (3.0, 0.0));
    }

    #[test]
    fn weakest_slot_and_only_it_is_overwritten() {
        let decay = DecayModel::InverseSpread { spread_rate: 30.0 };
        let mut field = WaveField::new(&config(4, EvictionPolicy::WeakestFirst, decay)).unwrap();
        for (i, amp) in [0.9, 0.3, 0.7, 0.5].into_iter().enumerate() {
            assert_eq!(field.inject(i as f32, 0.0, amp), i);
        }
        let before = field.sources().to_vec();

        assert_eq!(field.inject(9.0, 9.0, 1.0), 1);
        for (i, (old, new)) in before.iter().zip(field.sources()).enumerate() {
            if i == 1 {
                assert_eq!(new.position(), (9.0, 9.0));
                assert_eq!(new.amplitude(), 1.0);
            } else {
                assert_eq!(old.position(), new.position());
                assert_eq!(old.amplitude(), new.amplitude());
            }
        }
    }

    #[test]
    fn weakest_ties_go_to_the_first() {
        let decay = DecayModel::InverseSpread { spread_rate: 30.0 };
        let mut field = WaveField::new(&config(3, EvictionPolicy::WeakestFirst, decay)).unwrap();
        field.inject(0.0, 0.0, 0.5);
        assert_eq!(field.inject(1.0, 0.0, 0.5), 1);
        assert_eq!(field.inject(2.0, 0.0, 0.5), 2);
        assert_eq!(field.inject(3.0, 0.0, 0.9), 0);
    }
}
