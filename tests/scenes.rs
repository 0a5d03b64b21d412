//! Whole scenes driven through the recording renderer.

use ripple_engine::config::{FallProfile, GalaxyProfile, GrassProfile, NexusProfile};
use ripple_engine::render::{Command, CommandLog, Encoder, MeshId, ProgramId, TextureId};
use ripple_engine::scene::{
    FallScene, FrameDelay, FrameState, GalaxyScene, GrassScene, NexusScene, Scene, TapKind,
};

fn run<S: Scene>(scene: &mut S, state: &mut FrameState, frames: u32) -> (CommandLog, FrameDelay) {
    let mut log = CommandLog::new();
    let mut delay = FrameDelay::Asap;
    for _ in 0..frames {
        log.clear();
        state.now_ms += 16.0;
        delay = scene.frame(state, &mut log);
    }
    (log, delay)
}

mod fall {
    use super::*;

    #[test]
    fn profiles_pace_differently() {
        let mut classic = FallScene::new(FallProfile::classic(), 480, 800, 1).unwrap();
        let mut drift = FallScene::new(FallProfile::drift(), 480, 800, 1).unwrap();
        let mut state = FrameState::new(480, 800);
        assert_eq!(run(&mut classic, &mut state.clone(), 2).1, FrameDelay::Asap);
        assert_eq!(run(&mut drift, &mut state, 2).1, FrameDelay::Millis(30));
    }

    #[test]
    fn preview_rains_every_frame() {
        let mut scene = FallScene::new(FallProfile::drift(), 320, 480, 5).unwrap();
        let mut state = FrameState::new(320, 480);
        state.preview = true;
        run(&mut scene, &mut state, 6);
        let live = scene.field().sources().iter().filter(|s| s.is_active()).count();
        assert!(live >= 6, "expected a drop per frame, got {live} live sources");
    }

    #[test]
    fn quiet_surface_gets_idle_rain() {
        let mut scene = FallScene::new(FallProfile::classic(), 320, 480, 5).unwrap();
        let mut state = FrameState::new(320, 480);
        // Let the opening drop die out
        run(&mut scene, &mut state, 200);
        assert!(scene.field().total_amplitude() > 0.0);
        assert!(scene.field().sources().iter().all(|s| s.amplitude() <= 1.0));
    }

    #[test]
    fn every_leaf_is_drawn_each_frame() {
        let profile = FallProfile::classic();
        let leaves = profile.leaf_count;
        let mut scene = FallScene::new(profile, 480, 800, 9).unwrap();
        let (log, _) = run(&mut scene, &mut FrameState::new(480, 800), 1);
        let quads = log.commands.iter().filter(|c| matches!(c, Command::Quad(_))).count();
        // Settling leaves add a shadow quad
        assert!(quads >= leaves && quads <= leaves * 2);
        let bind_leaves = Command::BindTexture(ProgramId::Modulate, TextureId::Leaves);
        assert!(log.commands.contains(&bind_leaves));
    }

    #[test]
    fn taps_far_off_screen_are_harmless() {
        let mut scene = FallScene::new(FallProfile::drift(), 480, 800, 2).unwrap();
        let mut state = FrameState::new(480, 800);
        state.push_tap(TapKind::Drop, -5000.0, 9000.0);
        run(&mut scene, &mut state, 3);
        assert!(state.pending_tap().is_none());
    }

    #[test]
    fn height_grid_tracks_the_field() {
        let mut scene = FallScene::new(FallProfile::classic(), 480, 800, 4).unwrap();
        run(&mut scene, &mut FrameState::new(480, 800), 4);
        let (lo, hi) = scene.height_grid().extent();
        assert!(hi > lo);
    }
}

mod nexus {
    use super::*;

    #[test]
    fn pulses_eventually_draw() {
        let mut scene = NexusScene::new(NexusProfile::default(), 480, 800, 0.0, 3).unwrap();
        let mut state = FrameState::new(480, 800);
        // Every pulse starts within the restart delay
        state.now_ms = 2_100.0;
        let (log, delay) = run(&mut scene, &mut state, 1);
        assert_eq!(delay, FrameDelay::Millis(45));
        assert!(!scene.sprites().is_empty());
        let glows = log
            .commands
            .iter()
            .filter(|c| matches!(c, Command::BindTexture(_, TextureId::Glow)))
            .count();
        assert_eq!(glows, scene.sprites().len());
    }

    #[test]
    fn extras_go_dormant_after_crossing() {
        let mut scene = NexusScene::new(NexusProfile::default(), 480, 800, 0.0, 3).unwrap();
        let mut state = FrameState::new(480, 800);
        state.push_tap(TapKind::Tap, 240.0, 400.0);
        run(&mut scene, &mut state, 1);
        let active = |s: &NexusScene| {
            s.pulses().extras().slots().iter().filter(|p| p.active).count()
        };
        assert_eq!(active(&scene), 4);

        // 1.5x speed crosses 960 px well within ten seconds
        state.now_ms += 10_000.0;
        run(&mut scene, &mut state, 1);
        assert_eq!(active(&scene), 0);
    }
}

mod grass {
    use super::*;

    #[test]
    fn blades_are_one_upload() {
        let profile = GrassProfile { blade_count: 40, ..Default::default() };
        let mut scene = GrassScene::new(profile, 480, 800, 8).unwrap();
        let (log, delay) = run(&mut scene, &mut FrameState::new(480, 800), 3);
        assert_eq!(delay, FrameDelay::Asap);
        let uploads = log
            .commands
            .iter()
            .filter(|c| matches!(c, Command::Upload(MeshId::Blades, _)))
            .count();
        assert_eq!(uploads, 1);
    }

    #[test]
    fn resize_replants() {
        let profile = GrassProfile { blade_count: 10, ..Default::default() };
        let mut scene = GrassScene::new(profile, 480, 800, 8).unwrap();
        scene.resize(1080, 1920).unwrap();
        assert_eq!(scene.blades().len(), 10);
        assert!(scene.blades().iter().all(|b| b.x >= 0.0 && b.x <= 1080.0));
    }
}

mod galaxy {
    use super::*;

    #[test]
    fn encoded_stream_covers_every_star() {
        let profile = GalaxyProfile { star_count: 100, ..Default::default() };
        let mut scene = GalaxyScene::new(profile, 480, 800, 1).unwrap();
        let mut out = Encoder::new();
        let delay = scene.frame(&mut FrameState::new(480, 800), &mut out);
        assert_eq!(delay.as_millis(), 1);
        assert_eq!(out.words()[0], 1.0);
        let star_size = std::mem::size_of::<ripple_engine::vertex::StarVertex>();
        assert_eq!(out.uploads_len(), 100 * star_size);
    }

    #[test]
    fn stars_keep_their_orbit_radius() {
        let profile = GalaxyProfile { star_count: 50, ..Default::default() };
        let mut scene = GalaxyScene::new(profile, 480, 800, 1).unwrap();
        let before: Vec<f32> = scene.stars().iter().map(|s| s.distance).collect();
        run(&mut scene, &mut FrameState::new(480, 800), 10);
        let after: Vec<f32> = scene.stars().iter().map(|s| s.distance).collect();
        assert_eq!(before, after);
    }
}
