//! Property tests for core session behavior.

use std::sync::Arc;

use elendor_core::collision::{CollisionIndex, DEFAULT_COLLISION_THRESHOLD};
use elendor_core::location::{LocationIndex, ZoneTable};
use elendor_core::motion::MotionConfig;
use elendor_core::spawn::SpawnIndex;
use elendor_core::terrain::TerrainIndex;
use elendor_core::{
    Archetype, HitBox, InputIntent, PlayerProfile, Point, RasterMask, Rgb, Session, SessionAssets,
    SessionConfig, Size,
};
use proptest::prelude::*;

const WORLD: u32 = 200;

/// A walled arena: a solid border and a solid block in the middle.
fn arena() -> SessionAssets {
    let collision = RasterMask::from_fn(WORLD, WORLD, |x, y| {
        let border = x < 4 || y < 4 || x >= WORLD - 4 || y >= WORLD - 4;
        let block = (90..110).contains(&x) && (90..110).contains(&y);
        if border || block { Rgb::BLACK } else { Rgb::WHITE }
    });
    SessionAssets {
        world: Size::new(f64::from(WORLD), f64::from(WORLD)),
        collision: CollisionIndex::new(Arc::new(collision), DEFAULT_COLLISION_THRESHOLD),
        spawns: SpawnIndex::from_points(vec![Point::new(20.0, 20.0)], Point::new(20.0, 20.0)),
        locations: LocationIndex::unloaded(ZoneTable::elendor()),
        terrain: TerrainIndex::flat(),
    }
}

fn config() -> SessionConfig {
    SessionConfig::default().with_motion(
        MotionConfig::default()
            .with_sprite(Size::new(10.0, 10.0))
            .with_hit_box(HitBox::new(0.0, 0.0, 10.0, 10.0)),
    )
}

fn intent_strategy() -> impl Strategy<Value = InputIntent> {
    (any::<[bool; 6]>()).prop_map(|[up, down, left, right, sprint_held, sprint_toggle]| {
        InputIntent {
            up,
            down,
            left,
            right,
            sprint_held,
            sprint_toggle,
        }
    })
}

fn script_source(intents: Vec<InputIntent>) -> impl FnMut(u64) -> InputIntent {
    move |tick| {
        let index = usize::try_from(tick.saturating_sub(1)).unwrap_or(usize::MAX);
        intents.get(index).copied().unwrap_or(InputIntent::IDLE)
    }
}

proptest! {
    #[test]
    fn identical_inputs_give_identical_runs(
        intents in prop::collection::vec(intent_strategy(), 1..200),
        frame_ms in 1.0f64..120.0,
    ) {
        let ticks = intents.len() as u64;
        let profile = PlayerProfile::new("Prop", Archetype::Ranger);

        let mut a = Session::start(arena(), config(), profile.clone());
        a.run_ticks(ticks, &mut script_source(intents.clone()));

        let mut b = Session::start(arena(), config(), profile);
        let mut source = script_source(intents);
        while b.tick() < ticks {
            let remaining = (ticks - b.tick()) as f64 * b.tick_ms();
            b.frame(frame_ms.min(remaining), &mut source);
        }

        prop_assert_eq!(a.tick(), b.tick());
        prop_assert_eq!(a.position(), b.position());
        prop_assert_eq!(a.stats(), b.stats());
        prop_assert_eq!(a.game_clock(), b.game_clock());
    }

    #[test]
    fn player_never_enters_walls(
        intents in prop::collection::vec(intent_strategy(), 1..300),
    ) {
        let mut session = Session::start(arena(), config(), PlayerProfile::new("Prop", Archetype::Soldier));
        let collision = session.assets().collision.clone();
        let ticks = intents.len() as u64;
        let mut source = script_source(intents);
        for _ in 0..ticks {
            session.run_ticks(1, &mut source);
            let p = session.position();
            prop_assert!(!collision.is_box_blocked(p.x, p.y, 10.0, 10.0));
            prop_assert!(p.x >= 0.0 && p.x <= f64::from(WORLD) - 10.0);
            prop_assert!(p.y >= 0.0 && p.y <= f64::from(WORLD) - 10.0);
        }
    }

    #[test]
    fn stats_stay_in_range(
        intents in prop::collection::vec(intent_strategy(), 1..400),
    ) {
        let mut session = Session::start(arena(), config(), PlayerProfile::new("Prop", Archetype::Mage));
        let ticks = intents.len() as u64;
        session.run_ticks(ticks, &mut script_source(intents));
        let stats = session.stats();
        prop_assert!(stats.hp() >= 0.0 && stats.hp() <= stats.max_hp());
        prop_assert!(stats.stamina() >= 0.0 && stats.stamina() <= stats.max_stamina());
        prop_assert!(stats.hunger() >= 0.0 && stats.hunger() <= stats.max_hunger());
    }
}
