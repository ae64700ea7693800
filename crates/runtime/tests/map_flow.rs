//! Exploration behavior: encounter triggers, teleports, shops, and
//! battle-return bookkeeping.

use jrpg_content::{EnglishStrings, NpcRegistry, WorldAtlas};
use jrpg_core::{
    BattleOutcome, BattleRewards, EncounterId, Env, GameConfig, GameEnv, MapId, PcgRng, WorldKind,
};
use jrpg_runtime::settings::MemorySettings;
use jrpg_runtime::{
    BattleCallback, Button, Callback, EngineEvent, EventBus, InputEvent, MapArgs, MapState,
    Session, State, StateContext, StateSnapshot, StateTarget,
};

struct Fixture {
    bus: EventBus,
    session: Session,
}

impl Fixture {
    fn new() -> Self {
        Self {
            bus: EventBus::new(),
            session: Session::new_game(GameConfig::default(), 7),
        }
    }
}

fn map_args(map: &str, world: WorldKind, x: i32, y: i32) -> MapArgs {
    MapArgs {
        map: MapId::new(map),
        world,
        x,
        y,
    }
}

macro_rules! with_env {
    ($env:ident) => {
        let (atlas, strings, settings, npcs, rng) = (
            WorldAtlas::new(),
            EnglishStrings::new(),
            MemorySettings::new(),
            NpcRegistry::new(),
            PcgRng,
        );
        let $env: GameEnv<'_> = Env::with_all(&atlas, &strings, &settings, &npcs, &rng);
    };
}

#[test]
fn walking_into_an_encounter_requests_a_battle() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    // Just west of the first cave encounter at (352, 256).
    let mut map = MapState::new(&map_args("cave", WorldKind::Localworld, 300, 256), &ctx).unwrap();
    map.handle_input(&InputEvent::Press(Button::Right), &mut ctx);
    for _ in 0..5 {
        map.update(100, &mut ctx);
        if !ctx.bus.is_empty() {
            break;
        }
    }

    match ctx.bus.pop() {
        Some(EngineEvent::CallState(StateTarget::Battle(args))) => {
            assert_eq!(args.encounter, Some(EncounterId(1)));
            assert_eq!(args.party.len(), 2);
            assert_eq!(args.background, "cave");
        }
        other => panic!("expected a battle request, got {other:?}"),
    }
}

#[test]
fn defeated_encounters_never_fire_again() {
    with_env!(env);
    let mut fx = Fixture::new();
    fx.session.party.mark_defeated(EncounterId(1));
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    let mut map = MapState::new(&map_args("cave", WorldKind::Localworld, 300, 256), &ctx).unwrap();
    map.handle_input(&InputEvent::Press(Button::Right), &mut ctx);
    for _ in 0..10 {
        map.update(100, &mut ctx);
    }
    assert!(ctx.bus.is_empty());
}

#[test]
fn same_world_teleports_relocate_in_place() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    // West of the cave crawl tunnel at (752, 128), walking east.
    let mut map = MapState::new(&map_args("cave", WorldKind::Localworld, 700, 136), &ctx).unwrap();
    map.handle_input(&InputEvent::Press(Button::Right), &mut ctx);
    for _ in 0..10 {
        map.update(100, &mut ctx);
        if matches!(map.snapshot(), StateSnapshot::Map { x, .. } if x < 700) {
            break;
        }
    }

    match map.snapshot() {
        StateSnapshot::Map { map, world, x, y } => {
            assert_eq!(map.as_str(), "cave");
            assert_eq!(world, WorldKind::Localworld);
            assert_eq!((x, y), (608, 416));
        }
        other => panic!("expected a map snapshot, got {other:?}"),
    }
    // Same world: the state relocates in place, no stack transition.
    assert!(ctx.bus.is_empty());
}

#[test]
fn crossing_worlds_swaps_the_map_state() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    // Below the town entrance trigger at (288, 192), walking north.
    let mut map =
        MapState::new(&map_args("overworld", WorldKind::Overworld, 288, 300), &ctx).unwrap();
    map.handle_input(&InputEvent::Press(Button::Up), &mut ctx);
    for _ in 0..10 {
        map.update(100, &mut ctx);
        if !ctx.bus.is_empty() {
            break;
        }
    }

    // The overworld exits and the town map variant is called in its place.
    assert_eq!(ctx.bus.pop(), Some(EngineEvent::ExitState(Callback::None)));
    match ctx.bus.pop() {
        Some(EngineEvent::CallState(StateTarget::Map(args))) => {
            assert_eq!(args.map.as_str(), "town");
            assert_eq!(args.world, WorldKind::Localworld);
            assert_eq!((args.x, args.y), (400, 540));
        }
        other => panic!("expected a map call, got {other:?}"),
    }
    assert!(ctx.bus.is_empty());
}

#[test]
fn trader_sells_within_the_party_budget() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    // Right under the trader stall at (128, 240).
    let mut map = MapState::new(&map_args("town", WorldKind::Localworld, 128, 293), &ctx).unwrap();
    let confirm = InputEvent::Press(Button::Confirm);

    // Open the shop and buy the first entry (Knife, 8 G).
    map.handle_input(&confirm, &mut ctx);
    map.handle_input(&confirm, &mut ctx);
    assert_eq!(ctx.session.party.gold, 12);
    assert_eq!(ctx.session.party.inventory.len(), 3);

    // Fire Blade costs 150 G; the purchase is refused.
    map.handle_input(&InputEvent::Press(Button::Down), &mut ctx);
    map.handle_input(&InputEvent::Press(Button::Down), &mut ctx);
    map.handle_input(&confirm, &mut ctx);
    assert_eq!(ctx.session.party.gold, 12);
    assert_eq!(ctx.session.party.inventory.len(), 3);

    map.handle_input(&InputEvent::Press(Button::Cancel), &mut ctx);
    assert!(ctx.bus.is_empty());
}

#[test]
fn winning_a_battle_pays_out_and_retires_the_encounter() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    let mut map = MapState::new(&map_args("cave", WorldKind::Localworld, 96, 96), &ctx).unwrap();
    let rewards = BattleRewards {
        gold: 60,
        exp: 30,
        loot: vec![jrpg_content::items::mana_potion()],
    };
    map.on_return(
        Callback::Battle(BattleCallback {
            outcome: BattleOutcome::Won,
            rewards,
            encounter: Some(EncounterId(1)),
        }),
        &mut ctx,
    );

    let party = &ctx.session.party;
    assert_eq!(party.gold, 80);
    assert!(party.is_defeated(EncounterId(1)));
    assert_eq!(party.inventory.len(), 3);
    // Everyone got the experience; the warrior threshold is 10.
    assert_eq!(party.member(0).level(), 2);
}

#[test]
fn fleeing_grants_a_grace_period() {
    with_env!(env);
    let mut fx = Fixture::new();
    let mut ctx = StateContext {
        bus: &mut fx.bus,
        session: &mut fx.session,
        env,
    };

    // Standing on the live encounter.
    let mut map = MapState::new(&map_args("cave", WorldKind::Localworld, 352, 256), &ctx).unwrap();
    map.on_return(
        Callback::Battle(BattleCallback {
            outcome: BattleOutcome::Fled,
            rewards: BattleRewards::default(),
            encounter: Some(EncounterId(1)),
        }),
        &mut ctx,
    );

    // Within the grace window nothing triggers.
    map.update(500, &mut ctx);
    assert!(ctx.bus.is_empty());

    // After it runs out, the encounter rearms.
    map.update(600, &mut ctx);
    assert!(matches!(
        ctx.bus.pop(),
        Some(EngineEvent::CallState(StateTarget::Battle(_)))
    ));
}
