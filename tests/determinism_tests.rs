//! Determinism tests.
//!
//! These tests verify that a seed and a starting world fully determine an
//! encounter, including after a save and restore.

use rust_skirmish::cards::CardType;
use rust_skirmish::core::{CombatantKind, Faction, GameRng, LocationId, RulesConfig, World};
use rust_skirmish::factions::Relation;
use rust_skirmish::goals::GoalLog;
use rust_skirmish::items::ItemPayload;
use rust_skirmish::sequence::{EngineSnapshot, SequenceEngine};
use rust_skirmish::GoalTracker;

const ARENA: &str = "arena";

/// A mixed skirmish: two hostile sides and a neutral merchant.
fn arena_world(deck_seed: u64) -> World {
    use CardType::*;

    let mut world = World::new();
    let arena = LocationId::new(ARENA);
    let players = Faction::new("players");
    let monsters = Faction::new("monsters");

    let decks: [(&str, CombatantKind, &Faction, &[CardType]); 4] = [
        ("Rogue", CombatantKind::Player, &players, &[Sneak, Backstab, Steal, Attack, Poison, Execute, Heal]),
        ("Cleric", CombatantKind::Player, &players, &[Heal, Defend, Watch, Attack, Mark, Attack, Defend]),
        ("Orc", CombatantKind::Monster, &monsters, &[Attack, Attack, Defend, Mark, Attack, Heal, Attack]),
        ("Shaman", CombatantKind::Monster, &monsters, &[Poison, Watch, Execute, Defend, Shuffle, Heal, Attack]),
    ];
    let mut deck_rng = GameRng::new(deck_seed);
    for (name, kind, faction, deck) in decks {
        let id = world.spawn(name, kind, faction.clone(), arena.clone(), deck);
        world.shuffle_deck(id, &mut deck_rng);
    }
    let merchant = world.spawn(
        "Merchant",
        CombatantKind::Monster,
        Faction::new("traders"),
        arena,
        &[Sell, Shuffle, Sell, Watch],
    );
    world.give_item(merchant, "Tome", ItemPayload::NewAction { card_type: Backstab });
    world.give_item(merchant, "Map", ItemPayload::Information);

    world.factions.set_relationship(&players, &monsters, Relation::Hostile);
    world
}

/// Run one encounter to completion and serialize every round.
fn run_encounter<G: GoalTracker>(engine: &mut SequenceEngine<G>, first_round: u32) -> Vec<String> {
    let arena = LocationId::new(ARENA);
    let seq = engine.create_sequence(&arena);
    let mut log = Vec::new();

    for round in first_round..first_round + 20 {
        if engine.check_end(seq).is_some() {
            break;
        }
        let drawn = engine.draw_cards_for_sequence(seq, round);
        let results = engine.resolve_round(seq, round);
        let ticks = engine.apply_poison_ticks(seq);
        engine.reset_sequence_round(seq);

        log.push(serde_json::to_string(&drawn).unwrap());
        log.push(serde_json::to_string(&results).unwrap());
        log.push(serde_json::to_string(&ticks).unwrap());
    }
    let summary = engine.end_sequence(seq);
    log.push(serde_json::to_string(&summary).unwrap());
    log
}

/// Test that two engines with the same seed produce identical encounters.
#[test]
fn test_same_seed_same_encounter() {
    for seed in [0, 1, 42, 9001] {
        let mut a = SequenceEngine::new(arena_world(seed), RulesConfig::default(), seed).unwrap();
        let mut b = SequenceEngine::new(arena_world(seed), RulesConfig::default(), seed).unwrap();

        let log_a = run_encounter(&mut a, 1);
        let log_b = run_encounter(&mut b, 1);

        assert!(!log_a.is_empty());
        assert_eq!(log_a, log_b, "seed {seed} diverged");
        assert!(a.world().defeat_flags_consistent());
    }
}

/// Test that goal events are reproduced along with the results.
#[test]
fn test_same_seed_same_goal_events() {
    let mut a = SequenceEngine::with_goals(arena_world(3), RulesConfig::default(), 3, GoalLog::new()).unwrap();
    let mut b = SequenceEngine::with_goals(arena_world(3), RulesConfig::default(), 3, GoalLog::new()).unwrap();

    run_encounter(&mut a, 1);
    run_encounter(&mut b, 1);

    assert!(!a.goals().events.is_empty());
    assert_eq!(a.goals(), b.goals());
}

/// Test that an engine restored from bytes continues exactly like the
/// engine it was saved from.
#[test]
fn test_snapshot_resumes_identically() {
    let mut original = SequenceEngine::new(arena_world(5), RulesConfig::default(), 77).unwrap();
    run_encounter(&mut original, 1);
    original.refresh_decks();

    let bytes = original.snapshot().to_bytes().unwrap();
    let snapshot = EngineSnapshot::from_bytes(&bytes).unwrap();
    let mut restored =
        SequenceEngine::from_snapshot(snapshot, RulesConfig::default(), rust_skirmish::NoGoals).unwrap();

    let next_original = run_encounter(&mut original, 100);
    let next_restored = run_encounter(&mut restored, 100);

    assert_eq!(next_original, next_restored);
}

/// Test that the RNG state captures the stream position, not just the seed.
#[test]
fn test_rng_state_round_trip() {
    let mut rng = GameRng::new(12);
    let mut deck: Vec<u32> = (0..10).collect();
    rng.shuffle(&mut deck);

    let mut restored = GameRng::from_state(&rng.state());
    let expected: Vec<Option<usize>> = (0..16).map(|_| rng.gen_index(50)).collect();
    let actual: Vec<Option<usize>> = (0..16).map(|_| restored.gen_index(50)).collect();

    assert_eq!(expected, actual);
}
