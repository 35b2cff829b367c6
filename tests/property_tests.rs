//! Property tests for piles and strike arithmetic.
//!
//! These tests throw random operation sequences at the card piles and
//! random block/damage combinations at the resolver, checking the
//! invariants that must hold for every input.

use proptest::prelude::*;
use rustc_hash::FxHashSet;

use rust_skirmish::cards::{CardType, Pile};
use rust_skirmish::core::{CombatantId, CombatantKind, Faction, GameRng, LocationId, RulesConfig, World};
use rust_skirmish::effects::{BlockUse, CardOutcome, PhaseResolver, StrikeOutcome};
use rust_skirmish::factions::Relation;
use rust_skirmish::goals::NoGoals;
use rust_skirmish::piles::CardPileManager;
use rust_skirmish::sequence::SequenceParticipant;
use rust_skirmish::tags::TagKind;

const OWNER: CombatantId = CombatantId(0);

#[derive(Clone, Debug)]
enum PileOp {
    DiscardTop,
    DestroyOne,
    Heal,
    Refresh,
    Shuffle,
}

fn pile_op() -> impl Strategy<Value = PileOp> {
    prop_oneof![
        3 => Just(PileOp::DiscardTop),
        2 => Just(PileOp::DestroyOne),
        1 => Just(PileOp::Heal),
        1 => Just(PileOp::Refresh),
        1 => Just(PileOp::Shuffle),
    ]
}

fn solo_world(deck_size: usize) -> (World, CombatantId) {
    let mut world = World::new();
    let id = world.spawn(
        "Solo",
        CombatantKind::Player,
        Faction::new("players"),
        LocationId::new("room"),
        &vec![CardType::Attack; deck_size],
    );
    (world, id)
}

proptest! {
    /// Test that every card stays in exactly one pile and the defeated flag
    /// always matches the pile state.
    #[test]
    fn prop_piles_partition_cards(
        deck_size in 1usize..20,
        ops in prop::collection::vec(pile_op(), 0..60),
        seed in any::<u64>(),
    ) {
        let (mut world, id) = solo_world(deck_size);
        let mut rng = GameRng::new(seed);

        for op in ops {
            match op {
                PileOp::DiscardTop => {
                    if let Some(card) = world.piles().draw_top(id) {
                        world.discard(card);
                    }
                }
                PileOp::DestroyOne => {
                    world.destroy_one_card(id, &FxHashSet::default(), &mut rng);
                }
                PileOp::Heal => {
                    world.heal_one(id, &mut rng);
                }
                PileOp::Refresh => world.refresh_deck(id),
                PileOp::Shuffle => world.shuffle_deck(id, &mut rng),
            }

            let counts = world.pile_counts(id);
            prop_assert_eq!(counts.total(), deck_size);
            prop_assert_eq!(world.piles().total_cards(id), deck_size);
            prop_assert_eq!(world.combatant(id).defeated, counts.health() == 0);
            prop_assert!(world.defeat_flags_consistent());
        }
    }

    /// Test that a refresh appends discard under active, keeping both
    /// relative orders.
    #[test]
    fn prop_refresh_preserves_order(
        deck_size in 1usize..16,
        discards in 0usize..16,
        seed in any::<u64>(),
    ) {
        let mut piles = CardPileManager::new();
        piles.create_deck(OWNER, &vec![CardType::Defend; deck_size]);
        let mut rng = GameRng::new(seed);
        piles.shuffle_active(OWNER, &mut rng);

        for _ in 0..discards.min(deck_size) {
            let top = piles.draw_top(OWNER).unwrap();
            piles.discard(top);
        }
        let active = piles.cards_in_pile(OWNER, Pile::Active);
        let discard = piles.cards_in_pile(OWNER, Pile::Discard);

        piles.refresh_deck(OWNER);

        let expected: Vec<_> = active.iter().chain(discard.iter()).copied().collect();
        prop_assert_eq!(piles.cards_in_pile(OWNER, Pile::Active), expected);
        prop_assert!(piles.cards_in_pile(OWNER, Pile::Discard).is_empty());
    }

    /// Test that a healed card lands on top of the discard pile.
    #[test]
    fn prop_heal_lands_on_top_of_discard(
        deck_size in 2usize..12,
        destroyed in 1usize..12,
        discarded in 0usize..12,
        seed in any::<u64>(),
    ) {
        let mut piles = CardPileManager::new();
        let ids = piles.create_deck(OWNER, &vec![CardType::Heal; deck_size]);
        let destroyed = destroyed.min(deck_size);
        for &card in &ids[..destroyed] {
            piles.destroy(card);
        }
        for &card in ids[destroyed..].iter().take(discarded) {
            piles.discard(card);
        }
        let top_before = piles
            .cards_in_pile(OWNER, Pile::Discard)
            .iter()
            .map(|&c| piles.get(c).unwrap().order)
            .max();

        let mut rng = GameRng::new(seed);
        let healed = piles.heal_one(OWNER, &mut rng).unwrap();

        let card = piles.get(healed).unwrap();
        prop_assert_eq!(card.pile, Pile::Discard);
        prop_assert_eq!(card.order, top_before.map_or(0, |o| o + 1));
        prop_assert_eq!(piles.cards_in_pile(OWNER, Pile::Discard).last().copied(), Some(healed));
    }

    /// Test block absorption: `used = min(blocks, damage)` and only the
    /// remainder destroys cards.
    #[test]
    fn prop_blocks_absorb_damage(
        blocks in 0u32..6,
        base in 1u32..5,
        marked in any::<bool>(),
        seed in any::<u64>(),
    ) {
        let mut world = World::new();
        let yard = LocationId::new("yard");
        let attacker = world.spawn("Attacker", CombatantKind::Player, Faction::new("players"), yard.clone(), &[CardType::Attack]);
        let target = world.spawn("Target", CombatantKind::Monster, Faction::new("monsters"), yard, &[CardType::Shuffle; 12]);
        world.factions.set_relationship(&Faction::new("players"), &Faction::new("monsters"), Relation::Hostile);
        if marked {
            world.tags.set(target, TagKind::Marked, 1, 1);
        }

        let rules = RulesConfig::default().with_attack_damage(base);
        let card = world.piles().draw_top(attacker).unwrap();
        let mut participants = vec![
            SequenceParticipant::new(attacker).with_card(card, Some(target)),
            SequenceParticipant::new(target).with_blocks(blocks),
        ];
        let mut rng = GameRng::new(seed);
        let results = PhaseResolver::new(&mut world, &mut rng, &rules, NoGoals, &mut participants, 1).resolve_round();

        let damage = base + u32::from(marked) * rules.marked_bonus;
        let used = blocks.min(damage);
        let dealt = damage - used;
        let expected_blocks = BlockUse { used, remaining: blocks - used };

        match &results[0].outcome {
            CardOutcome::Attack(StrikeOutcome::Blocked { marked_bonus, blocks: usage }) => {
                prop_assert_eq!(dealt, 0);
                prop_assert_eq!(*marked_bonus, marked);
                prop_assert_eq!(*usage, expected_blocks);
            }
            CardOutcome::Attack(StrikeOutcome::Hit { damage: hit, blocks: usage, destroyed, marked_bonus, .. }) => {
                prop_assert_eq!(*hit, dealt);
                prop_assert_eq!(*marked_bonus, marked);
                prop_assert_eq!(*usage, (used > 0).then_some(expected_blocks));
                prop_assert_eq!(destroyed.len() as u32, dealt);
            }
            other => prop_assert!(false, "unexpected outcome {:?}", other),
        }
        prop_assert_eq!(participants[1].block_count, blocks - used);
        prop_assert_eq!(world.pile_counts(target).destroyed as u32, dealt);
    }
}
