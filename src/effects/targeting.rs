//! Target selection.
//!
//! Targets are picked once per round, during the draw, from the state as
//! it stood before any card resolves:
//! - `TargetClass`: Which participants a card type may target
//! - `TargetSelector`: Lowest-health and uniform pick algorithms

use serde::{Deserialize, Serialize};

use crate::cards::CardType;
use crate::core::{CombatantId, GameRng, World};
use crate::factions::Relation;
use crate::tags::TagKind;

/// Candidate class for a card type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetClass {
    /// Lowest-health participant in the given relation to the caster.
    LowestHealth { relation: Relation, include_hidden: bool },
    /// Uniformly random neutral participant that owns an item.
    NeutralWithItems,
    /// The caster.
    Caster,
}

impl TargetClass {
    /// The targeting rule for a card type.
    #[must_use]
    pub fn for_card(card: CardType) -> Self {
        match card {
            CardType::Heal | CardType::Defend => TargetClass::LowestHealth {
                relation: Relation::Friendly,
                include_hidden: true,
            },
            CardType::Attack | CardType::Backstab | CardType::Execute => TargetClass::LowestHealth {
                relation: Relation::Hostile,
                include_hidden: false,
            },
            CardType::Poison | CardType::Mark => TargetClass::LowestHealth {
                relation: Relation::Hostile,
                include_hidden: true,
            },
            CardType::Steal | CardType::Wealth => TargetClass::NeutralWithItems,
            CardType::Sneak | CardType::Watch | CardType::Shuffle | CardType::Sell => TargetClass::Caster,
        }
    }
}

/// Picks targets among a sequence's participants.
///
/// Candidates are passed in participant order. Every random pick goes
/// through the shared `GameRng`.
pub struct TargetSelector<'a> {
    world: &'a World,
    round: u32,
}

impl<'a> TargetSelector<'a> {
    /// Create a selector reading `world` as of `round`.
    #[must_use]
    pub fn new(world: &'a World, round: u32) -> Self {
        Self { world, round }
    }

    /// Relation of `other` as seen from `caster`. A combatant is always
    /// friendly to itself.
    #[must_use]
    pub fn relation(&self, caster: CombatantId, other: CombatantId) -> Relation {
        if caster == other {
            return Relation::Friendly;
        }
        let a = self.world.combatant(caster);
        let b = self.world.combatant(other);
        self.world.factions.relationship(&a.faction, &b.faction)
    }

    /// Select a target for `card` cast by `caster`.
    pub fn select(
        &self,
        caster: CombatantId,
        card: CardType,
        candidates: &[CombatantId],
        rng: &mut GameRng,
    ) -> Option<CombatantId> {
        match TargetClass::for_card(card) {
            TargetClass::LowestHealth {
                relation,
                include_hidden,
            } => self.lowest_health(caster, relation, include_hidden, candidates, rng),
            TargetClass::NeutralWithItems => self.neutral_with_items(caster, candidates, rng),
            TargetClass::Caster => Some(caster),
        }
    }

    /// Living candidates in `relation` to the caster, optionally skipping
    /// hidden ones, narrowed to minimum health; ties broken uniformly.
    pub fn lowest_health(
        &self,
        caster: CombatantId,
        relation: Relation,
        include_hidden: bool,
        candidates: &[CombatantId],
        rng: &mut GameRng,
    ) -> Option<CombatantId> {
        let eligible: Vec<(CombatantId, usize)> = candidates
            .iter()
            .copied()
            .filter(|&id| self.world.combatant(id).is_alive())
            .filter(|&id| self.relation(caster, id) == relation)
            .filter(|&id| include_hidden || !self.world.tags.is_active(id, TagKind::Hidden, self.round))
            .map(|id| (id, self.world.health(id)))
            .collect();

        let lowest = eligible.iter().map(|&(_, health)| health).min()?;
        let ties: Vec<CombatantId> = eligible
            .into_iter()
            .filter(|&(_, health)| health == lowest)
            .map(|(id, _)| id)
            .collect();
        rng.choose(&ties).copied()
    }

    /// A uniformly random living neutral candidate holding at least one
    /// item.
    pub fn neutral_with_items(
        &self,
        caster: CombatantId,
        candidates: &[CombatantId],
        rng: &mut GameRng,
    ) -> Option<CombatantId> {
        let eligible: Vec<CombatantId> = candidates
            .iter()
            .copied()
            .filter(|&id| self.world.combatant(id).is_alive())
            .filter(|&id| self.relation(caster, id) == Relation::Neutral)
            .filter(|&id| self.world.items.has_items(id))
            .collect();
        rng.choose(&eligible).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CombatantKind, Faction, LocationId};
    use crate::items::ItemPayload;

    struct Scene {
        world: World,
        rogue: CombatantId,
        goblin: CombatantId,
        ogre: CombatantId,
        merchant: CombatantId,
    }

    fn scene() -> Scene {
        let mut world = World::new();
        let cave = LocationId::new("cave");
        let players = Faction::new("players");
        let monsters = Faction::new("monsters");
        let traders = Faction::new("traders");

        let rogue = world.spawn("Rogue", CombatantKind::Player, players.clone(), cave.clone(), &[CardType::Attack; 3]);
        let goblin = world.spawn("Goblin", CombatantKind::Monster, monsters.clone(), cave.clone(), &[CardType::Attack; 2]);
        let ogre = world.spawn("Ogre", CombatantKind::Monster, monsters.clone(), cave.clone(), &[CardType::Attack; 5]);
        let merchant = world.spawn("Merchant", CombatantKind::Monster, traders, cave, &[CardType::Sell]);
        world.factions.set_relationship(&players, &monsters, Relation::Hostile);

        Scene {
            world,
            rogue,
            goblin,
            ogre,
            merchant,
        }
    }

    impl Scene {
        fn all(&self) -> Vec<CombatantId> {
            vec![self.rogue, self.goblin, self.ogre, self.merchant]
        }
    }

    #[test]
    fn test_target_classes() {
        assert_eq!(TargetClass::for_card(CardType::Watch), TargetClass::Caster);
        assert_eq!(TargetClass::for_card(CardType::Wealth), TargetClass::NeutralWithItems);
        assert_eq!(
            TargetClass::for_card(CardType::Backstab),
            TargetClass::LowestHealth {
                relation: Relation::Hostile,
                include_hidden: false
            }
        );
    }

    #[test]
    fn test_attack_picks_lowest_health_hostile() {
        let s = scene();
        let mut rng = GameRng::new(1);
        let selector = TargetSelector::new(&s.world, 1);

        assert_eq!(selector.select(s.rogue, CardType::Attack, &s.all(), &mut rng), Some(s.goblin));
    }

    #[test]
    fn test_attack_skips_hidden_but_poison_does_not() {
        let mut s = scene();
        s.world.tags.set(s.goblin, TagKind::Hidden, 1, 1);
        let mut rng = GameRng::new(1);
        let selector = TargetSelector::new(&s.world, 1);

        assert_eq!(selector.select(s.rogue, CardType::Attack, &s.all(), &mut rng), Some(s.ogre));
        assert_eq!(selector.select(s.rogue, CardType::Poison, &s.all(), &mut rng), Some(s.goblin));
    }

    #[test]
    fn test_expired_hidden_is_ignored() {
        let mut s = scene();
        s.world.tags.set(s.goblin, TagKind::Hidden, 1, 1);
        let mut rng = GameRng::new(1);
        let selector = TargetSelector::new(&s.world, 2);

        assert_eq!(selector.select(s.rogue, CardType::Attack, &s.all(), &mut rng), Some(s.goblin));
    }

    #[test]
    fn test_heal_includes_self() {
        let s = scene();
        let mut rng = GameRng::new(1);
        let selector = TargetSelector::new(&s.world, 1);

        assert_eq!(selector.select(s.rogue, CardType::Heal, &s.all(), &mut rng), Some(s.rogue));
        assert_eq!(selector.select(s.goblin, CardType::Defend, &s.all(), &mut rng), Some(s.goblin));
    }

    #[test]
    fn test_no_hostiles_means_no_target() {
        let s = scene();
        let mut rng = GameRng::new(1);
        let selector = TargetSelector::new(&s.world, 1);

        assert_eq!(selector.select(s.merchant, CardType::Attack, &s.all(), &mut rng), None);
    }

    #[test]
    fn test_steal_needs_neutral_with_items() {
        let mut s = scene();
        let mut rng = GameRng::new(1);
        assert_eq!(
            TargetSelector::new(&s.world, 1).select(s.rogue, CardType::Steal, &s.all(), &mut rng),
            None
        );

        s.world.give_item(s.merchant, "Map", ItemPayload::Information);
        assert_eq!(
            TargetSelector::new(&s.world, 1).select(s.rogue, CardType::Steal, &s.all(), &mut rng),
            Some(s.merchant)
        );
    }

    #[test]
    fn test_ties_split_across_seeds() {
        let mut world = World::new();
        let cave = LocationId::new("cave");
        let hero = world.spawn("Hero", CombatantKind::Player, Faction::new("a"), cave.clone(), &[CardType::Attack]);
        let left = world.spawn("Left", CombatantKind::Monster, Faction::new("b"), cave.clone(), &[CardType::Attack; 2]);
        let right = world.spawn("Right", CombatantKind::Monster, Faction::new("b"), cave, &[CardType::Attack; 2]);
        world
            .factions
            .set_relationship(&Faction::new("a"), &Faction::new("b"), Relation::Hostile);

        let picks: std::collections::HashSet<_> = (0..32)
            .filter_map(|seed| {
                let mut rng = GameRng::new(seed);
                TargetSelector::new(&world, 1).select(hero, CardType::Attack, &[hero, left, right], &mut rng)
            })
            .collect();

        assert_eq!(picks.len(), 2);
    }
}
