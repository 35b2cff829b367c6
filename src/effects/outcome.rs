//! Resolution records.
//!
//! Every drawn card produces exactly one `ResolutionResult`, including
//! cards that found no target or whose preconditions failed. The payload
//! is a closed union per card type so consumers match on variants instead
//! of probing for optional keys.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardType;
use crate::core::{CardId, Combatant, CombatantId, CombatantKind, Faction};
use crate::items::Item;
use crate::piles::DestroyedCard;

/// The combatant who played a card.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: CombatantId,
    pub name: String,
    pub kind: CombatantKind,
}

impl From<&Combatant> for Actor {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
            kind: combatant.kind,
        }
    }
}

/// A combatant referenced by a result.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TargetRef {
    pub id: CombatantId,
    pub name: String,
}

impl From<&Combatant> for TargetRef {
    fn from(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id,
            name: combatant.name.clone(),
        }
    }
}

/// A card committed during the draw, with its assigned target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    pub combatant: Actor,
    pub faction: Faction,
    pub card: CardId,
    pub card_type: CardType,
    pub target: Option<TargetRef>,
}

/// Flat effect label, one per distinct outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTag {
    Watch,
    Hidden,
    SneakFailed,
    Poison,
    Mark,
    Block,
    Destroy,
    Backstab,
    Execute,
    Blocked,
    TargetHidden,
    TargetDefeated,
    NoTarget,
    NotHidden,
    NotPoisoned,
    Heal,
    NoCardsToHeal,
    Shuffle,
    Selling,
    NotSelling,
    NoItems,
    Purchased,
    Caught,
    Stolen,
    PoisonTick,
}

impl EffectTag {
    /// The wire name of this tag.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            EffectTag::Watch => "watch",
            EffectTag::Hidden => "hidden",
            EffectTag::SneakFailed => "sneak_failed",
            EffectTag::Poison => "poison",
            EffectTag::Mark => "mark",
            EffectTag::Block => "block",
            EffectTag::Destroy => "destroy",
            EffectTag::Backstab => "backstab",
            EffectTag::Execute => "execute",
            EffectTag::Blocked => "blocked",
            EffectTag::TargetHidden => "target_hidden",
            EffectTag::TargetDefeated => "target_defeated",
            EffectTag::NoTarget => "no_target",
            EffectTag::NotHidden => "not_hidden",
            EffectTag::NotPoisoned => "not_poisoned",
            EffectTag::Heal => "heal",
            EffectTag::NoCardsToHeal => "no_cards_to_heal",
            EffectTag::Shuffle => "shuffle",
            EffectTag::Selling => "selling",
            EffectTag::NotSelling => "not_selling",
            EffectTag::NoItems => "no_items",
            EffectTag::Purchased => "purchased",
            EffectTag::Caught => "caught",
            EffectTag::Stolen => "stolen",
            EffectTag::PoisonTick => "poison_tick",
        }
    }
}

impl std::fmt::Display for EffectTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Outcome of Sneak.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SneakOutcome {
    Hidden { duration: u32 },
    /// The caster's location was watched this round.
    SneakFailed,
}

/// Outcome of Poison and Mark.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusOutcome {
    Applied { duration: u32 },
    NoTarget,
    TargetDefeated,
}

/// Outcome of Defend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DefendOutcome {
    /// `block_count` is the target's counter after this card.
    Block { block_count: u32 },
    NoTarget,
    TargetDefeated,
}

/// Blocks consumed by one strike.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockUse {
    pub used: u32,
    pub remaining: u32,
}

/// Outcome of Backstab, Execute and Attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StrikeOutcome {
    /// Damage got through. `destroyed` may hold fewer than `damage` cards
    /// when the target ran out.
    Hit {
        damage: u32,
        marked_bonus: bool,
        blocks: Option<BlockUse>,
        destroyed: SmallVec<[DestroyedCard; 4]>,
        target_defeated: bool,
        looted: Vec<Item>,
    },
    /// Blocks absorbed all damage.
    Blocked { marked_bonus: bool, blocks: BlockUse },
    NoTarget,
    TargetDefeated,
    /// Attack only.
    TargetHidden,
    /// Backstab only: the caster was not hidden.
    NotHidden,
    /// Execute only: the target was not poisoned.
    NotPoisoned,
}

impl StrikeOutcome {
    /// Cards destroyed by this strike.
    #[must_use]
    pub fn destroyed(&self) -> &[DestroyedCard] {
        match self {
            StrikeOutcome::Hit { destroyed, .. } => destroyed,
            _ => &[],
        }
    }

    /// Whether this strike defeated its target.
    #[must_use]
    pub fn defeated_target(&self) -> bool {
        matches!(self, StrikeOutcome::Hit { target_defeated: true, .. })
    }
}

/// Outcome of Heal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HealOutcome {
    Healed { card: CardId, card_type: CardType },
    NoCardsToHeal,
    NoTarget,
    TargetDefeated,
}

/// Outcome of Wealth.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TradeOutcome {
    Purchased { item: Item },
    NotSelling,
    NoItems,
    NoTarget,
}

/// Outcome of Steal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StealOutcome {
    Stolen { item: Item },
    /// Watched location. The thief's faction and `now_hostile` are
    /// hostile from here on.
    Caught { now_hostile: Faction },
    NoItems,
    NoTarget,
}

/// Per-card-type outcome payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "card", content = "result", rename_all = "snake_case")]
pub enum CardOutcome {
    Watch { revealed: Vec<TargetRef> },
    Sneak(SneakOutcome),
    Poison(StatusOutcome),
    Mark(StatusOutcome),
    Defend(DefendOutcome),
    Backstab(StrikeOutcome),
    Execute(StrikeOutcome),
    Attack(StrikeOutcome),
    Heal(HealOutcome),
    Shuffle,
    Sell,
    Wealth(TradeOutcome),
    Steal(StealOutcome),
}

impl CardOutcome {
    /// The card type this outcome belongs to.
    #[must_use]
    pub fn card_type(&self) -> CardType {
        match self {
            CardOutcome::Watch { .. } => CardType::Watch,
            CardOutcome::Sneak(_) => CardType::Sneak,
            CardOutcome::Poison(_) => CardType::Poison,
            CardOutcome::Mark(_) => CardType::Mark,
            CardOutcome::Defend(_) => CardType::Defend,
            CardOutcome::Backstab(_) => CardType::Backstab,
            CardOutcome::Execute(_) => CardType::Execute,
            CardOutcome::Attack(_) => CardType::Attack,
            CardOutcome::Heal(_) => CardType::Heal,
            CardOutcome::Shuffle => CardType::Shuffle,
            CardOutcome::Sell => CardType::Sell,
            CardOutcome::Wealth(_) => CardType::Wealth,
            CardOutcome::Steal(_) => CardType::Steal,
        }
    }

    /// The flat effect label.
    #[must_use]
    pub fn effect(&self) -> EffectTag {
        match self {
            CardOutcome::Watch { .. } => EffectTag::Watch,
            CardOutcome::Sneak(SneakOutcome::Hidden { .. }) => EffectTag::Hidden,
            CardOutcome::Sneak(SneakOutcome::SneakFailed) => EffectTag::SneakFailed,
            CardOutcome::Poison(status) => status_effect(status, EffectTag::Poison),
            CardOutcome::Mark(status) => status_effect(status, EffectTag::Mark),
            CardOutcome::Defend(defend) => match defend {
                DefendOutcome::Block { .. } => EffectTag::Block,
                DefendOutcome::NoTarget => EffectTag::NoTarget,
                DefendOutcome::TargetDefeated => EffectTag::TargetDefeated,
            },
            CardOutcome::Backstab(strike) => strike_effect(strike, EffectTag::Backstab),
            CardOutcome::Execute(strike) => strike_effect(strike, EffectTag::Execute),
            CardOutcome::Attack(strike) => strike_effect(strike, EffectTag::Destroy),
            CardOutcome::Heal(heal) => match heal {
                HealOutcome::Healed { .. } => EffectTag::Heal,
                HealOutcome::NoCardsToHeal => EffectTag::NoCardsToHeal,
                HealOutcome::NoTarget => EffectTag::NoTarget,
                HealOutcome::TargetDefeated => EffectTag::TargetDefeated,
            },
            CardOutcome::Shuffle => EffectTag::Shuffle,
            CardOutcome::Sell => EffectTag::Selling,
            CardOutcome::Wealth(trade) => match trade {
                TradeOutcome::Purchased { .. } => EffectTag::Purchased,
                TradeOutcome::NotSelling => EffectTag::NotSelling,
                TradeOutcome::NoItems => EffectTag::NoItems,
                TradeOutcome::NoTarget => EffectTag::NoTarget,
            },
            CardOutcome::Steal(steal) => match steal {
                StealOutcome::Stolen { .. } => EffectTag::Stolen,
                StealOutcome::Caught { .. } => EffectTag::Caught,
                StealOutcome::NoItems => EffectTag::NoItems,
                StealOutcome::NoTarget => EffectTag::NoTarget,
            },
        }
    }

    /// The strike payload, for Backstab, Execute and Attack.
    #[must_use]
    pub fn as_strike(&self) -> Option<&StrikeOutcome> {
        match self {
            CardOutcome::Backstab(s) | CardOutcome::Execute(s) | CardOutcome::Attack(s) => Some(s),
            _ => None,
        }
    }
}

fn status_effect(status: &StatusOutcome, applied: EffectTag) -> EffectTag {
    match status {
        StatusOutcome::Applied { .. } => applied,
        StatusOutcome::NoTarget => EffectTag::NoTarget,
        StatusOutcome::TargetDefeated => EffectTag::TargetDefeated,
    }
}

fn strike_effect(strike: &StrikeOutcome, hit: EffectTag) -> EffectTag {
    match strike {
        StrikeOutcome::Hit { .. } => hit,
        StrikeOutcome::Blocked { .. } => EffectTag::Blocked,
        StrikeOutcome::NoTarget => EffectTag::NoTarget,
        StrikeOutcome::TargetDefeated => EffectTag::TargetDefeated,
        StrikeOutcome::TargetHidden => EffectTag::TargetHidden,
        StrikeOutcome::NotHidden => EffectTag::NotHidden,
        StrikeOutcome::NotPoisoned => EffectTag::NotPoisoned,
    }
}

/// The record of one resolved card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub caster: Actor,
    pub card: CardId,
    pub card_type: CardType,
    pub target: Option<TargetRef>,
    pub outcome: CardOutcome,
}

impl ResolutionResult {
    /// The flat effect label.
    #[must_use]
    pub fn effect(&self) -> EffectTag {
        self.outcome.effect()
    }
}

/// What a poison tick did to one combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TickDamage {
    Destroyed { card: DestroyedCard, defeated: bool },
    /// Only the protected drawn card, or nothing at all, was left.
    NoCards,
}

/// The record of one poison tick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickResult {
    pub victim: Actor,
    pub rounds_remaining: u32,
    pub damage: TickDamage,
}

impl TickResult {
    /// Always `poison_tick`.
    #[must_use]
    pub fn effect(&self) -> EffectTag {
        EffectTag::PoisonTick
    }

    /// Whether this tick defeated the victim.
    #[must_use]
    pub fn defeated(&self) -> bool {
        matches!(self.damage, TickDamage::Destroyed { defeated: true, .. })
    }
}
