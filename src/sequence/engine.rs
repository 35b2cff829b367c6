//! The sequence engine: encounter lifecycle around the phase resolver.
//!
//! An orchestrator drives each encounter through the same loop:
//!
//! ```text
//! create_sequence
//!   loop:
//!     draw_cards_for_sequence -> resolve_round -> apply_poison_ticks
//!     check_end?  -> end_sequence
//!     otherwise   -> reset_sequence_round
//! ```
//!
//! Calling these out of order is an orchestration bug and panics.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::participant::SequenceParticipant;
use crate::core::{
    CombatantId, EngineError, Faction, GameRng, GameRngState, LocationId, RulesConfig, SequenceId, World,
};
use crate::effects::{Actor, DrawnCard, PhaseResolver, ResolutionResult, TickResult};
use crate::goals::{GoalTracker, NoGoals};
use crate::piles::PileCounts;
use crate::tags::Tag;

/// Where a sequence stands within its current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoundPhase {
    /// No cards committed.
    Idle,
    /// Cards and targets committed, not yet resolved.
    Drawn,
    /// Cards resolved, poison not yet applied.
    Resolved,
    /// Poison applied; waiting for an end check and reset.
    Ticked,
    /// The sequence is over.
    Ended,
}

/// How a sequence ended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceEnd {
    /// A participating faction has no living members.
    Eliminated(Faction),
    /// Every living participant's active pile is empty.
    Standoff,
}

/// Everything that happened in one round.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundLog {
    pub round: u32,
    pub drawn: Vec<DrawnCard>,
    pub results: Vec<ResolutionResult>,
    pub ticks: Vec<TickResult>,
}

/// Per-participant status for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub combatant: Actor,
    pub faction: Faction,
    pub defeated: bool,
    pub piles: PileCounts,
    pub tags: Vec<Tag>,
    pub block_count: u32,
    /// The participant's card has been resolved this round.
    pub resolved: bool,
}

/// Final report of an ended sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSummary {
    pub sequence: SequenceId,
    pub location: LocationId,
    pub rounds: u32,
    pub outcome: Option<SequenceEnd>,
    pub survivors: Vec<StatusSnapshot>,
    pub defeated: Vec<Actor>,
}

/// One encounter at one location.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Sequence {
    pub id: SequenceId,
    pub location: LocationId,
    pub participants: Vec<SequenceParticipant>,
    /// Round number of the last draw, 0 before the first.
    pub round: u32,
    pub phase: RoundPhase,
    pub history: im::Vector<RoundLog>,
}

/// Serializable engine state for the persistence boundary.
///
/// Taken between sequences: open sequences are not part of it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub world: World,
    pub rng: GameRngState,
    pub next_sequence: u32,
}

impl EngineSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EngineError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Runs encounters over a shared `World`.
///
/// ## Usage
///
/// ```
/// use rust_skirmish::cards::CardType;
/// use rust_skirmish::core::{CombatantKind, Faction, LocationId, RulesConfig, World};
/// use rust_skirmish::factions::Relation;
/// use rust_skirmish::sequence::{SequenceEnd, SequenceEngine};
///
/// let mut world = World::new();
/// let bridge = LocationId::new("bridge");
/// let (heroes, trolls) = (Faction::new("heroes"), Faction::new("trolls"));
/// world.spawn("Knight", CombatantKind::Player, heroes.clone(), bridge.clone(), &[CardType::Attack; 3]);
/// world.spawn("Troll", CombatantKind::Monster, trolls.clone(), bridge.clone(), &[CardType::Defend; 2]);
/// world.factions.set_relationship(&heroes, &trolls, Relation::Hostile);
///
/// let mut engine = SequenceEngine::new(world, RulesConfig::default(), 42).unwrap();
/// let seq = engine.create_sequence(&bridge);
///
/// let mut round = 1;
/// let end = loop {
///     engine.draw_cards_for_sequence(seq, round);
///     engine.resolve_round(seq, round);
///     engine.apply_poison_ticks(seq);
///     if let Some(end) = engine.check_end(seq) {
///         break end;
///     }
///     engine.reset_sequence_round(seq);
///     round += 1;
/// };
///
/// assert_eq!(end, SequenceEnd::Standoff);
/// let summary = engine.end_sequence(seq);
/// assert_eq!(summary.survivors.len(), 2);
/// ```
pub struct SequenceEngine<G: GoalTracker = NoGoals> {
    world: World,
    rng: GameRng,
    rules: RulesConfig,
    goals: G,
    sequences: FxHashMap<SequenceId, Sequence>,
    next_sequence: u32,
}

impl SequenceEngine<NoGoals> {
    /// Create an engine without goal tracking.
    pub fn new(world: World, rules: RulesConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_goals(world, rules, seed, NoGoals)
    }
}

impl<G: GoalTracker> SequenceEngine<G> {
    /// Create an engine reporting goal events to `goals`.
    ///
    /// The rules' tag windows replace the world's.
    pub fn with_goals(mut world: World, rules: RulesConfig, seed: u64, goals: G) -> Result<Self, EngineError> {
        rules.validate()?;
        world.tags.set_windows(rules.windows);
        Ok(Self {
            world,
            rng: GameRng::new(seed),
            rules,
            goals,
            sequences: FxHashMap::default(),
            next_sequence: 0,
        })
    }

    /// Rebuild an engine from a snapshot.
    pub fn from_snapshot(snapshot: EngineSnapshot, rules: RulesConfig, goals: G) -> Result<Self, EngineError> {
        let mut engine = Self::with_goals(snapshot.world, rules, snapshot.rng.seed, goals)?;
        engine.rng = GameRng::from_state(&snapshot.rng);
        engine.next_sequence = snapshot.next_sequence;
        Ok(engine)
    }

    /// Capture the world and RNG position.
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            world: self.world.clone(),
            rng: self.rng.state(),
            next_sequence: self.next_sequence,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for the orchestrator, between rounds.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[must_use]
    pub fn rules(&self) -> &RulesConfig {
        &self.rules
    }

    #[must_use]
    pub fn goals(&self) -> &G {
        &self.goals
    }

    pub fn goals_mut(&mut self) -> &mut G {
        &mut self.goals
    }

    /// Look up a sequence, ended or not.
    #[must_use]
    pub fn sequence(&self, seq: SequenceId) -> Option<&Sequence> {
        self.sequences.get(&seq)
    }

    /// Round-by-round record of a sequence.
    ///
    /// # Panics
    ///
    /// Panics if the sequence does not exist.
    #[must_use]
    pub fn history(&self, seq: SequenceId) -> &im::Vector<RoundLog> {
        &known(&self.sequences, seq).history
    }

    // === Orchestration queries ===

    /// Locations holding at least one living player, sorted.
    #[must_use]
    pub fn sequence_locations(&self) -> Vec<LocationId> {
        let mut locations: Vec<LocationId> = self
            .world
            .roster()
            .all()
            .into_iter()
            .filter(|c| c.is_player() && c.is_alive())
            .map(|c| c.location.clone())
            .collect();
        locations.sort();
        locations.dedup();
        locations
    }

    /// Check if a living player stands at `location`.
    #[must_use]
    pub fn should_sequence_occur(&self, location: &LocationId) -> bool {
        self.world
            .roster()
            .alive_at(location)
            .iter()
            .any(|c| c.is_player())
    }

    /// Check if any two living occupants of `location` are hostile.
    #[must_use]
    pub fn has_hostiles(&self, location: &LocationId) -> bool {
        let here = self.world.roster().alive_at(location);
        here.iter().enumerate().any(|(i, a)| {
            here[i + 1..]
                .iter()
                .any(|b| self.world.factions.is_hostile(&a.faction, &b.faction))
        })
    }

    /// Move every living combatant's discard under its active pile.
    /// Once per outer round, not per encounter round.
    pub fn refresh_decks(&mut self) {
        let living: Vec<CombatantId> = self
            .world
            .roster()
            .all()
            .into_iter()
            .filter(|c| c.is_alive())
            .map(|c| c.id)
            .collect();
        for id in living {
            self.world.refresh_deck(id);
        }
    }

    // === Lifecycle ===

    /// Open a sequence with every living combatant at `location`, in id
    /// order.
    pub fn create_sequence(&mut self, location: &LocationId) -> SequenceId {
        let id = SequenceId(self.next_sequence);
        self.next_sequence += 1;

        let participants: Vec<SequenceParticipant> = self
            .world
            .roster()
            .alive_at(location)
            .into_iter()
            .map(|c| SequenceParticipant::new(c.id))
            .collect();
        debug!(sequence = %id, %location, participants = participants.len(), "sequence created");

        self.sequences.insert(
            id,
            Sequence {
                id,
                location: location.clone(),
                participants,
                round: 0,
                phase: RoundPhase::Idle,
                history: im::Vector::new(),
            },
        );
        id
    }

    /// Start encounter round `round`: expire tags, reset blocks, draw and
    /// target.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is unknown, ended, or holds a draw that was
    /// never resolved.
    pub fn draw_cards_for_sequence(&mut self, seq: SequenceId, round: u32) -> Vec<DrawnCard> {
        let sequence = open(&mut self.sequences, seq);
        assert!(
            sequence.phase != RoundPhase::Drawn,
            "{seq} already holds an unresolved draw for round {}",
            sequence.round
        );

        let drawn = PhaseResolver::new(
            &mut self.world,
            &mut self.rng,
            &self.rules,
            &mut self.goals,
            &mut sequence.participants,
            round,
        )
        .draw_and_assign();

        sequence.round = round;
        sequence.phase = RoundPhase::Drawn;
        sequence.history.push_back(RoundLog {
            round,
            drawn: drawn.clone(),
            ..RoundLog::default()
        });
        drawn
    }

    /// Resolve the drawn cards of `round`.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is unknown or ended, or if `round` was not
    /// drawn.
    pub fn resolve_round(&mut self, seq: SequenceId, round: u32) -> Vec<ResolutionResult> {
        let sequence = open(&mut self.sequences, seq);
        assert!(
            sequence.phase == RoundPhase::Drawn && sequence.round == round,
            "{seq} has no drawn snapshot for round {round}"
        );

        let results = PhaseResolver::new(
            &mut self.world,
            &mut self.rng,
            &self.rules,
            &mut self.goals,
            &mut sequence.participants,
            round,
        )
        .resolve_round();

        sequence.phase = RoundPhase::Resolved;
        if let Some(log) = sequence.history.back_mut() {
            log.results = results.clone();
        }
        results
    }

    /// Apply end-of-round poison damage.
    ///
    /// # Panics
    ///
    /// Panics if the current round has not been resolved.
    pub fn apply_poison_ticks(&mut self, seq: SequenceId) -> Vec<TickResult> {
        let sequence = open(&mut self.sequences, seq);
        assert!(
            sequence.phase == RoundPhase::Resolved,
            "{seq} must resolve its round before poison ticks"
        );

        let ticks = PhaseResolver::new(
            &mut self.world,
            &mut self.rng,
            &self.rules,
            &mut self.goals,
            &mut sequence.participants,
            sequence.round,
        )
        .apply_poison_ticks();

        sequence.phase = RoundPhase::Ticked;
        if let Some(log) = sequence.history.back_mut() {
            log.ticks = ticks.clone();
        }
        ticks
    }

    /// The first participating faction, in participant order, with no
    /// living members.
    #[must_use]
    pub fn eliminated_faction(&self, seq: SequenceId) -> Option<Faction> {
        let sequence = known(&self.sequences, seq);
        let mut factions: Vec<(&Faction, usize)> = Vec::new();
        for participant in &sequence.participants {
            let combatant = self.world.combatant(participant.combatant);
            let alive = usize::from(combatant.is_alive());
            match factions.iter_mut().find(|(f, _)| **f == combatant.faction) {
                Some((_, count)) => *count += alive,
                None => factions.push((&combatant.faction, alive)),
            }
        }
        factions
            .into_iter()
            .find(|&(_, alive)| alive == 0)
            .map(|(faction, _)| faction.clone())
    }

    /// Check if no living participant can draw. True when nobody is
    /// alive.
    #[must_use]
    pub fn is_everyone_out_of_cards(&self, seq: SequenceId) -> bool {
        known(&self.sequences, seq)
            .participants
            .iter()
            .filter(|p| self.world.combatant(p.combatant).is_alive())
            .all(|p| !self.world.piles().has_active_cards(p.combatant))
    }

    /// Both termination checks; elimination wins over standoff.
    #[must_use]
    pub fn check_end(&self, seq: SequenceId) -> Option<SequenceEnd> {
        if let Some(faction) = self.eliminated_faction(seq) {
            return Some(SequenceEnd::Eliminated(faction));
        }
        self.is_everyone_out_of_cards(seq).then_some(SequenceEnd::Standoff)
    }

    /// Status of every participant, in participant order.
    #[must_use]
    pub fn participant_status(&self, seq: SequenceId) -> Vec<StatusSnapshot> {
        known(&self.sequences, seq)
            .participants
            .iter()
            .map(|p| self.status_of(p))
            .collect()
    }

    fn status_of(&self, participant: &SequenceParticipant) -> StatusSnapshot {
        let combatant = self.world.combatant(participant.combatant);
        StatusSnapshot {
            combatant: Actor::from(combatant),
            faction: combatant.faction.clone(),
            defeated: combatant.defeated,
            piles: self.world.pile_counts(combatant.id),
            tags: self.world.tags.tags_of(combatant.id),
            block_count: participant.block_count,
            resolved: participant.resolved,
        }
    }

    /// Clear drawn cards, targets and blocks before the next round.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is unknown or ended.
    pub fn reset_sequence_round(&mut self, seq: SequenceId) {
        let sequence = open(&mut self.sequences, seq);
        for participant in &mut sequence.participants {
            participant.reset();
        }
        sequence.phase = RoundPhase::Idle;
    }

    /// Close a sequence and report its survivors.
    ///
    /// Tag rounds are local to a sequence: every participant's tags are
    /// cleared here, after the summary records them.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is unknown or already ended.
    pub fn end_sequence(&mut self, seq: SequenceId) -> SequenceSummary {
        let outcome = self.check_end(seq);
        let sequence = known(&self.sequences, seq);
        assert!(sequence.phase != RoundPhase::Ended, "{seq} has already ended");

        let (alive, fallen): (Vec<_>, Vec<_>) = sequence
            .participants
            .iter()
            .partition(|p| self.world.combatant(p.combatant).is_alive());
        let summary = SequenceSummary {
            sequence: seq,
            location: sequence.location.clone(),
            rounds: sequence.round,
            outcome,
            survivors: alive.into_iter().map(|p| self.status_of(p)).collect(),
            defeated: fallen
                .into_iter()
                .map(|p| Actor::from(self.world.combatant(p.combatant)))
                .collect(),
        };

        let sequence = open(&mut self.sequences, seq);
        for participant in sequence.participants.drain(..) {
            for tag in self.world.tags.clear_owner(participant.combatant) {
                debug!(id = %participant.combatant, tag = %tag.kind, "tag cleared at sequence end");
            }
        }
        sequence.phase = RoundPhase::Ended;
        info!(
            sequence = %seq,
            location = %summary.location,
            rounds = summary.rounds,
            outcome = ?summary.outcome,
            survivors = summary.survivors.len(),
            "sequence ended"
        );
        summary
    }

    /// Drop an ended sequence, returning it with its history.
    ///
    /// Ended sequences are kept for replay until forgotten.
    ///
    /// # Panics
    ///
    /// Panics if the sequence is unknown or still open.
    pub fn forget_sequence(&mut self, seq: SequenceId) -> Sequence {
        assert!(
            known(&self.sequences, seq).phase == RoundPhase::Ended,
            "{seq} is still open"
        );
        self.sequences
            .remove(&seq)
            .unwrap_or_else(|| panic!("{seq} does not exist"))
    }
}

fn known(sequences: &FxHashMap<SequenceId, Sequence>, seq: SequenceId) -> &Sequence {
    sequences
        .get(&seq)
        .unwrap_or_else(|| panic!("{seq} does not exist"))
}

fn open(sequences: &mut FxHashMap<SequenceId, Sequence>, seq: SequenceId) -> &mut Sequence {
    let sequence = sequences
        .get_mut(&seq)
        .unwrap_or_else(|| panic!("{seq} does not exist"));
    assert!(sequence.phase != RoundPhase::Ended, "{seq} has already ended");
    sequence
}
