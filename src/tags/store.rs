//! Per-combatant timed status effects.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::config::TagWindows;
use crate::core::entity::CombatantId;

/// Named status effects a combatant can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagKind {
    /// Cannot be targeted by Attack, Backstab or Execute; enables Backstab.
    Hidden,
    /// Loses a card at the end of every round; enables Execute.
    Poisoned,
    /// Takes bonus damage from strikes.
    Marked,
}

impl TagKind {
    /// All tag kinds, for iteration.
    pub const ALL: [TagKind; 3] = [TagKind::Hidden, TagKind::Poisoned, TagKind::Marked];

    /// Number of rounds the tag stays authoritative.
    #[must_use]
    pub fn window(self, windows: &TagWindows) -> u32 {
        match self {
            TagKind::Hidden => windows.hidden,
            TagKind::Poisoned => windows.poisoned,
            TagKind::Marked => windows.marked,
        }
    }
}

impl std::fmt::Display for TagKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TagKind::Hidden => "hidden",
            TagKind::Poisoned => "poisoned",
            TagKind::Marked => "marked",
        };
        f.write_str(name)
    }
}

/// A tag value and the encounter round it was applied in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub kind: TagKind,
    pub value: u32,
    pub round_applied: u32,
}

/// Tag storage keyed by (owner, kind). At most one tag of each kind per
/// owner; setting a tag again overwrites value and round.
///
/// Tags are inert data: the resolver and target selector give them meaning.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TagStore {
    tags: FxHashMap<(CombatantId, TagKind), Tag>,
    windows: TagWindows,
}

impl TagStore {
    /// Create a store with the standard expiry windows.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with custom expiry windows.
    #[must_use]
    pub fn with_windows(windows: TagWindows) -> Self {
        Self {
            tags: FxHashMap::default(),
            windows,
        }
    }

    /// Expiry windows in use.
    #[must_use]
    pub fn windows(&self) -> &TagWindows {
        &self.windows
    }

    /// Replace the expiry windows. Existing tags are kept and judged by
    /// the new windows from now on.
    pub fn set_windows(&mut self, windows: TagWindows) {
        self.windows = windows;
    }

    /// Set a tag, replacing any existing tag of that kind.
    pub fn set(&mut self, owner: CombatantId, kind: TagKind, value: u32, round: u32) {
        trace!(%owner, tag = %kind, value, round, "tag set");
        self.tags.insert(
            (owner, kind),
            Tag {
                kind,
                value,
                round_applied: round,
            },
        );
    }

    /// Add to a tag's value (stacking), refreshing its round.
    pub fn add(&mut self, owner: CombatantId, kind: TagKind, amount: u32, round: u32) {
        let current = self.value(owner, kind);
        self.set(owner, kind, current + amount, round);
    }

    /// Remove a tag. Returns it if it was present.
    pub fn remove(&mut self, owner: CombatantId, kind: TagKind) -> Option<Tag> {
        self.tags.remove(&(owner, kind))
    }

    /// Remove every tag on one owner, ordered by kind.
    pub fn clear_owner(&mut self, owner: CombatantId) -> Vec<Tag> {
        TagKind::ALL
            .iter()
            .filter_map(|&kind| self.tags.remove(&(owner, kind)))
            .collect()
    }

    /// Look up a tag.
    #[must_use]
    pub fn get(&self, owner: CombatantId, kind: TagKind) -> Option<&Tag> {
        self.tags.get(&(owner, kind))
    }

    /// Check if a tag is present.
    #[must_use]
    pub fn has(&self, owner: CombatantId, kind: TagKind) -> bool {
        self.tags.contains_key(&(owner, kind))
    }

    /// Tag value, or 0 if absent.
    #[must_use]
    pub fn value(&self, owner: CombatantId, kind: TagKind) -> u32 {
        self.get(owner, kind).map_or(0, |t| t.value)
    }

    /// Check if a tag is present and still inside its expiry window at
    /// `current_round`.
    #[must_use]
    pub fn is_active(&self, owner: CombatantId, kind: TagKind, current_round: u32) -> bool {
        self.get(owner, kind)
            .is_some_and(|tag| !self.is_expired(tag, current_round))
    }

    /// Rounds left in the tag's window after `current_round`, or 0 if absent.
    #[must_use]
    pub fn rounds_remaining(&self, owner: CombatantId, kind: TagKind, current_round: u32) -> u32 {
        self.get(owner, kind).map_or(0, |tag| {
            (tag.round_applied + kind.window(&self.windows)).saturating_sub(current_round + 1)
        })
    }

    // Expired once round_applied < current_round - (window - 1).
    fn is_expired(&self, tag: &Tag, current_round: u32) -> bool {
        tag.round_applied + tag.kind.window(&self.windows) <= current_round
    }

    /// Delete every tag whose window has passed. Returns the removed tags
    /// with their owners, ordered by owner then kind.
    pub fn clear_expired(&mut self, current_round: u32) -> Vec<(CombatantId, Tag)> {
        let mut expired: Vec<(CombatantId, Tag)> = self
            .tags
            .iter()
            .filter(|(_, tag)| self.is_expired(tag, current_round))
            .map(|(&(owner, _), &tag)| (owner, tag))
            .collect();
        expired.sort_by_key(|(owner, tag)| (*owner, tag.kind));

        for (owner, tag) in &expired {
            self.tags.remove(&(*owner, tag.kind));
        }
        expired
    }

    /// All tags on one owner, ordered by kind.
    #[must_use]
    pub fn tags_of(&self, owner: CombatantId) -> Vec<Tag> {
        TagKind::ALL
            .iter()
            .filter_map(|&kind| self.get(owner, kind).copied())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: CombatantId = CombatantId(0);
    const B: CombatantId = CombatantId(1);

    #[test]
    fn test_set_get_remove() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Poisoned, 3, 1);

        assert!(tags.has(A, TagKind::Poisoned));
        assert_eq!(tags.value(A, TagKind::Poisoned), 3);
        assert!(!tags.has(B, TagKind::Poisoned));

        let removed = tags.remove(A, TagKind::Poisoned).unwrap();
        assert_eq!(removed.round_applied, 1);
        assert!(!tags.has(A, TagKind::Poisoned));
        assert_eq!(tags.value(A, TagKind::Poisoned), 0);
    }

    #[test]
    fn test_clear_owner_leaves_others() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Poisoned, 1, 6);
        tags.set(A, TagKind::Hidden, 1, 5);
        tags.set(B, TagKind::Marked, 1, 2);

        let cleared: Vec<_> = tags.clear_owner(A).iter().map(|t| t.kind).collect();

        assert_eq!(cleared, vec![TagKind::Hidden, TagKind::Poisoned]);
        assert!(tags.tags_of(A).is_empty());
        assert!(tags.has(B, TagKind::Marked));
    }

    #[test]
    fn test_add_stacks() {
        let mut tags = TagStore::new();
        tags.add(A, TagKind::Marked, 1, 1);
        tags.add(A, TagKind::Marked, 2, 2);

        let tag = tags.get(A, TagKind::Marked).unwrap();
        assert_eq!(tag.value, 3);
        assert_eq!(tag.round_applied, 2);
    }

    #[test]
    fn test_hidden_expires_after_one_round() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Hidden, 1, 4);

        assert!(tags.clear_expired(4).is_empty());
        assert!(tags.is_active(A, TagKind::Hidden, 4));

        let expired = tags.clear_expired(5);
        assert_eq!(expired.len(), 1);
        assert!(!tags.has(A, TagKind::Hidden));
    }

    #[test]
    fn test_poison_lasts_three_rounds() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Poisoned, 3, 1);

        for round in 1..=3 {
            tags.clear_expired(round);
            assert!(tags.has(A, TagKind::Poisoned), "round {round}");
        }
        tags.clear_expired(4);
        assert!(!tags.has(A, TagKind::Poisoned));
    }

    #[test]
    fn test_mark_lasts_two_rounds() {
        let mut tags = TagStore::new();
        tags.set(B, TagKind::Marked, 2, 3);

        tags.clear_expired(4);
        assert!(tags.has(B, TagKind::Marked));
        assert!(!tags.is_active(B, TagKind::Marked, 5));

        tags.clear_expired(5);
        assert!(!tags.has(B, TagKind::Marked));
    }

    #[test]
    fn test_rounds_remaining() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Poisoned, 3, 1);

        assert_eq!(tags.rounds_remaining(A, TagKind::Poisoned, 1), 2);
        assert_eq!(tags.rounds_remaining(A, TagKind::Poisoned, 3), 0);
        assert_eq!(tags.rounds_remaining(B, TagKind::Poisoned, 1), 0);
    }

    #[test]
    fn test_custom_windows() {
        let mut tags = TagStore::with_windows(TagWindows { hidden: 2, poisoned: 1, marked: 1 });
        tags.set(A, TagKind::Hidden, 1, 1);
        tags.set(A, TagKind::Poisoned, 1, 1);

        let expired = tags.clear_expired(2);
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].1.kind, TagKind::Poisoned);
        assert!(tags.has(A, TagKind::Hidden));
    }

    #[test]
    fn test_tags_of_ordered_by_kind() {
        let mut tags = TagStore::new();
        tags.set(A, TagKind::Marked, 2, 1);
        tags.set(A, TagKind::Hidden, 1, 1);

        let kinds: Vec<_> = tags.tags_of(A).iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TagKind::Hidden, TagKind::Marked]);
    }
}
