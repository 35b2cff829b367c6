//! Symmetric faction relationship matrix.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::entity::Faction;
use crate::core::EngineError;

/// Stance between two factions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Hostile,
    #[default]
    Neutral,
    Friendly,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Relation::Hostile => "hostile",
            Relation::Neutral => "neutral",
            Relation::Friendly => "friendly",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Relation {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hostile" => Ok(Relation::Hostile),
            "neutral" => Ok(Relation::Neutral),
            "friendly" => Ok(Relation::Friendly),
            other => Err(EngineError::UnknownRelation(other.to_string())),
        }
    }
}

/// Pairwise faction stances. Unset pairs, including a faction with
/// itself, read as neutral. Every write updates both directions.
///
/// ```
/// use rust_skirmish::core::Faction;
/// use rust_skirmish::factions::{FactionMatrix, Relation};
///
/// let players = Faction::new("players");
/// let traders = Faction::new("traders");
///
/// let mut matrix = FactionMatrix::new();
/// assert_eq!(matrix.relationship(&players, &traders), Relation::Neutral);
///
/// matrix.set_relationship(&players, &traders, Relation::Hostile);
/// assert_eq!(matrix.relationship(&traders, &players), Relation::Hostile);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactionMatrix {
    relations: FxHashMap<Faction, FxHashMap<Faction, Relation>>,
}

impl FactionMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from `(a, b, relation)` rows.
    ///
    /// Relation names are parsed here so bad scenario data is rejected
    /// before any encounter starts.
    pub fn from_rows<'a>(
        rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    ) -> Result<Self, EngineError> {
        let mut matrix = Self::new();
        for (a, b, relation) in rows {
            let relation: Relation = relation.parse()?;
            matrix.set_relationship(&Faction::new(a), &Faction::new(b), relation);
        }
        Ok(matrix)
    }

    /// Stance of `a` towards `b`.
    #[must_use]
    pub fn relationship(&self, a: &Faction, b: &Faction) -> Relation {
        self.relations
            .get(a)
            .and_then(|row| row.get(b))
            .copied()
            .unwrap_or_default()
    }

    /// Set the stance between `a` and `b` in both directions.
    pub fn set_relationship(&mut self, a: &Faction, b: &Faction, relation: Relation) {
        debug!(%a, %b, %relation, "faction relationship set");
        self.relations
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), relation);
        self.relations
            .entry(b.clone())
            .or_default()
            .insert(a.clone(), relation);
    }

    /// Check if `a` and `b` are hostile.
    #[must_use]
    pub fn is_hostile(&self, a: &Faction, b: &Faction) -> bool {
        self.relationship(a, b) == Relation::Hostile
    }

    /// Check that every stored pair reads the same in both directions.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.relations.iter().all(|(a, row)| {
            row.iter()
                .all(|(b, &relation)| self.relationship(b, a) == relation)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f(name: &str) -> Faction {
        Faction::new(name)
    }

    #[test]
    fn test_default_is_neutral() {
        let matrix = FactionMatrix::new();
        assert_eq!(matrix.relationship(&f("a"), &f("b")), Relation::Neutral);
        assert_eq!(matrix.relationship(&f("a"), &f("a")), Relation::Neutral);
    }

    #[test]
    fn test_set_is_symmetric() {
        let mut matrix = FactionMatrix::new();
        matrix.set_relationship(&f("players"), &f("monsters"), Relation::Hostile);
        matrix.set_relationship(&f("players"), &f("players"), Relation::Friendly);

        assert!(matrix.is_hostile(&f("monsters"), &f("players")));
        assert_eq!(matrix.relationship(&f("players"), &f("players")), Relation::Friendly);
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_overwrite() {
        let mut matrix = FactionMatrix::new();
        matrix.set_relationship(&f("a"), &f("b"), Relation::Friendly);
        matrix.set_relationship(&f("b"), &f("a"), Relation::Hostile);

        assert_eq!(matrix.relationship(&f("a"), &f("b")), Relation::Hostile);
        assert!(matrix.is_symmetric());
    }

    #[test]
    fn test_from_rows() {
        let matrix = FactionMatrix::from_rows([
            ("players", "monsters", "hostile"),
            ("players", "traders", "neutral"),
        ])
        .unwrap();
        assert!(matrix.is_hostile(&f("monsters"), &f("players")));

        let err = FactionMatrix::from_rows([("a", "b", "allied")]).unwrap_err();
        assert!(matches!(err, EngineError::UnknownRelation(_)));
    }
}
