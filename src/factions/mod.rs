//! Faction relationships.
//!
//! Relations gate targeting (hostile, neutral, friendly) and change only
//! when someone is caught stealing.

pub mod matrix;

pub use matrix::{FactionMatrix, Relation};
