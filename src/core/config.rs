//! Numeric rules configuration.
//!
//! The card set is closed, but its numbers are data. `RulesConfig::default()`
//! carries the standard rules:
//!
//! | Rule | Default |
//! |---|---|
//! | Attack base damage | 1 |
//! | Backstab base damage | 3 |
//! | Execute base damage | 3 |
//! | Bonus damage against a marked target | 1 |
//! | Hidden duration | 1 round |
//! | Poisoned duration | 3 rounds |
//! | Marked duration | 2 rounds |

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Expiry windows for timed tags, in encounter rounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagWindows {
    pub hidden: u32,
    pub poisoned: u32,
    pub marked: u32,
}

impl Default for TagWindows {
    fn default() -> Self {
        Self {
            hidden: 1,
            poisoned: 3,
            marked: 2,
        }
    }
}

/// Rules numbers used by the phase resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    pub attack_damage: u32,
    pub backstab_damage: u32,
    pub execute_damage: u32,
    pub marked_bonus: u32,
    pub windows: TagWindows,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            attack_damage: 1,
            backstab_damage: 3,
            execute_damage: 3,
            marked_bonus: 1,
            windows: TagWindows::default(),
        }
    }
}

impl RulesConfig {
    /// Create the standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set Attack base damage.
    #[must_use]
    pub fn with_attack_damage(mut self, damage: u32) -> Self {
        self.attack_damage = damage;
        self
    }

    /// Set Backstab base damage.
    #[must_use]
    pub fn with_backstab_damage(mut self, damage: u32) -> Self {
        self.backstab_damage = damage;
        self
    }

    /// Set Execute base damage.
    #[must_use]
    pub fn with_execute_damage(mut self, damage: u32) -> Self {
        self.execute_damage = damage;
        self
    }

    /// Set the extra damage dealt to marked targets.
    #[must_use]
    pub fn with_marked_bonus(mut self, bonus: u32) -> Self {
        self.marked_bonus = bonus;
        self
    }

    /// Set the tag expiry windows.
    #[must_use]
    pub fn with_windows(mut self, windows: TagWindows) -> Self {
        self.windows = windows;
        self
    }

    /// Reject configurations that would make a card type meaningless.
    pub fn validate(&self) -> Result<(), EngineError> {
        let damages = [
            ("attack", self.attack_damage),
            ("backstab", self.backstab_damage),
            ("execute", self.execute_damage),
        ];
        for (card, damage) in damages {
            if damage == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{card} damage must be at least 1"
                )));
            }
        }

        let windows = [
            ("hidden", self.windows.hidden),
            ("poisoned", self.windows.poisoned),
            ("marked", self.windows.marked),
        ];
        for (tag, window) in windows {
            if window == 0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{tag} duration must be at least 1"
                )));
            }
        }

        Ok(())
    }
}
