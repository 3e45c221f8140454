//! Built-in achievements and the rule that unlocks them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::BASE_SCORE;

/// Solving within this many seconds unlocks "Speed Demon".
pub const SPEED_DEMON_MAX_SECS: u64 = 30;
/// Attempts needed for "Never Give Up".
pub const NEVER_GIVE_UP_ATTEMPTS: u32 = 5;
/// Previously completed puzzles needed for "Puzzle Master".
pub const PUZZLE_MASTER_THRESHOLD: usize = 10;

/// Achievement tier determining rarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl AchievementTier {
    /// Returns the display name.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }

    /// Returns the CSS class for styling.
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Bronze => "achievement-bronze",
            Self::Silver => "achievement-silver",
            Self::Gold => "achievement-gold",
            Self::Platinum => "achievement-platinum",
        }
    }
}

/// A built-in achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier: AchievementTier,
}

impl AchievementDef {
    const fn new(
        id: &'static str,
        name: &'static str,
        description: &'static str,
        tier: AchievementTier,
    ) -> Self {
        Self {
            id,
            name,
            description,
            tier,
        }
    }

    /// Persisted descriptor for this definition.
    #[must_use]
    pub fn descriptor(&self) -> Achievement {
        Achievement {
            name: self.name.to_string(),
            description: self.description.to_string(),
            tier: self.tier,
        }
    }

    fn is_met(&self, ctx: &CompletionContext) -> bool {
        match self.id {
            "speed_demon" => ctx.elapsed_secs <= SPEED_DEMON_MAX_SECS,
            "pure_genius" => ctx.hints == 0,
            "perfect_score" => ctx.score == BASE_SCORE,
            "never_give_up" => ctx.attempts >= NEVER_GIVE_UP_ATTEMPTS,
            "puzzle_master" => ctx.completed_before >= PUZZLE_MASTER_THRESHOLD,
            _ => false,
        }
    }
}

/// All available achievements.
pub const ACHIEVEMENTS: &[AchievementDef] = &[
    AchievementDef::new(
        "speed_demon",
        "Speed Demon",
        "Solve a puzzle in 30 seconds or less",
        AchievementTier::Silver,
    ),
    AchievementDef::new(
        "pure_genius",
        "Pure Genius",
        "Solve a puzzle without using any hints",
        AchievementTier::Gold,
    ),
    AchievementDef::new(
        "perfect_score",
        "Perfect Score",
        "Earn the full 1000 points on a puzzle",
        AchievementTier::Gold,
    ),
    AchievementDef::new(
        "never_give_up",
        "Never Give Up",
        "Solve a puzzle after 5 or more attempts",
        AchievementTier::Bronze,
    ),
    AchievementDef::new(
        "puzzle_master",
        "Puzzle Master",
        "Complete 10 puzzles",
        AchievementTier::Platinum,
    ),
];

/// Persisted form of an unlocked achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub tier: AchievementTier,
}

/// Facts about one successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionContext {
    pub elapsed_secs: u64,
    pub attempts: u32,
    pub hints: u32,
    pub score: u32,
    /// Completed puzzles before this one was added.
    pub completed_before: usize,
}

/// Definitions whose condition holds for `ctx`, in table order.
#[must_use]
pub fn evaluate_achievements(ctx: &CompletionContext) -> Vec<&'static AchievementDef> {
    ACHIEVEMENTS.iter().filter(|def| def.is_met(ctx)).collect()
}

/// Unlocked achievements keyed by definition id. Entries are never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementRecord {
    unlocked: BTreeMap<String, Achievement>,
}

impl AchievementRecord {
    /// Unlock `def`. Returns `false` if it was already unlocked.
    pub fn unlock(&mut self, def: &AchievementDef) -> bool {
        if self.unlocked.contains_key(def.id) {
            return false;
        }
        self.unlocked.insert(def.id.to_string(), def.descriptor());
        true
    }

    #[must_use]
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Achievement> {
        self.unlocked.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.unlocked.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unlocked.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Achievement)> {
        self.unlocked.iter().map(|(id, achievement)| (id.as_str(), achievement))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> CompletionContext {
        CompletionContext {
            elapsed_secs: 120,
            attempts: 1,
            hints: 1,
            score: 500,
            completed_before: 0,
        }
    }

    fn ids(ctx: &CompletionContext) -> Vec<&'static str> {
        evaluate_achievements(ctx).iter().map(|def| def.id).collect()
    }

    #[test]
    fn ordinary_solve_unlocks_nothing() {
        assert!(ids(&ctx()).is_empty());
    }

    #[test]
    fn fast_hintless_perfect_solve() {
        let ctx = CompletionContext {
            elapsed_secs: 9,
            attempts: 0,
            hints: 0,
            score: 1000,
            ..ctx()
        };
        assert_eq!(ids(&ctx), ["speed_demon", "pure_genius", "perfect_score"]);
    }

    #[test]
    fn speed_demon_boundary_is_inclusive() {
        let at = CompletionContext {
            elapsed_secs: 30,
            ..ctx()
        };
        let over = CompletionContext {
            elapsed_secs: 31,
            ..ctx()
        };
        assert_eq!(ids(&at), ["speed_demon"]);
        assert!(ids(&over).is_empty());
    }

    #[test]
    fn persistence_and_mastery_thresholds() {
        let ctx = CompletionContext {
            attempts: 6,
            completed_before: 10,
            ..ctx()
        };
        assert_eq!(ids(&ctx), ["never_give_up", "puzzle_master"]);

        let nine = CompletionContext {
            completed_before: 9,
            ..ctx
        };
        assert_eq!(ids(&nine), ["never_give_up"]);
    }

    #[test]
    fn unlock_is_monotonic() {
        let mut record = AchievementRecord::default();
        assert!(record.unlock(&ACHIEVEMENTS[0]));
        assert!(!record.unlock(&ACHIEVEMENTS[0]));
        assert_eq!(record.len(), 1);
        assert_eq!(record.get("speed_demon").unwrap().name, "Speed Demon");
    }

    #[test]
    fn record_serializes_as_id_map() {
        let mut record = AchievementRecord::default();
        record.unlock(&ACHIEVEMENTS[3]);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["never_give_up"]["tier"], "bronze");
        let back: AchievementRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
