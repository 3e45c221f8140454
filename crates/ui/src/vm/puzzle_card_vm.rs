use services::{AchievementStatus, PuzzleListItem};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PuzzleCardVm {
    pub id: String,
    pub title: String,
    pub image_src: String,
    pub completed: bool,
    pub score_label: String,
}

impl From<&PuzzleListItem> for PuzzleCardVm {
    fn from(item: &PuzzleListItem) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.clone(),
            image_src: item.image_src.clone(),
            completed: item.completed,
            score_label: format!("Score: {}", item.score),
        }
    }
}

#[must_use]
pub fn map_puzzle_cards(items: &[PuzzleListItem]) -> Vec<PuzzleCardVm> {
    items.iter().map(PuzzleCardVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AchievementVm {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub tier_label: &'static str,
    pub tier_class: &'static str,
    pub unlocked: bool,
}

impl From<&AchievementStatus> for AchievementVm {
    fn from(status: &AchievementStatus) -> Self {
        Self {
            id: status.def.id,
            name: status.def.name,
            description: status.def.description,
            tier_label: status.def.tier.display_name(),
            tier_class: status.def.tier.css_class(),
            unlocked: status.unlocked,
        }
    }
}

#[must_use]
pub fn map_achievements(statuses: &[AchievementStatus]) -> Vec<AchievementVm> {
    statuses.iter().map(AchievementVm::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::model::{ACHIEVEMENTS, PuzzleId};

    #[test]
    fn card_shows_score_only_as_label() {
        let item = PuzzleListItem {
            id: PuzzleId::new("4"),
            title: "Puzzle #4".into(),
            image_src: "img/4.jpg".into(),
            completed: true,
            score: 650,
        };
        let card = PuzzleCardVm::from(&item);
        assert_eq!(card.id, "4");
        assert_eq!(card.score_label, "Score: 650");
    }

    #[test]
    fn achievement_carries_tier_styling() {
        let status = AchievementStatus {
            def: &ACHIEVEMENTS[4],
            unlocked: false,
        };
        let vm = AchievementVm::from(&status);
        assert_eq!(vm.tier_label, "Platinum");
        assert_eq!(vm.tier_class, "achievement-platinum");
        assert!(!vm.unlocked);
    }
}
