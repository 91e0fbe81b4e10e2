//! Achievement badge catalog and unlock evaluation.
//!
//! The catalog is fixed and order-preserving; each badge's threshold is
//! evaluated independently against the derived stats, so unlocking one
//! never affects another.

use crate::config::BadgeThresholds;
use crate::types::Badge;
use once_cell::sync::Lazy;

/// Static definition of a badge, before unlock evaluation
#[derive(Clone, Debug)]
pub struct BadgeSpec {
    pub id: u32,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}

/// Cached badge catalog - built once and reused across all derivations
static BADGE_CATALOG: Lazy<Vec<BadgeSpec>> = Lazy::new(build_badge_catalog);

/// Get a reference to the cached badge catalog, in display order
pub fn badge_catalog() -> &'static [BadgeSpec] {
    &BADGE_CATALOG
}

/// Builds the fixed catalog of achievement badges
pub fn build_badge_catalog() -> Vec<BadgeSpec> {
    vec![
        BadgeSpec {
            id: 1,
            name: "First Step",
            description: "Complete your first check-in",
            icon: "🚀",
        },
        BadgeSpec {
            id: 2,
            name: "Week Warrior",
            description: "Check in 7 days in total",
            icon: "🔥",
        },
        BadgeSpec {
            id: 3,
            name: "Unbroken",
            description: "Check in 3 days in a row",
            icon: "⚡",
        },
        BadgeSpec {
            id: 4,
            name: "Furnace",
            description: "Burn more than 3000 kcal in total",
            icon: "🌋",
        },
        BadgeSpec {
            id: 5,
            name: "Iron King",
            description: "Finish 5 strength sessions",
            icon: "🦍",
        },
        BadgeSpec {
            id: 6,
            name: "Halfway There",
            description: "Reach 50 days of your goal",
            icon: "🏆",
        },
    ]
}

/// Derived values the badge thresholds are checked against
#[derive(Clone, Copy, Debug)]
pub struct BadgeInputs {
    pub total_days: usize,
    pub current_streak: u32,
    pub total_calories: u64,
    pub strength_count: usize,
}

/// Evaluate every badge in the catalog against the derived stats
pub fn evaluate(thresholds: &BadgeThresholds, inputs: BadgeInputs) -> Vec<Badge> {
    badge_catalog()
        .iter()
        .map(|spec| Badge {
            id: spec.id,
            name: spec.name,
            description: spec.description,
            icon: spec.icon,
            unlocked: is_unlocked(spec.id, thresholds, inputs),
        })
        .collect()
}

fn is_unlocked(id: u32, t: &BadgeThresholds, inputs: BadgeInputs) -> bool {
    match id {
        1 => inputs.total_days >= t.first_checkins,
        2 => inputs.total_days >= t.week_checkins,
        3 => inputs.current_streak >= t.streak_days,
        // Strictly greater than: exactly the threshold stays locked
        4 => inputs.total_calories > t.calories_burned,
        5 => inputs.strength_count >= t.strength_sessions,
        6 => inputs.total_days >= t.halfway_checkins,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_activity() -> BadgeInputs {
        BadgeInputs {
            total_days: 0,
            current_streak: 0,
            total_calories: 0,
            strength_count: 0,
        }
    }

    #[test]
    fn test_catalog_is_fixed_and_ordered() {
        let catalog = badge_catalog();
        assert_eq!(catalog.len(), 6);
        let ids: Vec<u32> = catalog.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_all_locked_without_activity() {
        let badges = evaluate(&BadgeThresholds::default(), no_activity());
        assert!(badges.iter().all(|b| !b.unlocked));
    }

    #[test]
    fn test_first_checkin_unlocks_badge_1_only() {
        let badges = evaluate(
            &BadgeThresholds::default(),
            BadgeInputs {
                total_days: 1,
                current_streak: 1,
                total_calories: 200,
                strength_count: 0,
            },
        );
        assert!(badges[0].unlocked);
        assert!(badges[1..].iter().all(|b| !b.unlocked));
    }

    #[test]
    fn test_calories_threshold_is_strict() {
        let mut inputs = no_activity();
        inputs.total_calories = 3000;
        let badges = evaluate(&BadgeThresholds::default(), inputs);
        assert!(!badges[3].unlocked);

        inputs.total_calories = 3001;
        let badges = evaluate(&BadgeThresholds::default(), inputs);
        assert!(badges[3].unlocked);
    }

    #[test]
    fn test_halfway_requires_fifty_days() {
        let mut inputs = no_activity();
        inputs.total_days = 49;
        let badges = evaluate(&BadgeThresholds::default(), inputs);
        assert!(!badges[5].unlocked);

        inputs.total_days = 50;
        let badges = evaluate(&BadgeThresholds::default(), inputs);
        assert!(badges[5].unlocked);
    }

    #[test]
    fn test_custom_thresholds() {
        let thresholds = BadgeThresholds {
            streak_days: 10,
            ..Default::default()
        };
        let mut inputs = no_activity();
        inputs.current_streak = 9;
        let badges = evaluate(&thresholds, inputs);
        assert!(!badges[2].unlocked);
    }
}
