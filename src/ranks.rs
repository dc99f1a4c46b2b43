//! Career ranks unlocked by reaching level thresholds

/// A career step: reaching `level` earns `title`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rank {
    pub level: u32,
    pub title: &'static str,
    pub description: &'static str,
}

/// Ascending by level
pub const CAREER_RANKS: &[Rank] = &[
    Rank {
        level: 1,
        title: "Medical Volunteer",
        description: "Just a helpful person with a syringe",
    },
    Rank {
        level: 2,
        title: "Nursing Assistant",
        description: "Learning the basics of hemorrhoid treatment",
    },
    Rank {
        level: 3,
        title: "Registered Nurse",
        description: "Skilled in basic procedures",
    },
    Rank {
        level: 4,
        title: "Physician Assistant",
        description: "Able to handle most hemorrhoid cases",
    },
    Rank {
        level: 5,
        title: "General Practitioner",
        description: "A qualified doctor with some proctology knowledge",
    },
    Rank {
        level: 7,
        title: "Proctology Resident",
        description: "Specializing in treating hemorrhoids",
    },
    Rank {
        level: 9,
        title: "Proctologist",
        description: "An expert in the field",
    },
    Rank {
        level: 12,
        title: "Chief of Proctology",
        description: "Leading the department",
    },
    Rank {
        level: 15,
        title: "Hemorrhoid Research Fellow",
        description: "Studying advanced treatments",
    },
    Rank {
        level: 18,
        title: "Master Proctologist",
        description: "Recognized authority in the field",
    },
    Rank {
        level: 20,
        title: "Legendary Hemorrhoid Hunter",
        description: "Your name is known worldwide",
    },
];

/// Highest rank whose threshold is at or below `level`
pub fn current_rank(level: u32) -> &'static Rank {
    CAREER_RANKS
        .iter()
        .rev()
        .find(|rank| rank.level <= level)
        .unwrap_or(&CAREER_RANKS[0])
}

/// True when reaching `level` unlocks a rank
pub fn is_new_rank(level: u32) -> bool {
    CAREER_RANKS.iter().any(|rank| rank.level == level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_ascending() {
        assert!(CAREER_RANKS.windows(2).all(|w| w[0].level < w[1].level));
    }

    #[test]
    fn test_highest_threshold_wins() {
        assert_eq!(current_rank(1).title, "Medical Volunteer");
        assert_eq!(current_rank(6).title, "General Practitioner");
        assert_eq!(current_rank(8).title, "Proctology Resident");
        assert_eq!(current_rank(20).title, "Legendary Hemorrhoid Hunter");
        assert_eq!(current_rank(99).title, "Legendary Hemorrhoid Hunter");
    }

    #[test]
    fn test_level_zero_falls_back_to_first_rank() {
        assert_eq!(current_rank(0).level, 1);
    }

    #[test]
    fn test_new_rank_levels() {
        assert!(is_new_rank(1));
        assert!(is_new_rank(7));
        assert!(!is_new_rank(6));
        assert!(!is_new_rank(21));
    }
}
