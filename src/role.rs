use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub const FORWARD_MARKER: &str = "FW";
pub const MIDFIELDER_MARKER: &str = "MF";

/// Attacking archetype assigned once per prepared player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "Shadow Striker / Creator")]
    ShadowStrikerCreator,
    #[serde(rename = "Winger / Inside Forward")]
    InsideForward,
    #[serde(rename = "Winger (Attacking)")]
    AttackingWinger,
    #[serde(rename = "Supporting Winger")]
    SupportingWinger,
    #[serde(rename = "Killer Striker")]
    KillerStriker,
    #[serde(rename = "Elite Striker")]
    EliteStriker,
    #[serde(rename = "Striker")]
    Striker,
    #[serde(rename = "Support Striker")]
    SupportStriker,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::ShadowStrikerCreator,
        Role::InsideForward,
        Role::AttackingWinger,
        Role::SupportingWinger,
        Role::KillerStriker,
        Role::EliteStriker,
        Role::Striker,
        Role::SupportStriker,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::ShadowStrikerCreator => "Shadow Striker / Creator",
            Role::InsideForward => "Winger / Inside Forward",
            Role::AttackingWinger => "Winger (Attacking)",
            Role::SupportingWinger => "Supporting Winger",
            Role::KillerStriker => "Killer Striker",
            Role::EliteStriker => "Elite Striker",
            Role::Striker => "Striker",
            Role::SupportStriker => "Support Striker",
        }
    }

    /// Badge shown next to the label by front ends.
    pub fn icon(self) -> &'static str {
        match self {
            Role::ShadowStrikerCreator => "👻",
            Role::InsideForward => "🚀",
            Role::AttackingWinger => "⚡",
            Role::SupportingWinger => "🏹",
            Role::KillerStriker => "💀",
            Role::EliteStriker => "🎯",
            Role::Striker => "⚽",
            Role::SupportStriker => "🔗",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown role: {wanted}"))
    }
}

/// The slice of a player's profile the classifier looks at.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatLine {
    pub position: String,
    pub shots_per_90: f64,
    pub goals_per_shot: f64,
    pub shot_accuracy: f64,
    pub assists_per_90: f64,
    pub goals: f64,
}

pub fn is_midfielder(position: &str) -> bool {
    position.contains(MIDFIELDER_MARKER)
}

pub fn is_forward(position: &str) -> bool {
    position.contains(FORWARD_MARKER)
}

/// Ordered rule cascade; the first matching rule wins.
pub fn classify(row: &StatLine) -> Role {
    if is_midfielder(&row.position) {
        if row.assists_per_90 >= 0.19 && row.shot_accuracy >= 30.0 {
            Role::ShadowStrikerCreator
        } else if row.shots_per_90 >= 2.8 && row.shot_accuracy >= 35.0 {
            Role::InsideForward
        } else if row.shots_per_90 > 2.5 {
            Role::AttackingWinger
        } else {
            Role::SupportingWinger
        }
    } else if row.goals_per_shot >= 0.15 && row.shot_accuracy > 35.0 {
        Role::KillerStriker
    } else if row.shots_per_90 >= 3.0 && row.goals >= 5.0 {
        Role::EliteStriker
    } else if row.shots_per_90 >= 2.2 {
        Role::Striker
    } else {
        Role::SupportStriker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fw() -> StatLine {
        StatLine {
            position: "FW".to_string(),
            ..Default::default()
        }
    }

    fn mf() -> StatLine {
        StatLine {
            position: "MF".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn efficient_forward_is_killer_before_elite() {
        let row = StatLine {
            shots_per_90: 3.2,
            goals: 6.0,
            goals_per_shot: 0.16,
            shot_accuracy: 40.0,
            ..fw()
        };
        assert_eq!(classify(&row), Role::KillerStriker);
    }

    #[test]
    fn forward_cascade() {
        let elite = StatLine {
            shots_per_90: 3.0,
            goals: 5.0,
            goals_per_shot: 0.10,
            shot_accuracy: 40.0,
            ..fw()
        };
        assert_eq!(classify(&elite), Role::EliteStriker);

        // Accuracy must be strictly above 35.
        let edge = StatLine {
            goals_per_shot: 0.20,
            shot_accuracy: 35.0,
            shots_per_90: 2.2,
            ..fw()
        };
        assert_eq!(classify(&edge), Role::Striker);

        let support = StatLine {
            shots_per_90: 2.19,
            ..fw()
        };
        assert_eq!(classify(&support), Role::SupportStriker);
    }

    #[test]
    fn creator_midfielder() {
        let row = StatLine {
            assists_per_90: 0.25,
            shot_accuracy: 32.0,
            ..mf()
        };
        assert_eq!(classify(&row), Role::ShadowStrikerCreator);
    }

    #[test]
    fn midfield_cascade() {
        let inside = StatLine {
            shots_per_90: 2.8,
            shot_accuracy: 35.0,
            assists_per_90: 0.1,
            ..mf()
        };
        assert_eq!(classify(&inside), Role::InsideForward);

        let attacking = StatLine {
            shots_per_90: 2.6,
            shot_accuracy: 20.0,
            ..mf()
        };
        assert_eq!(classify(&attacking), Role::AttackingWinger);

        // Strictly above 2.5 shots.
        let supporting = StatLine {
            shots_per_90: 2.5,
            ..mf()
        };
        assert_eq!(classify(&supporting), Role::SupportingWinger);
    }

    #[test]
    fn midfield_marker_takes_precedence() {
        let row = StatLine {
            position: "FW,MF".to_string(),
            goals_per_shot: 0.3,
            shot_accuracy: 50.0,
            ..Default::default()
        };
        assert_eq!(classify(&row), Role::SupportingWinger);
    }

    #[test]
    fn classify_is_pure() {
        let row = StatLine {
            shots_per_90: 2.9,
            goals_per_shot: 0.12,
            shot_accuracy: 36.0,
            assists_per_90: 0.1,
            goals: 4.0,
            ..mf()
        };
        let first = classify(&row);
        for _ in 0..10 {
            assert_eq!(classify(&row), first);
        }
    }

    #[test]
    fn labels_round_trip_through_from_str() {
        for role in Role::ALL {
            assert_eq!(role.label().parse::<Role>(), Ok(role));
        }
        assert!("Goalkeeper".parse::<Role>().is_err());
    }
}
