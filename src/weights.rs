use serde::Serialize;

use crate::columns::{
    ADJ_ASSISTS, ADJ_GOALS, ADJ_GOALS_ASSISTS, ADJ_NON_PENALTY_GOALS, ASSISTS_PER_90, GOALS,
    GOALS_PER_SHOT, GOALS_PER_SOT, LEAGUE_FACTOR, NON_PENALTY_GOALS, SHOT_ACCURACY,
    SHOTS_ON_TARGET, SHOTS_PER_90, TEAM_GOAL_SHARE,
};
use crate::role::Role;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureWeight {
    pub feature: &'static str,
    pub weight: f64,
}

const fn fw(feature: &'static str, weight: f64) -> FeatureWeight {
    FeatureWeight { feature, weight }
}

/// Weights every profile carries on top of its role-specific set.
pub const UNIVERSAL_WEIGHTS: [FeatureWeight; 2] =
    [fw(TEAM_GOAL_SHARE, 1.5), fw(LEAGUE_FACTOR, 1.0)];

const SHADOW_STRIKER: &[FeatureWeight] = &[
    fw(ASSISTS_PER_90, 2.0),
    fw(ADJ_ASSISTS, 1.5),
    fw(ADJ_GOALS_ASSISTS, 1.3),
    fw(SHOT_ACCURACY, 1.2),
    fw(SHOTS_PER_90, 1.0),
    fw(GOALS_PER_SHOT, 1.0),
];

const INSIDE_FORWARD: &[FeatureWeight] = &[
    fw(SHOTS_PER_90, 1.8),
    fw(SHOT_ACCURACY, 1.5),
    fw(ADJ_GOALS, 1.3),
    fw(GOALS_PER_SHOT, 1.2),
    fw(ASSISTS_PER_90, 1.0),
    fw(NON_PENALTY_GOALS, 1.0),
];

const ATTACKING_WINGER: &[FeatureWeight] = &[
    fw(SHOTS_PER_90, 2.0),
    fw(ASSISTS_PER_90, 1.2),
    fw(ADJ_GOALS_ASSISTS, 1.2),
    fw(SHOT_ACCURACY, 1.0),
    fw(ADJ_ASSISTS, 1.0),
    fw(GOALS_PER_SHOT, 0.8),
];

const SUPPORTING_WINGER: &[FeatureWeight] = &[
    fw(ASSISTS_PER_90, 1.8),
    fw(ADJ_ASSISTS, 1.5),
    fw(ADJ_GOALS_ASSISTS, 1.0),
    fw(SHOTS_PER_90, 1.0),
    fw(SHOT_ACCURACY, 0.8),
    fw(GOALS_PER_SHOT, 0.6),
];

const KILLER_STRIKER: &[FeatureWeight] = &[
    fw(GOALS_PER_SHOT, 2.0),
    fw(SHOT_ACCURACY, 1.8),
    fw(ADJ_NON_PENALTY_GOALS, 1.5),
    fw(ADJ_GOALS, 1.2),
    fw(GOALS_PER_SOT, 1.2),
    fw(SHOTS_PER_90, 1.0),
];

const ELITE_STRIKER: &[FeatureWeight] = &[
    fw(SHOTS_PER_90, 2.0),
    fw(ADJ_GOALS, 1.8),
    fw(ADJ_NON_PENALTY_GOALS, 1.3),
    fw(GOALS, 1.2),
    fw(GOALS_PER_SHOT, 1.2),
    fw(SHOTS_ON_TARGET, 1.0),
    fw(SHOT_ACCURACY, 1.0),
];

const STRIKER: &[FeatureWeight] = &[
    fw(SHOTS_PER_90, 1.5),
    fw(ADJ_GOALS, 1.5),
    fw(GOALS_PER_SHOT, 1.2),
    fw(SHOT_ACCURACY, 1.2),
    fw(NON_PENALTY_GOALS, 1.0),
    fw(ASSISTS_PER_90, 0.8),
];

const SUPPORT_STRIKER: &[FeatureWeight] = &[
    fw(ASSISTS_PER_90, 1.8),
    fw(ADJ_ASSISTS, 1.5),
    fw(ADJ_GOALS_ASSISTS, 1.3),
    fw(SHOTS_PER_90, 1.0),
    fw(GOALS_PER_SHOT, 0.8),
    fw(SHOT_ACCURACY, 0.8),
];

/// Used when a role label does not parse.
const DEFAULT_PROFILE: &[FeatureWeight] = &[
    fw(SHOTS_PER_90, 1.0),
    fw(GOALS_PER_SHOT, 1.0),
    fw(SHOT_ACCURACY, 1.0),
    fw(ASSISTS_PER_90, 1.0),
    fw(ADJ_GOALS_ASSISTS, 1.0),
    fw(NON_PENALTY_GOALS, 1.0),
];

/// Feature importance weights for one role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightProfile {
    pub role: Option<Role>,
    features: Vec<FeatureWeight>,
}

impl WeightProfile {
    fn from_specific(role: Option<Role>, specific: &[FeatureWeight]) -> Self {
        let mut features = Vec::with_capacity(specific.len() + UNIVERSAL_WEIGHTS.len());
        features.extend_from_slice(specific);
        features.extend_from_slice(&UNIVERSAL_WEIGHTS);
        Self { role, features }
    }

    pub fn features(&self) -> &[FeatureWeight] {
        &self.features
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|fw| fw.feature == feature)
            .map(|fw| fw.weight)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

pub fn weights_for(role: Role) -> WeightProfile {
    let specific = match role {
        Role::ShadowStrikerCreator => SHADOW_STRIKER,
        Role::InsideForward => INSIDE_FORWARD,
        Role::AttackingWinger => ATTACKING_WINGER,
        Role::SupportingWinger => SUPPORTING_WINGER,
        Role::KillerStriker => KILLER_STRIKER,
        Role::EliteStriker => ELITE_STRIKER,
        Role::Striker => STRIKER,
        Role::SupportStriker => SUPPORT_STRIKER,
    };
    WeightProfile::from_specific(Some(role), specific)
}

/// Lookup by display label; unknown labels get the default profile.
pub fn weights_for_label(label: &str) -> WeightProfile {
    match label.parse::<Role>() {
        Ok(role) => weights_for(role),
        Err(_) => WeightProfile::from_specific(None, DEFAULT_PROFILE),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_profile_has_universal_weights() {
        for role in Role::ALL {
            let profile = weights_for(role);
            assert_eq!(profile.get(TEAM_GOAL_SHARE), Some(1.5), "{role}");
            assert_eq!(profile.get(LEAGUE_FACTOR), Some(1.0), "{role}");
        }
    }

    #[test]
    fn profiles_are_closed_and_positive() {
        for role in Role::ALL {
            let profile = weights_for(role);
            let specific = profile.len() - UNIVERSAL_WEIGHTS.len();
            assert!((6..=8).contains(&specific), "{role} has {specific}");
            assert!(profile.features().iter().all(|fw| fw.weight > 0.0));

            let names: HashSet<_> = profile.features().iter().map(|fw| fw.feature).collect();
            assert_eq!(names.len(), profile.len(), "{role} repeats a feature");
        }
    }

    #[test]
    fn label_lookup_matches_enum_lookup() {
        assert_eq!(
            weights_for_label("Killer Striker"),
            weights_for(Role::KillerStriker)
        );
    }

    #[test]
    fn unknown_label_falls_back_to_default() {
        let profile = weights_for_label("Regista");
        assert!(profile.role.is_none());
        assert!(!profile.is_empty());
        assert_eq!(profile.get(TEAM_GOAL_SHARE), Some(1.5));
        assert_eq!(profile.get(SHOTS_PER_90), Some(1.0));
    }
}
