//! Column names used across the pipeline.
//!
//! Raw names follow the FBref-style season export the dataset is built from;
//! derived names are added by the preparer and referenced by weight profiles.

pub const PLAYER: &str = "Player";
pub const SQUAD: &str = "Squad";
pub const AGE: &str = "Age";
pub const POS: &str = "Pos";
pub const COMP: &str = "Comp";

pub const MINUTES: &str = "Min";
pub const GOALS: &str = "Gls";
pub const ASSISTS: &str = "Ast";
pub const SHOTS: &str = "Sh";
pub const SHOTS_ON_TARGET: &str = "SoT";
pub const SHOT_ACCURACY: &str = "SoT%";
pub const SHOTS_PER_90: &str = "Sh/90";
pub const GOALS_PER_SHOT: &str = "G/Sh";
pub const GOALS_PER_SOT: &str = "G/SoT";
pub const NON_PENALTY_GOALS: &str = "G-PK";
pub const PENALTY_GOALS: &str = "PK";
pub const PENALTY_ATTEMPTS: &str = "PKatt";

pub const ASSISTS_PER_90: &str = "Ast_per_90";
pub const TEAM_GOAL_SHARE: &str = "Team_Goal_Share";
pub const LEAGUE_FACTOR: &str = "League_Factor";
pub const ADJ_GOALS: &str = "Adj_Goals";
pub const ADJ_ASSISTS: &str = "Adj_Assists";
pub const ADJ_GOALS_ASSISTS: &str = "Adj_G+A";
pub const ADJ_NON_PENALTY_GOALS: &str = "Adj_Goals_NonPK";

pub const SIMILARITY_SCORE: &str = "Similarity_Score";
pub const ROLE: &str = "Role";

/// Text columns the preparer cannot work without.
pub const REQUIRED_TEXT: [&str; 4] = [PLAYER, SQUAD, POS, COMP];

/// Numeric columns the preparer cannot work without.
pub const REQUIRED_NUMERIC: [&str; 6] = [
    MINUTES,
    GOALS,
    ASSISTS,
    SHOT_ACCURACY,
    SHOTS_PER_90,
    GOALS_PER_SHOT,
];

/// Every raw column coerced to a number; missing ones are skipped unless required.
pub const NUMERIC: [&str; 12] = [
    MINUTES,
    GOALS,
    ASSISTS,
    SHOTS,
    SHOTS_ON_TARGET,
    SHOT_ACCURACY,
    SHOTS_PER_90,
    GOALS_PER_SHOT,
    GOALS_PER_SOT,
    NON_PENALTY_GOALS,
    PENALTY_GOALS,
    PENALTY_ATTEMPTS,
];
