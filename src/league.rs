/// Difficulty factor for competitions missing from [`LEAGUE_FACTORS`].
pub const DEFAULT_LEAGUE_FACTOR: f64 = 0.75;

/// Top-five league difficulty multipliers, strongest first.
pub const LEAGUE_FACTORS: [(&str, f64); 5] = [
    ("Premier League", 1.00),
    ("La Liga", 0.97),
    ("Serie A", 0.95),
    ("Bundesliga", 0.92),
    ("Ligue 1", 0.89),
];

/// Strip a leading country code (`eng`, `es`, `de`, ...) from a competition string.
///
/// Only a first token of 2-3 lowercase ASCII letters counts as a code, so names
/// like `La Liga` are left alone.
pub fn clean_league_name(comp: &str) -> &str {
    let comp = comp.trim();
    let Some((head, rest)) = comp.split_once(char::is_whitespace) else {
        return comp;
    };
    let is_code = (2..=3).contains(&head.len()) && head.chars().all(|c| c.is_ascii_lowercase());
    if is_code { rest.trim_start() } else { comp }
}

pub fn league_factor(league: &str) -> f64 {
    LEAGUE_FACTORS
        .iter()
        .find(|(name, _)| *name == league)
        .map(|(_, factor)| *factor)
        .unwrap_or(DEFAULT_LEAGUE_FACTOR)
}

pub fn is_known_league(league: &str) -> bool {
    LEAGUE_FACTORS.iter().any(|(name, _)| *name == league)
}
