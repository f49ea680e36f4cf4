/// How a match log reports: one block of per-player lines every
/// `tick_interval_secs` of game time. Production logs carry 10 players per
/// tick; tests may use reduced rosters.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub tick_interval_secs: usize,
    pub players_per_tick: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            tick_interval_secs: 5,
            players_per_tick: 10,
        }
    }
}

/// The fixed hero roster, shared by the aggregation and ranking components.
/// Order here is the outer index order of the hero leaderboard artifact.
pub const HEROES: &[&str] = &[
    "ana", "ashe", "baptiste", "bastion", "brigitte", "cassidy", "d.va",
    "doomfist", "echo", "genji", "hanzo", "illari", "junker queen", "junkrat",
    "juno", "kiriko", "lifeweaver", "lúcio", "mauga", "mei", "mercy", "moira",
    "orisa", "pharah", "ramattra", "reaper", "reinhardt", "roadhog", "sigma",
    "sojourn", "soldier: 76", "sombra", "symmetra", "torbjörn", "tracer",
    "venture", "widowmaker", "winston", "wrecking ball", "zarya", "zenyatta",
];

/// Map the shorthand people actually type to the roster spelling.
pub fn canonical_hero_name(hero: &str) -> String {
    match hero {
        "lucio" => "lúcio".to_string(),
        "jq" | "queen" | "junker" | "junkerqueen" => "junker queen".to_string(),
        "dva" | "d" => "d.va".to_string(),
        "ball" | "hammond" | "hamster" | "wrecking" | "wreckingball" => {
            "wrecking ball".to_string()
        }
        "torb" | "torbjorn" => "torbjörn".to_string(),
        "brig" | "briggite" | "briggitte" => "brigitte".to_string(),
        "soldier" | "soldier:" | "soldier76" | "soldier:76" => "soldier: 76".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn aliases_resolve_to_roster_names() {
        for alias in ["lucio", "jq", "dva", "hammond", "torb", "brig", "soldier76"] {
            let canonical = canonical_hero_name(alias);
            assert!(
                HEROES.contains(&canonical.as_str()),
                "{alias} resolved to {canonical}, which is not on the roster"
            );
        }
    }

    #[test]
    fn roster_names_pass_through() {
        assert_eq!(canonical_hero_name("ana"), "ana");
        assert_eq!(canonical_hero_name("wrecking ball"), "wrecking ball");
    }
}
