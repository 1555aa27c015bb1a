//! Integration tests for environment configuration.

use dodgeball_tournament_web::{ConfigError, RankingRule, ServerConfig};
use std::collections::HashMap;

fn from_pairs(pairs: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
    let env: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    ServerConfig::from_lookup(|key| env.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    assert_eq!(from_pairs(&[]).unwrap(), ServerConfig::default());
    let cfg = ServerConfig::default();
    assert_eq!((cfg.host.as_str(), cfg.port, cfg.bracket_size), ("0.0.0.0", 8080, 16));
    assert_eq!(cfg.ranking_rule, RankingRule::Sequential);
}

#[test]
fn reads_every_key() {
    let cfg = from_pairs(&[
        ("HOST", "127.0.0.1"),
        ("PORT", "9000"),
        ("BRACKET_SIZE", "8"),
        ("RANKING_RULE", "points"),
    ])
    .unwrap();
    assert_eq!(cfg.host, "127.0.0.1");
    assert_eq!(cfg.port, 9000);
    assert_eq!(cfg.bracket_size, 8);
    assert_eq!(cfg.ranking_rule, RankingRule::Points);
}

#[test]
fn rejects_bad_values() {
    assert_eq!(
        from_pairs(&[("PORT", "eighty")]),
        Err(ConfigError::Invalid {
            key: "PORT",
            value: "eighty".into()
        })
    );
    assert!(matches!(
        from_pairs(&[("BRACKET_SIZE", "12")]),
        Err(ConfigError::Invalid {
            key: "BRACKET_SIZE",
            ..
        })
    ));
    assert!(from_pairs(&[("RANKING_RULE", "elo")]).is_err());
}
