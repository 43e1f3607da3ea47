//! Process configuration read from the environment.

use core::time::Duration;

use crate::options::{DeckVariant, TableOptions};

/// Listening address, seed and table options of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Shuffle seed; random when unset.
    pub seed: Option<u64>,
    /// Options of the hosted table.
    pub table: TableOptions,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            seed: None,
            table: TableOptions::default(),
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from `BJ_*` environment variables, falling
    /// back to the defaults for anything missing or unparseable.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = TableOptions::default();

        let table = TableOptions::default()
            .with_max_seats(read_parsed("BJ_MAX_SEATS", defaults.max_seats))
            .with_bet_limits(
                read_parsed("BJ_MIN_BET", defaults.min_bet),
                read_parsed("BJ_MAX_BET", defaults.max_bet),
            )
            .with_starting_balance(read_parsed("BJ_STARTING_BALANCE", defaults.starting_balance))
            .with_reshuffle_threshold(read_parsed(
                "BJ_RESHUFFLE_THRESHOLD",
                defaults.reshuffle_threshold,
            ))
            .with_decks(read_parsed("BJ_DECKS", defaults.decks_per_shoe))
            .with_variant(read_variant("BJ_VARIANT", defaults.variant))
            .with_special_chance_limit(read_parsed(
                "BJ_SPECIAL_CHANCES",
                defaults.special_chance_limit,
            ))
            .with_special_chance_delay(read_ms(
                "BJ_SPECIAL_CHANCE_DELAY_MS",
                defaults.special_chance_delay,
            ))
            .with_auto_rebet(read_bool("BJ_AUTO_REBET", defaults.auto_rebet));

        Self {
            host: std::env::var("BJ_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: read_parsed("BJ_PORT", 3001),
            seed: std::env::var("BJ_SEED")
                .ok()
                .and_then(|raw| raw.trim().parse().ok()),
            table,
        }
    }
}

fn read_parsed<T: core::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<T>().ok())
        .unwrap_or(fallback)
}

fn read_ms(key: &str, fallback: Duration) -> Duration {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .map_or(fallback, Duration::from_millis)
}

fn read_bool(key: &str, fallback: bool) -> bool {
    match std::env::var(key).ok().as_deref().map(str::trim) {
        Some("1" | "true" | "yes" | "on") => true,
        Some("0" | "false" | "no" | "off") => false,
        _ => fallback,
    }
}

/// Parses a deck variant name.
#[must_use]
pub fn parse_variant(raw: &str) -> Option<DeckVariant> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "standard" | "simple" => Some(DeckVariant::Standard),
        "wild" | "joker" => Some(DeckVariant::Wild),
        _ => None,
    }
}

fn read_variant(key: &str, fallback: DeckVariant) -> DeckVariant {
    std::env::var(key)
        .ok()
        .and_then(|raw| parse_variant(&raw))
        .unwrap_or(fallback)
}
