//! Runtime configuration for the arena server.

use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Half-width of the ranked opponent window, in mmr points.
    pub mmr_window: i32,
    /// Lowest mmr a loss can push a player to. `None` leaves mmr unbounded.
    pub mmr_floor: Option<i32>,
    /// Upper bound for a single store round-trip.
    pub store_timeout: Duration,
    /// Leaderboard size when the caller does not ask for one.
    pub leaderboard_limit: usize,
    /// Redis TTL for cached leaderboard pages (seconds).
    pub leaderboard_cache_ttl: u64,
}

/// Largest leaderboard page a caller may request.
pub const LEADERBOARD_MAX: usize = 100;

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mmr_window: 1000,
            mmr_floor: Some(0),
            store_timeout: Duration::from_millis(3000),
            leaderboard_limit: 10,
            leaderboard_cache_ttl: 30,
        }
    }
}

impl Settings {
    fn from_env() -> Self {
        let defaults = Settings::default();

        let mmr_window = env::var("MMR_WINDOW")
            .ok()
            .and_then(|v| v.parse::<i32>().ok())
            .filter(|w| *w >= 0)
            .unwrap_or(defaults.mmr_window);

        let mmr_floor = match env::var("MMR_FLOOR") {
            Ok(v) => parse_floor(&v).unwrap_or(defaults.mmr_floor),
            Err(_) => defaults.mmr_floor,
        };

        let store_timeout = env::var("STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.store_timeout);

        let leaderboard_limit = env::var("LEADERBOARD_LIMIT")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|n| n.clamp(1, LEADERBOARD_MAX))
            .unwrap_or(defaults.leaderboard_limit);

        let leaderboard_cache_ttl = env::var("LEADERBOARD_CACHE_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(defaults.leaderboard_cache_ttl);

        Settings {
            mmr_window,
            mmr_floor,
            store_timeout,
            leaderboard_limit,
            leaderboard_cache_ttl,
        }
    }
}

/// `"none"` disables the floor; anything else must be an integer.
/// Returns `None` for unparseable input so the caller keeps its default.
pub fn parse_floor(raw: &str) -> Option<Option<i32>> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Some(None);
    }
    raw.parse::<i32>().ok().map(Some)
}

static SETTINGS: Lazy<Settings> = Lazy::new(Settings::from_env);

pub fn settings() -> &'static Settings {
    &SETTINGS
}
