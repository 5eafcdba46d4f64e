//! Engagement counters shown on the landing and dashboard views.
//!
//! Purely cosmetic: seeded with fixed values, nudged upward by small random
//! deltas on a timer, never persisted or read from anywhere.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::format::format_volume_k;

/// How often the counters tick.
pub const TICK_INTERVAL: Duration = Duration::from_secs(30);

/// Exclusive upper bounds for each counter's per-tick delta.
const MAX_BUSINESS_DELTA: u64 = 3;
const MAX_INVESTOR_DELTA: u64 = 2;
const MAX_VOLUME_DELTA: u64 = 50_000;
const MAX_MATCH_DELTA: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementCounters {
    #[serde(rename = "empresas")]
    pub businesses: u64,
    #[serde(rename = "investidores")]
    pub investors: u64,
    #[serde(rename = "volumeSimulado")]
    pub simulated_volume: u64,
    pub matches: u64,
}

impl Default for EngagementCounters {
    fn default() -> Self {
        Self {
            businesses: 247,
            investors: 89,
            simulated_volume: 1_250_000,
            matches: 34,
        }
    }
}

/// One tick's worth of increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDeltas {
    pub businesses: u64,
    pub investors: u64,
    pub simulated_volume: u64,
    pub matches: u64,
}

impl CounterDeltas {
    /// Draw independent bounded deltas for each counter.
    pub fn sample<R: Rng>(rng: &mut R) -> Self {
        Self {
            businesses: rng.gen_range(0..MAX_BUSINESS_DELTA),
            investors: rng.gen_range(0..MAX_INVESTOR_DELTA),
            simulated_volume: rng.gen_range(0..MAX_VOLUME_DELTA),
            matches: rng.gen_range(0..MAX_MATCH_DELTA),
        }
    }
}

impl EngagementCounters {
    /// Apply one tick. Counters never decrease.
    pub fn apply(&mut self, deltas: CounterDeltas) {
        self.businesses = self.businesses.saturating_add(deltas.businesses);
        self.investors = self.investors.saturating_add(deltas.investors);
        self.simulated_volume = self.simulated_volume.saturating_add(deltas.simulated_volume);
        self.matches = self.matches.saturating_add(deltas.matches);
    }

    /// Snapshot sent along with a lead submission.
    pub fn to_wire(&self) -> Value {
        json!({
            "empresas": self.businesses,
            "investidores": self.investors,
            "volumeSimulado": self.simulated_volume,
            "matches": self.matches,
        })
    }

    /// Landing-page stat tiles.
    pub fn stat_tiles(&self) -> [(&'static str, String); 4] {
        [
            ("Empresas Cadastradas", self.businesses.to_string()),
            ("Investidores", self.investors.to_string()),
            ("Volume Simulado", format_volume_k(self.simulated_volume)),
            ("Matches Realizados", self.matches.to_string()),
        ]
    }
}
