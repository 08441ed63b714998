//! Death Counter Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::boss::BossId;
use super::entity::Entity;

/// Row of the `death_counters` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathCounter {
    pub id: i64,
    pub boss_id: BossId,
    pub death_count: u32,
    pub updated_at: DateTime<Utc>,
}

impl Entity for DeathCounter {
    type Id = i64;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Insert payload written when a boss is created
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NewDeathCounter {
    pub boss_id: BossId,
    pub death_count: u32,
}

impl NewDeathCounter {
    pub fn for_boss(boss_id: BossId) -> Self {
        Self { boss_id, death_count: 0 }
    }
}
