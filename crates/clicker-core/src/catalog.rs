//! Boss catalog: creation of a boss together with its counter and timer.

use log::{info, warn};

use crate::domain::{Boss, BossId, NewBoss};
use crate::repository::{RemoteStore, StoreResult};

/// Insert `boss`, then its zeroed death counter and stopped timer.
///
/// The three inserts are not transactional. A failure after the boss row was
/// written leaves that row without its companions, which every reader treats
/// as a zero state.
pub async fn create_boss<S>(store: &S, boss: &NewBoss) -> StoreResult<Boss>
where
    S: RemoteStore + ?Sized,
{
    let created = store.insert_boss(boss).await?;
    if let Err(e) = store.insert_death_counter(created.id).await {
        warn!("boss {} created without a death counter", created.id);
        return Err(e);
    }
    if let Err(e) = store.insert_timer(created.id).await {
        warn!("boss {} created without a timer", created.id);
        return Err(e);
    }
    info!("created boss {} ({})", created.id, created.name);
    Ok(created)
}

pub fn find_boss(bosses: &[Boss], id: BossId) -> Option<&Boss> {
    bosses.iter().find(|boss| boss.id == id)
}
