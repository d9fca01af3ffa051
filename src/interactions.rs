//! Extracting engaged interactions from inventories.
//!
//! A game a user owns but never launched says nothing about taste, so only
//! entries with positive play time become observations. The raw play time in
//! minutes is carried through unchanged as the observation weight.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index::UserIndex;
use crate::inventory::RawInventoryRecord;

/// One engaged `(user, game, play time)` triple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Dense index of the user, as assigned by [`UserIndex`].
    pub user_index: usize,
    /// Application id of the game.
    pub appid: u32,
    /// Play time in minutes, unscaled.
    pub weight: f32,
}

/// Extracts the observations of a single record under a known user index.
///
/// Keeps the inventory's own entry order. An absent inventory or one with
/// no positive play time yields no observations.
pub fn extract_user_observations(
    user_index: usize,
    record: &RawInventoryRecord,
) -> Vec<Observation> {
    record
        .games()
        .iter()
        .filter(|game| game.playtime_forever > 0)
        .map(|game| Observation {
            user_index,
            appid: game.appid,
            weight: game.playtime_forever as f32,
        })
        .collect()
}

/// Extracts all observations of a record slice, in record order.
///
/// Every record's user id must already be present in `index`; building the
/// index with [`UserIndex::from_records`] over the same slice guarantees
/// that. Records sharing a user id contribute to the same index.
pub fn extract_observations(
    index: &UserIndex,
    records: &[RawInventoryRecord],
) -> Result<Vec<Observation>> {
    let mut observations = Vec::new();
    for record in records {
        let user_index = index.index_of(&record.user_id)?;
        observations.extend(extract_user_observations(user_index, record));
    }
    Ok(observations)
}
