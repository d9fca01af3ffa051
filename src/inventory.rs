//! Reading crawled game inventories.
//!
//! The upstream crawler writes one JSON object per line. Each object has a
//! single entry: the user id mapped to either an array of owned games or
//! `null` when the profile was private or the crawl failed for that user.
//!
//! ```text
//! {"76561198000000001": [{"appid": 10, "playtime_forever": 32}], ...}
//! {"76561198000000002": null}
//! ```
//!
//! This module decodes that stream into [`RawInventoryRecord`] values,
//! preserving input order, and fails with a 1-based line number when a line
//! cannot be decoded.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{GamerecError, Result};

/// A single owned game inside a user's inventory.
///
/// Field names follow the crawler's JSON keys. Any additional keys the
/// crawler recorded (icon URLs, recent play time, ...) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnedGame {
    /// Application id of the game.
    pub appid: u32,
    /// Total minutes on record for this game.
    pub playtime_forever: u64,
}

/// One decoded line of the inventory file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInventoryRecord {
    /// External user id, kept as an opaque string.
    pub user_id: String,
    /// Owned games, or `None` when the crawl recorded no inventory.
    pub games: Option<Vec<OwnedGame>>,
}

impl RawInventoryRecord {
    /// Returns the owned games, treating an absent inventory as empty.
    pub fn games(&self) -> &[OwnedGame] {
        self.games.as_deref().unwrap_or(&[])
    }

    /// Returns true if at least one owned game has a positive play time.
    pub fn is_engaged(&self) -> bool {
        self.games().iter().any(|g| g.playtime_forever > 0)
    }
}

/// Reads inventory records from a buffered reader.
///
/// Lines are decoded in order. Blank lines are skipped; any other line that
/// is not a single-entry JSON object fails the whole read with
/// [`GamerecError::InvalidRecord`] carrying the 1-based line number.
pub fn read_inventory<R: BufRead>(reader: R) -> Result<Vec<RawInventoryRecord>> {
    let mut records = Vec::new();
    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_record(&line).map_err(|reason| GamerecError::InvalidRecord {
            line: line_no + 1,
            reason,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Reads inventory records from a file path.
pub fn read_inventory_file<P: AsRef<Path>>(path: P) -> Result<Vec<RawInventoryRecord>> {
    let file = File::open(path.as_ref())?;
    read_inventory(BufReader::new(file))
}

/// Decodes one line. The object's first entry is taken as the record; the
/// crawler only ever writes one entry per line.
fn parse_record(line: &str) -> std::result::Result<RawInventoryRecord, String> {
    let object: serde_json::Map<String, Value> =
        serde_json::from_str(line).map_err(|e| e.to_string())?;
    let (user_id, games_value) = object
        .into_iter()
        .next()
        .ok_or_else(|| "record object has no user id key".to_string())?;
    let games = match games_value {
        Value::Null => None,
        value => Some(serde_json::from_value::<Vec<OwnedGame>>(value).map_err(|e| e.to_string())?),
    };
    Ok(RawInventoryRecord { user_id, games })
}

/// Aggregate counts over a decoded inventory file.
///
/// Used by the `stats` command to describe a dataset before training on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    /// Number of records (one per crawled user).
    pub total_users: usize,
    /// Users whose inventory was present (not `null`).
    pub users_with_inventory: usize,
    /// Users owning at least one game with positive play time.
    pub engaged_users: usize,
    /// Owned game entries across all inventories.
    pub owned_entries: usize,
    /// Owned game entries with positive play time.
    pub engaged_entries: usize,
    /// Distinct application ids with positive play time.
    pub distinct_engaged_apps: usize,
    /// Sum of all play times, in minutes.
    pub total_playtime_minutes: u64,
}

impl InventoryStats {
    /// Collects statistics over a slice of decoded records.
    pub fn collect(records: &[RawInventoryRecord]) -> Self {
        let mut stats = InventoryStats {
            total_users: records.len(),
            ..Default::default()
        };
        let mut engaged_apps = ahash::AHashSet::new();
        for record in records {
            if record.games.is_some() {
                stats.users_with_inventory += 1;
            }
            if record.is_engaged() {
                stats.engaged_users += 1;
            }
            for game in record.games() {
                stats.owned_entries += 1;
                stats.total_playtime_minutes += game.playtime_forever;
                if game.playtime_forever > 0 {
                    stats.engaged_entries += 1;
                    engaged_apps.insert(game.appid);
                }
            }
        }
        stats.distinct_engaged_apps = engaged_apps.len();
        stats
    }
}
