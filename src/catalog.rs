//! Optional application catalog.
//!
//! The crawler can dump a catalog of known applications as a single JSON
//! object keyed by application id, each value carrying at least a `name`:
//!
//! ```text
//! {"570": {"appid": 570, "name": "Dota 2", ...}, "730": {...}}
//! ```
//!
//! When a catalog is supplied, recommendations are bounded to the
//! applications it lists. Without one, every item seen during training is a
//! candidate.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use ahash::AHashMap;
use serde_json::Value;

use crate::error::{GamerecError, Result};

/// A set of known applications, with display names where available.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    apps: AHashMap<u32, Option<String>>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file))
    }

    /// Reads a catalog from a JSON document keyed by application id.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document: AHashMap<String, Value> = serde_json::from_reader(reader)?;
        let mut apps = AHashMap::with_capacity(document.len());
        for (key, value) in document {
            let appid: u32 = key
                .parse()
                .map_err(|_| GamerecError::other(format!("invalid catalog app id '{key}'")))?;
            let name = value
                .get("name")
                .and_then(Value::as_str)
                .map(str::to_string);
            apps.insert(appid, name);
        }
        Ok(Catalog { apps })
    }

    /// Returns true if the application id is listed.
    pub fn contains(&self, appid: u32) -> bool {
        self.apps.contains_key(&appid)
    }

    /// Returns the display name for an application id, if the catalog has one.
    pub fn name_of(&self, appid: u32) -> Option<&str> {
        self.apps.get(&appid).and_then(|name| name.as_deref())
    }

    /// Number of listed applications.
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Returns true if no applications are listed.
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Iterates over the listed application ids in no particular order.
    pub fn app_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.apps.keys().copied()
    }
}
