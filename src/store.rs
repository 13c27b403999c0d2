//! Key-value persistence for the two card records. Each record is an opaque
//! JSON blob under a fixed, version-suffixed key. Loading never fails: a
//! missing or unreadable blob yields the default state.

use crate::error::ScResult;
use crate::geometry::Calibration;
use crate::ledger::ScoreLedger;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const CALIBRATION_KEY: &str = "scorecard_cal_v1";
pub const SCORES_KEY: &str = "scorecard_scores_v1";

pub trait KvStore {
    fn get(&self, key: &str) -> ScResult<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> ScResult<()>;
    fn remove(&mut self, key: &str) -> ScResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> ScResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ScResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ScResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open<P: AsRef<Path>>(dir: P) -> ScResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        debug!("file store at {:?}", dir);
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> ScResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> ScResult<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ScResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

fn read_blob(store: &dyn KvStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(blob) => blob,
        Err(e) => {
            warn!("could not read '{}': {}", key, e);
            None
        }
    }
}

/// Persisted ledger, or a fresh all-empty one for `players` when the blob is
/// missing or corrupt. There is no partial recovery.
pub fn load_ledger(store: &dyn KvStore, players: usize) -> ScoreLedger {
    let Some(blob) = read_blob(store, SCORES_KEY) else {
        debug!("no saved scores, starting a fresh card");
        return ScoreLedger::new(players);
    };

    let parsed = serde_json::from_str::<BTreeMap<String, String>>(&blob)
        .map_err(|e| e.to_string())
        .and_then(|map| ScoreLedger::from_map(players, map));

    match parsed {
        Ok(ledger) => ledger,
        Err(e) => {
            warn!("saved scores are corrupt ({}), starting a fresh card", e);
            ScoreLedger::new(players)
        }
    }
}

pub fn save_ledger(store: &mut dyn KvStore, ledger: &ScoreLedger) -> ScResult<()> {
    let blob = serde_json::to_string(&ledger.to_persisted())?;
    store.set(SCORES_KEY, &blob)
}

/// Persisted calibration, if one exists and fits a card with `players` rows.
pub fn load_calibration(store: &dyn KvStore, players: usize) -> Option<Calibration> {
    let blob = read_blob(store, CALIBRATION_KEY)?;
    let cal: Calibration = match serde_json::from_str(&blob) {
        Ok(cal) => cal,
        Err(e) => {
            warn!("saved calibration is corrupt ({}), ignoring it", e);
            return None;
        }
    };
    if let Err(e) = cal.validate(players) {
        warn!("saved calibration unusable: {}", e);
        return None;
    }
    Some(cal)
}

pub fn save_calibration(store: &mut dyn KvStore, cal: &Calibration) -> ScResult<()> {
    let blob = serde_json::to_string_pretty(cal)?;
    store.set(CALIBRATION_KEY, &blob)?;
    info!("calibration saved");
    Ok(())
}

pub fn clear_calibration(store: &mut dyn KvStore) -> ScResult<()> {
    store.remove(CALIBRATION_KEY)?;
    info!("calibration cleared");
    Ok(())
}
