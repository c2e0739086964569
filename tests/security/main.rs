//! Security regression tests for the pack pipeline.
//!
//! Each module replays a class of hostile archive or hostile filesystem
//! state and checks that nothing escapes the packs directory and nothing
//! but audio survives.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod content_spoofing;
mod link_entries;
mod path_traversal;
mod resource_limits;
mod symlink_escape;

use cuepack_core::PackId;
use cuepack_core::PackStore;
use cuepack_core::StoreConfig;
use tempfile::TempDir;

/// A store rooted in a temporary directory, plus a sibling directory that
/// attacks try to reach.
pub struct Sandbox {
    pub temp: TempDir,
    pub store: PackStore,
}

impl Sandbox {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("outside")).unwrap();
        let store = PackStore::open(StoreConfig::new(temp.path().join("packs"))).unwrap();
        Self { temp, store }
    }

    pub fn outside(&self) -> std::path::PathBuf {
        self.temp.path().join("outside")
    }

    /// Asserts the attack left no trace outside the packs directory.
    pub fn assert_outside_untouched(&self) {
        let leaked: Vec<_> = std::fs::read_dir(self.outside()).unwrap().collect();
        assert!(leaked.is_empty(), "files escaped: {leaked:?}");

        let mut top: Vec<_> = std::fs::read_dir(self.temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        top.sort();
        assert_eq!(top, vec!["outside", "packs"]);
    }
}

pub fn id(name: &str) -> PackId {
    PackId::parse(name).unwrap()
}
