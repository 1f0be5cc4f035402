// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Codepoint coverage sets
//!
//! The default glyph-coverage predicate of a descriptor queries a set of
//! codepoints built once per distinct font file. Sets are shared ref-counted
//! (`Arc`) between descriptors and evicted explicitly, never by garbage
//! collection timing.

use super::FaceId;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use ttf_parser::Face;

/// Set of codepoints mapped by a font face's character map
pub struct Coverage {
    // Sorted for binary search; cmap subtables may overlap, so deduplicated.
    codepoints: Vec<u32>,
}

impl Coverage {
    /// Collect coverage from all Unicode cmap subtables
    pub(crate) fn new(face: &Face) -> Self {
        let mut codepoints = Vec::new();
        if let Some(cmap) = face.tables().cmap {
            for subtable in cmap.subtables {
                if subtable.is_unicode() {
                    subtable.codepoints(|cp| codepoints.push(cp));
                }
            }
        }
        codepoints.sort_unstable();
        codepoints.dedup();
        Coverage { codepoints }
    }

    /// Whether the face maps `c` to a glyph
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.codepoints.binary_search(&(c as u32)).is_ok()
    }

    /// Number of covered codepoints
    pub fn len(&self) -> usize {
        self.codepoints.len()
    }
}

/// Per-face coverage cache with explicit eviction
#[derive(Default)]
pub(crate) struct CoverageCache {
    map: RwLock<HashMap<FaceId, Arc<Coverage>>>,
}

impl CoverageCache {
    pub(crate) fn get_or_build(
        &self,
        id: FaceId,
        build: impl FnOnce() -> Coverage,
    ) -> Arc<Coverage> {
        if let Some(coverage) = self.map.read().unwrap().get(&id) {
            return coverage.clone();
        }

        let coverage = Arc::new(build());
        log::debug!(
            "built coverage for {id:?}: {} codepoints",
            coverage.len()
        );
        self.map
            .write()
            .unwrap()
            .entry(id)
            .or_insert(coverage)
            .clone()
    }

    pub(crate) fn evict(&self, id: FaceId) -> bool {
        self.map.write().unwrap().remove(&id).is_some()
    }

    pub(crate) fn clear(&self) {
        self.map.write().unwrap().clear();
    }
}
