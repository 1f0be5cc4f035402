// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Font library

use super::coverage::{Coverage, CoverageCache};
use super::face::FaceRef;
use crate::conv::{to_u32, to_usize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};
use thiserror::Error;
use ttf_parser::Face;

/// Font loading errors
#[derive(Error, Debug)]
pub enum FontError {
    #[error("font load error")]
    TtfParser(#[from] ttf_parser::FaceParsingError),
    #[cfg(feature = "raster")]
    #[error("font load error")]
    AbGlyph(#[from] ab_glyph::InvalidFont),
    #[error("font read error")]
    Io(#[from] std::io::Error),
}

/// Font face identifier
///
/// Identifies a loaded font face within the [`FontLibrary`] by index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct FaceId(pub(crate) u32);

impl FaceId {
    /// Get as `usize`
    pub fn get(self) -> usize {
        to_usize(self.0)
    }
}

impl From<u32> for FaceId {
    fn from(id: u32) -> Self {
        FaceId(id)
    }
}

/// A store of data for a loaded font face
pub struct FaceStore {
    data: Box<[u8]>,
    index: u32,
    face: Face<'static>,
    #[cfg(feature = "raster")]
    ab_glyph: ab_glyph::FontRef<'static>,
}

impl FaceStore {
    /// Construct from owned font-file contents and a face index
    fn new(data: Box<[u8]>, index: u32) -> Result<Self, FontError> {
        // Safety: `data` is heap-allocated, never moved or mutated, and owned
        // by a FaceStore stored in the FontLibrary, which is never
        // deallocated. References into it are thus valid until program exit.
        let slice = unsafe { extend_lifetime(&data[..]) };

        let face = Face::parse(slice, index)?;

        Ok(FaceStore {
            face,
            #[cfg(feature = "raster")]
            ab_glyph: ab_glyph::FontRef::try_from_slice_and_index(slice, index)?,
            data,
            index,
        })
    }

    /// Access the [`Face`] object
    pub fn face(&self) -> &Face<'static> {
        &self.face
    }

    /// Access a [`FaceRef`] object
    pub fn face_ref(&'static self) -> FaceRef {
        FaceRef(&self.face)
    }

    /// Access the [`ab_glyph`] object
    #[cfg(feature = "raster")]
    pub fn ab_glyph(&self) -> &ab_glyph::FontRef<'static> {
        &self.ab_glyph
    }
}

#[derive(Default)]
struct FaceList {
    // Safety: unsafe code depends on entries never moving (hence the otherwise
    // redundant use of Box). See FontLibrary::get_face_store().
    #[allow(clippy::vec_box)]
    faces: Vec<Box<FaceStore>>,
    // Vec-map from source hash; length is expected to stay short.
    source_hash: Vec<(u64, FaceId)>,
}

impl FaceList {
    fn push(&mut self, face: Box<FaceStore>, source_hash: u64) -> FaceId {
        let id = FaceId(to_u32(self.faces.len()));
        self.faces.push(face);
        self.source_hash.push((source_hash, id));
        id
    }
}

/// Library of loaded fonts
///
/// This is the type of the global singleton accessible via the [`library()`]
/// function. Thread-safety is handled via internal locks.
pub struct FontLibrary {
    faces: RwLock<FaceList>,
    coverage: CoverageCache,
}

/// Face loading
impl FontLibrary {
    /// Load a font face from owned file contents
    ///
    /// `index` selects a face within a collection (`.ttc`); use 0 for plain
    /// font files. Loading the same contents and index twice returns the
    /// existing [`FaceId`].
    pub fn load_data(&self, data: Vec<u8>, index: u32) -> Result<FaceId, FontError> {
        let source_hash = {
            let mut hasher = DefaultHasher::new();
            data.hash(&mut hasher);
            hasher.write_u32(index);
            hasher.finish()
        };

        let mut faces = self.faces.write().unwrap();
        for (h, id) in faces.source_hash.iter().cloned() {
            if h == source_hash {
                let face = &faces.faces[id.get()];
                if *face.data == data[..] && face.index == index {
                    return Ok(id);
                }
            }
        }

        let store = FaceStore::new(data.into_boxed_slice(), index)?;
        let id = faces.push(Box::new(store), source_hash);
        log::debug!("loaded face {id:?}");
        Ok(id)
    }

    /// Load a font face from a file path
    pub fn load_path(&self, path: impl AsRef<Path>, index: u32) -> Result<FaceId, FontError> {
        let data = std::fs::read(path)?;
        self.load_data(data, index)
    }

    /// Number of loaded faces
    pub fn num_faces(&self) -> usize {
        self.faces.read().unwrap().faces.len()
    }
}

/// Face access
impl FontLibrary {
    /// Get a font face from its identifier
    ///
    /// Panics if `id` is not valid (required: `id.get() < self.num_faces()`).
    pub fn get_face(&self, id: FaceId) -> FaceRef {
        self.get_face_store(id).face_ref()
    }

    /// Get access to the [`FaceStore`]
    ///
    /// Panics if `id` is not valid (required: `id.get() < self.num_faces()`).
    pub fn get_face_store(&self, id: FaceId) -> &'static FaceStore {
        let faces = self.faces.read().unwrap();
        assert!(id.get() < faces.faces.len(), "FontLibrary: invalid {id:?}!");
        let store: &FaceStore = &faces.faces[id.get()];
        // Safety: elements of self.faces are never dropped or modified
        unsafe { extend_lifetime(store) }
    }
}

/// Codepoint coverage
impl FontLibrary {
    /// Get the coverage set for a face, building it on first use
    ///
    /// The set is built once per distinct underlying font file (faces are
    /// de-duplicated on load) and shared ref-counted between callers.
    pub fn coverage(&self, id: FaceId) -> Arc<Coverage> {
        self.coverage
            .get_or_build(id, || Coverage::new(self.get_face_store(id).face()))
    }

    /// Drop the cached coverage set for a face
    ///
    /// Existing [`Arc`] handles stay valid; the next [`Self::coverage`] call
    /// rebuilds the set. Returns whether an entry was present.
    pub fn evict_coverage(&self, id: FaceId) -> bool {
        self.coverage.evict(id)
    }

    /// Drop all cached coverage sets
    pub fn clear_coverage(&self) {
        self.coverage.clear();
    }
}

pub(crate) unsafe fn extend_lifetime<'b, T: ?Sized>(r: &'b T) -> &'static T {
    std::mem::transmute::<&'b T, &'static T>(r)
}

static LIBRARY: LazyLock<FontLibrary> = LazyLock::new(|| FontLibrary {
    faces: Default::default(),
    coverage: Default::default(),
});

/// Access the [`FontLibrary`] singleton
pub fn library() -> &'static FontLibrary {
    &LIBRARY
}
