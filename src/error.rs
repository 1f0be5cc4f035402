// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE-APACHE file or at:
//     https://www.apache.org/licenses/LICENSE-2.0

//! Draw-call error taxonomy
//!
//! All failures are synchronous and propagate to the immediate caller; none
//! are retried internally. Characters already drawn before a failure remain
//! on the canvas; callers needing atomicity should draw to an offscreen
//! buffer and commit it only on success.

use thiserror::Error;

/// Errors surfaced by a draw call
#[derive(Error, Debug)]
pub enum Error {
    /// No descriptor matched a character; the draw produced no output
    #[error("no font match for {0:?}")]
    NoFontMatch(char),

    /// The configured end marker cannot fit the width budget even alone
    #[error("end marker wider than the width budget")]
    EndMarkerTooWide,

    /// A required collaborator was not supplied
    #[error("missing capability: {0}")]
    MissingCapability(&'static str),

    /// The emoji source does not carry an asset for a recognized sequence
    #[error("emoji asset missing: {0:?}")]
    EmojiAssetMissing(String),

    /// Emoji lookup or decoding failed
    #[error("emoji error: {0}")]
    Emoji(String),
}

/// Result alias over [`enum@Error`]
pub type Result<T> = std::result::Result<T, Error>;
