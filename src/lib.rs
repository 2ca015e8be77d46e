//! # opdx
//!
//! Rust reader for the proprietary OPDx container format written by
//! Vision64 profilometry instruments.
//!
//! An OPDx file is a 12-byte magic header followed by a flat sequence of
//! tagged records (`name + one-byte type tag + payload`), where two of the
//! tags (RawData and Dict) recursively contain further records. Decoding is
//! a single bounded pass that either yields a complete [`Document`] or
//! fails with an offset-carrying [`Error`]; the source bytes are never
//! mutated and nothing is written back.
//!
//! ## Modules
//!
//! - [`util`] - Error handling and small math helpers
//! - [`vca`] - The low-level container format (named for its "VCA DATA" magic)
//! - [`profile`] - Calibrated 1-D surface profile extraction
//!
//! ## Example
//!
//! ```ignore
//! use opdx::{Document, profile::Profile1D};
//!
//! let doc = Document::open("scan.OPDx")?;
//! let profile = Profile1D::from_document(&doc)?;
//! for (x, y) in profile.x().iter().zip(profile.y()) {
//!     println!("{x}\t{y}");
//! }
//! ```

pub mod util;
pub mod vca;
pub mod profile;

// Re-export commonly used types
pub use util::{Error, Result};
pub use vca::{Document, Entries, Value};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::profile::Profile1D;
    pub use crate::util::{Error, Result};
    pub use crate::vca::{Document, Entries, TypeTag, Value};
}
