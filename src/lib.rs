//! ftbq_advancements: turn FTB Quests chapters into advancements
//!
//! FTB Quests stores a chapter as a single SNBT file. This crate reads that
//! file with a forgiving SNBT parser, turns every quest into an advancement
//! JSON document (display, criteria, requirements, parent, rewards) and
//! reports structural problems per quest without ever dropping output.
//!
//! Basic example (no-run):
//!
//! ```rust,no_run
//! use ftbq_advancements::{ConvertOptions, convert_file, write_all};
//! use std::path::Path;
//!
//! let generated = convert_file(Path::new("chapter.snbt"), &ConvertOptions::default())?;
//! for item in &generated {
//!     for err in &item.errors {
//!         eprintln!("{}: {err}", item.filename);
//!     }
//! }
//! write_all(Path::new("out"), &generated)?;
//! # Ok::<(), ftbq_advancements::ParseError>(())
//! ```

pub mod advancement;
pub mod convert;
pub mod error;
pub mod filename;
pub mod model;
pub mod nbt_norm;
pub mod output;
pub mod parser;
pub mod quest_id;
pub mod render;
pub mod snbt;

pub use crate::advancement::{Advancement, Built, build};
pub use crate::convert::*;
pub use crate::error::*;
pub use crate::filename::{FilenameMap, derive_filenames, derive_filenames_strict};
pub use crate::model::*;
pub use crate::output::write_all;
pub use crate::parser::{parse_chapter_from_file, parse_chapter_from_reader, parse_chapter_from_str};
pub use crate::render::{normalize_escapes, render};
