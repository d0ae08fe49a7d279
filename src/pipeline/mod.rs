//! Pipeline stages for sticker-sheet generation.
//!
//! Each submodule implements exactly one step. Data flows strictly forward;
//! no stage reads back from a later one.
//!
//! ## Data Flow
//!
//! ```text
//! records ──▶ assets ──▶ normalize ──▶ render ──▶ compile
//!  (CSV)    (HTTP, QR)   (aliases)    (LaTeX)   (xelatex)
//! ```
//!
//! 1. [`records`]   — parse the works table into ordered [`records::WorkRecord`]s
//! 2. [`assets`]    — make sure every code has an image and a QR code on disk;
//!    the only stage with network I/O, and the only one that fails per code
//! 3. [`normalize`] — alias artists, wrap medium tokens, escape titles
//! 4. [`render`]    — splice one sticker per record into the document template
//! 5. [`compile`]   — write the document and run the typesetter
//!
//! [`persist`] holds the temp-file-and-rename writer shared by stages 2 and 5.

pub mod assets;
pub mod compile;
pub mod normalize;
pub mod persist;
pub mod records;
pub mod render;
