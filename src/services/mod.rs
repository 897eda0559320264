//! Pipeline services.
//!
//! Content and image clients sit behind provider traits so the assembler and
//! editor can be tested without network access.

pub mod assembler;
pub mod content;
pub mod editor;
pub mod image;
