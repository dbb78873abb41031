//! Markdown outlines as mind-map trees.
//!
//! An outline (headers plus `- ` list items) is parsed into a [`tree::Tree`],
//! laid out on a two-sided horizontal canvas, edited through an
//! [`edit::Session`] and written back as the same outline format.

pub mod edit;
pub mod layout;
pub mod logging;
pub mod parser;
pub mod paths;
pub mod tree;
