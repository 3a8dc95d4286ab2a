//! Import statement and import block models
//!
//! `statement` holds the structured form of one declaration; `block` locates
//! the import prologue of a buffer, parses it, and rewrites it canonically.

pub mod block;
pub mod statement;

pub use block::ImportBlock;
pub use statement::{DeclarationKeyword, ImportStatement};
