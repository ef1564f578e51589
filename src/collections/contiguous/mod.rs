//! Contiguous collection types. Currently just [`GrowableBuffer`], a resizable collection that owns
//! one block of memory and reallocates it as required.
#![warn(missing_docs)]

pub mod growable;

#[doc(inline)]
pub use growable::{GrowableBuffer, GrowthPolicy};
