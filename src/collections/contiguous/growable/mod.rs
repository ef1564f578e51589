//! A module containing [`GrowableBuffer`] and the [`GrowthPolicy`] that controls how it grows.
//!
//! Iteration is borrowed from [`std::slice`] through [`Deref<Target = [T]>`](std::ops::Deref), so
//! there are no iterator types here.
//!
//! Both types are also re-exported under the parent module.

mod growable_buffer;
mod growth;
mod raw_block;

pub use growable_buffer::*;
pub use growth::*;
