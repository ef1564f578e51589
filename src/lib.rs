//! This crate is a study collection of container primitives, written from raw allocations upwards.
//!
//! # Purpose
//! This repo / crate is a project that I'm working on as a learning experience, with no expectation
//! for it to be used in production. The main piece is
//! [`GrowableBuffer`](collections::contiguous::GrowableBuffer), a contiguous collection that owns
//! one block of memory and reallocates it as it fills up. Writing it by hand helps me to understand
//! what [`Vec`] is actually doing: layouts, uninitialized memory, amortized growth and who is
//! responsible for dropping what.
//!
//! # Method
//! The buffer talks to the global allocator directly and never uses [`Vec`] internally. All of the
//! unsafe relocation logic lives in one place, so that every growth, shrink and release follows the
//! same path. Moving a Rust value is always a bitwise copy, so relocation doesn't need the
//! per-element copy constructors other languages need, but dropping is still done one element at a
//! time.
//!
//! # Error Handling
//! Most methods come in two flavours. The plain ones (`pop_back`, `front`, `at`, `resize`) panic
//! with the message of a strongly typed error when their precondition isn't met, because having to
//! handle a [`Result`] on every pop gets old fast. The `try_` versions return that same error
//! instead. Allocation failure is the exception: the panicking surface hands it to
//! [`handle_alloc_error`](std::alloc::handle_alloc_error) rather than panicking, as recommended.
//!
//! The error types live in [`error`] and use derive macros for the repetitive [`Display`] and
//! [`Error`](std::error::Error) impls.
//!
//! [`Display`]: std::fmt::Display
//!
//! # Logging
//! Reallocations are reported through the [`log`] facade at trace level. Nothing is logged unless
//! the application installs a logger.
#![warn(clippy::missing_safety_doc)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::missing_const_for_fn)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::module_inception)]

#[cfg(feature = "collections")]
pub mod collections;

pub(crate) mod util;

pub use util::error;
