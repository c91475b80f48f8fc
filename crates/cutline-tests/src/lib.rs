//! Integration test crate for Cutline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on multiple cutline crates to verify they work together.

#[cfg(test)]
mod editing;

#[cfg(test)]
mod export;

#[cfg(test)]
mod interaction;
