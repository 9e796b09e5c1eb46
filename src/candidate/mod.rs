//! Candidate selection helpers.

pub mod best;
