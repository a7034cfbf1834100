//! Scene export.

pub mod pov;
