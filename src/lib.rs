//! Intersection Simulation Library
//!
//! An adaptive four-way signalized-intersection simulation that can run
//! headless or be embedded under an external display layer.

pub mod simulation;
