//! Decentralized multi-agent flocking simulation for studying emergent area
//! coverage of a bounded 2D environment.
//!
//! The simulation core is headless: a renderer or UI is an external
//! collaborator that reads per-tick boid state and feeds gain updates back in
//! through explicit setters. The crate also ships a coverage evaluator and a
//! parallel random-search harness over behavior gains.

pub mod boid;
pub mod config;
pub mod coverage;
pub mod environment;
pub mod evaluator;
pub mod flocking;
pub mod gains;
pub mod geometry;
pub mod obstacle;
pub mod report;
pub mod search;
pub mod simulation;
