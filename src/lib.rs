//! # gamerec
//!
//! A collaborative-filtering game recommendation engine for play-time data.
//!
//! ## Pipeline
//!
//! - Decode crawled inventories (one JSON record per user)
//! - Index user ids and extract engaged play-time observations
//! - Factorize the user-by-game matrix with alternating least squares
//! - Rank unvisited candidates per user and write a top-N artifact

pub mod als;
pub mod catalog;
pub mod cli;
pub mod engine;
pub mod error;
pub mod index;
pub mod interactions;
pub mod inventory;
pub mod output;
pub mod recommend;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
