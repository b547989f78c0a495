//! # cube-alg-player
//!
//! Core notation and playback library for Rubik's cube algorithm trainers.
//!
//! This crate provides platform-agnostic data structures and logic for:
//! - Parsing move notation (`R U R' U'`, `(R U)2`, `Rw2'`) into turn actions
//! - Stepping forward/backward or auto-playing through an algorithm
//! - Persisting user-edited notation and the last-viewed algorithm
//! - Generating preview snapshots incrementally, one per display refresh
//!
//! The 3D cube, its renderer and the preview rasterizer live in the host
//! application and plug in through the [`CubeEngine`], [`Scene`] and
//! [`Rasterizer`] traits.
//!
//! ## Features
//!
//! - `toml` - Load catalogs and [`TrainerConfig`] from TOML
//! - `web` - Browser `localStorage` persistence via `store::web::LocalStorageStore`
//!
//! ## Example
//!
//! ```rust,ignore
//! use cube_alg_player::{Catalog, MemoryStore, Trainer};
//!
//! let catalog = Catalog::from_json_str(include_str!("algs.json"))?;
//! let mut trainer = Trainer::new(cube, MemoryStore::new(), catalog, capture);
//!
//! // Wire the cube's turn-completion callback
//! // cube.on_turn_complete(|| trainer.on_idle());
//!
//! trainer.toggle_play();
//!
//! // Once per display refresh
//! trainer.tick(&mut scene);
//! ```

mod config;
mod cube;
mod data;
mod error;
pub mod notation;
mod playback;
mod snapshot;
pub mod store;
mod tick;
mod trainer;

#[cfg(test)]
mod testing;

pub use config::TrainerConfig;
pub use cube::{CubeEngine, Rasterizer, Scene};
pub use data::{AlgorithmEntry, AlgorithmGroup, Catalog, PlaybackPosition, StripMask};
pub use error::{CatalogError, CatalogResult, StoreError};
pub use notation::{invert, parse, to_notation, TwistAction};
pub use playback::PlaybackEngine;
pub use snapshot::SnapshotCache;
pub use store::{MemoryStore, PersistenceStore};
pub use tick::{TickCoordinator, TickOutcome, TickStats};
pub use trainer::Trainer;
