//! Media credential and blob lifecycle subsystem for Flowdeck.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! It mints short-lived, capability-scoped SAS credentials for blobs, maps blob
//! URLs to blob names and back, finds blob references embedded in card fields,
//! and sweeps blobs that become unreferenced when a card is edited or deleted.
//!
//! # Modules
//!
//! - `store` - Store configuration, SAS signing, URL codec, blob operations, cleanup
//! - `media` - Card-facing attachment model, reference extraction, service facade

pub mod media;
pub mod store;
