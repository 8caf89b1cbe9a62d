//! # Tagnet Core
//!
//! Core algorithms for tag co-occurrence network analysis.
//!
//! The pipeline is a strictly one-directional batch computation:
//!
//! - **EXTRACT** — parse free-text tag fields into normalized tag lists
//! - **COUNT** — fold company tag sets into a sparse pair → weight table
//! - **BUILD** — turn the pair table into a weighted undirected graph
//! - **DETECT** — partition the full graph into communities (weighted Louvain)
//! - **LAYOUT** — compute frozen 2D coordinates for thresholded views
//! - **ROLL UP** — map each company to the communities its tags touch
//! - **CATEGORIZE** — assign business-domain categories by keyword rules
//!
//! Everything is derived, immutable and single-pass: there is no shared
//! mutable state, no persistence and no incremental recomputation.
//!
//! ## Quick Start
//!
//! ```rust
//! use tagnet_core::prelude::*;
//!
//! let extractor = TagExtractor::with_default_blocklist();
//! let companies = vec![
//!     extractor.extract(Some("AI, SaaS")),
//!     extractor.extract(Some("AI, SaaS, FinTech")),
//! ];
//! let counts = CoOccurrence::from_companies(&companies);
//! assert_eq!(counts.weight("AI", "SaaS"), 2);
//! ```

pub mod categorize;
pub mod cooccur;
pub mod error;
pub mod extract;
pub mod graph;
pub mod layout;
pub mod louvain;
pub mod rollup;
pub mod types;
pub mod prelude;

mod rng;
