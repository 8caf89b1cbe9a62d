//! # Tagnet Report
//!
//! Artifact writers for Tagnet analyses: CSV tables (co-occurrence edges,
//! community summaries, rollups, category maps) and static HTML network
//! views with frozen layouts.
//!
//! Every CSV is written with a UTF-8 BOM so spreadsheets open the Japanese
//! tag data correctly.

pub mod csv_io;
pub mod html;
pub mod summary;
