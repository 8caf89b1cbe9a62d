//! Tagnet Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use tagnet_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{CoEdge, CommunityId, Tag, TagPair, UNASSIGNED_GROUP};

// Pipeline stages
pub use crate::cooccur::{threshold_edges, CoOccurrence};
pub use crate::extract::{TagExtractor, DEFAULT_BLOCKLIST};
pub use crate::graph::TagGraph;
pub use crate::layout::{force_layout, LayoutConfig, RENDER_SCALE};
pub use crate::louvain::{detect_communities, Communities, LouvainConfig};
pub use crate::rollup::{
    company_communities, format_id_list, format_id_string, membership_share, parse_id_list,
    MembershipShare,
};

// Categorization
pub use crate::categorize::{
    classify_tags, company_categories, default_rules, primary_category, Assignment,
    CategoryRules, SimilarityScorer, TagCategory,
};

// Re-export error types
pub use crate::error::{Result, TagnetError};
