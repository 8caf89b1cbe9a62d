pub mod analyze;
pub mod categorize;
pub mod count;
pub mod share;
