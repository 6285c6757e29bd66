//! Text preparation: normalization and section location.
//!
//! Raw document text goes through [`normalize`] once; everything
//! downstream works on the normalized form.

pub mod normalize;
pub mod section;

pub use normalize::normalize;
pub use section::{find_heading, find_keyword, locate, locate_groups, locate_heading, GroupRegions, SectionSpec};
