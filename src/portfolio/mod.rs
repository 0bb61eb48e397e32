//! Portfolio Data Module
//!
//! The document model consumed by the terminal and the store that loads,
//! caches, refreshes, exports and re-imports it.

pub mod document;
pub mod store;

pub use document::{
    Education, Experience, GithubStats, PersonalInfo, PortfolioDocument, Project, Skill,
    SocialLinks,
};
pub use store::{DataStore, DocumentSource, RefreshRequest};
