pub mod config;
pub mod dialogue;
pub mod domain;
pub mod extract;
pub mod merge;
pub mod normalize;
pub mod params;
pub mod query;
pub mod store;
pub mod taxonomy;

pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};
pub use dialogue::{complement_categories, plan_reply, plan_single_turn, ReplyMeta, ReplyPlan};
pub use domain::filter::{
    CategoryId, FilterPayload, IntentFlags, Price, SortKey, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
pub use domain::session::{ChatMessage, ChatSession, MessageRole};
pub use extract::{extract, filters_from_image_analysis, Extraction, ImageAnalysis};
pub use merge::merge;
pub use normalize::normalize;
pub use params::normalize_filters;
pub use query::{compile, CompileOptions, QueryPlan, Stage, VariantConstraint};
pub use store::{CategoryResolver, SessionStore, StoreError};
