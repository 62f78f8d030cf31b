//! Insight Generator - ranked, rule-based financial insights
//!
//! Rules inspect the model outputs (clusters, health score) and the raw
//! ledger, and emit structured [`Insight`]s. The engine ranks them by rule
//! priority, drops duplicate keys and caps the list. Turning an insight
//! into text is a separate [`InsightRenderer`] step.
//!
//! ## Built-in Rules (priority order)
//!
//! 1. **Cluster Patterns** - frequent small / large occasional expense groups
//! 2. **Top Category** - highest-spend category and its share
//! 3. **Category Change** - month-over-month swings per category
//! 4. **Health Advice** - weak or strong health sub-scores
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fathom_core::insights::{InsightContext, InsightEngine, InsightRenderer, TextRenderer};
//!
//! let insights = InsightEngine::new().generate(&ctx);
//! let lines = TextRenderer::new("€").render_all(&insights);
//! ```

pub mod category_change;
pub mod cluster_patterns;
pub mod engine;
pub mod health_advice;
pub mod render;
pub mod top_category;
pub mod types;

pub use category_change::CategoryChangeRule;
pub use cluster_patterns::ClusterPatternRule;
pub use engine::{InsightContext, InsightEngine, InsightRule};
pub use health_advice::HealthAdviceRule;
pub use render::{InsightRenderer, TextRenderer};
pub use top_category::TopCategoryRule;
pub use types::{AdviceTopic, Insight, InsightKind, Severity};
