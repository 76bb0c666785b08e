//! # Sync Engine
//!
//! Timeline synchronization engine.
//!
//! Responsibilities:
//! - Sync-point discovery over scene, frame and audio analysis
//! - Subtitle snapping and reading-time floor
//! - Fixed per-category timing rules
//! - Priority-based same-category conflict resolution
//! - Quality scoring and `TimelineMeta` diagnostics
//!
//! ## Usage
//!
//! ```ignore
//! use sync_engine::{SyncEngineConfig, TimelineSynchronizer};
//!
//! let engine = TimelineSynchronizer::new(SyncEngineConfig::default());
//! let timeline = engine.synchronize(&analysis, &request)?;
//! println!("quality = {:.3}", timeline.quality);
//! ```

mod builder;
mod engine;
mod locator;
mod resolver;
mod rules;
mod scorer;

pub use builder::{reading_time, EventBuilder, SubtitlePlacement};
pub use engine::TimelineSynchronizer;
pub use locator::{SyncPointLocator, SyncTarget, TimeWindow};
pub use resolver::{ConflictResolver, Resolution};
pub use rules::{apply_rule, RuleEngine, DEFAULT_RULES};
pub use scorer::QualityScorer;

// Re-exports
pub use contracts::{
    ContentAnalysis, InvalidWindowPolicy, SyncEngineConfig, SyncRequest, SynchronizedTimeline,
    TimelineEvent, TimelineMeta,
};
