//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - `PrecisionTime`: integer microseconds, exposed as fractional milliseconds
//! - Floats are accepted only at the boundary and rounded half-up once
//! - No floating point is used for timestamp comparisons

mod analysis;
mod error;
mod event;
mod event_id;
mod job;
mod request;
mod sync_engine_config;
mod time;
mod timeline;

pub use analysis::*;
pub use error::*;
pub use event::*;
pub use event_id::EventId;
pub use job::*;
pub use request::*;
pub use sync_engine_config::*;
pub use time::{FrameRate, PrecisionTime};
pub use timeline::*;
