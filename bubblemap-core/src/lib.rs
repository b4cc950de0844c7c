//! Bubblemap Core Library
//!
//! Record extraction from spreadsheet grids, size normalization, overlap
//! detection and label placement for bubble charts.

pub mod types;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod config;
pub mod geometry;
pub mod axes;
pub mod overlap;
pub mod placement;
pub mod drag;
pub mod layout;
pub mod chart;

// Re-export commonly used types and functions
pub use types::{Category, DataPoint, LabelOffset, LabelPosition, LabelState, OverlapPair, PointId, Pointer};
pub use error::{ConfigError, DragError, ExtractResult, ExtractionError, SkipReason};
pub use extract::{extract, Cell, Extraction, ExtractorFactory, Grid, RecordExtractor};
pub use config::{ChartKind, LayoutConfig, Viewport};
pub use layout::{recompute, Layout, LayoutOptions, RenderedPoint};
pub use chart::{BubbleChart, CategoryFilter, SortKey, TopN};
pub use drag::Subscription;

/// Version information for the bubblemap core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
