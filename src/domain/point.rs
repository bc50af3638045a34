//! Probe measurement types
//!
//! A measurement is a single handle in image coordinates plus the pixel
//! statistics last sampled under it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::geometry::ImagePoint;
use crate::config::ToolColor;

static NEXT_POINT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u64);

impl PointId {
    pub fn next() -> Self {
        Self(NEXT_POINT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Pixel sample taken under the handle
#[derive(Clone, Debug, PartialEq)]
pub enum PixelSample {
    Grayscale {
        /// Stored value before any rescale
        stored: f64,
        /// `stored * slope + intercept`
        modality: f64,
        /// Standardized uptake value, PET images with full calibration only
        suv: Option<f64>,
    },
    Color { rgb: [u8; 3] },
}

/// Statistics for an in-bounds handle
#[derive(Clone, Debug, PartialEq)]
pub struct PixelStats {
    /// Rounded pixel column
    pub x: u32,
    /// Rounded pixel row
    pub y: u32,
    pub sample: PixelSample,
}

/// Where the cached statistics stand relative to the handle position
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Cache reflects the current position
    Fresh,
    /// Position or image changed since the last compute
    #[default]
    Invalidated,
    /// A deferred recompute is scheduled for `due`
    Recomputing { due: Instant },
}

/// Cached statistics of one measurement
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatsCache {
    /// `None` after a compute means the handle is outside the image
    pub stats: Option<PixelStats>,
    pub state: CacheState,
    /// When the last actual compute ran
    pub last_run: Option<Instant>,
}

impl StatsCache {
    /// Whether statistics were ever computed for this measurement
    pub fn has_run(&self) -> bool {
        self.last_run.is_some()
    }

    pub fn is_fresh(&self) -> bool {
        self.state == CacheState::Fresh
    }

    /// Mark stale; an already scheduled recompute absorbs the change
    pub fn invalidate(&mut self) {
        if !matches!(self.state, CacheState::Recomputing { .. }) {
            self.state = CacheState::Invalidated;
        }
    }

    pub fn store(&mut self, stats: Option<PixelStats>, now: Instant) {
        self.stats = stats;
        self.state = CacheState::Fresh;
        self.last_run = Some(now);
    }
}

/// Probe measurement owned by the host's tool state
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatedPoint {
    pub id: PointId,
    /// Handle position in image pixel space
    pub position: ImagePoint,
    pub visible: bool,
    pub active: bool,
    /// Overrides the active/inactive tool colors when set
    pub color: Option<ToolColor>,
    pub annotation: String,
    pub cache: StatsCache,
}

impl AnnotatedPoint {
    pub fn new(position: ImagePoint) -> Self {
        Self {
            id: PointId::next(),
            position,
            visible: true,
            active: true,
            color: None,
            annotation: String::new(),
            cache: StatsCache::default(),
        }
    }

    /// Drag the handle to a new position
    pub fn move_to(&mut self, position: ImagePoint) {
        self.position = position;
        self.cache.invalidate();
    }

    /// Force a recompute on the next render, e.g. after the image changed
    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn stats(&self) -> Option<&PixelStats> {
        self.cache.stats.as_ref()
    }
}
