//! Point probe annotation tool for medical image viewers
//!
//! The viewer hands the probe its image, a coordinate transform and a
//! renderer; the probe keeps per-measurement pixel statistics (stored value,
//! modality value, PET SUV or RGB) up to date and emits the draw calls for the
//! handle and its label.

pub mod config;
pub mod domain;
pub mod error;
pub mod imaging;
pub mod probe;
pub mod render;
pub mod store;
pub mod throttle;

pub use config::{ProbeConfig, ToolColor};
pub use domain::{AnnotatedPoint, CanvasPoint, CanvasTransform, ImagePoint, PixelStats, Viewport};
pub use error::ProbeError;
pub use imaging::{ProbeImage, ViewerImage};
pub use probe::{AnnotationPrompt, AnnotationTool, InteractionEvent, PointProbe, RenderDescription};
pub use render::{DisplayList, Renderer};
pub use store::{SurfaceId, ToolStateStore};
