//! Point probe annotation tool
//!
//! Drops a handle on the image, samples the pixel under it and labels it with
//! the position and the sampled values. Double-clicking a handle requests
//! free-text annotation from the host.
//!
//! Statistics are cached per measurement. A measurement that was never sampled
//! is sampled synchronously on its first render; later invalidations (drags)
//! are throttled per measurement so a fast drag recomputes at most once per
//! throttle interval, with one trailing recompute at the end of the interval.

pub mod describe;
mod prompt;
pub mod stats;

use std::time::Instant;

use crate::config::{ProbeConfig, ToolColor};
use crate::domain::{
    AnnotatedPoint, CacheState, CanvasPoint, CanvasTransform, ImagePoint, PixelStats, PointId,
};
use crate::error::{ProbeError, Result};
use crate::imaging::ProbeImage;
use crate::render::{HandleStyle, Renderer, draw, layout};
use crate::store::{SurfaceId, ToolStateStore};
use crate::throttle::{Clock, Decision, MonotonicClock, Throttle};

pub use describe::{LabelText, RenderDescription, describe, format_value};
pub use prompt::AnnotationPrompt;
pub use stats::compute_stats;

use prompt::{PendingAnnotation, Progress};

/// Pointer or touch event as delivered by the viewer
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionEvent {
    /// Event position in image space
    pub image: Option<ImagePoint>,
    /// Event position in canvas space
    pub canvas: Option<CanvasPoint>,
}

impl InteractionEvent {
    pub fn new(image: ImagePoint, canvas: CanvasPoint) -> Self {
        Self {
            image: Some(image),
            canvas: Some(canvas),
        }
    }

    /// Event carrying canvas coordinates only, derive image ones with `transform`
    pub fn from_canvas(canvas: CanvasPoint, transform: &dyn CanvasTransform) -> Self {
        Self::new(transform.canvas_to_image(canvas), canvas)
    }
}

/// Extension points a viewer calls on an annotation tool
pub trait AnnotationTool {
    fn name(&self) -> &str;

    /// New measurement for a "create" interaction, `None` if the event is unusable
    fn create_measurement(&self, event: &InteractionEvent) -> Option<AnnotatedPoint>;

    /// Whether `coords` is close enough to the measurement to select it
    fn point_near_tool(
        &self,
        point: &AnnotatedPoint,
        coords: CanvasPoint,
        transform: &dyn CanvasTransform,
    ) -> bool;

    /// Draw every visible measurement of one display surface
    fn render_tool_data(
        &mut self,
        image: &dyn ProbeImage,
        points: &mut [AnnotatedPoint],
        transform: &dyn CanvasTransform,
        renderer: &mut dyn Renderer,
    );

    /// Start annotating the first measurement near the double-click
    fn on_double_click(
        &mut self,
        event: &InteractionEvent,
        points: &[AnnotatedPoint],
        transform: &dyn CanvasTransform,
    ) -> Option<AnnotationPrompt>;
}

/// Set the free-text annotation; an empty string clears it
pub fn annotate(point: &mut AnnotatedPoint, text: impl Into<String>) {
    point.annotation = text.into();
}

pub struct PointProbe<C: Clock = MonotonicClock> {
    name: String,
    config: ProbeConfig,
    throttle: Throttle,
    clock: C,
    pending: Vec<PendingAnnotation>,
}

impl PointProbe {
    pub fn new(config: ProbeConfig) -> Self {
        Self::with_clock(config, MonotonicClock)
    }
}

impl Default for PointProbe {
    fn default() -> Self {
        Self::new(ProbeConfig::default())
    }
}

impl<C: Clock> PointProbe<C> {
    pub const DEFAULT_NAME: &'static str = "Point";

    pub fn with_clock(config: ProbeConfig, clock: C) -> Self {
        Self {
            name: Self::DEFAULT_NAME.to_string(),
            throttle: Throttle::new(config.throttle_interval()),
            config,
            clock,
            pending: Vec::new(),
        }
    }

    /// Register the tool under another name, e.g. for a second instance
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ProbeConfig) {
        self.throttle = Throttle::new(config.throttle_interval());
        self.config = config;
    }

    pub fn try_create(&self, event: &InteractionEvent) -> Result<AnnotatedPoint> {
        let position = event.image.ok_or_else(|| ProbeError::MissingInputData {
            tool: self.name.clone(),
            operation: "create_measurement",
        })?;
        Ok(AnnotatedPoint::new(position))
    }

    /// Hit test against the handle; invisible measurements never hit
    pub fn try_hit_test(
        &self,
        point: &AnnotatedPoint,
        coords: CanvasPoint,
        transform: &dyn CanvasTransform,
    ) -> Result<bool> {
        if !point.position.is_finite() {
            return Err(ProbeError::MalformedMeasurement {
                tool: self.name.clone(),
                operation: "point_near_tool",
            });
        }
        if !point.visible {
            return Ok(false);
        }
        let handle = transform.image_to_canvas(point.position);
        Ok(handle.distance_to(&coords) < self.config.hit_radius)
    }

    /// Recompute the cached statistics now, regardless of the throttle
    pub fn update_cached_stats<'p>(
        &self,
        image: &dyn ProbeImage,
        point: &'p mut AnnotatedPoint,
    ) -> Option<&'p PixelStats> {
        let now = self.clock.now();
        self.recompute(image, point, now);
        point.stats()
    }

    fn recompute(&self, image: &dyn ProbeImage, point: &mut AnnotatedPoint, now: Instant) {
        let stats = compute_stats(image, point.position);
        log::trace!(
            "point {} at ({:.2}, {:.2}): {:?}",
            point.id.get(),
            point.position.x,
            point.position.y,
            stats
        );
        point.cache.store(stats, now);
    }

    /// Bring the cache up to date as far as the throttle allows
    pub fn refresh(&self, image: &dyn ProbeImage, point: &mut AnnotatedPoint) {
        let now = self.clock.now();
        match point.cache.state {
            CacheState::Fresh => {}
            CacheState::Invalidated if !point.cache.has_run() => {
                self.recompute(image, point, now);
            }
            CacheState::Invalidated => match self.throttle.decide(point.cache.last_run, now) {
                Decision::RunNow => self.recompute(image, point, now),
                Decision::RunAt(due) => {
                    log::trace!("point {} recompute deferred", point.id.get());
                    point.cache.state = CacheState::Recomputing { due };
                }
            },
            CacheState::Recomputing { due } if now >= due => {
                self.recompute(image, point, now);
            }
            CacheState::Recomputing { .. } => {}
        }
    }

    /// Earliest scheduled recompute, so the host can repaint in time
    pub fn next_deadline(&self, points: &[AnnotatedPoint]) -> Option<Instant> {
        points
            .iter()
            .filter_map(|point| match point.cache.state {
                CacheState::Recomputing { due } => Some(due),
                _ => None,
            })
            .min()
    }

    /// Refresh the cache, then describe the measurement
    pub fn describe_for_render(
        &self,
        image: &dyn ProbeImage,
        point: &mut AnnotatedPoint,
    ) -> RenderDescription {
        self.refresh(image, point);
        describe(image, point, self.config.text_offset)
    }

    /// Point override, else active or inactive tool color
    pub fn color_for(&self, point: &AnnotatedPoint) -> ToolColor {
        point.color.unwrap_or(if point.active {
            self.config.active_color
        } else {
            self.config.tool_color
        })
    }

    fn handle_style(&self, color: ToolColor) -> HandleStyle {
        HandleStyle {
            color,
            radius: self.config.handle_radius,
            line_dash: self
                .config
                .render_dashed
                .then(|| self.config.line_dash.clone()),
        }
    }

    /// Apply host replies to outstanding prompts. Returns how many were applied.
    ///
    /// Replies for measurements missing from `points` stay queued, they may
    /// belong to another display surface.
    pub fn apply_pending_annotations(&mut self, points: &mut [AnnotatedPoint]) -> usize {
        let mut applied = 0;
        self.pending.retain_mut(|pending| match pending.poll() {
            Progress::Waiting => true,
            Progress::Cancelled => {
                log::debug!("annotation of point {} cancelled", pending.point().get());
                false
            }
            Progress::Ready(text) => {
                match points.iter_mut().find(|point| point.id == pending.point()) {
                    Some(point) => {
                        annotate(point, text);
                        applied += 1;
                        false
                    }
                    None => true,
                }
            }
        });
        applied
    }

    /// Drop outstanding prompts for a measurement the host removed
    pub fn discard_annotation_requests(&mut self, point: PointId) {
        self.pending.retain(|pending| pending.point() != point);
    }

    /// Remove a measurement of this tool from `store` together with any
    /// annotation request still outstanding for it
    pub fn remove_measurement(
        &mut self,
        store: &mut ToolStateStore,
        surface: SurfaceId,
        id: PointId,
    ) -> Option<AnnotatedPoint> {
        self.discard_annotation_requests(id);
        store.remove(surface, &self.name, id)
    }

    pub fn pending_annotations(&self) -> usize {
        self.pending.len()
    }
}

impl<C: Clock> AnnotationTool for PointProbe<C> {
    fn name(&self) -> &str {
        &self.name
    }

    fn create_measurement(&self, event: &InteractionEvent) -> Option<AnnotatedPoint> {
        match self.try_create(event) {
            Ok(point) => Some(point),
            Err(err) => {
                log::error!("{}", err);
                None
            }
        }
    }

    fn point_near_tool(
        &self,
        point: &AnnotatedPoint,
        coords: CanvasPoint,
        transform: &dyn CanvasTransform,
    ) -> bool {
        self.try_hit_test(point, coords, transform)
            .unwrap_or_else(|err| {
                log::warn!("{}", err);
                false
            })
    }

    fn render_tool_data(
        &mut self,
        image: &dyn ProbeImage,
        points: &mut [AnnotatedPoint],
        transform: &dyn CanvasTransform,
        renderer: &mut dyn Renderer,
    ) {
        self.apply_pending_annotations(points);
        let font_height = renderer.font_height();

        for point in points.iter_mut().filter(|point| point.visible) {
            if !point.position.is_finite() {
                log::warn!(
                    "{}: not drawing point {} at {:?}",
                    self.name,
                    point.id.get(),
                    point.position
                );
                continue;
            }
            let color = self.color_for(point);
            draw(renderer, |renderer| {
                if self.config.draw_handles {
                    let style = self.handle_style(color);
                    renderer.draw_handle(transform.image_to_canvas(point.position), &style);
                }

                let Some(label) = self.describe_for_render(image, point).label else {
                    return;
                };
                let anchor = transform.image_to_canvas(label.anchor);
                renderer.draw_text_box(
                    &label.value,
                    anchor.x,
                    anchor.y + font_height + layout::VALUE_GAP,
                    color,
                );
                renderer.draw_text_box(
                    &label.coordinates,
                    anchor.x,
                    anchor.y + font_height + layout::COORDINATES_GAP,
                    color,
                );
                renderer.draw_text_box(&label.annotation, anchor.x, anchor.y, color);
            });
        }
    }

    fn on_double_click(
        &mut self,
        event: &InteractionEvent,
        points: &[AnnotatedPoint],
        transform: &dyn CanvasTransform,
    ) -> Option<AnnotationPrompt> {
        let Some(coords) = event.canvas else {
            log::error!(
                "{}",
                ProbeError::MissingInputData {
                    tool: self.name.clone(),
                    operation: "on_double_click",
                }
            );
            return None;
        };

        let target = points
            .iter()
            .find(|point| self.point_near_tool(point, coords, transform))?;
        let (prompt, pending) = prompt::request(target);
        self.pending.push(pending);
        Some(prompt)
    }
}
