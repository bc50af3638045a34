//! In-memory tool state
//!
//! Measurements are kept per display surface and per tool name, in insertion
//! order. Hit testing walks that order, so the oldest measurement wins ties.

use std::collections::HashMap;

use crate::domain::{AnnotatedPoint, PointId};

/// Handle of a display surface (viewport element) in the viewer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub u32);

#[derive(Clone, Debug, Default)]
pub struct ToolStateStore {
    entries: HashMap<(SurfaceId, String), Vec<AnnotatedPoint>>,
}

impl ToolStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, surface: SurfaceId, tool: &str, point: AnnotatedPoint) {
        self.entries
            .entry((surface, tool.to_string()))
            .or_default()
            .push(point);
    }

    /// Measurements of `tool` on `surface`, empty if there are none
    pub fn points(&self, surface: SurfaceId, tool: &str) -> &[AnnotatedPoint] {
        self.entries
            .get(&(surface, tool.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn points_mut(&mut self, surface: SurfaceId, tool: &str) -> &mut [AnnotatedPoint] {
        match self.entries.get_mut(&(surface, tool.to_string())) {
            Some(points) => points.as_mut_slice(),
            None => &mut [],
        }
    }

    pub fn find_mut(&mut self, id: PointId) -> Option<&mut AnnotatedPoint> {
        self.entries
            .values_mut()
            .flat_map(|points| points.iter_mut())
            .find(|point| point.id == id)
    }

    /// Remove one measurement. The tool may still hold an annotation request
    /// for it; `PointProbe::remove_measurement` removes both.
    pub fn remove(&mut self, surface: SurfaceId, tool: &str, id: PointId) -> Option<AnnotatedPoint> {
        let points = self.entries.get_mut(&(surface, tool.to_string()))?;
        let index = points.iter().position(|point| point.id == id)?;
        Some(points.remove(index))
    }

    pub fn clear(&mut self, surface: SurfaceId, tool: &str) {
        self.entries.remove(&(surface, tool.to_string()));
    }

    /// Mark every measurement on `surface` stale, e.g. after the image changed
    pub fn invalidate_surface(&mut self, surface: SurfaceId) {
        self.entries
            .iter_mut()
            .filter(|((id, _), _)| *id == surface)
            .flat_map(|(_, points)| points.iter_mut())
            .for_each(AnnotatedPoint::invalidate);
    }
}
