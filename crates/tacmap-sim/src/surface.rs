//! Non-georeferenced tactical grid surface.
//!
//! A simple `MapSurface` that places markers at percentage positions inside a
//! bounding box, the way a static tactical board would. It needs no access
//! credential, only an explicit `initialize` with the area to display.

use std::collections::BTreeMap;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use tacmap_core::enums::EntityKind;
use tacmap_core::geo;
use tacmap_core::types::Coordinate;

use crate::map_sync::{MapSurface, MarkerGeometry, MarkerStyle, SurfaceError};

/// Click tolerance around a marker anchor, in percent of the board.
pub const HIT_RADIUS_PCT: f64 = 2.0;

/// Geographic area shown on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

impl GridBounds {
    /// Smallest box around `points`, padded by `margin_deg` on each side.
    pub fn around(points: &[Coordinate], margin_deg: f64) -> Option<Self> {
        let first = points.first()?;
        let (mut min, mut max) = (first.to_dvec2(), first.to_dvec2());
        for point in &points[1..] {
            min = min.min(point.to_dvec2());
            max = max.max(point.to_dvec2());
        }
        let margin = DVec2::splat(margin_deg);
        let (min, max) = (min - margin, max + margin);
        Some(Self {
            south_west: Coordinate {
                latitude: min.y,
                longitude: min.x,
            }
            .clamped(),
            north_east: Coordinate {
                latitude: max.y,
                longitude: max.x,
            }
            .clamped(),
        })
    }

    /// Position as percentages of the box: x from the west edge, y from the north edge.
    pub fn project(&self, coordinate: &Coordinate) -> DVec2 {
        let sw = self.south_west.to_dvec2();
        let ne = self.north_east.to_dvec2();
        let span = (ne - sw).max(DVec2::splat(f64::EPSILON));
        let unit = (coordinate.to_dvec2() - sw) / span;
        DVec2::new(unit.x, 1.0 - unit.y) * 100.0
    }

    /// Width of the box along its middle latitude (km), for a scale read-out.
    pub fn width_km(&self) -> f64 {
        let mid_lat = (self.south_west.latitude + self.north_east.latitude) / 2.0;
        geo::distance_km(
            &Coordinate {
                latitude: mid_lat,
                longitude: self.south_west.longitude,
            },
            &Coordinate {
                latitude: mid_lat,
                longitude: self.north_east.longitude,
            },
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridHandle(pub u32);

/// A marker as placed on the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMarker {
    pub geometry: MarkerGeometry,
    pub style: MarkerStyle,
    /// Anchor position in percent of the grid (x east, y south).
    pub cell: DVec2,
}

/// Running totals of marker operations accepted by the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SurfaceOps {
    pub created: u32,
    pub updated: u32,
    pub destroyed: u32,
}

impl SurfaceOps {
    pub fn total(&self) -> u32 {
        self.created + self.updated + self.destroyed
    }
}

#[derive(Debug, Default)]
pub struct GridSurface {
    bounds: Option<GridBounds>,
    next_handle: u32,
    markers: BTreeMap<GridHandle, GridMarker>,
    ops: SurfaceOps,
}

impl GridSurface {
    /// Create an uninitialized grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid that is ready immediately.
    pub fn with_bounds(bounds: GridBounds) -> Self {
        Self {
            bounds: Some(bounds),
            ..Self::default()
        }
    }

    pub fn initialize(&mut self, bounds: GridBounds) {
        self.bounds = Some(bounds);
        let projected: Vec<(GridHandle, DVec2)> = self
            .markers
            .iter()
            .map(|(&handle, marker)| (handle, anchor_cell(&bounds, &marker.geometry)))
            .collect();
        for (handle, cell) in projected {
            if let Some(marker) = self.markers.get_mut(&handle) {
                marker.cell = cell;
            }
        }
    }

    pub fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    pub fn markers(&self) -> impl Iterator<Item = (&GridHandle, &GridMarker)> {
        self.markers.iter()
    }

    pub fn marker(&self, handle: GridHandle) -> Option<&GridMarker> {
        self.markers.get(&handle)
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn ops(&self) -> SurfaceOps {
        self.ops
    }

    /// Nearest marker whose anchor lies within `radius_pct` of `cell`. Ties go
    /// to the older marker.
    pub fn hit_test(&self, cell: DVec2, radius_pct: f64) -> Option<GridHandle> {
        self.markers
            .iter()
            .filter(|(_, marker)| marker.cell.distance(cell) <= radius_pct)
            .min_by(|(_, a), (_, b)| {
                a.cell
                    .distance(cell)
                    .total_cmp(&b.cell.distance(cell))
            })
            .map(|(&handle, _)| handle)
    }

    /// Character rendering of the board, one string per row.
    ///
    /// Soldiers are drawn as `A`/`!`/`o` (active, alert, offline colour), zones
    /// as `#`, objectives as `*` (`+` when completed).
    pub fn render_rows(&self, cols: usize, rows: usize) -> Vec<String> {
        let cols = cols.max(1);
        let rows = rows.max(1);
        let mut grid = vec![vec!['.'; cols]; rows];

        for marker in self.markers.values() {
            let col = ((marker.cell.x / 100.0) * (cols - 1) as f64).round();
            let row = ((marker.cell.y / 100.0) * (rows - 1) as f64).round();
            if !(0.0..cols as f64).contains(&col) || !(0.0..rows as f64).contains(&row) {
                continue;
            }
            grid[row as usize][col as usize] = glyph(&marker.style);
        }

        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }

    fn require_bounds(&self) -> Result<GridBounds, SurfaceError> {
        self.bounds.ok_or(SurfaceError::NotInitialized)
    }
}

impl MapSurface for GridSurface {
    type Handle = GridHandle;

    fn is_initialized(&self) -> bool {
        self.bounds.is_some()
    }

    fn create_marker(
        &mut self,
        geometry: &MarkerGeometry,
        style: &MarkerStyle,
    ) -> Result<GridHandle, SurfaceError> {
        let bounds = self.require_bounds()?;
        self.next_handle += 1;
        let handle = GridHandle(self.next_handle);
        self.markers.insert(
            handle,
            GridMarker {
                geometry: geometry.clone(),
                style: style.clone(),
                cell: anchor_cell(&bounds, geometry),
            },
        );
        self.ops.created += 1;
        Ok(handle)
    }

    fn update_marker(
        &mut self,
        handle: GridHandle,
        geometry: &MarkerGeometry,
        style: &MarkerStyle,
    ) -> Result<(), SurfaceError> {
        let bounds = self.require_bounds()?;
        let marker = self
            .markers
            .get_mut(&handle)
            .ok_or(SurfaceError::UnknownHandle)?;
        marker.geometry = geometry.clone();
        marker.style = style.clone();
        marker.cell = anchor_cell(&bounds, geometry);
        self.ops.updated += 1;
        Ok(())
    }

    fn destroy_marker(&mut self, handle: GridHandle) -> Result<(), SurfaceError> {
        self.markers
            .remove(&handle)
            .ok_or(SurfaceError::UnknownHandle)?;
        self.ops.destroyed += 1;
        Ok(())
    }

    fn marker_at(&self, coordinate: &Coordinate) -> Option<GridHandle> {
        let bounds = self.bounds?;
        self.hit_test(bounds.project(coordinate), HIT_RADIUS_PCT)
    }
}

fn anchor_cell(bounds: &GridBounds, geometry: &MarkerGeometry) -> DVec2 {
    match geometry {
        MarkerGeometry::Point(point) => bounds.project(point),
        MarkerGeometry::Polygon(points) => {
            bounds.project(&geo::centroid(points).unwrap_or(bounds.south_west))
        }
    }
}

fn glyph(style: &MarkerStyle) -> char {
    match style.kind {
        EntityKind::Zone => '#',
        EntityKind::Objective if style.faded => '+',
        EntityKind::Objective => '*',
        EntityKind::Soldier if style.pulsing => '!',
        EntityKind::Soldier if style.color == tacmap_core::constants::COLOR_OFFLINE => 'o',
        EntityKind::Soldier => 'A',
    }
}
