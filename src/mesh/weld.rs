//! Vertex welding.
//!
//! Loaders hand over one vertex record per triangle corner. Welding collapses
//! corners that share a position into a single [`PointId`]; texture
//! coordinates are deliberately ignored here; UV divergence between faces is
//! resolved per edge during subdivision.

use std::collections::HashMap;

use nalgebra::Point3;

use super::index::PointId;

/// How corner positions are compared when welding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum WeldMode {
    /// Bitwise-equal coordinates weld (with `-0.0 == 0.0`).
    #[default]
    Exact,
    /// Coordinates within the given per-axis distance weld.
    Tolerance(f32),
}

/// The result of welding: a bijection between points and their first corner,
/// plus the corner-to-point map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Welding {
    point_to_corner: Vec<u32>,
    corner_to_point: Vec<PointId>,
}

impl Welding {
    /// Number of welded points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.point_to_corner.len()
    }

    /// Number of corners that were welded.
    #[inline]
    pub fn num_corners(&self) -> usize {
        self.corner_to_point.len()
    }

    /// The point a corner was welded into.
    #[inline]
    pub fn point_of(&self, corner: u32) -> PointId {
        self.corner_to_point[corner as usize]
    }

    /// The first corner that produced a point.
    #[inline]
    pub fn corner_of(&self, point: PointId) -> u32 {
        self.point_to_corner[point.index()]
    }

    /// Point-to-first-corner map, indexed by point.
    pub fn point_to_corner(&self) -> &[u32] {
        &self.point_to_corner
    }

    /// Corner-to-point map, indexed by corner.
    pub fn corner_to_point(&self) -> &[PointId] {
        &self.corner_to_point
    }
}

/// Weld corner positions into points.
///
/// Points are numbered in order of first occurrence, so with
/// [`WeldMode::Exact`] the partition of corners never depends on their order.
///
/// # Example
/// ```
/// use nalgebra::Point3;
/// use quilt::mesh::{weld, WeldMode};
///
/// let positions = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 0.0),
/// ];
/// let welding = weld(&positions, WeldMode::Exact);
/// assert_eq!(welding.num_points(), 2);
/// assert_eq!(welding.point_of(0), welding.point_of(2));
/// ```
pub fn weld(positions: &[Point3<f32>], mode: WeldMode) -> Welding {
    match mode {
        WeldMode::Tolerance(eps) if eps > 0.0 => weld_tolerant(positions, eps),
        _ => weld_exact(positions),
    }
}

fn canonical_bits(v: f32) -> u32 {
    // -0.0 and 0.0 compare equal numerically, so they must hash equally too
    if v == 0.0 {
        0
    } else {
        v.to_bits()
    }
}

fn weld_exact(positions: &[Point3<f32>]) -> Welding {
    let mut point_to_corner = Vec::new();
    let mut corner_to_point = Vec::with_capacity(positions.len());
    let mut seen: HashMap<[u32; 3], PointId> = HashMap::with_capacity(positions.len());

    for (corner, p) in positions.iter().enumerate() {
        let key = [canonical_bits(p.x), canonical_bits(p.y), canonical_bits(p.z)];
        let point = *seen.entry(key).or_insert_with(|| {
            point_to_corner.push(corner as u32);
            PointId::new(point_to_corner.len() - 1)
        });
        corner_to_point.push(point);
    }

    Welding {
        point_to_corner,
        corner_to_point,
    }
}

fn weld_tolerant(positions: &[Point3<f32>], eps: f32) -> Welding {
    // Far from the origin the cell index saturates; candidates are still
    // confirmed by distance, so crowded saturated cells only cost time
    let cell = |v: f32| (f64::from(v) / f64::from(eps)).floor() as i64;
    let cell_of = |p: &Point3<f32>| -> [i64; 3] { [cell(p.x), cell(p.y), cell(p.z)] };

    let mut point_to_corner: Vec<u32> = Vec::new();
    let mut corner_to_point = Vec::with_capacity(positions.len());
    let mut grid: HashMap<[i64; 3], Vec<PointId>> = HashMap::new();

    for (corner, p) in positions.iter().enumerate() {
        let [cx, cy, cz] = cell_of(p);

        // Lowest-numbered match wins, independent of hash iteration order
        let mut best: Option<PointId> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(candidates) = grid.get(&[
                        cx.saturating_add(dx),
                        cy.saturating_add(dy),
                        cz.saturating_add(dz),
                    ]) else {
                        continue;
                    };
                    for &candidate in candidates {
                        let q = &positions[point_to_corner[candidate.index()] as usize];
                        let close = (p.x - q.x).abs() <= eps
                            && (p.y - q.y).abs() <= eps
                            && (p.z - q.z).abs() <= eps;
                        if close && best.map_or(true, |b| candidate < b) {
                            best = Some(candidate);
                        }
                    }
                }
            }
        }

        let point = match best {
            Some(point) => point,
            None => {
                let point = PointId::new(point_to_corner.len());
                point_to_corner.push(corner as u32);
                grid.entry([cx, cy, cz]).or_default().push(point);
                point
            }
        };
        corner_to_point.push(point);
    }

    Welding {
        point_to_corner,
        corner_to_point,
    }
}
