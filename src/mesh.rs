use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use thiserror::Error;

/// Radius of the circle the rim points are placed on.
pub const RIM_RADIUS: f32 = 0.5;

/// Largest vertex buffer the renderer requests, matching wgpu's default
/// `max_buffer_size`.
pub const MAX_VERTEX_BUFFER_BYTES: u64 = 256 << 20;

/// Largest side count whose closed prism fits in [`MAX_VERTEX_BUFFER_BYTES`].
pub const MAX_SIDES: u32 =
    (MAX_VERTEX_BUFFER_BYTES / (4 * std::mem::size_of::<Triangle>() as u64)) as u32;

const TOP_CAP_COLOR: Vec3 = Vec3::new(0.95, 0.55, 0.2);
const BOTTOM_CAP_COLOR: Vec3 = Vec3::new(0.2, 0.55, 0.95);

/// Rejected mesh parameters.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MeshError {
    #[error("a prism needs at least 3 sides, got {sides}")]
    InvalidSideCount { sides: i64 },
    #[error("a prism can have at most {max} sides, got {sides}")]
    TooManySides { sides: i64, max: u32 },
    #[error("half length must be a positive finite number, got {half_length}")]
    InvalidHalfLength { half_length: f32 },
}

/// Interleaved vertex as uploaded to the GPU: `position.xyz` then `color.rgb`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Vec3,
}

impl Vertex {
    pub const fn new(position: Vec3, color: Vec3) -> Self {
        Self { position, color }
    }
}

/// Three vertices drawn as an independent triangle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Triangle(pub [Vertex; 3]);

/// Flat triangle list without an index buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct PrismMesh {
    sides: u32,
    half_length: f32,
    triangles: Vec<Triangle>,
}

impl PrismMesh {
    pub fn sides(&self) -> u32 {
        self.sides
    }

    /// Distance of each cap from the origin; zero for a lone cap polygon.
    pub fn half_length(&self) -> f32 {
        self.half_length
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.triangles.iter().flat_map(|triangle| triangle.0.iter())
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.triangles.len() * 3
    }
}

/// Builds a closed prism of `sides` faces spanning `-half_length..=half_length`
/// along Z.
///
/// Triangles are emitted as the top cap, the bottom cap and then two wall
/// triangles per side, `4 * sides` in total.
pub fn prism(sides: u32, half_length: f32) -> Result<PrismMesh, MeshError> {
    validate_sides(sides)?;
    let half_length = check_half_length(half_length)?;

    let n = sides as usize;
    let mut triangles = Vec::with_capacity(4 * n);

    for (z, color) in [(half_length, TOP_CAP_COLOR), (-half_length, BOTTOM_CAP_COLOR)] {
        for i in 0..sides {
            let center = Vertex::new(Vec3::new(0.0, 0.0, z), color);
            let current = Vertex::new(rim_point(i, sides).extend(z), color);
            let next = Vertex::new(rim_point(i + 1, sides).extend(z), color);
            triangles.push(Triangle([center, current, next]));
        }
    }

    for i in 0..sides {
        let color = wall_color(i, sides);
        let current = rim_point(i, sides);
        let next = rim_point(i + 1, sides);
        let current_top = Vertex::new(current.extend(half_length), color);
        let current_bottom = Vertex::new(current.extend(-half_length), color);
        let next_top = Vertex::new(next.extend(half_length), color);
        let next_bottom = Vertex::new(next.extend(-half_length), color);
        triangles.push(Triangle([current_top, current_bottom, next_bottom]));
        triangles.push(Triangle([next_bottom, next_top, current_top]));
    }

    Ok(PrismMesh {
        sides,
        half_length,
        triangles,
    })
}

/// Builds a single flat n-gon at `z = 0`, one triangle per side.
///
/// Drawn twice with a translation of `±h` it renders the two end caps
/// without walls.
pub fn cap_polygon(sides: u32) -> Result<PrismMesh, MeshError> {
    validate_sides(sides)?;
    let triangles = (0..sides)
        .map(|i| {
            let color = wall_color(i, sides);
            Triangle([
                Vertex::new(Vec3::ZERO, color),
                Vertex::new(rim_point(i, sides).extend(0.0), color),
                Vertex::new(rim_point(i + 1, sides).extend(0.0), color),
            ])
        })
        .collect();
    Ok(PrismMesh {
        sides,
        half_length: 0.0,
        triangles,
    })
}

/// Accepts only positive, finite half lengths.
pub fn check_half_length(half_length: f32) -> Result<f32, MeshError> {
    if !half_length.is_finite() || half_length <= 0.0 {
        return Err(MeshError::InvalidHalfLength { half_length });
    }
    Ok(half_length)
}

/// Converts a user supplied side count, rejecting values outside `3..=MAX_SIDES`.
pub fn side_count(sides: i64) -> Result<u32, MeshError> {
    if sides < 3 {
        return Err(MeshError::InvalidSideCount { sides });
    }
    match u32::try_from(sides) {
        Ok(sides) if sides <= MAX_SIDES => Ok(sides),
        _ => Err(MeshError::TooManySides {
            sides,
            max: MAX_SIDES,
        }),
    }
}

fn validate_sides(sides: u32) -> Result<(), MeshError> {
    side_count(sides.into()).map(|_| ())
}

/// Point `index` of the rim; `index == sides` wraps back onto the first one.
fn rim_point(index: u32, sides: u32) -> Vec2 {
    let theta = index as f32 * TAU / sides as f32;
    Vec2::new(RIM_RADIUS * theta.cos(), RIM_RADIUS * theta.sin())
}

fn wall_color(index: u32, sides: u32) -> Vec3 {
    let t = index as f32 / sides as f32;
    Vec3::new(t, 1.0 - t, 0.5)
}
