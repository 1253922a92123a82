//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position (playfield pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn at(pos: Vec2, color: [f32; 4]) -> Self {
        Self::new(pos.x, pos.y, color)
    }
}

/// Colors for game elements
pub mod colors {
    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const LANE_DIVIDER: [f32; 4] = [0.2, 0.2, 0.2, 1.0];
    /// Gates are drawn at roughly 60% opacity
    pub const GATE_GOOD: [f32; 4] = [0.0, 0.39, 1.0, 0.59];
    pub const GATE_BAD: [f32; 4] = [1.0, 0.2, 0.2, 0.59];
    pub const SWARM_UNIT: [f32; 4] = [1.0, 0.2, 0.2, 1.0];
    pub const BOSS: [f32; 4] = [0.78, 0.0, 0.78, 1.0];
    pub const PROGRESS_FILL: [f32; 4] = [0.0, 0.39, 1.0, 1.0];
    pub const RESULT_DIM: [f32; 4] = [0.0, 0.0, 0.0, 0.59];
}
