//! Shape generation for 2D primitives

use glam::Vec2;

use super::FrameView;
use super::crowd::{CrowdLayout, UNIT_SPRITE_SIZE};
use super::vertex::{Vertex, colors};
use crate::sim::{GamePhase, Polarity, Rect};

/// Border width for gates and the boss
const BORDER: f32 = 5.0;
/// Progress bar placement (pixels)
const BAR_POS: Vec2 = Vec2::new(100.0, 20.0);
const BAR_SIZE: Vec2 = Vec2::new(400.0, 20.0);

/// Generate vertices for a filled axis-aligned quad
pub fn quad(min: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    let max = min + size;
    let top_right = Vec2::new(max.x, min.y);
    let bottom_left = Vec2::new(min.x, max.y);
    [
        Vertex::at(min, color),
        Vertex::at(top_right, color),
        Vertex::at(bottom_left, color),
        Vertex::at(bottom_left, color),
        Vertex::at(top_right, color),
        Vertex::at(max, color),
    ]
}

/// Generate vertices for a hollow rectangle (four edge quads)
pub fn outline(min: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    let mut vertices = Vec::with_capacity(24);
    // Top and bottom span the full width
    vertices.extend(quad(min, Vec2::new(size.x, t), color));
    vertices.extend(quad(
        Vec2::new(min.x, min.y + size.y - t),
        Vec2::new(size.x, t),
        color,
    ));
    // Sides fill the gap between them
    vertices.extend(quad(
        Vec2::new(min.x, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices.extend(quad(
        Vec2::new(min.x + size.x - t, min.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    ));
    vertices
}

fn rect_quad(rect: &Rect, color: [f32; 4]) -> [Vertex; 6] {
    quad(rect.pos.as_vec2(), rect.size.as_vec2(), color)
}

fn rect_outline(rect: &Rect, thickness: f32, color: [f32; 4]) -> Vec<Vertex> {
    outline(rect.pos.as_vec2(), rect.size.as_vec2(), thickness, color)
}

/// Build the whole frame, back to front
pub fn build_frame(view: &FrameView, crowd: &CrowdLayout) -> Vec<Vertex> {
    let field = view.playfield.as_vec2();
    let mut vertices = Vec::with_capacity(256 + crowd.offsets().len() * 6);

    vertices.extend(quad(Vec2::ZERO, field, colors::BACKGROUND));
    vertices.extend(quad(
        Vec2::new(field.x / 2.0 - 1.0, 0.0),
        Vec2::new(2.0, field.y),
        colors::LANE_DIVIDER,
    ));

    for gate in &view.gates {
        let fill = match gate.polarity {
            Polarity::Good => colors::GATE_GOOD,
            Polarity::Bad => colors::GATE_BAD,
        };
        vertices.extend(rect_quad(&gate.rect, fill));
        vertices.extend(rect_outline(&gate.rect, BORDER, colors::WHITE));
    }

    if let Some(boss) = &view.boss {
        vertices.extend(rect_quad(&boss.rect, colors::BOSS));
        vertices.extend(rect_outline(&boss.rect, BORDER, colors::WHITE));
    }

    if view.swarm_count > 0 {
        let center = Vec2::new(
            view.swarm_rect.center_x() as f32,
            (view.swarm_rect.top() + view.swarm_rect.size.y / 2) as f32,
        );
        let half = UNIT_SPRITE_SIZE as f32 / 2.0;
        let unit = Vec2::splat(UNIT_SPRITE_SIZE as f32);
        for offset in crowd.offsets() {
            let min = center + offset.as_vec2() - Vec2::splat(half);
            vertices.extend(quad(min, unit, colors::SWARM_UNIT));
        }
    }

    if let Some(progress) = view.progress {
        vertices.extend(outline(BAR_POS, BAR_SIZE, 2.0, colors::WHITE));
        if progress > 0.0 {
            let fill = Vec2::new(BAR_SIZE.x * progress.clamp(0.0, 1.0), BAR_SIZE.y);
            vertices.extend(quad(BAR_POS, fill, colors::PROGRESS_FILL));
        }
    }

    if matches!(view.phase, GamePhase::Result | GamePhase::Terminated) {
        vertices.extend(quad(Vec2::ZERO, field, colors::RESULT_DIM));
    }

    vertices
}
