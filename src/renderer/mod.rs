//! Rendering boundary
//!
//! The simulation never draws. Each frame it is reduced to a [`FrameView`]
//! and handed to a [`Renderer`], which owns the actual display.

pub mod crowd;
pub mod shapes;
pub mod text;
pub mod vertex;

pub use crowd::CrowdLayout;
pub use text::LogRenderer;
pub use vertex::Vertex;

use glam::IVec2;

use crate::sim::{GamePhase, GateOp, Polarity, Rect, RoundResult, SessionState};

/// A gate as the display sees it
#[derive(Debug, Clone, PartialEq)]
pub struct GateView {
    pub rect: Rect,
    pub op: GateOp,
    pub polarity: Polarity,
}

/// The boss as the display sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossView {
    pub rect: Rect,
    pub hp: u64,
}

/// Everything a frame needs, derived from the session and nothing else
#[derive(Debug, Clone, PartialEq)]
pub struct FrameView {
    pub playfield: IVec2,
    pub phase: GamePhase,
    pub round_number: u32,
    pub swarm_count: u64,
    pub swarm_rect: Rect,
    pub gates_passed: u32,
    pub gates_target: u32,
    /// Progress bar fill (0..=1), only during the gate phase
    pub progress: Option<f32>,
    pub gates: Vec<GateView>,
    /// Present once the boss has entered
    pub boss: Option<BossView>,
    pub result: Option<RoundResult>,
}

/// Reduce a session to what the display needs
pub fn render(state: &SessionState) -> FrameView {
    let tuning = &state.tuning;
    let round = &state.round;

    FrameView {
        playfield: IVec2::new(tuning.playfield_width, tuning.playfield_height),
        phase: round.phase,
        round_number: round.round_number,
        swarm_count: state.swarm.count,
        swarm_rect: state.swarm.rect,
        gates_passed: round.gates_passed,
        gates_target: tuning.gates_per_round,
        progress: (round.phase == GamePhase::Running).then(|| round.progress(tuning)),
        gates: round
            .gates
            .iter()
            .map(|g| GateView {
                rect: g.rect,
                op: g.op,
                polarity: g.polarity(),
            })
            .collect(),
        boss: round.boss.engaged.then_some(BossView {
            rect: round.boss.rect,
            hp: round.boss.hp,
        }),
        result: round.result,
    }
}

/// A display backend
pub trait Renderer {
    /// Draw one frame
    fn present(&mut self, view: &FrameView);

    /// Final screen after a loss, shown before the process exits
    fn present_terminal(&mut self, view: &FrameView) {
        self.present(view);
    }
}

/// Builds a vertex buffer per frame for an external GPU backend to upload
#[derive(Debug)]
pub struct VertexRenderer {
    crowd: CrowdLayout,
    vertices: Vec<Vertex>,
}

impl VertexRenderer {
    pub fn new(seed: u64) -> Self {
        Self {
            crowd: CrowdLayout::new(seed),
            vertices: Vec::new(),
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Raw bytes ready for a vertex buffer
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl Renderer for VertexRenderer {
    fn present(&mut self, view: &FrameView) {
        self.crowd.update(view.swarm_count);
        self.vertices = shapes::build_frame(view, &self.crowd);
    }
}
