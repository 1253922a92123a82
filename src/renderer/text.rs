//! Text HUD over the `log` facade
//!
//! Headless stand-in for a display: turns each frame into HUD lines and logs
//! them whenever they change.

use super::{FrameView, Renderer};
use crate::sim::{GamePhase, ResultCause};

/// HUD lines for a frame, top to bottom
pub fn hud_lines(view: &FrameView) -> Vec<String> {
    let mut lines = vec![
        format!("Swarm: {} (Lv.{})", view.swarm_count, view.round_number),
        format!("GATE: {}/{}", view.gates_passed, view.gates_target),
    ];

    if let Some(boss) = &view.boss {
        lines.push(format!("BOSS HP: {}", boss.hp));
    }

    if let Some(result) = &view.result {
        if result.won {
            lines.push("YOU WIN!".to_string());
            lines.push(format!("Survivors: {}", result.margin));
            lines.push("Next Round...".to_string());
        } else {
            match result.cause {
                ResultCause::Wipeout => {
                    lines.push("GAME OVER".to_string());
                    lines.push("lose...".to_string());
                }
                ResultCause::BossContact => {
                    lines.push("YOU LOSE...".to_string());
                    lines.push(format!("Short by {}", result.margin));
                }
            }
        }
    }

    lines
}

/// Logs the HUD when it changes
#[derive(Debug, Default)]
pub struct LogRenderer {
    last: Vec<String>,
    last_phase: Option<GamePhase>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently presented HUD
    pub fn last_hud(&self) -> &[String] {
        &self.last
    }
}

/// Closing line for the terminal screen
pub fn terminal_summary(view: &FrameView) -> String {
    format!("Final swarm {} at round {}", view.swarm_count, view.round_number)
}

impl Renderer for LogRenderer {
    fn present(&mut self, view: &FrameView) {
        let lines = hud_lines(view);
        if lines == self.last {
            return;
        }

        if self.last_phase != Some(view.phase) {
            log::info!("[{:?}] {}", view.phase, lines.join(" | "));
        } else {
            log::debug!("[{:?}] {}", view.phase, lines.join(" | "));
        }
        self.last = lines;
        self.last_phase = Some(view.phase);
    }

    fn present_terminal(&mut self, view: &FrameView) {
        self.present(view);
        log::info!("{}", terminal_summary(view));
    }
}
