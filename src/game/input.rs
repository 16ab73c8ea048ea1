//! Per-tick input sampling
//!
//! All pending terminal events are drained once per tick into an
//! `InputFrame`. Only press-kind key events survive (repeats and releases
//! are discarded), so every one-shot action in the game is edge-triggered:
//! holding a key cannot re-fire it within a tick.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEventKind};

/// A mouse button press at a terminal cell
#[derive(Debug, Clone, Copy)]
pub struct MouseClick {
    pub column: u16,
    pub row: u16,
    pub button: MouseButton,
}

/// One tick's worth of edge-triggered input
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys: Vec<KeyEvent>,
    pub clicks: Vec<MouseClick>,
}

impl InputFrame {
    /// Drain every pending terminal event into a single sample
    pub fn poll() -> anyhow::Result<Self> {
        let mut frame = Self::default();
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => frame.keys.push(key),
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(button) = mouse.kind {
                        frame.clicks.push(MouseClick {
                            column: mouse.column,
                            row: mouse.row,
                            button,
                        });
                    }
                }
                _ => {}
            }
        }
        Ok(frame)
    }

    /// Whether a key was pressed this tick
    pub fn pressed(&self, code: KeyCode) -> bool {
        self.keys.iter().any(|k| k.code == code)
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.clicks.is_empty()
    }
}
