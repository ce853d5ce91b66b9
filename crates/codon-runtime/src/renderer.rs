//! Renderer capability used by the interpreter.
//!
//! The interpreter never draws anything itself. Each drawing, transform,
//! color and state opcode maps to exactly one method here, called
//! synchronously in instruction order. Return values are not inspected.

use crate::noise::NoiseSample;
use codon_core::Color;
use serde::{Deserialize, Serialize};

/// Drawing surface driven by the interpreter
pub trait Renderer {
    fn clear(&mut self);

    fn circle(&mut self, radius: f64);
    fn rect(&mut self, width: f64, height: f64);
    fn line(&mut self, length: f64);
    fn triangle(&mut self, size: f64);
    fn ellipse(&mut self, rx: f64, ry: f64);
    fn noise(&mut self, seed: u64, samples: &[NoiseSample]);

    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, degrees: f64);
    fn scale(&mut self, factor: f64);
    fn set_color(&mut self, color: Color);

    fn save_state(&mut self);
    fn restore_state(&mut self);
}

/// A renderer call, as recorded by [`RecordingRenderer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCall {
    Clear,
    Circle { radius: f64 },
    Rect { width: f64, height: f64 },
    Line { length: f64 },
    Triangle { size: f64 },
    Ellipse { rx: f64, ry: f64 },
    Noise { seed: u64, samples: Vec<NoiseSample> },
    Translate { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    Scale { factor: f64 },
    SetColor { color: Color },
    SaveState,
    RestoreState,
}

impl RenderCall {
    pub fn is_shape(&self) -> bool {
        matches!(
            self,
            RenderCall::Circle { .. }
                | RenderCall::Rect { .. }
                | RenderCall::Line { .. }
                | RenderCall::Triangle { .. }
                | RenderCall::Ellipse { .. }
                | RenderCall::Noise { .. }
        )
    }
}

/// Records every call in order. Used for headless runs and in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingRenderer {
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_shape()).count()
    }
}

impl Renderer for RecordingRenderer {
    fn clear(&mut self) {
        self.calls.push(RenderCall::Clear);
    }

    fn circle(&mut self, radius: f64) {
        self.calls.push(RenderCall::Circle { radius });
    }

    fn rect(&mut self, width: f64, height: f64) {
        self.calls.push(RenderCall::Rect { width, height });
    }

    fn line(&mut self, length: f64) {
        self.calls.push(RenderCall::Line { length });
    }

    fn triangle(&mut self, size: f64) {
        self.calls.push(RenderCall::Triangle { size });
    }

    fn ellipse(&mut self, rx: f64, ry: f64) {
        self.calls.push(RenderCall::Ellipse { rx, ry });
    }

    fn noise(&mut self, seed: u64, samples: &[NoiseSample]) {
        self.calls.push(RenderCall::Noise {
            seed,
            samples: samples.to_vec(),
        });
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.calls.push(RenderCall::Translate { dx, dy });
    }

    fn rotate(&mut self, degrees: f64) {
        self.calls.push(RenderCall::Rotate { degrees });
    }

    fn scale(&mut self, factor: f64) {
        self.calls.push(RenderCall::Scale { factor });
    }

    fn set_color(&mut self, color: Color) {
        self.calls.push(RenderCall::SetColor { color });
    }

    fn save_state(&mut self) {
        self.calls.push(RenderCall::SaveState);
    }

    fn restore_state(&mut self) {
        self.calls.push(RenderCall::RestoreState);
    }
}

/// Discards every call
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn clear(&mut self) {}
    fn circle(&mut self, _radius: f64) {}
    fn rect(&mut self, _width: f64, _height: f64) {}
    fn line(&mut self, _length: f64) {}
    fn triangle(&mut self, _size: f64) {}
    fn ellipse(&mut self, _rx: f64, _ry: f64) {}
    fn noise(&mut self, _seed: u64, _samples: &[NoiseSample]) {}
    fn translate(&mut self, _dx: f64, _dy: f64) {}
    fn rotate(&mut self, _degrees: f64) {}
    fn scale(&mut self, _factor: f64) {}
    fn set_color(&mut self, _color: Color) {}
    fn save_state(&mut self) {}
    fn restore_state(&mut self) {}
}
