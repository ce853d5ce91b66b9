//! Execution of a single run.

use crate::noise;
use crate::renderer::Renderer;
use crate::state::{HaltReason, Snapshot, Trace, VmState};
use codon_core::{Color, RuntimeConfig};
use codon_ir::{Instruction, Opcode, Program};

/// A pending LOOP replay over tokens `start..end` (`end` is the LOOP token itself)
#[derive(Debug, Clone, Copy)]
struct LoopFrame {
    start: usize,
    end: usize,
    /// Token index of the next instruction in the current pass
    ip: usize,
    /// Passes left, including the current one
    remaining: usize,
}

impl LoopFrame {
    /// Frame for a LOOP at token `end` with its popped operands. The body is
    /// clamped to the tokens before the LOOP; zero counts yield no frame.
    fn new(end: usize, count: f64, repeats: f64) -> Option<Self> {
        let count = (count.max(0.0) as usize).min(end);
        let repeats = repeats.max(0.0) as usize;
        (count > 0 && repeats > 0).then(|| LoopFrame {
            start: end - count,
            end,
            ip: end - count,
            remaining: repeats,
        })
    }
}

enum Flow {
    Next,
    Halt,
}

/// Working state of one run. Built per call and discarded afterwards.
pub(crate) struct Machine<'a, R: Renderer + ?Sized> {
    program: &'a Program,
    renderer: &'a mut R,
    config: &'a RuntimeConfig,
    state: VmState,
    snapshots: Vec<Snapshot>,
    /// Instructions re-executed by LOOP replays so far
    replayed: u64,
}

impl<'a, R: Renderer + ?Sized> Machine<'a, R> {
    pub fn new(program: &'a Program, renderer: &'a mut R, config: &'a RuntimeConfig) -> Self {
        Self {
            program,
            renderer,
            config,
            state: VmState::new(config),
            snapshots: Vec::new(),
            replayed: 0,
        }
    }

    pub fn run(mut self) -> Trace {
        let program = self.program;
        let mut ip = 0;
        let halt = loop {
            let Some(inst) = program.decode_at(ip) else {
                break HaltReason::EndOfProgram;
            };
            if let Some(limit) = self.config.max_steps {
                if self.snapshots.len() as u64 >= limit {
                    tracing::warn!(limit, "step limit reached, halting run");
                    break HaltReason::StepLimit;
                }
            }

            let (flow, description) = self.execute(&inst);
            self.snapshots.push(Snapshot {
                step: self.snapshots.len(),
                instruction_index: inst.token_index,
                opcode: inst.opcode,
                codon: inst.codon,
                description,
                state: self.state.clone(),
            });
            tracing::trace!(ip, opcode = %inst.opcode, depth = self.state.stack.len(), "executed");

            match flow {
                Flow::Next => ip += inst.width(),
                Flow::Halt => break HaltReason::Stop,
            }
        };

        tracing::debug!(
            steps = self.snapshots.len(),
            tokens = program.token_count(),
            replayed = self.replayed,
            ?halt,
            "run finished"
        );
        Trace {
            snapshots: self.snapshots,
            halt,
        }
    }

    /// Run every pass of `root` without emitting snapshots. LOOPs met inside
    /// a body push their own frame. Returns true if a STOP was reached.
    fn replay(&mut self, root: LoopFrame) -> bool {
        let program = self.program;
        let mut frames = vec![root];
        while let Some(frame) = frames.last_mut() {
            if frame.ip >= frame.end {
                frame.remaining -= 1;
                if frame.remaining == 0 {
                    frames.pop();
                } else {
                    frame.ip = frame.start;
                }
                continue;
            }
            let Some(inst) = program.decode_at(frame.ip) else {
                frames.pop();
                continue;
            };
            frame.ip += inst.width();

            if self.replayed >= self.config.max_loop_steps {
                tracing::warn!(
                    limit = self.config.max_loop_steps,
                    "loop step limit reached, abandoning replay"
                );
                return false;
            }
            self.replayed += 1;

            match inst.opcode {
                Opcode::Stop => return true,
                Opcode::Loop => {
                    let [repeats, count, _] = self.operands(Opcode::Loop);
                    if let Some(nested) = LoopFrame::new(inst.token_index, count, repeats) {
                        frames.push(nested);
                    }
                }
                _ => {
                    self.execute(&inst);
                }
            }
        }
        false
    }

    /// Pop a value, substituting 0 on underflow
    fn pop(&mut self, opcode: Opcode) -> f64 {
        self.state.pop().unwrap_or_else(|| {
            tracing::debug!(%opcode, "stack underflow, using 0");
            0.0
        })
    }

    /// Pop the operands `opcode` declares, deepest first
    fn operands(&mut self, opcode: Opcode) -> [f64; 3] {
        let mut args = [0.0; 3];
        for slot in args[..opcode.num_operands()].iter_mut().rev() {
            *slot = self.pop(opcode);
        }
        args
    }

    fn execute(&mut self, inst: &Instruction) -> (Flow, String) {
        let op = inst.opcode;
        let unit = self.config.unit();
        let [a, b, c] = self.operands(op);
        match op {
            Opcode::Start => (Flow::Next, "START".to_string()),
            Opcode::Stop => (Flow::Halt, "STOP".to_string()),

            Opcode::Push => {
                let value = inst.literal_value();
                self.state.push(value as f64);
                match inst.literal {
                    Some(literal) => (Flow::Next, format!("PUSH {} ({})", value, literal)),
                    None => (Flow::Next, "PUSH 0 (missing literal)".to_string()),
                }
            }

            Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Eq | Opcode::Lt => {
                let result = match op {
                    Opcode::Add => a + b,
                    Opcode::Sub => a - b,
                    Opcode::Mul => a * b,
                    Opcode::Div if b == 0.0 => {
                        tracing::debug!("division by zero, using 0");
                        0.0
                    }
                    Opcode::Div => a / b,
                    Opcode::Eq => bool_value(a == b),
                    _ => bool_value(a < b),
                };
                self.state.push(result);
                let pushed = self.state.peek().unwrap_or(0.0);
                (Flow::Next, format!("{} {} {} -> {}", op, fmt_num(a), fmt_num(b), fmt_num(pushed)))
            }

            Opcode::Dup => {
                self.state.push(a);
                self.state.push(a);
                (Flow::Next, format!("DUP {}", fmt_num(a)))
            }
            Opcode::Swap => {
                self.state.push(b);
                self.state.push(a);
                (Flow::Next, format!("SWAP {} {}", fmt_num(a), fmt_num(b)))
            }
            Opcode::Pop => (Flow::Next, format!("POP {}", fmt_num(a))),

            Opcode::Loop => {
                let Some(frame) = LoopFrame::new(inst.token_index, b, a) else {
                    return (Flow::Next, format!("LOOP {} x{} (skipped)", fmt_num(b), fmt_num(a)));
                };
                let before = self.replayed;
                let halted = self.replay(frame);
                let description = format!(
                    "LOOP {} token(s) x{} ({} replayed)",
                    frame.end - frame.start,
                    frame.remaining,
                    self.replayed - before
                );
                if halted {
                    (Flow::Halt, format!("{}, halted by STOP", description))
                } else {
                    (Flow::Next, description)
                }
            }

            Opcode::SaveState => {
                self.state.save();
                self.renderer.save_state();
                (Flow::Next, format!("SAVE_STATE (depth {})", self.state.state_stack.len()))
            }
            Opcode::RestoreState => {
                if self.state.restore() {
                    self.renderer.restore_state();
                    (Flow::Next, "RESTORE_STATE".to_string())
                } else {
                    (Flow::Next, "RESTORE_STATE (nothing saved)".to_string())
                }
            }

            Opcode::Translate => {
                let (dx, dy) = (a * unit, b * unit);
                self.renderer.translate(dx, dy);
                self.state.position =
                    self.state
                        .position
                        .offset_local(dx, dy, self.state.heading, self.state.scale);
                (Flow::Next, format!("TRANSLATE {} {}", fmt_num(dx), fmt_num(dy)))
            }
            Opcode::Rotate => {
                self.renderer.rotate(a);
                let heading = (self.state.heading + a).rem_euclid(360.0);
                // rem_euclid rounds tiny negative angles up to exactly 360
                self.state.heading = if heading < 360.0 { heading } else { 0.0 };
                (Flow::Next, format!("ROTATE {}", fmt_num(a)))
            }
            Opcode::Scale => {
                let factor = a / 10.0;
                self.renderer.scale(factor);
                self.state.scale *= factor;
                (Flow::Next, format!("SCALE x{}", fmt_num(factor)))
            }
            Opcode::Color => {
                let color = Color::hsl(a * 360.0 / 64.0, b * 100.0 / 64.0, c * 100.0 / 64.0);
                self.renderer.set_color(color);
                self.state.color = color;
                (Flow::Next, format!("COLOR {}", color))
            }

            Opcode::Circle => {
                let radius = a * unit;
                self.renderer.circle(radius);
                (Flow::Next, format!("CIRCLE r={}", fmt_num(radius)))
            }
            Opcode::Rect => {
                let (width, height) = (a * unit, b * unit);
                self.renderer.rect(width, height);
                (Flow::Next, format!("RECT {}x{}", fmt_num(width), fmt_num(height)))
            }
            Opcode::Line => {
                let length = a * unit;
                self.renderer.line(length);
                (Flow::Next, format!("LINE {}", fmt_num(length)))
            }
            Opcode::Triangle => {
                let size = a * unit;
                self.renderer.triangle(size);
                (Flow::Next, format!("TRIANGLE {}", fmt_num(size)))
            }
            Opcode::Ellipse => {
                let (rx, ry) = (a * unit, b * unit);
                self.renderer.ellipse(rx, ry);
                (Flow::Next, format!("ELLIPSE {}x{}", fmt_num(rx), fmt_num(ry)))
            }
            Opcode::Noise => {
                let seed = a.max(0.0) as u64;
                let count = (b.max(0.0) as usize).min(self.config.max_noise_samples);
                let radius = self.config.canvas_width.min(self.config.canvas_height) / 4.0;
                let samples = noise::sample(seed, count, radius);
                self.renderer.noise(seed, &samples);
                (Flow::Next, format!("NOISE seed={} samples={}", seed, count))
            }
        }
    }
}

fn bool_value(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
