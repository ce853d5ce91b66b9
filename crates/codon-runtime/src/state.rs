//! VM state, snapshots and execution traces.

use codon_core::{Color, Point, Result, RuntimeConfig};
use codon_ir::{Codon, Opcode};
use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Drawing state saved by SAVE_STATE
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedState {
    pub position: Point,
    pub heading: f64,
    pub scale: f64,
    pub color: Color,
}

/// Mutable machine state for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VmState {
    /// Value stack, top at the end. Only finite values are ever stored.
    pub stack: Vec<f64>,
    pub position: Point,
    /// Heading in degrees, in `0..360`
    pub heading: f64,
    pub scale: f64,
    pub color: Color,
    pub state_stack: Vec<SavedState>,
}

impl VmState {
    /// Fresh state with the origin at the canvas center
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            stack: Vec::new(),
            position: Point::new(config.canvas_width / 2.0, config.canvas_height / 2.0),
            heading: 0.0,
            scale: 1.0,
            color: Color::default(),
            state_stack: Vec::new(),
        }
    }

    /// Push a value, coercing non-finite results to 0
    pub fn push(&mut self, value: f64) {
        self.stack.push(if value.is_finite() { value } else { 0.0 });
    }

    /// Pop a value. Returns `None` on underflow.
    pub fn pop(&mut self) -> Option<f64> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<f64> {
        self.stack.last().copied()
    }

    pub fn save(&mut self) {
        self.state_stack.push(SavedState {
            position: self.position,
            heading: self.heading,
            scale: self.scale,
            color: self.color,
        });
    }

    /// Reinstate the most recently saved state. Returns false if none was saved.
    pub fn restore(&mut self) -> bool {
        match self.state_stack.pop() {
            Some(saved) => {
                self.position = saved.position;
                self.heading = saved.heading;
                self.scale = saved.scale;
                self.color = saved.color;
                true
            }
            None => false,
        }
    }
}

/// Machine state captured after one executed instruction. A LOOP
/// snapshot holds the state after all of its replays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Sequence number of this step in the run
    pub step: usize,
    /// Token index of the executed instruction
    pub instruction_index: usize,
    pub opcode: Opcode,
    pub codon: Codon,
    pub description: String,
    pub state: VmState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltReason {
    /// A STOP codon was executed
    Stop,
    /// Execution ran past the last instruction
    EndOfProgram,
    /// `RuntimeConfig::max_steps` was reached
    StepLimit,
}

/// Ordered snapshots of a whole run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub snapshots: Vec<Snapshot>,
    pub halt: HaltReason,
}

impl Trace {
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    pub fn last(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// State after the last executed instruction
    pub fn final_state(&self) -> Option<&VmState> {
        self.last().map(|s| &s.state)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl Index<usize> for Trace {
    type Output = Snapshot;

    fn index(&self, index: usize) -> &Snapshot {
        &self.snapshots[index]
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Snapshot;
    type IntoIter = std::slice::Iter<'a, Snapshot>;

    fn into_iter(self) -> Self::IntoIter {
        self.snapshots.iter()
    }
}
