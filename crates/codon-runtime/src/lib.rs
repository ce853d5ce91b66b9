//! Stack-machine interpreter for decoded genomes.
//!
//! This module provides:
//! - The [`Interpreter`], which executes a [`Program`] and returns a [`Trace`]
//! - The [`Renderer`] capability through which drawing happens
//! - Seeded noise sampling, the only source of randomness during a run
//!
//! A run never fails: stack underflow, division by zero and non-finite
//! results are replaced by 0 and execution continues.

pub mod noise;
pub mod renderer;
pub mod state;
mod machine;

pub use noise::NoiseSample;
pub use renderer::{NullRenderer, RecordingRenderer, RenderCall, Renderer};
pub use state::{HaltReason, SavedState, Snapshot, Trace, VmState};

use codon_core::{Result, RuntimeConfig};
use codon_ir::{tokenize, Program, Token};
use machine::Machine;

/// Executes programs against a renderer
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: RuntimeConfig,
}

impl Interpreter {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Run a decoded program. Every executed instruction yields one snapshot;
    /// a LOOP's replays are folded into its own snapshot.
    pub fn run<R: Renderer + ?Sized>(&self, program: &Program, renderer: &mut R) -> Trace {
        Machine::new(program, renderer, &self.config).run()
    }

    pub fn run_tokens<R: Renderer + ?Sized>(&self, tokens: &[Token], renderer: &mut R) -> Trace {
        self.run(&Program::from_tokens(tokens), renderer)
    }

    /// Tokenize and run genome text. Only lexical errors are reported.
    pub fn run_text<R: Renderer + ?Sized>(&self, text: &str, renderer: &mut R) -> Result<Trace> {
        let tokens = tokenize(text)?;
        Ok(self.run_tokens(&tokens, renderer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codon_core::{Color, Point};
    use codon_ir::Opcode;

    fn run(text: &str) -> (Trace, RecordingRenderer) {
        let mut renderer = RecordingRenderer::new();
        let trace = Interpreter::default().run_text(text, &mut renderer).unwrap();
        (trace, renderer)
    }

    #[test]
    fn test_start_stop_only() {
        let (trace, renderer) = run("ATG TAA");
        assert_eq!(trace.len(), 2);
        assert!(renderer.calls.is_empty());
        assert_eq!(trace.halt, HaltReason::Stop);
    }

    #[test]
    fn test_circle() {
        // PUSH 8, CIRCLE
        let (trace, renderer) = run("ATG GAA AGA GGA TAA");
        assert_eq!(trace.len(), 4);
        assert_eq!(renderer.calls, vec![RenderCall::Circle { radius: 50.0 }]);
        assert_eq!(trace[1].opcode, Opcode::Push);
        assert_eq!(trace[1].state.stack, vec![8.0]);
        assert_eq!(trace[2].instruction_index, 3);
        assert!(trace.final_state().unwrap().stack.is_empty());
    }

    #[test]
    fn test_halts_at_first_stop() {
        let (trace, renderer) = run("ATG TAA GAA AGA GGA TAA");
        assert_eq!(trace.len(), 2);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_end_of_program_without_stop() {
        let (trace, _) = run("ATG GAA AAC");
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.halt, HaltReason::EndOfProgram);
        assert_eq!(trace.final_state().unwrap().stack, vec![1.0]);
    }

    #[test]
    fn test_arithmetic() {
        // 7 - 3, 6 * 2, 5 / 0
        let (trace, _) = run("ATG GAA ACT GAA AAT CAC GAA ACG GAA AAG CAG GAA ACC GAA AAA CAT TAA");
        assert_eq!(trace.final_state().unwrap().stack, vec![4.0, 12.0, 0.0]);
    }

    #[test]
    fn test_comparison() {
        // 3 == 3, 2 < 1
        let (trace, _) = run("ATG GAA AAT GAA AAT CTA GAA AAG GAA AAC CTC TAA");
        assert_eq!(trace.final_state().unwrap().stack, vec![1.0, 0.0]);
    }

    #[test]
    fn test_stack_ops() {
        // PUSH 1, PUSH 2, SWAP, DUP, POP
        let (trace, _) = run("ATG GAA AAC GAA AAG TGG ATA ATT TAA");
        let stacks: Vec<Vec<f64>> = trace.iter().map(|s| s.state.stack.clone()).collect();
        assert_eq!(stacks[3], vec![2.0, 1.0]);
        assert_eq!(stacks[4], vec![2.0, 1.0, 1.0]);
        assert_eq!(stacks[5], vec![2.0, 1.0]);
    }

    #[test]
    fn test_underflow_recovers() {
        // CIRCLE, ADD and RECT on an empty stack
        let (trace, renderer) = run("ATG GGA CAA CCA TAA");
        assert_eq!(trace.len(), 5);
        assert_eq!(
            renderer.calls,
            vec![
                RenderCall::Circle { radius: 0.0 },
                RenderCall::Rect { width: 0.0, height: 0.0 },
            ]
        );
    }

    #[test]
    fn test_transforms_update_state() {
        // PUSH 16 PUSH 0 TRANSLATE, PUSH 45 ROTATE, PUSH 20 SCALE
        let (trace, renderer) = run("ATG GAA CAA GAA AAA ACA GAA GTC AGA GAA CCA CGA TAA");
        let state = trace.final_state().unwrap();
        assert_eq!(state.position, Point::new(300.0, 200.0));
        assert_eq!(state.heading, 45.0);
        assert_eq!(state.scale, 2.0);
        assert_eq!(
            renderer.calls,
            vec![
                RenderCall::Translate { dx: 100.0, dy: 0.0 },
                RenderCall::Rotate { degrees: 45.0 },
                RenderCall::Scale { factor: 2.0 },
            ]
        );
    }

    #[test]
    fn test_color() {
        // hue 32, saturation 63, lightness 32
        let (trace, renderer) = run("ATG GAA GAA GAA TTT GAA GAA TTA TAA");
        let expected = Color::hsl(180.0, 63.0 * 100.0 / 64.0, 50.0);
        assert_eq!(trace.final_state().unwrap().color, expected);
        assert_eq!(renderer.calls, vec![RenderCall::SetColor { color: expected }]);
    }

    #[test]
    fn test_save_restore() {
        // SAVE, PUSH 30 ROTATE, RESTORE, RESTORE (empty)
        let (trace, renderer) = run("ATG TCA GAA CTG AGA TCG TCT TAA");
        assert_eq!(trace.len(), 7);
        assert_eq!(trace[3].state.heading, 30.0);
        assert_eq!(trace[4].state.heading, 0.0);
        assert_eq!(
            renderer.calls,
            vec![
                RenderCall::SaveState,
                RenderCall::Rotate { degrees: 30.0 },
                RenderCall::RestoreState,
            ]
        );
    }

    fn rotations(renderer: &RecordingRenderer) -> usize {
        renderer
            .calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Rotate { .. }))
            .count()
    }

    #[test]
    fn test_loop_replays_previous_tokens() {
        // PUSH 3 (repeats), PUSH 4, CIRCLE, PUSH 5 (count), LOOP
        // body is tokens 3..8: PUSH 4, CIRCLE, PUSH 5
        let (trace, renderer) = run("ATG GAA AAT GAA ACA GGA GAA ACC TGC TAA");
        assert_eq!(renderer.calls, vec![RenderCall::Circle { radius: 25.0 }; 4]);
        assert_eq!(trace.len(), 6);
        assert_eq!(trace.halt, HaltReason::Stop);

        let looped = &trace[4];
        assert_eq!(looped.opcode, Opcode::Loop);
        assert_eq!(looped.instruction_index, 8);
        assert_eq!(looped.state.stack, vec![5.0; 3]);
        assert!(looped.description.contains("(9 replayed)"));
    }

    #[test]
    fn test_loop_replays_stay_out_of_trace() {
        // PUSH 3 (repeats), PUSH 5, CIRCLE, PUSH 2 (count), LOOP: replays PUSH 2 three times
        let tokens = tokenize("ATG GAA AAT GAA ACC GGA GAA AAG TGC TAA").unwrap();
        let mut renderer = RecordingRenderer::new();
        let trace = Interpreter::default().run_tokens(&tokens, &mut renderer);
        assert_eq!(tokens.len(), 10);
        assert_eq!(trace.len(), 7);
        assert!(trace.len() <= tokens.len());
        assert_eq!(trace[5].state.stack, vec![2.0; 3]);
        assert_eq!(renderer.calls.len(), 1);
    }

    #[test]
    fn test_loop_compounds_rotation() {
        // PUSH 5 (repeats), PUSH 10 ROTATE, PUSH 5 (count), LOOP
        // replays [PUSH 10, ROTATE, PUSH 5] five times
        let (trace, renderer) = run("ATG GAA ACC GAA AGG AGA GAA ACC TGC TAA");
        assert_eq!(trace.len(), 7);
        assert_eq!(rotations(&renderer), 6);
        let state = trace.final_state().unwrap();
        assert_eq!(state.heading, 60.0);
        assert_eq!(state.stack, vec![5.0; 5]);
    }

    #[test]
    fn test_loop_body_counts_tokens() {
        // PUSH 1 (repeats), PUSH 10, PUSH 1 (count), LOOP: the one-token body
        // is the literal AAC, which replays as LINE
        let (trace, renderer) = run("ATG GAA AAC GAA AGG GAA AAC TGC TAA");
        assert_eq!(renderer.calls, vec![RenderCall::Line { length: 62.5 }]);
        assert!(trace.final_state().unwrap().stack.is_empty());
    }

    #[test]
    fn test_stop_inside_loop_body_halts() {
        // body starts at the literal TAA of PUSH 48
        let (trace, renderer) = run("ATG GAA AAC GAA TAA GAA AAT TGC GGA TAA");
        assert_eq!(trace.len(), 5);
        assert_eq!(trace.halt, HaltReason::Stop);
        assert_eq!(trace.last().unwrap().opcode, Opcode::Loop);
        assert_eq!(trace.final_state().unwrap().stack, vec![48.0]);
        assert!(renderer.calls.is_empty());
    }

    #[test]
    fn test_nested_loop_as_last_body_instruction() {
        // PUSH 2, PUSH 8 (outer repeats, count)
        // PUSH 2, PUSH 3 (inner repeats, count), PUSH 10, ROTATE
        // LOOP (inner, body PUSH 10 ROTATE), LOOP (outer, body ends with the inner LOOP)
        let (trace, renderer) =
            run("ATG GAA AAG GAA AGA GAA AAG GAA AAT GAA AGG AGA TGC TGC TAA");
        assert_eq!(trace.len(), 10);
        assert_eq!(trace[7].opcode, Opcode::Loop);
        assert_eq!(trace[7].state.heading, 30.0);
        assert_eq!(trace[8].opcode, Opcode::Loop);
        assert!(trace[8].description.contains("(18 replayed)"));

        // 1 straight, 2 inner, 2 outer passes of (1 + 2 inner)
        assert_eq!(rotations(&renderer), 9);
        let state = trace.final_state().unwrap();
        assert_eq!(state.heading, 90.0);
        assert!(state.stack.is_empty());
    }

    #[test]
    fn test_loop_step_limit_abandons_replay() {
        let interpreter = Interpreter::new(RuntimeConfig {
            max_loop_steps: 4,
            ..Default::default()
        });
        let mut renderer = RecordingRenderer::new();
        let trace = interpreter
            .run_text("ATG GAA ACC GAA AGG AGA GAA ACC TGC TAA", &mut renderer)
            .unwrap();
        assert_eq!(trace.len(), 7);
        assert_eq!(trace.halt, HaltReason::Stop);
        assert_eq!(rotations(&renderer), 2);
        assert_eq!(trace.final_state().unwrap().heading, 20.0);
    }

    #[test]
    fn test_loop_skipped_when_zero() {
        let (trace, renderer) = run("ATG GAA AAA GAA AAC TGC GGA TAA");
        assert_eq!(trace.len(), 6);
        assert_eq!(renderer.calls, vec![RenderCall::Circle { radius: 0.0 }]);
    }

    #[test]
    fn test_noise_is_deterministic() {
        let genome = "ATG GAA ACG GAA CAA CTG TAA";
        let (a, ra) = run(genome);
        let (b, rb) = run(genome);
        assert_eq!(a, b);
        assert_eq!(ra.calls, rb.calls);
        match &ra.calls[0] {
            RenderCall::Noise { seed, samples } => {
                assert_eq!(*seed, 6);
                assert_eq!(samples.len(), 16);
            }
            other => panic!("expected noise, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_push_pushes_zero() {
        let (trace, _) = run("ATG GAA");
        assert_eq!(trace.final_state().unwrap().stack, vec![0.0]);
    }

    #[test]
    fn test_step_limit() {
        let interpreter = Interpreter::new(RuntimeConfig {
            max_steps: Some(3),
            ..Default::default()
        });
        let trace = interpreter
            .run_text("ATG GAA ACC GAA AGG AGA GAA AAG TGC TAA", &mut NullRenderer)
            .unwrap();
        assert_eq!(trace.len(), 3);
        assert_eq!(trace.halt, HaltReason::StepLimit);
    }

    #[test]
    fn test_lexical_error_propagates() {
        assert!(Interpreter::default()
            .run_text("ATG GG", &mut NullRenderer)
            .is_err());
    }
}
