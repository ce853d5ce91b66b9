//! Subcommand implementations. Each returns the text to print.

use anyhow::{Context, Result};
use codon_core::{MutationConfig, RuntimeConfig};
use codon_ir::{
    analyze, compare_genomes, format_genome, mutation, Diagnostic, MutationKind, Mutator, Program,
};
use codon_runtime::{Interpreter, RecordingRenderer};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
}

#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub codons: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for diagnostic in &self.diagnostics {
            writeln!(f, "{}", diagnostic)?;
        }
        write!(
            f,
            "{} codon(s), {} diagnostic(s)",
            self.codons,
            self.diagnostics.len()
        )
    }
}

pub fn check(text: &str) -> Result<CheckReport> {
    let analysis = analyze(text)?;
    Ok(CheckReport {
        codons: analysis.tokens.len(),
        diagnostics: analysis.diagnostics().cloned().collect(),
    })
}

pub fn run(text: &str, config: RuntimeConfig, json: bool) -> Result<String> {
    let mut renderer = RecordingRenderer::new();
    let trace = Interpreter::new(config).run_text(text, &mut renderer)?;
    info!(steps = trace.len(), calls = renderer.calls.len(), "genome executed");

    if json {
        let value = serde_json::json!({
            "trace": trace,
            "calls": renderer.calls,
        });
        return Ok(serde_json::to_string_pretty(&value)?);
    }

    let mut lines: Vec<String> = trace
        .iter()
        .map(|s| {
            let stack: Vec<String> = s.state.stack.iter().map(|v| v.to_string()).collect();
            format!("{:>4}  {}  {:<32} [{}]", s.step, s.codon, s.description, stack.join(", "))
        })
        .collect();
    lines.push(format!(
        "halt: {:?} after {} step(s), {} shape(s) drawn",
        trace.halt,
        trace.len(),
        renderer.shape_count()
    ));
    Ok(lines.join("\n"))
}

/// What to mutate. Without `kind` a random kind is drawn from the weights.
#[derive(Debug, Clone, Default)]
pub struct MutateRequest {
    pub kind: Option<MutationKind>,
    pub position: Option<usize>,
    pub count: usize,
    pub seed: Option<u64>,
}

pub fn mutate(
    text: &str,
    request: &MutateRequest,
    config: MutationConfig,
    json: bool,
) -> Result<String> {
    let seed = request.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let result = match request.kind {
        Some(kind) => mutation::apply(kind, text, request.position, request.count, &mut rng)?,
        None => {
            if request.position.is_some() {
                anyhow::bail!("--position requires --kind");
            }
            Mutator::new(config).mutate(text, &mut rng)?
        }
    };
    info!(seed, kind = %result.kind, position = result.position, "mutation applied");

    if json {
        return Ok(serde_json::to_string_pretty(&result)?);
    }
    // The description goes in a comment so the output is still a genome
    Ok(format!("; {}\n{}", result.description, result.mutated))
}

pub fn diff(original: &str, mutated: &str, json: bool) -> Result<String> {
    let diff = compare_genomes(original, mutated);
    if json {
        return Ok(serde_json::to_string_pretty(&diff)?);
    }

    let mut lines: Vec<String> = diff
        .differences
        .iter()
        .map(|d| format!("codon {:>4}: {} -> {}", d.position, d.original, d.mutated))
        .collect();
    lines.push(format!(
        "{} difference(s), {} -> {} codon(s)",
        diff.differences.len(),
        diff.original_codon_count,
        diff.mutated_codon_count
    ));
    Ok(lines.join("\n"))
}

pub fn format(text: &str, width: usize, disassemble: bool) -> Result<String> {
    if disassemble {
        Ok(Program::parse(text)?.disassemble())
    } else {
        Ok(format_genome(text, width)?)
    }
}
