//! Configuration types for the interpreter and the mutation engine.

use serde::{Deserialize, Serialize};

/// Interpreter configuration parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Width of the drawing surface in pixels
    pub canvas_width: f64,
    /// Height of the drawing surface in pixels
    pub canvas_height: f64,
    /// Optional cap on executed instructions. `None` runs to STOP or end of program.
    pub max_steps: Option<u64>,
    /// Cap on instructions re-executed by LOOP replays over a whole run
    pub max_loop_steps: u64,
    /// Upper bound on the number of points a single NOISE instruction samples
    pub max_noise_samples: usize,
}

impl RuntimeConfig {
    /// Pixels per numeric unit. Literals span 0..64, so 64 units cover the canvas width.
    pub fn unit(&self) -> f64 {
        self.canvas_width / 64.0
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            canvas_width: 400.0,
            canvas_height: 400.0,
            max_steps: None,
            max_loop_steps: 1_000_000,
            max_noise_samples: 4096,
        }
    }
}

/// Relative weights used when a mutation kind is drawn at random
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    pub silent_weight: f32,
    pub missense_weight: f32,
    pub nonsense_weight: f32,
    pub point_weight: f32,
    pub insertion_weight: f32,
    pub deletion_weight: f32,
    pub frameshift_weight: f32,
    /// Maximum number of bases added or removed by a random insertion/deletion
    pub max_indel_length: usize,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            silent_weight: 1.0,
            missense_weight: 1.0,
            nonsense_weight: 0.5,
            point_weight: 1.0,
            insertion_weight: 0.5,
            deletion_weight: 0.5,
            frameshift_weight: 0.25,
            max_indel_length: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let runtime = RuntimeConfig::default();
        assert_eq!(runtime.canvas_width, 400.0);
        assert_eq!(runtime.unit(), 6.25);
        assert!(runtime.max_steps.is_none());

        let mutation = MutationConfig::default();
        assert_eq!(mutation.max_indel_length, 3);
    }

    #[test]
    fn test_runtime_config_partial_json() {
        let config: RuntimeConfig = serde_json::from_str(r#"{"canvas_width": 640.0}"#).unwrap();
        assert_eq!(config.canvas_width, 640.0);
        assert_eq!(config.canvas_height, 400.0);
        assert_eq!(config.max_noise_samples, 4096);
        assert_eq!(config.max_loop_steps, 1_000_000);
    }

    #[test]
    fn test_mutation_config_serialization() {
        let config = MutationConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MutationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.point_weight, deserialized.point_weight);
        assert_eq!(config.max_indel_length, deserialized.max_indel_length);
    }
}
