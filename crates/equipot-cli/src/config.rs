//! TOML configuration deserialisation for solver jobs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use equipot_core::solver::jacobi::{JacobiEdges, DEFAULT_ABSOLUTE_TOLERANCE};
use equipot_core::solver::{
    SweepOrdering, DEFAULT_MAX_ITERATIONS, DEFAULT_RELAXATION_FACTOR, DEFAULT_TOLERANCE,
};
use equipot_core::types::BoundarySpec;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub field: FieldConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Grid files to load.
#[derive(Debug, Deserialize)]
pub struct InputConfig {
    /// Mask matrix: non-zero = free, 0 = fixed.
    pub mask: PathBuf,
    /// Seed potential matrix.
    pub potential: PathBuf,
}

/// Relaxation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Sor,
    Jacobi,
}

/// Solver parameters from TOML.
#[derive(Debug, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub boundary: BoundarySpec,
    /// SOR relaxation factor, or the Jacobi weight when `method = "jacobi"`.
    #[serde(default = "default_relaxation_factor")]
    pub relaxation_factor: f64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Jacobi only.
    #[serde(default = "default_absolute_tolerance")]
    pub absolute_tolerance: f64,
    /// Jacobi only: "nearest" clamps at the grid edge and ignores `boundary`.
    #[serde(default)]
    pub edges: JacobiEdges,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// SOR only.
    #[serde(default)]
    pub ordering: SweepOrdering,
    #[serde(default)]
    pub best_effort: bool,
    pub time_limit_secs: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            method: Method::default(),
            boundary: BoundarySpec::default(),
            relaxation_factor: default_relaxation_factor(),
            tolerance: default_tolerance(),
            absolute_tolerance: default_absolute_tolerance(),
            edges: JacobiEdges::default(),
            max_iterations: default_max_iterations(),
            ordering: SweepOrdering::default(),
            best_effort: false,
            time_limit_secs: None,
        }
    }
}

fn default_relaxation_factor() -> f64 {
    DEFAULT_RELAXATION_FACTOR
}
fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}
fn default_absolute_tolerance() -> f64 {
    DEFAULT_ABSOLUTE_TOLERANCE
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

/// Field extraction settings.
#[derive(Debug, Deserialize)]
pub struct FieldConfig {
    /// Cell spacing `[dx, dy]` (default: unit spacing).
    #[serde(default = "default_spacing")]
    pub spacing: [f64; 2],
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spacing: default_spacing(),
        }
    }
}

fn default_spacing() -> [f64; 2] {
    [1.0, 1.0]
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the converged potential (default: true).
    #[serde(default = "default_true")]
    pub save_potential: bool,
    /// Whether to save the field components (default: true).
    #[serde(default = "default_true")]
    pub save_field: bool,
    /// Whether to also write a JSON run summary (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_potential: true,
            save_field: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

impl JobConfig {
    /// Anchor relative input paths at `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.input.mask, &mut self.input.potential] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
///
/// Input paths are resolved against the directory holding the file.
pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config = parse_config(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    if let Some(base) = path.parent() {
        config.resolve_paths(base);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let job = parse_config(
            r#"
            [input]
            mask = "mask.txt"
            potential = "potential.txt"
            "#,
        )
        .unwrap();
        assert_eq!(job.solver.method, Method::Sor);
        assert_eq!(job.solver.boundary, BoundarySpec::Fixed);
        assert_eq!(job.solver.relaxation_factor, 1.0);
        assert_eq!(job.solver.tolerance, 1e-4);
        assert_eq!(job.solver.max_iterations, 100_000);
        assert_eq!(job.solver.ordering, SweepOrdering::Lexicographic);
        assert_eq!(job.solver.edges, JacobiEdges::Nearest);
        assert!(job.solver.time_limit_secs.is_none());
        assert_eq!(job.field.spacing, [1.0, 1.0]);
        assert_eq!(job.output.directory, "./output");
        assert!(job.output.save_potential && job.output.save_field);
        assert!(!job.output.save_json);
    }

    #[test]
    fn test_full_config() {
        let job = parse_config(
            r#"
            [input]
            mask = "maskarray.txt"
            potential = "potentialarray.txt"

            [solver]
            method = "jacobi"
            boundary = "periodic"
            relaxation_factor = 0.8
            tolerance = 1e-6
            absolute_tolerance = 1e-10
            edges = "boundary"
            max_iterations = 500
            ordering = "red_black"
            best_effort = true
            time_limit_secs = 2.5

            [field]
            spacing = [0.5, 2.0]

            [output]
            directory = "results"
            save_field = false
            save_json = true
            "#,
        )
        .unwrap();
        assert_eq!(job.solver.method, Method::Jacobi);
        assert_eq!(job.solver.boundary, BoundarySpec::Periodic);
        assert_eq!(job.solver.relaxation_factor, 0.8);
        assert_eq!(job.solver.absolute_tolerance, 1e-10);
        assert_eq!(job.solver.edges, JacobiEdges::Boundary);
        assert_eq!(job.solver.max_iterations, 500);
        assert_eq!(job.solver.ordering, SweepOrdering::RedBlack);
        assert!(job.solver.best_effort);
        assert_eq!(job.solver.time_limit_secs, Some(2.5));
        assert_eq!(job.field.spacing, [0.5, 2.0]);
        assert_eq!(job.output.directory, "results");
        assert!(!job.output.save_field);
        assert!(job.output.save_json);
    }

    #[test]
    fn test_unknown_boundary_is_rejected() {
        let result = parse_config(
            r#"
            [input]
            mask = "m.txt"
            potential = "p.txt"

            [solver]
            boundary = "mirror"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(parse_config("[solver]\ntolerance = 1e-3\n").is_err());
    }

    #[test]
    fn test_relative_inputs_resolve_against_config_dir() {
        let mut job = parse_config(
            r#"
            [input]
            mask = "grids/mask.txt"
            potential = "/abs/potential.txt"
            "#,
        )
        .unwrap();
        job.resolve_paths(Path::new("/jobs/box"));
        assert_eq!(job.input.mask, PathBuf::from("/jobs/box/grids/mask.txt"));
        assert_eq!(job.input.potential, PathBuf::from("/abs/potential.txt"));
    }
}
