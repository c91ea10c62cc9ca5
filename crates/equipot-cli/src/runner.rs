//! Job runner: ties together grid loading, relaxation, and field extraction.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use serde::Serialize;

use equipot_core::fields::gradient_field_with_spacing;
use equipot_core::solver::{
    IterationControl, JacobiSolver, PotentialSolver, SolverError, SorSolver,
};
use equipot_core::types::{RelaxationResult, VectorField};
use equipot_io::{load_grid_state, write_matrix_file};

use crate::config::{JobConfig, Method, OutputConfig, SolverConfig};

/// Results from a job run.
pub struct JobOutput {
    pub result: RelaxationResult,
    /// `None` when the grid is too thin to differentiate.
    pub field: Option<VectorField>,
    pub summary: RunSummary,
}

/// Run metadata written to `summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub version: String,
    pub method: String,
    pub boundary: String,
    pub ordering: Option<String>,
    pub edges: Option<String>,
    pub rows: usize,
    pub cols: usize,
    pub free_cells: usize,
    pub relaxation_factor: f64,
    pub tolerance: f64,
    pub iterations: usize,
    pub residual: f64,
    pub converged: bool,
    pub elapsed_secs: f64,
    pub max_field_strength: Option<f64>,
}

/// Build the configured solver.
pub fn build_solver(cfg: &SolverConfig) -> Result<Box<dyn PotentialSolver>> {
    let time_limit = cfg
        .time_limit_secs
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("time_limit_secs must be a non-negative number of seconds")?;
    let control = IterationControl {
        max_iterations: cfg.max_iterations,
        best_effort: cfg.best_effort,
        time_limit,
        cancel: None,
    };

    let solver: Box<dyn PotentialSolver> = match cfg.method {
        Method::Sor => Box::new(
            SorSolver::new(cfg.relaxation_factor, cfg.tolerance)
                .with_ordering(cfg.ordering)
                .with_control(control),
        ),
        Method::Jacobi => {
            let mut jacobi = JacobiSolver::new(cfg.relaxation_factor, cfg.tolerance)
                .with_edges(cfg.edges)
                .with_control(control);
            jacobi.absolute_tolerance = cfg.absolute_tolerance;
            Box::new(jacobi)
        }
    };
    Ok(solver)
}

/// Load the grids, relax them, and extract the field.
pub fn run_job(job: &JobConfig) -> Result<JobOutput> {
    let state = load_grid_state(&job.input.mask, &job.input.potential).with_context(|| {
        format!(
            "Failed to load grids from {} and {}",
            job.input.mask.display(),
            job.input.potential.display()
        )
    })?;
    let (rows, cols) = state.dim();
    println!(
        "Grid: {}x{} ({} free cells), boundary={}",
        rows,
        cols,
        state.free_cells(),
        job.solver.boundary
    );

    let solver = build_solver(&job.solver)?;
    println!("Method: {}", solver.method_name());

    let start = Instant::now();
    let result = solver
        .relax(&state, job.solver.boundary)
        .map_err(|e| anyhow::anyhow!("{} failed: {}", solver.method_name(), e))?;
    let elapsed = start.elapsed().as_secs_f64();

    if result.converged {
        println!(
            "Converged after {} iterations (residual {:.2e}, {:.3} s)",
            result.iterations, result.residual, elapsed
        );
    } else {
        println!(
            "Stopped after {} iterations without converging (residual {:.2e})",
            result.iterations, result.residual
        );
    }

    let [dx, dy] = job.field.spacing;
    let field = match gradient_field_with_spacing(&result.potential, dx, dy) {
        Ok(field) => Some(field),
        Err(SolverError::GridTooSmall { rows, cols }) => {
            eprintln!(
                "Warning: {}x{} grid is too small for field extraction; skipping",
                rows, cols
            );
            None
        }
        Err(e) => return Err(e).context("Field extraction failed"),
    };

    let max_field_strength = field
        .as_ref()
        .map(|f| f.magnitude().iter().fold(0.0_f64, |acc, &v| acc.max(v)));

    let summary = RunSummary {
        version: env!("CARGO_PKG_VERSION").into(),
        method: solver.method_name().into(),
        boundary: job.solver.boundary.to_string(),
        ordering: match job.solver.method {
            Method::Sor => Some(job.solver.ordering.to_string()),
            Method::Jacobi => None,
        },
        edges: match job.solver.method {
            Method::Sor => None,
            Method::Jacobi => Some(job.solver.edges.to_string()),
        },
        rows,
        cols,
        free_cells: state.free_cells(),
        relaxation_factor: job.solver.relaxation_factor,
        tolerance: job.solver.tolerance,
        iterations: result.iterations,
        residual: result.residual,
        converged: result.converged,
        elapsed_secs: elapsed,
        max_field_strength,
    };

    Ok(JobOutput {
        result,
        field,
        summary,
    })
}

/// Write the requested outputs into `out_dir`.
pub fn write_outputs(output: &JobOutput, cfg: &OutputConfig, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    if cfg.save_potential {
        let path = out_dir.join("potential.txt");
        write_matrix_file(&path, &output.result.potential)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Potential written to: {}", path.display());
    }

    if cfg.save_field {
        if let Some(field) = &output.field {
            for (name, grid) in [("field_x.txt", &field.ex), ("field_y.txt", &field.ey)] {
                let path = out_dir.join(name);
                write_matrix_file(&path, grid)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
            }
            println!("Field written to: {}", out_dir.display());
        }
    }

    if cfg.save_json {
        let path = out_dir.join("summary.json");
        let json = serde_json::to_string_pretty(&output.summary)
            .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
        std::fs::write(&path, json)?;
        println!("Summary (JSON) written to: {}", path.display());
    }

    Ok(())
}
