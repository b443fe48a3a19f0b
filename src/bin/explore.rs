//! Explorer: runs the configured analyses and reports their results
//!
//! Configuration comes from `CHAOS_*` environment variables (see
//! `ExplorerConfig::from_env`). Point sets are summarized on the console;
//! rendering them is left to external tools.
//!
//! ## Protocol (logistic map)
//!
//! 1. Convergence toward the analytic attractor at each `convergence_r`
//! 2. Separation of neighbouring initial conditions at `chaos_r`
//! 3. Period-doubling scan along r at `probe_x0`
//! 4. Liapunov curve along r at `probe_x0`
//! 5. Full-grid bifurcation diagram

use std::process::ExitCode;
use std::time::Instant;

use chaos_dynamics::analysis::decorrelation_time;
use chaos_dynamics::config::LogisticConfig;
use chaos_dynamics::{
    classify, compare, record_pair, record_trajectory, sample_diagram, Attractor, Axis,
    BifurcationDetector, ExplorerConfig, LiapunovEstimator, LogisticMap, ParameterGrid, Result,
    Sequence, SystemKind,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("chaos_dynamics=info,explore=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "exploration failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = ExplorerConfig::from_env()?;
    config.validate()?;
    info!(system = ?config.system, analyses = ?config.analyses, "configuration loaded");

    let start = Instant::now();
    match config.system {
        SystemKind::Logistic => run_logistic(&config).await?,
        SystemKind::Duffing => run_duffing(&config).await?,
        SystemKind::Rossler => run_rossler(&config).await?,
    }
    info!(elapsed = ?start.elapsed(), "processing completed");
    Ok(())
}

/// Grid over the configured r axis at a single initial condition
fn r_column(cfg: &LogisticConfig, capacity: usize) -> Result<ParameterGrid<f64>> {
    let (rows, _) = cfg.axes()?;
    let cols = Axis::point("x0", cfg.probe_x0)?;
    ParameterGrid::build(rows, cols, capacity, LogisticMap::cell)
}

async fn run_logistic(config: &ExplorerConfig) -> Result<()> {
    let cfg = &config.logistic;
    let selection = config.analyses;
    let capacity = config.queue_capacity;

    if selection.convergence {
        let mut grid = r_column(cfg, capacity)?;
        for &r in &cfg.convergence_r {
            let attractor = Attractor::for_logistic(r);
            let seq = grid.at(r, cfg.probe_x0)?;
            let report = classify(seq, &attractor, cfg.report_iterations).await?;
            match report.first_within(1e-3) {
                Some(rec) => println!(
                    "r={} x0={}: Xn {} within {:.2e} of {} after {} iterations",
                    r,
                    cfg.probe_x0,
                    rec.value,
                    rec.deviation.unwrap_or(f64::NAN),
                    rec.target.unwrap_or(f64::NAN),
                    rec.iteration
                ),
                None => println!("r={} x0={}: no convergence to {:?}", r, cfg.probe_x0, attractor),
            }
        }
        grid.shutdown().await?;
    }

    if selection.chaos {
        let rows = Axis::point("r", cfg.chaos_r)?;
        let (_, cols) = cfg.axes()?;
        let mut grid = ParameterGrid::build(rows, cols, capacity, LogisticMap::cell)?;
        let (left, right) = grid.neighbours(cfg.chaos_r, cfg.probe_x0)?;
        let records = compare(left, right, cfg.report_iterations).await?;
        for rec in records.iter().take(40) {
            println!("n={:3}  Xn={:.6}  Xn'={:.6}  |Xn-Xn'|={:.6}", rec.iteration, rec.left, rec.right, rec.separation);
        }
        info!(decorrelated_at = ?decorrelation_time(&records, 0.1), "chaos report");
        grid.shutdown().await?;
    }

    if selection.bifurcation {
        let mut grid = r_column(cfg, capacity)?;
        let points = BifurcationDetector::new().scan(&mut grid, cfg.probe_x0).await?;
        println!("1 -> 2 at r = {:?}", points.one_to_two);
        println!("2 -> 4 at r = {:?}", points.two_to_four);
        println!("4 -> 8 at r = {:?}", points.four_to_eight);
        grid.shutdown().await?;
    }

    if selection.liapunov {
        let mut grid = r_column(cfg, capacity)?;
        let curve = LiapunovEstimator::new(cfg.liapunov_samples)
            .scan(&mut grid, cfg.probe_x0, LogisticMap::new)
            .await?;
        println!("Liapunov exponent first positive at r = {:?}", curve.first_positive());
        grid.shutdown().await?;
    }

    if selection.diagram {
        let (rows, cols) = cfg.axes()?;
        let built = Instant::now();
        let mut grid = ParameterGrid::build(rows, cols, capacity, LogisticMap::cell)?;
        info!(elapsed = ?built.elapsed(), "grid spawned");
        let diagram = sample_diagram(&mut grid, cfg.transient).await?;
        println!(
            "diagram: {} points ({} missing)",
            diagram.points.nrows() - diagram.missing,
            diagram.missing
        );
        grid.shutdown().await?;
    }

    Ok(())
}

async fn run_duffing(config: &ExplorerConfig) -> Result<()> {
    let cfg = &config.duffing;
    let steps = cfg.steps();

    if cfg.compare {
        let (low_f, high_f) = cfg.compare_forcing;
        let mut low = Sequence::spawn_with_capacity(cfg.kernel(low_f)?, cfg.initial(), config.queue_capacity)?;
        let mut high = Sequence::spawn_with_capacity(cfg.kernel(high_f)?, cfg.initial(), config.queue_capacity)?;
        let (a, b) = record_pair(&mut low, &mut high, steps).await?;
        println!("F={}: {} points, last {:?}", low_f, a.len(), a.points.last());
        println!("F={}: {} points, last {:?}", high_f, b.len(), b.points.last());
        low.shutdown().await?;
        high.shutdown().await?;
    } else {
        let mut seq = Sequence::spawn_with_capacity(cfg.kernel(cfg.forcing)?, cfg.initial(), config.queue_capacity)?;
        let traj = record_trajectory(&mut seq, steps).await?;
        println!("F={}: {} points, last {:?}", cfg.forcing, traj.len(), traj.points.last());
        seq.shutdown().await?;
    }
    Ok(())
}

async fn run_rossler(config: &ExplorerConfig) -> Result<()> {
    let cfg = &config.rossler;
    let mut seq = Sequence::spawn_with_capacity(cfg.kernel()?, cfg.initial(), config.queue_capacity)?;
    let traj = record_trajectory(&mut seq, cfg.steps).await?;
    println!(
        "Rossler a={} b={} c={}: {} points{}, last {:?}",
        cfg.a,
        cfg.b,
        cfg.c,
        traj.len(),
        if traj.terminated { " (diverged)" } else { "" },
        traj.points.last().map(|p| p.projections())
    );
    seq.shutdown().await?;
    Ok(())
}
