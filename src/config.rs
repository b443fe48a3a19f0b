//! Run configuration for the exploration engine.
//!
//! Flag parsing lives outside the crate; this module only holds the values
//! an outer layer fills in, their defaults, and domain validation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_TRANSIENT;
use crate::error::{check_domain, check_finite, DynamicsError, Result};
use crate::sequence::{Axis, DEFAULT_CAPACITY};
use crate::systems::{DuffingOscillator, DuffingState, LogisticMap, RosslerFlow, RosslerPoint};

/// Which dynamical system to explore
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemKind {
    #[default]
    Logistic,
    Duffing,
    Rossler,
}

impl FromStr for SystemKind {
    type Err = DynamicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "logistic" | "feigenbaum" => Ok(Self::Logistic),
            "duffing" => Ok(Self::Duffing),
            "rossler" | "rössler" => Ok(Self::Rossler),
            other => Err(DynamicsError::Config(format!("unknown system '{}'", other))),
        }
    }
}

/// Analyses to run on the logistic grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSelection {
    pub diagram: bool,
    pub liapunov: bool,
    pub bifurcation: bool,
    /// Print convergence toward known attractors
    pub convergence: bool,
    /// Print separation of neighbouring initial conditions
    pub chaos: bool,
}

impl Default for AnalysisSelection {
    fn default() -> Self {
        Self {
            diagram: true,
            liapunov: false,
            bifurcation: false,
            convergence: true,
            chaos: false,
        }
    }
}

impl AnalysisSelection {
    /// Parse a comma separated list such as `"diagram,liapunov"`
    pub fn parse_list(list: &str) -> Result<Self> {
        let mut selection = Self {
            diagram: false,
            liapunov: false,
            bifurcation: false,
            convergence: false,
            chaos: false,
        };
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name {
                "diagram" => selection.diagram = true,
                "liapunov" | "lyapunov" => selection.liapunov = true,
                "bifurcation" => selection.bifurcation = true,
                "convergence" => selection.convergence = true,
                "chaos" => selection.chaos = true,
                other => return Err(DynamicsError::Config(format!("unknown analysis '{}'", other))),
            }
        }
        Ok(selection)
    }
}

/// Logistic map grid and analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    pub r_start: f64,
    pub r_end: f64,
    pub r_step: f64,
    pub x0_start: f64,
    pub x0_end: f64,
    pub x0_step: f64,
    /// Initial condition used for single-column scans and reports
    pub probe_x0: f64,
    /// Elements discarded before sampling the diagram
    pub transient: usize,
    /// Iterations printed by the convergence report
    pub report_iterations: usize,
    /// Growth rates checked by the convergence report
    pub convergence_r: Vec<f64>,
    /// Growth rate used by the chaos report
    pub chaos_r: f64,
    pub liapunov_samples: usize,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            r_start: 0.0,
            r_end: 4.0,
            r_step: 0.001,
            x0_start: 0.0,
            x0_end: 1.0,
            x0_step: 0.01,
            probe_x0: 0.3,
            transient: DEFAULT_TRANSIENT,
            report_iterations: 300,
            convergence_r: vec![2.0, 3.2],
            chaos_r: 3.9,
            liapunov_samples: 1000,
        }
    }
}

impl LogisticConfig {
    /// (r axis, x0 axis) of the full grid
    pub fn axes(&self) -> Result<(Axis, Axis)> {
        Ok((
            Axis::new("r", self.r_start, self.r_end, self.r_step)?,
            Axis::new("x0", self.x0_start, self.x0_end, self.x0_step)?,
        ))
    }

    pub fn validate(&self) -> Result<()> {
        check_domain("r_start", self.r_start, 0.0, LogisticMap::R_MAX)?;
        check_domain("r_end", self.r_end, 0.0, LogisticMap::R_MAX)?;
        check_domain("x0_start", self.x0_start, 0.0, 1.0)?;
        check_domain("x0_end", self.x0_end, 0.0, 1.0)?;
        check_domain("probe_x0", self.probe_x0, 0.0, 1.0)?;
        check_domain("chaos_r", self.chaos_r, 0.0, LogisticMap::R_MAX)?;
        for &r in &self.convergence_r {
            check_domain("convergence_r", r, 0.0, LogisticMap::R_MAX)?;
        }
        if self.liapunov_samples == 0 {
            return Err(DynamicsError::Config("liapunov_samples must be positive".into()));
        }
        self.axes().map(|_| ())
    }
}

/// Duffing oscillator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuffingConfig {
    pub forcing: f64,
    pub x0: f64,
    pub y0: f64,
    /// Simulated time units
    pub seconds: u32,
    /// Integration steps per time unit
    pub steps_per_second: u32,
    /// Run two forcings side by side instead of `forcing`
    pub compare: bool,
    pub compare_forcing: (f64, f64),
}

impl Default for DuffingConfig {
    fn default() -> Self {
        Self {
            forcing: 0.24,
            x0: 0.0,
            y0: 0.0,
            seconds: 100,
            steps_per_second: 1000,
            compare: false,
            compare_forcing: (0.24, 0.35),
        }
    }
}

impl DuffingConfig {
    pub fn kernel(&self, forcing: f64) -> Result<DuffingOscillator> {
        DuffingOscillator::new(forcing, self.steps_per_second)
    }

    pub fn initial(&self) -> DuffingState {
        DuffingState::new(self.x0, self.y0)
    }

    /// Total integration steps
    pub fn steps(&self) -> usize {
        self.seconds as usize * self.steps_per_second as usize
    }

    pub fn validate(&self) -> Result<()> {
        self.kernel(self.forcing)?;
        self.kernel(self.compare_forcing.0)?;
        self.kernel(self.compare_forcing.1)?;
        check_finite("x0", self.x0)?;
        check_finite("y0", self.y0)
    }
}

/// Rössler flow settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosslerConfig {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub x0: f64,
    pub y0: f64,
    pub z0: f64,
    pub steps: usize,
}

impl Default for RosslerConfig {
    fn default() -> Self {
        Self {
            a: 0.2,
            b: 0.2,
            c: 5.7,
            x0: -1.0,
            y0: 0.0,
            z0: 0.0,
            steps: 100_000,
        }
    }
}

impl RosslerConfig {
    pub fn kernel(&self) -> Result<RosslerFlow> {
        RosslerFlow::new(self.a, self.b, self.c)
    }

    pub fn initial(&self) -> RosslerPoint {
        RosslerPoint::new(self.x0, self.y0, self.z0)
    }

    pub fn validate(&self) -> Result<()> {
        self.kernel()?;
        for (name, v) in [("x0", self.x0), ("y0", self.y0), ("z0", self.z0)] {
            check_finite(name, v)?;
        }
        Ok(())
    }
}

/// Complete configuration of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub system: SystemKind,
    pub logistic: LogisticConfig,
    pub duffing: DuffingConfig,
    pub rossler: RosslerConfig,
    pub analyses: AnalysisSelection,
    /// Bounded queue capacity per sequence
    pub queue_capacity: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            system: SystemKind::default(),
            logistic: LogisticConfig::default(),
            duffing: DuffingConfig::default(),
            rossler: RosslerConfig::default(),
            analyses: AnalysisSelection::default(),
            queue_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl ExplorerConfig {
    /// Reject out-of-domain values before any sequence is created
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(DynamicsError::Config("queue_capacity must be positive".into()));
        }
        match self.system {
            SystemKind::Logistic => self.logistic.validate(),
            SystemKind::Duffing => self.duffing.validate(),
            SystemKind::Rossler => self.rossler.validate(),
        }
    }

    /// Defaults overlaid with environment variables
    ///
    /// | Variable                  | Field                       |
    /// |---------------------------|-----------------------------|
    /// | `CHAOS_SYSTEM`            | `system`                    |
    /// | `CHAOS_ANALYSES`          | `analyses` (comma list)     |
    /// | `CHAOS_R_STEP`            | `logistic.r_step`           |
    /// | `CHAOS_X0_STEP`           | `logistic.x0_step`          |
    /// | `CHAOS_PROBE_X0`          | `logistic.probe_x0`         |
    /// | `CHAOS_TRANSIENT`         | `logistic.transient`        |
    /// | `CHAOS_LIAPUNOV_SAMPLES`  | `logistic.liapunov_samples` |
    /// | `CHAOS_DUFFING_F`         | `duffing.forcing`           |
    /// | `CHAOS_DUFFING_COMPARE`   | `duffing.compare`           |
    /// | `CHAOS_ROSSLER_C`         | `rossler.c`                 |
    /// | `CHAOS_ROSSLER_STEPS`     | `rossler.steps`             |
    /// | `CHAOS_QUEUE_CAPACITY`    | `queue_capacity`            |
    ///
    /// Unparseable numbers fall back to the default; unknown system or
    /// analysis names are errors.
    pub fn from_env() -> Result<Self> {
        fn env_parse<T: FromStr>(key: &str, default: T) -> T {
            std::env::var(key)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        }

        let mut cfg = Self::default();
        if let Ok(system) = std::env::var("CHAOS_SYSTEM") {
            cfg.system = system.parse()?;
        }
        if let Ok(list) = std::env::var("CHAOS_ANALYSES") {
            cfg.analyses = AnalysisSelection::parse_list(&list)?;
        }

        let l = &mut cfg.logistic;
        l.r_step = env_parse("CHAOS_R_STEP", l.r_step);
        l.x0_step = env_parse("CHAOS_X0_STEP", l.x0_step);
        l.probe_x0 = env_parse("CHAOS_PROBE_X0", l.probe_x0);
        l.transient = env_parse("CHAOS_TRANSIENT", l.transient);
        l.liapunov_samples = env_parse("CHAOS_LIAPUNOV_SAMPLES", l.liapunov_samples);

        cfg.duffing.forcing = env_parse("CHAOS_DUFFING_F", cfg.duffing.forcing);
        cfg.duffing.compare = env_parse("CHAOS_DUFFING_COMPARE", cfg.duffing.compare);
        cfg.rossler.c = env_parse("CHAOS_ROSSLER_C", cfg.rossler.c);
        cfg.rossler.steps = env_parse("CHAOS_ROSSLER_STEPS", cfg.rossler.steps);
        cfg.queue_capacity = env_parse("CHAOS_QUEUE_CAPACITY", cfg.queue_capacity);

        Ok(cfg)
    }
}
