/// Average target distance the converted distances are normalized to.
pub const AVG_DIST: f64 = 10.0;

/// Width of the Lorentzian curve. Larger values saturate later.
pub const WIDE_CURVE: f64 = 25.0;

/// Relative gradient-norm tolerance for convergence, and the smallest
/// step size the line search may try.
pub const NEAR_ZERO: f64 = 1e-5;

/// Upper bound on worker threads, whatever the core count.
pub const MAX_NUM_THREAD: usize = 120;

pub const DEFAULT_LEARNING_RATE: f64 = 1.0;
pub const DEFAULT_MAX_ITERATION: usize = 2000;
pub const DEFAULT_CONVERT_FACTOR: f64 = 1.0;
pub const DEFAULT_NUM_MODELS: usize = 1;

/// Conversion-factor sweep grid.
pub const START_CONVERT_FACTOR: f64 = 0.1;
pub const END_CONVERT_FACTOR: f64 = 3.0;
pub const CONVERT_FACTOR_STEP: f64 = 0.1;

/// Models generated per conversion factor while sweeping.
pub const TEMP_NUM: usize = 5;
/// Iteration cap for sweep trials.
pub const TRIAL_MAX_ITERATION: usize = 500;

/// Two sweep scores closer than this are considered tied.
pub const SELECTION_TOLERANCE: f64 = 0.001;

/// Score assigned when a correlation cannot be computed.
pub const WORST_CORRELATION: f64 = 1.0;

/// Largest genomic offset covered by synthesized inequality constraints.
pub const INEQUALITY_MAX_OFFSET: usize = 5;

/// Every iteration below this count is offered to the snapshot sink.
pub const SNAPSHOT_WARMUP: usize = 100;
/// After warmup, every n-th iteration is offered to the snapshot sink.
pub const SNAPSHOT_EVERY: usize = 30;
