// Deadline and cancellation around the blocking solve call
//
// The adapter runs on a worker thread; the caller waits on a channel and gives
// up at the deadline or on cancellation. The worker is detached in that case
// and its late answer is dropped.

use crate::domain::{
    models::{OptimizationProblem, Solution, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Extra wait granted to backends that enforce the time limit themselves
const NATIVE_LIMIT_GRACE: Duration = Duration::from_millis(500);

/// Cloneable flag shared between the caller and a running solve
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Bounds on how long a caller is willing to wait for the solver
#[derive(Debug, Clone, Default)]
pub struct SolveOptions {
    pub time_limit: Option<Duration>,
    pub cancel: Option<CancellationToken>,
}

impl SolveOptions {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }
}

/// Solve `problem`, returning a `NotSolved` solution instead of blocking past
/// the deadline or after cancellation.
///
/// Giving up only stops the wait. Backends without a native time limit
/// (microlp) keep searching on the detached worker thread until they finish,
/// so a long-running server holds one thread per abandoned solve until then.
/// Pick a backend with `supports_time_limit` when that matters.
pub fn solve_timeboxed(
    solver: Arc<dyn SolverService>,
    mut problem: OptimizationProblem,
    options: &SolveOptions,
) -> Result<Solution> {
    let start = Instant::now();
    let statistics = SolverStatistics::for_problem(&problem);

    if options.is_cancelled() {
        return Ok(Solution::not_solved("Cancelled before solving").with_statistics(statistics));
    }

    if options.time_limit.is_some() {
        problem.solver_config.time_limit = options.time_limit;
    }

    let grace = if solver.supports_time_limit() {
        NATIVE_LIMIT_GRACE
    } else {
        Duration::ZERO
    };
    // a limit past the end of the clock leaves only cancellation to end the wait
    let deadline = options
        .time_limit
        .and_then(|limit| start.checked_add(limit)?.checked_add(grace));

    if deadline.is_none() && options.cancel.is_none() {
        return solver.solve(&problem);
    }

    let (tx, rx) = mpsc::channel();
    let worker_solver = Arc::clone(&solver);
    thread::Builder::new()
        .name("binpack-solve".to_string())
        .spawn(move || {
            // the receiver is gone when the caller already gave up
            let _ = tx.send(worker_solver.solve(&problem));
        })
        .map_err(|e| SolverError::ExecutionFailed(format!("cannot spawn solver thread: {}", e)))?;

    loop {
        let wait = match deadline {
            Some(deadline) => deadline.saturating_duration_since(Instant::now()).min(POLL_INTERVAL),
            None => POLL_INTERVAL,
        };

        match rx.recv_timeout(wait) {
            Ok(result) => return result,
            Err(RecvTimeoutError::Disconnected) => {
                return Err(SolverError::ExecutionFailed(format!(
                    "{} terminated without an answer",
                    solver.name()
                )))
            }
            Err(RecvTimeoutError::Timeout) => {
                let mut stats = statistics.clone();
                stats.solve_time_ms = start.elapsed().as_secs_f64() * 1000.0;

                if options.is_cancelled() {
                    debug!(backend = solver.name(), "solve cancelled");
                    return Ok(Solution::not_solved("Cancelled").with_statistics(stats));
                }
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    warn!(
                        backend = solver.name(),
                        elapsed_ms = stats.solve_time_ms,
                        "solver exceeded its deadline"
                    );
                    return Ok(Solution::not_solved("Time limit reached").with_statistics(stats));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        models::{ObjectiveFunction, Variable},
        value_objects::SolutionStatus,
    };

    /// Sleeps, then answers with an optimal all-zero assignment.
    struct SlowSolver(Duration);

    impl SolverService for SlowSolver {
        fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
            thread::sleep(self.0);
            Ok(Solution::optimal(
                problem.objective.constant,
                vec![0.0; problem.num_variables()],
            ))
        }

        fn name(&self) -> &str {
            "slow"
        }

        fn supports_time_limit(&self) -> bool {
            false
        }
    }

    fn problem() -> OptimizationProblem {
        OptimizationProblem::new(ObjectiveFunction::new(vec![1.0]))
            .with_variables(vec![Variable::binary("x")])
    }

    #[test]
    fn returns_answer_within_deadline() {
        let solver = Arc::new(SlowSolver(Duration::from_millis(5)));
        let options = SolveOptions::default().with_time_limit(Duration::from_secs(5));
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
    }

    #[test]
    fn deadline_maps_to_not_solved() {
        let solver = Arc::new(SlowSolver(Duration::from_secs(2)));
        let options = SolveOptions::default().with_time_limit(Duration::from_millis(50));
        let start = Instant::now();
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert!(solution.variable_values.is_empty());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn cancellation_maps_to_not_solved() {
        let token = CancellationToken::new();
        let options = SolveOptions::default().with_cancellation(token.clone());
        let canceller = {
            let token = token.clone();
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(30));
                token.cancel();
            })
        };
        let solver = Arc::new(SlowSolver(Duration::from_secs(2)));
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        canceller.join().unwrap();
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert_eq!(solution.message, "Cancelled");
    }

    #[test]
    fn already_cancelled_never_calls_solver() {
        let token = CancellationToken::new();
        token.cancel();
        let options = SolveOptions::default().with_cancellation(token);
        let solver = Arc::new(SlowSolver(Duration::from_secs(10)));
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert_eq!(solution.statistics.num_variables, 1);
    }

    #[test]
    fn limit_beyond_the_clock_waits_for_the_answer() {
        let solver = Arc::new(SlowSolver(Duration::from_millis(5)));
        let options = SolveOptions::default().with_time_limit(Duration::from_secs(u64::MAX / 2));
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        assert_eq!(solution.status, SolutionStatus::Optimal);
    }

    #[test]
    fn limit_beyond_the_clock_still_honours_cancellation() {
        let token = CancellationToken::new();
        let options = SolveOptions::default()
            .with_time_limit(Duration::from_secs(u64::MAX / 2))
            .with_cancellation(token.clone());
        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            token.cancel();
        });
        let solver = Arc::new(SlowSolver(Duration::from_secs(2)));
        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        canceller.join().unwrap();
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert_eq!(solution.message, "Cancelled");
    }

    /// Records when its solve returns.
    struct FlaggingSolver {
        delay: Duration,
        finished: Arc<AtomicBool>,
    }

    impl SolverService for FlaggingSolver {
        fn solve(&self, problem: &OptimizationProblem) -> Result<Solution> {
            thread::sleep(self.delay);
            self.finished.store(true, Ordering::SeqCst);
            Ok(Solution::optimal(0.0, vec![0.0; problem.num_variables()]))
        }

        fn name(&self) -> &str {
            "flagging"
        }

        fn supports_time_limit(&self) -> bool {
            false
        }
    }

    #[test]
    fn abandoned_worker_runs_to_completion() {
        let finished = Arc::new(AtomicBool::new(false));
        let solver = Arc::new(FlaggingSolver {
            delay: Duration::from_millis(300),
            finished: Arc::clone(&finished),
        });
        let options = SolveOptions::default().with_time_limit(Duration::from_millis(20));

        let solution = solve_timeboxed(solver, problem(), &options).unwrap();
        assert_eq!(solution.status, SolutionStatus::NotSolved);
        assert!(!finished.load(Ordering::SeqCst));

        let waited = Instant::now();
        while !finished.load(Ordering::SeqCst) && waited.elapsed() < Duration::from_secs(5) {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(finished.load(Ordering::SeqCst));
    }
}
