//! Black-box MILP solving behind a trait boundary.

use crate::data::{ResidentIdx, RoomIdx, SolveStatus};
use crate::error::{SolveError, SolveResult};
use crate::model::PairingModel;
use good_lp::{ResolutionError, Solution, SolverModel, default_solver};
use log::{debug, info};
use std::time::{Duration, Instant};

/// Every decision variable's solved value, indexed like the model's
/// ordered (a, b, room) triples.
#[derive(Debug, Clone)]
pub struct SolvedVariables {
    residents: usize,
    rooms: usize,
    values: Vec<f64>,
}

impl SolvedVariables {
    pub fn new(residents: usize, rooms: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), residents * residents * rooms);
        Self {
            residents,
            rooms,
            values,
        }
    }

    pub fn residents(&self) -> usize {
        self.residents
    }

    pub fn rooms(&self) -> usize {
        self.rooms
    }

    /// Solved value of x[a][b][r].
    pub fn value(&self, a: ResidentIdx, b: ResidentIdx, r: RoomIdx) -> f64 {
        self.values[(a * self.residents + b) * self.rooms + r]
    }
}

/// A successful solve: a value for every variable plus the certification
/// status the backend reported.
#[derive(Debug, Clone)]
pub struct OracleOutcome {
    pub variables: SolvedVariables,
    pub status: SolveStatus,
}

/// A general-purpose integer-programming backend.
///
/// The pipeline never looks inside the solver: it submits the assembled
/// model with a wall-clock budget and reads back variable values and a
/// status. Any compliant backend can stand in for the default by
/// implementing this trait.
pub trait MilpOracle {
    fn solve(&self, model: PairingModel, time_limit: Duration) -> SolveResult<OracleOutcome>;
}

/// The default oracle, driving the HiGHS solver through `good_lp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsOracle;

impl MilpOracle for HighsOracle {
    fn solve(&self, model: PairingModel, time_limit: Duration) -> SolveResult<OracleOutcome> {
        let PairingModel {
            residents,
            rooms,
            variables,
            x,
            objective,
            constraints,
        } = model;

        info!(
            "Starting MILP solve with a {:.0}s budget...",
            time_limit.as_secs_f64()
        );
        let start_time = Instant::now();
        let mut problem = variables
            .minimise(objective)
            .using(default_solver)
            .set_option("threads", 1) // limit to 1 thread for reproducibility
            .set_option("random_seed", 1234) //set seed for reproducibility
            .set_option("log_to_console", "false")
            .set_option("time_limit", time_limit.as_secs_f64());
        for c in constraints {
            problem.add_constraint(c);
        }

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = x.iter().map(|v| solution.value(*v)).collect();
                let status = if start_time.elapsed() >= time_limit {
                    SolveStatus::FeasibleTimeout
                } else {
                    SolveStatus::Optimal
                };
                debug!(
                    "Solve finished in {:.2?} with status {:?}.",
                    start_time.elapsed(),
                    status
                );
                Ok(OracleOutcome {
                    variables: SolvedVariables::new(residents, rooms, values),
                    status,
                })
            }
            Err(ResolutionError::Infeasible) => Err(SolveError::Infeasible),
            Err(_) if start_time.elapsed() >= time_limit => Err(SolveError::TimeoutNoSolution),
            Err(e) => Err(SolveError::Backend(e.to_string())),
        }
    }
}
