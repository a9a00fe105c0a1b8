//! The assignment pipeline: validate, score, model, solve, decode.

use crate::data::{PairingInput, PairingOutput};
use crate::error::{SolveError, SolveResult};
use crate::extract::extract_pairings;
use crate::model::build_model;
use crate::oracle::{HighsOracle, MilpOracle};
use crate::score::compatibility_matrix;
use itertools::Itertools;
use log::info;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Solves the pairing problem with the default HiGHS-backed oracle.
pub fn solve(input: &PairingInput) -> SolveResult<PairingOutput> {
    solve_with(&HighsOracle, input)
}

/// Runs the full pipeline against any `MilpOracle` implementation.
pub fn solve_with(oracle: &dyn MilpOracle, input: &PairingInput) -> SolveResult<PairingOutput> {
    validate(input)?;
    let start_time = Instant::now();

    let compatibilities = compatibility_matrix(&input.preferences, &input.category_weights);
    let model = build_model(
        &compatibilities,
        &input.genders,
        &input.room_capacities,
        input.max_decision_vars,
    )?;
    let outcome = oracle.solve(model, Duration::from_secs(input.time_limit_seconds))?;
    let pairings = extract_pairings(&outcome.variables, &input.names)?;

    // the solver's objective excludes the sentinel diagonal, so summing
    // the matrix over the decoded pairs reproduces it exactly
    let index: HashMap<&str, usize> = input
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();
    let objective: f64 = pairings
        .iter()
        .map(|p| compatibilities[index[p.roommate_a.as_str()]][index[p.roommate_b.as_str()]])
        .sum();

    info!(
        "Paired {} residents into {} rooms (objective {:.3}) in {:.2?}.",
        input.names.len(),
        input.room_capacities.len(),
        objective,
        start_time.elapsed()
    );
    Ok(PairingOutput {
        pairings,
        objective,
        status: outcome.status,
    })
}

/// Fails fast on malformed input; nothing is partially built past here.
fn validate(input: &PairingInput) -> SolveResult<()> {
    let num_residents = input.names.len();
    if input.genders.len() != num_residents || input.preferences.len() != num_residents {
        return Err(SolveError::InvalidInput(format!(
            "{} names, {} genders and {} preference rows must all agree",
            num_residents,
            input.genders.len(),
            input.preferences.len()
        )));
    }
    for (i, name) in input.names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(SolveError::InvalidInput(format!(
                "resident {} has an empty name",
                i
            )));
        }
    }
    for (i, gender) in input.genders.iter().enumerate() {
        if gender.trim().is_empty() {
            return Err(SolveError::InvalidInput(format!(
                "resident '{}' has an empty gender",
                input.names[i]
            )));
        }
    }
    if let Some(name) = input.names.iter().duplicates().next() {
        return Err(SolveError::InvalidInput(format!(
            "duplicate resident name '{}'",
            name
        )));
    }
    for (i, row) in input.preferences.iter().enumerate() {
        if row.len() != input.category_weights.len() {
            return Err(SolveError::InvalidInput(format!(
                "resident '{}' has {} preference values, expected {}",
                input.names[i],
                row.len(),
                input.category_weights.len()
            )));
        }
    }
    if input.time_limit_seconds == 0 {
        return Err(SolveError::InvalidInput(
            "time limit must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SolveStatus;
    use crate::model::PairingModel;
    use crate::oracle::{OracleOutcome, SolvedVariables};

    fn input(names: &[&str], genders: &[&str]) -> PairingInput {
        PairingInput::new(
            names.iter().map(|n| n.to_string()).collect(),
            genders.iter().map(|g| g.to_string()).collect(),
            vec![vec![1.0]; names.len()],
            vec![1.0],
            vec![2],
        )
    }

    /// Oracle stub answering with a fixed tensor, for exercising the
    /// pipeline without a real solve.
    struct FixedOracle(Vec<f64>);

    impl MilpOracle for FixedOracle {
        fn solve(&self, model: PairingModel, _: Duration) -> SolveResult<OracleOutcome> {
            Ok(OracleOutcome {
                variables: SolvedVariables::new(model.residents(), model.rooms(), self.0.clone()),
                status: SolveStatus::Optimal,
            })
        }
    }

    #[test]
    fn mismatched_dimensions_fail_fast() {
        let mut bad = input(&["Ada", "Bea"], &["F", "F"]);
        bad.preferences[1] = vec![1.0, 2.0];
        assert!(matches!(
            solve_with(&FixedOracle(vec![]), &bad),
            Err(SolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn empty_names_and_genders_fail_fast() {
        let no_name = input(&["  ", "Bea"], &["F", "F"]);
        assert!(matches!(
            solve_with(&FixedOracle(vec![]), &no_name),
            Err(SolveError::InvalidInput(_))
        ));

        let no_gender = input(&["Ada", "Bea"], &["F", " "]);
        assert!(matches!(
            solve_with(&FixedOracle(vec![]), &no_gender),
            Err(SolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn duplicate_names_fail_fast() {
        let twins = input(&["Ada", "Ada"], &["F", "F"]);
        assert!(matches!(
            solve_with(&FixedOracle(vec![]), &twins),
            Err(SolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn zero_time_limit_fails_fast() {
        let mut hurried = input(&["Ada", "Bea"], &["F", "F"]);
        hurried.time_limit_seconds = 0;
        assert!(matches!(
            solve_with(&FixedOracle(vec![]), &hurried),
            Err(SolveError::InvalidInput(_))
        ));
    }

    #[test]
    fn contract_breaching_oracle_is_surfaced() {
        // an all-zero tensor leaves every resident unpaired
        let stub = FixedOracle(vec![0.0; 2 * 2 * 1]);
        assert!(matches!(
            solve_with(&stub, &input(&["Ada", "Bea"], &["F", "F"])),
            Err(SolveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn objective_is_recomputed_from_the_matrix() {
        // pair (0, 1) in the single room, both orientations set
        let mut values = vec![0.0; 2 * 2 * 1];
        values[1] = 1.0; // x[0][1][0]
        values[2] = 1.0; // x[1][0][0]
        let mut two = input(&["Ada", "Bea"], &["F", "F"]);
        two.preferences = vec![vec![1.0], vec![4.0]];

        let output = solve_with(&FixedOracle(values), &two).unwrap();
        assert_eq!(output.objective, 3.0);
        assert_eq!(output.status, SolveStatus::Optimal);
    }
}
