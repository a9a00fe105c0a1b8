//! Integer-program construction for pairwise room assignment.

use crate::data::{ResidentIdx, RoomIdx};
use crate::error::{SolveError, SolveResult};
use good_lp::{Constraint, Expression, ProblemVariables, Variable, constraint, variable};
use log::{info, warn};

/// The assembled integer program, ready to hand to a `MilpOracle`.
///
/// One binary variable exists for every ordered resident pair and room:
/// x[a][b][r] means residents a and b bunk together in room r. The
/// mirrored x[b][a][r] is a distinct variable tied back by an explicit
/// equality constraint, so the capacity sum over ordered pairs counts
/// each realized pairing twice and a room hosts floor(capacity / 2)
/// pairs.
pub struct PairingModel {
    pub(crate) residents: usize,
    pub(crate) rooms: usize,
    pub(crate) variables: ProblemVariables,
    pub(crate) x: Vec<Variable>,
    pub(crate) objective: Expression,
    pub(crate) constraints: Vec<Constraint>,
}

impl PairingModel {
    pub fn residents(&self) -> usize {
        self.residents
    }

    pub fn rooms(&self) -> usize {
        self.rooms
    }

    pub fn num_variables(&self) -> usize {
        self.x.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }
}

/// Builds the full integer program over the given incompatibility matrix.
///
/// Emits the assignment, capacity, symmetry, gender-segregation and
/// self-exclusion constraints together with the minimization objective.
/// Models whose n²·m variable count exceeds `max_decision_vars` are
/// rejected up front: solve time past that point is not boundable.
pub fn build_model(
    compatibilities: &[Vec<f64>],
    genders: &[String],
    room_capacities: &[u32],
    max_decision_vars: usize,
) -> SolveResult<PairingModel> {
    let num_residents = genders.len();
    let num_rooms = room_capacities.len();
    debug_assert_eq!(compatibilities.len(), num_residents);

    let var_count = num_residents * num_residents * num_rooms;
    if var_count > max_decision_vars {
        return Err(SolveError::ModelTooLarge {
            variables: var_count,
            ceiling: max_decision_vars,
        });
    }
    if var_count > max_decision_vars / 2 {
        warn!(
            "{} decision variables is past half the ceiling of {}; expect a slow solve.",
            var_count, max_decision_vars
        );
    }

    info!(
        "Setting up ILP model with {} residents and {} rooms ({} binary variables)...",
        num_residents, num_rooms, var_count
    );
    let mut variables = ProblemVariables::new();

    // x_abr =  1 if residents a and b share room r
    //          0 otherwise
    let x = variables.add_vector(variable().binary(), var_count);
    let at =
        |a: ResidentIdx, b: ResidentIdx, r: RoomIdx| x[(a * num_residents + b) * num_rooms + r];

    // minimize summed incompatibility over the upper triangle; the
    // symmetry constraints keep the mirrored variables in lockstep
    let mut objective = Expression::from(0.0);
    for r in 0..num_rooms {
        for a in 0..num_residents {
            for b in (a + 1)..num_residents {
                objective += at(a, b, r) * compatibilities[a][b];
            }
        }
    }

    let mut constraints = Vec::new();

    // every resident bunks with exactly one roommate in exactly one room
    for a in 0..num_residents {
        let paired: Expression = (0..num_residents)
            .flat_map(|b| (0..num_rooms).map(move |r| at(a, b, r)))
            .sum();
        constraints.push(constraint!(paired == 1));
    }

    // room occupancy, summed over ordered pairs, stays within capacity
    for r in 0..num_rooms {
        let occupancy: Expression = (0..num_residents)
            .flat_map(|a| (0..num_residents).map(move |b| at(a, b, r)))
            .sum();
        let capacity = room_capacities[r] as f64;
        constraints.push(constraint!(occupancy <= capacity));
    }

    // bunking is mutual
    for r in 0..num_rooms {
        for a in 0..num_residents {
            for b in (a + 1)..num_residents {
                let (forward, mirrored) = (at(a, b, r), at(b, a, r));
                constraints.push(constraint!(forward == mirrored));
            }
        }
    }

    // rooms are gender-segregated
    for r in 0..num_rooms {
        for a in 0..num_residents {
            for b in (a + 1)..num_residents {
                if genders[a] != genders[b] {
                    let (forward, mirrored) = (at(a, b, r), at(b, a, r));
                    constraints.push(constraint!(forward == 0));
                    constraints.push(constraint!(mirrored == 0));
                }
            }
        }
    }

    // nobody bunks with themselves
    for a in 0..num_residents {
        for r in 0..num_rooms {
            let own = at(a, a, r);
            constraints.push(constraint!(own == 0));
        }
    }

    info!("Model ready with {} constraints.", constraints.len());
    Ok(PairingModel {
        residents: num_residents,
        rooms: num_rooms,
        variables,
        x,
        objective,
        constraints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::compatibility_matrix;

    fn genders(list: &[&str]) -> Vec<String> {
        list.iter().map(|g| g.to_string()).collect()
    }

    #[test]
    fn declares_one_variable_per_ordered_pair_and_room() {
        let compat = compatibility_matrix(&[vec![1.0], vec![2.0], vec![3.0]], &[1.0]);
        let model = build_model(&compat, &genders(&["F", "F", "F"]), &[2, 2], usize::MAX).unwrap();

        assert_eq!(model.num_variables(), 3 * 3 * 2);
        assert_eq!(model.residents(), 3);
        assert_eq!(model.rooms(), 2);
    }

    #[test]
    fn constraint_count_matches_the_model_shape() {
        let compat = compatibility_matrix(&[vec![1.0], vec![2.0]], &[1.0]);
        let model = build_model(&compat, &genders(&["F", "F"]), &[2], usize::MAX).unwrap();

        // 2 assignment + 1 capacity + 1 symmetry + 0 gender + 2 self-exclusion
        assert_eq!(model.num_constraints(), 6);
    }

    #[test]
    fn cross_gender_pairs_add_two_zero_fixes() {
        let compat = compatibility_matrix(&[vec![1.0], vec![2.0]], &[1.0]);
        let model = build_model(&compat, &genders(&["F", "M"]), &[2], usize::MAX).unwrap();

        // the two gender constraints on top of the same-gender baseline
        assert_eq!(model.num_constraints(), 8);
    }

    #[test]
    fn oversized_models_are_rejected() {
        let compat = compatibility_matrix(&[vec![1.0], vec![2.0], vec![3.0]], &[1.0]);
        let err = build_model(&compat, &genders(&["F", "F", "F"]), &[2, 2], 17).unwrap_err();

        match err {
            SolveError::ModelTooLarge { variables, ceiling } => {
                assert_eq!(variables, 18);
                assert_eq!(ceiling, 17);
            }
            other => panic!("expected ModelTooLarge, got {other:?}"),
        }
    }
}
