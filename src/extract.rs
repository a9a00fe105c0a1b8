//! Decoding solved variables into roommate pairings.

use crate::data::Pairing;
use crate::error::{SolveError, SolveResult};
use crate::oracle::SolvedVariables;
use itertools::Itertools;
use log::trace;

/// Threshold above which a solved binary is read as 1.
const ROUND_UP: f64 = 0.9;

/// Decodes the solved tensor into deduplicated pairings, scanning the
/// upper triangle in (a, b, room) order so the output is deterministic
/// for a given variable assignment.
///
/// A resident missing from the pairings, or present in more than one, is
/// a breach of the oracle/model contract and is reported as an invariant
/// failure rather than passed through.
pub fn extract_pairings(
    variables: &SolvedVariables,
    names: &[String],
) -> SolveResult<Vec<Pairing>> {
    let num_residents = variables.residents();
    let mut pairings = Vec::new();
    for a in 0..num_residents {
        for b in (a + 1)..num_residents {
            for r in 0..variables.rooms() {
                if variables.value(a, b, r) > ROUND_UP {
                    pairings.push(Pairing {
                        roommate_a: names[a].clone(),
                        roommate_b: names[b].clone(),
                        room: r,
                    });
                }
            }
        }
    }

    let mentions = pairings
        .iter()
        .flat_map(|p| [p.roommate_a.as_str(), p.roommate_b.as_str()])
        .counts();
    for name in names {
        match mentions.get(name.as_str()) {
            Some(&1) => {}
            Some(&k) => {
                return Err(SolveError::InvariantViolation(format!(
                    "resident '{}' appears in {} pairings",
                    name, k
                )));
            }
            None => {
                return Err(SolveError::InvariantViolation(format!(
                    "resident '{}' was left unpaired",
                    name
                )));
            }
        }
    }

    for pairing in &pairings {
        trace!("Decoded {}.", pairing);
    }
    Ok(pairings)
}
