use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// Type aliases for clarity
pub type RoomId = u32;
pub type RoomIdx = usize;
pub type ResidentIdx = usize;

/// Default wall-clock budget handed to the MILP backend, in seconds.
pub const DEFAULT_TIME_LIMIT_SECONDS: u64 = 180;

/// Default ceiling on the number of binary decision variables (n²·m).
/// Solve time grows steeply with the variable count, so oversized models
/// are rejected before any solve is attempted.
pub const DEFAULT_MAX_DECISION_VARS: usize = 250_000;

/// Represents a physical room with a given capacity.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub capacity: u32,
}

/// A raw survey answer: either an ordinal code or the free-text label for one.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Code(f64),
    Label(String),
}

/// A resident as submitted, answers keyed by category name.
/// A missing or null answer is imputed to the category's middle rank.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resident {
    pub name: String,
    pub gender: String,
    #[serde(default)]
    pub answers: BTreeMap<String, Option<Answer>>,
}

/// One scored category of the weighting key. `scale` maps ordinal codes
/// to the answer labels they stand for.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub category: String,
    pub weighting: f64,
    #[serde(default)]
    pub scale: BTreeMap<u8, String>,
}

/// The complete input for the pairing problem.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    pub residents: Vec<Resident>,
    pub key: Vec<Category>,
    pub rooms: Vec<Room>,
    pub time_limit_seconds: Option<u64>,
}

/// Normalized, purely numeric input to the optimization core.
#[derive(Debug, Clone)]
pub struct PairingInput {
    pub names: Vec<String>,
    pub genders: Vec<String>,
    /// n×k ordinal codes, one row per resident.
    pub preferences: Vec<Vec<f64>>,
    /// Length-k weights aligned with the preference columns.
    pub category_weights: Vec<f64>,
    pub room_capacities: Vec<u32>,
    pub time_limit_seconds: u64,
    pub max_decision_vars: usize,
}

impl PairingInput {
    pub fn new(
        names: Vec<String>,
        genders: Vec<String>,
        preferences: Vec<Vec<f64>>,
        category_weights: Vec<f64>,
        room_capacities: Vec<u32>,
    ) -> Self {
        Self {
            names,
            genders,
            preferences,
            category_weights,
            room_capacities,
            time_limit_seconds: DEFAULT_TIME_LIMIT_SECONDS,
            max_decision_vars: DEFAULT_MAX_DECISION_VARS,
        }
    }
}

/// A single bunking decision: two residents sharing a room.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct Pairing {
    pub roommate_a: String,
    pub roommate_b: String,
    pub room: RoomIdx,
}

impl fmt::Display for Pairing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} + {} in room {}",
            self.roommate_a, self.roommate_b, self.room
        )
    }
}

/// How the backend finished: proven optimal, or best feasible point found
/// before the wall clock ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolveStatus {
    Optimal,
    FeasibleTimeout,
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingOutput {
    pub pairings: Vec<Pairing>,
    pub objective: f64,
    pub status: SolveStatus,
}
