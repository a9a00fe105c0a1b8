use crate::data::{
    DEFAULT_MAX_DECISION_VARS, DEFAULT_TIME_LIMIT_SECONDS, PairingInput, RoomId, SolveRequest,
    SolveStatus,
};
use crate::error::SolveError;
use crate::key;
use crate::solver;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PairingRow {
    roommate_a: String,
    roommate_b: String,
    room_id: RoomId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveResponse {
    pairings: Vec<PairingRow>,
    objective: f64,
    status: SolveStatus,
}

async fn solve_handler(
    Json(request): Json<SolveRequest>,
) -> Result<Json<SolveResponse>, (StatusCode, String)> {
    let survey = key::normalize(&request.residents, &request.key).map_err(error_response)?;
    let input = PairingInput {
        names: survey.names,
        genders: survey.genders,
        preferences: survey.preferences,
        category_weights: survey.category_weights,
        room_capacities: request.rooms.iter().map(|r| r.capacity).collect(),
        time_limit_seconds: request
            .time_limit_seconds
            .unwrap_or(DEFAULT_TIME_LIMIT_SECONDS),
        max_decision_vars: DEFAULT_MAX_DECISION_VARS,
    };
    let output = solver::solve(&input).map_err(error_response)?;

    // pairings carry room indexes; the wire reports the declared room ids
    let pairings = output
        .pairings
        .into_iter()
        .map(|p| PairingRow {
            roommate_a: p.roommate_a,
            roommate_b: p.roommate_b,
            room_id: request.rooms[p.room].id,
        })
        .collect();
    Ok(Json(SolveResponse {
        pairings,
        objective: output.objective,
        status: output.status,
    }))
}

fn error_response(err: SolveError) -> (StatusCode, String) {
    let code = match err {
        SolveError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        SolveError::ModelTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        SolveError::Infeasible => StatusCode::UNPROCESSABLE_ENTITY,
        SolveError::TimeoutNoSolution => StatusCode::REQUEST_TIMEOUT,
        SolveError::Backend(_) | SolveError::InvariantViolation(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (code, err.to_string())
}

pub async fn run_server() {
    let app = Router::new().route("/v1/roommates/solve", post(solve_handler));

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
