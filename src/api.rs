//! REST API: tournament hosting, enrollment, start, and match results.

use crate::error::TournamentError;
use crate::logic::Advancement;
use crate::models::{EnrollmentForm, MatchId, NewTournament, ParticipantRef, TournamentId, UserId};
use crate::store::{TournamentRecord, TournamentStore};
use actix_web::{
    delete, get,
    http::StatusCode,
    post, put,
    web::{self, Data, Json, Path, Query},
    HttpResponse, ResponseError,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Shared state: the tournament store.
pub type AppState = Data<TournamentStore>;

impl ResponseError for TournamentError {
    fn status_code(&self) -> StatusCode {
        match self {
            TournamentError::TournamentNotFound(_) | TournamentError::MatchNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            TournamentError::NotHost => StatusCode::FORBIDDEN,
            TournamentError::AlreadyAdvanced(_) => StatusCode::CONFLICT,
            TournamentError::InvariantViolation(_) | TournamentError::StoreUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            TournamentError::InvariantViolation(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Caller identity for host-only commands.
#[derive(Deserialize)]
struct HostBody {
    host: UserId,
}

#[derive(Deserialize)]
struct ResultBody {
    winner: ParticipantRef,
}

#[derive(Serialize)]
struct ResultResponse {
    /// Set when the winner moved into another match.
    next_match: Option<MatchId>,
    /// Set when the final was decided.
    champion: Option<ParticipantRef>,
    #[serde(flatten)]
    record: TournamentRecord,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id.
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: MatchId,
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "playcore-tournaments",
    })
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.list()?))
}

/// Host a tournament (registration opens immediately).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    body: Json<NewTournament>,
) -> Result<HttpResponse, TournamentError> {
    let tournament = state.create(body.into_inner(), Utc::now())?;
    Ok(HttpResponse::Created().json(tournament))
}

/// Tournament plus its bracket.
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(
    state: AppState,
    path: Path<TournamentPath>,
) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.get(path.id)?))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    query: Query<HostBody>,
) -> Result<HttpResponse, TournamentError> {
    state.delete(path.id, query.host)?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/tournaments/{id}/enroll")]
async fn api_enroll(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<EnrollmentForm>,
) -> Result<HttpResponse, TournamentError> {
    let tournament = state.enroll(path.id, body.into_inner(), Utc::now())?;
    Ok(HttpResponse::Ok().json(tournament))
}

/// Close registration and generate the bracket (host only).
#[put("/api/tournaments/{id}/start")]
async fn api_start_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<HostBody>,
) -> Result<HttpResponse, TournamentError> {
    let record = state.start(path.id, body.host, &mut rand::thread_rng())?;
    Ok(HttpResponse::Ok().json(record))
}

#[post("/api/tournaments/{id}/cancel")]
async fn api_cancel_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<HostBody>,
) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.cancel(path.id, body.host)?))
}

#[post("/api/tournaments/{id}/matches/{match_id}/begin")]
async fn api_begin_match(
    state: AppState,
    path: Path<TournamentMatchPath>,
) -> Result<HttpResponse, TournamentError> {
    Ok(HttpResponse::Ok().json(state.begin_match(path.id, path.match_id)?))
}

/// Record the winner of a match and advance them.
#[post("/api/tournaments/{id}/matches/{match_id}/result")]
async fn api_report_result(
    state: AppState,
    path: Path<TournamentMatchPath>,
    body: Json<ResultBody>,
) -> Result<HttpResponse, TournamentError> {
    let (advancement, record) = state.report_result(path.id, path.match_id, body.winner)?;
    let (next_match, champion) = match advancement {
        Advancement::Advanced { next_match, .. } => (Some(next_match), None),
        Advancement::Champion(winner) => (None, Some(winner)),
    };
    Ok(HttpResponse::Ok().json(ResultResponse {
        next_match,
        champion,
        record,
    }))
}

/// Register every route on an `App`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_health)
        .service(api_list_tournaments)
        .service(api_create_tournament)
        .service(api_get_tournament)
        .service(api_delete_tournament)
        .service(api_enroll)
        .service(api_start_tournament)
        .service(api_cancel_tournament)
        .service(api_begin_match)
        .service(api_report_result);
}
