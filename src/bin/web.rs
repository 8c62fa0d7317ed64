//! Single binary web server: JSON API over the tournament bracket engine.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default; collections are kept as JSON files in DATA_DIR.
//! Override with env: HOST, PORT, DATA_DIR, ROSTER_CSV.

use actix_web::{
    delete, get,
    http::StatusCode,
    post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, ResponseError,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::sync::{Mutex, MutexGuard};
use wrestling_bracket::{
    import_roster_csv, Config, JsonDirStore, NewTournament, Promotion, PromotionError,
    TournamentError, TournamentId,
};

/// One promotion per process. The mutex makes every read-modify-write of the
/// stored collections exclusive.
type AppState = Data<Mutex<Promotion<JsonDirStore>>>;

#[derive(Debug)]
enum ApiError {
    Promotion(PromotionError),
    Lock,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Promotion(PromotionError::Storage(_)) => write!(f, "Storage error"),
            ApiError::Promotion(e) => write!(f, "{}", e),
            ApiError::Lock => write!(f, "lock error"),
        }
    }
}

impl From<PromotionError> for ApiError {
    fn from(e: PromotionError) -> Self {
        if let PromotionError::Storage(inner) = &e {
            log::error!("{}", inner);
        }
        ApiError::Promotion(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Promotion(PromotionError::TournamentNotFound(_))
            | ApiError::Promotion(PromotionError::Tournament(TournamentError::MatchNotFound(_))) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Promotion(PromotionError::Tournament(
                TournamentError::DownstreamMatchDecided { .. },
            )) => StatusCode::CONFLICT,
            ApiError::Promotion(PromotionError::Tournament(_)) => StatusCode::BAD_REQUEST,
            ApiError::Promotion(PromotionError::Storage(_)) | ApiError::Lock => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": self.to_string() }))
    }
}

fn lock(state: &AppState) -> Result<MutexGuard<'_, Promotion<JsonDirStore>>, ApiError> {
    state.lock().map_err(|_| ApiError::Lock)
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetWinnerBody {
    match_id: String,
    winner_id: String,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[get("/api/health")]
async fn api_health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "wrestling-bracket",
    })
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    Ok(HttpResponse::Ok().json(promotion.tournaments()?))
}

/// Create a tournament from a wrestler selection; round 1 is drawn at random.
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    body: Json<NewTournament>,
) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    let tournament = promotion.create_tournament(body.into_inner(), &mut rand::thread_rng())?;
    Ok(HttpResponse::Created().json(tournament))
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(
    state: AppState,
    path: Path<TournamentPath>,
) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    Ok(HttpResponse::Ok().json(promotion.tournament(path.id)?))
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(
    state: AppState,
    path: Path<TournamentPath>,
) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    promotion.delete_tournament(path.id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record a match winner. Responds with the updated tournament and any championship transfer.
#[put("/api/tournaments/{id}/winner")]
async fn api_set_winner(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<SetWinnerBody>,
) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    let result = promotion.record_winner(path.id, &body.match_id, &body.winner_id)?;
    Ok(HttpResponse::Ok().json(result))
}

#[get("/api/history")]
async fn api_history(state: AppState) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    Ok(HttpResponse::Ok().json(promotion.history()?))
}

#[get("/api/wrestlers")]
async fn api_wrestlers(state: AppState) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    Ok(HttpResponse::Ok().json(promotion.wrestlers()?))
}

#[get("/api/championships")]
async fn api_championships(state: AppState) -> Result<HttpResponse, ApiError> {
    let promotion = lock(&state)?;
    Ok(HttpResponse::Ok().json(promotion.championships()?))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env();
    let store = JsonDirStore::open(&config.data_dir).map_err(io::Error::other)?;
    log::info!("Using data directory {}", store.dir().display());
    let promotion = Promotion::new(store);

    if let Some(path) = &config.roster_csv {
        let wrestlers = import_roster_csv(File::open(path)?).map_err(io::Error::other)?;
        promotion
            .import_roster(wrestlers)
            .map_err(io::Error::other)?;
    }

    let bind = (config.host.clone(), config.port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(Mutex::new(promotion));
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_set_winner)
            .service(api_history)
            .service(api_wrestlers)
            .service(api_championships)
    })
    .bind(bind)?
    .run()
    .await
}
