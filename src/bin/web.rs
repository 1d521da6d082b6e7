//! Single binary web server: JSON API over the tournament core.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use fencing_tournament::{
    final_ranking, finish_pools, parse_roster_csv, pool_presentation_order, record_bracket_result,
    record_pool_result, reorder_pending, start_pool_match, start_tournament, Competitor,
    CompetitorId, MatchId, NodeId, PoolResult, Tournament, TournamentConfig, TournamentError,
    TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-tournament entry: tournament snapshot + last activity time (for auto-cleanup).
struct TournamentEntry {
    tournament: Tournament,
    last_activity: Instant,
}

/// In-memory state: many tournaments by ID. Entries are removed after 12h inactivity.
type AppState = Data<RwLock<HashMap<TournamentId, TournamentEntry>>>;

/// Inactivity threshold: tournaments not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct AddCompetitorBody {
    name: String,
    #[serde(default)]
    club: Option<String>,
    #[serde(default)]
    league: Option<String>,
    #[serde(default)]
    nation: Option<String>,
    #[serde(default)]
    seed: Option<u32>,
}

#[derive(Deserialize)]
struct BracketResultBody {
    touches_a: u32,
    touches_b: u32,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

#[derive(Deserialize)]
struct CompetitorPath {
    id: TournamentId,
    competitor_id: CompetitorId,
}

#[derive(Deserialize)]
struct PoolPath {
    id: TournamentId,
    pool: usize,
}

#[derive(Deserialize)]
struct PoolMatchPath {
    id: TournamentId,
    pool: usize,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct NodePath {
    id: TournamentId,
    node: NodeId,
}

fn error_response(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Look up a tournament, refresh its activity time and run `action` on it.
/// `action` answers with the response to send, or an error that becomes a 400.
fn with_tournament<F>(state: &AppState, id: TournamentId, action: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<HttpResponse, TournamentError>,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.get_mut(&id) {
        Some(e) => e,
        None => return HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    };
    entry.last_activity = Instant::now();
    action(&mut entry.tournament).unwrap_or_else(error_response)
}

/// Run a state-changing command and answer with the updated tournament.
fn update_tournament<F>(state: &AppState, id: TournamentId, command: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> Result<(), TournamentError>,
{
    with_tournament(state, id, |t| {
        command(t)?;
        Ok(HttpResponse::Ok().json(&*t))
    })
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "fencing-tournament",
    })
}

/// Create a new tournament (returns it with id; client stores id for subsequent requests).
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Option<Json<TournamentConfig>>) -> HttpResponse {
    let config = body.map(Json::into_inner).unwrap_or_default();
    let tournament = Tournament::new(config);
    let id = tournament.id;
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        TournamentEntry {
            tournament,
            last_activity: Instant::now(),
        },
    );
    log::info!("Created tournament {}", id);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(&*t)))
}

/// Replace the settings (Setup only).
#[put("/api/tournaments/{id}/config")]
async fn api_set_config(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<TournamentConfig>,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.set_config(body.into_inner()))
}

#[post("/api/tournaments/{id}/competitors")]
async fn api_add_competitor(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<AddCompetitorBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let competitor = Competitor {
        club: body.club,
        league: body.league,
        nation: body.nation,
        seed: body.seed,
        ..Competitor::new(body.name)
    };
    update_tournament(&state, path.id, |t| t.add_competitor(competitor))
}

/// Import competitors from a CSV body (`name,club,league,nation,seed`).
#[post("/api/tournaments/{id}/competitors/import")]
async fn api_import_roster(state: AppState, path: Path<TournamentPath>, body: String) -> HttpResponse {
    let competitors = match parse_roster_csv(body.as_bytes()) {
        Ok(c) => c,
        Err(e) => return error_response(e),
    };
    update_tournament(&state, path.id, |t| {
        competitors
            .into_iter()
            .try_for_each(|c| t.add_competitor(c))
    })
}

#[delete("/api/tournaments/{id}/competitors/{competitor_id}")]
async fn api_remove_competitor(state: AppState, path: Path<CompetitorPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.remove_competitor(path.competitor_id))
}

#[post("/api/tournaments/{id}/competitors/{competitor_id}/withdraw")]
async fn api_withdraw_competitor(state: AppState, path: Path<CompetitorPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.withdraw_competitor(path.competitor_id))
}

#[post("/api/tournaments/{id}/competitors/{competitor_id}/forfeit")]
async fn api_forfeit_competitor(state: AppState, path: Path<CompetitorPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| t.forfeit_competitor(path.competitor_id))
}

/// Draw the pools (Setup -> Pools).
#[post("/api/tournaments/{id}/start")]
async fn api_start_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, start_tournament)
}

#[post("/api/tournaments/{id}/pools/{pool}/matches/{match_id}/start")]
async fn api_start_pool_match(state: AppState, path: Path<PoolMatchPath>) -> HttpResponse {
    update_tournament(&state, path.id, |t| start_pool_match(t, path.pool, path.match_id))
}

/// Score entry for one pool bout; the pool ranking is recomputed.
#[put("/api/tournaments/{id}/pools/{pool}/matches/{match_id}")]
async fn api_record_pool_result(
    state: AppState,
    path: Path<PoolMatchPath>,
    body: Json<PoolResult>,
) -> HttpResponse {
    let result = body.into_inner();
    update_tournament(&state, path.id, |t| {
        record_pool_result(t, path.pool, path.match_id, result)
    })
}

/// Pending bouts of a pool in the order they should be called.
#[get("/api/tournaments/{id}/pools/{pool}/order")]
async fn api_pool_order(state: AppState, path: Path<PoolPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let order = pool_presentation_order(t, path.pool)?;
        let matches = reorder_pending(t.pool(path.pool)?);
        Ok(HttpResponse::Ok().json(serde_json::json!({
            "indices": order.indices,
            "back_to_back": order.back_to_back,
            "matches": matches,
        })))
    })
}

/// Close the pools and build the bracket (Pools -> Elimination).
#[post("/api/tournaments/{id}/pools/finish")]
async fn api_finish_pools(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, finish_pools)
}

#[put("/api/tournaments/{id}/bracket/{node}")]
async fn api_record_bracket_result(
    state: AppState,
    path: Path<NodePath>,
    body: Json<BracketResultBody>,
) -> HttpResponse {
    update_tournament(&state, path.id, |t| {
        record_bracket_result(t, path.node, body.touches_a, body.touches_b)
    })
}

#[get("/api/tournaments/{id}/ranking")]
async fn api_final_ranking(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| Ok(HttpResponse::Ok().json(final_ranking(t)?)))
}

/// Restart tournament: back to Setup with the same roster and settings.
#[post("/api/tournaments/{id}/restart")]
async fn api_restart_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    update_tournament(&state, path.id, Tournament::restart_tournament)
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(HashMap::<TournamentId, TournamentEntry>::new()));

    // Background task: every 30 minutes, remove tournaments inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive tournament(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_set_config)
            .service(api_add_competitor)
            .service(api_import_roster)
            .service(api_remove_competitor)
            .service(api_withdraw_competitor)
            .service(api_forfeit_competitor)
            .service(api_start_tournament)
            .service(api_start_pool_match)
            .service(api_record_pool_result)
            .service(api_pool_order)
            .service(api_finish_pools)
            .service(api_record_bracket_result)
            .service(api_final_ranking)
            .service(api_restart_tournament)
    })
    .bind(bind)?
    .run()
    .await
}
