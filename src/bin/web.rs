//! Single binary web server: tournament, team and match CRUD plus standings and bracket views via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, BRACKET_SIZE, RANKING_RULE.

use actix_web::{
    delete, get, http::StatusCode, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, NaiveTime};
use dodgeball_tournament_web::logic::{
    self, adjust_pins, adjust_score, complete_match, generate_round_robin, matches_by_date,
    reopen_match, reset_match, schedule_match, set_score, standings_csv, unschedule_match,
    unscheduled, upcoming_match, ScoringError,
};
use dodgeball_tournament_web::models::normalize_team_names;
use dodgeball_tournament_web::{
    compute_bracket_with, compute_standings_with, materialize_bracket_match,
    record_bracket_winner, Bracket, BracketError, BracketNode, GameMatch, MatchCommand,
    MatchUpdate, MemoryStore, NewMatch, NewTournament, RankingRule, Role, RosterError,
    SeededTeam, ServerConfig, Side, StoreError, Team, Tournament, TournamentError,
    TournamentStore,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shared state: the store and the configuration it was started with.
struct AppContext {
    store: MemoryStore,
    config: ServerConfig,
}

type AppState = Data<AppContext>;

/// Anything a handler can fail with, mapped to a status and `{ "error": ... }` body.
enum ApiError {
    Store(StoreError),
    Bracket(BracketError),
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}

impl From<BracketError> for ApiError {
    fn from(e: BracketError) -> Self {
        ApiError::Bracket(e)
    }
}

impl From<TournamentError> for ApiError {
    fn from(e: TournamentError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<RosterError> for ApiError {
    fn from(e: RosterError) -> Self {
        match e {
            RosterError::MemberNotFound(_) => ApiError::NotFound(e.to_string()),
            RosterError::EmptyName => ApiError::BadRequest(e.to_string()),
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

fn json_error(status: StatusCode, msg: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({ "error": msg }))
}

impl ApiError {
    fn into_response(self) -> HttpResponse {
        match self {
            ApiError::Store(e @ StoreError::NotFound { .. }) => {
                json_error(StatusCode::NOT_FOUND, &e.to_string())
            }
            ApiError::Store(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
            ApiError::Bracket(e @ BracketError::MatchNotCreated { .. }) => {
                json_error(StatusCode::CONFLICT, &e.to_string())
            }
            ApiError::Bracket(e @ BracketError::NodeNotFound { .. }) => {
                json_error(StatusCode::NOT_FOUND, &e.to_string())
            }
            ApiError::Bracket(e) => json_error(StatusCode::BAD_REQUEST, &e.to_string()),
            ApiError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, &msg),
            ApiError::BadRequest(msg) => json_error(StatusCode::BAD_REQUEST, &msg),
            ApiError::Internal(msg) => json_error(StatusCode::INTERNAL_SERVER_ERROR, &msg),
        }
    }
}

fn respond<T: Serialize>(result: Result<T, ApiError>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => e.into_response(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    name: String,
    #[serde(default)]
    rounds: u32,
    bracket_size: Option<usize>,
    #[serde(default)]
    team_names: Vec<String>,
}

#[derive(Serialize)]
struct TournamentDetail {
    tournament: Tournament,
    teams: Vec<Team>,
    matches: Vec<GameMatch>,
}

#[derive(Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Deserialize)]
struct AddMemberBody {
    name: String,
    #[serde(default)]
    role: Role,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScoreBody {
    Delta { side: Side, delta: i32 },
    Set { team_a: i64, team_b: i64 },
}

#[derive(Deserialize)]
struct PinsBody {
    side: Side,
    delta: i32,
}

#[derive(Deserialize)]
struct ScheduleBody {
    date: NaiveDate,
    time: Option<NaiveTime>,
}

#[derive(Deserialize)]
struct StandingsQuery {
    rule: Option<RankingRule>,
}

#[derive(Deserialize)]
struct BracketWinnerBody {
    round: usize,
    index: usize,
    team_id: String,
}

#[derive(Deserialize)]
struct BracketNodeBody {
    round: usize,
    index: usize,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: String,
}

#[derive(Deserialize)]
struct TeamPath {
    team_id: String,
}

#[derive(Deserialize)]
struct MemberPath {
    team_id: String,
    member_id: String,
}

#[derive(Deserialize)]
struct MatchPath {
    match_id: String,
}

#[derive(Serialize)]
struct BracketRoundView<'a> {
    name: String,
    nodes: &'a [BracketNode],
}

#[derive(Serialize)]
struct BracketView<'a> {
    size: usize,
    rounds: Vec<BracketRoundView<'a>>,
    champion: Option<&'a SeededTeam>,
    resolved: bool,
}

impl<'a> BracketView<'a> {
    fn new(bracket: &'a Bracket) -> Self {
        Self {
            size: bracket.size,
            rounds: bracket
                .rounds
                .iter()
                .enumerate()
                .map(|(i, nodes)| BracketRoundView {
                    name: bracket.round_name(i),
                    nodes,
                })
                .collect(),
            champion: bracket.champion(),
            resolved: bracket.is_resolved(),
        }
    }
}

#[derive(Serialize)]
struct CalendarView<'a> {
    days: BTreeMap<String, Vec<&'a GameMatch>>,
    unscheduled: Vec<&'a GameMatch>,
    upcoming: Option<&'a GameMatch>,
}

/// Tournament plus its teams and matches; 404 when the tournament is unknown.
fn load(
    store: &MemoryStore,
    id: &str,
) -> Result<(Tournament, Vec<Team>, Vec<GameMatch>), StoreError> {
    let tournament = store.get_tournament(id)?;
    let teams = store.fetch_teams(id)?;
    let matches = store.fetch_matches(id)?;
    Ok((tournament, teams, matches))
}

fn bracket_for(state: &AppContext, id: &str) -> Result<(Tournament, Bracket), ApiError> {
    let (tournament, teams, matches) = load(&state.store, id)?;
    let bracket = compute_bracket_with(
        &teams,
        &matches,
        tournament.bracket_size,
        state.config.ranking_rule,
    )?;
    Ok((tournament, bracket))
}

/// Apply an update to one match and return the stored result.
fn update_match_with<F>(state: &AppContext, match_id: &str, f: F) -> Result<GameMatch, ApiError>
where
    F: FnOnce(&GameMatch) -> Result<MatchUpdate, ApiError>,
{
    let current = state.store.get_match(match_id)?;
    let update = f(&current)?;
    Ok(MatchCommand::new(match_id, update).execute(&state.store)?)
}

fn edit_team<F>(state: &AppContext, team_id: &str, f: F) -> Result<Team, ApiError>
where
    F: FnOnce(&mut Team) -> Result<(), RosterError>,
{
    let mut team = state.store.get_team(team_id)?;
    f(&mut team)?;
    state.store.save_team(&team)?;
    Ok(team)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "dodgeball-tournament-web",
    })
}

#[get("/api/tournaments")]
async fn api_list_tournaments(state: AppState) -> HttpResponse {
    respond(state.store.list_tournaments().map_err(ApiError::from))
}

/// Create a tournament with its teams and the round-robin fixtures for `rounds` rounds.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<CreateTournamentBody>) -> HttpResponse {
    let body = body.into_inner();
    let result = (|| -> Result<TournamentDetail, ApiError> {
        let names = normalize_team_names(&body.team_names)?;
        let new = NewTournament {
            name: body.name,
            rounds: body.rounds,
            bracket_size: body.bracket_size.unwrap_or(state.config.bracket_size),
            created_on: None,
        }
        .validate()?;
        let tournament = state.store.create_tournament(new)?;
        let mut teams = Vec::with_capacity(names.len());
        for name in &names {
            teams.push(state.store.create_team(&tournament.id, name)?);
        }
        let mut matches = Vec::new();
        for new_match in generate_round_robin(&tournament.id, &teams, tournament.rounds) {
            matches.push(state.store.create_match(new_match)?);
        }
        Ok(TournamentDetail {
            tournament,
            teams,
            matches,
        })
    })();
    respond(result)
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(
        load(&state.store, &path.id)
            .map(|(tournament, teams, matches)| TournamentDetail {
                tournament,
                teams,
                matches,
            })
            .map_err(ApiError::from),
    )
}

#[delete("/api/tournaments/{id}")]
async fn api_delete_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match state.store.delete_tournament(&path.id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[get("/api/tournaments/{id}/teams")]
async fn api_list_teams(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = state
        .store
        .get_tournament(&path.id)
        .and_then(|_| state.store.fetch_teams(&path.id));
    respond(result.map_err(ApiError::from))
}

#[post("/api/tournaments/{id}/teams")]
async fn api_create_team(state: AppState, path: Path<TournamentPath>, body: Json<NameBody>) -> HttpResponse {
    let result = (|| -> Result<Team, ApiError> {
        let name = body.name.trim();
        if name.is_empty() {
            return Err(ApiError::BadRequest(RosterError::EmptyName.to_string()));
        }
        let existing = state.store.fetch_teams(&path.id)?;
        if existing.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeamName(name.to_string()).into());
        }
        Ok(state.store.create_team(&path.id, name)?)
    })();
    respond(result)
}

#[get("/api/teams/{team_id}")]
async fn api_get_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    respond(state.store.get_team(&path.team_id).map_err(ApiError::from))
}

/// Rename a team.
#[put("/api/teams/{team_id}")]
async fn api_rename_team(state: AppState, path: Path<TeamPath>, body: Json<NameBody>) -> HttpResponse {
    respond(edit_team(&state, &path.team_id, |t| t.rename(&body.name)))
}

/// Delete a team; its matches keep the dangling id.
#[delete("/api/teams/{team_id}")]
async fn api_delete_team(state: AppState, path: Path<TeamPath>) -> HttpResponse {
    match state.store.delete_team(&path.team_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

#[post("/api/teams/{team_id}/members")]
async fn api_add_member(state: AppState, path: Path<TeamPath>, body: Json<AddMemberBody>) -> HttpResponse {
    respond(edit_team(&state, &path.team_id, |t| {
        t.add_member(&body.name, body.role).map(|_| ())
    }))
}

#[delete("/api/teams/{team_id}/members/{member_id}")]
async fn api_remove_member(state: AppState, path: Path<MemberPath>) -> HttpResponse {
    respond(edit_team(&state, &path.team_id, |t| {
        t.remove_member(&path.member_id).map(|_| ())
    }))
}

/// Move a member between regulars and substitutes.
#[post("/api/teams/{team_id}/members/{member_id}/toggle")]
async fn api_toggle_member(state: AppState, path: Path<MemberPath>) -> HttpResponse {
    respond(edit_team(&state, &path.team_id, |t| {
        t.toggle_role(&path.member_id).map(|_| ())
    }))
}

#[get("/api/tournaments/{id}/matches")]
async fn api_list_matches(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = state
        .store
        .get_tournament(&path.id)
        .and_then(|_| state.store.fetch_matches(&path.id));
    respond(result.map_err(ApiError::from))
}

/// Create a match by hand; the tournament id comes from the path.
#[post("/api/tournaments/{id}/matches")]
async fn api_create_match(state: AppState, path: Path<TournamentPath>, body: Json<NewMatch>) -> HttpResponse {
    let mut new = body.into_inner();
    new.tournament_id = path.id.clone();
    respond(state.store.create_match(new).map_err(ApiError::from))
}

#[get("/api/matches/{match_id}")]
async fn api_get_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(state.store.get_match(&path.match_id).map_err(ApiError::from))
}

/// Live scoring: `{side, delta}` nudges one side, `{team_a, team_b}` sets both.
#[post("/api/matches/{match_id}/score")]
async fn api_score(state: AppState, path: Path<MatchPath>, body: Json<ScoreBody>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |m| {
        Ok(match *body {
            ScoreBody::Delta { side, delta } => adjust_score(m, side, delta),
            ScoreBody::Set { team_a, team_b } => set_score(m, team_a, team_b),
        })
    }))
}

#[post("/api/matches/{match_id}/pins")]
async fn api_pins(state: AppState, path: Path<MatchPath>, body: Json<PinsBody>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |m| {
        Ok(adjust_pins(m, body.side, body.delta))
    }))
}

#[post("/api/matches/{match_id}/complete")]
async fn api_complete_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |m| {
        Ok(complete_match(m)?)
    }))
}

#[post("/api/matches/{match_id}/reopen")]
async fn api_reopen_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |_| Ok(reopen_match())))
}

#[post("/api/matches/{match_id}/reset")]
async fn api_reset_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |_| Ok(reset_match())))
}

/// Calendar drop: move a match to a date (and optional time).
#[put("/api/matches/{match_id}/schedule")]
async fn api_schedule_match(state: AppState, path: Path<MatchPath>, body: Json<ScheduleBody>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |_| {
        Ok(schedule_match(body.date, body.time))
    }))
}

#[delete("/api/matches/{match_id}/schedule")]
async fn api_unschedule_match(state: AppState, path: Path<MatchPath>) -> HttpResponse {
    respond(update_match_with(&state, &path.match_id, |_| Ok(unschedule_match())))
}

#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<TournamentPath>, query: Query<StandingsQuery>) -> HttpResponse {
    let rule = query.rule.unwrap_or(state.config.ranking_rule);
    respond(
        load(&state.store, &path.id)
            .map(|(_, teams, matches)| compute_standings_with(&teams, &matches, rule))
            .map_err(ApiError::from),
    )
}

#[get("/api/tournaments/{id}/standings.csv")]
async fn api_standings_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let result = load(&state.store, &path.id)
        .map_err(ApiError::from)
        .and_then(|(_, teams, matches)| {
            let records = compute_standings_with(&teams, &matches, state.config.ranking_rule);
            standings_csv(&records).map_err(|e| ApiError::Internal(e.to_string()))
        });
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .body(body),
        Err(e) => e.into_response(),
    }
}

#[get("/api/tournaments/{id}/bracket")]
async fn api_bracket(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    match bracket_for(&state, &path.id) {
        Ok((_, bracket)) => HttpResponse::Ok().json(BracketView::new(&bracket)),
        Err(e) => e.into_response(),
    }
}

/// Record the winner of a live bracket node, then return the recomputed bracket.
#[post("/api/tournaments/{id}/bracket/winner")]
async fn api_bracket_winner(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<BracketWinnerBody>,
) -> HttpResponse {
    let recorded = bracket_for(&state, &path.id).and_then(|(_, bracket)| {
        let node = bracket.try_node(body.round, body.index)?;
        let command = record_bracket_winner(node, &body.team_id)?;
        command.execute(&state.store)?;
        Ok(())
    });
    match recorded.and_then(|()| bracket_for(&state, &path.id)) {
        Ok((_, bracket)) => HttpResponse::Ok().json(BracketView::new(&bracket)),
        Err(e) => e.into_response(),
    }
}

/// Create the match record behind a live bracket node.
#[post("/api/tournaments/{id}/bracket/matches")]
async fn api_bracket_create_match(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<BracketNodeBody>,
) -> HttpResponse {
    let result = bracket_for(&state, &path.id).and_then(|(tournament, bracket)| {
        let node = bracket.try_node(body.round, body.index)?;
        let new = materialize_bracket_match(&tournament.id, node)?;
        Ok(state.store.create_match(new)?)
    });
    respond(result)
}

#[get("/api/tournaments/{id}/calendar")]
async fn api_calendar(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    let matches = match state
        .store
        .get_tournament(&path.id)
        .and_then(|_| state.store.fetch_matches(&path.id))
    {
        Ok(m) => m,
        Err(e) => return ApiError::from(e).into_response(),
    };
    let view = CalendarView {
        days: matches_by_date(&matches)
            .into_iter()
            .map(|(date, day)| (date.to_string(), day))
            .collect(),
        unscheduled: unscheduled(&matches),
        upcoming: upcoming_match(&matches),
    };
    HttpResponse::Ok().json(view)
}

/// Data-integrity warnings for the tournament's stored teams and matches.
#[get("/api/tournaments/{id}/audit")]
async fn api_audit(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    respond(
        load(&state.store, &path.id)
            .map(|(_, teams, matches)| {
                logic::audit(&teams, &matches)
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
            })
            .map_err(ApiError::from),
    )
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };
    let bind = (config.host.clone(), config.port);
    log::info!(
        "Starting server at http://{}:{} (bracket size {}, ranking {:?})",
        bind.0,
        bind.1,
        config.bracket_size,
        config.ranking_rule
    );

    let state = Data::new(AppContext {
        store: MemoryStore::new(),
        config,
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_list_tournaments)
            .service(api_create_tournament)
            .service(api_standings_csv)
            .service(api_standings)
            .service(api_bracket)
            .service(api_bracket_winner)
            .service(api_bracket_create_match)
            .service(api_calendar)
            .service(api_audit)
            .service(api_list_teams)
            .service(api_create_team)
            .service(api_list_matches)
            .service(api_create_match)
            .service(api_get_tournament)
            .service(api_delete_tournament)
            .service(api_get_team)
            .service(api_rename_team)
            .service(api_delete_team)
            .service(api_add_member)
            .service(api_remove_member)
            .service(api_toggle_member)
            .service(api_get_match)
            .service(api_score)
            .service(api_pins)
            .service(api_complete_match)
            .service(api_reopen_match)
            .service(api_reset_match)
            .service(api_schedule_match)
            .service(api_unschedule_match)
    })
    .bind(bind)?
    .run()
    .await
}
