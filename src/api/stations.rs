//! Printer station API handlers.

use actix_web::{web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::auth::UserAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    HeartbeatRequest, HeartbeatResponse, ListStationsQuery, MessageResponse, ReconnectRequest,
    ReconnectResponse, RegisterStationRequest, RegisterStationResponse, StationListResponse,
    StationResponse, StationStatusResponse, WsEvent, WsEventMessage,
};
use crate::services::{station_registry, EventBroadcaster};

/// Maximum user agent length persisted with a session.
const MAX_USER_AGENT_LEN: usize = 500;

fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info()
        .realip_remote_addr()
        .map(str::to_string)
}

fn client_user_agent(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.chars().take(MAX_USER_AGENT_LEN).collect())
}

/// Register a station, or reactivate an existing one with the same name.
///
/// Returns 201 for a new station and 200 when an existing (user, name)
/// station was reactivated in place. Both responses carry the long-lived
/// station_token and a freshly rotated session_token.
#[utoipa::path(
    post,
    path = "/stations/register",
    tag = "Stations",
    request_body = RegisterStationRequest,
    responses(
        (status = 201, description = "Station registered", body = RegisterStationResponse),
        (status = 200, description = "Station reactivated", body = RegisterStationResponse),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn register_station(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    body: web::Json<RegisterStationRequest>,
    req: HttpRequest,
) -> AppResult<HttpResponse> {
    let outcome = station_registry::register(
        &pool,
        &auth.user,
        body.into_inner(),
        client_ip(&req),
        client_user_agent(&req),
    )
    .await?;

    broadcaster.send(WsEventMessage::new(WsEvent::station_updated(
        auth.user.id,
        outcome.station.id,
        &outcome.station.status,
    )));

    let mut builder = if outcome.reactivated {
        HttpResponse::Ok()
    } else {
        HttpResponse::Created()
    };
    let message = if outcome.reactivated {
        "Station reactivated successfully"
    } else {
        "Station registered successfully"
    };

    Ok(builder.json(RegisterStationResponse {
        message: message.to_string(),
        station: StationResponse::from(outcome.station),
        session_token: outcome.session_token,
        station_token: outcome.station_token,
    }))
}

/// List the caller's active stations.
///
/// Stations whose last heartbeat is older than the staleness threshold are
/// flipped to offline (and the flip persisted) before the list is returned.
#[utoipa::path(
    get,
    path = "/stations",
    tag = "Stations",
    params(
        ("status" = Option<String>, Query, description = "Filter by status (online/offline/busy)")
    ),
    responses(
        (status = 200, description = "Station list", body = StationListResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn list_stations(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    query: web::Query<ListStationsQuery>,
) -> AppResult<HttpResponse> {
    let stations = station_registry::list(&pool, &auth.user, query.status).await?;

    Ok(HttpResponse::Ok().json(StationListResponse {
        stations: stations.into_iter().map(StationResponse::from).collect(),
    }))
}

/// Process a station heartbeat.
///
/// Requires the active session token; a token rotated out by a later
/// registration or reconnect is rejected with 401.
#[utoipa::path(
    put,
    path = "/stations/{station_id}/heartbeat",
    tag = "Stations",
    params(("station_id" = Uuid, Path, description = "Station UUID")),
    request_body = HeartbeatRequest,
    responses(
        (status = 200, description = "Heartbeat accepted", body = HeartbeatResponse),
        (status = 401, description = "Invalid session", body = crate::error::ErrorResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn station_heartbeat(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<HeartbeatRequest>,
) -> AppResult<HttpResponse> {
    let station =
        station_registry::heartbeat(&pool, &auth.user, path.into_inner(), &body).await?;

    Ok(HttpResponse::Ok().json(HeartbeatResponse {
        message: "Heartbeat received".to_string(),
        station: StationResponse::from(station),
    }))
}

/// Rotate the session for a reconnecting station.
///
/// Succeeds even when the supplied old session token is stale or missing.
#[utoipa::path(
    post,
    path = "/stations/{station_id}/reconnect",
    tag = "Stations",
    params(("station_id" = Uuid, Path, description = "Station UUID")),
    request_body = ReconnectRequest,
    responses(
        (status = 200, description = "Station reconnected", body = ReconnectResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn reconnect_station(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: Option<web::Json<ReconnectRequest>>,
) -> AppResult<HttpResponse> {
    let req = body.map(|b| b.into_inner()).unwrap_or_default();
    let (session_token, station) =
        station_registry::reconnect(&pool, &auth.user, path.into_inner(), &req).await?;

    Ok(HttpResponse::Ok().json(ReconnectResponse {
        message: "Station reconnected successfully".to_string(),
        session_token,
        station: StationResponse::from(station),
    }))
}

/// Deactivate a station (soft delete).
///
/// The station row is kept for job history; all its sessions are invalidated.
/// Jobs still addressed to it remain pending and untouched.
#[utoipa::path(
    delete,
    path = "/stations/{station_id}",
    tag = "Stations",
    params(("station_id" = Uuid, Path, description = "Station UUID")),
    responses(
        (status = 200, description = "Station deactivated", body = MessageResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn unregister_station(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let station = station_registry::deactivate(&pool, &auth.user, path.into_inner()).await?;

    broadcaster.send(WsEventMessage::new(WsEvent::station_updated(
        auth.user.id,
        station.id,
        &station.status,
    )));

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Station unregistered successfully".to_string(),
    }))
}

/// Get one station's status with its pending job count.
#[utoipa::path(
    get,
    path = "/stations/{station_id}/status",
    tag = "Stations",
    params(("station_id" = Uuid, Path, description = "Station UUID")),
    responses(
        (status = 200, description = "Station status", body = StationStatusResponse),
        (status = 404, description = "Station not found", body = crate::error::ErrorResponse),
    ),
    security(("bearer_token" = []))
)]
pub async fn station_status(
    auth: UserAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let (station, pending_jobs, is_online) =
        station_registry::station_status(&pool, &auth.user, path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(StationStatusResponse {
        station: StationResponse::from(station),
        pending_jobs,
        is_online,
    }))
}

/// Configure station routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stations/register").route(web::post().to(register_station)))
        .service(web::resource("/stations").route(web::get().to(list_stations)))
        .service(
            web::resource("/stations/{station_id}/heartbeat")
                .route(web::put().to(station_heartbeat)),
        )
        .service(
            web::resource("/stations/{station_id}/reconnect")
                .route(web::post().to(reconnect_station)),
        )
        .service(
            web::resource("/stations/{station_id}")
                .route(web::delete().to(unregister_station)),
        )
        .service(
            web::resource("/stations/{station_id}/status").route(web::get().to(station_status)),
        );
}
