use crate::api_error::ApiError;
use crate::models::bracket::*;
use crate::models::membership::AddPlayerToBracketRequest;
use crate::models::player::MessageResponse;
use crate::service::BracketService;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// GET /brackets
pub async fn get_brackets(service: web::Data<BracketService>) -> Result<impl Responder, ApiError> {
    let brackets = service.list_brackets().await?;
    Ok(HttpResponse::Ok().json(brackets))
}

/// POST /brackets
pub async fn create_bracket(
    service: web::Data<BracketService>,
    req: web::Json<CreateBracketRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        tournament_id = req.tournament_id,
        name = %req.name,
        "Received create bracket request"
    );

    let bracket = service.create_bracket(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(bracket))
}

/// GET /tournaments/{id}/brackets
pub async fn get_tournament_brackets(
    service: web::Data<BracketService>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let brackets = service.tournament_brackets(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(brackets))
}

/// GET /brackets/{id}/players
pub async fn get_bracket_players(
    service: web::Data<BracketService>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let players = service.bracket_roster(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(players))
}

/// POST /brackets/{id}/players
pub async fn add_player_to_bracket(
    service: web::Data<BracketService>,
    path: web::Path<i32>,
    req: web::Json<AddPlayerToBracketRequest>,
) -> Result<impl Responder, ApiError> {
    let bracket_id = path.into_inner();
    info!(
        bracket_id = bracket_id,
        player_id = req.player_id,
        "Received add player to bracket request"
    );

    service.add_player(bracket_id, req.player_id).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("Player added to bracket successfully")))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/brackets", web::get().to(get_brackets))
        .route("/brackets", web::post().to(create_bracket))
        .route("/brackets/{id}/players", web::get().to(get_bracket_players))
        .route("/brackets/{id}/players", web::post().to(add_player_to_bracket))
        .route("/tournaments/{id}/brackets", web::get().to(get_tournament_brackets));
}
