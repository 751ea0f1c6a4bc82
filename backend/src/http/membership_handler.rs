use crate::api_error::ApiError;
use crate::models::membership::*;
use crate::models::player::MessageResponse;
use crate::service::{BracketService, MembershipService};
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

// =============================================================================
// TOURNAMENT MEMBERSHIP
// =============================================================================

/// GET /tournament-players
pub async fn get_tournament_players(
    service: web::Data<MembershipService>,
) -> Result<impl Responder, ApiError> {
    let rows = service.list_tournament_players().await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /tournament_players
pub async fn add_tournament_players(
    service: web::Data<MembershipService>,
    req: web::Json<AddTournamentPlayersRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        tournament_id = req.tournament_id,
        players = req.player_ids.len(),
        "Received add tournament players request"
    );

    let rows = service.add_tournament_players(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(rows))
}

/// GET /tournaments/{id}/players
pub async fn get_players_by_tournament(
    service: web::Data<MembershipService>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let players = service.tournament_roster(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(players))
}

/// DELETE /tournaments/{id}/players/{player_id}
pub async fn remove_player_from_tournament(
    service: web::Data<MembershipService>,
    path: web::Path<(i32, i32)>,
) -> Result<impl Responder, ApiError> {
    let (tournament_id, player_id) = path.into_inner();
    info!(
        tournament_id = tournament_id,
        player_id = player_id,
        "Received remove tournament player request"
    );

    let message = service.remove_tournament_player(tournament_id, player_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

// =============================================================================
// BRACKET MEMBERSHIP
// =============================================================================

/// POST /bracket_players
pub async fn add_bracket_player(
    service: web::Data<BracketService>,
    req: web::Json<AddBracketPlayerRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        bracket_id = req.bracket_id,
        player_id = req.player_id,
        "Received add bracket player request"
    );

    let row = service.add_player(req.bracket_id, req.player_id).await?;
    Ok(HttpResponse::Created().json(row))
}

/// DELETE /bracket_players/{id}
pub async fn remove_bracket_player(
    service: web::Data<BracketService>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let bracket_player_id = path.into_inner();
    info!(bracket_player_id = bracket_player_id, "Received remove bracket player request");

    service.remove_player(bracket_player_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Removed player from bracket successfully",
    )))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tournament-players", web::get().to(get_tournament_players))
        .route("/tournament_players", web::post().to(add_tournament_players))
        .route("/tournaments/{id}/players", web::get().to(get_players_by_tournament))
        .route(
            "/tournaments/{id}/players/{player_id}",
            web::delete().to(remove_player_from_tournament),
        )
        .route("/bracket_players", web::post().to(add_bracket_player))
        .route("/bracket_players/{id}", web::delete().to(remove_bracket_player));
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::app_config;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_empty_player_list_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/tournament_players")
            .set_json(serde_json::json!({ "tournament_id": 1, "player_ids": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_bracket_player_body_needs_both_ids() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/bracket_players")
            .set_json(serde_json::json!({ "bracket_id": 2 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
