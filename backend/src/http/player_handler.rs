use crate::api_error::ApiError;
use crate::models::player::*;
use crate::service::PlayerService;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// GET /players
pub async fn get_players(service: web::Data<PlayerService>) -> Result<impl Responder, ApiError> {
    let players = service.list_players().await?;
    Ok(HttpResponse::Ok().json(players))
}

/// POST /players
pub async fn create_player(
    service: web::Data<PlayerService>,
    req: web::Json<CreatePlayerRequest>,
) -> Result<impl Responder, ApiError> {
    info!(name = %req.name, "Received create player request");

    let player = service.create_player(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(player))
}

/// PUT /players/{id}
pub async fn update_player(
    service: web::Data<PlayerService>,
    path: web::Path<i32>,
    req: web::Json<UpdatePlayerRequest>,
) -> Result<impl Responder, ApiError> {
    let player_id = path.into_inner();
    info!(player_id = player_id, "Received update player request");

    let player = service.update_player(player_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(player))
}

/// DELETE /players/{id}
pub async fn delete_player(
    service: web::Data<PlayerService>,
    path: web::Path<i32>,
) -> Result<impl Responder, ApiError> {
    let player_id = path.into_inner();
    info!(player_id = player_id, "Received delete player request");

    let message = service.delete_player(player_id).await?;
    Ok(HttpResponse::Ok().json(message))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/players", web::get().to(get_players))
        .route("/players", web::post().to(create_player))
        .route("/players/{id}", web::put().to(update_player))
        .route("/players/{id}", web::delete().to(delete_player));
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::app_config;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_create_player_rejects_oversized_fields() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/players")
            .set_json(serde_json::json!({
                "name": "Rivka Wiley",
                "gender": "Female",
                "phone_number": "555-0009-0009-0009"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 400);
        assert!(body["error"].as_str().unwrap().starts_with("Validation error"));
    }

    #[actix_web::test]
    async fn test_create_player_rejects_missing_fields() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/players")
            .set_json(serde_json::json!({ "name": "Nash Franco" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_non_numeric_player_id_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::delete().uri("/players/abc").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
