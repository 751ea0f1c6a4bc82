use crate::api_error::ApiError;
use crate::models::tournament::*;
use crate::service::TournamentService;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// GET /tournaments
/// Only tournaments that are planned or running are listed
pub async fn get_tournaments(
    service: web::Data<TournamentService>,
) -> Result<impl Responder, ApiError> {
    let tournaments = service.list_active_tournaments().await?;
    Ok(HttpResponse::Ok().json(tournaments))
}

/// POST /tournaments
pub async fn create_tournament(
    service: web::Data<TournamentService>,
    req: web::Json<CreateTournamentRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        name = %req.name,
        format = %req.format,
        "Received create tournament request"
    );

    let tournament = service.create_tournament(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(tournament))
}

/// PUT /tournaments/{id}
pub async fn update_tournament(
    service: web::Data<TournamentService>,
    path: web::Path<i32>,
    req: web::Json<UpdateTournamentRequest>,
) -> Result<impl Responder, ApiError> {
    let tournament_id = path.into_inner();
    info!(tournament_id = tournament_id, "Received update tournament request");

    let tournament = service.update_tournament(tournament_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(tournament))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tournaments", web::get().to(get_tournaments))
        .route("/tournaments", web::post().to(create_tournament))
        .route("/tournaments/{id}", web::put().to(update_tournament));
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::app_config;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_unknown_format_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/tournaments")
            .set_json(serde_json::json!({
                "name": "Autumn Classic",
                "format": "KNOCKOUT",
                "status": "PLANNING"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_empty_name_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;

        let req = test::TestRequest::post()
            .uri("/tournaments")
            .set_json(serde_json::json!({
                "name": "",
                "format": "ROUND_ROBIN",
                "status": "PLANNING"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
