use crate::api_error::ApiError;
use crate::models::matchup::*;
use crate::service::MatchupService;
use actix_web::{web, HttpResponse, Responder};
use tracing::info;

/// GET /matchups
pub async fn get_matchups(service: web::Data<MatchupService>) -> Result<impl Responder, ApiError> {
    let matchups = service.list_matchups().await?;
    Ok(HttpResponse::Ok().json(matchups))
}

/// POST /matchups
pub async fn create_matchup(
    service: web::Data<MatchupService>,
    req: web::Json<CreateMatchupRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        bracket_id = req.bracket_id,
        player1_id = req.player1_id,
        player2_id = req.player2_id,
        "Received create matchup request"
    );

    let matchup = service.create_matchup(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(matchup))
}

/// POST /matchups/generate
/// Replace the bracket's schedule and open its first round
pub async fn generate_matchups(
    service: web::Data<MatchupService>,
    req: web::Json<GenerateMatchupsRequest>,
) -> Result<impl Responder, ApiError> {
    info!(
        bracket_id = req.bracket_id,
        format = %req.format,
        "Received generate matchups request"
    );

    let matchups = service.generate_matchups(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(matchups))
}

/// PUT /matchups/{id}
/// Record scores, winners and status changes; may open the next round
pub async fn update_matchup(
    service: web::Data<MatchupService>,
    path: web::Path<i32>,
    req: web::Json<UpdateMatchupRequest>,
) -> Result<impl Responder, ApiError> {
    let matchup_id = path.into_inner();
    info!(
        matchup_id = matchup_id,
        status = ?req.status,
        "Received update matchup request"
    );

    let matchup = service.update_matchup(matchup_id, req.into_inner()).await?;
    Ok(HttpResponse::Ok().json(matchup))
}

/// GET /brackets/{id}/matchups
pub async fn get_bracket_matchups(
    service: web::Data<MatchupService>,
    path: web::Path<i32>,
    query: web::Query<MatchupQuery>,
) -> Result<impl Responder, ApiError> {
    let matchups = service
        .bracket_matchups(path.into_inner(), query.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(matchups))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/matchups", web::get().to(get_matchups))
        .route("/matchups", web::post().to(create_matchup))
        .route("/matchups/generate", web::post().to(generate_matchups))
        .route("/matchups/{id}", web::put().to(update_matchup))
        .route("/brackets/{id}/matchups", web::get().to(get_bracket_matchups));
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::app_config;
    use actix_web::{http::StatusCode, test, App};

    async fn generate(format: &str) -> (StatusCode, serde_json::Value) {
        let app = test::init_service(App::new().configure(app_config)).await;
        let req = test::TestRequest::post()
            .uri("/matchups/generate")
            .set_json(serde_json::json!({ "bracket_id": 1, "format": format }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    #[actix_web::test]
    async fn test_generate_swiss_is_not_implemented() {
        let (status, body) = generate("SWISS").await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["error"], "SWISS format not implemented yet");
    }

    #[actix_web::test]
    async fn test_generate_unknown_format_is_rejected() {
        let (status, body) = generate("ELIMINATION").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid format");
    }

    #[actix_web::test]
    async fn test_create_matchup_with_foreign_winner_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;
        let req = test::TestRequest::post()
            .uri("/matchups")
            .set_json(serde_json::json!({
                "bracket_id": 1,
                "player1_id": 10,
                "player2_id": 20,
                "winner_id": 30,
                "status": "COMPLETED",
                "round": 1
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_invalid_query_flag_is_rejected() {
        let app = test::init_service(App::new().configure(app_config)).await;
        let req = test::TestRequest::get()
            .uri("/brackets/1/matchups?ALL=sometimes")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
