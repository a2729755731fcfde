use crate::analyzer::{AnalyzeError, Analyzer, AnalyzerSettings};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer, web};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Registers the `/fetch` endpoint. Expects `web::Data<Analyzer>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/fetch", web::get().to(fetch));
}

async fn fetch(analyzer: web::Data<Analyzer>, query: web::Query<FetchQuery>) -> HttpResponse {
    let Some(target) = query.url.as_deref() else {
        return error_response(&AnalyzeError::MissingUrl);
    };

    match analyzer.analyze(target).await {
        Ok(report) => json_response(StatusCode::OK, &report),
        Err(e) => {
            tracing::warn!(url = %target, error = %e, "Analysis failed");
            error_response(&e)
        }
    }
}

pub fn status_for(error: &AnalyzeError) -> StatusCode {
    match error {
        AnalyzeError::MissingUrl | AnalyzeError::MalformedUrl { .. } => StatusCode::BAD_REQUEST,
        AnalyzeError::Unreachable { .. } => StatusCode::NOT_FOUND,
    }
}

fn error_response(error: &AnalyzeError) -> HttpResponse {
    let body = ErrorBody {
        error: error.public_message().to_string(),
    };
    json_response(status_for(error), &body)
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_string(body) {
        Ok(json) => HttpResponse::build(status)
            .content_type(JSON_CONTENT_TYPE)
            .body(json),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode response body");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Runs the analysis API until the server is stopped
pub async fn serve(bind: &str, settings: &AnalyzerSettings) -> Result<()> {
    let analyzer = web::Data::new(Analyzer::new(settings)?);

    let server = HttpServer::new(move || App::new().app_data(analyzer.clone()).configure(configure))
        .bind(bind)
        .with_context(|| format!("Failed to bind {}", bind))?;

    tracing::info!(address = %bind, "Serving page analysis on /fetch");
    server.run().await.context("HTTP server stopped with an error")?;

    Ok(())
}
