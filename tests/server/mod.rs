use actix_web::{App, HttpResponse, HttpServer, web};
use std::net::TcpListener;
use std::time::Duration;

#[allow(dead_code)]
pub const MAIN_PAGE: &str = r#"<!doctype html>
<title>Google</title>
<a href="/sub-page">Gmail</a>
<h1>H1 Heading</h1>"#;

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Page mixing repeated, broken, external, fragment and host-less links.
/// `localhost` differs from the `127.0.0.1` origin, so that link is external.
fn links_page(port: u16) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head><title>Links</title></head>
<body>
  <h2>Navigation</h2>
  <a href="/ok">Home</a>
  <a href="/ok">Home again</a>
  <a href="/not-found">Gone</a>
  <a href="/redirect">Moved</a>
  <a href="http://localhost:{port}/ok">Elsewhere</a>
  <a href="#top">Top</a>
  <a href="mailto:someone@example.com">Mail</a>
  <a name="anchor-without-href">Nothing</a>
</body>
</html>"##
    )
}

/// Starts a site on an ephemeral port and returns its base URL
#[allow(dead_code)]
pub async fn start_site_server() -> String {
    let listener = TcpListener::bind(("127.0.0.1", 0)).expect("Failed to bind test server");
    let port = listener
        .local_addr()
        .expect("No address bound")
        .port();

    let http_server = HttpServer::new(move || {
        App::new()
            .route(
                "/main-page",
                web::get().to(|| async { html(MAIN_PAGE.to_string()) }),
            )
            .route(
                "/sub-page",
                web::get().to(|| async { HttpResponse::NotFound().finish() }),
            )
            .route(
                "/links",
                web::get().to(move || async move { html(links_page(port)) }),
            )
            .route(
                "/missing-page",
                web::get().to(|| async {
                    HttpResponse::NotFound()
                        .content_type("text/html")
                        .body("<title>Not Found</title><h1>Sorry</h1>")
                }),
            )
            .route(
                "/slow-links",
                web::get().to(|| async { html(r#"<a href="/slow">Slow</a>"#.to_string()) }),
            )
            .route(
                "/ok",
                web::get().to(|| async { HttpResponse::Ok().body("OK") }),
            )
            .route(
                "/not-found",
                web::get().to(|| async { HttpResponse::NotFound().body("Not Found") }),
            )
            .route(
                "/server-error",
                web::get().to(|| async { HttpResponse::InternalServerError().body("Error") }),
            )
            .route(
                "/redirect",
                web::get().to(|| async {
                    HttpResponse::MovedPermanently()
                        .append_header(("Location", "/ok"))
                        .finish()
                }),
            )
            .route(
                "/slow",
                web::get().to(|| async {
                    tokio::time::sleep(Duration::from_secs(3)).await;
                    HttpResponse::Ok().body("Too late")
                }),
            )
    })
    .workers(2)
    .listen(listener)
    .expect("Failed to listen on test server socket");

    let app_server = http_server.run();

    tokio::spawn(async move {
        if let Err(e) = app_server.await {
            eprintln!("Test server error: {}", e);
        }
    });

    format!("http://127.0.0.1:{}", port)
}
