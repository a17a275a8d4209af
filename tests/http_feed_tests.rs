use portal_eventos::components::weekly_events::feed::CACHE_BUSTER_PARAM;
use portal_eventos::components::weekly_events::{EventFeed, HttpEventFeed};
use portal_eventos::error::Error;
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// What the local feed server saw
#[derive(Debug, Clone)]
struct RecordedRequest {
    url: String,
    cache_control: Option<String>,
    pragma: Option<String>,
}

/// Serve the given (status, body) pairs in order, repeating the last one
fn serve(responses: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<RecordedRequest>>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&recorded);

    thread::spawn(move || {
        for (index, request) in server.incoming_requests().enumerate() {
            let header = |name: &'static str| {
                request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv(name))
                    .map(|h| h.value.as_str().to_string())
            };
            log.lock().unwrap().push(RecordedRequest {
                url: request.url().to_string(),
                cache_control: header("Cache-Control"),
                pragma: header("Pragma"),
            });

            let (status, body) = responses[index.min(responses.len() - 1)];
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header(
                    Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
                );
            let _ = request.respond(response);
        }
    });

    (format!("http://127.0.0.1:{}/exec?planilha=eventos", port), recorded)
}

fn feed(url: &str) -> HttpEventFeed {
    HttpEventFeed::new(url, Duration::from_secs(5)).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_fetches_events_with_cache_busting() {
    let (url, recorded) = serve(vec![(
        200,
        r#"{
            "eventos": [
                { "id": 1, "dia_semana": 3, "titulo": "Volta as aulas", "descricao": "Lembrando que teremos o rodízio ainda.", "hora_inicio": "07:00" },
                { "id": 2, "dia_semana": "4", "titulo": "Aula normal", "visivel": "sim" }
            ]
        }"#,
    )]);

    let events = feed(&url).fetch_events().await.unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, "1");
    assert_eq!(events[0].titulo, "Volta as aulas");
    assert_eq!(events[1].dia_semana, Some(4.0));

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.url.starts_with("/exec?planilha=eventos&"), "{}", request.url);
    assert!(
        request.url.contains(&format!("&{}=", CACHE_BUSTER_PARAM)),
        "{}",
        request.url
    );
    assert!(request
        .cache_control
        .as_deref()
        .is_some_and(|v| v.contains("no-store")));
    assert_eq!(request.pragma.as_deref(), Some("no-cache"));
}

#[test_log::test(tokio::test)]
async fn test_every_request_is_cache_busted() {
    let (url, recorded) = serve(vec![(200, r#"{ "eventos": [] }"#)]);
    let feed = feed(&url);

    feed.fetch_events().await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    feed.fetch_events().await.unwrap();

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 2);
    assert_ne!(requests[0].url, requests[1].url);
}

#[test_log::test(tokio::test)]
async fn test_non_success_status_is_http_error() {
    let (url, _) = serve(vec![(503, r#"{ "error": "quota" }"#)]);

    let result = feed(&url).fetch_events().await;

    assert!(matches!(result, Err(Error::HttpStatus(503))), "{:?}", result);
}

#[test_log::test(tokio::test)]
async fn test_invalid_json_is_parse_error() {
    let (url, _) = serve(vec![(200, "<html>Erro</html>")]);

    let result = feed(&url).fetch_events().await;

    assert!(matches!(result, Err(Error::Parse(_))), "{:?}", result);
}

#[test_log::test(tokio::test)]
async fn test_payload_without_events_is_empty() {
    let (url, _) = serve(vec![(200, r#"{ "ok": true, "eventos": "nenhum" }"#)]);

    let events = feed(&url).fetch_events().await.unwrap();

    assert!(events.is_empty());
}

#[test_log::test(tokio::test)]
async fn test_unreachable_feed_is_network_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = feed(&format!("http://127.0.0.1:{}/exec", port))
        .fetch_events()
        .await;

    assert!(matches!(result, Err(Error::Network(_))), "{:?}", result);
}
