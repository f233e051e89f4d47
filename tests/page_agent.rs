//! Page context behaviour over the message bus.

mod helpers;

use std::sync::Arc;
use std::time::Duration;

use httptest::{matchers::*, responders::*, Expectation, Server};
use url::Url;

use helpers::{serve_page, server_host};
use page_hygiene::enrich::CookieJar;
use page_hygiene::error_handling::FetchError;
use page_hygiene::fetch::{fetch_page, PageAgent};
use page_hygiene::initialization::init_client;
use page_hygiene::models::TabId;
use page_hygiene::protocol::{Message, MessageBus};
use page_hygiene::webrtc::ScriptedConnector;

fn agent(server: &Server, jar: Arc<CookieJar>, connector: Option<Arc<ScriptedConnector>>) -> PageAgent {
    let url = Url::parse(&format!("http://{}/", server.addr())).expect("server URL");
    PageAgent::new(
        Arc::new(reqwest::Client::new()),
        jar,
        url,
        connector.map(|c| c as Arc<dyn page_hygiene::webrtc::PeerConnector>),
        Duration::from_millis(200),
    )
}

#[tokio::test]
async fn test_agent_posts_one_report_per_trigger() {
    let server = Server::run();
    serve_page(&server, "<script>a()</script>", &["theme=dark"]);
    let jar = Arc::new(CookieJar::new());

    let (bus, mut inbox) = MessageBus::new();
    let port = bus.page_port(Some(TabId(21)));
    let running = tokio::spawn(agent(&server, jar.clone(), None).run(port));

    let first = inbox.recv().await.expect("initial report");
    assert_eq!(first.sender_tab, Some(TabId(21)));
    match first.message {
        Message::PageReport { data } => assert_eq!(data.inline_scripts, 1),
        other => panic!("expected PAGE_REPORT, got {:?}", other),
    }

    bus.trigger_scan();
    let second = inbox.recv().await.expect("report after trigger");
    assert_eq!(second.message.kind(), "PAGE_REPORT");

    drop(bus);
    assert_eq!(running.await.unwrap(), 2);
    assert_eq!(jar.cookies_for(&server_host(&server)).len(), 1);
}

#[tokio::test]
async fn test_agent_includes_webrtc_addresses_and_closes_connection() {
    let server = Server::run();
    serve_page(&server, "<html></html>", &[]);
    let connector = Arc::new(ScriptedConnector::stalling(vec![
        "candidate:842163049 1 udp 1677729535 203.0.113.7 61234 typ srflx".to_string(),
    ]));

    let agent = agent(&server, Arc::new(CookieJar::new()), Some(connector.clone()));
    let report = agent.evaluate().await.expect("page should load");
    assert!(report.webrtc_ips.contains("203.0.113.7"));
    assert!(connector.was_closed());
    assert_eq!(connector.leaked(), 0);
}

#[tokio::test]
async fn test_fetch_keeps_cookies_set_on_redirect_hops() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .respond_with(
                status_code(302)
                    .append_header("Location", "/home")
                    .append_header("Set-Cookie", "sid=abc; Path=/; HttpOnly"),
            ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/home")).respond_with(
            status_code(200)
                .append_header("Content-Type", "text/html")
                .append_header("Set-Cookie", "theme=dark; Path=/")
                .body("<script>x()</script>"),
        ),
    );
    let client = init_client(&page_hygiene::Config::default()).expect("client");
    let jar = CookieJar::new();
    let url = Url::parse(&format!("http://{}/", server.addr())).expect("server URL");

    let page = fetch_page(&client, &url, &jar).await.expect("page should load");

    assert_eq!(page.final_url.path(), "/home");
    assert!(page.body.contains("x()"));
    let mut names: Vec<String> = jar
        .cookies_for(&server_host(&server))
        .into_iter()
        .map(|c| c.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["sid", "theme"]);
}

#[tokio::test]
async fn test_fetch_stops_at_redirect_loop() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/"))
            .times(..)
            .respond_with(status_code(302).append_header("Location", "/")),
    );
    let client = init_client(&page_hygiene::Config::default()).expect("client");
    let url = Url::parse(&format!("http://{}/", server.addr())).expect("server URL");

    let result = fetch_page(&client, &url, &CookieJar::new()).await;
    assert!(matches!(result, Err(FetchError::TooManyRedirects { .. })));
}
