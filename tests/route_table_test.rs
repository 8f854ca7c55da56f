//! Route table behaviour end to end: config text → resolve → edge output.

use edge_redirect::edge::{handle_event_json, EdgeEvent, EdgeOutcome};
use edge_redirect::query;
use edge_redirect::routing::{resolve, NormalizedRequest, RedirectResult};

mod common;

fn resolve_location(host: &str, path: &str, raw_query: &str) -> Option<String> {
    let config = common::sample_config();
    let request = NormalizedRequest::from_raw_query(host, path, raw_query);
    match resolve(&config.routes, &request).unwrap() {
        RedirectResult::Redirect(redirect) => Some(redirect.location),
        RedirectResult::NoRedirect => None,
    }
}

#[test]
fn test_sample_table_from_toml() {
    assert_eq!(
        resolve_location("app.domain.com", "/", "").as_deref(),
        Some("https://different-domain.com/app/")
    );
    assert_eq!(
        resolve_location("app.domain.com", "/old/path/posts/7", "").as_deref(),
        Some("https://different-domain.com/article/7")
    );
    assert_eq!(
        resolve_location("app.domain.com", "/testmergedparams", "anotherparam=1&z=2").as_deref(),
        Some("https://different-domain.com/test?anotherparam=1&z=2")
    );
    assert_eq!(
        resolve_location("nobody.net", "/x", "").as_deref(),
        Some("https://different-domain.com/default-route")
    );
}

#[test]
fn test_retained_values_are_re_encoded() {
    assert_eq!(
        resolve_location("app.domain.com", "/testretainparams", "q=a%20b&tag=c%26d").as_deref(),
        Some("https://different-domain.com/test?q=a%20b&tag=c%26d")
    );
}

#[test]
fn test_edge_event_round() {
    let config = common::sample_config();
    let event = r#"{
        "request": {
            "uri": "/testretainparams",
            "querystring": { "param": { "value": "123" } },
            "headers": { "host": { "value": "app.domain.com" } }
        }
    }"#;

    let output: serde_json::Value =
        serde_json::from_str(&handle_event_json(&config.routes, event).unwrap()).unwrap();
    assert_eq!(output["statusCode"], 301);
    assert_eq!(output["statusDescription"], "Moved Permanently");
    assert_eq!(
        output["headers"]["location"]["value"],
        "https://different-domain.com/test?param=123"
    );
}

#[test]
fn test_edge_event_without_default_passes_through() {
    let config = edge_redirect::config::parse_config(
        r#"
        [[routes."a.com"]]
        path = "/a"
        destination = "https://x/a"
        "#,
    )
    .unwrap();

    let event: EdgeEvent = serde_json::from_str(
        r#"{ "request": { "uri": "/b", "headers": { "host": { "value": "a.com" } } } }"#,
    )
    .unwrap();
    let original = event.request.clone();

    match edge_redirect::edge::handle_event(&config.routes, event).unwrap() {
        EdgeOutcome::Request(request) => assert_eq!(request, original),
        EdgeOutcome::Response(response) => panic!("unexpected redirect: {:?}", response),
    }
}

#[test]
fn test_query_codec_and_merge_compose() {
    let destination = query::decode("?a=1&b=2");
    let request = query::decode("a=9&c=3");
    assert_eq!(query::encode(&query::merge(&destination, &request)), "?a=9&b=2&c=3");
}
