use pageprobe::classifier::{compute_stats, normalize, parse_link};
use url::Url;

fn links(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn origin(value: &str) -> Url {
    Url::parse(value).expect("test origin should be valid")
}

#[test]
fn test_stats_two_internal() {
    let stats = compute_stats(
        &origin("http://google.com"),
        &links(&["http://google.com/info", "/gmail"]),
    );

    assert_eq!(stats.internal, 2);
    assert_eq!(stats.external, 0);
    assert_eq!(stats.unreachable, 0);
}

#[test]
fn test_stats_subdomain_is_external() {
    let stats = compute_stats(
        &origin("http://amazon.com"),
        &links(&["http://renewed.amazon.com/info", "/products", "/"]),
    );

    assert_eq!(stats.internal, 2);
    assert_eq!(stats.external, 1);
}

#[test]
fn test_stats_no_links() {
    let stats = compute_stats(&origin("http://amazon.com"), &[]);

    assert_eq!(stats.internal, 0);
    assert_eq!(stats.external, 0);
}

#[test]
fn test_stats_count_every_occurrence() {
    let stats = compute_stats(
        &origin("http://google.com"),
        &links(&["/gmail", "/gmail", "https://example.org", "https://example.org"]),
    );

    assert_eq!(stats.internal, 2, "Repeated internal links each count");
    assert_eq!(stats.external, 2, "Repeated external links each count");
}

#[test]
fn test_stats_fragment_and_hostless_links_are_internal() {
    let stats = compute_stats(
        &origin("https://example.com"),
        &links(&["#top", "mailto:someone@example.org", "javascript:void(0)", "about"]),
    );

    assert_eq!(stats.internal, 4);
    assert_eq!(stats.external, 0);
}

#[test]
fn test_stats_port_and_scheme_relative_links() {
    let stats = compute_stats(
        &origin("http://example.com"),
        &links(&[
            "http://example.com:8080/admin",
            "//cdn.example.net/lib.js",
            "//example.com/same",
        ]),
    );

    assert_eq!(stats.internal, 1);
    assert_eq!(stats.external, 2);
}

#[test]
fn test_stats_explicit_default_port_is_external() {
    let stats = compute_stats(
        &origin("http://x.com"),
        &links(&[
            "http://x.com:80/a",
            "http://x.com/b",
            "//user@x.com:80/c",
            "https://x.com:443/d",
        ]),
    );

    assert_eq!(stats.internal, 1, "Only the literal without a port matches");
    assert_eq!(stats.external, 3);
}

#[test]
fn test_stats_skip_unparseable_links() {
    let stats = compute_stats(
        &origin("http://example.com"),
        &links(&["http://[::1", "/ok", "http://exa mple.com/"]),
    );

    assert_eq!(stats.internal, 1);
    assert_eq!(stats.external, 0);
}

#[test]
fn test_parse_link_resolves_relative_references() {
    let base = origin("https://example.com/docs/");

    assert_eq!(
        parse_link(&base, "/about").map(|url| url.to_string()),
        Some("https://example.com/about".to_string())
    );
    assert_eq!(
        parse_link(&base, "guide.html").map(|url| url.to_string()),
        Some("https://example.com/docs/guide.html".to_string())
    );
    assert!(parse_link(&base, "http://[::1").is_none());
}

#[test]
fn test_normalize_no_links() {
    let normalized = normalize(&origin("http://xyz.com"), &[]);
    assert!(normalized.is_empty());
}

#[test]
fn test_normalize_relative_links() {
    let normalized = normalize(&origin("http://xyz.com"), &links(&["/sample", "/test"]));
    assert_eq!(
        normalized,
        vec!["http://xyz.com/sample", "http://xyz.com/test"]
    );
}

#[test]
fn test_normalize_absolute_links() {
    let normalized = normalize(
        &origin("http://xyz.com"),
        &links(&["http://xyz.com/sample", "http://xyz.com/test"]),
    );
    assert_eq!(
        normalized,
        vec!["http://xyz.com/sample", "http://xyz.com/test"]
    );
}

#[test]
fn test_normalize_absolute_and_relative_links() {
    let normalized = normalize(
        &origin("http://xyz.com"),
        &links(&["http://xyz.com/sample", "/test"]),
    );
    assert_eq!(
        normalized,
        vec!["http://xyz.com/sample", "http://xyz.com/test"]
    );
}

#[test]
fn test_normalize_dedups_by_literal_keeping_first_order() {
    let normalized = normalize(
        &origin("http://xyz.com"),
        &links(&["/b", "/a", "/b", "http://xyz.com/a", "/a"]),
    );

    assert_eq!(
        normalized,
        vec!["http://xyz.com/b", "http://xyz.com/a", "http://xyz.com/a"],
        "Dedup keys on the raw literal, not on the resolved URL"
    );
}

#[test]
fn test_normalize_is_case_sensitive() {
    let normalized = normalize(&origin("http://xyz.com"), &links(&["/Path", "/path"]));
    assert_eq!(normalized.len(), 2);
}

#[test]
fn test_normalize_keeps_origin_port() {
    let normalized = normalize(&origin("http://127.0.0.1:8080/page"), &links(&["/x"]));
    assert_eq!(normalized, vec!["http://127.0.0.1:8080/x"]);
}

#[test]
fn test_normalize_scheme_relative_link() {
    let normalized = normalize(
        &origin("https://example.com"),
        &links(&["//cdn.example.net/lib.js"]),
    );
    assert_eq!(normalized, vec!["https://cdn.example.net/lib.js"]);
}

#[test]
fn test_normalize_keeps_other_literals_as_is() {
    let normalized = normalize(
        &origin("https://example.com"),
        &links(&["#top", "mailto:someone@example.org", "guide.html"]),
    );
    assert_eq!(
        normalized,
        vec!["#top", "mailto:someone@example.org", "guide.html"]
    );
}

#[test]
fn test_normalize_drops_unparseable_links() {
    let normalized = normalize(&origin("https://example.com"), &links(&["http://[::1", "/ok"]));
    assert_eq!(normalized, vec!["https://example.com/ok"]);
}

#[test]
fn test_normalize_never_grows() {
    let base = origin("https://example.com");
    let cases = [
        links(&[]),
        links(&["/a", "/b", "/c"]),
        links(&["/a", "/a", "/a"]),
        links(&["https://example.com/a", "/a", "#a", "#a"]),
    ];

    for raw in &cases {
        let normalized = normalize(&base, raw);
        let mut distinct = raw.clone();
        distinct.sort();
        distinct.dedup();

        assert!(normalized.len() <= raw.len());
        assert_eq!(normalized.len(), distinct.len());
    }
}
