//! End-to-end pipeline tests
//!
//! Each test builds a small mock site and a mock moderation backend, runs
//! the full crawl-discover-dedup-analyze pipeline against them, and checks
//! the report and progress state.

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use modsweep::config::Config;
use modsweep::moderation::HttpModerationClient;
use modsweep::pipeline::WebImageAnalyzer;
use modsweep::ModsweepError;
use std::io::Cursor;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Incompressible deterministic PNG, large enough to pass the minimum
/// payload and dimension checks. Different seeds give different content.
fn noise_png(seed: u32) -> Vec<u8> {
    let img: RgbImage = ImageBuffer::from_fn(100, 100, |x, y| {
        let h = x
            .wrapping_mul(2654435761)
            .wrapping_add(y.wrapping_mul(2246822519))
            .wrapping_add(seed.wrapping_mul(3266489917));
        let h = h ^ (h >> 13);
        Rgb([(h & 0xff) as u8, ((h >> 8) & 0xff) as u8, ((h >> 16) & 0xff) as u8])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

fn test_config(moderation_uri: &str) -> Config {
    let mut config = Config::default();
    config.moderation.endpoint_url = format!("{}/classify", moderation_uri);
    config.moderation.retry_backoff_seconds = 0;
    config
}

fn build_analyzer(config: Config) -> WebImageAnalyzer {
    let classifier = Arc::new(HttpModerationClient::new(&config.moderation).unwrap());
    WebImageAnalyzer::new(config, classifier).unwrap()
}

/// Mounts a moderation endpoint that always answers with the given body
async fn mount_moderation(server: &MockServer, body: &str) {
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(bytes))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_identical_images_collapse_to_one_record() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    // Two pages, each embedding one image; the two images are
    // byte-identical, so content dedup must collapse them.
    let base = site.uri();
    let payload = noise_png(1);
    mount_page(
        &site,
        "/",
        format!(
            r#"<html><body><a href="{0}/other">Other</a><img src="{0}/one.png"/></body></html>"#,
            base
        ),
    )
    .await;
    mount_page(
        &site,
        "/other",
        format!(r#"<html><body><img src="{}/two.png"/></body></html>"#, base),
    )
    .await;
    mount_image(&site, "/one.png", payload.clone()).await;
    mount_image(&site, "/two.png", payload).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();

    // Both URLs were attempted, but only one record exists
    assert_eq!(report.results.len(), 1);
    assert!(report.flagged.is_empty());

    let progress = analyzer.progress();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.processed, 2);
}

#[tokio::test]
async fn test_flagged_images_are_reported() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(
        &moderation,
        r#"{"labels": [{"name": "Weapons", "confidence": 97.1, "parent_name": "Violence"}]}"#,
    )
    .await;

    let base = site.uri();
    mount_page(
        &site,
        "/",
        format!(r#"<html><body><img src="{}/hero.png"/></body></html>"#, base),
    )
    .await;
    mount_image(&site, "/hero.png", noise_png(2)).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.flagged.len(), 1);
    assert_eq!(report.flagged[0].labels[0].name, "Weapons");
    assert_eq!(
        report.flagged[0].labels[0].parent_name.as_deref(),
        Some("Violence")
    );

    // The flagged list is also visible through the progress snapshot
    let progress = analyzer.progress();
    assert_eq!(progress.flagged.len(), 1);
}

#[tokio::test]
async fn test_invalid_payload_counts_as_processed() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    let base = site.uri();
    mount_page(
        &site,
        "/",
        format!(
            r#"<html><body><img src="{0}/real.png"/><img src="{0}/stub.png"/></body></html>"#,
            base
        ),
    )
    .await;
    mount_image(&site, "/real.png", noise_png(3)).await;
    // A 10-byte payload is not an image
    mount_image(&site, "/stub.png", vec![0u8; 10]).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();

    assert_eq!(report.results.len(), 1);

    let progress = analyzer.progress();
    assert_eq!(progress.total, 2);
    assert_eq!(progress.processed, 2);
}

#[tokio::test]
async fn test_throttled_backend_is_retried() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;

    // First classification attempt is throttled, the retry succeeds.
    Mock::given(method("POST"))
        .and(path("/classify"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&moderation)
        .await;
    mount_moderation(
        &moderation,
        r#"{"labels": [{"name": "Alcohol", "confidence": 66.0}]}"#,
    )
    .await;

    let base = site.uri();
    mount_page(
        &site,
        "/",
        format!(r#"<html><body><img src="{}/drink.png"/></body></html>"#, base),
    )
    .await;
    mount_image(&site, "/drink.png", noise_png(4)).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();

    // The record carries the retried call's labels, not an empty list
    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].labels.len(), 1);
    assert_eq!(report.results[0].labels[0].name, "Alcohol");
}

#[tokio::test]
async fn test_link_cap_limits_fanout_per_page() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    // Root page with 25 same-origin links; only the first 20 may be followed.
    let base = site.uri();
    let mut body = String::from("<html><body>");
    for i in 0..25 {
        body.push_str(&format!(r#"<a href="{}/p{}">p{}</a>"#, base, i, i));
    }
    body.push_str("</body></html>");
    mount_page(&site, "/", body).await;

    for i in 0..20 {
        mount_page(&site, &format!("/p{}", i), "<html></html>".to_string()).await;
    }
    for i in 20..25 {
        Mock::given(method("GET"))
            .and(path(format!("/p{}", i)))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .expect(0)
            .mount(&site)
            .await;
    }

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();
    assert!(report.results.is_empty());

    // Wiremock verifies the expect(0) mounts when the server drops
}

#[tokio::test]
async fn test_cross_origin_links_are_not_followed() {
    let site = MockServer::start().await;
    let elsewhere = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let base = site.uri();
    mount_page(
        &site,
        "/",
        format!(
            r#"<html><body><a href="{}/offsite">Offsite</a></body></html>"#,
            elsewhere.uri()
        ),
    )
    .await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();
    assert!(report.results.is_empty());
}

#[tokio::test]
async fn test_unreachable_start_url_aborts_run() {
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let result = analyzer.analyze_website("http://127.0.0.1:1/").await;

    assert!(matches!(
        result,
        Err(ModsweepError::StartUnreachable { .. })
    ));

    // Nothing was attempted
    let progress = analyzer.progress();
    assert_eq!(progress.total, 0);
    assert_eq!(progress.processed, 0);
}

#[tokio::test]
async fn test_broken_image_server_degrades_locally() {
    let site = MockServer::start().await;
    let moderation = MockServer::start().await;
    mount_moderation(&moderation, r#"{"labels": []}"#).await;

    let base = site.uri();
    mount_page(
        &site,
        "/",
        format!(
            r#"<html><body><img src="{0}/gone.png"/><img src="{0}/ok.png"/></body></html>"#,
            base
        ),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&site)
        .await;
    mount_image(&site, "/ok.png", noise_png(5)).await;

    let analyzer = build_analyzer(test_config(&moderation.uri()));
    let report = analyzer.analyze_website(&format!("{}/", base)).await.unwrap();

    assert_eq!(report.results.len(), 1);
    let progress = analyzer.progress();
    assert_eq!(progress.processed, progress.total);
    assert_eq!(progress.total, 2);
}
