#![cfg(feature = "render")]

use murmur::render::{HeadlessError, RenderOutcome, ReportRenderer};
use murmur::{Report, SiteConfig, ThemePreference};
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("report")
        .join(name);
    std::fs::read_to_string(&path).expect("fixture")
}

#[test]
fn grid_render_of_the_basic_fixture() {
    let rendered = ReportRenderer::new()
        .without_spiral()
        .render_json(&fixture("basic.json"))
        .expect("renders");
    assert!(matches!(
        rendered.outcome,
        RenderOutcome::Fallback {
            placed: 15,
            reason: None
        }
    ));
    let html = rendered.to_html(ThemePreference::Dark);
    assert!(html.contains("Rustaceans Weekly"));
    assert!(html.contains(r#"<section id="topics""#));
    assert!(html.contains("borrow checker"));
}

#[test]
fn empty_keywords_render_the_placeholder() {
    let renderer = ReportRenderer::new();
    let rendered = renderer.render_json(&fixture("empty.json")).expect("renders");
    assert_eq!(rendered.outcome, RenderOutcome::Placeholder);
    assert!(rendered.surface().is_none());

    let report = Report::from_json_str(&fixture("empty.json")).unwrap();
    let svg = renderer.render_svg(&report).unwrap();
    assert!(svg.contains("No hot words yet"));
}

#[test]
fn non_object_payload_is_the_only_hard_error() {
    let err = ReportRenderer::new().render_json("[1, 2, 3]").unwrap_err();
    assert!(matches!(
        err,
        HeadlessError::Report(murmur::Error::InvalidReport { .. })
    ));
}

#[test]
fn invalid_site_config_is_rejected() {
    let site = SiteConfig::from_json_str(r#"{"wordCloud":{"palette":[]}}"#).unwrap();
    assert!(ReportRenderer::new().with_site_config(&site).is_err());
}

#[test]
fn site_config_changes_the_placeholder() {
    let site =
        SiteConfig::from_json_str(r#"{"wordCloud":{"placeholder":"Quiet in here"}}"#).unwrap();
    let renderer = ReportRenderer::new().with_site_config(&site).unwrap();
    let html = renderer
        .render_html(
            &Report::from_json_str(&fixture("empty.json")).unwrap(),
            ThemePreference::Light,
        )
        .unwrap();
    assert!(html.contains("Quiet in here"));
    assert!(html.contains(r#"data-theme="light""#));
}

#[cfg(feature = "spiral")]
#[test]
fn seeded_spiral_renders_are_stable() {
    let render = || {
        ReportRenderer::new()
            .with_seed(11)
            .render_json(&fixture("basic.json"))
            .expect("renders")
            .to_html(ThemePreference::Dark)
    };
    let first = render();
    assert!(first.contains("word-cloud--spiral"));
    assert_eq!(first, render());
}

#[cfg(not(feature = "spiral"))]
#[test]
fn render_without_spiral_feature_takes_the_grid() {
    let rendered = ReportRenderer::new()
        .with_seed(11)
        .render_json(&fixture("basic.json"))
        .expect("renders");
    assert!(matches!(
        rendered.outcome,
        RenderOutcome::Fallback {
            placed: 15,
            reason: None
        }
    ));
    assert!(
        rendered
            .to_html(ThemePreference::Dark)
            .contains("word-cloud--grid")
    );
}
