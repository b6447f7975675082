//! SVG and HTML fragments for mounted surfaces.

use crate::surface::{Cursor, PlacedWord, Position, Surface, SurfaceKind};
use std::fmt::Write as _;

/// Formats a coordinate with at most three decimals and no trailing zeros.
pub(crate) fn fmt(v: f64) -> String {
    if !v.is_finite() {
        return "0".to_string();
    }
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let s = format!("{rounded:.3}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub(crate) fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Top-left-anchored pixel position of a grid word, or the center of a spiral word.
fn pixel_anchor(surface: &Surface, word: &PlacedWord) -> (f64, f64) {
    match word.position {
        Position::Pixels { x, y } => (x, y),
        Position::Percent { x, y } => (
            x / 100.0 * f64::from(surface.width()),
            y / 100.0 * f64::from(surface.height()),
        ),
    }
}

/// Standalone SVG document for a surface of either kind.
pub fn surface_svg(surface: &Surface) -> String {
    let (w, h) = (surface.width(), surface.height());
    let mut out = String::new();
    let _ = write!(
        &mut out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" class="word-cloud" width="{w}" height="{h}" viewBox="0 0 {w} {h}" opacity="{}">"#,
        fmt(surface.style().opacity)
    );
    let family = escape_xml(surface.font_family());
    for word in surface.words() {
        let (x, y) = pixel_anchor(surface, word);
        let (anchor, baseline) = match surface.kind() {
            SurfaceKind::Canvas => ("middle", "central"),
            SurfaceKind::Positioned => ("start", "hanging"),
        };
        let _ = write!(
            &mut out,
            r#"<text x="{}" y="{}" font-size="{}" font-family="{family}" fill="{}" text-anchor="{anchor}" dominant-baseline="{baseline}" data-weight="{}""#,
            fmt(x),
            fmt(y),
            fmt(word.font_size),
            escape_xml(&word.color),
            fmt(word.weight),
        );
        if word.rotation != 0.0 {
            let _ = write!(
                &mut out,
                r#" transform="rotate({} {} {})""#,
                fmt(word.rotation.to_degrees()),
                fmt(x),
                fmt(y)
            );
        }
        let _ = write!(&mut out, ">{}</text>", escape_xml(&word.word));
    }
    out.push_str("</svg>\n");
    out
}

fn wrapper_style(surface: &Surface) -> String {
    let style = surface.style();
    let mut css = format!(
        "position:relative;width:{}px;height:{}px;opacity:{};",
        surface.width(),
        surface.height(),
        fmt(style.opacity)
    );
    if let Some(from) = style.fade_from {
        let _ = write!(
            &mut css,
            "--murmur-fade-from:{};animation:murmur-fade-in {}ms ease-in;transition:opacity {}ms ease-in;",
            fmt(from),
            style.transition_ms,
            style.transition_ms
        );
    }
    if style.scale != 1.0 {
        let _ = write!(&mut css, "transform:scale({});", fmt(style.scale));
    }
    if style.cursor == Cursor::Pointer {
        css.push_str("cursor:pointer;");
    }
    css
}

/// HTML fragment for a mounted surface: inline SVG for spiral clouds, absolutely positioned
/// spans for grid clouds.
pub fn surface_html(surface: &Surface) -> String {
    let mut out = String::new();
    match surface.kind() {
        SurfaceKind::Canvas => {
            let _ = write!(
                &mut out,
                r#"<div class="word-cloud word-cloud--spiral" style="{}">"#,
                wrapper_style(surface)
            );
            out.push_str(&surface_svg(surface));
            out.push_str("</div>");
        }
        SurfaceKind::Positioned => {
            let _ = write!(
                &mut out,
                r#"<div class="word-cloud word-cloud--grid" style="{}">"#,
                wrapper_style(surface)
            );
            let family = escape_xml(surface.font_family());
            for word in surface.words() {
                let (x, y) = match word.position {
                    Position::Percent { x, y } => (x, y),
                    Position::Pixels { x, y } => (
                        x / f64::from(surface.width().max(1)) * 100.0,
                        y / f64::from(surface.height().max(1)) * 100.0,
                    ),
                };
                let _ = write!(
                    &mut out,
                    r#"<span class="word" style="position:absolute;left:{}%;top:{}%;font-size:{}px;color:{};font-family:{family};white-space:nowrap">{}</span>"#,
                    fmt(x),
                    fmt(y),
                    fmt(word.font_size),
                    escape_xml(&word.color),
                    escape_xml(&word.word)
                );
            }
            out.push_str("</div>");
        }
    }
    out
}

/// Standalone SVG showing only `text`, centered.
pub fn placeholder_svg(width: u32, height: u32, font_family: &str, text: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" class="word-cloud-placeholder" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text x="{}" y="{}" font-size="16" font-family="{}" fill="#94a3b8" text-anchor="middle" dominant-baseline="central">{}</text></svg>
"##,
        fmt(f64::from(width) / 2.0),
        fmt(f64::from(height) / 2.0),
        escape_xml(font_family),
        escape_xml(text)
    )
}

pub fn placeholder_html(text: &str) -> String {
    format!(
        r#"<p class="word-cloud-placeholder">{}</p>"#,
        escape_xml(text)
    )
}
