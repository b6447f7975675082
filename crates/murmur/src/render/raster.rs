//! PNG/JPG output for rendered word clouds.
//!
//! Spiral clouds already carry a pixel buffer and are encoded directly. Grid clouds and the
//! placeholder are rasterized from their SVG through `resvg`.

use super::{HeadlessError, ReportRenderer, placeholder_svg, surface_svg};
use murmur_core::Report;
use murmur_render::surface::parse_color;
use murmur_render::{Surface, SurfaceKind};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error(transparent)]
    Headless(#[from] HeadlessError),
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color for JPG rendering")]
    JpegBackground,
    #[error("JPG rendering requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub scale: f32,
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: None,
            jpeg_quality: 90,
        }
    }
}

fn report_pixmap(
    renderer: &ReportRenderer,
    report: &Report,
    options: &RasterOptions,
) -> Result<tiny_skia::Pixmap> {
    let rendered = renderer.render_report(report)?;
    match rendered.surface() {
        Some(surface) => surface_to_pixmap(surface, options),
        None => {
            let config = &renderer.config;
            let svg = placeholder_svg(
                config.width,
                config.height,
                &config.font_family,
                &config.placeholder,
            );
            svg_to_pixmap(&svg, options.scale, options.background.as_deref())
        }
    }
}

pub fn render_png_sync(
    renderer: &ReportRenderer,
    report: &Report,
    options: &RasterOptions,
) -> Result<Vec<u8>> {
    let pixmap = report_pixmap(renderer, report, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn render_jpeg_sync(
    renderer: &ReportRenderer,
    report: &Report,
    options: &RasterOptions,
) -> Result<Vec<u8>> {
    let options = jpeg_options(options)?;
    let pixmap = report_pixmap(renderer, report, &options)?;
    encode_jpeg(&pixmap, options.jpeg_quality)
}

/// Copies a spiral surface's pixel buffer, or rasterizes a grid surface's SVG.
pub fn surface_to_pixmap(surface: &Surface, options: &RasterOptions) -> Result<tiny_skia::Pixmap> {
    let source = match (surface.kind(), surface.pixmap()) {
        (SurfaceKind::Canvas, Some(pixmap)) => pixmap,
        _ => {
            return svg_to_pixmap(
                &surface_svg(surface),
                options.scale,
                options.background.as_deref(),
            );
        }
    };

    let scale = options.scale;
    let width_px = (source.width() as f32 * scale).ceil().max(1.0) as u32;
    let height_px = (source.height() as f32 * scale).ceil().max(1.0) as u32;
    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    fill_background(&mut pixmap, options.background.as_deref());
    pixmap.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &tiny_skia::PixmapPaint::default(),
        tiny_skia::Transform::from_scale(scale, scale),
        None,
    );
    Ok(pixmap)
}

pub fn surface_to_png(surface: &Surface, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = surface_to_pixmap(surface, options)?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let options = jpeg_options(options)?;
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    encode_jpeg(&pixmap, options.jpeg_quality)
}

/// JPG has no alpha, so the background must be an opaque color; white when unset.
fn jpeg_options(options: &RasterOptions) -> Result<RasterOptions> {
    let bg = options.background.as_deref().unwrap_or("white");
    let Some(color) = parse_color(bg) else {
        return Err(RasterError::JpegBackground);
    };
    if color.alpha() != 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }
    Ok(RasterOptions {
        background: Some(bg.to_string()),
        ..options.clone()
    })
}

fn encode_jpeg(pixmap: &tiny_skia::Pixmap, quality: u8) -> Result<Vec<u8>> {
    let (w, h) = (pixmap.width(), pixmap.height());
    // The background fill makes every pixel opaque, so dropping alpha loses nothing.
    let mut rgb = vec![0u8; (w as usize) * (h as usize) * 3];
    for (src, dst) in pixmap.data().chunks_exact(4).zip(rgb.chunks_exact_mut(3)) {
        dst.copy_from_slice(&src[..3]);
    }

    let mut out = Vec::new();
    let mut enc = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

fn fill_background(pixmap: &mut tiny_skia::Pixmap, background: Option<&str>) {
    if let Some(color) = background.and_then(parse_color) {
        pixmap.fill(color);
    }
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();
    opt.font_family = "sans-serif".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;
    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;
    fill_background(&mut pixmap, background);
    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn report(keywords: &str) -> Report {
        Report::from_json_str(&format!(r#"{{"title":"t","keywords":{keywords}}}"#)).unwrap()
    }

    #[test]
    fn svg_to_png_produces_png_signature() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"><rect width="10" height="10" fill="black"/></svg>"#;
        let bytes = svg_to_png(svg, &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn jpeg_rejects_transparent_backgrounds() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 10 10"/>"#;
        let options = RasterOptions {
            background: Some("transparent".to_string()),
            ..RasterOptions::default()
        };
        assert!(matches!(
            svg_to_jpeg(svg, &options),
            Err(RasterError::JpegOpaqueBackgroundRequired)
        ));
        let jpeg = svg_to_jpeg(svg, &RasterOptions::default()).unwrap();
        assert!(jpeg.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn grid_cloud_renders_to_png() {
        let renderer = ReportRenderer::new().without_spiral();
        let bytes = renderer
            .render_png(
                &report(r#"[{"word":"a","weight":2},{"word":"b","weight":1}]"#),
                &RasterOptions::default(),
            )
            .unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn placeholder_renders_to_png() {
        let renderer = ReportRenderer::new().without_spiral();
        let options = RasterOptions {
            scale: 0.5,
            ..RasterOptions::default()
        };
        let bytes = renderer.render_png(&report("[]"), &options).unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[cfg(feature = "spiral")]
    #[test]
    fn spiral_surface_pixels_are_copied() {
        let rendered = ReportRenderer::new()
            .with_seed(5)
            .render_report(&report(r#"[{"word":"ferris","weight":1}]"#))
            .unwrap();
        let surface = rendered.surface().unwrap();
        assert_eq!(surface.kind(), SurfaceKind::Canvas);

        let options = RasterOptions {
            background: Some("#ffffff".to_string()),
            ..RasterOptions::default()
        };
        let pixmap = surface_to_pixmap(surface, &options).unwrap();
        assert_eq!(pixmap.width(), surface.width());
        assert!(pixmap.pixels().iter().all(|p| p.alpha() == 255));
        assert!(surface_to_png(surface, &RasterOptions::default())
            .unwrap()
            .starts_with(PNG_SIGNATURE));
    }
}
