use murmur::render::raster::{RasterError, RasterOptions};
use murmur::render::{HeadlessError, ReportRenderer};
use murmur::{JsonFileThemeStore, Report, SiteConfig, Theme};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Murmur(murmur::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Murmur(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<murmur::Error> for CliError {
    fn from(value: murmur::Error) -> Self {
        Self::Murmur(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Render,
    Layout,
    Theme,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ThemeAction {
    #[default]
    Show,
    Toggle,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum RenderFormat {
    #[default]
    Html,
    Svg,
    Png,
    Jpeg,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    theme_action: ThemeAction,
    input: Option<String>,
    format: RenderFormat,
    out: Option<String>,
    seed: Option<u64>,
    no_spiral: bool,
    width: Option<u32>,
    height: Option<u32>,
    config: Option<String>,
    theme_file: Option<String>,
    scale: f32,
    background: Option<String>,
}

fn usage() -> &'static str {
    "murmur-cli\n\
\n\
USAGE:\n\
  murmur-cli [render] [--format html|svg|png|jpg] [--out <path>] [--seed <n>] [--no-spiral] [--width <px>] [--height <px>] [--config <json>] [--theme-file <path>] [--scale <n>] [--background <css-color>] [<report.json>|-]\n\
  murmur-cli layout [--seed <n>] [--no-spiral] [--width <px>] [--height <px>] [--config <json>] [<report.json>|-]\n\
  murmur-cli theme [show|toggle] [--theme-file <path>]\n\
\n\
NOTES:\n\
  - If <report.json> is omitted or '-', the report is read from stdin.\n\
  - render prints HTML to stdout by default; use --out to write a file.\n\
  - PNG/JPG output defaults to writing next to the input file (or ./out.png, ./out.jpg for stdin).\n\
  - layout prints the word cloud placement as JSON.\n\
  - The theme file defaults to $MURMUR_THEME_FILE, then $HOME/.config/murmur/theme.json.\n\
  - Set MURMUR_LOG (e.g. MURMUR_LOG=debug) to see diagnostics on stderr.\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_number<T: FromStr>(raw: &str) -> Result<T, CliError> {
    raw.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "theme" => args.command = Command::Theme,
            "show" if args.command == Command::Theme => args.theme_action = ThemeAction::Show,
            "toggle" if args.command == Command::Theme => args.theme_action = ThemeAction::Toggle,
            "--no-spiral" => args.no_spiral = true,
            "--format" => {
                args.format = next_value(&mut it)?
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--seed" => args.seed = Some(parse_number(next_value(&mut it)?)?),
            "--width" => args.width = Some(parse_number(next_value(&mut it)?)?),
            "--height" => args.height = Some(parse_number(next_value(&mut it)?)?),
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--theme-file" => args.theme_file = Some(next_value(&mut it)?.clone()),
            "--scale" => {
                args.scale = parse_number(next_value(&mut it)?)?;
                if !(args.scale.is_finite() && args.scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_value(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.command == Command::Theme || args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MURMUR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None | Some("-") => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn write_bytes(bytes: &[u8], out: &str) -> Result<(), CliError> {
    if out == "-" {
        std::io::stdout().lock().write_all(bytes)?;
    } else {
        std::fs::write(out, bytes)?;
    }
    Ok(())
}

fn default_raster_out_path(input: Option<&str>, ext: &str) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension(ext),
        _ => PathBuf::from(format!("out.{ext}")),
    }
}

fn theme_file(args: &Args) -> PathBuf {
    if let Some(path) = &args.theme_file {
        return PathBuf::from(path);
    }
    if let Some(path) = std::env::var_os("MURMUR_THEME_FILE") {
        return PathBuf::from(path);
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home)
            .join(".config")
            .join("murmur")
            .join("theme.json"),
        None => PathBuf::from("murmur-theme.json"),
    }
}

fn build_renderer(args: &Args) -> Result<ReportRenderer, CliError> {
    let mut site = match &args.config {
        Some(path) => SiteConfig::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SiteConfig::empty_object(),
    };
    if let Some(width) = args.width {
        site.set_value("wordCloud.width", serde_json::json!(width));
    }
    if let Some(height) = args.height {
        site.set_value("wordCloud.height", serde_json::json!(height));
    }

    let mut renderer = ReportRenderer::new().with_site_config(&site)?;
    if args.no_spiral {
        renderer = renderer.without_spiral();
    }
    if let Some(seed) = args.seed {
        renderer = renderer.with_seed(seed);
    }
    tracing::debug!(?renderer, "renderer configured");
    Ok(renderer)
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Theme => {
            let mut theme = Theme::init(JsonFileThemeStore::new(theme_file(&args)));
            let current = match args.theme_action {
                ThemeAction::Show => theme.current(),
                ThemeAction::Toggle => theme.toggle()?,
            };
            println!("{current}");
            Ok(())
        }
        Command::Layout => {
            let renderer = build_renderer(&args)?;
            let report = Report::from_json_str(&read_input(args.input.as_deref())?)?;
            let rendered = renderer.render_report(&report)?;
            let json = match rendered.surface() {
                Some(surface) => surface.layout_json().map_err(HeadlessError::from)?,
                None => serde_json::to_string_pretty(&serde_json::json!({
                    "kind": "placeholder",
                    "text": &renderer.config.placeholder,
                }))?,
            };
            println!("{json}");
            Ok(())
        }
        Command::Render => {
            let renderer = build_renderer(&args)?;
            let report = Report::from_json_str(&read_input(args.input.as_deref())?)?;
            let raster = RasterOptions {
                scale: args.scale,
                background: args.background.clone(),
                ..Default::default()
            };

            match args.format {
                RenderFormat::Html => {
                    let theme = Theme::init(JsonFileThemeStore::new(theme_file(&args)));
                    let html = renderer.render_html(&report, theme.current())?;
                    write_text(&html, args.out.as_deref())?;
                }
                RenderFormat::Svg => {
                    let svg = renderer.render_svg(&report)?;
                    write_text(&svg, args.out.as_deref())?;
                }
                RenderFormat::Png => {
                    let bytes = renderer.render_png(&report, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "png")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)?;
                }
                RenderFormat::Jpeg => {
                    let bytes = renderer.render_jpeg(&report, &raster)?;
                    let out = args.out.clone().unwrap_or_else(|| {
                        default_raster_out_path(args.input.as_deref(), "jpg")
                            .to_string_lossy()
                            .to_string()
                    });
                    write_bytes(&bytes, &out)?;
                }
            }
            Ok(())
        }
    }
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };
    init_tracing();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
