//! Minimal page shell: a title and one container per report section.

use crate::interaction::{InteractionLayer, PointerEvent, PointerResponse};
use crate::surface::Surface;
use crate::svg::{escape_xml, placeholder_html, surface_html};
use indexmap::IndexMap;
use murmur_core::{Report, ThemePreference};
use std::fmt::Write as _;

/// Container the report's keyword cloud is rendered into.
pub const WORD_CLOUD_CONTAINER: &str = "word-cloud";

const PAGE_CSS: &str = r#"
:root[data-theme="dark"] { --bg: #0f172a; --fg: #e2e8f0; --muted: #94a3b8; --card: #1e293b; }
:root[data-theme="light"] { --bg: #f8fafc; --fg: #1e293b; --muted: #64748b; --card: #ffffff; }
body { margin: 0; background: var(--bg); color: var(--fg); font-family: system-ui, sans-serif; }
.report { max-width: 960px; margin: 0 auto; padding: 24px; }
.report-section { background: var(--card); border-radius: 12px; padding: 16px; margin: 16px 0; }
.word-cloud { margin: 0 auto; transform-origin: center; }
.word-cloud--grid .word { transform: translate(-50%, 0); }
.word-cloud-placeholder { color: var(--muted); text-align: center; padding: 48px 0; }
@keyframes murmur-fade-in { from { opacity: var(--murmur-fade-from, 0); } }
"#;

/// A surface mounted in a container together with its pointer listener, if any.
#[derive(Debug)]
pub struct MountedCloud {
    pub surface: Surface,
    pub listener: Option<InteractionLayer>,
}

#[derive(Debug, Default)]
pub enum ContainerContent {
    #[default]
    Empty,
    Placeholder(String),
    Cloud(MountedCloud),
}

impl ContainerContent {
    pub fn listener_count(&self) -> usize {
        match self {
            Self::Cloud(MountedCloud {
                listener: Some(_), ..
            }) => 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
pub struct Page {
    title: String,
    containers: IndexMap<String, ContainerContent>,
}

impl Page {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            containers: IndexMap::new(),
        }
    }

    /// One empty container per report section, in report order, plus the word cloud container.
    pub fn from_report(report: &Report) -> Self {
        let mut page = Self::new(report.title.clone().unwrap_or_default());
        for id in report.section_ids() {
            page.add_container(id);
        }
        page.add_container(WORD_CLOUD_CONTAINER);
        page
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Adds an empty container; false when `id` already exists.
    pub fn add_container(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.containers.contains_key(&id) {
            return false;
        }
        self.containers.insert(id, ContainerContent::Empty);
        true
    }

    pub fn has_container(&self, id: &str) -> bool {
        self.containers.contains_key(id)
    }

    pub fn container_ids(&self) -> impl Iterator<Item = &str> {
        self.containers.keys().map(String::as_str)
    }

    pub fn content(&self, id: &str) -> Option<&ContainerContent> {
        self.containers.get(id)
    }

    /// Replaces the container's content wholesale.
    ///
    /// The previous content, including its listener, is dropped before the new content is
    /// stored. Returns false and leaves the page untouched when the container does not exist.
    pub fn replace(&mut self, id: &str, content: ContainerContent) -> bool {
        let Some(slot) = self.containers.get_mut(id) else {
            return false;
        };
        let previous = std::mem::take(slot);
        if previous.listener_count() > 0 {
            tracing::debug!(container = id, "detaching previous pointer listener");
        }
        drop(previous);
        *slot = content;
        true
    }

    pub fn listener_count(&self, id: &str) -> usize {
        self.containers
            .get(id)
            .map(ContainerContent::listener_count)
            .unwrap_or(0)
    }

    pub fn surface(&self, id: &str) -> Option<&Surface> {
        match self.containers.get(id)? {
            ContainerContent::Cloud(mounted) => Some(&mounted.surface),
            _ => None,
        }
    }

    pub fn placeholder(&self, id: &str) -> Option<&str> {
        match self.containers.get(id)? {
            ContainerContent::Placeholder(text) => Some(text),
            _ => None,
        }
    }

    /// Routes a pointer event to the container's listener.
    ///
    /// `None` when the container does not exist or has no listener attached.
    pub fn dispatch_pointer(&mut self, id: &str, event: PointerEvent) -> Option<PointerResponse> {
        match self.containers.get_mut(id)? {
            ContainerContent::Cloud(MountedCloud {
                surface,
                listener: Some(listener),
            }) => Some(listener.dispatch(surface, event)),
            _ => None,
        }
    }

    pub fn to_html(&self, theme: ThemePreference) -> String {
        let mut out = String::new();
        let _ = write!(
            &mut out,
            "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{}\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n<main class=\"report\">\n",
            theme.as_str(),
            escape_xml(&self.title),
            PAGE_CSS
        );
        if !self.title.is_empty() {
            let _ = writeln!(&mut out, "<h1>{}</h1>", escape_xml(&self.title));
        }
        for (id, content) in &self.containers {
            let _ = write!(
                &mut out,
                r#"<section id="{}" class="report-section">"#,
                escape_xml(id)
            );
            match content {
                ContainerContent::Empty => {}
                ContainerContent::Placeholder(text) => out.push_str(&placeholder_html(text)),
                ContainerContent::Cloud(mounted) => out.push_str(&surface_html(&mounted.surface)),
            }
            out.push_str("</section>\n");
        }
        out.push_str("</main>\n</body>\n</html>\n");
        out
    }
}
