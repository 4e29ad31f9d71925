//! Render plan construction and section render dispatch.
//!
//! A render plan is the fully resolved input for one profile page: ordered
//! sections with their payloads, `footer`/`copyright` split out to be
//! rendered last, and every video entry already turned into a
//! [`VideoEmbed`]. Themes render a plan through a [`SectionRegistry`]
//! that maps each [`SectionKind`] to a render function.

use serde::Serialize;
use std::collections::HashMap;

use super::embed_extraction::plan_video_embed;
use super::section_resolution::{resolve_sections, SectionSource};
use crate::models::{
    is_trailing, BusinessTemplate, ConfigSections, SectionOrderHint, VideoEmbed, VideoEntry,
};

/// Field holding the video entries of `videos` and `youtube` sections.
pub const VIDEO_LIST_FIELD: &str = "video_list";

/// Tagged variant for each section key templates know how to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Header,
    About,
    Contact,
    Services,
    Portfolio,
    Gallery,
    Videos,
    Youtube,
    Testimonials,
    Social,
    BusinessHours,
    Appointments,
    GoogleMap,
    ContactForm,
    Footer,
    Copyright,
    /// Any key without a dedicated variant
    Custom(String),
}

impl SectionKind {
    pub fn from_key(key: &str) -> Self {
        match key {
            "header" => Self::Header,
            "about" => Self::About,
            "contact" => Self::Contact,
            "services" => Self::Services,
            "portfolio" => Self::Portfolio,
            "gallery" => Self::Gallery,
            "videos" => Self::Videos,
            "youtube" => Self::Youtube,
            "testimonials" => Self::Testimonials,
            "social" => Self::Social,
            "business_hours" => Self::BusinessHours,
            "appointments" => Self::Appointments,
            "google_map" => Self::GoogleMap,
            "contact_form" => Self::ContactForm,
            "footer" => Self::Footer,
            "copyright" => Self::Copyright,
            other => Self::Custom(other.to_string()),
        }
    }

    /// Whether the section's payload carries a video list.
    pub fn carries_videos(&self) -> bool {
        matches!(self, Self::Videos | Self::Youtube)
    }
}

/// One section ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RenderedSection {
    pub key: String,
    pub kind: SectionKind,
    pub source: SectionSource,
    pub data: serde_json::Value,
    /// Embeds for each entry of `video_list`, in entry order
    #[serde(skip_serializing_if = "Option::is_none")]
    pub videos: Option<Vec<VideoEmbed>>,
}

/// Resolved sections for one profile page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RenderPlan {
    pub business_type: String,
    /// Sections rendered in the main pass
    pub main: Vec<RenderedSection>,
    /// `footer` and `copyright`, rendered after the main pass
    pub trailing: Vec<RenderedSection>,
}

impl RenderPlan {
    /// All sections in final render order.
    pub fn sections(&self) -> impl Iterator<Item = &RenderedSection> {
        self.main.iter().chain(self.trailing.iter())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.sections().map(|s| s.key.as_str()).collect()
    }

    /// Number of video embeds across all sections.
    pub fn video_count(&self) -> usize {
        self.sections()
            .filter_map(|s| s.videos.as_ref())
            .map(Vec::len)
            .sum()
    }
}

/// Build the render plan for a tenant profile.
pub fn build_render_plan(
    template: &BusinessTemplate,
    tenant_sections: &ConfigSections,
    hint: Option<&SectionOrderHint>,
) -> RenderPlan {
    build_render_plan_with_limit(template, tenant_sections, hint, usize::MAX)
}

/// Same as [`build_render_plan`], with embed fields longer than
/// `max_embed_length` bytes planned as placeholders.
pub fn build_render_plan_with_limit(
    template: &BusinessTemplate,
    tenant_sections: &ConfigSections,
    hint: Option<&SectionOrderHint>,
    max_embed_length: usize,
) -> RenderPlan {
    let resolved = resolve_sections(template, tenant_sections, hint);

    let mut main = Vec::with_capacity(resolved.order.len());
    let mut trailing = Vec::new();

    for key in &resolved.order {
        let Some(data) = resolved.get(key) else {
            continue;
        };
        let kind = SectionKind::from_key(key);
        let videos = kind.carries_videos().then(|| plan_video_list(data, max_embed_length));
        let section = RenderedSection {
            key: key.clone(),
            kind,
            source: resolved
                .get_source(key)
                .unwrap_or(SectionSource::Tenant),
            data: data.clone(),
            videos,
        };

        if is_trailing(key) {
            trailing.push(section);
        } else {
            main.push(section);
        }
    }

    tracing::debug!(
        business_type = %template.business_type,
        main = main.len(),
        trailing = trailing.len(),
        "Built render plan"
    );

    RenderPlan {
        business_type: template.business_type.clone(),
        main,
        trailing,
    }
}

/// Plan embeds for a section's `video_list`. Only `embed_url` is read; entries
/// without a usable one become placeholders.
fn plan_video_list(data: &serde_json::Value, max_embed_length: usize) -> Vec<VideoEmbed> {
    let Some(entries) = data.get(VIDEO_LIST_FIELD).and_then(serde_json::Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| match entry.get("embed_url").and_then(serde_json::Value::as_str) {
            Some(embed) if embed.len() > max_embed_length => {
                tracing::warn!(
                    length = embed.len(),
                    max = max_embed_length,
                    "Embed field too long, rendering placeholder"
                );
                VideoEmbed::Placeholder
            }
            Some(embed) => plan_video_embed(&VideoEntry::with_embed(embed)),
            None => VideoEmbed::Placeholder,
        })
        .collect()
}

type RenderFn<R> = Box<dyn Fn(&RenderedSection) -> R + Send + Sync>;

/// Lookup table from section kind to a theme's render function.
pub struct SectionRegistry<R> {
    handlers: HashMap<SectionKind, RenderFn<R>>,
    fallback: Option<RenderFn<R>>,
}

impl<R> SectionRegistry<R> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            fallback: None,
        }
    }

    /// Register the render function for one kind, replacing any previous one.
    pub fn register<F>(mut self, kind: SectionKind, render: F) -> Self
    where
        F: Fn(&RenderedSection) -> R + Send + Sync + 'static,
    {
        self.handlers.insert(kind, Box::new(render));
        self
    }

    /// Render function for kinds without a dedicated handler.
    pub fn with_fallback<F>(mut self, render: F) -> Self
    where
        F: Fn(&RenderedSection) -> R + Send + Sync + 'static,
    {
        self.fallback = Some(Box::new(render));
        self
    }

    pub fn handles(&self, kind: &SectionKind) -> bool {
        self.handlers.contains_key(kind) || self.fallback.is_some()
    }

    pub fn render_section(&self, section: &RenderedSection) -> Option<R> {
        self.handlers
            .get(&section.kind)
            .or(self.fallback.as_ref())
            .map(|render| render(section))
    }

    /// Render main sections, then trailing ones. Unhandled kinds are skipped.
    pub fn render(&self, plan: &RenderPlan) -> Vec<R> {
        plan.sections()
            .filter_map(|section| self.render_section(section))
            .collect()
    }
}

impl<R> Default for SectionRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> std::fmt::Debug for SectionRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRegistry")
            .field("kinds", &self.handlers.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SectionDefinition, VideoPlatform};
    use serde_json::json;

    fn template() -> BusinessTemplate {
        BusinessTemplate::new(
            "music-artist",
            "Music Artist",
            vec![
                SectionDefinition::new("colors").with_default(json!({"primary": "#111"})),
                SectionDefinition::new("header").with_default(json!({"name": "Artist"})),
                SectionDefinition::new("footer").with_default(json!({"text": "Thanks"})),
                SectionDefinition::new("videos").with_default(json!({"video_list": []})),
                SectionDefinition::new("copyright").with_default(json!({"text": "(c)"})),
                SectionDefinition::new("tour_dates").with_default(json!({})),
            ],
        )
    }

    fn tenant(value: serde_json::Value) -> ConfigSections {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("tenant sections must be an object"),
        }
    }

    #[test]
    fn test_section_kind_from_key() {
        assert_eq!(SectionKind::from_key("header"), SectionKind::Header);
        assert_eq!(SectionKind::from_key("business_hours"), SectionKind::BusinessHours);
        assert_eq!(SectionKind::from_key("youtube"), SectionKind::Youtube);
        assert_eq!(
            SectionKind::from_key("tour_dates"),
            SectionKind::Custom("tour_dates".to_string())
        );
        assert!(SectionKind::Videos.carries_videos());
        assert!(SectionKind::Youtube.carries_videos());
        assert!(!SectionKind::Gallery.carries_videos());
    }

    #[test]
    fn test_render_plan_moves_trailing_sections_last() {
        let plan = build_render_plan(&template(), &ConfigSections::new(), None);
        assert_eq!(plan.keys(), vec!["header", "videos", "tour_dates", "footer", "copyright"]);
        assert_eq!(plan.trailing.len(), 2);
        assert_eq!(plan.business_type, "music-artist");
    }

    #[test]
    fn test_render_plan_respects_hint() {
        let hint = SectionOrderHint::new()
            .with_order(["copyright", "videos"])
            .with_enabled("tour_dates", false);
        let plan = build_render_plan(&template(), &ConfigSections::new(), Some(&hint));
        let main: Vec<&str> = plan.main.iter().map(|s| s.key.as_str()).collect();
        let trailing: Vec<&str> = plan.trailing.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(main, vec!["videos", "header"]);
        assert_eq!(trailing, vec!["copyright", "footer"]);
    }

    #[test]
    fn test_render_plan_plans_video_embeds() {
        let sections = tenant(json!({
            "videos": {
                "video_list": [
                    {"embed_url": "https://youtu.be/abc", "title": "Live"},
                    {"embed_url": "<iframe src=\"https://stream.example.com/e/1\"></iframe>"},
                    {"embed_url": "nonsense"},
                    {"title": "No embed"},
                    "not an object"
                ]
            }
        }));
        let plan = build_render_plan(&template(), &sections, None);
        let videos = plan
            .main
            .iter()
            .find(|s| s.kind == SectionKind::Videos)
            .and_then(|s| s.videos.clone())
            .unwrap();

        assert_eq!(videos.len(), 5);
        assert_eq!(
            videos[0],
            VideoEmbed::Player {
                platform: VideoPlatform::Youtube,
                src: "https://www.youtube.com/embed/abc".to_string(),
            }
        );
        assert!(matches!(videos[1], VideoEmbed::SanitizedIframe { .. }));
        assert!(videos[2].is_placeholder());
        assert!(videos[3].is_placeholder());
        assert!(videos[4].is_placeholder());
        assert_eq!(plan.video_count(), 5);
    }

    #[test]
    fn test_video_list_ignores_display_field_types() {
        let videos = plan_video_list(
            &json!({"video_list": [
                {"embed_url": "https://youtu.be/abc", "duration": 125, "title": null},
                {"embed_url": 42}
            ]}),
            usize::MAX,
        );
        assert_eq!(
            videos,
            vec![
                VideoEmbed::Player {
                    platform: VideoPlatform::Youtube,
                    src: "https://www.youtube.com/embed/abc".to_string(),
                },
                VideoEmbed::Placeholder,
            ]
        );
    }

    #[test]
    fn test_render_plan_with_limit_turns_long_embeds_into_placeholders() {
        let long = format!("https://cdn.example.com/{}", "a".repeat(64));
        let sections = tenant(json!({
            "videos": {"video_list": [{"embed_url": "https://youtu.be/abc"}, {"embed_url": long}]}
        }));
        let plan = build_render_plan_with_limit(&template(), &sections, None, 48);
        let videos = plan
            .main
            .iter()
            .find(|s| s.kind == SectionKind::Videos)
            .and_then(|s| s.videos.clone())
            .unwrap();
        assert_eq!(videos[0].platform(), Some(VideoPlatform::Youtube));
        assert!(videos[1].is_placeholder());
    }

    #[test]
    fn test_render_plan_sources() {
        let sections = tenant(json!({"header": {"name": "Nova"}}));
        let plan = build_render_plan(&template(), &sections, None);
        let header = plan.main.iter().find(|s| s.key == "header").unwrap();
        assert_eq!(header.source, SectionSource::Tenant);
        assert_eq!(header.data, json!({"name": "Nova"}));
        let footer = plan.trailing.iter().find(|s| s.key == "footer").unwrap();
        assert_eq!(footer.source, SectionSource::TemplateDefault);
        assert!(footer.videos.is_none());
    }

    #[test]
    fn test_render_plan_serialization() {
        let plan = build_render_plan(&template(), &ConfigSections::new(), None);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["main"][0]["kind"], json!("header"));
        assert_eq!(value["main"][1]["videos"], json!([]));
        assert_eq!(value["main"][2]["kind"], json!({"custom": "tour_dates"}));
        assert!(value["main"][0].get("videos").is_none());
    }

    #[test]
    fn test_registry_dispatch_and_fallback() {
        let registry = SectionRegistry::new()
            .register(SectionKind::Header, |s| {
                format!("<h1>{}</h1>", s.data["name"].as_str().unwrap_or(""))
            })
            .register(SectionKind::Footer, |_| "<footer/>".to_string())
            .with_fallback(|s| format!("<section id=\"{}\"/>", s.key));

        let plan = build_render_plan(&template(), &ConfigSections::new(), None);
        let rendered = registry.render(&plan);
        assert_eq!(
            rendered,
            vec![
                "<h1>Artist</h1>",
                "<section id=\"videos\"/>",
                "<section id=\"tour_dates\"/>",
                "<footer/>",
                "<section id=\"copyright\"/>",
            ]
        );
    }

    #[test]
    fn test_registry_skips_unhandled_kinds() {
        let registry: SectionRegistry<&'static str> =
            SectionRegistry::new().register(SectionKind::Videos, |_| "videos");
        let plan = build_render_plan(&template(), &ConfigSections::new(), None);
        assert_eq!(registry.render(&plan), vec!["videos"]);
        assert!(registry.handles(&SectionKind::Videos));
        assert!(!registry.handles(&SectionKind::Header));
    }

    #[test]
    fn test_registry_replaces_handler() {
        let registry = SectionRegistry::new()
            .register(SectionKind::Header, |_| 1)
            .register(SectionKind::Header, |_| 2);
        let plan = build_render_plan(&template(), &ConfigSections::new(), None);
        let header = plan.main.first().unwrap();
        assert_eq!(registry.render_section(header), Some(2));
        let debug = format!("{:?}", registry);
        assert!(debug.contains("Header"));
    }
}
