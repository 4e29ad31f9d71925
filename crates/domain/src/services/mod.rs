//! Domain services for Bizcard.
//!
//! Services contain the resolution and sanitization logic that operates on
//! domain models. All of them are synchronous and side-effect free.

pub mod embed_extraction;
pub mod section_rendering;
pub mod section_resolution;
pub mod template_catalog;

pub use embed_extraction::{
    contains_iframe, extract_video_url, plan_video_embed, sanitize_iframe_markup,
    FORCED_IFRAME_STYLE,
};

pub use section_rendering::{
    build_render_plan, build_render_plan_with_limit, RenderPlan, RenderedSection, SectionKind,
    SectionRegistry, VIDEO_LIST_FIELD,
};

pub use section_resolution::{
    ensure_required_sections, is_section_enabled, resolve_section_order, resolve_sections,
    ResolvedSections, SectionSource,
};

pub use template_catalog::{CatalogError, TemplateCatalog};
