//! Domain models for Bizcard.

pub mod business_template;
pub mod section;
pub mod section_order;
pub mod video;

pub use business_template::{BusinessTemplate, BusinessTemplateSummary};
pub use section::{
    is_config_only, is_empty_payload, is_trailing, ConfigSections, SectionDefinition,
    CONFIG_ONLY_SECTIONS, TRAILING_SECTIONS,
};
pub use section_order::{SectionOrderHint, UnsupportedHintShape};
pub use video::{ExtractedVideoDescriptor, VideoEmbed, VideoEntry, VideoPlatform};
