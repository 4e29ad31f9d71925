//! Video embed domain models.

use serde::{Deserialize, Serialize};

/// One tenant-supplied video from a `videos` or `youtube` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VideoEntry {
    /// Raw iframe HTML or a bare URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    /// Platform-specific fields, passed through untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VideoEntry {
    pub fn with_embed(embed_url: impl Into<String>) -> Self {
        Self {
            embed_url: Some(embed_url.into()),
            ..Default::default()
        }
    }
}

/// Video hosting platform, classified from the source host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoPlatform {
    Youtube,
    Vimeo,
    Dailymotion,
    Facebook,
    Tiktok,
    Wistia,
    Loom,
    Twitch,
    Generic,
}

/// Known platform domains. A host matches a domain exactly or as a subdomain.
const PLATFORM_DOMAINS: &[(&str, VideoPlatform)] = &[
    ("youtube.com", VideoPlatform::Youtube),
    ("youtube-nocookie.com", VideoPlatform::Youtube),
    ("youtu.be", VideoPlatform::Youtube),
    ("vimeo.com", VideoPlatform::Vimeo),
    ("dailymotion.com", VideoPlatform::Dailymotion),
    ("dai.ly", VideoPlatform::Dailymotion),
    ("facebook.com", VideoPlatform::Facebook),
    ("fb.watch", VideoPlatform::Facebook),
    ("tiktok.com", VideoPlatform::Tiktok),
    ("wistia.com", VideoPlatform::Wistia),
    ("wistia.net", VideoPlatform::Wistia),
    ("loom.com", VideoPlatform::Loom),
    ("twitch.tv", VideoPlatform::Twitch),
];

impl VideoPlatform {
    /// Classify a lowercase host name.
    pub fn from_host(host: &str) -> Self {
        PLATFORM_DOMAINS
            .iter()
            .find(|(domain, _)| host_matches(host, domain))
            .map(|(_, platform)| *platform)
            .unwrap_or(Self::Generic)
    }

    /// Whether the host belongs to a known platform.
    pub fn is_known_host(host: &str) -> bool {
        Self::from_host(host) != Self::Generic
    }

    pub fn is_generic(&self) -> bool {
        *self == Self::Generic
    }
}

fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

impl std::fmt::Display for VideoPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Youtube => write!(f, "youtube"),
            Self::Vimeo => write!(f, "vimeo"),
            Self::Dailymotion => write!(f, "dailymotion"),
            Self::Facebook => write!(f, "facebook"),
            Self::Tiktok => write!(f, "tiktok"),
            Self::Wistia => write!(f, "wistia"),
            Self::Loom => write!(f, "loom"),
            Self::Twitch => write!(f, "twitch"),
            Self::Generic => write!(f, "generic"),
        }
    }
}

/// Structured result of classifying an embed field. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ExtractedVideoDescriptor {
    /// Canonical https URL (platform embed URL when the id is known)
    pub url: String,
    pub platform: VideoPlatform,
    /// Whether the input was iframe HTML
    pub is_iframe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
}

/// Declarative embed instruction handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VideoEmbed {
    /// Render the platform player pointed at `src`
    Player { platform: VideoPlatform, src: String },
    /// Insert rebuilt iframe markup with forced positioning
    SanitizedIframe { markup: String },
    /// Nothing usable; show a placeholder card
    Placeholder,
}

impl VideoEmbed {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder)
    }

    /// Platform the embed plays from. Sanitized iframes are always generic.
    pub fn platform(&self) -> Option<VideoPlatform> {
        match self {
            Self::Player { platform, .. } => Some(*platform),
            Self::SanitizedIframe { .. } => Some(VideoPlatform::Generic),
            Self::Placeholder => None,
        }
    }
}
