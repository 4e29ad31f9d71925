//! Embed extraction and sanitization service.
//!
//! Turns tenant-authored video embed fields (raw `<iframe>` HTML or a bare
//! URL) into structured descriptors. Classification is purely syntactic: no
//! network calls, and every failure degrades to `None` or a placeholder.

use url::Url;

use crate::models::{ExtractedVideoDescriptor, VideoEmbed, VideoEntry, VideoPlatform};

/// Inline style forced onto every raw iframe before it reaches the page.
pub const FORCED_IFRAME_STYLE: &str =
    "position:absolute;top:0;left:0;width:100%;height:100%;border:0";

/// Attributes copied from tenant iframe markup. Everything else is dropped.
const ALLOWED_IFRAME_ATTRIBUTES: &[&str] = &[
    "title",
    "allow",
    "allowfullscreen",
    "referrerpolicy",
    "loading",
    "frameborder",
];

lazy_static::lazy_static! {
    static ref IFRAME_TAG_REGEX: regex::Regex =
        regex::Regex::new(r"(?is)<iframe\b([^>]*)>?").unwrap();
    static ref ATTRIBUTE_REGEX: regex::Regex = regex::Regex::new(
        r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#
    )
    .unwrap();
    static ref HOST_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9](?:[a-z0-9.-]*[a-z0-9])?$").unwrap();
    static ref VIDEO_ID_REGEX: regex::Regex = regex::Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap();
}

/// A validated source URL, upgraded to https.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceUrl {
    url: Url,
}

impl SourceUrl {
    /// Accepts `https://`, `http://` (upgraded) and protocol-relative `//` URLs.
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return None;
        }
        if raw.contains(['<', '>', '"', '\'', '`', '\\']) {
            return None;
        }

        let parsed = if raw.starts_with("//") {
            Url::parse(&format!("https:{}", raw))
        } else {
            Url::parse(raw)
        };
        let mut url = parsed.ok()?;

        match url.scheme() {
            "https" => {}
            "http" => url.set_scheme("https").ok()?,
            _ => return None,
        }
        if !url.username().is_empty() || url.password().is_some() {
            return None;
        }

        let host = url.host_str()?;
        if !HOST_REGEX.is_match(host) || !host.contains('.') {
            return None;
        }

        Some(Self { url })
    }

    /// Lowercase host without port.
    fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    fn as_str(&self) -> &str {
        self.url.as_str()
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.url
            .path_segments()
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
    }

    /// First value of a query parameter, percent-decoded.
    fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Whether a field contains iframe markup.
pub fn contains_iframe(embed_field: &str) -> bool {
    embed_field.to_ascii_lowercase().contains("<iframe")
}

/// Classify an embed field and extract its video URL.
///
/// Iframe markup is reduced to its `src` attribute; anything else must be a
/// single bare URL. Only http(s) and protocol-relative sources are accepted.
/// Returns `None` for anything unrecognizable.
pub fn extract_video_url(embed_field: &str) -> Option<ExtractedVideoDescriptor> {
    let trimmed = embed_field.trim();
    if trimmed.is_empty() {
        return None;
    }

    let is_iframe = contains_iframe(trimmed);
    let raw_source = if is_iframe {
        iframe_src(trimmed)?
    } else {
        bare_url(trimmed)?
    };

    let Some(source) = SourceUrl::parse(&raw_source) else {
        tracing::debug!(is_iframe, "Rejected embed source");
        return None;
    };

    let platform = VideoPlatform::from_host(source.host());
    let video_id = video_id(platform, &source);
    let url = video_id
        .as_deref()
        .and_then(|id| platform_embed_url(platform, source.host(), id))
        .unwrap_or_else(|| source.as_str().to_string());

    Some(ExtractedVideoDescriptor {
        url,
        platform,
        is_iframe,
        video_id,
    })
}

/// Rebuild tenant iframe markup into a safe iframe.
///
/// The output carries the validated `src`, allowlisted attributes with
/// escaped values, and [`FORCED_IFRAME_STYLE`]. Event handlers, existing
/// styles and any surrounding markup are dropped. Returns `None` when the
/// field has no iframe or no acceptable `src`.
pub fn sanitize_iframe_markup(embed_field: &str) -> Option<String> {
    let attributes = iframe_attributes(embed_field)?;
    let src = attributes
        .iter()
        .find(|(name, _)| name == "src")
        .and_then(|(_, value)| value.as_deref())?;
    let source = SourceUrl::parse(src)?;

    let mut markup = format!(r#"<iframe src="{}""#, escape_attribute(source.as_str()));
    let mut copied: Vec<&str> = Vec::new();
    for (name, value) in &attributes {
        let Some(&allowed) = ALLOWED_IFRAME_ATTRIBUTES
            .iter()
            .find(|allowed| **allowed == name.as_str())
        else {
            continue;
        };
        if copied.contains(&allowed) {
            continue;
        }
        copied.push(allowed);
        match value {
            Some(value) => {
                markup.push_str(&format!(r#" {}="{}""#, allowed, escape_attribute(value)))
            }
            None => markup.push_str(&format!(" {}", allowed)),
        }
    }
    markup.push_str(&format!(r#" style="{}"></iframe>"#, FORCED_IFRAME_STYLE));

    Some(markup)
}

/// Decide how a video entry is rendered.
///
/// Known platforms render as a player. Iframe markup from an unknown host is
/// passed through only after [`sanitize_iframe_markup`]. Everything else
/// becomes a placeholder, never verbatim markup.
pub fn plan_video_embed(entry: &VideoEntry) -> VideoEmbed {
    let Some(field) = entry.embed_url.as_deref() else {
        return VideoEmbed::Placeholder;
    };

    match extract_video_url(field) {
        None => VideoEmbed::Placeholder,
        Some(descriptor) if descriptor.is_iframe && descriptor.platform.is_generic() => {
            sanitize_iframe_markup(field)
                .map(|markup| VideoEmbed::SanitizedIframe { markup })
                .unwrap_or(VideoEmbed::Placeholder)
        }
        Some(descriptor) => VideoEmbed::Player {
            platform: descriptor.platform,
            src: descriptor.url,
        },
    }
}

/// Parse the attributes of the first iframe tag. Names are lowercased and
/// values entity-decoded.
fn iframe_attributes(embed_field: &str) -> Option<Vec<(String, Option<String>)>> {
    let captures = IFRAME_TAG_REGEX.captures(embed_field)?;
    let segment = captures.get(1).map_or("", |m| m.as_str());

    let attributes = ATTRIBUTE_REGEX
        .captures_iter(segment)
        .filter_map(|c| {
            let name = c.get(1)?.as_str().to_ascii_lowercase();
            let value = c
                .get(2)
                .or_else(|| c.get(3))
                .or_else(|| c.get(4))
                .map(|m| decode_entities(m.as_str()));
            Some((name, value))
        })
        .collect();

    Some(attributes)
}

fn iframe_src(embed_field: &str) -> Option<String> {
    iframe_attributes(embed_field)?
        .into_iter()
        .find(|(name, _)| name == "src")
        .and_then(|(_, value)| value)
        .filter(|value| !value.trim().is_empty())
}

/// A single bare URL, or a scheme-less URL on a known platform host.
fn bare_url(field: &str) -> Option<String> {
    if field.chars().any(char::is_whitespace) {
        return None;
    }
    let lower = field.to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") || lower.starts_with("//") {
        return Some(field.to_string());
    }

    let host_end = field.find(['/', '?', '#']).unwrap_or(field.len());
    let host = lower.get(..host_end).unwrap_or_default();
    if VideoPlatform::is_known_host(host) {
        Some(format!("https://{}", field))
    } else {
        None
    }
}

fn video_id(platform: VideoPlatform, source: &SourceUrl) -> Option<String> {
    let mut segments = source.segments();
    let candidate = match platform {
        VideoPlatform::Youtube if source.host() == "youtu.be" => segments.next().map(String::from),
        VideoPlatform::Youtube => match segments.next() {
            Some("watch") => source.query_param("v"),
            Some("embed" | "shorts" | "live" | "v") => segments.next().map(String::from),
            _ => None,
        },
        VideoPlatform::Vimeo => match segments.next() {
            Some("video") => segments.next(),
            first => first.filter(|s| s.chars().all(|c| c.is_ascii_digit())),
        }
        .map(String::from),
        VideoPlatform::Dailymotion if source.host() == "dai.ly" => {
            segments.next().map(String::from)
        }
        VideoPlatform::Dailymotion => segments
            .skip_while(|segment| *segment != "video")
            .nth(1)
            .map(String::from),
        _ => None,
    }?;

    VIDEO_ID_REGEX.is_match(&candidate).then_some(candidate)
}

fn platform_embed_url(platform: VideoPlatform, host: &str, id: &str) -> Option<String> {
    match platform {
        VideoPlatform::Youtube if host.ends_with("youtube-nocookie.com") => {
            Some(format!("https://www.youtube-nocookie.com/embed/{}", id))
        }
        VideoPlatform::Youtube => Some(format!("https://www.youtube.com/embed/{}", id)),
        VideoPlatform::Vimeo => Some(format!("https://player.vimeo.com/video/{}", id)),
        VideoPlatform::Dailymotion => {
            Some(format!("https://www.dailymotion.com/embed/video/{}", id))
        }
        _ => None,
    }
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
