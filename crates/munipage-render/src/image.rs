//! Image source trust boundary.
//!
//! An image URL is rendered only if its host is on the allow-list (the CDN's
//! canonical hostname) or it is an ephemeral local preview (`blob:`). Any other
//! input (foreign hosts, relative paths, `data:` URLs, garbage) is treated as
//! "no image", never as an error.

use tracing::debug;
use url::Url;

/// Canonical CDN hostname.
pub const CDN_HOST: &str = "res.cloudinary.com";

/// Marker segment of Cloudinary delivery URLs; transformations go right after it.
const UPLOAD_SEGMENT: &str = "/image/upload/";

/// Which image URLs may be rendered, and whether to rewrite them for delivery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePolicy {
    pub allowed_hosts: Vec<String>,
    /// Accept `blob:` preview URLs created by the browser for local files.
    pub allow_preview_urls: bool,
    /// Insert `f_auto,q_auto,w_<n>` delivery transformations on CDN URLs.
    pub optimize: bool,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            allowed_hosts: vec![CDN_HOST.to_string()],
            allow_preview_urls: true,
            optimize: true,
        }
    }
}

impl ImagePolicy {
    pub fn new(allowed_hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_hosts: allowed_hosts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    pub fn with_preview_urls(mut self, allow: bool) -> Self {
        self.allow_preview_urls = allow;
        self
    }

    /// Whether `url` may be rendered.
    pub fn is_allowed(&self, url: Option<&str>) -> bool {
        self.classify(url).is_some()
    }

    /// `url`, trimmed, when allowed; `None` otherwise.
    pub fn trusted<'a>(&self, url: Option<&'a str>) -> Option<&'a str> {
        self.classify(url).map(|(_, url)| url)
    }

    /// The `src` to emit for an allowed URL at a target display width.
    pub fn src(&self, url: Option<&str>, width: u32) -> Option<String> {
        let (source, url) = self.classify(url)?;
        match source {
            Source::Preview => Some(url.to_string()),
            Source::Cdn if self.optimize => Some(optimize_cdn_url(url, width)),
            Source::Cdn => Some(url.to_string()),
        }
    }

    /// The URL's source kind plus the trimmed URL that was checked.
    fn classify<'a>(&self, url: Option<&'a str>) -> Option<(Source, &'a str)> {
        let raw = url.map(str::trim).filter(|u| !u.is_empty())?;
        let parsed = match Url::parse(raw) {
            Ok(parsed) => parsed,
            Err(_) => {
                debug!(url = raw, "image url does not parse, treating as absent");
                return None;
            }
        };
        match parsed.scheme() {
            "blob" if self.allow_preview_urls => Some((Source::Preview, raw)),
            "https" | "http" => {
                let host = parsed.host_str()?;
                if self
                    .allowed_hosts
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(host))
                {
                    Some((Source::Cdn, raw))
                } else {
                    debug!(host, "image host not on allow-list, treating as absent");
                    None
                }
            }
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    Cdn,
    Preview,
}

/// Whether `url` passes the default policy (CDN host or preview reference).
pub fn is_allowed_image(url: Option<&str>) -> bool {
    ImagePolicy::default().is_allowed(url)
}

/// Insert delivery transformations into a Cloudinary upload URL.
///
/// URLs without the `/image/upload/` segment, or that already carry
/// transformations, are returned unchanged.
fn optimize_cdn_url(url: &str, width: u32) -> String {
    let Some(at) = url.find(UPLOAD_SEGMENT) else {
        return url.to_string();
    };
    let (head, rest) = url.split_at(at + UPLOAD_SEGMENT.len());
    let first_segment = rest.split('/').next().unwrap_or_default();
    if first_segment.contains(',') || first_segment.starts_with("f_") || first_segment.starts_with("w_") {
        return url.to_string();
    }
    format!("{head}f_auto,q_auto,w_{width}/{rest}")
}
