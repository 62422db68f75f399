//! Locating the archive link on the download-listing page.
//!
//! This is tied to the current markup of the listing page. Everything that
//! knows about that markup lives behind [`LinkExtractor`].

use crate::error::{GoupError, Result};
use scraper::{Html, Selector};
use url::Url;

pub trait LinkExtractor {
    /// Returns the absolute URL of the download link found in `html`.
    /// Relative links are resolved against `base`, the page's own URL.
    fn extract(&self, html: &str, base: &Url) -> Result<Url>;
}

/// Picks the first `.<class>` element whose `href` contains the platform
/// filter, e.g. `.downloadBox[href*="linux"]`.
#[derive(Debug, Clone)]
pub struct DownloadBoxExtractor {
    class: String,
    platform: String,
}

impl DownloadBoxExtractor {
    pub fn new<C: Into<String>, P: Into<String>>(class: C, platform: P) -> Self {
        Self {
            class: class.into(),
            platform: platform.into(),
        }
    }

    fn selector_source(&self) -> String {
        let platform = self.platform.replace('\\', "\\\\").replace('"', "\\\"");
        format!(".{}[href*=\"{}\"]", self.class, platform)
    }

    fn selector(&self) -> Result<Selector> {
        let source = self.selector_source();
        Selector::parse(&source)
            .map_err(|e| GoupError::parse_error(format!("invalid selector '{source}': {e}")))
    }
}

impl LinkExtractor for DownloadBoxExtractor {
    fn extract(&self, html: &str, base: &Url) -> Result<Url> {
        let selector = self.selector()?;
        let document = Html::parse_document(html);

        let href = document
            .select(&selector)
            .next()
            .and_then(|element| element.value().attr("href"))
            .ok_or_else(|| {
                GoupError::not_found(format!(
                    "download link not found (no '{}' link for '{}' on {base})",
                    self.class, self.platform
                ))
            })?;

        log::debug!("matched download link {href}");

        base.join(href.trim())
            .map_err(|e| GoupError::parse_error(format!("invalid download link '{href}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LISTING: &str = r#"
<!DOCTYPE html>
<html>
<body>
  <h2 id="featured">Featured downloads</h2>
  <div class="downloadWrapper">
    <a class="download downloadBox" href="/dl/go1.22.0.windows-amd64.msi">
      <div class="platform">Microsoft Windows</div>
    </a>
    <a class="download downloadBox" href="/dl/go1.22.0.darwin-arm64.pkg">
      <div class="platform">Apple macOS (ARM64)</div>
    </a>
    <a class="download downloadBox" href="/dl/go1.22.0.linux-amd64.tar.gz">
      <div class="platform">Linux</div>
    </a>
    <a class="download downloadBox" href="/dl/go1.22.0.src.tar.gz">
      <div class="platform">Source</div>
    </a>
  </div>
  <table class="downloadtable">
    <tr><td><a class="download" href="/dl/go1.22.0.linux-arm64.tar.gz">go1.22.0.linux-arm64.tar.gz</a></td></tr>
  </table>
</body>
</html>
"#;

    fn page() -> Url {
        Url::parse("https://go.dev/dl/").unwrap()
    }

    fn linux() -> DownloadBoxExtractor {
        DownloadBoxExtractor::new("downloadBox", "linux")
    }

    #[test]
    fn test_extracts_linux_download_box() {
        let url = linux().extract(LISTING, &page()).unwrap();
        assert_eq!(
            url.as_str(),
            format!("{}{}", "https://go.dev", "/dl/go1.22.0.linux-amd64.tar.gz")
        );
    }

    #[test]
    fn test_first_match_wins() {
        let html = r#"
            <a class="downloadBox" href="/dl/go1.21.7.linux-amd64.tar.gz">old</a>
            <a class="downloadBox" href="/dl/go1.22.0.linux-amd64.tar.gz">new</a>
        "#;
        let url = linux().extract(html, &page()).unwrap();
        assert_eq!(url.as_str(), "https://go.dev/dl/go1.21.7.linux-amd64.tar.gz");
    }

    #[test]
    fn test_platform_filter_ignores_plain_download_links() {
        let extractor = DownloadBoxExtractor::new("downloadBox", "linux-arm64");
        let err = extractor.extract(LISTING, &page()).unwrap_err();
        assert!(matches!(err, GoupError::NotFound { .. }));
    }

    #[test]
    fn test_no_matching_element() {
        let html = r#"<a class="downloadBox" href="/dl/go1.22.0.windows-amd64.msi">win</a>"#;
        let err = linux().extract(html, &page()).unwrap_err();
        assert!(matches!(err, GoupError::NotFound { .. }));
    }

    #[test]
    fn test_download_box_without_href() {
        let html = r#"<a class="downloadBox">linux</a>"#;
        let err = linux().extract(html, &page()).unwrap_err();
        assert!(matches!(err, GoupError::NotFound { .. }));
    }

    #[test]
    fn test_absolute_href_is_kept() {
        let html = r#"<a class="downloadBox" href="https://dl.google.com/go/go1.22.0.linux-amd64.tar.gz">x</a>"#;
        let url = linux().extract(html, &page()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dl.google.com/go/go1.22.0.linux-amd64.tar.gz"
        );
    }

    #[test]
    fn test_resolves_against_custom_page() {
        let base = Url::parse("http://127.0.0.1:8080/mirror/dl").unwrap();
        let url = linux().extract(LISTING, &base).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/dl/go1.22.0.linux-amd64.tar.gz"
        );
    }

    #[test]
    fn test_invalid_class_is_parse_error() {
        let extractor = DownloadBoxExtractor::new("download Box[", "linux");
        let err = extractor.extract(LISTING, &page()).unwrap_err();
        assert!(matches!(err, GoupError::Parse { .. }));
    }

    #[test]
    fn test_quotes_in_platform_are_escaped() {
        let extractor = DownloadBoxExtractor::new("downloadBox", "li\"nux");
        assert_eq!(extractor.selector_source(), r#".downloadBox[href*="li\"nux"]"#);
        let err = extractor.extract(LISTING, &page()).unwrap_err();
        assert!(matches!(err, GoupError::NotFound { .. }));
    }
}
