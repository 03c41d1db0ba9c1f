//! Share-link canonicalization.
//!
//! File-sharing links copied from a browser look like
//! `https://drive.google.com/file/d/<ID>/view?usp=sharing`. The portal
//! needs two stable forms of each link: a direct-download endpoint and the
//! plain viewer page. Both rewrites are idempotent; anything that does not
//! look like a share link is returned unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// Origin used when a share link has no `scheme://host` prefix.
pub const DEFAULT_ORIGIN: &str = "https://drive.google.com";

/// Placeholder URL for resources without a link.
pub const PLACEHOLDER_URL: &str = "#";

/// `/file/d/<ID>/view` or `/file/d/<ID>/edit`.
static DOWNLOADABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*://[^/?#]+))?.*?/file/d/([^/?#]+)/(?:view|edit)")
        .expect("valid regex")
});

/// `/file/d/<ID>/view`, `/file/d/<ID>/edit` or `/file/d/<ID>/uc`.
static VIEWABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.\-]*://[^/?#]+))?.*?/file/d/([^/?#]+)/(?:view|edit|uc)")
        .expect("valid regex")
});

fn is_passthrough(url: &str) -> bool {
    url.is_empty() || url == PLACEHOLDER_URL
}

/// Extracts `(origin, file_id)` from a share link matching `re`.
fn share_parts<'a>(re: &Regex, url: &'a str) -> Option<(&'a str, &'a str)> {
    let caps = re.captures(url)?;
    let origin = caps.get(1).map_or(DEFAULT_ORIGIN, |m| m.as_str());
    let id = caps.get(2)?.as_str();
    Some((origin, id))
}

/// Rewrites a share link into its direct-download form.
///
/// `https://<host>/file/d/<ID>/view` becomes
/// `https://<host>/uc?export=download&id=<ID>`.
#[must_use]
pub fn canon_download(url: &str) -> String {
    if is_passthrough(url) {
        return url.to_string();
    }
    share_parts(&DOWNLOADABLE_RE, url).map_or_else(
        || url.to_string(),
        |(origin, id)| format!("{origin}/uc?export=download&id={id}"),
    )
}

/// Rewrites a share link into its canonical viewer form,
/// `https://<host>/file/d/<ID>/view`.
#[must_use]
pub fn canon_view(url: &str) -> String {
    if is_passthrough(url) {
        return url.to_string();
    }
    share_parts(&VIEWABLE_RE, url).map_or_else(
        || url.to_string(),
        |(origin, id)| format!("{origin}/file/d/{id}/view"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHARE: &str = "https://drive.google.com/file/d/ABC123/view?usp=sharing";

    #[test]
    fn download_rewrites_view_links() {
        assert_eq!(
            canon_download(SHARE),
            "https://drive.google.com/uc?export=download&id=ABC123"
        );
    }

    #[test]
    fn download_rewrites_edit_links() {
        assert_eq!(
            canon_download("https://drive.google.com/file/d/X-9_z/edit"),
            "https://drive.google.com/uc?export=download&id=X-9_z"
        );
    }

    #[test]
    fn download_keeps_host_of_input() {
        assert_eq!(
            canon_download("http://files.example.edu/a/b/file/d/ID/view"),
            "http://files.example.edu/uc?export=download&id=ID"
        );
    }

    #[test]
    fn download_leaves_uc_links_alone() {
        let url = "https://drive.google.com/file/d/ABC/uc";
        assert_eq!(canon_download(url), url);
    }

    #[test]
    fn view_rewrites_all_share_forms() {
        for suffix in ["view?usp=sharing", "edit#heading", "uc"] {
            let url = format!("https://drive.google.com/file/d/ABC/{suffix}");
            assert_eq!(canon_view(&url), "https://drive.google.com/file/d/ABC/view");
        }
    }

    #[test]
    fn relative_share_path_uses_default_origin() {
        assert_eq!(
            canon_download("/file/d/ABC/view"),
            "https://drive.google.com/uc?export=download&id=ABC"
        );
        assert_eq!(canon_view("/file/d/ABC/edit"), "https://drive.google.com/file/d/ABC/view");
    }

    #[test]
    fn placeholders_pass_through() {
        for url in ["", "#"] {
            assert_eq!(canon_download(url), url);
            assert_eq!(canon_view(url), url);
        }
    }

    #[test]
    fn unrelated_urls_pass_through() {
        let url = "https://example.com/notes.pdf";
        assert_eq!(canon_download(url), url);
        assert_eq!(canon_view(url), url);
    }

    #[test]
    fn rewrites_are_idempotent() {
        let inputs = [
            SHARE,
            "https://drive.google.com/file/d/ABC/edit",
            "https://drive.google.com/file/d/ABC/uc",
            "https://drive.google.com/uc?export=download&id=ABC",
            "/file/d/ABC/view",
            "https://example.com/notes.pdf",
            "#",
            "",
        ];
        for url in inputs {
            let once = canon_download(url);
            assert_eq!(canon_download(&once), once, "download: {url}");
            let once = canon_view(url);
            assert_eq!(canon_view(&once), once, "view: {url}");
        }
    }
}
