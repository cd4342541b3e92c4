//! Image URL normalization.

/// Makes a backend image path absolute against `base_url`.
///
/// `http://`, `https://`, `data:` and protocol-relative `//host/...` URLs
/// are returned unchanged (schemes match case-insensitively), so the
/// function is idempotent. Otherwise the base URL (trailing slashes
/// trimmed) is joined to the path with exactly one `/`.
#[must_use]
pub fn absolute_image_url(base_url: &str, path: &str) -> String {
    if path.starts_with("//") || is_absolute(path) {
        return path.to_string();
    }
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

fn is_absolute(path: &str) -> bool {
    ["http://", "https://", "data:"].iter().any(|scheme| {
        path.get(..scheme.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(scheme))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_upload_path_is_prefixed() {
        assert_eq!(
            absolute_image_url("http://api.example.com", "/uploads/x.jpg"),
            "http://api.example.com/uploads/x.jpg"
        );
    }

    #[test]
    fn missing_leading_slash_is_added() {
        assert_eq!(
            absolute_image_url("http://api.example.com/", "uploads/x.jpg"),
            "http://api.example.com/uploads/x.jpg"
        );
    }

    #[test]
    fn absolute_urls_pass_through() {
        for url in [
            "https://cdn.example.com/a.png",
            "http://other/b.jpg",
            "data:image/png;base64,AAAA",
        ] {
            assert_eq!(absolute_image_url("http://api.example.com", url), url);
        }
    }

    #[test]
    fn scheme_match_ignores_case_and_keeps_protocol_relative() {
        for url in [
            "HTTPS://CDN.example.com/a.png",
            "Http://other/b.jpg",
            "DATA:image/png;base64,AAAA",
            "//cdn.example.com/x.jpg",
        ] {
            assert_eq!(absolute_image_url("http://api.example.com", url), url);
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = absolute_image_url("http://api.example.com", "/uploads/x.jpg");
        assert_eq!(absolute_image_url("http://api.example.com", &once), once);
    }
}
