/// Turn a stored `url` into something an `<img>` can load.
/// Absolute URLs pass through; storage paths are joined onto `storage_base`.
pub fn resolve_image_src(url: &str, storage_base: Option<&str>) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        return url.to_string();
    }

    match storage_base.map(str::trim).filter(|base| !base.is_empty()) {
        Some(base) => format!(
            "{}/{}",
            base.trim_end_matches('/'),
            url.trim_start_matches('/')
        ),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_urls_pass_through() {
        let url = "https://example.com/photo1.jpg";
        assert_eq!(resolve_image_src(url, Some("https://cdn.example")), url);
        assert_eq!(resolve_image_src("http://x/y.png", None), "http://x/y.png");
    }

    #[test]
    fn storage_paths_join_with_one_slash() {
        let base = Some("https://cdn.example/bucket/");
        assert_eq!(
            resolve_image_src("drive/1_a.jpg", base),
            "https://cdn.example/bucket/drive/1_a.jpg"
        );
        assert_eq!(
            resolve_image_src("/drive/1_a.jpg", Some("https://cdn.example/bucket")),
            "https://cdn.example/bucket/drive/1_a.jpg"
        );
    }

    #[test]
    fn no_base_leaves_the_path() {
        assert_eq!(resolve_image_src("drive/1_a.jpg", None), "drive/1_a.jpg");
        assert_eq!(resolve_image_src("drive/1_a.jpg", Some("  ")), "drive/1_a.jpg");
    }
}
