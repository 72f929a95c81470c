// src/middleware/public_assets.rs

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// The editor page. Only the guarded routes may serve it.
const EDITOR_PAGE: &str = "index.html";

/// Resolves a request path the way the static file service does: percent
/// decoded, leading slashes and `.` segments dropped. `None` when the path
/// cannot name a file inside the public directory.
fn resolve_asset_path(request_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(request_path.trim_start_matches('/'))
        .decode_utf8()
        .ok()?;

    let mut resolved = PathBuf::new();
    for component in Path::new(&*decoded).components() {
        match component {
            Component::Normal(segment) => resolved.push(segment),
            Component::CurDir => {}
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => return None,
        }
    }
    Some(resolved)
}

fn is_editor_page(resolved: &Path) -> bool {
    resolved.as_os_str().is_empty()
        || resolved
            .to_str()
            .map_or(false, |p| p.eq_ignore_ascii_case(EDITOR_PAGE))
}

/// Middleware in front of the public directory that refuses any spelling of
/// the editor page, so it is only reachable through the session guard.
pub async fn public_asset_filter(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if resolve_asset_path(path).map_or(false, |resolved| is_editor_page(&resolved)) {
        warn!(url.path = %path, "Refused unguarded request for the editor page");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/index.html")]
    #[case("//index.html")]
    #[case("/%69ndex.html")]
    #[case("/./index.html")]
    #[case("/INDEX.HTML")]
    #[case("/")]
    #[case("//")]
    fn test_editor_page_aliases_are_detected(#[case] path: &str) {
        let resolved = resolve_asset_path(path).unwrap();
        assert!(is_editor_page(&resolved), "{path} should resolve to the editor page");
    }

    #[rstest]
    #[case("/login.html")]
    #[case("/css/style.css")]
    #[case("/js/main.js")]
    #[case("/docs/index.html.bak")]
    fn test_other_assets_pass(#[case] path: &str) {
        let resolved = resolve_asset_path(path).unwrap();
        assert!(!is_editor_page(&resolved), "{path} should be served");
    }

    #[test]
    fn test_parent_segments_do_not_resolve() {
        assert!(resolve_asset_path("/css/../index.html").is_none());
        assert!(resolve_asset_path("/%2e%2e/secret").is_none());
    }
}
