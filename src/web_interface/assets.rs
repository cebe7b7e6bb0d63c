use rust_embed::RustEmbed;
use warp::{http::StatusCode, reply, Reply};

use super::types::ApiError;

/// Panel frontend bundled into the binary at build time.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/static"]
struct PanelAssets;

/// Looks up an embedded asset and replies with its guessed MIME type.
///
/// Every bundled asset is text (HTML, CSS, JS), so bodies go out as UTF-8
/// strings.
pub fn serve_asset(path: &str) -> warp::reply::Response {
    match PanelAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            let body = String::from_utf8_lossy(content.data.as_ref()).into_owned();
            reply::with_header(body, "Content-Type", mime.as_ref()).into_response()
        }
        None => reply::with_status(
            reply::json(&ApiError {
                message: format!("No such asset: {path}"),
            }),
            StatusCode::NOT_FOUND,
        )
        .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_contains_the_panel() {
        for name in ["index.html", "app.js", "style.css"] {
            assert!(PanelAssets::get(name).is_some(), "missing asset {name}");
        }
    }

    #[test]
    fn test_serve_known_and_unknown_assets() {
        let found = serve_asset("index.html");
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(
            found.headers().get("Content-Type").unwrap(),
            "text/html"
        );

        let missing = serve_asset("nope.html");
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
