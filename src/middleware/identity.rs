use axum::body::Body;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::AppState;

pub const USER_COOKIE: &str = "user_id";
pub const USER_HEADER: &str = "x-user-id";

/// The user a request acts on behalf of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub is_demo: bool,
}

pub async fn resolve_identity(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let user = identify(req.headers(), &state.config().demo_user_id);
    tracing::trace!(user_id = %user.id, demo = user.is_demo, "identity resolved");
    req.extensions_mut().insert(user);
    next.run(req).await
}

/// Cookie first, then header, then the configured demo user.
pub fn identify(headers: &HeaderMap, demo_user_id: &str) -> CurrentUser {
    let explicit = get_cookie(headers, USER_COOKIE)
        .map(|value| decode_cookie_value(&value))
        .or_else(|| {
            headers
                .get(USER_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        })
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());

    match explicit {
        Some(id) => CurrentUser {
            is_demo: id == demo_user_id,
            id,
        },
        None => CurrentUser {
            id: demo_user_id.to_string(),
            is_demo: true,
        },
    }
}

pub fn user_cookie_header(user_id: &str) -> Option<HeaderValue> {
    let cookie = format!(
        "{USER_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax",
        urlencoding::encode(user_id)
    );
    HeaderValue::from_str(&cookie).ok()
}

pub fn clear_user_cookie_header() -> HeaderValue {
    HeaderValue::from_static(
        "user_id=; Path=/; HttpOnly; SameSite=Lax; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0",
    )
}

fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Falls back to the raw value when the decoded bytes are not UTF-8.
fn decode_cookie_value(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|value| value.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_falls_back_to_demo_user() {
        let user = identify(&HeaderMap::new(), "demo");
        assert_eq!(
            user,
            CurrentUser {
                id: "demo".to_string(),
                is_demo: true
            }
        );
    }

    #[test]
    fn test_cookie_wins_over_header() {
        let map = headers(&[
            ("cookie", "theme=dark; user_id=kim%40mail.com"),
            ("x-user-id", "lee"),
        ]);
        let user = identify(&map, "demo");
        assert_eq!(user.id, "kim@mail.com");
        assert!(!user.is_demo);
    }

    #[test]
    fn test_header_used_without_cookie() {
        let map = headers(&[("x-user-id", " lee ")]);
        assert_eq!(identify(&map, "demo").id, "lee");
    }

    #[test]
    fn test_invalid_utf8_cookie_kept_raw() {
        let map = headers(&[("cookie", "user_id=%FF%FE")]);
        assert_eq!(identify(&map, "demo").id, "%FF%FE");
    }

    #[test]
    fn test_blank_cookie_falls_back() {
        let map = headers(&[("cookie", "user_id=")]);
        assert!(identify(&map, "demo").is_demo);
    }

    #[test]
    fn test_cookie_value_round_trips() {
        let header = user_cookie_header("kim lee;x").unwrap();
        let raw = header.to_str().unwrap();
        let value = raw
            .split(';')
            .next()
            .and_then(|pair| pair.split_once('='))
            .map(|(_, v)| v)
            .unwrap();
        assert!(!value.contains(' ') && !value.contains(';'));
        assert_eq!(decode_cookie_value(value), "kim lee;x");
    }
}
