use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form};
use serde::Deserialize;

use crate::middleware::identity::{clear_user_cookie_header, user_cookie_header, CurrentUser};
use crate::response::AppError;
use crate::services::account::{self, Signup};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    userid: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    password_confirm: String,
    #[serde(default)]
    username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            return failure_page("Sign-up failed", "/signup.html", AppError::from(rejection));
        }
    };

    let signup = Signup {
        user_id: &form.userid,
        password: &form.password,
        password_confirm: &form.password_confirm,
        name: &form.username,
    };
    match account::register(&state.users(), signup).await {
        Ok(()) => html_page(
            StatusCode::OK,
            "Sign-up complete",
            &format!("Welcome, {}! Your account is ready.", form.username.trim()),
            "/",
            "Go to login",
        ),
        Err(err) => {
            tracing::info!(user_id = %form.userid, error = %err, "sign-up rejected");
            failure_page("Sign-up failed", "/signup.html", AppError::from(err))
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            return failure_page("Login failed", "/", AppError::from(rejection));
        }
    };

    let user_id = form.email.trim();
    if !account::login(&state.users(), user_id, &form.password).await {
        return html_page(
            StatusCode::UNAUTHORIZED,
            "Login failed",
            "The ID or password is incorrect.",
            "/",
            "Try again",
        );
    }

    let mut headers = HeaderMap::new();
    if let Some(cookie) = user_cookie_header(user_id) {
        headers.insert(header::SET_COOKIE, cookie);
    }
    (headers, Redirect::to("/home.html")).into_response()
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    state.sessions().clear(&user.id);

    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, clear_user_cookie_header());
    (headers, Redirect::to("/")).into_response()
}

fn failure_page(title: &str, retry_href: &str, err: AppError) -> Response {
    let (link, label) = if err.status() == StatusCode::INTERNAL_SERVER_ERROR {
        ("/", "Back to start")
    } else {
        (retry_href, "Try again")
    };
    html_page(err.status(), title, err.public_message(), link, label)
}

fn html_page(
    status: StatusCode,
    title: &str,
    message: &str,
    link_href: &str,
    link_label: &str,
) -> Response {
    let body = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <link rel=\"stylesheet\" href=\"/css/style.css\">\n</head>\n<body>\n<main class=\"card\">\n\
         <h1>{title}</h1>\n<p>{message}</p>\n<a class=\"button\" href=\"{href}\">{label}</a>\n</main>\n</body>\n</html>\n",
        title = escape_html(title),
        message = escape_html(message),
        href = escape_html(link_href),
        label = escape_html(link_label),
    );
    (status, Html(body)).into_response()
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"Kim\" & 'Lee'</b>"),
            "&lt;b&gt;&quot;Kim&quot; &amp; &#39;Lee&#39;&lt;/b&gt;"
        );
    }
}
