#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;

use vocab_garden::config::Config;

pub const EASY: &str = "word,meaning\napple,사과\nbook,책\nwater,물\nhouse,집\nfriend,친구\n";
pub const MEDIUM: &str = "journey,여행\nborrow,빌리다\nhonest,정직한\n";
pub const HARD: &str = "ephemeral,덧없는\nmeticulous,꼼꼼한\n";

pub const USERS: &str = r#"{
  "demo": { "password": "demo", "name": "Demo Farmer", "coins": 20, "score": 0, "inventory": {} },
  "poor": { "password": "pw", "name": "Poor Farmer", "coins": 4, "score": 0, "inventory": { "apple": 1 } }
}"#;

pub struct TestApp {
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn users_file(&self) -> PathBuf {
        self.dir.path().join("users.json")
    }

    pub fn users_on_disk(&self) -> Value {
        let bytes = std::fs::read(self.users_file()).expect("users file");
        serde_json::from_slice(&bytes).expect("users json")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        use tower::ServiceExt;
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        log_level: "warn".to_string(),
        users_file: dir.path().join("users.json"),
        words_easy: dir.path().join("words_easy.csv"),
        words_medium: dir.path().join("words_medium.csv"),
        words_hard: dir.path().join("words_hard.csv"),
        public_dir: dir.path().join("public"),
        demo_user_id: "demo".to_string(),
        seed_demo_user: true,
    }
}

pub async fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("words_easy.csv"), EASY).unwrap();
    std::fs::write(dir.path().join("words_medium.csv"), MEDIUM).unwrap();
    std::fs::write(dir.path().join("words_hard.csv"), HARD).unwrap();
    std::fs::write(dir.path().join("users.json"), USERS).unwrap();
    std::fs::create_dir_all(dir.path().join("public")).unwrap();
    std::fs::write(
        dir.path().join("public").join("index.html"),
        "<html><body>login</body></html>",
    )
    .unwrap();

    let state = vocab_garden::build_state(test_config(&dir))
        .await
        .expect("state builds");
    TestApp {
        router: vocab_garden::create_app(state),
        dir,
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_as(uri: &str, user_id: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("x-user-id", user_id)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    post_json_as(uri, body, None)
}

pub fn post_json_as(uri: &str, body: Value, user_id: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(user_id) = user_id {
        builder = builder.header("x-user-id", user_id);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
