#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Loopback stand-in for the catalog service, serving `/all`, `/search`,
/// `/random` and `/add` from an in-memory list. `/search` matches the
/// location exactly and answers 404 when nothing matches, like the real one.
pub struct StubCatalog {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct StubState {
    cafes: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubState {
    fn log(&self, line: String) {
        self.requests.lock().expect("request log").push(line);
    }

    fn cafes(&self) -> Vec<Value> {
        self.cafes.lock().expect("cafe store").clone()
    }
}

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    loc: String,
}

async fn all_handler(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    state.log("GET /all".to_string());
    (StatusCode::OK, Json(json!({ "cafes": state.cafes() })))
}

async fn search_handler(
    State(state): State<StubState>,
    Query(params): Query<SearchParams>,
) -> (StatusCode, Json<Value>) {
    state.log(format!("GET /search?loc={}", params.loc));
    let hits: Vec<Value> = state
        .cafes()
        .into_iter()
        .filter(|c| c["location"] == params.loc.as_str())
        .collect();
    if hits.is_empty() {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Sorry we dont have a cafe at that location. :("})),
        );
    }
    (StatusCode::OK, Json(json!({ "cafes": hits })))
}

async fn random_handler(State(state): State<StubState>) -> (StatusCode, Json<Value>) {
    state.log("GET /random".to_string());
    match state.cafes().into_iter().next() {
        Some(c) => (StatusCode::OK, Json(json!({ "cafe": c }))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "No cafes found! :("})),
        ),
    }
}

async fn add_handler(
    State(state): State<StubState>,
    Json(mut cafe): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.log("POST /add".to_string());
    let mut cafes = state.cafes.lock().expect("cafe store");
    cafe["id"] = json!(cafes.len() + 1);
    cafes.push(cafe.clone());
    (
        StatusCode::OK,
        Json(json!({"success": "Successfully added the new cafe. :)", "cafe": cafe})),
    )
}

impl StubCatalog {
    pub fn start(cafes: Vec<Value>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            cafes: Arc::new(Mutex::new(cafes)),
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/all", get(all_handler))
            .route("/search", get(search_handler))
            .route("/random", get(random_handler))
            .route("/add", post(add_handler))
            .with_state(state);

        // The port is live once `start` returns; the runtime only adopts it.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub catalog");
        listener.set_nonblocking(true).expect("nonblocking listener");
        let url = format!("http://{}", listener.local_addr().expect("local addr"));

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("stub runtime");
            runtime.block_on(async move {
                let listener = TcpListener::from_std(listener).expect("tokio listener");
                axum::serve(listener, app).await.expect("serve stub catalog");
            });
        });
        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("request log").clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with(prefix))
            .count()
    }
}

pub fn cafe(id: i64, name: &str, location: &str, wifi: bool, sockets: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "map_url": format!("https://www.google.com/maps/place/{}/@51.52{},-0.08{},17z", name, id, id),
        "img_url": "",
        "location": location,
        "has_sockets": sockets,
        "has_toilet": true,
        "has_wifi": wifi,
        "can_take_calls": false,
        "seats": "20-30",
        "coffee_price": "£2.80"
    })
}

pub fn three_cafes() -> Vec<Value> {
    vec![
        cafe(1, "Grind", "Shoreditch", true, false),
        cafe(2, "Workshop", "Clerkenwell", false, true),
        cafe(3, "Ozone", "shoreditch", true, false),
    ]
}

pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub catalog: StubCatalog,
    cargo_home: PathBuf,
    rustup_home: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_cafes(three_cafes())
    }

    pub fn with_cafes(cafes: Vec<Value>) -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&home).expect("create isolated home");

        let orig_home = std::env::var("HOME").unwrap_or_default();
        let cargo_home = PathBuf::from(&orig_home).join(".cargo");
        let rustup_home = PathBuf::from(&orig_home).join(".rustup");

        Self {
            _tmp: tmp,
            home,
            catalog: StubCatalog::start(cafes),
            cargo_home,
            rustup_home,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("cafes");
        cmd.env("HOME", &self.home)
            .env("CAFES_API_URL", &self.catalog.url)
            .env_remove("CAFES_LOG")
            .env("CARGO_HOME", &self.cargo_home)
            .env("RUSTUP_HOME", &self.rustup_home);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    pub fn run_json_failure(&self, args: &[&str]) -> Value {
        let mut cmd = self.cmd();
        let out = cmd
            .arg("--json")
            .args(args)
            .assert()
            .failure()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("error json output")
    }
}
