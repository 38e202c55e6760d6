use gacha_core::{
    ActiveFilter, CardView, CelebrationPlan, DrawError, Event, EventBus, GachaSession, RngState,
    ScholarRecord, Viewport,
};
use gacha_data::{load_gacha_config, load_scholars_or_empty};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_ADDR: &str = "0.0.0.0:7878";
const DEFAULT_DATA_PATH: &str = "assets/scholars.json";

type BoxError = Box<dyn std::error::Error>;

fn main() -> Result<(), BoxError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("GACHA_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let data_path = std::env::var_os("GACHA_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
    let server = Server::http(addr.as_str()).map_err(|err| err.to_string())?;
    tracing::info!("scholar gacha on http://{addr}");
    let state = Arc::new(Mutex::new(AppState::load(&data_path)?));
    for request in server.incoming_requests() {
        let state = state.clone();
        if let Err(err) = handle_request(request, state, &data_path) {
            tracing::warn!("request error: {err}");
        }
    }
    Ok(())
}

struct AppState {
    session: GachaSession,
    events: EventBus,
}

impl AppState {
    fn load(data_path: &Path) -> Result<Self, BoxError> {
        let assets_dir = data_path.parent().unwrap_or_else(|| Path::new("."));
        let config = load_gacha_config(assets_dir)?;
        let dataset = load_scholars_or_empty(data_path);
        Ok(Self::new(dataset, config, RngState::from_entropy()))
    }

    fn new(dataset: Vec<ScholarRecord>, config: gacha_core::GachaConfig, rng: RngState) -> Self {
        let mut events = EventBus::default();
        events.push(Event::DatasetLoaded {
            count: dataset.len(),
        });
        Self {
            session: GachaSession::new(dataset, config, rng),
            events,
        }
    }
}

#[derive(Serialize)]
struct ApiResponse {
    ok: bool,
    error: Option<String>,
    notice: Option<String>,
    state: UiState,
    pull: Option<UiPull>,
    celebration: Option<CelebrationPlan>,
    events: Vec<Event>,
}

#[derive(Serialize)]
struct UiState {
    filter: ActiveFilter,
    tags: Vec<String>,
    drawn: usize,
    eligible: usize,
    total: usize,
}

#[derive(Serialize)]
struct UiPull {
    card: CardView,
    history_reset: bool,
}

#[derive(Deserialize, Default)]
struct PullRequest {
    #[serde(default)]
    filter: Option<String>,
    #[serde(default)]
    viewport: Option<Viewport>,
}

fn handle_request(
    mut request: tiny_http::Request,
    state: Arc<Mutex<AppState>>,
    data_path: &Path,
) -> Result<(), BoxError> {
    let url = request.url().to_string();
    let route = url.split('?').next().unwrap_or("");
    match (request.method(), route) {
        (&Method::Get, "/") => {
            respond_with_file(request, web_path("index.html"), "text/html; charset=utf-8")?;
        }
        (&Method::Get, "/app.js") => {
            respond_with_file(request, web_path("app.js"), "application/javascript")?;
        }
        (&Method::Get, "/styles.css") => {
            respond_with_file(request, web_path("styles.css"), "text/css; charset=utf-8")?;
        }
        (&Method::Get, "/scholars.json") => {
            respond_with_file(request, data_path.to_path_buf(), "application/json")?;
        }
        (&Method::Get, "/api/state") => {
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            let response = build_response(&mut guard, None, None, None, None);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/pull") => {
            let mut body = String::new();
            request.as_reader().read_to_string(&mut body)?;
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            let response = pull_from_body(&mut guard, &body);
            respond_json(request, response)?;
        }
        (&Method::Post, "/api/reset") => {
            let mut guard = state.lock().map_err(|_| "state lock poisoned")?;
            let AppState { session, events } = &mut *guard;
            session.reset_history(events);
            let response = build_response(&mut guard, None, None, None, None);
            respond_json(request, response)?;
        }
        _ => {
            let response = Response::empty(StatusCode(404));
            request.respond(response)?;
        }
    }
    Ok(())
}

/// Parses a pull request body; a malformed body is answered through `error`.
fn pull_from_body(state: &mut AppState, body: &str) -> ApiResponse {
    let request = if body.trim().is_empty() {
        Ok(PullRequest::default())
    } else {
        serde_json::from_str::<PullRequest>(body)
    };
    match request {
        Ok(request) => apply_pull(state, request),
        Err(err) => {
            tracing::warn!("rejected pull request: {err}");
            build_response(state, Some(format!("invalid pull request: {err}")), None, None, None)
        }
    }
}

/// One draw-and-display cycle. The lock held by the caller keeps it atomic.
fn apply_pull(state: &mut AppState, req: PullRequest) -> ApiResponse {
    if let Some(filter) = req.filter.as_deref() {
        state
            .session
            .set_filter(ActiveFilter::parse(filter), &mut state.events);
    }
    let viewport = req
        .viewport
        .unwrap_or_else(|| Viewport::new(1280.0, 720.0));
    match state.session.pull(&mut state.events) {
        Ok(pull) => {
            let celebration = pull.celebration.map(|tier| {
                state.events.push(Event::CelebrationStarted { tier });
                state.session.plan_celebration(tier, viewport)
            });
            let ui_pull = UiPull {
                card: pull.card,
                history_reset: pull.history_reset,
            };
            build_response(state, None, None, Some(ui_pull), celebration)
        }
        Err(DrawError::NoMatchingCategory(tag)) => {
            let notice = format!("{tag}のカテゴリに該当する学者がいません。");
            build_response(state, None, Some(notice), None, None)
        }
        Err(DrawError::EmptyDataset) => build_response(state, None, None, None, None),
    }
}

fn build_response(
    state: &mut AppState,
    error: Option<String>,
    notice: Option<String>,
    pull: Option<UiPull>,
    celebration: Option<CelebrationPlan>,
) -> ApiResponse {
    let events: Vec<_> = state.events.drain().collect();
    let session = &state.session;
    ApiResponse {
        ok: error.is_none(),
        error,
        notice,
        state: UiState {
            filter: session.filter().clone(),
            tags: session.tags().to_vec(),
            drawn: session.history().len(),
            eligible: session.eligible_count(),
            total: session.dataset().len(),
        },
        pull,
        celebration,
        events,
    }
}

fn web_path(file: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("web")
        .join(file)
}

fn respond_with_file(
    request: tiny_http::Request,
    path: PathBuf,
    content_type: &str,
) -> Result<(), BoxError> {
    let mut file = std::fs::File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    let header = Header::from_bytes(&b"Content-Type"[..], content_type)
        .map_err(|_| "invalid header")?;
    let response = Response::from_data(content).with_header(header);
    request.respond(response)?;
    Ok(())
}

fn respond_json(request: tiny_http::Request, response: ApiResponse) -> Result<(), BoxError> {
    let body = serde_json::to_vec_pretty(&response)?;
    let header = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| "invalid header")?;
    request.respond(Response::from_data(body).with_header(header))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gacha_core::{CelebrationTier, GachaConfig};

    fn state() -> AppState {
        let dataset: Vec<ScholarRecord> = serde_json::from_str(
            r#"[
              {"id": "curie", "name": {"en": "Curie"}, "rarity": "SSR", "tags": ["chemistry"]},
              {"id": "gauss", "name": {"en": "Gauss"}, "rarity": "R", "tags": ["math"]}
            ]"#,
        )
        .expect("parse");
        AppState::new(dataset, GachaConfig::default(), RngState::from_seed(3))
    }

    #[test]
    fn pull_with_filter_returns_card_and_plan() {
        let mut state = state();
        let response = apply_pull(
            &mut state,
            PullRequest {
                filter: Some("chemistry".to_string()),
                viewport: None,
            },
        );
        let pull = response.pull.expect("card");
        assert_eq!(pull.card.id, "curie");
        let plan = response.celebration.expect("ssr plan");
        assert_eq!(plan.tier, CelebrationTier::Top);
        assert_eq!(plan.particles.len(), 20);
        assert_eq!(response.state.drawn, 1);
        assert!(response
            .events
            .iter()
            .any(|event| matches!(event, Event::CelebrationStarted { .. })));
    }

    #[test]
    fn unmatched_filter_returns_notice_only() {
        let mut state = state();
        let response = apply_pull(
            &mut state,
            PullRequest {
                filter: Some("physics".to_string()),
                viewport: None,
            },
        );
        assert!(response.pull.is_none());
        assert!(response.notice.expect("notice").contains("physics"));
        assert_eq!(response.state.drawn, 0);
    }

    #[test]
    fn malformed_pull_body_reports_error() {
        let mut state = state();
        let response = pull_from_body(&mut state, "{\"filter\": 3");
        assert!(!response.ok);
        assert!(response.error.expect("error").starts_with("invalid pull request"));
        assert!(response.pull.is_none());
        assert_eq!(response.state.drawn, 0);

        let response = pull_from_body(&mut state, "  ");
        assert!(response.ok);
        assert!(response.error.is_none());
        assert!(response.pull.is_some());
    }

    #[test]
    fn common_pull_has_no_celebration() {
        let mut state = state();
        let response = apply_pull(
            &mut state,
            PullRequest {
                filter: Some("math".to_string()),
                viewport: None,
            },
        );
        assert_eq!(response.pull.expect("card").card.id, "gauss");
        assert!(response.celebration.is_none());
    }
}
