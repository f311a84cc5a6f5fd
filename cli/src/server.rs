pub mod http {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::net::SocketAddr;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower_http::cors::CorsLayer;
    use tower_http::trace::TraceLayer;
    use tracing::{error, info, warn};
    use waypoint::{DisplayFact, Engine, Session, SessionState, Transcript, WaypointError};

    /// Loaded trees plus every open session, keyed by session id
    struct AppState {
        engine: Engine,
        sessions: Mutex<HashMap<u64, Session>>,
        next_id: AtomicU64,
    }

    type SharedState = Arc<AppState>;
    type ApiError = (StatusCode, Json<ErrorResponse>);

    #[derive(Debug, Deserialize)]
    struct CreateSessionRequest {
        tree: String,
    }

    #[derive(Debug, Deserialize)]
    struct AnswerRequest {
        question_id: String,
        value: String,
    }

    #[derive(Debug, Serialize)]
    struct TreeSummary {
        name: String,
        root: String,
        questions: usize,
        rules: usize,
    }

    #[derive(Debug, Serialize)]
    struct SessionView {
        session_id: u64,
        tree: String,
        state: &'static str,
        display: DisplayFact,
        transcript: Transcript,
    }

    #[derive(Debug, Serialize)]
    struct ErrorResponse {
        error: String,
    }

    pub async fn start_server(engine: Engine, host: &str, port: u16) -> anyhow::Result<()> {
        crate::init_tracing("waypoint=info,tower_http=info");

        let app = router(engine).layer(TraceLayer::new_for_http());

        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        info!("Waypoint server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    fn router(engine: Engine) -> Router {
        let state = Arc::new(AppState {
            engine,
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        });

        Router::new()
            .route("/health", get(health_check))
            .route("/trees", get(list_trees))
            .route("/sessions", post(create_session))
            .route("/sessions/:id", get(get_session).delete(delete_session))
            .route("/sessions/:id/answer", post(answer))
            .route("/sessions/:id/reset", post(reset_session))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    async fn health_check() -> impl IntoResponse {
        Json(serde_json::json!({
            "status": "ok",
            "service": "waypoint",
            "version": env!("CARGO_PKG_VERSION")
        }))
    }

    async fn list_trees(State(state): State<SharedState>) -> impl IntoResponse {
        let trees: Vec<TreeSummary> = state
            .engine
            .list_trees()
            .into_iter()
            .filter_map(|name| {
                state.engine.get_tree(&name).map(|t| TreeSummary {
                    root: t.root_id().to_string(),
                    questions: t.question_count(),
                    rules: t.rule_count(),
                    name,
                })
            })
            .collect();
        Json(trees)
    }

    async fn create_session(
        State(state): State<SharedState>,
        Json(payload): Json<CreateSessionRequest>,
    ) -> Result<impl IntoResponse, ApiError> {
        let session = state
            .engine
            .session(&payload.tree)
            .map_err(|e| error_response(&e))?;

        let id = state.next_id.fetch_add(1, Ordering::Relaxed);
        let view = view(id, &session);
        state.sessions.lock().await.insert(id, session);
        info!(session_id = id, tree = %payload.tree, "session created");

        Ok((StatusCode::CREATED, Json(view)))
    }

    async fn get_session(
        State(state): State<SharedState>,
        Path(id): Path<u64>,
    ) -> Result<Json<SessionView>, ApiError> {
        let sessions = state.sessions.lock().await;
        let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        Ok(Json(view(id, session)))
    }

    async fn answer(
        State(state): State<SharedState>,
        Path(id): Path<u64>,
        Json(payload): Json<AnswerRequest>,
    ) -> Result<Json<SessionView>, ApiError> {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        session
            .answer(&payload.question_id, &payload.value)
            .map_err(|e| error_response(&e))?;

        Ok(Json(view(id, session)))
    }

    async fn reset_session(
        State(state): State<SharedState>,
        Path(id): Path<u64>,
    ) -> Result<Json<SessionView>, ApiError> {
        let mut sessions = state.sessions.lock().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        session.reset().map_err(|e| error_response(&e))?;

        Ok(Json(view(id, session)))
    }

    async fn delete_session(
        State(state): State<SharedState>,
        Path(id): Path<u64>,
    ) -> Result<StatusCode, ApiError> {
        match state.sessions.lock().await.remove(&id) {
            Some(_) => {
                info!(session_id = id, "session closed");
                Ok(StatusCode::NO_CONTENT)
            }
            None => Err(session_not_found(id)),
        }
    }

    fn view(id: u64, session: &Session) -> SessionView {
        SessionView {
            session_id: id,
            tree: session.tree().name().to_string(),
            state: match session.state() {
                SessionState::AwaitingAnswer => "awaiting_answer",
                SessionState::Complete => "complete",
            },
            display: session.current().clone(),
            transcript: session.transcript(),
        }
    }

    fn session_not_found(id: u64) -> ApiError {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Session '{}' not found", id),
            }),
        )
    }

    fn error_response(e: &WaypointError) -> ApiError {
        let status = match e {
            WaypointError::InvalidAnswer { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            WaypointError::InconsistentState(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WaypointError::Engine(msg) if msg.ends_with("not found") => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };

        if status.is_server_error() {
            error!("Session failed: {}", e);
        } else {
            warn!("Request rejected: {}", e);
        }

        (
            status,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
    }

}
