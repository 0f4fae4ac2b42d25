use axum::{
    Router,
    extract::rejection::JsonRejection,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Json,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ActivityEntryRes, ActivityLogsRes, AuthCheckRes, DownloadRes, ErrorRes, FileCheckRes,
    FileEntryRes, HealthRes, HealthService, ListFilesRes, LoginReq, LoginRes, MessageRes,
    OpenFileRes,
};
use filevault_auth::{AuthConfig, AuthError, AuthService};
use filevault_core::{
    AccessAction, AccessLogEntry, ActivityLog, CatalogService, CoreError, FileEntry, FileResolver,
    MemoryStore, Resolved, User,
};

mod drive;
mod seed;

use drive::GoogleDriveGateway;

/// Application state shared across REST API handlers.
#[derive(Clone)]
struct AppState {
    auth: AuthService,
    catalog: CatalogService,
    resolver: FileResolver,
    activity: ActivityLog,
}

/// Runtime configuration, read from the environment.
struct Config {
    addr: String,
    files_dir: PathBuf,
    drive_api_key: String,
    allowed_origins: Option<Vec<String>>,
    token_lifetime_secs: u64,
    pepper: Option<String>,
    seed_demo: bool,
}

impl Config {
    fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("FILEVAULT_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
        let files_dir = std::env::var("FILEVAULT_FILES_DIR")
            .unwrap_or_else(|_| "./media/files".into())
            .into();
        let drive_api_key = std::env::var("GOOGLE_DRIVE_API_KEY").unwrap_or_default();
        let allowed_origins = std::env::var("FILEVAULT_ALLOWED_ORIGINS").ok().map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });
        let token_lifetime_secs = match std::env::var("FILEVAULT_TOKEN_LIFETIME_SECS") {
            Ok(v) => v.parse()?,
            Err(_) => AuthConfig::default().token_lifetime_secs,
        };
        let pepper = std::env::var("FILEVAULT_PEPPER").ok();
        let seed_demo = std::env::var("FILEVAULT_SEED")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Ok(Self {
            addr,
            files_dir,
            drive_api_key,
            allowed_origins,
            token_lifetime_secs,
            pepper,
            seed_demo,
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        login,
        logout,
        auth_check,
        list_files,
        check_file,
        download_file,
        open_file,
        activity_logs
    ),
    components(schemas(
        HealthRes,
        LoginReq,
        LoginRes,
        AuthCheckRes,
        FileEntryRes,
        ListFilesRes,
        FileCheckRes,
        DownloadRes,
        OpenFileRes,
        ActivityEntryRes,
        ActivityLogsRes,
        MessageRes,
        ErrorRes
    ))
)]
struct ApiDoc;

/// Main entry point for the FileVault application.
///
/// Starts the REST server (default port 8000, configurable via
/// FILEVAULT_ADDR) backed by the in-memory record store and the Google
/// Drive gateway.
///
/// # Environment Variables
/// - `FILEVAULT_ADDR`: server address (default: "0.0.0.0:8000")
/// - `FILEVAULT_FILES_DIR`: local files directory (default: "./media/files")
/// - `GOOGLE_DRIVE_API_KEY`: API key for remote drive fetches
/// - `FILEVAULT_ALLOWED_ORIGINS`: comma-separated CORS origins (default: permissive)
/// - `FILEVAULT_TOKEN_LIFETIME_SECS`: bearer token lifetime (default: 86400)
/// - `FILEVAULT_PEPPER`: optional password pepper
/// - `FILEVAULT_SEED`: seed demo users and catalog when truthy
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("filevault=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    std::fs::create_dir_all(&config.files_dir)?;

    if config.drive_api_key.is_empty() {
        tracing::warn!("GOOGLE_DRIVE_API_KEY is not set; remote fetches will fail");
    }

    let store = Arc::new(MemoryStore::new());
    if config.seed_demo {
        seed::seed_demo_data(&store, &config.files_dir, config.pepper.as_deref())?;
    }

    let activity = ActivityLog::new(store.clone());
    let state = AppState {
        auth: AuthService::new(
            store.clone(),
            AuthConfig {
                token_lifetime_secs: config.token_lifetime_secs,
                pepper: config.pepper.clone(),
            },
        ),
        catalog: CatalogService::new(store.clone()),
        resolver: FileResolver::new(
            store.clone(),
            Arc::new(GoogleDriveGateway::new(config.drive_api_key.clone())),
            activity.clone(),
            config.files_dir.clone(),
        ),
        activity,
    };

    let cors = match &config.allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> =
                origins.iter().filter_map(|o| o.parse().ok()).collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::permissive(),
    };

    let app = Router::new()
        .route("/health", get(health))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth/check", get(auth_check))
        .route("/files", get(list_files))
        .route("/files/check/:filename", get(check_file))
        .route("/files/download/:filename", get(download_file))
        .route("/files/open/:filename", get(open_file))
        .route("/activity-logs", get(activity_logs))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .with_state(state);

    tracing::info!("++ Starting FileVault REST on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(&config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

type HandlerError = (StatusCode, Json<ErrorRes>);

fn bad_request(message: &str) -> HandlerError {
    (StatusCode::BAD_REQUEST, Json(ErrorRes::new(message)))
}

fn unauthorized(message: &str) -> HandlerError {
    (StatusCode::UNAUTHORIZED, Json(ErrorRes::new(message)))
}

fn internal_error() -> HandlerError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorRes::new("Internal error")),
    )
}

/// Maps auth failures onto response codes. Credential and token problems
/// are all 401; store/crypto failures are logged and become 500.
fn auth_error(e: AuthError) -> HandlerError {
    match e {
        AuthError::InvalidCredentials => unauthorized("Invalid credentials"),
        AuthError::AccountInactive => unauthorized("Account is inactive"),
        AuthError::TokenInvalid | AuthError::TokenExpired => {
            unauthorized("Invalid or expired token")
        }
        AuthError::Crypto(_) | AuthError::Store(_) | AuthError::Internal(_) => {
            tracing::error!("auth error: {e}");
            internal_error()
        }
    }
}

/// Maps core failures onto response codes per the error taxonomy:
/// not-found and not-available are 404, policy denials 403, upstream fetch
/// failures 502, everything else 500.
fn core_error(e: CoreError) -> HandlerError {
    match e {
        CoreError::NotFound { .. } => (StatusCode::NOT_FOUND, Json(ErrorRes::new("File not found"))),
        CoreError::NotAvailable { .. } => (
            StatusCode::NOT_FOUND,
            Json(ErrorRes::new("File not available locally or on the remote drive")),
        ),
        CoreError::AccessDenied { .. } => {
            (StatusCode::FORBIDDEN, Json(ErrorRes::new("Access denied")))
        }
        CoreError::UpstreamFetchFailed { .. } => {
            tracing::error!("upstream fetch failed: {e}");
            (
                StatusCode::BAD_GATEWAY,
                Json(ErrorRes::new("Failed to fetch file from the remote drive")),
            )
        }
        CoreError::Persistence(_) | CoreError::Validation { .. } => {
            tracing::error!("core error: {e}");
            internal_error()
        }
    }
}

/// Extracts the bearer token from the Authorization header. Accepts both
/// `Bearer <token>` and the legacy `Token <token>` prefix.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("Token "))
        .map(str::trim)
}

/// Resolves the requesting user from the Authorization header.
fn authed_user(state: &AppState, headers: &HeaderMap) -> Result<User, HandlerError> {
    let token = bearer_token(headers).ok_or_else(|| unauthorized("Authentication required"))?;
    state.auth.authenticate(token).map_err(auth_error)
}

fn file_entry_res(entry: FileEntry) -> FileEntryRes {
    FileEntryRes {
        filename: entry.filename,
        size: entry.size_bytes,
        last_modified: entry.last_modified,
        is_local: entry.is_local,
        allowed_roles: entry.allowed_roles.iter().map(|r| r.to_string()).collect(),
    }
}

fn activity_entry_res(entry: AccessLogEntry) -> ActivityEntryRes {
    ActivityEntryRes {
        id: entry.id,
        user_name: entry.username,
        user_role: entry.user_role.to_string(),
        filename: entry.filename,
        action: entry.action.to_string(),
        timestamp: entry.timestamp,
        success: entry.success,
        origin: entry.origin,
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Login successful", body = LoginRes),
        (status = 400, description = "Malformed body", body = ErrorRes),
        (status = 401, description = "Invalid credentials", body = ErrorRes)
    )
)]
/// Authenticate with username and password and receive a bearer token.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginReq>, JsonRejection>,
) -> Result<Json<LoginRes>, HandlerError> {
    let Json(req) = payload.map_err(|_| bad_request("Malformed request body"))?;
    if req.username.is_empty() || req.password.is_empty() {
        return Err(bad_request("Username and password are required"));
    }

    let (token, user) = state
        .auth
        .login(&req.username, &req.password)
        .map_err(auth_error)?;

    Ok(Json(LoginRes {
        token,
        user_id: user.id,
        username: user.username,
        role: user.role.to_string(),
        message: "Login successful".into(),
    }))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageRes),
        (status = 401, description = "Not authenticated", body = ErrorRes)
    )
)]
/// Invalidate the presented bearer token.
async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageRes>, HandlerError> {
    let token = bearer_token(&headers).ok_or_else(|| unauthorized("Authentication required"))?;
    state.auth.logout(token).map_err(auth_error)?;
    Ok(Json(MessageRes {
        success: true,
        message: "Logout successful".into(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/check",
    responses(
        (status = 200, description = "Authenticated user info", body = AuthCheckRes),
        (status = 401, description = "Not authenticated", body = ErrorRes)
    )
)]
/// Report whether the presented token is valid, and for whom.
async fn auth_check(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<AuthCheckRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;
    Ok(Json(AuthCheckRes {
        authenticated: true,
        user_id: user.id,
        username: user.username,
        role: user.role.to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/files",
    responses(
        (status = 200, description = "Catalog entries visible to the user", body = ListFilesRes),
        (status = 401, description = "Not authenticated", body = ErrorRes)
    )
)]
/// List catalog entries, filtered by the requesting user's role.
async fn list_files(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ListFilesRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;
    let files = state
        .catalog
        .list_for(&user)
        .map_err(core_error)?
        .into_iter()
        .map(file_entry_res)
        .collect();
    Ok(Json(ListFilesRes {
        success: true,
        files,
    }))
}

#[utoipa::path(
    get,
    path = "/files/check/{filename}",
    params(("filename" = String, Path, description = "Catalog filename")),
    responses(
        (status = 200, description = "Existence probe result", body = FileCheckRes),
        (status = 401, description = "Not authenticated", body = ErrorRes),
        (status = 403, description = "Access denied", body = ErrorRes),
        (status = 404, description = "Unknown filename", body = ErrorRes)
    )
)]
/// Check whether a file is available locally, without fetching it.
///
/// Logs one "view" attempt whose success flag mirrors local presence.
async fn check_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(filename): Path<String>,
) -> Result<Json<FileCheckRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;
    let check = state
        .resolver
        .check(&user, &filename, Some(addr.ip().to_string()))
        .map_err(core_error)?;

    let message = if check.exists_locally {
        "File is available locally"
    } else {
        "Not available locally"
    };
    Ok(Json(FileCheckRes {
        success: true,
        exists: check.exists_locally,
        message: message.into(),
        file_path: check.local_path.map(|p| p.display().to_string()),
        download_available: if check.exists_locally {
            None
        } else {
            Some(check.download_available)
        },
    }))
}

#[utoipa::path(
    get,
    path = "/files/download/{filename}",
    params(("filename" = String, Path, description = "Catalog filename")),
    responses(
        (status = 200, description = "File available locally", body = DownloadRes),
        (status = 401, description = "Not authenticated", body = ErrorRes),
        (status = 403, description = "Access denied", body = ErrorRes),
        (status = 404, description = "Unknown or unavailable file", body = ErrorRes),
        (status = 502, description = "Remote fetch failed", body = ErrorRes)
    )
)]
/// Resolve a file for download, fetching from the remote drive if needed.
///
/// The gateway fetch is blocking, so resolution runs on the blocking pool.
async fn download_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(filename): Path<String>,
) -> Result<Json<DownloadRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;

    let resolver = state.resolver.clone();
    let task_user = user.clone();
    let task_filename = filename.clone();
    let origin = Some(addr.ip().to_string());
    let resolved = tokio::task::spawn_blocking(move || {
        resolver.resolve(&task_user, &task_filename, AccessAction::Download, origin)
    })
    .await
    .map_err(|e| {
        tracing::error!("download task failed: {e}");
        internal_error()
    })?
    .map_err(core_error)?;

    let (message, path) = match &resolved {
        Resolved::Local { path } => ("File already available locally", path),
        Resolved::Fetched { path } => ("File downloaded successfully from the remote drive", path),
    };
    Ok(Json(DownloadRes {
        success: true,
        message: message.into(),
        local_path: path.display().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/files/open/{filename}",
    params(("filename" = String, Path, description = "Catalog filename")),
    responses(
        (status = 200, description = "File available for local viewing", body = OpenFileRes),
        (status = 401, description = "Not authenticated", body = ErrorRes),
        (status = 403, description = "Access denied", body = ErrorRes),
        (status = 404, description = "Unknown filename or no local copy", body = ErrorRes)
    )
)]
/// Resolve a file for local viewing. Never fetches remotely; launching a
/// viewer is left to the client.
async fn open_file(
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Path(filename): Path<String>,
) -> Result<Json<OpenFileRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;
    let path = state
        .resolver
        .open_local(&user, &filename, Some(addr.ip().to_string()))
        .map_err(core_error)?;
    Ok(Json(OpenFileRes {
        success: true,
        message: "File available locally".into(),
        local_path: path.display().to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/activity-logs",
    responses(
        (status = 200, description = "Recent activity entries", body = ActivityLogsRes),
        (status = 401, description = "Not authenticated", body = ErrorRes),
        (status = 403, description = "Insufficient role", body = ErrorRes)
    )
)]
/// Recent access attempts: all users for Admin, Manager/Employee activity
/// for Manager, denied for Employee.
async fn activity_logs(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ActivityLogsRes>, HandlerError> {
    let user = authed_user(&state, &headers)?;
    let activities = state
        .activity
        .list_for(&user)
        .map_err(core_error)?
        .into_iter()
        .map(activity_entry_res)
        .collect();
    Ok(Json(ActivityLogsRes {
        success: true,
        activities,
    }))
}
