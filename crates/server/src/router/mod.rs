//! # API Router Configuration
//!
//! Every screen lives under its destination's path and sits behind that
//! destination's gate. The viewer is resolved once per request, before any
//! gate runs.

use auth::{Destination, Viewer};
use axum::{
    extract::{rejection::QueryRejection, Extension, Query, Request, State as AxumState},
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, patch, post, put},
    Json,
    Router,
};
use error::{Result, SuccessResponse};
use serde::Serialize;

use crate::{
    dto::{
        auth::{LandingResponse, LoginRequest, NavigationResponse, SessionResponse},
        catalog::{CreateNamedRequest, NamedResponse, UpdateNamedRequest},
        incidents::{CreateIncidentRequest, IncidentFilterQuery, IncidentListResponse, UpdateIncidentRequest},
        students::{CreateStudentRequest, StudentResponse, UpdateStudentRequest},
        users::{AssignRoleRequest, RoleResponse, UserResponse},
        ListResponse,
    },
    extract::{IdPath, ValidatedJson},
    handlers::{categories, dashboard, groups, incidents, session, students, users},
    middleware::{auth::bearer_token, gate::gate_middleware, request_log::request_log_middleware},
    reports::{Dashboard, IncidentFilter, IncidentView},
    AppState,
};

/// Wraps `router` in the gate for `destination`.
fn gated(destination: Destination, router: Router<AppState>) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        destination,
        gate_middleware,
    ))
}

/// Parses the incident filter query, treating empty values as absent.
fn incident_filter(query: std::result::Result<Query<IncidentFilterQuery>, QueryRejection>) -> Result<IncidentFilter> {
    let Query(query) = query?;
    IncidentFilter::try_from(query)
}

/// Creates the screen routes
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and auth provider
///
/// # Returns
///
/// Router with every screen behind its gate
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(landing_handler))
        .route("/login", post(login_handler))
        .route("/navigation", get(navigation_handler))
        .route("/logout", post(logout_handler))
        .route("/session/refresh", post(refresh_handler));

    let incident_routes = gated(
        Destination::Incidents,
        Router::new()
            .route(
                "/incidents",
                get(list_incidents_handler).post(create_incident_handler),
            )
            .route("/incidents/export", get(export_incidents_handler))
            .route(
                "/incidents/:id",
                patch(update_incident_handler).delete(delete_incident_handler),
            ),
    );

    let student_routes = gated(
        Destination::Students,
        Router::new()
            .route(
                "/students",
                get(list_students_handler).post(create_student_handler),
            )
            .route(
                "/students/:id",
                patch(update_student_handler).delete(delete_student_handler),
            ),
    );

    let group_routes = gated(
        Destination::Groups,
        Router::new()
            .route(
                "/groups",
                get(list_groups_handler).post(create_group_handler),
            )
            .route(
                "/groups/:id",
                patch(update_group_handler).delete(delete_group_handler),
            ),
    );

    let category_routes = gated(
        Destination::Categories,
        Router::new()
            .route(
                "/categories",
                get(list_categories_handler).post(create_category_handler),
            )
            .route(
                "/categories/:id",
                patch(update_category_handler).delete(delete_category_handler),
            ),
    );

    let dashboard_routes = gated(
        Destination::Dashboard,
        Router::new().route("/dashboard", get(dashboard_handler)),
    );

    let user_routes = gated(
        Destination::Users,
        Router::new()
            .route("/users", get(list_users_handler))
            .route("/users/roles", get(list_roles_handler))
            .route("/users/:id/role", put(assign_role_handler)),
    );

    public_routes
        .merge(incident_routes)
        .merge(student_routes)
        .merge(group_routes)
        .merge(category_routes)
        .merge(dashboard_routes)
        .merge(user_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::viewer_middleware,
        ))
        .with_state(state)
}

async fn landing_handler(Extension(viewer): Extension<Viewer>) -> Json<LandingResponse> { session::landing_handler(&viewer) }

async fn navigation_handler(Extension(viewer): Extension<Viewer>) -> Json<NavigationResponse> {
    session::navigation_handler(&viewer)
}

async fn login_handler(
    AxumState(state): AxumState<AppState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    session::login_handler(&state, req).await
}

async fn logout_handler(AxumState(state): AxumState<AppState>, request: Request) -> Result<Json<SuccessResponse>> {
    session::logout_handler(&state, bearer_token(&request)).await
}

async fn refresh_handler(AxumState(state): AxumState<AppState>, request: Request) -> Result<Json<SessionResponse>> {
    session::refresh_handler(&state, bearer_token(&request)).await
}

async fn list_incidents_handler(
    AxumState(state): AxumState<AppState>,
    query: std::result::Result<Query<IncidentFilterQuery>, QueryRejection>,
) -> Result<Json<IncidentListResponse>> {
    incidents::list_incidents_handler(&state, incident_filter(query)?).await
}

async fn create_incident_handler(
    AxumState(state): AxumState<AppState>,
    Extension(viewer): Extension<Viewer>,
    ValidatedJson(req): ValidatedJson<CreateIncidentRequest>,
) -> Result<(StatusCode, Json<IncidentView>)> {
    incidents::create_incident_handler(&state, viewer.require_identity()?, req).await
}

async fn update_incident_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateIncidentRequest>,
) -> Result<Json<IncidentView>> {
    incidents::update_incident_handler(&state, id, req).await
}

async fn delete_incident_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<SuccessResponse>> {
    incidents::delete_incident_handler(&state, id).await
}

async fn export_incidents_handler(
    AxumState(state): AxumState<AppState>,
    query: std::result::Result<Query<IncidentFilterQuery>, QueryRejection>,
) -> Result<Response> {
    incidents::export_incidents_handler(&state, incident_filter(query)?).await
}

async fn list_students_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ListResponse<StudentResponse>>> {
    students::list_students_handler(&state).await
}

async fn create_student_handler(
    AxumState(state): AxumState<AppState>,
    ValidatedJson(req): ValidatedJson<CreateStudentRequest>,
) -> Result<(StatusCode, Json<StudentResponse>)> {
    students::create_student_handler(&state, req).await
}

async fn update_student_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateStudentRequest>,
) -> Result<Json<StudentResponse>> {
    students::update_student_handler(&state, id, req).await
}

async fn delete_student_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<SuccessResponse>> {
    students::delete_student_handler(&state, id).await
}

async fn list_groups_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ListResponse<NamedResponse>>> {
    groups::list_groups_handler(&state).await
}

async fn create_group_handler(
    AxumState(state): AxumState<AppState>,
    Extension(viewer): Extension<Viewer>,
    ValidatedJson(req): ValidatedJson<CreateNamedRequest>,
) -> Result<(StatusCode, Json<NamedResponse>)> {
    groups::create_group_handler(&state, viewer.require_identity()?, req).await
}

async fn update_group_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateNamedRequest>,
) -> Result<Json<NamedResponse>> {
    groups::update_group_handler(&state, id, req).await
}

async fn delete_group_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<SuccessResponse>> {
    groups::delete_group_handler(&state, id).await
}

async fn list_categories_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ListResponse<NamedResponse>>> {
    categories::list_categories_handler(&state).await
}

async fn create_category_handler(
    AxumState(state): AxumState<AppState>,
    Extension(viewer): Extension<Viewer>,
    ValidatedJson(req): ValidatedJson<CreateNamedRequest>,
) -> Result<(StatusCode, Json<NamedResponse>)> {
    categories::create_category_handler(&state, viewer.require_identity()?, req).await
}

async fn update_category_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<UpdateNamedRequest>,
) -> Result<Json<NamedResponse>> {
    categories::update_category_handler(&state, id, req).await
}

async fn delete_category_handler(
    AxumState(state): AxumState<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<SuccessResponse>> {
    categories::delete_category_handler(&state, id).await
}

async fn dashboard_handler(AxumState(state): AxumState<AppState>) -> Result<Json<Dashboard>> {
    dashboard::dashboard_handler(&state).await
}

async fn list_users_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ListResponse<UserResponse>>> {
    users::list_users_handler(&state).await
}

async fn list_roles_handler(AxumState(state): AxumState<AppState>) -> Result<Json<ListResponse<RoleResponse>>> {
    users::list_roles_handler(&state).await
}

async fn assign_role_handler(
    AxumState(state): AxumState<AppState>,
    Extension(viewer): Extension<Viewer>,
    IdPath(id): IdPath,
    ValidatedJson(req): ValidatedJson<AssignRoleRequest>,
) -> Result<Json<UserResponse>> {
    users::assign_role_handler(&state, viewer.require_identity()?, id, req).await
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status:         &'static str,
    uptime_seconds: u64,
}

/// Creates the health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/health",
            get(|AxumState(state): AxumState<AppState>| {
                async move {
                    Json(HealthResponse {
                        status:         "ok",
                        uptime_seconds: state.start_time.elapsed().as_secs(),
                    })
                }
            }),
        )
        .with_state(state)
}

/// Creates the main application router
///
/// # Arguments
///
/// * `state` - Application state containing DB pool and auth provider
///
/// # Returns
///
/// Main router with health checks, screen routes and request logging
pub fn create_app_router(state: AppState) -> Router {
    Router::new()
        .merge(create_health_router(state.clone()))
        .merge(create_router(state))
        .layer(middleware::from_fn(request_log_middleware))
}
