//! Stub identity: every request is the fixed admin user.

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{
        get,
        post,
    },
    Extension,
    Json,
    Router,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct Preferences {
    pub theme: &'static str,
    pub timezone: &'static str,
    #[serde(rename = "refreshRate")]
    pub refresh_rate: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: &'static str,
    pub email: &'static str,
    pub name: &'static str,
    pub role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferences: Option<Preferences>,
}

impl CurrentUser {
    pub fn admin() -> Self {
        Self {
            id: "1",
            email: "admin@example.com",
            name: "Admin User",
            role: "ADMIN",
            preferences: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: &'static str,
    pub user: CurrentUser,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub success: bool,
    pub user: CurrentUser,
}

pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(CurrentUser::admin());
    next.run(req).await
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

async fn login(Extension(user): Extension<CurrentUser>) -> Json<LoginResponse> {
    Json(LoginResponse {
        success: true,
        token: "mock-token",
        user,
    })
}

async fn me(Extension(user): Extension<CurrentUser>) -> Json<MeResponse> {
    Json(MeResponse {
        success: true,
        user: CurrentUser {
            preferences: Some(Preferences {
                theme: "light",
                timezone: "UTC",
                refresh_rate: 300,
            }),
            ..user
        },
    })
}
