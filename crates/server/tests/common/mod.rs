//! # Common Test Utilities
//!
//! An application wired to an in-memory SQLite database with the schema
//! migrated and the system roles seeded, plus fixtures and a request helper.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use auth::{
    create_access_token,
    find_role_by_name,
    hash_password,
    secrecy::{ExposeSecret, SecretString},
    AuthProvider,
    JwtConfig,
    LocalAuthProvider,
    PasswordConfig,
};
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, Utc};
use entity::{categories, groups, incidents, sea_orm_active_enums::Severity, students, users};
use migration::{seeds::run_all_seeds, Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DbConn, Set};
use serde_json::Value;
use server::{create_app_router, AppState};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "SecureTestPassword123!";

static INIT: Once = Once::new();

/// Initialize test logging once per test binary
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

pub struct TestApp {
    pub state:  AppState,
    pub router: Router,
    pub jwt:    JwtConfig,
}

/// A response with its body parsed as JSON when possible.
pub struct TestResponse {
    pub status:  StatusCode,
    pub headers: HeaderMap,
    pub text:    String,
}

impl TestResponse {
    pub fn json(&self) -> Value { serde_json::from_str(&self.text).unwrap_or(Value::Null) }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn new() -> Self {
        init_test_env();

        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        run_all_seeds(&db).await.unwrap();

        let jwt = JwtConfig::from_raw_secret("test-jwt-secret-for-integration-tests-32bytes-long!!", 3600);
        let auth: Arc<dyn AuthProvider> = Arc::new(LocalAuthProvider::new(db.clone(), jwt.clone()));
        let state = AppState::new(db, auth);

        Self {
            router: create_app_router(state.clone()),
            state,
            jwt,
        }
    }

    pub fn db(&self) -> &DbConn { &self.state.db }

    /// Creates a user with the given role and returns it with a valid token.
    pub async fn user(&self, role: &str, name: &str) -> (users::Model, String) {
        let role = find_role_by_name(self.db(), role).await.unwrap();
        let config = PasswordConfig {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
            ..Default::default()
        };
        let hash = hash_password(&SecretString::from(TEST_PASSWORD.to_string()), Some(config)).unwrap();

        let user = users::ActiveModel {
            id:            Set(Uuid::new_v4()),
            role_id:       Set(role.id),
            display_name:  Set(name.to_string()),
            school_role:   Set(Some("Science Teacher".to_string())),
            email:         Set(format!("{}@school.test", name.to_lowercase().replace(' ', "."))),
            password_hash: Set(hash.expose_secret().to_string()),
            created_at:    Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .unwrap();

        let token = create_access_token(&self.jwt, user.id, &user.email).unwrap();
        (user, token)
    }

    pub async fn group(&self, name: &str, creator: Uuid) -> groups::Model {
        groups::ActiveModel {
            id:         Set(Uuid::new_v4()),
            name:       Set(name.to_string()),
            created_by: Set(creator),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .unwrap()
    }

    pub async fn category(&self, name: &str, creator: Uuid) -> categories::Model {
        categories::ActiveModel {
            id:         Set(Uuid::new_v4()),
            name:       Set(name.to_string()),
            created_by: Set(creator),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .unwrap()
    }

    pub async fn student(&self, name: &str, group_id: Uuid) -> students::Model {
        students::ActiveModel {
            id:         Set(Uuid::new_v4()),
            name:       Set(name.to_string()),
            group_id:   Set(group_id),
            created_at: Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .unwrap()
    }

    pub async fn incident(
        &self,
        student_id: Uuid,
        category_id: Uuid,
        severity: Severity,
        date: &str,
        teacher_id: Uuid,
    ) -> incidents::Model {
        incidents::ActiveModel {
            id:          Set(Uuid::new_v4()),
            student_id:  Set(student_id),
            category_id: Set(category_id),
            severity:    Set(severity),
            description: Set(format!("Incident on {}", date)),
            date:        Set(NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()),
            teacher_id:  Set(teacher_id),
            created_at:  Set(Utc::now()),
        }
        .insert(self.db())
        .await
        .unwrap()
    }

    pub async fn request(&self, method: Method, path: &str, token: Option<&str>, body: Option<Value>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            },
            None => Body::empty(),
        };

        self.send(builder.body(body).unwrap()).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        TestResponse {
            status,
            headers,
            text: String::from_utf8_lossy(&bytes).to_string(),
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse { self.request(Method::GET, path, token, None).await }
}
