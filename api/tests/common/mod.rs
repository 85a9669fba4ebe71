//! Shared setup for the HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{cookie::Cookie, http::header, web};
use serde_json::{json, Value};

use tours_api::{AppPorts, AppState};
use tours_core::domain::entities::{NewTour, Role, Tour, User, UserPatch};
use tours_core::services::{AuthServiceConfig, SignupInput};
use tours_infra::email::MockEmailService;
use tours_shared::{AppConfig, RateLimitConfig};

pub const PASSWORD: &str = "pass1234";

pub struct TestContext {
    pub state: web::Data<AppState>,
    pub email: MockEmailService,
}

impl TestContext {
    /// Development config, rate limiting off
    pub fn new() -> Self {
        Self::with_config(AppConfig::for_tests().with_rate_limit(RateLimitConfig::disabled()))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let email = MockEmailService::new();
        let ports = AppPorts::in_memory(&config).with_email(Arc::new(email.clone()));
        let state = web::Data::new(AppState::new(config, ports, AuthServiceConfig::fast()));
        Self { state, email }
    }

    /// Signs up a user, promotes them to `role` and returns a session token
    pub async fn user(&self, name: &str, email: &str, role: Role) -> (User, String) {
        let session = self
            .state
            .auth
            .signup(
                SignupInput {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: PASSWORD.to_string(),
                    password_confirm: PASSWORD.to_string(),
                },
                "http://localhost/me",
            )
            .await
            .expect("signup");

        let user = if role == Role::User {
            session.user
        } else {
            self.state
                .users
                .crud()
                .update_one(
                    session.user.id,
                    UserPatch {
                        role: Some(role),
                        ..Default::default()
                    },
                )
                .await
                .expect("promote user")
        };
        let token = self.state.auth.tokens().sign(user.id).expect("sign token");
        (user, token)
    }

    pub async fn tour(&self, name: &str, price: f64) -> Tour {
        self.tour_from(tour_body(name, price)).await
    }

    pub async fn tour_from(&self, body: Value) -> Tour {
        let input: NewTour = serde_json::from_value(body).expect("tour body");
        self.state.tours.crud().create(input).await.expect("create tour")
    }
}

pub fn tour_body(name: &str, price: f64) -> Value {
    json!({
        "name": name,
        "duration": 5,
        "maxGroupSize": 25,
        "difficulty": "easy",
        "price": price,
        "summary": "Breathtaking hike through the Canadian Banff National Park",
        "description": "Ut enim ad minim veniam.\nDuis aute irure dolor.",
        "imageCover": "tour-1-cover.jpg",
        "images": ["tour-1-1.jpg", "tour-1-2.jpg"],
        "startDates": ["2026-04-25T09:00:00Z"],
        "startLocation": {
            "type": "Point",
            "coordinates": [-80.185942, 25.774772],
            "description": "Miami, USA"
        }
    })
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub fn jwt_cookie(token: &str) -> Cookie<'static> {
    Cookie::new("jwt", token.to_string())
}
