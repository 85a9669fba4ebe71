//! Application state shared by every handler

use std::sync::Arc;

use actix_web::HttpRequest;

use tours_core::repositories::Repositories;
use tours_core::services::{
    AuthService, AuthServiceConfig, BookingService, EmailServiceTrait, PaymentGatewayTrait,
    RateLimiterTrait, ReviewService, TokenService, TokenServiceConfig, TourService, UserService,
};
use tours_infra::database::DatabasePool;
use tours_infra::email::MockEmailService;
use tours_infra::payment::MockPaymentGateway;
use tours_infra::rate_limiter::InMemoryRateLimiter;
use tours_shared::{AppConfig, Environment};

/// Outbound adapters the services are wired with
pub struct AppPorts {
    pub repositories: Repositories,
    pub email: Arc<dyn EmailServiceTrait>,
    pub payments: Arc<dyn PaymentGatewayTrait>,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
    pub database: Option<DatabasePool>,
}

impl AppPorts {
    /// In-memory repositories with the mock mailer and payment gateway
    pub fn in_memory(config: &AppConfig) -> Self {
        let webhook_secret = config
            .payment
            .webhook_secret
            .clone()
            .unwrap_or_else(|| MockPaymentGateway::DEFAULT_WEBHOOK_SECRET.to_string());
        Self {
            repositories: Repositories::in_memory(),
            email: Arc::new(MockEmailService::new()),
            payments: Arc::new(MockPaymentGateway::new(webhook_secret)),
            rate_limiter: Arc::new(InMemoryRateLimiter::new(
                config.rate_limit.max_requests,
                config.rate_limit.window_seconds,
            )),
            database: None,
        }
    }

    pub fn with_email(mut self, email: Arc<dyn EmailServiceTrait>) -> Self {
        self.email = email;
        self
    }

    pub fn with_payments(mut self, payments: Arc<dyn PaymentGatewayTrait>) -> Self {
        self.payments = payments;
        self
    }
}

pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthService,
    pub users: UserService,
    pub tours: TourService,
    pub reviews: ReviewService,
    pub bookings: BookingService,
    pub rate_limiter: Arc<dyn RateLimiterTrait>,
    pub repositories: Repositories,
    pub database: Option<DatabasePool>,
}

impl AppState {
    pub fn new(config: AppConfig, ports: AppPorts, auth_config: AuthServiceConfig) -> Self {
        let repos = ports.repositories;
        let tokens = Arc::new(TokenService::new(TokenServiceConfig::from(&config.jwt)));

        Self {
            auth: AuthService::new(repos.users.clone(), tokens, ports.email, auth_config),
            users: UserService::new(repos.users.clone()),
            tours: TourService::new(repos.tours.clone(), repos.users.clone(), repos.reviews.clone()),
            reviews: ReviewService::new(
                repos.reviews.clone(),
                repos.tours.clone(),
                repos.users.clone(),
            ),
            bookings: BookingService::new(
                repos.bookings.clone(),
                repos.tours.clone(),
                repos.users.clone(),
                ports.payments,
            ),
            rate_limiter: ports.rate_limiter,
            repositories: repos,
            database: ports.database,
            config,
        }
    }

    pub fn environment(&self) -> Environment {
        self.config.environment
    }

    /// Public base URL for links in emails and payment redirects
    ///
    /// Falls back to the scheme and host the request arrived on.
    pub fn base_url(&self, req: &HttpRequest) -> String {
        match &self.config.server.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => {
                let info = req.connection_info();
                format!("{}://{}", info.scheme(), info.host())
            }
        }
    }

    /// Whether the request reached us over TLS, directly or via a proxy
    pub fn is_secure(&self, req: &HttpRequest) -> bool {
        req.connection_info().scheme() == "https"
    }
}
