use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::entities::{Booking, Entity, Tour, User};
use crate::errors::{DomainError, DomainResult};
use crate::query::QueryParams;
use crate::repositories::{BookingRepository, TourRepository, UserRepository};
use crate::services::crud::CrudService;
use crate::services::payment::{CheckoutRequest, CheckoutSession, PaymentGatewayTrait};
use crate::services::populate::{booking_document, tours_by_id, users_by_id};

/// Where the hosted checkout sends the customer back to
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    /// Scheme and host of the site, without trailing slash
    pub base_url: String,
}

impl CheckoutUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn success(&self) -> String {
        format!("{}/my-tours?alert=booking", self.base_url)
    }

    pub fn cancel(&self, tour: &Tour) -> String {
        format!("{}/tour/{}", self.base_url, tour.slug)
    }

    pub fn image(&self, tour: &Tour) -> String {
        format!("{}/img/tours/{}", self.base_url, tour.image_cover)
    }
}

pub struct BookingService {
    crud: CrudService<Booking, dyn BookingRepository>,
    tours: Arc<dyn TourRepository>,
    users: Arc<dyn UserRepository>,
    gateway: Arc<dyn PaymentGatewayTrait>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        tours: Arc<dyn TourRepository>,
        users: Arc<dyn UserRepository>,
        gateway: Arc<dyn PaymentGatewayTrait>,
    ) -> Self {
        Self {
            crud: CrudService::new(bookings),
            tours,
            users,
            gateway,
        }
    }

    /// Admin CRUD over bookings
    pub fn crud(&self) -> &CrudService<Booking, dyn BookingRepository> {
        &self.crud
    }

    /// Opens a payment page for `tour_id` on behalf of `user`
    pub async fn checkout_session(
        &self,
        tour_id: Uuid,
        user: &User,
        urls: &CheckoutUrls,
    ) -> DomainResult<CheckoutSession> {
        let tour = self
            .tours
            .find_by_id(tour_id)
            .await?
            .ok_or_else(|| DomainError::not_found(Tour::schema().resource))?;

        let request = CheckoutRequest {
            tour_id: tour.id.to_string(),
            tour_name: format!("{} Tour", tour.name),
            tour_summary: tour.summary.clone(),
            image_url: urls.image(&tour),
            price: tour.price,
            customer_email: user.email.clone(),
            success_url: urls.success(),
            cancel_url: urls.cancel(&tour),
        };

        let session = self
            .gateway
            .create_checkout_session(&request)
            .await
            .map_err(|message| DomainError::ExternalService {
                service: "payment".to_string(),
                message,
            })?;
        info!(%tour_id, user_id = %user.id, session_id = %session.id, "checkout session created");
        Ok(session)
    }

    /// Records the booking for a completed checkout webhook.
    ///
    /// Returns `None` for valid events that do not complete a checkout.
    pub async fn complete_checkout(
        &self,
        payload: &[u8],
        signature: &str,
    ) -> DomainResult<Option<Booking>> {
        let completed = self
            .gateway
            .parse_completed_checkout(payload, signature)
            .map_err(|e| {
                warn!(error = %e, "rejected payment webhook");
                DomainError::business(format!("Webhook error: {e}"))
            })?;
        let Some(completed) = completed else {
            return Ok(None);
        };

        let tour_id = Uuid::parse_str(&completed.client_reference_id).map_err(|_| {
            DomainError::Cast {
                field: "tour".to_string(),
                value: completed.client_reference_id.clone(),
            }
        })?;
        let tour = self
            .tours
            .find_by_id(tour_id)
            .await?
            .ok_or_else(|| DomainError::not_found(Tour::schema().resource))?;
        let user = self
            .users
            .find_by_email(&completed.customer_email)
            .await?
            .ok_or_else(|| DomainError::not_found(User::schema().resource))?;

        let booking = Booking::new(tour.id, user.id, completed.price());
        booking.validate()?;
        self.crud.repository().insert(&booking).await?;
        info!(booking_id = %booking.id, session_id = %completed.session_id, "booking recorded");
        Ok(Some(booking))
    }

    /// Tours the user has booked
    pub async fn my_tours(&self, user_id: Uuid) -> DomainResult<Vec<Tour>> {
        let bookings = self.crud.repository().find_by_user(user_id).await?;
        let ids: Vec<Uuid> = bookings.iter().map(|booking| booking.tour).collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.tours.find_by_ids(&ids).await
    }

    /// Admin listing with tour and user summaries
    pub async fn list(&self, params: &QueryParams) -> DomainResult<Vec<Value>> {
        let listing = self.crud.get_all(params, None).await?;
        let tours = tours_by_id(self.tours.as_ref(), listing.items.iter().map(|b| b.tour)).await?;
        let users = users_by_id(self.users.as_ref(), listing.items.iter().map(|b| b.user)).await?;
        Ok(listing.documents_with(|booking| booking_document(booking, &tours, &users)))
    }

    pub async fn get(&self, id: Uuid) -> DomainResult<Value> {
        let booking = self.crud.get_one(id).await?;
        let tours = tours_by_id(self.tours.as_ref(), [booking.tour]).await?;
        let users = users_by_id(self.users.as_ref(), [booking.user]).await?;
        Ok(booking_document(&booking, &tours, &users))
    }
}
