use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::Booking;
use crate::errors::DomainResult;

use super::entity::Repository;
use super::memory::InMemoryRepository;

#[async_trait]
pub trait BookingRepository: Repository<Booking> {
    /// Bookings made by a user, newest first
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>>;
}

#[async_trait]
impl BookingRepository for InMemoryRepository<Booking> {
    async fn find_by_user(&self, user_id: Uuid) -> DomainResult<Vec<Booking>> {
        let mut bookings = self.find_visible(|booking| booking.user == user_id).await;
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }
}
