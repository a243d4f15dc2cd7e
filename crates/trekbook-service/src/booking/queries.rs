//! Booking read paths for customers and admins.

use std::sync::Arc;

use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::result::AppResult;
use trekbook_core::types::pagination::{PageRequest, PageResponse};
use trekbook_database::repositories::BookingRepository;
use trekbook_entity::booking::model::Booking;
use trekbook_entity::booking::participant::Participant;

use crate::context::RequestContext;

/// Read-only booking queries.
#[derive(Debug, Clone)]
pub struct BookingQueryService {
    /// Booking repository.
    bookings: Arc<BookingRepository>,
}

impl BookingQueryService {
    /// Creates a new booking query service.
    pub fn new(bookings: Arc<BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Fetch a booking. Customers may only read their own bookings;
    /// admins may read any.
    pub async fn get(&self, ctx: &RequestContext, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        if booking.user_id != ctx.user_id && !ctx.is_admin() {
            // Not-found rather than forbidden: don't leak other users'
            // booking ids.
            return Err(AppError::not_found(format!(
                "Booking {booking_id} not found"
            )));
        }

        Ok(booking)
    }

    /// Fetch a booking's participant records (same visibility as `get`).
    pub async fn participants(
        &self,
        ctx: &RequestContext,
        booking_id: Uuid,
    ) -> AppResult<Vec<Participant>> {
        self.get(ctx, booking_id).await?;
        self.bookings.participants_for(booking_id).await
    }

    /// List the caller's own bookings, newest first.
    pub async fn list_own(&self, ctx: &RequestContext) -> AppResult<Vec<Booking>> {
        self.bookings.find_by_user(ctx.user_id).await
    }

    /// List all bookings (admin view).
    pub async fn list_all(
        &self,
        ctx: &RequestContext,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        ctx.require_admin()?;
        self.bookings.find_all(page).await
    }
}
