//! In-memory reservation store.
//!
//! Mirrors the PostgreSQL store's semantics under a single
//! `tokio::sync::Mutex`: every operation that the database runs in one
//! transaction runs here under one lock acquisition. Used by the service
//! test suites; no external infrastructure required.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::warn;
use uuid::Uuid;

use trekbook_core::error::AppError;
use trekbook_core::result::AppResult;
use trekbook_core::traits::PriceLookup;
use trekbook_core::types::id::{BookingId, SlotId, UserId, VoucherId};
use trekbook_entity::booking::model::{Booking, NewBooking};
use trekbook_entity::booking::participant::{NewParticipant, Participant};
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};
use trekbook_entity::slot::model::{NewSlot, Slot};
use trekbook_entity::slot::status::SlotStatus;
use trekbook_entity::voucher::model::{Voucher, VoucherKind, VoucherRedemption};

use super::{AdmissionOutcome, ReconcileReport, ReservationStore};

#[derive(Debug, Default)]
struct StoreState {
    slots: HashMap<Uuid, Slot>,
    bookings: HashMap<Uuid, Booking>,
    participants: HashMap<Uuid, Vec<Participant>>,
    vouchers: HashMap<Uuid, Voucher>,
    /// Redemption rows; (voucher_id, user_id) is the unique claim key.
    redemptions: Vec<VoucherRedemption>,
    next_seq: i64,
}

impl StoreState {
    fn redeemed(&self, voucher_id: Uuid, user_id: Uuid) -> bool {
        self.redemptions
            .iter()
            .any(|r| r.voucher_id == voucher_id && r.user_id == user_id)
    }

    /// Seats held by non-cancelled bookings against the slot.
    fn recount(&self, slot_id: Uuid) -> i32 {
        self.bookings
            .values()
            .filter(|b| b.slot_id == slot_id && b.status.holds_seat())
            .map(|b| b.participants)
            .sum()
    }

    /// Rewrite the slot tally and derived status (closed stays closed).
    fn write_tally(&mut self, slot_id: Uuid, booked: i32) -> Option<(i32, SlotStatus)> {
        let slot = self.slots.get_mut(&slot_id)?;
        slot.booked = booked;
        if slot.status != SlotStatus::Closed {
            slot.status = SlotStatus::derive(booked, slot.capacity);
        }
        slot.updated_at = Utc::now();
        Some((slot.capacity, slot.status))
    }

    fn cancel(&mut self, booking_id: Uuid, reason: CancellationReason) {
        if let Some(booking) = self.bookings.get_mut(&booking_id) {
            booking.status = BookingStatus::Cancelled;
            booking.cancellation_reason = Some(reason);
            booking.updated_at = Utc::now();
        }
    }
}

/// In-memory [`ReservationStore`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryReservationStore {
    state: Mutex<StoreState>,
}

impl InMemoryReservationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a slot and return it.
    pub async fn seed_slot(&self, new: &NewSlot) -> Slot {
        let now = Utc::now();
        let slot = Slot {
            id: Uuid::new_v4(),
            trek_slug: new.trek_slug.clone(),
            departure_date: new.departure_date,
            capacity: new.capacity,
            booked: 0,
            status: SlotStatus::Open,
            created_at: now,
            updated_at: now,
        };
        self.state.lock().await.slots.insert(slot.id, slot.clone());
        slot
    }

    /// Seed a voucher.
    pub async fn seed_voucher(&self, voucher: Voucher) {
        self.state.lock().await.vouchers.insert(voucher.id, voucher);
    }

    /// Close a slot to new bookings.
    pub async fn close_slot(&self, slot_id: SlotId) {
        let mut state = self.state.lock().await;
        if let Some(slot) = state.slots.get_mut(slot_id.as_uuid()) {
            slot.status = SlotStatus::Closed;
            slot.updated_at = Utc::now();
        }
    }

    /// Snapshot a slot.
    pub async fn slot(&self, slot_id: SlotId) -> Option<Slot> {
        self.state.lock().await.slots.get(slot_id.as_uuid()).cloned()
    }

    /// Snapshot a booking.
    pub async fn booking(&self, booking_id: BookingId) -> Option<Booking> {
        self.state
            .lock()
            .await
            .bookings
            .get(booking_id.as_uuid())
            .cloned()
    }

    /// Snapshot a voucher.
    pub async fn voucher(&self, voucher_id: VoucherId) -> Option<Voucher> {
        self.state
            .lock()
            .await
            .vouchers
            .get(voucher_id.as_uuid())
            .cloned()
    }

    /// Number of participant records stored for a booking.
    pub async fn participant_count(&self, booking_id: BookingId) -> usize {
        self.state
            .lock()
            .await
            .participants
            .get(booking_id.as_uuid())
            .map_or(0, Vec::len)
    }

    /// Snapshot all bookings against a slot, in admission order.
    pub async fn bookings_for_slot(&self, slot_id: SlotId) -> Vec<Booking> {
        let state = self.state.lock().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.slot_id == slot_id.into_uuid())
            .cloned()
            .collect();
        bookings.sort_by_key(|b| b.admission_seq);
        bookings
    }
}

#[async_trait]
impl ReservationStore for InMemoryReservationStore {
    async fn find_open_slot(
        &self,
        trek_slug: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Slot>> {
        let state = self.state.lock().await;
        Ok(state
            .slots
            .values()
            .find(|s| {
                s.trek_slug == trek_slug
                    && s.departure_date == departure_date
                    && s.status.is_open()
            })
            .cloned())
    }

    async fn insert_pending(&self, new: &NewBooking) -> AppResult<Booking> {
        let mut state = self.state.lock().await;
        state.next_seq += 1;
        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            slot_id: new.slot_id,
            participants: new.participants,
            contact_name: new.contact_name.clone(),
            contact_email: new.contact_email.clone(),
            contact_phone: new.contact_phone.clone(),
            base_amount: new.base_amount,
            gst_amount: new.gst_amount,
            discount_amount: 0,
            total_amount: new.base_amount + new.gst_amount,
            voucher_id: None,
            status: BookingStatus::PendingApproval,
            payment_status: PaymentStatus::NotRequired,
            cancellation_reason: None,
            admission_seq: state.next_seq,
            decided_by: None,
            decided_at: None,
            created_at: now,
            updated_at: now,
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn admit(
        &self,
        slot_id: SlotId,
        booking_id: BookingId,
    ) -> AppResult<AdmissionOutcome> {
        let mut state = self.state.lock().await;
        let slot_uuid = slot_id.into_uuid();
        let booking_uuid = booking_id.into_uuid();

        let Some(slot) = state.slots.get(&slot_uuid) else {
            return Err(AppError::not_found(format!("Slot {slot_id} not found")));
        };
        let capacity = slot.capacity;

        if slot.status == SlotStatus::Closed {
            state.cancel(booking_uuid, CancellationReason::SlotClosed);
            let booked = state.recount(slot_uuid);
            state.write_tally(slot_uuid, booked);
            return Ok(AdmissionOutcome::SlotClosed);
        }

        let candidate_seq = state
            .bookings
            .get(&booking_uuid)
            .map(|b| b.admission_seq)
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        let prefix: i64 = state
            .bookings
            .values()
            .filter(|b| {
                b.slot_id == slot_uuid
                    && b.status.holds_seat()
                    && b.admission_seq <= candidate_seq
            })
            .map(|b| i64::from(b.participants))
            .sum();

        let admitted = prefix <= i64::from(capacity);
        if !admitted {
            state.cancel(booking_uuid, CancellationReason::CapacityExceeded);
        }

        let booked = state.recount(slot_uuid);
        state.write_tally(slot_uuid, booked);

        if admitted {
            Ok(AdmissionOutcome::Admitted { booked })
        } else {
            Ok(AdmissionOutcome::Rejected { booked, capacity })
        }
    }

    async fn reconcile(&self, slot_id: SlotId) -> AppResult<ReconcileReport> {
        let mut state = self.state.lock().await;
        let slot_uuid = slot_id.into_uuid();

        if !state.slots.contains_key(&slot_uuid) {
            return Err(AppError::not_found(format!("Slot {slot_id} not found")));
        }

        let booked = state.recount(slot_uuid);
        let (capacity, status) = state
            .write_tally(slot_uuid, booked)
            .ok_or_else(|| AppError::not_found(format!("Slot {slot_id} not found")))?;

        let capacity_exceeded = booked > capacity;
        if capacity_exceeded {
            warn!(%slot_id, booked, capacity, "Reconcile observed more seats than capacity");
        }

        Ok(ReconcileReport {
            slot_id,
            booked,
            capacity,
            status,
            capacity_exceeded,
        })
    }

    async fn cancel_pending(
        &self,
        booking_id: BookingId,
        reason: CancellationReason,
    ) -> AppResult<()> {
        let mut state = self.state.lock().await;
        let booking_uuid = booking_id.into_uuid();
        match state.bookings.get(&booking_uuid) {
            Some(b) if b.status == BookingStatus::PendingApproval => {
                state.cancel(booking_uuid, reason);
                Ok(())
            }
            Some(_) => Err(AppError::conflict(format!(
                "Booking {booking_id} is no longer pending"
            ))),
            None => Err(AppError::not_found(format!(
                "Booking {booking_id} not found"
            ))),
        }
    }

    async fn find_booking(&self, booking_id: BookingId) -> AppResult<Option<Booking>> {
        let state = self.state.lock().await;
        Ok(state.bookings.get(booking_id.as_uuid()).cloned())
    }

    async fn transition(
        &self,
        booking_id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        decided_by: Option<UserId>,
        reason: Option<CancellationReason>,
    ) -> AppResult<Option<Booking>> {
        let mut state = self.state.lock().await;
        match state.bookings.get_mut(booking_id.as_uuid()) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.cancellation_reason = reason;
                booking.decided_by = decided_by.map(UserId::into_uuid);
                booking.decided_at = Some(Utc::now());
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn transition_payment(
        &self,
        booking_id: BookingId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Option<Booking>> {
        let mut state = self.state.lock().await;
        match state.bookings.get_mut(booking_id.as_uuid()) {
            Some(booking) if booking.payment_status == from => {
                booking.payment_status = to;
                booking.updated_at = Utc::now();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn find_voucher(&self, code: &str) -> AppResult<Option<Voucher>> {
        let state = self.state.lock().await;
        Ok(state.vouchers.values().find(|v| v.code == code).cloned())
    }

    async fn user_redeemed(&self, voucher_id: VoucherId, user_id: UserId) -> AppResult<bool> {
        let state = self.state.lock().await;
        Ok(state.redeemed(voucher_id.into_uuid(), user_id.into_uuid()))
    }

    async fn apply_discount(
        &self,
        booking_id: BookingId,
        voucher: &Voucher,
        user_id: UserId,
        discount: i64,
    ) -> AppResult<bool> {
        let mut state = self.state.lock().await;

        let claimed = match voucher.kind {
            VoucherKind::SingleUse => match state.vouchers.get_mut(&voucher.id) {
                Some(stored) if !stored.is_used => {
                    stored.is_used = true;
                    stored.used_by = Some(user_id.into_uuid());
                    stored.used_at = Some(Utc::now());
                    true
                }
                _ => false,
            },
            VoucherKind::Personal => {
                if state.redeemed(voucher.id, user_id.into_uuid()) {
                    false
                } else {
                    state.redemptions.push(VoucherRedemption {
                        voucher_id: voucher.id,
                        user_id: user_id.into_uuid(),
                        booking_id: booking_id.into_uuid(),
                        redeemed_at: Utc::now(),
                    });
                    true
                }
            }
        };

        if !claimed {
            return Ok(false);
        }

        if let Some(booking) = state.bookings.get_mut(booking_id.as_uuid()) {
            booking.voucher_id = Some(voucher.id);
            booking.discount_amount = discount;
            booking.total_amount = booking.base_amount + booking.gst_amount - discount;
            booking.updated_at = Utc::now();
        }
        Ok(true)
    }

    async fn insert_participants(
        &self,
        booking_id: BookingId,
        participants: &[NewParticipant],
    ) -> AppResult<usize> {
        let mut state = self.state.lock().await;
        let booking_uuid = booking_id.into_uuid();
        let records = state.participants.entry(booking_uuid).or_default();
        for participant in participants {
            records.push(Participant {
                id: Uuid::new_v4(),
                booking_id: booking_uuid,
                full_name: participant.full_name.clone(),
                date_of_birth: participant.date_of_birth,
                emergency_contact: participant.emergency_contact.clone(),
                medical_notes: participant.medical_notes.clone(),
                waiver_accepted: participant.waiver_accepted,
                created_at: Utc::now(),
            });
        }
        Ok(participants.len())
    }
}

/// Fixed-price [`PriceLookup`] for tests and demos.
#[derive(Debug, Default)]
pub struct FixedPriceLookup {
    prices: HashMap<String, i64>,
}

impl FixedPriceLookup {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trek price.
    pub fn with_price(mut self, trek_slug: &str, base_price: i64) -> Self {
        self.prices.insert(trek_slug.to_string(), base_price);
        self
    }
}

#[async_trait]
impl PriceLookup for FixedPriceLookup {
    async fn base_price(&self, trek_slug: &str) -> AppResult<Option<i64>> {
        Ok(self.prices.get(trek_slug).copied())
    }
}
