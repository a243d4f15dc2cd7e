//! Behavioral tests for the reservation engine, voucher resolver, and
//! admin booking lifecycle, run against the in-memory store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use trekbook_core::error::ErrorKind;
use trekbook_core::events::{DomainEvent, EventPayload};
use trekbook_core::result::AppResult;
use trekbook_core::traits::NotificationSink;
use trekbook_core::types::actor::ActorRole;
use trekbook_core::types::id::{BookingId, SlotId, UserId, VoucherId};
use trekbook_database::store::{
    AdmissionOutcome, FixedPriceLookup, InMemoryReservationStore, ReservationStore,
};
use trekbook_entity::booking::model::NewBooking;
use trekbook_entity::booking::participant::NewParticipant;
use trekbook_entity::booking::status::{BookingStatus, CancellationReason, PaymentStatus};
use trekbook_entity::slot::model::{NewSlot, Slot};
use trekbook_entity::slot::status::SlotStatus;
use trekbook_entity::voucher::model::{Voucher, VoucherKind};
use trekbook_service::booking::engine::CreateBookingRequest;
use trekbook_service::booking::{BookingAdminService, ReservationEngine};
use trekbook_service::context::RequestContext;
use trekbook_service::voucher::VoucherResolver;

const TREK: &str = "annapurna-base-camp";
const PRICE: i64 = 10000;

fn departure() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 12).expect("valid date")
}

/// Sink that records every delivered event.
#[derive(Debug, Default)]
struct RecordingSink {
    events: Mutex<Vec<DomainEvent>>,
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn notify(&self, event: &DomainEvent) {
        self.events.lock().await.push(event.clone());
    }
}

struct Harness {
    store: Arc<InMemoryReservationStore>,
    engine: Arc<ReservationEngine>,
    admin: BookingAdminService,
    sink: Arc<RecordingSink>,
}

impl Harness {
    async fn new() -> Self {
        let store = Arc::new(InMemoryReservationStore::new());
        let store_dyn: Arc<dyn ReservationStore> = store.clone();
        let sink = Arc::new(RecordingSink::default());
        let sink_dyn: Arc<dyn NotificationSink> = sink.clone();
        let prices = Arc::new(FixedPriceLookup::new().with_price(TREK, PRICE));
        let resolver = Arc::new(VoucherResolver::new(store_dyn.clone()));

        let engine = Arc::new(ReservationEngine::new(
            store_dyn.clone(),
            prices,
            resolver,
            sink_dyn.clone(),
        ));
        let admin = BookingAdminService::new(store_dyn, sink_dyn);

        Self {
            store,
            engine,
            admin,
            sink,
        }
    }

    async fn seed_slot(&self, capacity: i32) -> Slot {
        self.store
            .seed_slot(&NewSlot {
                trek_slug: TREK.to_string(),
                departure_date: departure(),
                capacity,
            })
            .await
    }

    async fn booked(&self, slot: &Slot) -> i32 {
        self.store
            .slot(SlotId::from_uuid(slot.id))
            .await
            .expect("slot exists")
            .booked
    }
}

fn customer() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), ActorRole::Customer)
}

fn admin() -> RequestContext {
    RequestContext::new(Uuid::new_v4(), ActorRole::Admin)
}

fn request(participants: i32) -> CreateBookingRequest {
    CreateBookingRequest {
        trek_slug: TREK.to_string(),
        departure_date: departure(),
        participants,
        contact_name: "Asha Rao".to_string(),
        contact_email: "asha@example.com".to_string(),
        contact_phone: Some("+91-9800000000".to_string()),
        voucher_code: None,
        participant_details: Vec::new(),
    }
}

fn percent_voucher(code: &str, kind: VoucherKind, percent: i32, maximum: Option<i64>) -> Voucher {
    Voucher {
        id: Uuid::new_v4(),
        code: code.to_string(),
        kind,
        discount_percent: Some(percent),
        flat_amount: None,
        minimum_amount: 0,
        maximum_discount: maximum,
        valid_until: None,
        is_used: false,
        used_by: None,
        used_at: None,
        created_at: Utc::now(),
    }
}

// ── Creation & admission ─────────────────────────────────────────

#[tokio::test]
async fn test_booking_happy_path() {
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;
    let ctx = customer();

    let mut req = request(2);
    req.participant_details = vec![
        NewParticipant {
            full_name: "Asha Rao".to_string(),
            date_of_birth: None,
            emergency_contact: Some("+91-9811111111".to_string()),
            medical_notes: None,
            waiver_accepted: true,
        },
        NewParticipant {
            full_name: "Vikram Rao".to_string(),
            date_of_birth: None,
            emergency_contact: None,
            medical_notes: Some("asthma".to_string()),
            waiver_accepted: true,
        },
    ];

    let conf = h.engine.create_booking(&ctx, req).await.expect("created");

    assert_eq!(conf.status, BookingStatus::PendingApproval);
    assert_eq!(conf.base_amount, 20000);
    assert_eq!(conf.gst_amount, 1000);
    assert_eq!(conf.discount_amount, 0);
    assert_eq!(conf.total_amount, 21000);
    assert!(!conf.voucher_applied);
    assert_eq!(h.booked(&slot).await, 2);
    assert_eq!(
        h.store
            .participant_count(BookingId::from_uuid(conf.booking_id))
            .await,
        2
    );

    let events = h.sink.events.lock().await;
    assert!(matches!(
        events.first().map(|e| &e.payload),
        Some(EventPayload::Booking(_))
    ));
}

#[tokio::test]
async fn test_full_slot_rejected_before_any_write() {
    let h = Harness::new().await;
    let slot = h.seed_slot(2).await;

    h.engine
        .create_booking(&customer(), request(1))
        .await
        .expect("first");
    h.engine
        .create_booking(&customer(), request(1))
        .await
        .expect("second");

    let slot_after = h.store.slot(SlotId::from_uuid(slot.id)).await.expect("slot");
    assert_eq!(slot_after.status, SlotStatus::Full);

    let err = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect_err("full slot must reject");
    assert_eq!(err.kind, ErrorKind::SlotUnavailable);

    // The rejected request wrote nothing.
    let bookings = h.store.bookings_for_slot(SlotId::from_uuid(slot.id)).await;
    assert_eq!(bookings.len(), 2);
    assert_eq!(h.booked(&slot).await, 2);
}

#[tokio::test]
async fn test_unknown_departure_rejected() {
    let h = Harness::new().await;

    let err = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect_err("no slot seeded");
    assert_eq!(err.kind, ErrorKind::SlotUnavailable);
}

#[tokio::test]
async fn test_participant_bounds_rejected_before_any_write() {
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;

    for participants in [0, 21, -1] {
        let err = h
            .engine
            .create_booking(&customer(), request(participants))
            .await
            .expect_err("out of bounds");
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    assert!(h
        .store
        .bookings_for_slot(SlotId::from_uuid(slot.id))
        .await
        .is_empty());
}

#[tokio::test]
async fn test_overflow_request_cancelled_post_hoc() {
    // capacity 10, 9 seats held, then a request for 2: admitted as
    // pending, rejected by the recount, tally stays at 9.
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;

    h.engine
        .create_booking(&customer(), request(9))
        .await
        .expect("first nine seats");
    assert_eq!(h.booked(&slot).await, 9);

    let err = h
        .engine
        .create_booking(&customer(), request(2))
        .await
        .expect_err("9 + 2 exceeds 10");
    assert_eq!(err.kind, ErrorKind::CapacityExceeded);
    assert_eq!(h.booked(&slot).await, 9);

    let bookings = h.store.bookings_for_slot(SlotId::from_uuid(slot.id)).await;
    assert_eq!(bookings.len(), 2);
    let rejected = &bookings[1];
    assert_eq!(rejected.status, BookingStatus::Cancelled);
    assert_eq!(
        rejected.cancellation_reason,
        Some(CancellationReason::CapacityExceeded)
    );
}

#[tokio::test]
async fn test_concurrent_requests_never_oversell() {
    let h = Harness::new().await;
    let slot = h.seed_slot(5).await;

    let mut handles = Vec::new();
    for _ in 0..20 {
        let engine = Arc::clone(&h.engine);
        handles.push(tokio::spawn(async move {
            engine.create_booking(&customer(), request(1)).await
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(e) => {
                assert!(
                    matches!(
                        e.kind,
                        ErrorKind::CapacityExceeded | ErrorKind::SlotUnavailable
                    ),
                    "unexpected failure: {e}"
                );
                rejected += 1;
            }
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(rejected, 15);
    assert_eq!(h.booked(&slot).await, 5);

    let bookings = h.store.bookings_for_slot(SlotId::from_uuid(slot.id)).await;
    let holding = bookings.iter().filter(|b| b.holds_seat()).count();
    assert_eq!(holding, 5);
    for cancelled in bookings.iter().filter(|b| !b.holds_seat()) {
        assert_eq!(
            cancelled.cancellation_reason,
            Some(CancellationReason::CapacityExceeded)
        );
    }

    // Reconciliation is idempotent: repeating it changes nothing.
    let first = h.store.reconcile(SlotId::from_uuid(slot.id)).await.expect("reconcile");
    let second = h.store.reconcile(SlotId::from_uuid(slot.id)).await.expect("reconcile");
    assert_eq!(first.booked, 5);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_admission_is_deterministic_over_insert_order() {
    // All twenty bookings inserted before any admission runs: exactly
    // the five earliest sequences survive, the rest are cancelled with
    // the capacity reason.
    let store = Arc::new(InMemoryReservationStore::new());
    let slot = store
        .seed_slot(&NewSlot {
            trek_slug: TREK.to_string(),
            departure_date: departure(),
            capacity: 5,
        })
        .await;

    let mut ids = Vec::new();
    for _ in 0..20 {
        let booking = store
            .insert_pending(&NewBooking {
                user_id: Uuid::new_v4(),
                slot_id: slot.id,
                participants: 1,
                contact_name: "Asha Rao".to_string(),
                contact_email: "asha@example.com".to_string(),
                contact_phone: None,
                base_amount: PRICE,
                gst_amount: 500,
            })
            .await
            .expect("insert");
        ids.push(booking.id);
    }

    let mut admitted = 0;
    let mut capacity_rejected = 0;
    for id in &ids {
        match store
            .admit(SlotId::from_uuid(slot.id), BookingId::from_uuid(*id))
            .await
            .expect("admit")
        {
            AdmissionOutcome::Admitted { .. } => admitted += 1,
            AdmissionOutcome::Rejected { .. } => capacity_rejected += 1,
            AdmissionOutcome::SlotClosed => panic!("slot is open"),
        }
    }

    assert_eq!(admitted, 5);
    assert_eq!(capacity_rejected, 15);

    let bookings = store.bookings_for_slot(SlotId::from_uuid(slot.id)).await;
    for (index, booking) in bookings.iter().enumerate() {
        if index < 5 {
            assert_eq!(booking.status, BookingStatus::PendingApproval);
        } else {
            assert_eq!(booking.status, BookingStatus::Cancelled);
            assert_eq!(
                booking.cancellation_reason,
                Some(CancellationReason::CapacityExceeded)
            );
        }
    }
    assert_eq!(
        store.slot(SlotId::from_uuid(slot.id)).await.expect("slot").booked,
        5
    );
}

#[tokio::test]
async fn test_slot_closed_between_insert_and_admission() {
    let store = Arc::new(InMemoryReservationStore::new());
    let slot = store
        .seed_slot(&NewSlot {
            trek_slug: TREK.to_string(),
            departure_date: departure(),
            capacity: 5,
        })
        .await;

    let booking = store
        .insert_pending(&NewBooking {
            user_id: Uuid::new_v4(),
            slot_id: slot.id,
            participants: 2,
            contact_name: "Asha Rao".to_string(),
            contact_email: "asha@example.com".to_string(),
            contact_phone: None,
            base_amount: PRICE * 2,
            gst_amount: 1000,
        })
        .await
        .expect("insert");

    store.close_slot(SlotId::from_uuid(slot.id)).await;

    let outcome = store
        .admit(SlotId::from_uuid(slot.id), BookingId::from_uuid(booking.id))
        .await
        .expect("admit");
    assert_eq!(outcome, AdmissionOutcome::SlotClosed);

    let booking = store
        .booking(BookingId::from_uuid(booking.id))
        .await
        .expect("booking");
    assert_eq!(booking.status, BookingStatus::Cancelled);
    assert_eq!(
        booking.cancellation_reason,
        Some(CancellationReason::SlotClosed)
    );
    assert_eq!(
        store.slot(SlotId::from_uuid(slot.id)).await.expect("slot").booked,
        0
    );
}

#[tokio::test]
async fn test_reconcile_unknown_slot_reports_not_found() {
    let store = InMemoryReservationStore::new();
    let err = store
        .reconcile(SlotId::new())
        .await
        .expect_err("unknown slot");
    assert_eq!(err.kind, ErrorKind::NotFound);
}

// ── Vouchers ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_voucher_discount_capped_at_maximum() {
    // 20% of 10500 would be 2100; the 1500 cap wins and the total
    // lands at 9000.
    let h = Harness::new().await;
    h.seed_slot(10).await;
    h.store
        .seed_voucher(percent_voucher(
            "TREK20",
            VoucherKind::SingleUse,
            20,
            Some(1500),
        ))
        .await;

    let mut req = request(1);
    req.voucher_code = Some("TREK20".to_string());

    let conf = h
        .engine
        .create_booking(&customer(), req)
        .await
        .expect("created");

    assert_eq!(conf.base_amount, 10000);
    assert_eq!(conf.gst_amount, 500);
    assert_eq!(conf.discount_amount, 1500);
    assert_eq!(conf.total_amount, 9000);
    assert!(conf.voucher_applied);

    let booking = h
        .store
        .booking(BookingId::from_uuid(conf.booking_id))
        .await
        .expect("booking");
    assert_eq!(booking.discount_amount, 1500);
    assert_eq!(booking.total_amount, 9000);
    assert!(booking.voucher_id.is_some());
}

#[tokio::test]
async fn test_unknown_voucher_degrades_to_full_price() {
    let h = Harness::new().await;
    h.seed_slot(10).await;

    let mut req = request(1);
    req.voucher_code = Some("NOPE".to_string());

    let conf = h
        .engine
        .create_booking(&customer(), req)
        .await
        .expect("booking survives an invalid voucher");

    assert!(!conf.voucher_applied);
    assert_eq!(conf.discount_amount, 0);
    assert_eq!(conf.total_amount, 10500);
    assert_eq!(
        conf.voucher_rejection.as_deref(),
        Some("Voucher rejected: unknown_code")
    );
}

#[tokio::test]
async fn test_expired_voucher_degrades_to_full_price() {
    let h = Harness::new().await;
    h.seed_slot(10).await;
    let mut voucher = percent_voucher("LATE", VoucherKind::SingleUse, 20, None);
    voucher.valid_until = Some(Utc::now() - Duration::hours(1));
    h.store.seed_voucher(voucher).await;

    let mut req = request(1);
    req.voucher_code = Some("LATE".to_string());

    let conf = h.engine.create_booking(&customer(), req).await.expect("created");
    assert!(!conf.voucher_applied);
    assert_eq!(
        conf.voucher_rejection.as_deref(),
        Some("Voucher rejected: expired")
    );
}

#[tokio::test]
async fn test_below_minimum_voucher_degrades_to_full_price() {
    let h = Harness::new().await;
    h.seed_slot(10).await;
    let mut voucher = percent_voucher("BIGSPEND", VoucherKind::SingleUse, 20, None);
    voucher.minimum_amount = 50000;
    h.store.seed_voucher(voucher).await;

    let mut req = request(1);
    req.voucher_code = Some("BIGSPEND".to_string());

    let conf = h.engine.create_booking(&customer(), req).await.expect("created");
    assert!(!conf.voucher_applied);
    assert_eq!(conf.total_amount, 10500);
}

#[tokio::test]
async fn test_single_use_voucher_spent_exactly_once() {
    let h = Harness::new().await;
    h.seed_slot(10).await;
    let voucher = percent_voucher("ONCE", VoucherKind::SingleUse, 10, None);
    let voucher_id = voucher.id;
    h.store.seed_voucher(voucher).await;

    let mut first = request(1);
    first.voucher_code = Some("ONCE".to_string());
    let conf1 = h.engine.create_booking(&customer(), first).await.expect("first");
    assert!(conf1.voucher_applied);
    assert_eq!(conf1.discount_amount, 1050);

    let mut second = request(1);
    second.voucher_code = Some("ONCE".to_string());
    let conf2 = h
        .engine
        .create_booking(&customer(), second)
        .await
        .expect("second proceeds at full price");
    assert!(!conf2.voucher_applied);
    assert_eq!(conf2.total_amount, 10500);
    assert_eq!(
        conf2.voucher_rejection.as_deref(),
        Some("Voucher rejected: already_used")
    );

    let stored = h
        .store
        .voucher(VoucherId::from_uuid(voucher_id))
        .await
        .expect("voucher");
    assert!(stored.is_used);
    assert!(stored.used_by.is_some());
    assert!(stored.used_at.is_some());
}

#[tokio::test]
async fn test_concurrent_single_use_voucher_grants_at_most_one_discount() {
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;
    let voucher = percent_voucher("RACE", VoucherKind::SingleUse, 10, None);
    let voucher_id = voucher.id;
    h.store.seed_voucher(voucher).await;

    let mut handles = Vec::new();
    for _ in 0..2 {
        let engine = Arc::clone(&h.engine);
        handles.push(tokio::spawn(async move {
            let mut req = request(1);
            req.voucher_code = Some("RACE".to_string());
            engine.create_booking(&customer(), req).await
        }));
    }
    for handle in handles {
        // Either outcome is definitive: discounted, full price, or a
        // hard voucher-conflict failure.
        match handle.await.expect("task") {
            Ok(_) => {}
            Err(e) => assert_eq!(e.kind, ErrorKind::VoucherConsumed),
        }
    }

    let discounted = h
        .store
        .bookings_for_slot(SlotId::from_uuid(slot.id))
        .await
        .iter()
        .filter(|b| b.discount_amount > 0)
        .count();
    assert_eq!(discounted, 1);

    let stored = h
        .store
        .voucher(VoucherId::from_uuid(voucher_id))
        .await
        .expect("voucher");
    assert!(stored.is_used);
}

#[tokio::test]
async fn test_personal_voucher_once_per_user() {
    let h = Harness::new().await;
    h.seed_slot(20).await;
    h.store
        .seed_voucher(percent_voucher("WELCOME", VoucherKind::Personal, 10, None))
        .await;

    let returning = customer();

    let mut first = request(1);
    first.voucher_code = Some("WELCOME".to_string());
    let conf1 = h.engine.create_booking(&returning, first).await.expect("first");
    assert!(conf1.voucher_applied);

    let mut repeat = request(1);
    repeat.voucher_code = Some("WELCOME".to_string());
    let conf2 = h
        .engine
        .create_booking(&returning, repeat)
        .await
        .expect("second proceeds at full price");
    assert!(!conf2.voucher_applied);
    assert_eq!(
        conf2.voucher_rejection.as_deref(),
        Some("Voucher rejected: already_redeemed")
    );

    // A different user still gets the personal discount.
    let mut other = request(1);
    other.voucher_code = Some("WELCOME".to_string());
    let conf3 = h.engine.create_booking(&customer(), other).await.expect("third");
    assert!(conf3.voucher_applied);
}

#[tokio::test]
async fn test_voucher_preview_does_not_consume() {
    let store = Arc::new(InMemoryReservationStore::new());
    let store_dyn: Arc<dyn ReservationStore> = store.clone();
    let resolver = VoucherResolver::new(store_dyn);

    let voucher = percent_voucher("PEEK", VoucherKind::SingleUse, 20, Some(1500));
    let voucher_id = voucher.id;
    store.seed_voucher(voucher).await;

    let application = resolver
        .evaluate("PEEK", 10500, Uuid::new_v4())
        .await
        .expect("evaluates");
    assert_eq!(application.discount_amount, 1500);
    assert_eq!(application.final_amount, 9000);

    let stored = store
        .voucher(VoucherId::from_uuid(voucher_id))
        .await
        .expect("voucher");
    assert!(!stored.is_used);
}

/// Store wrapper whose voucher claim always loses, forcing the
/// engine's voucher-conflict path.
struct LostClaimStore {
    inner: Arc<InMemoryReservationStore>,
}

#[async_trait]
impl ReservationStore for LostClaimStore {
    async fn find_open_slot(
        &self,
        trek_slug: &str,
        departure_date: NaiveDate,
    ) -> AppResult<Option<Slot>> {
        self.inner.find_open_slot(trek_slug, departure_date).await
    }

    async fn insert_pending(
        &self,
        booking: &NewBooking,
    ) -> AppResult<trekbook_entity::booking::model::Booking> {
        self.inner.insert_pending(booking).await
    }

    async fn admit(
        &self,
        slot_id: SlotId,
        booking_id: BookingId,
    ) -> AppResult<AdmissionOutcome> {
        self.inner.admit(slot_id, booking_id).await
    }

    async fn reconcile(
        &self,
        slot_id: SlotId,
    ) -> AppResult<trekbook_database::store::ReconcileReport> {
        self.inner.reconcile(slot_id).await
    }

    async fn cancel_pending(
        &self,
        booking_id: BookingId,
        reason: CancellationReason,
    ) -> AppResult<()> {
        self.inner.cancel_pending(booking_id, reason).await
    }

    async fn find_booking(
        &self,
        booking_id: BookingId,
    ) -> AppResult<Option<trekbook_entity::booking::model::Booking>> {
        self.inner.find_booking(booking_id).await
    }

    async fn transition(
        &self,
        booking_id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        decided_by: Option<UserId>,
        reason: Option<CancellationReason>,
    ) -> AppResult<Option<trekbook_entity::booking::model::Booking>> {
        self.inner
            .transition(booking_id, from, to, decided_by, reason)
            .await
    }

    async fn transition_payment(
        &self,
        booking_id: BookingId,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Option<trekbook_entity::booking::model::Booking>> {
        self.inner.transition_payment(booking_id, from, to).await
    }

    async fn find_voucher(&self, code: &str) -> AppResult<Option<Voucher>> {
        self.inner.find_voucher(code).await
    }

    async fn user_redeemed(&self, voucher_id: VoucherId, user_id: UserId) -> AppResult<bool> {
        self.inner.user_redeemed(voucher_id, user_id).await
    }

    async fn apply_discount(
        &self,
        _booking_id: BookingId,
        _voucher: &Voucher,
        _user_id: UserId,
        _discount: i64,
    ) -> AppResult<bool> {
        // The claim is always lost to "another" booking.
        Ok(false)
    }

    async fn insert_participants(
        &self,
        booking_id: BookingId,
        participants: &[NewParticipant],
    ) -> AppResult<usize> {
        self.inner.insert_participants(booking_id, participants).await
    }
}

#[tokio::test]
async fn test_lost_voucher_claim_cancels_booking_and_frees_seat() {
    let inner = Arc::new(InMemoryReservationStore::new());
    let slot = inner
        .seed_slot(&NewSlot {
            trek_slug: TREK.to_string(),
            departure_date: departure(),
            capacity: 10,
        })
        .await;
    inner
        .seed_voucher(percent_voucher("GONE", VoucherKind::SingleUse, 10, None))
        .await;

    let store: Arc<dyn ReservationStore> = Arc::new(LostClaimStore {
        inner: inner.clone(),
    });
    let prices = Arc::new(FixedPriceLookup::new().with_price(TREK, PRICE));
    let resolver = Arc::new(VoucherResolver::new(store.clone()));
    let engine = ReservationEngine::new(
        store,
        prices,
        resolver,
        Arc::new(RecordingSink::default()),
    );

    let mut req = request(1);
    req.voucher_code = Some("GONE".to_string());

    let err = engine
        .create_booking(&customer(), req)
        .await
        .expect_err("lost claim hard-fails");
    assert_eq!(err.kind, ErrorKind::VoucherConsumed);

    let bookings = inner.bookings_for_slot(SlotId::from_uuid(slot.id)).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].status, BookingStatus::Cancelled);
    assert_eq!(
        bookings[0].cancellation_reason,
        Some(CancellationReason::VoucherConflict)
    );
    assert_eq!(
        inner.slot(SlotId::from_uuid(slot.id)).await.expect("slot").booked,
        0
    );
}

// ── Admin lifecycle ──────────────────────────────────────────────

#[tokio::test]
async fn test_cancelling_confirmed_booking_frees_seats_by_recount() {
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(3))
        .await
        .expect("created");
    assert_eq!(h.booked(&slot).await, 3);

    let reviewer = admin();
    let approved = h
        .admin
        .approve(&reviewer, conf.booking_id)
        .await
        .expect("approved");
    assert_eq!(approved.status, BookingStatus::Confirmed);
    assert_eq!(h.booked(&slot).await, 3);

    let cancelled = h
        .admin
        .cancel(&reviewer, conf.booking_id)
        .await
        .expect("cancelled");
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(
        cancelled.cancellation_reason,
        Some(CancellationReason::AdminCancelled)
    );
    assert_eq!(h.booked(&slot).await, 0);
}

#[tokio::test]
async fn test_rejecting_pending_booking_frees_seats() {
    let h = Harness::new().await;
    let slot = h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(4))
        .await
        .expect("created");
    assert_eq!(h.booked(&slot).await, 4);

    let rejected = h
        .admin
        .reject(&admin(), conf.booking_id)
        .await
        .expect("rejected");
    assert_eq!(rejected.status, BookingStatus::Cancelled);
    assert_eq!(
        rejected.cancellation_reason,
        Some(CancellationReason::AdminRejected)
    );
    assert_eq!(h.booked(&slot).await, 0);
}

#[tokio::test]
async fn test_customer_cannot_decide_bookings() {
    let h = Harness::new().await;
    h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect("created");

    let err = h
        .admin
        .approve(&customer(), conf.booking_id)
        .await
        .expect_err("customers cannot approve");
    assert_eq!(err.kind, ErrorKind::Authorization);
}

#[tokio::test]
async fn test_double_decision_conflicts() {
    let h = Harness::new().await;
    h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect("created");

    let reviewer = admin();
    h.admin
        .approve(&reviewer, conf.booking_id)
        .await
        .expect("first decision");
    let err = h
        .admin
        .approve(&reviewer, conf.booking_id)
        .await
        .expect_err("already decided");
    assert_eq!(err.kind, ErrorKind::Conflict);
}

#[tokio::test]
async fn test_completion_requires_confirmation() {
    let h = Harness::new().await;
    h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect("created");

    let reviewer = admin();
    let err = h
        .admin
        .complete(&reviewer, conf.booking_id)
        .await
        .expect_err("pending bookings cannot complete");
    assert_eq!(err.kind, ErrorKind::Conflict);

    h.admin
        .approve(&reviewer, conf.booking_id)
        .await
        .expect("approved");
    let completed = h
        .admin
        .complete(&reviewer, conf.booking_id)
        .await
        .expect("completed");
    assert_eq!(completed.status, BookingStatus::Completed);
}

#[tokio::test]
async fn test_payment_track_refund_only_from_paid() {
    let h = Harness::new().await;
    h.seed_slot(10).await;

    let conf = h
        .engine
        .create_booking(&customer(), request(1))
        .await
        .expect("created");
    let reviewer = admin();

    let err = h
        .admin
        .set_payment_status(&reviewer, conf.booking_id, PaymentStatus::Refunded)
        .await
        .expect_err("cannot refund before payment");
    assert_eq!(err.kind, ErrorKind::Conflict);

    let paid = h
        .admin
        .set_payment_status(&reviewer, conf.booking_id, PaymentStatus::Paid)
        .await
        .expect("paid");
    assert_eq!(paid.payment_status, PaymentStatus::Paid);

    let refunded = h
        .admin
        .set_payment_status(&reviewer, conf.booking_id, PaymentStatus::Refunded)
        .await
        .expect("refunded");
    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
}
