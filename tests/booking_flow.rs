mod common;

use rust_decimal_macros::dec;

use tessera_server::models::{TicketTypePatch, UserRole};
use tessera_server::utils::error::AppError;

#[tokio::test]
async fn capacity_walkthrough() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 100).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(50), 100))
        .await
        .expect("ticket type");

    let first = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 60)
        .await
        .expect("first booking");
    assert_eq!(first.total_price, dec!(3000));
    assert_eq!(
        h.ledger.available_units(&ticket_type).await.expect("units"),
        40
    );

    let denied = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 50)
        .await
        .expect_err("oversized booking");
    match denied {
        AppError::CapacityError(msg) => {
            assert_eq!(msg, "Only 40 tickets available for this ticket type");
        }
        other => panic!("expected a capacity error, got {other}"),
    }

    h.bookings
        .cancel_booking(first.id, user.id)
        .await
        .expect("cancel");
    assert_eq!(
        h.ledger.available_units(&ticket_type).await.expect("units"),
        100
    );

    h.bookings
        .create_booking(user.id, event.id, ticket_type.id, 100)
        .await
        .expect("full-capacity booking");
    assert_eq!(h.ledger.booked_units(ticket_type.id).await.expect("units"), 100);
}

#[tokio::test]
async fn cancellation_releases_exactly_the_booked_units() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 5).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(20), 5))
        .await
        .expect("ticket type");

    let booking = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 5)
        .await
        .expect("booking");

    // The tier is now sold out.
    assert!(matches!(
        h.bookings
            .create_booking(user.id, event.id, ticket_type.id, 5)
            .await,
        Err(AppError::CapacityError(_))
    ));

    h.bookings
        .cancel_booking(booking.id, user.id)
        .await
        .expect("cancel");

    h.bookings
        .create_booking(user.id, event.id, ticket_type.id, 5)
        .await
        .expect("rebooking after cancel");
}

#[tokio::test]
async fn booked_total_price_survives_a_repricing() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 50).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(50), 50))
        .await
        .expect("ticket type");

    let booking = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 2)
        .await
        .expect("booking");
    assert_eq!(booking.total_price, dec!(100));

    h.registry
        .update_ticket_type(
            ticket_type.id,
            TicketTypePatch {
                price: Some(dec!(75)),
                ..Default::default()
            },
        )
        .await
        .expect("repricing");

    let unchanged = h
        .bookings
        .get_user_bookings(user.id)
        .await
        .expect("bookings")
        .into_iter()
        .find(|b| b.id == booking.id)
        .expect("booking still listed");
    assert_eq!(unchanged.total_price, dec!(100));

    // New admissions pick up the new price.
    let repriced = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 2)
        .await
        .expect("booking at new price");
    assert_eq!(repriced.total_price, dec!(150));
}

#[tokio::test]
async fn availability_reads_are_idempotent() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 30).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(15), 30))
        .await
        .expect("ticket type");
    h.bookings
        .create_booking(user.id, event.id, ticket_type.id, 12)
        .await
        .expect("booking");

    let first = h.ledger.available_units(&ticket_type).await.expect("read");
    let second = h.ledger.available_units(&ticket_type).await.expect("read");
    assert_eq!(first, 18);
    assert_eq!(first, second);

    assert_eq!(
        h.ledger
            .event_remaining_capacity(&event)
            .await
            .expect("read"),
        18
    );
}

#[tokio::test]
async fn cancelling_twice_is_a_quiet_no_op() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 10).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(5), 10))
        .await
        .expect("ticket type");
    let booking = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 1)
        .await
        .expect("booking");

    let first = h
        .bookings
        .cancel_booking(booking.id, user.id)
        .await
        .expect("cancel");
    let second = h
        .bookings
        .cancel_booking(booking.id, user.id)
        .await
        .expect("repeat cancel");
    assert_eq!(first.status, second.status);
}

#[tokio::test]
async fn validation_and_ownership_failures() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 10).await;
    let other_event = h.seed_event(user.id, 10).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(5), 10))
        .await
        .expect("ticket type");

    assert!(matches!(
        h.bookings
            .create_booking(user.id, event.id, ticket_type.id, 0)
            .await,
        Err(AppError::ValidationError(_))
    ));

    // The ticket type exists, but not under the stated event.
    assert!(matches!(
        h.bookings
            .create_booking(user.id, other_event.id, ticket_type.id, 1)
            .await,
        Err(AppError::NotFound(_))
    ));

    // Cancelling someone else's booking reads as absent, not forbidden.
    let booking = h
        .bookings
        .create_booking(user.id, event.id, ticket_type.id, 1)
        .await
        .expect("booking");
    let stranger = h.seed_user(UserRole::Attendee).await;
    assert!(matches!(
        h.bookings.cancel_booking(booking.id, stranger.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn event_bookings_are_gated_to_creator_and_admin() {
    let h = common::Harness::new();
    let organizer = h.seed_user(UserRole::Organizer).await;
    let attendee = h.seed_user(UserRole::Attendee).await;
    let admin = h.seed_user(UserRole::Admin).await;
    let event = h.seed_event(organizer.id, 10).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(5), 10))
        .await
        .expect("ticket type");
    h.bookings
        .create_booking(attendee.id, event.id, ticket_type.id, 2)
        .await
        .expect("booking");

    let seen_by_creator = h
        .bookings
        .get_event_bookings(event.id, organizer.id)
        .await
        .expect("creator listing");
    assert_eq!(seen_by_creator.len(), 1);

    let seen_by_admin = h
        .bookings
        .get_event_bookings(event.id, admin.id)
        .await
        .expect("admin listing");
    assert_eq!(seen_by_admin.len(), 1);

    assert!(matches!(
        h.bookings.get_event_bookings(event.id, attendee.id).await,
        Err(AppError::Forbidden(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_admissions_stop_exactly_at_the_type_limit() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 50).await;
    let ticket_type = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(10), 10))
        .await
        .expect("ticket type");

    let mut handles = Vec::new();
    for _ in 0..20 {
        let service = h.bookings.clone();
        let (user_id, event_id, ticket_type_id) = (user.id, event.id, ticket_type.id);
        handles.push(tokio::spawn(async move {
            service
                .create_booking(user_id, event_id, ticket_type_id, 1)
                .await
        }));
    }

    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.expect("task") {
            Ok(_) => admitted += 1,
            Err(AppError::CapacityError(_)) => rejected += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(admitted, 10);
    assert_eq!(rejected, 10);
    assert_eq!(
        h.ledger.booked_units(ticket_type.id).await.expect("units"),
        10
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_admissions_never_oversell_the_event() {
    let h = common::Harness::new();
    let user = h.seed_user(UserRole::Attendee).await;
    let event = h.seed_event(user.id, 10).await;
    let first = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(10), 6))
        .await
        .expect("first tier");
    let second = h
        .registry
        .create_ticket_type(event.id, common::regular(dec!(20), 4))
        .await
        .expect("second tier");

    let mut handles = Vec::new();
    for i in 0..20 {
        let service = h.bookings.clone();
        let (user_id, event_id) = (user.id, event.id);
        let ticket_type_id = if i % 2 == 0 { first.id } else { second.id };
        handles.push(tokio::spawn(async move {
            service
                .create_booking(user_id, event_id, ticket_type_id, 1)
                .await
        }));
    }
    for handle in handles {
        let _ = handle.await.expect("task");
    }

    let total = h.ledger.event_booked_units(event.id).await.expect("units");
    assert!(total <= 10, "event oversold: {total} booked against capacity 10");
    assert!(
        h.ledger.booked_units(first.id).await.expect("units") <= 6,
        "first tier oversold"
    );
    assert!(
        h.ledger.booked_units(second.id).await.expect("units") <= 4,
        "second tier oversold"
    );
}
