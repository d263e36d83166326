//! Integration tests for the booking lifecycle, settlement, reviews, and
//! the front-desk check-in lookup.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use classfit_db::store::Store;
use common::{booking_payload, TestApp};

#[tokio::test]
async fn test_guest_can_create_booking() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], Some(25.0)).await;

    let (status, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    let booking = &body["data"];
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["trainer_id"], trainer.id);
    assert!(booking["customer_user_id"].is_null());
    // A fresh check-in code from the unambiguous alphabet.
    let code = booking["check_in_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert!(classfit_core::checkin::is_valid_code(code));
    // Settlement fields stay empty until the front desk settles.
    assert!(booking["payment_method"].is_null());
    assert!(booking["commission_cents"].is_null());
}

#[tokio::test]
async fn test_create_booking_validates_trainer() {
    let app = TestApp::spawn().await;

    // Unknown trainer id.
    let (status, _) = app
        .post("/api/v1/bookings", None, Some(booking_payload(999)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // A plain customer cannot be booked as a trainer.
    let customer = app.seed_user("Pesho", &["user"]).await;
    let (status, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(customer.id)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    // Neither can a pending applicant.
    let pending = app.seed_user("Vlado", &["user", "trainer_pending"]).await;
    let (status, _) = app
        .post("/api/v1/bookings", None, Some(booking_payload(pending.id)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_booking_validates_fields() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], Some(25.0)).await;

    let mut payload = booking_payload(trainer.id);
    payload["customer_name"] = json!("   ");
    let (status, _) = app.post("/api/v1/bookings", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut payload = booking_payload(trainer.id);
    payload["duration_minutes"] = json!(0);
    let (status, _) = app.post("/api/v1/bookings", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut payload = booking_payload(trainer.id);
    payload["price_cents"] = json!(-100);
    let (status, _) = app.post("/api/v1/bookings", None, Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_full_lifecycle_with_settlement() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], Some(25.0)).await;
    let customer = app.seed_user("Mila", &["user"]).await;
    let cashier = app.seed_user("Desi", &["cashier"]).await;

    let trainer_token = app.token_for(&trainer);
    let customer_token = app.token_for(&customer);
    let cashier_token = app.token_for(&cashier);

    // Customer books while logged in, so the booking is linked to them.
    let (status, body) = app
        .post(
            "/api/v1/bookings",
            Some(&customer_token),
            Some(booking_payload(trainer.id)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["customer_user_id"], customer.id);

    // Trainer confirms.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/confirm"),
            Some(&trainer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "confirmed");

    // Trainer marks the session held.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/complete"),
            Some(&trainer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "trainer_completed");

    // Front desk settles; the 25% split is frozen on the row.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/settle"),
            Some(&cashier_token),
            Some(json!({ "payment_method": "card" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let settled = &body["data"];
    assert_eq!(settled["status"], "completed");
    assert_eq!(settled["payment_method"], "card");
    assert_eq!(settled["commission_cents"], 500);
    assert_eq!(settled["trainer_earnings_cents"], 1500);
    assert!(!settled["settled_at"].is_null());

    // Settling twice is a transition conflict, not a second payment.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/settle"),
            Some(&cashier_token),
            Some(json!({ "payment_method": "cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // The original split survives the rejected retry.
    let row = app.store.find_booking(id).await.unwrap().unwrap();
    assert_eq!(row.payment_method.as_deref(), Some("card"));
    assert_eq!(row.commission_cents, Some(500));
}

#[tokio::test]
async fn test_only_owning_trainer_may_confirm() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let other = app.seed_trainer("Stefan", &["trainer"], None).await;

    let (_, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let other_token = app.token_for(&other);
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/confirm"),
            Some(&other_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    // The booking is untouched.
    let row = app.store.find_booking(id).await.unwrap().unwrap();
    assert_eq!(row.status, "pending");
}

#[tokio::test]
async fn test_customer_cancellation_rules() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let owner = app.seed_user("Mila", &["user"]).await;
    let stranger = app.seed_user("Rosi", &["user"]).await;

    let owner_token = app.token_for(&owner);
    let (_, body) = app
        .post(
            "/api/v1/bookings",
            Some(&owner_token),
            Some(booking_payload(trainer.id)),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    // A stranger cannot cancel someone else's booking.
    let stranger_token = app.token_for(&stranger);
    let (status, _) = app
        .post(
            &format!("/api/v1/bookings/{id}/cancel"),
            Some(&stranger_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner can.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/cancel"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");

    // Cancelling twice is a transition conflict.
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/cancel"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    // Cancelled is terminal; the trainer cannot confirm it any more.
    let trainer_token = app.token_for(&trainer);
    let (status, _) = app
        .post(
            &format!("/api/v1/bookings/{id}/confirm"),
            Some(&trainer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_guest_bookings_cannot_be_customer_cancelled() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let user = app.seed_user("Mila", &["user"]).await;

    let (_, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let token = app.token_for(&user);
    let (status, _) = app
        .post(&format!("/api/v1/bookings/{id}/cancel"), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The trainer can still reject it.
    let trainer_token = app.token_for(&trainer);
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/reject"),
            Some(&trainer_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "cancelled");
}

#[tokio::test]
async fn test_review_rules() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], Some(30.0)).await;
    let owner = app.seed_user("Mila", &["user"]).await;
    let cashier = app.seed_user("Desi", &["cashier"]).await;
    let stranger = app.seed_user("Rosi", &["user"]).await;

    let owner_token = app.token_for(&owner);
    let trainer_token = app.token_for(&trainer);
    let cashier_token = app.token_for(&cashier);

    let (_, body) = app
        .post(
            "/api/v1/bookings",
            Some(&owner_token),
            Some(booking_payload(trainer.id)),
        )
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    // Reviewing before completion is a transition conflict.
    let (status, _) = app
        .post(&format!("/api/v1/bookings/{id}/review"), Some(&owner_token), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Walk the booking to completed.
    for step in ["confirm", "complete"] {
        let (status, _) = app
            .post(&format!("/api/v1/bookings/{id}/{step}"), Some(&trainer_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = app
        .post(
            &format!("/api/v1/bookings/{id}/settle"),
            Some(&cashier_token),
            Some(json!({ "payment_method": "cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Only the owning customer may review.
    let stranger_token = app.token_for(&stranger);
    let (status, _) = app
        .post(&format!("/api/v1/bookings/{id}/review"), Some(&stranger_token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(&format!("/api/v1/bookings/{id}/review"), Some(&owner_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["has_been_reviewed"], true);

    // Exactly once.
    let (status, body) = app
        .post(&format!("/api/v1/bookings/{id}/review"), Some(&owner_token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_trainer_settles_at_default_rate() {
    let app = TestApp::spawn().await;
    // No configured rate: the default 25% applies.
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let admin = app.seed_user("Boss", &["admin"]).await;

    let (_, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;
    let id = body["data"]["id"].as_i64().unwrap();

    let trainer_token = app.token_for(&trainer);
    for step in ["confirm", "complete"] {
        app.post(&format!("/api/v1/bookings/{id}/{step}"), Some(&trainer_token), None)
            .await;
    }

    let admin_token = app.token_for(&admin);
    let (status, body) = app
        .post(
            &format!("/api/v1/bookings/{id}/settle"),
            Some(&admin_token),
            Some(json!({ "payment_method": "cash" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["commission_cents"], 500);
    assert_eq!(body["data"]["trainer_earnings_cents"], 1500);
}

#[tokio::test]
async fn test_checkin_lookup() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let cashier = app.seed_user("Desi", &["cashier"]).await;
    let customer = app.seed_user("Mila", &["user"]).await;

    let (_, body) = app
        .post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;
    let code = body["data"]["check_in_code"].as_str().unwrap().to_string();
    let id = body["data"]["id"].as_i64().unwrap();

    // Lookup is case-insensitive for the front desk.
    let cashier_token = app.token_for(&cashier);
    let (status, body) = app
        .get(
            &format!("/api/v1/bookings/checkin/{}", code.to_lowercase()),
            Some(&cashier_token),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id);

    // Unknown code.
    let (status, _) = app
        .get("/api/v1/bookings/checkin/ZZZZZZ", Some(&cashier_token))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Customers have no front-desk access.
    let customer_token = app.token_for(&customer);
    let (status, _) = app
        .get(&format!("/api/v1/bookings/checkin/{code}"), Some(&customer_token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_my_bookings_lists_only_own() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let mila = app.seed_user("Mila", &["user"]).await;
    let rosi = app.seed_user("Rosi", &["user"]).await;

    let mila_token = app.token_for(&mila);
    let rosi_token = app.token_for(&rosi);

    app.post("/api/v1/bookings", Some(&mila_token), Some(booking_payload(trainer.id)))
        .await;
    app.post("/api/v1/bookings", Some(&rosi_token), Some(booking_payload(trainer.id)))
        .await;
    // A guest booking belongs to nobody's dashboard.
    app.post("/api/v1/bookings", None, Some(booking_payload(trainer.id)))
        .await;

    let (status, body) = app.get("/api/v1/my/bookings", Some(&mila_token)).await;
    assert_eq!(status, StatusCode::OK);
    let bookings = body["data"].as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["customer_user_id"], mila.id);
}

#[tokio::test]
async fn test_trainer_dashboard() {
    let app = TestApp::spawn().await;
    let georgi = app.seed_trainer("Georgi", &["trainer"], None).await;
    let stefan = app.seed_trainer("Stefan", &["trainer"], None).await;
    let customer = app.seed_user("Mila", &["user"]).await;

    app.post("/api/v1/bookings", None, Some(booking_payload(georgi.id)))
        .await;
    app.post("/api/v1/bookings", None, Some(booking_payload(georgi.id)))
        .await;
    app.post("/api/v1/bookings", None, Some(booking_payload(stefan.id)))
        .await;

    let georgi_token = app.token_for(&georgi);
    let (status, body) = app.get("/api/v1/trainer/bookings", Some(&georgi_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Customers are not trainers.
    let customer_token = app.token_for(&customer);
    let (status, _) = app.get("/api/v1/trainer/bookings", Some(&customer_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unknown_booking_returns_404() {
    let app = TestApp::spawn().await;
    let trainer = app.seed_trainer("Georgi", &["trainer"], None).await;
    let token = app.token_for(&trainer);

    let (status, body) = app
        .post("/api/v1/bookings/424242/confirm", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
