//! API integration tests
//!
//! These run against a live server backed by a migrated database.
//! Run with: cargo test -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create an item with the given number of copies, returning its ID
async fn create_item(client: &Client, copies: i64) -> i64 {
    let response = client
        .post(format!("{}/items", BASE_URL))
        .json(&json!({ "Title": "Integration Test Book", "TotalCopies": copies }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["ItemID"].as_i64().expect("No item ID")
}

/// Create an account, returning its card ID
async fn create_account(client: &Client, name: &str) -> i64 {
    let response = client
        .post(format!("{}/accounts", BASE_URL))
        .json(&json!({ "Name": name }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["CardID"].as_i64().expect("No card ID")
}

async fn get_item(client: &Client, item_id: i64) -> Value {
    client
        .get(format!("{}/items/{}", BASE_URL, item_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

async fn get_account(client: &Client, card_id: i64) -> Value {
    client
        .get(format!("{}/accounts/person/{}", BASE_URL, card_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response")
}

async fn checkout(client: &Client, item_id: i64, card_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/checkout", BASE_URL))
        .json(&json!({ "ItemID": item_id, "CardID": card_id }))
        .send()
        .await
        .expect("Failed to send request")
}

async fn reserve(client: &Client, item_id: i64, card_id: i64) -> i64 {
    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({ "ItemID": item_id, "CardID": card_id }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    body["ReservationID"].as_i64().expect("No reservation ID")
}

async fn cancel(client: &Client, card_id: i64, reservation_id: i64) -> reqwest::Response {
    client
        .delete(format!("{}/reservations/person/{}", BASE_URL, card_id))
        .json(&json!({ "ReservationID": reservation_id, "CardID": card_id }))
        .send()
        .await
        .expect("Failed to send request")
}

/// (ReservationID, PlaceInLine) pairs of an item's queue, head first
async fn queue(client: &Client, item_id: i64) -> Vec<(i64, i64)> {
    let body: Value = client
        .get(format!("{}/reservations/item/{}", BASE_URL, item_id))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse response");

    body.as_array()
        .expect("Queue is not an array")
        .iter()
        .map(|r| {
            (
                r["ReservationID"].as_i64().unwrap(),
                r["PlaceInLine"].as_i64().unwrap(),
            )
        })
        .collect()
}

/// Positions run 1..=ReservationCount in order and no copy count is negative
async fn assert_queue_consistent(client: &Client, item_id: i64) {
    let item = get_item(client, item_id).await;
    let count = item["ReservationCount"].as_i64().expect("No reservation count");
    let places: Vec<i64> = queue(client, item_id).await.into_iter().map(|(_, p)| p).collect();

    assert_eq!(places, (1..=count).collect::<Vec<_>>());
    assert!(item["CopiesAvailable"].as_i64().expect("No copies available") >= 0);
}

async fn promote(client: &Client, reservation_id: i64) -> reqwest::Response {
    client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, reservation_id))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
#[ignore]
async fn test_ready_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
#[ignore]
async fn test_checkout_then_return_restores_counters() {
    let client = Client::new();
    let item_id = create_item(&client, 2).await;
    let card_id = create_account(&client, "Round Trip").await;

    let response = checkout(&client, item_id, card_id).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    let checkout_id = body["CheckoutID"].as_i64().unwrap();

    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 1);
    assert_eq!(get_account(&client, card_id).await["NumChecked"], 1);

    let listed: Value = client
        .get(format!("{}/checkout/person/{}", BASE_URL, card_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["IsOverdue"], false);

    let response = client
        .delete(format!("{}/checkout/{}", BASE_URL, checkout_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 2);
    assert_eq!(get_account(&client, card_id).await["NumChecked"], 0);

    // Second return of the same checkout
    let response = client
        .delete(format!("{}/checkout/{}", BASE_URL, checkout_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 2);
}

#[tokio::test]
#[ignore]
async fn test_checkout_without_copies_is_refused() {
    let client = Client::new();
    let item_id = create_item(&client, 0).await;
    let card_id = create_account(&client, "No Copies").await;

    let response = checkout(&client, item_id, card_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "ItemNotAvailable");

    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 0);
    assert_eq!(get_account(&client, card_id).await["NumChecked"], 0);

    let response = client
        .get(format!("{}/checkout/person/{}", BASE_URL, card_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_concurrent_checkouts_of_last_copy() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let first = create_account(&client, "Racer One").await;
    let second = create_account(&client, "Racer Two").await;

    let (a, b) = tokio::join!(
        checkout(&client, item_id, first),
        checkout(&client, item_id, second)
    );

    let mut statuses = [a.status(), b.status()];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::FORBIDDEN]);
    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 0);
}

#[tokio::test]
#[ignore]
async fn test_cancel_renumbers_queue() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let cards = [
        create_account(&client, "Queue One").await,
        create_account(&client, "Queue Two").await,
        create_account(&client, "Queue Three").await,
    ];

    let mut reservations = Vec::new();
    for card in cards {
        reservations.push(reserve(&client, item_id, card).await);
    }
    assert_eq!(
        queue(&client, item_id).await,
        vec![(reservations[0], 1), (reservations[1], 2), (reservations[2], 3)]
    );

    let response = cancel(&client, cards[1], reservations[1]).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(
        queue(&client, item_id).await,
        vec![(reservations[0], 1), (reservations[2], 2)]
    );
    assert_eq!(get_item(&client, item_id).await["ReservationCount"], 2);
    assert_eq!(get_account(&client, cards[1]).await["NumReserved"], 0);
}

#[tokio::test]
#[ignore]
async fn test_enqueue_then_dequeue_restores_queue() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let holder = create_account(&client, "Holder").await;
    let visitor = create_account(&client, "Visitor").await;

    let held = reserve(&client, item_id, holder).await;
    let before = queue(&client, item_id).await;

    let passing = reserve(&client, item_id, visitor).await;
    assert_eq!(get_account(&client, visitor).await["NumReserved"], 1);

    let response = cancel(&client, visitor, passing).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(queue(&client, item_id).await, before);
    assert_eq!(before, vec![(held, 1)]);
    assert_eq!(get_item(&client, item_id).await["ReservationCount"], 1);
    assert_eq!(get_account(&client, visitor).await["NumReserved"], 0);
}

#[tokio::test]
#[ignore]
async fn test_cancel_someone_elses_reservation_is_forbidden() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let owner = create_account(&client, "Owner").await;
    let intruder = create_account(&client, "Intruder").await;
    let reservation_id = reserve(&client, item_id, owner).await;

    let response = cancel(&client, intruder, reservation_id).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "NotReservationOwner");

    assert_eq!(queue(&client, item_id).await, vec![(reservation_id, 1)]);

    let response = cancel(&client, owner, reservation_id + 100_000).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_reserve_unknown_item_is_not_found() {
    let client = Client::new();
    let card_id = create_account(&client, "Lost").await;

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({ "ItemID": 999_999, "CardID": card_id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(get_account(&client, card_id).await["NumReserved"], 0);
}

#[tokio::test]
#[ignore]
async fn test_reserve_missing_fields_is_bad_request() {
    let client = Client::new();

    let response = client
        .post(format!("{}/reservations", BASE_URL))
        .json(&json!({ "CardID": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_reassign_overwrites_without_renumbering() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let first = create_account(&client, "Admin One").await;
    let second = create_account(&client, "Admin Two").await;
    let a = reserve(&client, item_id, first).await;
    let b = reserve(&client, item_id, second).await;

    // Collides with `a` at place 1
    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, b))
        .json(&json!({ "ItemID": item_id, "CardID": second, "PlaceInLine": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, b))
        .json(&json!({ "ItemID": item_id, "CardID": second, "PlaceInLine": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(queue(&client, item_id).await, vec![(a, 1), (b, 5)]);
    assert_eq!(get_item(&client, item_id).await["ReservationCount"], 2);
}

#[tokio::test]
#[ignore]
async fn test_enqueue_after_reassign_past_tail() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let first = create_account(&client, "Front").await;
    let second = create_account(&client, "Mover").await;
    let third = create_account(&client, "Late").await;
    let a = reserve(&client, item_id, first).await;
    let b = reserve(&client, item_id, second).await;

    // Place 3 is one past ReservationCount
    let response = client
        .put(format!("{}/reservations/{}", BASE_URL, b))
        .json(&json!({ "ItemID": item_id, "CardID": second, "PlaceInLine": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let c = reserve(&client, item_id, third).await;
    assert_eq!(queue(&client, item_id).await, vec![(a, 1), (b, 3), (c, 4)]);
    assert_eq!(get_item(&client, item_id).await["ReservationCount"], 4);

    // The queue stays usable afterwards
    let d = reserve(&client, item_id, first).await;
    assert_eq!(queue(&client, item_id).await.last(), Some(&(d, 5)));
}

#[tokio::test]
#[ignore]
async fn test_head_of_queue_checkout() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let first = create_account(&client, "Head").await;
    let second = create_account(&client, "Tail").await;
    let head = reserve(&client, item_id, first).await;
    let tail = reserve(&client, item_id, second).await;

    let response = client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, tail))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, head))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    assert_eq!(queue(&client, item_id).await, vec![(tail, 1)]);
    let item = get_item(&client, item_id).await;
    assert_eq!(item["CopiesAvailable"], 0);
    assert_eq!(item["ReservationCount"], 1);
    let account = get_account(&client, first).await;
    assert_eq!(account["NumChecked"], 1);
    assert_eq!(account["NumReserved"], 0);

    // No copy left for the next in line; nothing changes
    let response = client
        .post(format!("{}/reservations/{}/checkout", BASE_URL, tail))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(queue(&client, item_id).await, vec![(tail, 1)]);
}

#[tokio::test]
#[ignore]
async fn test_account_with_checkouts_cannot_be_deleted() {
    let client = Client::new();
    let item_id = create_item(&client, 2).await;
    let card_id = create_account(&client, "Busy Reader").await;

    for _ in 0..2 {
        assert_eq!(checkout(&client, item_id, card_id).await.status(), StatusCode::CREATED);
    }

    let response = client
        .delete(format!("{}/accounts/person/{}", BASE_URL, card_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "AccountHasCheckouts");

    let account = get_account(&client, card_id).await;
    assert_eq!(account["NumChecked"], 2);
    assert_eq!(account["Name"], "Busy Reader");
}

#[tokio::test]
#[ignore]
async fn test_account_with_fees_cannot_be_deleted() {
    let client = Client::new();

    let response = client
        .post(format!("{}/accounts", BASE_URL))
        .json(&json!({ "Name": "Late Payer", "OverdueFees": "3.50" }))
        .send()
        .await
        .unwrap();
    let body: Value = response.json().await.unwrap();
    let card_id = body["CardID"].as_i64().unwrap();

    let response = client
        .get(format!("{}/accounts/person/{}/deletable", BASE_URL, card_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "AccountHasOverdueFees");
}

#[tokio::test]
#[ignore]
async fn test_idle_account_can_be_deleted() {
    let client = Client::new();
    let card_id = create_account(&client, "Leaving").await;

    let response = client
        .delete(format!("{}/accounts/person/{}", BASE_URL, card_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/accounts/person/{}", BASE_URL, card_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore]
async fn test_mixed_queue_sequence_stays_contiguous() {
    let client = Client::new();
    let item_id = create_item(&client, 1).await;
    let mut cards = Vec::new();
    for name in ["Ada", "Ben", "Cleo", "Dev", "Eli"] {
        cards.push(create_account(&client, name).await);
    }
    let mut ids = Vec::new();
    for card in &cards {
        ids.push(reserve(&client, item_id, *card).await);
    }
    assert_queue_consistent(&client, item_id).await;

    // Head
    assert_eq!(cancel(&client, cards[0], ids[0]).await.status(), StatusCode::OK);
    assert_queue_consistent(&client, item_id).await;

    // Middle of Ben, Cleo, Dev, Eli
    assert_eq!(cancel(&client, cards[2], ids[2]).await.status(), StatusCode::OK);
    assert_queue_consistent(&client, item_id).await;

    // Tail
    assert_eq!(cancel(&client, cards[4], ids[4]).await.status(), StatusCode::OK);
    assert_queue_consistent(&client, item_id).await;
    assert_eq!(queue(&client, item_id).await, vec![(ids[1], 1), (ids[3], 2)]);

    let response = promote(&client, ids[1]).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse response");
    let checkout_id = body["CheckoutID"].as_i64().expect("No checkout ID");
    assert_queue_consistent(&client, item_id).await;

    // No copy left: the new head stays queued
    assert_eq!(promote(&client, ids[3]).await.status(), StatusCode::FORBIDDEN);
    assert_queue_consistent(&client, item_id).await;
    assert_eq!(queue(&client, item_id).await, vec![(ids[3], 1)]);

    let late = reserve(&client, item_id, cards[0]).await;
    assert_queue_consistent(&client, item_id).await;

    let response = client
        .delete(format!("{}/checkout/{}", BASE_URL, checkout_id))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    assert_eq!(promote(&client, ids[3]).await.status(), StatusCode::CREATED);
    assert_queue_consistent(&client, item_id).await;
    assert_eq!(queue(&client, item_id).await, vec![(late, 1)]);
    assert_eq!(get_item(&client, item_id).await["CopiesAvailable"], 0);
}
