//! HTTP tests for the offer handlers over the in-memory store.

use actix_web::cookie::Cookie;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::Roles;
use crate::inbound::http::test_utils::{
    create_item, login_cookie, memory_state, seed_account, send_json, test_app,
};

fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("id field").to_owned()
}

async fn item_status<S, B>(app: &S, cookie: &Cookie<'static>, id: &str) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let (status, body) = send_json(
        app,
        actix_test::TestRequest::get().uri(&format!("/api/v1/items/{id}")),
        Some(cookie),
    )
    .await;
    assert_eq!(status, 200);
    body["status"].clone()
}

#[rstest]
#[case(json!("50"), "50.00")]
#[case(json!(12.5), "12.50")]
#[case(json!(7), "7.00")]
#[actix_web::test]
async fn money_offers_accept_string_or_number_amounts(
    #[case] amount: Value,
    #[case] expected: &str,
) {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    let buyer = seed_account(&store, "buyer", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let owner_cookie = login_cookie(&app, "owner").await;
    let buyer_cookie = login_cookie(&app, "buyer").await;
    let item = id_of(&create_item(&app, &owner_cookie, json!({ "title": "Bike" })).await);

    let (status, body) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": item,
            "offerType": "money",
            "moneyAmount": amount,
        })),
        Some(&buyer_cookie),
    )
    .await;
    assert_eq!(status, 201, "{body}");
    assert_eq!(body["offerType"], "money");
    assert_eq!(body["moneyAmount"], expected);
    assert_eq!(body["itemOffered"], Value::Null);
    assert_eq!(body["offerer"], buyer.id().to_string());
    assert_eq!(body["status"], "pending");
    assert_eq!(item_status(&app, &owner_cookie, &item).await, "available");
}

#[rstest]
#[case(json!({ "offerType": "item" }), "invalid_offer")]
#[case(json!({ "offerType": "money" }), "invalid_offer")]
#[case(json!({ "offerType": "money", "moneyAmount": "" }), "invalid_offer")]
#[case(json!({ "offerType": "money", "moneyAmount": "ten" }), "invalid_offer")]
#[case(json!({ "offerType": "money", "moneyAmount": "-5" }), "invalid_offer")]
#[case(json!({ "offerType": "money", "moneyAmount": true }), "invalid_offer")]
#[case(json!({ "offerType": "barter" }), "invalid_offer")]
#[case(json!({ "moneyAmount": "5" }), "invalid_request")]
#[case(json!({ "offerType": "item", "itemOffered": "nope" }), "invalid_request")]
#[actix_web::test]
async fn malformed_terms_are_rejected(#[case] terms: Value, #[case] code: &str) {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    seed_account(&store, "buyer", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let owner_cookie = login_cookie(&app, "owner").await;
    let buyer_cookie = login_cookie(&app, "buyer").await;
    let item = id_of(&create_item(&app, &owner_cookie, json!({ "title": "Bike" })).await);

    let mut payload = terms;
    payload["itemDesired"] = json!(item);
    let (status, body) = send_json(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/offers")
            .set_json(payload),
        Some(&buyer_cookie),
    )
    .await;
    assert_eq!(status, 400, "{body}");
    assert_eq!(body["code"], code);
}

#[rstest]
#[actix_web::test]
async fn anonymous_callers_cannot_offer_and_see_no_offers() {
    let (_store, state) = memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let (status, body) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": "00000000-0000-0000-0000-000000000000",
            "offerType": "money",
            "moneyAmount": "5",
        })),
        None,
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["code"], "unauthorized");

    let (status, body) =
        send_json(&app, actix_test::TestRequest::get().uri("/api/v1/offers"), None).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn owners_cannot_offer_on_their_own_items() {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let cookie = login_cookie(&app, "owner").await;
    let item = id_of(&create_item(&app, &cookie, json!({ "title": "Bike" })).await);

    let (status, body) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": item,
            "offerType": "money",
            "moneyAmount": "5",
        })),
        Some(&cookie),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["code"], "self_offer_denied");
}

#[rstest]
#[actix_web::test]
async fn accepting_a_swap_trades_both_items_once() {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    seed_account(&store, "offerer", Roles::member());
    seed_account(&store, "stranger", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let owner = login_cookie(&app, "owner").await;
    let offerer = login_cookie(&app, "offerer").await;
    let stranger = login_cookie(&app, "stranger").await;

    let desired = id_of(&create_item(&app, &owner, json!({ "title": "Bike" })).await);
    let offered = id_of(&create_item(&app, &offerer, json!({ "title": "Guitar" })).await);
    let (status, offer) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": desired,
            "offerType": "item",
            "itemOffered": offered,
        })),
        Some(&offerer),
    )
    .await;
    assert_eq!(status, 201, "{offer}");
    let offer_uri = format!("/api/v1/offers/{}", id_of(&offer));
    let accept_uri = format!("{offer_uri}/accept");

    let (status, _) = send_json(&app, actix_test::TestRequest::get().uri(&offer_uri), Some(&stranger)).await;
    assert_eq!(status, 404);
    let (status, _) = send_json(&app, actix_test::TestRequest::post().uri(&accept_uri), Some(&offerer)).await;
    assert_eq!(status, 403);

    let (status, accepted) =
        send_json(&app, actix_test::TestRequest::post().uri(&accept_uri), Some(&owner)).await;
    assert_eq!(status, 200, "{accepted}");
    assert_eq!(accepted["status"], "accepted");
    assert_eq!(item_status(&app, &owner, &desired).await, "traded");
    assert_eq!(item_status(&app, &offerer, &offered).await, "traded");

    let (status, body) =
        send_json(&app, actix_test::TestRequest::post().uri(&accept_uri), Some(&owner)).await;
    assert_eq!(status, 409);
    assert_eq!(body["code"], "conflict");
    let (status, _) = send_json(
        &app,
        actix_test::TestRequest::post().uri(&format!("{offer_uri}/refuse")),
        Some(&owner),
    )
    .await;
    assert_eq!(status, 409);
}

#[rstest]
#[actix_web::test]
async fn refusing_leaves_items_untouched() {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    seed_account(&store, "buyer", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let owner = login_cookie(&app, "owner").await;
    let buyer = login_cookie(&app, "buyer").await;
    let item = id_of(&create_item(&app, &owner, json!({ "title": "Bike" })).await);

    let (_, offer) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": item,
            "offerType": "money",
            "moneyAmount": "80",
        })),
        Some(&buyer),
    )
    .await;
    let (status, refused) = send_json(
        &app,
        actix_test::TestRequest::post().uri(&format!("/api/v1/offers/{}/refuse", id_of(&offer))),
        Some(&owner),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(refused["status"], "refused");
    assert_eq!(item_status(&app, &owner, &item).await, "available");
}

#[rstest]
#[actix_web::test]
async fn offerers_revise_and_participants_withdraw() {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    seed_account(&store, "buyer", Roles::member());
    seed_account(&store, "admin", Roles::trade_admin());
    let app = actix_test::init_service(test_app(state)).await;
    let owner = login_cookie(&app, "owner").await;
    let buyer = login_cookie(&app, "buyer").await;
    let admin = login_cookie(&app, "admin").await;
    let item = id_of(&create_item(&app, &owner, json!({ "title": "Bike" })).await);

    let (_, offer) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": item,
            "offerType": "money",
            "moneyAmount": "80",
        })),
        Some(&buyer),
    )
    .await;
    let uri = format!("/api/v1/offers/{}", id_of(&offer));
    let raise = json!({ "offerType": "money", "moneyAmount": "95.5" });

    let (status, _) = send_json(
        &app,
        actix_test::TestRequest::put().uri(&uri).set_json(raise.clone()),
        Some(&owner),
    )
    .await;
    assert_eq!(status, 403);
    let (status, revised) = send_json(
        &app,
        actix_test::TestRequest::put().uri(&uri).set_json(raise),
        Some(&buyer),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(revised["moneyAmount"], "95.50");
    assert_eq!(revised["revision"], 2);

    for cookie in [&owner, &buyer, &admin] {
        let (_, listed) =
            send_json(&app, actix_test::TestRequest::get().uri("/api/v1/offers"), Some(cookie)).await;
        assert_eq!(listed.as_array().map(Vec::len), Some(1));
    }

    let (status, _) = send_json(&app, actix_test::TestRequest::delete().uri(&uri), Some(&owner)).await;
    assert_eq!(status, 204);
    let (status, _) = send_json(&app, actix_test::TestRequest::get().uri(&uri), Some(&admin)).await;
    assert_eq!(status, 404);
}

#[rstest]
#[actix_web::test]
async fn counter_items_must_belong_to_the_offerer() {
    let (store, state) = memory_state();
    seed_account(&store, "owner", Roles::member());
    seed_account(&store, "buyer", Roles::member());
    let app = actix_test::init_service(test_app(state)).await;
    let owner = login_cookie(&app, "owner").await;
    let buyer = login_cookie(&app, "buyer").await;
    let desired = id_of(&create_item(&app, &owner, json!({ "title": "Bike" })).await);
    let not_mine = id_of(&create_item(&app, &owner, json!({ "title": "Helmet" })).await);

    let (status, body) = send_json(
        &app,
        actix_test::TestRequest::post().uri("/api/v1/offers").set_json(json!({
            "itemDesired": desired,
            "offerType": "item",
            "itemOffered": not_mine,
        })),
        Some(&buyer),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "invalid_offer");
}
