mod test_support;

use actix_web::http::StatusCode;
use actix_web::{test, App};
use backend::services;
use serde_json::{json, Value};
use test_support::{place_json, temp_state};

#[actix_web::test]
async fn create_get_update_delete_round_trip() {
    let (_dir, state) = temp_state();
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    let req = test::TestRequest::post()
        .uri("/api/places")
        .set_json(place_json("Dar El Jeld"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["rating"], 0.0);
    assert_eq!(created["types"], json!([]));

    let req = test::TestRequest::get().uri(&format!("/api/places/{id}")).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["title"], "Dar El Jeld");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/places/{id}"))
        .set_json(json!({"rating": 4.7, "website": "https://dareljeld.tn"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["rating"], 4.7);
    assert_eq!(updated["title"], "Dar El Jeld");
    assert_eq!(updated["website"], "https://dareljeld.tn");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let req = test::TestRequest::delete().uri(&format!("/api/places/{id}")).to_request();
    let deleted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(deleted["message"], "Place deleted successfully");

    let req = test::TestRequest::get().uri(&format!("/api/places/{id}")).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Place not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[actix_web::test]
async fn invalid_create_lists_every_violation() {
    let (_dir, state) = temp_state();
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    let req = test::TestRequest::post()
        .uri("/api/places")
        .set_json(json!({"title": "Nowhere", "category": "Bakery", "latitude": 0, "longitude": 999}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_FAILED");
    let details: Vec<&str> = body["details"]
        .as_array()
        .expect("details")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(details.contains(&"governorate is required"));
    assert!(details.contains(&"address is required"));
    assert!(details.contains(&"longitude must be between -180 and 180"));
    assert!(details.iter().any(|d| d.starts_with("category must be one of")));
    assert!(!details.contains(&"latitude is required"));
}

#[actix_web::test]
async fn invalid_patch_leaves_the_record_untouched() {
    let (_dir, state) = temp_state();
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    let req = test::TestRequest::post()
        .uri("/api/places")
        .set_json(place_json("Le Baroque"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["id"].as_str().expect("id");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/places/{id}"))
        .set_json(json!({"latitude": 120.0}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&format!("/api/places/{id}")).to_request();
    let fetched: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["latitude"], 36.8);

    let req = test::TestRequest::patch()
        .uri("/api/places/missing")
        .set_json(json!({"title": "x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_json_uses_the_error_shape() {
    let (_dir, state) = temp_state();
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    let req = test::TestRequest::post()
        .uri("/api/places")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[actix_web::test]
async fn listing_filters_sorts_and_paginates() {
    let (_dir, state) = temp_state();
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    for (title, category, rating, phone) in [
        ("Café des Nattes", "Café", 4.4, Some("+216 71 740 000")),
        ("Café Zarzis", "Café", 3.1, None),
        ("Hotel Majestic", "Hotel", 4.0, Some("+216 71 332 666")),
        ("Café El Ali", "Café", 4.8, None),
    ] {
        let mut body = place_json(title);
        body["category"] = json!(category);
        body["rating"] = json!(rating);
        if let Some(phone) = phone {
            body["phoneNumber"] = json!(phone);
        }
        let req = test::TestRequest::post().uri("/api/places").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/places?category=Caf%C3%A9&sortBy=rating&sortOrder=desc&limit=2&page=1")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 3);
    assert_eq!(page["totalAll"], 4);
    assert_eq!(page["pagination"]["totalPages"], 2);
    let titles: Vec<&str> = page["places"]
        .as_array()
        .expect("places")
        .iter()
        .filter_map(|p| p["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Café El Ali", "Café des Nattes"]);

    let req = test::TestRequest::get()
        .uri("/api/places?search=ZARZIS&hasPhone=false&page=1")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["places"][0]["title"], "Café Zarzis");

    let req = test::TestRequest::get()
        .uri("/api/places?search=CAF%C3%89%20EL")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["places"][0]["title"], "Café El Ali");

    let req = test::TestRequest::get()
        .uri("/api/places?hasPhone=true&sortBy=title&sortOrder=asc")
        .to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(page["total"], 2);
    assert_eq!(page["places"][0]["title"], "Café des Nattes");

    let req = test::TestRequest::get().uri("/api/places?limit=abc").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn seeded_place_accepts_an_unrelated_patch() {
    let (_dir, state) = temp_state();
    let raw: backend::seed::RawPlace = serde_json::from_value(json!({
        "title": "Dar",
        "address": "Medina",
        "latitude": 36.79,
        "longitude": 10.17,
        "type": "Hotel"
    }))
    .expect("raw place");
    let seeded = backend::seed::transform(raw).expect("transform");
    assert_eq!(seeded.governorate, "Non spécifié");
    let conn = state.db.connect().expect("connect");
    let stored = backend::db::places::insert(&conn, &seeded, chrono::Utc::now()).expect("insert");
    let app = test::init_service(App::new().configure(|cfg| services::configure(cfg, &state))).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/places/{}", stored.id))
        .set_json(json!({"phoneNumber": "+216 71 000 000"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["phoneNumber"], "+216 71 000 000");
    assert_eq!(updated["governorate"], "Non spécifié");
    assert_eq!(updated["category"], "Hotel");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/places/{}", stored.id))
        .set_json(json!({"governorate": "Paris"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
