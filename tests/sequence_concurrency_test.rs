//! Concurrency tests for display number allocation: parallel document
//! creation must never hand out a duplicate or skip a number.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::http::Method;
use common::{response_json, TestApp};
use futures::future::join_all;
use procura_api::sequence::{self, DocumentKind};
use serde_json::json;

#[tokio::test]
async fn parallel_creates_get_unique_dense_numbers() {
    let app = Arc::new(TestApp::new().await);
    let vendor_id = app.seed_vendor("Parallel Vendor", "parallel@vendor.example").await;
    let product_id = app.seed_product("Parallel Widget", vendor_id).await;

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let app = app.clone();
            let requester = app.user.id;
            tokio::spawn(async move {
                let response = app
                    .request_authenticated(
                        Method::POST,
                        "/api/v1/purchase-requests",
                        Some(json!({
                            "requester_id": requester.to_string(),
                            "items": [
                                {
                                    "product_id": product_id.to_string(),
                                    "quantity": 1,
                                    "estimated_unit_price": "1.00",
                                },
                            ],
                        })),
                    )
                    .await;
                assert_eq!(response.status(), 201);
                response_json(response).await["data"]["id"]
                    .as_str()
                    .expect("request id")
                    .to_string()
            })
        })
        .collect();

    let ids: BTreeSet<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|result| result.expect("create task panicked"))
        .collect();

    let expected: BTreeSet<String> = (1..=6)
        .map(|n| DocumentKind::PurchaseRequest.format(n))
        .collect();
    assert_eq!(ids, expected, "numbers must be unique and gap-free");
}

#[tokio::test]
async fn each_document_kind_counts_on_its_own() {
    let app = TestApp::new().await;
    let db = &*app.state.db;

    for expected in ["PR000001", "PR000002", "PR000003"] {
        let id = sequence::next_document_id(db, DocumentKind::PurchaseRequest)
            .await
            .expect("allocate purchase request number");
        assert_eq!(id, expected);
    }

    let rfq = sequence::next_document_id(db, DocumentKind::Rfq)
        .await
        .expect("allocate rfq number");
    assert_eq!(rfq, "RFQ000001");

    let po = sequence::next_document_id(db, DocumentKind::PurchaseOrder)
        .await
        .expect("allocate purchase order number");
    assert_eq!(po, "PO000001");

    let pr = sequence::next_document_id(db, DocumentKind::PurchaseRequest)
        .await
        .expect("allocate after other kinds");
    assert_eq!(pr, "PR000004");
}

#[tokio::test]
async fn interleaved_allocators_share_one_counter() {
    let app = Arc::new(TestApp::new().await);

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                sequence::next_document_id(&*app.state.db, DocumentKind::Rfq)
                    .await
                    .expect("allocate rfq number")
            })
        })
        .collect();

    let numbers: BTreeSet<String> = join_all(tasks)
        .await
        .into_iter()
        .map(|result| result.expect("allocator task panicked"))
        .collect();

    assert_eq!(numbers.len(), 8, "every allocation must be distinct");
    let expected: BTreeSet<String> = (1..=8).map(|n| DocumentKind::Rfq.format(n)).collect();
    assert_eq!(numbers, expected);
}
