//! Query translation and write paths exercised directly through `CrudService`.

use schemarest::{apply_migrations, resolve, CrudService, Filter, Pagination, RawPredicate, ResolvedModel, SchemaConfig, Store};
use serde_json::{json, Value};
use std::collections::BTreeMap;

async fn setup() -> (Store, ResolvedModel) {
    let configs: Vec<SchemaConfig> = serde_json::from_str(
        r#"[
            {"name": "Car", "primaryKey": "id",
             "properties": {"id": "int", "make": "string", "model": "string", "miles": "int"}},
            {"name": "Listing", "primaryKey": "id",
             "properties": {"id": "int", "sold": "bool", "price": "double",
                            "listed": {"type": "date", "optional": true}}}
        ]"#,
    )
    .unwrap();
    let model = resolve(&configs).unwrap();
    let store = Store::in_memory().await.unwrap();
    apply_migrations(&store, &model).await.unwrap();
    (store, model)
}

async fn seed_cars(store: &Store, model: &ResolvedModel) {
    let car = model.schema("Car").unwrap();
    for (make, model_name) in [
        ("Toyota", "Corolla"),
        ("Honda", "Civic"),
        ("Toyota", "Camry"),
        ("Kia", "Rio"),
        ("Honda", "Fit"),
    ] {
        CrudService::create(store, car, json!({"make": make, "model": model_name, "miles": 0}))
            .await
            .unwrap();
    }
}

fn ids(rows: &[Value]) -> Vec<i64> {
    rows.iter().map(|r| r["id"].as_i64().unwrap()).collect()
}

#[tokio::test]
async fn equality_filter_returns_exact_subset() {
    let (store, model) = setup().await;
    seed_cars(&store, &model).await;
    let car = model.schema("Car").unwrap();

    let rows = CrudService::find_all(&store, car, Some(&Filter::eq("make", "Toyota")), Pagination::default())
        .await
        .unwrap();
    assert_eq!(ids(&rows), vec![1, 3]);
    assert!(rows.iter().all(|r| r["make"] == "Toyota"));

    let both = Filter::Equals(BTreeMap::from([
        ("make".to_string(), "Honda".to_string()),
        ("model".to_string(), "Fit".to_string()),
    ]));
    let rows = CrudService::find_all(&store, car, Some(&both), Pagination::default()).await.unwrap();
    assert_eq!(ids(&rows), vec![5]);

    let rows = CrudService::find_all(&store, car, Some(&Filter::eq("make", "Tesla")), Pagination::default())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn pagination_window() {
    let (store, model) = setup().await;
    seed_cars(&store, &model).await;
    let car = model.schema("Car").unwrap();

    let rows = CrudService::find_all(&store, car, None, Pagination::new(Some(2), Some(1))).await.unwrap();
    assert_eq!(ids(&rows), vec![2, 3]);

    let rows = CrudService::find_all(&store, car, None, Pagination::new(Some(10), Some(3))).await.unwrap();
    assert_eq!(ids(&rows), vec![4, 5]);

    let rows = CrudService::find_all(&store, car, None, Pagination::new(None, Some(4))).await.unwrap();
    assert_eq!(ids(&rows), vec![5]);

    let rows = CrudService::find_all(&store, car, None, Pagination::default()).await.unwrap();
    assert_eq!(rows.len(), 5);
}

#[tokio::test]
async fn limit_defaults_to_twenty() {
    let (store, model) = setup().await;
    let car = model.schema("Car").unwrap();
    for _ in 0..25 {
        CrudService::create(&store, car, json!({"make": "Kia", "model": "Rio", "miles": 1}))
            .await
            .unwrap();
    }
    let rows = CrudService::find_all(&store, car, None, Pagination::new(None, Some(0))).await.unwrap();
    assert_eq!(rows.len(), 20);
}

#[tokio::test]
async fn find_one_absent_is_none() {
    let (store, model) = setup().await;
    seed_cars(&store, &model).await;
    let car = model.schema("Car").unwrap();

    let found = CrudService::find_one(&store, car, &Filter::eq("make", "Honda")).await.unwrap();
    assert_eq!(found.unwrap()["id"], 2);
    assert!(CrudService::find_one(&store, car, &Filter::eq("make", "Saab")).await.unwrap().is_none());
    assert!(CrudService::find_by_id(&store, car, "99").await.unwrap().is_none());
}

#[tokio::test]
async fn raw_predicate_passes_through() {
    let (store, model) = setup().await;
    seed_cars(&store, &model).await;
    let car = model.schema("Car").unwrap();

    let raw = Filter::Raw(RawPredicate::new_unchecked("\"id\" > 2 AND \"make\" <> 'Kia'"));
    let rows = CrudService::find_all(&store, car, Some(&raw), Pagination::default()).await.unwrap();
    assert_eq!(ids(&rows), vec![3, 5]);
}

#[tokio::test]
async fn bool_and_double_filters_use_text_rendering() {
    let (store, model) = setup().await;
    let listing = model.schema("Listing").unwrap();
    CrudService::create(&store, listing, json!({"sold": true, "price": 9.5, "listed": "2024-03-01T10:00:00Z"}))
        .await
        .unwrap();
    CrudService::create(&store, listing, json!({"sold": false, "price": 12.25}))
        .await
        .unwrap();

    let sold = CrudService::find_all(&store, listing, Some(&Filter::eq("sold", "true")), Pagination::default())
        .await
        .unwrap();
    assert_eq!(
        sold,
        vec![json!({"id": 1, "sold": true, "price": 9.5, "listed": "2024-03-01T10:00:00Z"})]
    );

    let cheap = CrudService::find_all(&store, listing, Some(&Filter::eq("price", "12.25")), Pagination::default())
        .await
        .unwrap();
    assert_eq!(ids(&cheap), vec![2]);
    assert_eq!(cheap[0]["listed"], Value::Null);
}

#[tokio::test]
async fn delete_and_upsert() {
    let (store, model) = setup().await;
    seed_cars(&store, &model).await;
    let car = model.schema("Car").unwrap();

    assert!(CrudService::delete(&store, car, "3").await.unwrap());
    assert!(!CrudService::delete(&store, car, "3").await.unwrap());

    let replacement = json!({"id": 3, "make": "Mazda", "model": "MX-5", "miles": 7});
    CrudService::upsert(&store, car, &replacement).await.unwrap();
    CrudService::upsert(&store, car, &replacement).await.unwrap();
    let found = CrudService::find_by_id(&store, car, "3").await.unwrap();
    assert_eq!(found, Some(replacement));

    let all = CrudService::find_all(&store, car, None, Pagination::default()).await.unwrap();
    assert_eq!(all.len(), 5);
}
