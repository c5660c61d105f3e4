//! Integration tests for inventory operations: registration defaults,
//! filtered listing, stock corrections, thresholds, planing, and alerts.

use yard_core::alerts::StockSeverity;
use yard_core::{
    CoreError, DEFAULT_THRESHOLD_SUMMER, DEFAULT_THRESHOLD_WINTER, PLANED_NAME_SUFFIX,
    PLANED_PRICE_SURCHARGE_CENTS,
};
use yard_db::{Database, DbConfig, DbError, NewProduct, ProductFilter};

async fn test_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn lumber(name: &str, stock: i64, price_cents: i64) -> NewProduct {
    NewProduct {
        name: name.to_string(),
        category: "Lumber".to_string(),
        price_cents,
        stock,
        length_cm: Some(240.0),
        width_cm: Some(5.0),
        height_cm: Some(10.0),
        ..Default::default()
    }
}

#[tokio::test]
async fn register_applies_threshold_defaults() {
    let db = test_db().await;

    let product = db
        .products()
        .register(&lumber("Pine board 2x4", 25, 4500))
        .await
        .unwrap();

    assert_eq!(product.threshold_winter, DEFAULT_THRESHOLD_WINTER);
    assert_eq!(product.threshold_summer, DEFAULT_THRESHOLD_SUMMER);
    assert!(!product.planed);

    let reread = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(reread.name, "Pine board 2x4");
    assert_eq!(reread.stock, 25);
    assert_eq!(reread.price_cents, 4500);
    assert_eq!(reread.length_cm, Some(240.0));
}

#[tokio::test]
async fn register_rejects_invalid_fields() {
    let db = test_db().await;

    let err = db
        .products()
        .register(&NewProduct {
            name: "".to_string(),
            category: "Lumber".to_string(),
            price_cents: 100,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::MalformedInput(_))));

    let err = db
        .products()
        .register(&NewProduct {
            name: "Pine board".to_string(),
            category: "Lumber".to_string(),
            price_cents: -5,
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Core(CoreError::MalformedInput(_))));

    assert_eq!(db.products().count().await.unwrap(), 0);
}

#[tokio::test]
async fn listing_applies_filters() {
    let db = test_db().await;
    db.products()
        .register(&lumber("Pine board 2x4", 10, 4500))
        .await
        .unwrap();
    db.products()
        .register(&lumber("Oak plank 1x6", 10, 8900))
        .await
        .unwrap();
    db.products()
        .register(&NewProduct {
            name: "Wood glue 1L".to_string(),
            category: "Hardware".to_string(),
            price_cents: 1200,
            stock: 5,
            ..Default::default()
        })
        .await
        .unwrap();

    let all = db.products().list(&ProductFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    // Sorted by name
    assert_eq!(all[0].name, "Oak plank 1x6");

    let lumber_only = db
        .products()
        .list(&ProductFilter {
            category: Some("Lumber".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(lumber_only.len(), 2);

    let pine = db
        .products()
        .list(&ProductFilter {
            name: Some("pine".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pine.len(), 1);
    assert_eq!(pine[0].name, "Pine board 2x4");

    let planed = db
        .products()
        .list(&ProductFilter {
            planed: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(planed.is_empty());
}

#[tokio::test]
async fn set_stock_records_signed_delta() {
    let db = test_db().await;
    let product = db
        .products()
        .register(&lumber("Pine board 2x4", 20, 4500))
        .await
        .unwrap();

    let adjustment = db.products().set_stock(&product.id, 35).await.unwrap();
    assert_eq!(adjustment.delta, 15);

    let adjustment = db.products().set_stock(&product.id, 30).await.unwrap();
    assert_eq!(adjustment.delta, -5);

    let reread = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(reread.stock, 30);

    let trail = db.products().stock_adjustments(&product.id).await.unwrap();
    assert_eq!(trail.len(), 2);

    // Negative target stock is refused
    assert!(db.products().set_stock(&product.id, -1).await.is_err());
}

#[tokio::test]
async fn update_thresholds_changes_alerting() {
    let db = test_db().await;
    let product = db
        .products()
        .register(&lumber("Pine board 2x4", 6, 4500))
        .await
        .unwrap();

    db.products()
        .update_thresholds(&product.id, 12, 3)
        .await
        .unwrap();

    let reread = db.products().get_by_id(&product.id).await.unwrap().unwrap();
    assert_eq!(reread.threshold_winter, 12);
    assert_eq!(reread.threshold_summer, 3);

    // July: stock 6 of threshold 12 → 50%, Low band
    let winter_alerts = db.products().stock_alerts(7).await.unwrap();
    assert_eq!(winter_alerts.len(), 1);
    assert_eq!(winter_alerts[0].severity, StockSeverity::Low);

    // January: stock 6 of threshold 3 → 200%, above the pre-alert cutoff
    let summer_alerts = db.products().stock_alerts(1).await.unwrap();
    assert!(summer_alerts.is_empty());

    // Unknown product
    assert!(db
        .products()
        .update_thresholds("no-such-product", 1, 1)
        .await
        .is_err());
}

#[tokio::test]
async fn planing_moves_stock_to_surcharged_twin() {
    let db = test_db().await;
    let rough = db
        .products()
        .register(&lumber("Pine board 2x4", 50, 4500))
        .await
        .unwrap();

    let twin = db.products().plane_stock(&rough.id, 20).await.unwrap();

    assert_eq!(twin.name, format!("Pine board 2x4{PLANED_NAME_SUFFIX}"));
    assert!(twin.planed);
    assert_eq!(twin.stock, 20);
    assert_eq!(twin.price_cents, 4500 + PLANED_PRICE_SURCHARGE_CENTS);
    assert_eq!(twin.length_cm, rough.length_cm);

    let rough_after = db.products().get_by_id(&rough.id).await.unwrap().unwrap();
    assert_eq!(rough_after.stock, 30);
    assert!(!rough_after.planed);

    // A second run reuses the same twin
    let twin_again = db.products().plane_stock(&rough.id, 30).await.unwrap();
    assert_eq!(twin_again.id, twin.id);
    assert_eq!(twin_again.stock, 50);

    // Source drained to zero gets flagged as planed-out
    let rough_after = db.products().get_by_id(&rough.id).await.unwrap().unwrap();
    assert_eq!(rough_after.stock, 0);
    assert!(rough_after.planed);

    assert_eq!(db.products().count().await.unwrap(), 2);
}

#[tokio::test]
async fn planing_rejects_bad_quantities() {
    let db = test_db().await;
    let rough = db
        .products()
        .register(&lumber("Pine board 2x4", 10, 4500))
        .await
        .unwrap();

    let err = db.products().plane_stock(&rough.id, 11).await.unwrap_err();
    match err {
        DbError::Core(CoreError::InsufficientStock {
            available,
            requested,
            ..
        }) => {
            assert_eq!(available, 10);
            assert_eq!(requested, 11);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(db.products().plane_stock(&rough.id, 0).await.is_err());

    // Nothing changed, no twin created
    let rough_after = db.products().get_by_id(&rough.id).await.unwrap().unwrap();
    assert_eq!(rough_after.stock, 10);
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn stock_alerts_sort_most_critical_first() {
    let db = test_db().await;

    // Defaults: winter threshold 10. Stocks chosen to land in each band.
    for (name, stock) in [
        ("Comfortable", 50), // 500% → excluded
        ("At the line", 10), // 100% → Normal
        ("Worrying", 6),     // 60% → Warning
        ("Scarce", 4),       // 40% → Low
        ("Nearly out", 1),   // 10% → Critical
    ] {
        db.products()
            .register(&lumber(name, stock, 1000))
            .await
            .unwrap();
    }

    let alerts = db.products().stock_alerts(8).await.unwrap();

    let names: Vec<&str> = alerts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Nearly out", "Scarce", "Worrying", "At the line"]);
    assert_eq!(alerts[0].severity, StockSeverity::Critical);
    assert_eq!(alerts[1].severity, StockSeverity::Low);
    assert_eq!(alerts[2].severity, StockSeverity::Warning);
    assert_eq!(alerts[3].severity, StockSeverity::Normal);
}
