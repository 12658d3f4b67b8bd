mod common;

use common::TestContext;
use futures::future::join_all;
use stars_and_shelves::models::NewUser;
use tokio_test::assert_ok;

#[tokio::test]
async fn test_rate_twice_keeps_one_row_with_latest_value() {
    let ctx = TestContext::seeded().await.expect("Failed to create test context");

    let first = ctx.ratings.rate_book("4", "2", 1).await.expect("Failed to rate book");
    assert_eq!(first.rating, 1);

    let second = ctx.ratings.rate_book("4", "2", 5).await.expect("Failed to re-rate book");
    assert_eq!(second.user_id, "2");
    assert_eq!(second.book_id, "4");
    assert_eq!(second.rating, 5);

    let conn = ctx.store().await;
    let rows: Vec<_> = conn
        .ratings_by_user("2").await
        .expect("Failed to read ratings")
        .into_iter()
        .filter(|r| r.book_id == "4")
        .collect();

    assert_eq!(rows.len(), 1, "Expected exactly one rating row for the pair");
    assert_eq!(rows[0].rating, 5);
}

#[tokio::test]
async fn test_delete_missing_rating_is_noop() {
    let ctx = TestContext::seeded().await.expect("Failed to create test context");

    let deleted = assert_ok!(ctx.ratings.delete_rating("5", "4").await);
    assert!(!deleted);

    // Unknown user and book ids are not an error either
    let deleted = assert_ok!(ctx.ratings.delete_rating("no-such-book", "no-such-user").await);
    assert!(!deleted);
}

#[tokio::test]
async fn test_delete_existing_rating() {
    let ctx = TestContext::seeded().await.expect("Failed to create test context");

    let deleted = ctx.ratings.delete_rating("3", "2").await.expect("Failed to delete rating");
    assert!(deleted);

    let conn = ctx.store().await;
    let remaining = conn.ratings_by_user("2").await.expect("Failed to read ratings");
    assert!(remaining.iter().all(|r| r.book_id != "3"));
}

#[tokio::test]
async fn test_average_rating_of_three_and_five_is_four() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    ctx.ratings.rate_book("a", "reader", 3).await.expect("Failed to rate book");
    ctx.ratings.rate_book("b", "reader", 5).await.expect("Failed to rate book");

    let average = ctx.ratings.average_rating("reader").await.expect("Failed to average");
    assert_eq!(average, Some(4.0));
}

#[tokio::test]
async fn test_average_rating_without_ratings_is_none() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let conn = ctx.store().await;
    conn.upsert_user(&NewUser {
        id: "lonely".to_string(),
        username: "lonely".to_string(),
        role: None,
    }).await.expect("Failed to insert user");

    let average = ctx.ratings.average_rating("lonely").await.expect("Failed to average");
    assert_eq!(average, None);
}

#[tokio::test]
async fn test_rating_does_not_check_references() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    let record = ctx.ratings
        .rate_book("ghost-book", "ghost-user", 2).await
        .expect("Rating unknown ids should reach the store");

    assert_eq!(record.book_id, "ghost-book");
    assert_eq!(record.user_id, "ghost-user");
}

#[tokio::test]
async fn test_average_rating_of_extreme_values() {
    let ctx = TestContext::new().await.expect("Failed to create test context");

    ctx.ratings.rate_book("a", "outlier", i64::MAX).await.expect("Failed to rate book");
    ctx.ratings.rate_book("b", "outlier", i64::MAX).await.expect("Failed to rate book");

    let average = ctx.ratings.average_rating("outlier").await.expect("Failed to average");
    assert_eq!(average, Some(i64::MAX as f64));
}

#[tokio::test]
async fn test_concurrent_rates_leave_single_row() {
    let ctx = TestContext::seeded().await.expect("Failed to create test context");

    let written: Vec<i64> = (1..=32).collect();
    let results = join_all(
        written.iter().map(|&rating| {
            let ratings = ctx.ratings.clone();
            async move { ratings.rate_book("5", "3", rating).await }
        })
    ).await;

    for result in &results {
        let record = assert_ok!(result.as_ref());
        assert_eq!(record.user_id, "3");
        assert_eq!(record.book_id, "5");
    }

    let conn = ctx.store().await;
    let rows: Vec<_> = conn
        .ratings_by_user("3").await
        .expect("Failed to read ratings")
        .into_iter()
        .filter(|r| r.book_id == "5")
        .collect();

    assert_eq!(rows.len(), 1);
    assert!(written.contains(&rows[0].rating));
}
