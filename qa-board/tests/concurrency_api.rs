mod common;

use actix_web::http::StatusCode;
use common::{create_answer, create_question, delete, get, post, setup_file_test_app, USER_ID};
use futures_util::future::join_all;
use serde_json::json;

#[actix_rt::test]
async fn test_concurrent_question_creates_all_succeed() -> anyhow::Result<()> {
    let test_app = setup_file_test_app(5).await?;

    let results = join_all((0..40).map(|i| {
        post(
            &test_app.app,
            "/questions/",
            json!({ "text": format!("question {i}") }),
        )
    }))
    .await;

    for (status, body) in &results {
        assert_eq!(*status, StatusCode::CREATED, "unexpected body: {body}");
    }

    let (_, listed) = get(&test_app.app, "/questions/").await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 40);

    // Newest first, and creation times never run backwards
    let stamps: Vec<&str> = listed
        .iter()
        .map(|q| q["created_at"].as_str().unwrap())
        .collect();
    assert!(stamps.windows(2).all(|pair| pair[0] >= pair[1]));
    let ids: Vec<i64> = listed.iter().map(|q| q["id"].as_i64().unwrap()).collect();
    assert!(ids.windows(2).all(|pair| pair[0] > pair[1]));
    Ok(())
}

#[actix_rt::test]
async fn test_concurrent_answer_creates_all_succeed() -> anyhow::Result<()> {
    let test_app = setup_file_test_app(5).await?;
    let question = create_question(&test_app.app, "busy").await;
    let uri = format!("/questions/{question}/answers/");

    let results = join_all((0..30).map(|i| {
        post(
            &test_app.app,
            &uri,
            json!({ "user_id": USER_ID, "text": format!("answer {i}") }),
        )
    }))
    .await;

    for (status, body) in &results {
        assert_eq!(*status, StatusCode::CREATED, "unexpected body: {body}");
    }
    assert_eq!(test_app.db.list_answers().await?.len(), 30);
    Ok(())
}

#[actix_rt::test]
async fn test_readers_never_see_partial_cascade() -> anyhow::Result<()> {
    let test_app = setup_file_test_app(5).await?;
    let question = create_question(&test_app.app, "contended").await;
    let survivor = create_question(&test_app.app, "bystander").await;
    for i in 0..5 {
        create_answer(&test_app.app, question, &format!("answer {i}")).await;
    }
    create_answer(&test_app.app, survivor, "kept").await;

    let uri = format!("/questions/{question}/");
    let readers = join_all((0..10).map(|_| get(&test_app.app, "/questions/")));
    let (deleted, listings) = tokio::join!(delete(&test_app.app, &uri), readers);

    assert_eq!(deleted.0, StatusCode::NO_CONTENT);

    // Each listing shows the question with all five answers, or not at all
    for (status, listing) in listings {
        assert_eq!(status, StatusCode::OK);
        let listing = listing.as_array().unwrap();
        if let Some(q) = listing.iter().find(|q| q["id"] == question) {
            assert_eq!(q["answers"].as_array().unwrap().len(), 5);
        }
        let bystander = listing.iter().find(|q| q["id"] == survivor).unwrap();
        assert_eq!(bystander["answers"].as_array().unwrap().len(), 1);
    }

    assert_eq!(test_app.db.list_answers().await?.len(), 1);
    Ok(())
}

#[actix_rt::test]
async fn test_answer_racing_question_delete_is_never_orphaned() -> anyhow::Result<()> {
    let test_app = setup_file_test_app(5).await?;
    let question = create_question(&test_app.app, "going away").await;

    let uri = format!("/questions/{question}/answers/");
    let answers = join_all((0..10).map(|i| {
        post(
            &test_app.app,
            &uri,
            json!({ "user_id": USER_ID, "text": format!("late {i}") }),
        )
    }));
    let delete_uri = format!("/questions/{question}/");
    let (deleted, results) = tokio::join!(delete(&test_app.app, &delete_uri), answers);

    assert_eq!(deleted.0, StatusCode::NO_CONTENT);
    for (status, body) in results {
        assert!(
            status == StatusCode::CREATED || status == StatusCode::NOT_FOUND,
            "unexpected {status}: {body}"
        );
    }
    assert!(test_app.db.list_answers().await?.is_empty());
    Ok(())
}
