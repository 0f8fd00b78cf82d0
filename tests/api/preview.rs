use std::time::Duration;

use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, ResponseTemplate,
};

use crate::helper::{spawn_app, two_previews};

#[tokio::test]
async fn rapid_edits_issue_a_single_preview_request() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .and(method("POST"))
        .and(body_partial_json(json!({
            "subject": "Hi {{first_name}}",
            "body": "Hello {{first_name}}, welcome aboard",
            "mode": "personalized",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(1)
        .mount(&test_app.backend)
        .await;
    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(0)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_personalized(true);
    test_app.app.set_subject("Hi {{first_name}}");
    test_app.app.set_body("Hello {{first_name}}");
    tokio::time::sleep(Duration::from_millis(50)).await;
    test_app.app.set_body("Hello {{first_name}}, welcome aboard");

    let preview = test_app.app.settled_preview().await;

    assert_eq!(preview.emails.len(), 2);
    assert_eq!(preview.error, None);
}

#[tokio::test]
async fn nothing_is_requested_until_the_draft_is_complete() {
    let mut test_app = spawn_app().await;

    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(0)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_email("Hi {{first_name}}", "Hello");
    tokio::time::sleep(Duration::from_millis(500)).await;

    let preview = test_app.app.preview();
    assert!(!preview.loading);
    assert!(preview.emails.is_empty());
}

#[tokio::test]
async fn the_navigator_wraps_around_the_previews() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_personalized(true);
    test_app.app.set_email("Hi {{first_name}}", "Hello {{first_name}}");
    test_app.app.settled_preview().await;

    assert_eq!(test_app.app.preview_index(), 0);
    assert_eq!(test_app.app.next_preview(), 1);
    let current = test_app.app.current_preview().unwrap();
    assert_eq!(current.email, "alan@example.com");
    assert_eq!(current.subject_or(test_app.app.subject()), "Hi Alan");

    assert_eq!(test_app.app.next_preview(), 0);
    assert_eq!(test_app.app.previous_preview(), 1);
    assert_eq!(test_app.app.previous_preview(), 0);
    assert_eq!(
        test_app.app.current_preview().unwrap().rendered_body,
        "Hello Ada"
    );
}

#[tokio::test]
async fn a_single_failure_is_retried() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&test_app.backend)
        .await;
    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_email("Hi {{first_name}}", "Hello {{first_name}}");
    let preview = test_app.app.settled_preview().await;

    assert_eq!(preview.emails.len(), 2);
    assert_eq!(preview.error, None);
}

#[tokio::test]
async fn a_failed_retry_clears_the_previews_and_shows_the_error() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .up_to_n_times(1)
        .mount(&test_app.backend)
        .await;
    Mock::given(path("/personalize-emails"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "detail": "Personalization failed: Missing 'company' in data."
        })))
        .expect(2)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_personalized(true);
    test_app.app.set_email("Hi {{first_name}}", "Hello {{first_name}}");
    assert_eq!(test_app.app.settled_preview().await.emails.len(), 2);

    test_app.app.set_body("Hello {{first_name}} from {{company}}");
    let preview = test_app.app.settled_preview().await;

    assert!(preview.emails.is_empty());
    assert_eq!(
        preview.error.as_deref(),
        Some("Personalization failed: Missing 'company' in data.")
    );
    assert!(test_app.app.current_preview().is_none());
    assert!(!test_app.app.can_send());
}

#[tokio::test]
async fn a_superseded_request_never_shows_up() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .and(body_partial_json(json!({ "body": "first draft" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "emails": [{ "email": "ada@example.com", "rendered_body": "stale" }]
                }))
                .set_delay(Duration::from_millis(800)),
        )
        .mount(&test_app.backend)
        .await;
    Mock::given(path("/personalize-emails"))
        .and(body_partial_json(json!({ "body": "second draft" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_email("Hello", "first draft");
    // past the debounce window, so the first request is in flight
    tokio::time::sleep(Duration::from_millis(450)).await;
    test_app.app.set_body("second draft");

    let preview = test_app.app.settled_preview().await;
    assert_eq!(preview.emails.len(), 2);

    tokio::time::sleep(Duration::from_millis(800)).await;
    let preview = test_app.app.preview();
    assert!(preview.emails.iter().all(|e| e.rendered_body != "stale"));
    assert_eq!(preview.emails.len(), 2);
}

#[tokio::test]
async fn bulk_previews_are_requested_in_bulk_mode() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/personalize-emails"))
        .and(body_partial_json(json!({
            "mode": "bulk",
            "recipients": [
                { "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" },
                { "first_name": "Alan", "last_name": "Turing", "email": "alan@example.com" },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(two_previews()))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    test_app.app.set_email("News", "Same for everyone");

    assert_eq!(test_app.app.settled_preview().await.emails.len(), 2);
}
