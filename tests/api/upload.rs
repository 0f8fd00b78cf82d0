use campaign_manager::app::{AppError, Step};
use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, body_string_contains, method, path},
    Mock, ResponseTemplate,
};

use crate::helper::{spawn_app, two_recipients};

#[tokio::test]
async fn every_valid_row_becomes_a_recipient() {
    let mut test_app = spawn_app().await;

    Mock::given(path("/validate-csv"))
        .and(method("POST"))
        .and(body_string_contains(r#"name="file""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid_rows_count": 3,
            "invalid_rows_count": 1,
            "valid_rows": [
                { "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com", "opt_out": false },
                { "first_name": "Alan", "last_name": null, "email": "alan@example.com", "company": "Bletchley" },
                { "email": "grace@example.com" },
            ],
            "invalid_rows": [{ "row_index": 3, "errors": [], "data": {} }],
        })))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    let summary = test_app
        .app
        .upload_csv_bytes("contacts.csv", b"first_name,last_name,email\n".to_vec())
        .await
        .unwrap();

    assert_eq!(summary.recipients, 3);
    assert_eq!(summary.rejected_rows, 1);
    assert_eq!(summary.unverified_addresses, 0);
    assert_eq!(test_app.app.uploaded_file(), Some("contacts.csv"));

    let (columns, rows) = test_app.app.recipient_table();
    assert_eq!(columns, ["first_name", "last_name", "email"]);
    assert_eq!(
        rows,
        vec![
            ["Ada", "Lovelace", "ada@example.com"],
            ["Alan", "", "alan@example.com"],
            ["", "", "grace@example.com"],
        ]
    );
    assert_eq!(test_app.app.available_columns(), ["first_name", "last_name"]);
    assert_eq!(test_app.app.step(), Step::Compose);
}

#[tokio::test]
async fn accepted_rows_are_kept_exactly_as_the_backend_sent_them() {
    let mut test_app = spawn_app().await;

    Mock::given(path("/validate-csv"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "invalid_rows_count": 0,
            "valid_rows": [
                { "first_name": "José", "last_name": " ", "email": "josé@example.com" },
                { "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" },
            ],
        })))
        .expect(1)
        .mount(&test_app.backend)
        .await;
    Mock::given(path("/personalize-emails"))
        .and(body_partial_json(json!({
            "recipients": [
                { "first_name": "José", "last_name": " ", "email": "josé@example.com" },
                { "first_name": "Ada", "last_name": "Lovelace", "email": "ada@example.com" },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "emails": [] })))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    let summary = test_app
        .app
        .upload_csv_bytes("contacts.csv", b"first_name,last_name,email\n".to_vec())
        .await
        .unwrap();

    assert_eq!(summary.recipients, 2);
    assert_eq!(summary.unverified_addresses, 1);
    let (_, rows) = test_app.app.recipient_table();
    assert_eq!(
        rows,
        vec![
            ["José", " ", "josé@example.com"],
            ["Ada", "Lovelace", "ada@example.com"],
        ]
    );

    test_app.app.set_email("Hola {{first_name}}", "Hello {{last_name}}");
    let preview = test_app.app.settled_preview().await;
    assert_eq!(preview.error, None);
}

#[tokio::test]
async fn a_rejected_upload_keeps_the_previous_recipients() {
    let mut test_app = spawn_app().await;
    test_app.upload_two_recipients().await;

    Mock::given(path("/validate-csv"))
        .and(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Error reading CSV: No columns to parse from file" })),
        )
        .expect(1)
        .mount(&test_app.backend)
        .await;

    let result = test_app
        .app
        .upload_csv_bytes("empty.csv", Vec::new())
        .await;

    match result {
        Err(e @ AppError::Upload(_)) => {
            assert_eq!(
                e.to_string(),
                "Failed to validate CSV: Error reading CSV: No columns to parse from file"
            );
            assert_eq!(e.status().map(|s| s.as_u16()), Some(400));
        }
        other => panic!("expected an upload error, got {:?}", other),
    }
    assert_eq!(test_app.app.recipients().len(), 2);
    assert_eq!(test_app.app.uploaded_file(), Some("contacts.csv"));
}

#[tokio::test]
async fn non_csv_files_are_refused_without_calling_the_backend() {
    let mut test_app = spawn_app().await;

    Mock::given(path("/validate-csv"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.backend)
        .await;

    let result = test_app
        .app
        .upload_csv_bytes("contacts.xlsx", b"not a csv".to_vec())
        .await;

    assert!(matches!(result, Err(AppError::Upload(_))));
    assert!(test_app.app.recipients().is_empty());
}

#[tokio::test]
async fn uploading_from_disk_sends_the_file_name() {
    let mut test_app = spawn_app().await;

    Mock::given(path("/validate-csv"))
        .and(method("POST"))
        .and(body_string_contains(r#"filename="recipients.csv""#))
        .and(body_string_contains("ada@example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valid_rows": two_recipients(),
        })))
        .expect(1)
        .mount(&test_app.backend)
        .await;

    let directory = std::env::temp_dir().join(uuid::Uuid::new_v4().to_string());
    std::fs::create_dir_all(&directory).unwrap();
    let file = directory.join("recipients.csv");
    std::fs::write(&file, "first_name,last_name,email\nAda,Lovelace,ada@example.com\n").unwrap();

    let summary = test_app.app.upload_csv(&file).await.unwrap();

    assert_eq!(summary.file_name, "recipients.csv");
    assert_eq!(summary.recipients, 2);
    std::fs::remove_dir_all(directory).unwrap();
}

#[tokio::test]
async fn a_missing_file_is_an_unexpected_error() {
    let mut test_app = spawn_app().await;

    let result = test_app.app.upload_csv("/definitely/not/here.csv").await;

    assert!(matches!(result, Err(AppError::UnexpectedError(_))));
}
