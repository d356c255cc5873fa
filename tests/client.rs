use mockito::{Matcher, Server, ServerGuard};
use tokio::sync::oneshot;

use whats_this::{Client, Error, ResolutionError, UploadBuilder, UploadSource};

const UPLOAD_BODY: &str =
    r#"{"success": true, "files": [{"hash": "1f6bce", "name": "cat.png", "url": "abc.png", "size": 1234}]}"#;

fn client_for(server: &ServerGuard) -> Client {
    Client::builder()
        .api_key("secret")
        .endpoint(server.url())
        .upload_url("https://files.example/")
        .shorten_url("https://short.example")
        .build()
        .unwrap()
}

#[tokio::test]
async fn upload_returns_the_first_file_with_a_stamped_full_url() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload/pomf")
        .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
        .match_header("user-agent", Matcher::Regex("^WhatsThisClient".into()))
        .with_status(200)
        .with_body(UPLOAD_BODY)
        .create_async()
        .await;

    let client = client_for(&server);
    let file = client
        .upload(UploadSource::named_bytes(b"meow".to_vec(), "cat.png"))
        .await
        .await
        .unwrap();

    assert_eq!(file.hash, "1f6bce");
    assert_eq!(file.name.as_deref(), Some("cat.png"));
    assert_eq!(file.url_key, "abc.png");
    assert_eq!(file.size, 1234);
    assert_eq!(file.full_url, "https://files.example/abc.png");
    mock.assert_async().await;
}

#[tokio::test]
async fn zero_byte_upload_carries_file_name_and_content_type() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload/pomf")
        .match_query(Matcher::UrlEncoded("key".into(), "secret".into()))
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#"name="files\[\]""#.into()),
            Matcher::Regex(r#"filename="empty.txt""#.into()),
            Matcher::Regex("text/plain".into()),
        ]))
        .with_status(200)
        .with_body(UPLOAD_BODY)
        .create_async()
        .await;

    let client = client_for(&server);
    let upload = UploadBuilder::new()
        .data(Vec::new())
        .file_name("empty.txt")
        .content_type("text/plain");

    client.upload_from(upload).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn empty_files_array_is_a_deserialization_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload/pomf")
        .with_status(200)
        .with_body(r#"{"success": true, "files": []}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client
        .upload(UploadSource::bytes(b"data".to_vec()))
        .await
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Deserialization(_)));
}

#[tokio::test]
async fn non_2xx_surfaces_status_and_body() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/upload/pomf")
        .with_status(503)
        .with_body("oh no")
        .create_async()
        .await;

    let client = client_for(&server);
    let error = client
        .upload(UploadSource::bytes(b"data".to_vec()))
        .await
        .await
        .unwrap_err();

    match error {
        Error::Transport { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "oh no");
        }
        other => panic!("expected a transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn shorten_sends_the_documented_query_and_returns_the_raw_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/shorten/polr")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("action".into(), "shorten".into()),
            Matcher::UrlEncoded("url".into(), "https://example.com/a/b".into()),
            Matcher::UrlEncoded("resultUrl".into(), "https://short.example".into()),
            Matcher::UrlEncoded("key".into(), "secret".into()),
        ]))
        .with_status(200)
        .with_body("https://short.example/xyz")
        .create_async()
        .await;

    let client = client_for(&server);
    let shortened = client.shorten("https://example.com/a/b").await.unwrap();

    assert_eq!(shortened, "https://short.example/xyz");
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_action_blocks_without_touching_the_transport() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let action = client
        .upload(UploadSource::file("/nonexistent/nowhere.bin"))
        .await;

    let error = action.execute_sync().unwrap_err();
    assert!(matches!(
        error,
        Error::Resolution(ResolutionError::Io(_))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn failed_action_without_failure_callback_stays_silent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let action = client
        .upload(UploadSource::file("/nonexistent/nowhere.bin"))
        .await;

    let handle = action.execute_async(|_| panic!("success callback must not run"));
    assert!(handle.is_none());
    mock.assert_async().await;
}

#[tokio::test]
async fn builder_first_error_survives_to_the_action() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let client = client_for(&server);
    let upload = UploadBuilder::new()
        .file("/nonexistent/nowhere.bin")
        .data(b"late".to_vec());

    let error = client.upload_from(upload).await.unwrap_err();
    assert!(matches!(
        error,
        Error::Resolution(ResolutionError::Io(_))
    ));
    mock.assert_async().await;
}

#[tokio::test]
async fn both_adapters_run_against_the_same_transport_contract() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/upload/pomf")
        .with_status(200)
        .with_body(UPLOAD_BODY)
        .expect(2)
        .create_async()
        .await;

    let client = client_for(&server);

    let awaited = client
        .upload(UploadSource::bytes(b"one".to_vec()))
        .await
        .await
        .unwrap();
    assert_eq!(awaited.full_url, "https://files.example/abc.png");

    let (tx, rx) = oneshot::channel();
    let handle = client
        .upload(UploadSource::bytes(b"two".to_vec()))
        .await
        .execute_async_with(
            move |file| {
                tx.send(file.full_url).unwrap();
            },
            |error| panic!("upload failed: {error}"),
        )
        .expect("a pending action spawns a task");

    assert_eq!(rx.await.unwrap(), "https://files.example/abc.png");
    handle.await.unwrap();
    mock.assert_async().await;
}
