use board_module::{BoardColumns, BoardLayout, MondayClient};
use chrono::{TimeZone, Utc};
use mockito::{Matcher, Mock, Server, ServerGuard};
use serde_json::json;
use sync_module::config::ThreadUpdatePolicy;
use sync_module::event::Event;
use sync_module::ingest::{EventIngestor, IngestError, IngestResult};
use sync_module::store::MondayBoardStore;
use thread_fetch_module::InstantlyClient;

fn layout() -> BoardLayout {
    BoardLayout {
        board_id: "123".to_string(),
        group_id: "topics".to_string(),
        columns: BoardColumns {
            lead_email: "lead_email".to_string(),
            last_contact: "date".to_string(),
            thread: "long_text".to_string(),
            first_name: Some("first_name".to_string()),
            last_name: Some("last_name".to_string()),
            sender_account: Some("sender".to_string()),
            ..BoardColumns::default()
        },
    }
}

fn email_sent() -> Event {
    Event::from_json(
        json!({
            "event_type": "email_sent",
            "lead_email": "ada@example.com",
            "email_account": "rep@acme.io",
            "timestamp": "2024-06-09T08:15:00Z",
            "firstName": "Ada",
            "lastName": "Lovelace"
        })
        .to_string()
        .as_bytes(),
    )
    .unwrap()
}

fn graphql(server: &mut ServerGuard, operation: &str, response: serde_json::Value, hits: usize) -> Mock {
    server
        .mock("POST", "/monday")
        .match_header("authorization", "monday-token")
        .match_body(Matcher::Regex(operation.to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(response.to_string())
        .expect(hits)
        .create()
}

fn mock_thread(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/emails")
        .match_query(Matcher::UrlEncoded("lead".into(), "ada@example.com".into()))
        .with_status(200)
        .with_body(
            r#"{"items":[{"thread_id":"t9","timestamp_email":"2024-06-09T08:15:00","from":"rep@acme.io","subject":"Hi Ada","plain_body":"Quick question"}]}"#,
        )
        .expect(1)
        .create()
}

#[test]
fn email_sent_for_unknown_lead_creates_one_item() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new();
    let find = graphql(
        &mut server,
        "items_page_by_column_values",
        json!({"data": {"items_page_by_column_values": {"cursor": null, "items": []}}}),
        1,
    );
    let scan = graphql(
        &mut server,
        "boards\\(ids",
        json!({"data": {"boards": [{"items_page": {"cursor": null, "items": []}}]}}),
        1,
    );
    let fetch = mock_thread(&mut server);
    let create = server
        .mock("POST", "/monday")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("create_item".to_string()),
            Matcher::PartialJson(json!({
                "variables": {"boardId": "123", "groupId": "topics", "itemName": "Ada Lovelace"}
            })),
            Matcher::Regex("ada@example.com".to_string()),
            Matcher::Regex("rep@acme.io".to_string()),
            Matcher::Regex("08:15:00".to_string()),
            Matcher::Regex("Quick question".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":{"create_item":{"id":"555"}}}"#)
        .expect(1)
        .create();

    let board = MondayBoardStore::new(
        MondayClient::with_api_url("monday-token", format!("{}/monday", server.url())),
        layout(),
    );
    let source = InstantlyClient::with_base_url("inst-key", server.url());
    let layout = layout();
    let ingestor = EventIngestor::new(&board, &source, &layout.columns, ThreadUpdatePolicy::Replace);
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();

    let result = ingestor.handle_event(&email_sent(), now)?;

    find.assert();
    scan.assert();
    fetch.assert();
    create.assert();
    assert_eq!(
        result,
        IngestResult::Created {
            item_id: "555".to_string()
        }
    );
    Ok(())
}

#[test]
fn email_sent_for_known_lead_updates_in_place() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new();
    let find = graphql(
        &mut server,
        "items_page_by_column_values",
        json!({"data": {"items_page_by_column_values": {"cursor": null, "items": [
            {"id": 77, "name": "Ada", "column_values": [
                {"id": "lead_email", "text": "ada@example.com", "value": "{\"email\":\"ada@example.com\",\"text\":\"ada@example.com\"}"},
                {"id": "long_text", "text": "older", "value": null}
            ]}
        ]}}}),
        1,
    );
    let scan = graphql(&mut server, "boards\\(ids", json!({}), 0);
    let create = graphql(&mut server, "create_item", json!({}), 0);
    let fetch = mock_thread(&mut server);
    let update = server
        .mock("POST", "/monday")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("change_multiple_column_values".to_string()),
            Matcher::PartialJson(json!({"variables": {"itemId": "77"}})),
            Matcher::Regex("Quick question".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":{"change_multiple_column_values":{"id":"77"}}}"#)
        .expect(1)
        .create();

    let board = MondayBoardStore::new(
        MondayClient::with_api_url("monday-token", format!("{}/monday", server.url())),
        layout(),
    );
    let source = InstantlyClient::with_base_url("inst-key", server.url());
    let layout = layout();
    let ingestor = EventIngestor::new(&board, &source, &layout.columns, ThreadUpdatePolicy::Replace);

    let result = ingestor.handle_event(&email_sent(), Utc::now())?;

    find.assert();
    scan.assert();
    create.assert();
    fetch.assert();
    update.assert();
    assert_eq!(
        result,
        IngestResult::Updated {
            item_id: "77".to_string()
        }
    );
    Ok(())
}

#[test]
fn lead_missed_by_column_filter_is_found_by_board_scan() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new();
    let find = graphql(
        &mut server,
        "items_page_by_column_values",
        json!({"data": {"items_page_by_column_values": {"cursor": null, "items": []}}}),
        1,
    );
    let scan = graphql(
        &mut server,
        "boards\\(ids",
        json!({"data": {"boards": [{"items_page": {"cursor": null, "items": [
            {"id": "55", "name": "Ada", "column_values": [
                {"id": "lead_email", "text": "ADA@Example.com", "value": null}
            ]}
        ]}}]}}),
        1,
    );
    let create = graphql(&mut server, "create_item", json!({}), 0);
    let fetch = mock_thread(&mut server);
    let update = server
        .mock("POST", "/monday")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("change_multiple_column_values".to_string()),
            Matcher::PartialJson(json!({"variables": {"itemId": "55"}})),
        ]))
        .with_status(200)
        .with_body(r#"{"data":{"change_multiple_column_values":{"id":"55"}}}"#)
        .expect(1)
        .create();

    let board = MondayBoardStore::new(
        MondayClient::with_api_url("monday-token", format!("{}/monday", server.url())),
        layout(),
    );
    let source = InstantlyClient::with_base_url("inst-key", server.url());
    let layout = layout();
    let ingestor = EventIngestor::new(&board, &source, &layout.columns, ThreadUpdatePolicy::Replace);

    let result = ingestor.handle_event(&email_sent(), Utc::now())?;

    find.assert();
    scan.assert();
    create.assert();
    fetch.assert();
    update.assert();
    assert_eq!(
        result,
        IngestResult::Updated {
            item_id: "55".to_string()
        }
    );
    Ok(())
}

#[test]
fn board_failure_surfaces_as_ingest_error() {
    let mut server = Server::new();
    let _find = server
        .mock("POST", "/monday")
        .with_status(200)
        .with_body(r#"{"errors":[{"message":"Invalid column id"}]}"#)
        .create();

    let board = MondayBoardStore::new(
        MondayClient::with_api_url("monday-token", format!("{}/monday", server.url())),
        layout(),
    );
    let source = InstantlyClient::with_base_url("inst-key", server.url());
    let layout = layout();
    let ingestor = EventIngestor::new(&board, &source, &layout.columns, ThreadUpdatePolicy::Replace);

    let err = ingestor.handle_event(&email_sent(), Utc::now()).unwrap_err();
    assert!(matches!(err, IngestError::Board(_)));
    assert!(err.to_string().contains("Invalid column id"));
}
