use board_module::{BoardColumns, BoardLayout, MondayClient};
use chrono::{DateTime, Duration, TimeZone, Utc};
use mockito::{Matcher, Mock, Server, ServerGuard};
use sync_module::reconcile::{ReconcileReport, SyncError, ThreadReconciler};
use sync_module::store::MondayBoardStore;
use thread_fetch_module::InstantlyClient;

const RENDERED: &str = "=== Thread t1 ===\n[2024-06-09T10:00:00] rep@acme.io: Intro\nhello";

fn layout() -> BoardLayout {
    BoardLayout {
        board_id: "123".to_string(),
        group_id: "topics".to_string(),
        columns: BoardColumns {
            lead_email: "lead_email".to_string(),
            last_contact: "date".to_string(),
            thread: "long_text".to_string(),
            ..BoardColumns::default()
        },
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
}

fn mock_board_listing(server: &mut ServerGuard, stored_thread: &str) -> Mock {
    let body = serde_json::json!({
        "data": {"boards": [{"items_page": {"cursor": null, "items": [
            {"id": "1", "name": "Jane", "column_values": [
                {"id": "lead_email", "text": "jane@acme.io", "value": "{\"email\":\"jane@acme.io\",\"text\":\"jane@acme.io\"}"},
                {"id": "date", "text": "2024-06-01", "value": null},
                {"id": "long_text", "text": stored_thread, "value": null}
            ]},
            {"id": "2", "name": "Fresh", "column_values": [
                {"id": "lead_email", "text": "fresh@acme.io", "value": null},
                {"id": "date", "text": "2024-06-10", "value": null}
            ]},
            {"id": "3", "name": "Nobody", "column_values": []}
        ]}}]}
    });
    server
        .mock("POST", "/monday")
        .match_header("authorization", "monday-token")
        .match_body(Matcher::Regex("boards\\(ids".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create()
}

fn mock_instantly_thread(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/v2/emails")
        .match_query(Matcher::UrlEncoded("lead".into(), "jane@acme.io".into()))
        .match_header("authorization", "Bearer inst-key")
        .with_status(200)
        .with_body(
            r#"{"items":[{"thread_id":"t1","timestamp_email":"2024-06-09T10:00:00","from_address_email":"rep@acme.io","subject":"Intro","body":{"text":"hello"}}]}"#,
        )
        .expect(1)
        .create()
}

fn clients(server: &ServerGuard) -> (MondayBoardStore, InstantlyClient) {
    let board = MondayBoardStore::new(
        MondayClient::with_api_url("monday-token", format!("{}/monday", server.url())),
        layout(),
    );
    let source = InstantlyClient::with_base_url("inst-key", format!("{}/api/v2", server.url()));
    (board, source)
}

#[test]
fn stale_record_gets_thread_and_date_in_one_update() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new();
    let listing = mock_board_listing(&mut server, "old thread");
    let fetch = mock_instantly_thread(&mut server);
    let update = server
        .mock("POST", "/monday")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("change_multiple_column_values".to_string()),
            Matcher::PartialJson(serde_json::json!({
                "variables": {"boardId": "123", "itemId": "1"}
            })),
            Matcher::Regex("2024-06-10".to_string()),
            Matcher::Regex("=== Thread t1 ===".to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"data":{"change_multiple_column_values":{"id":"1"}}}"#)
        .expect(1)
        .create();

    let (board, source) = clients(&server);
    let layout = layout();
    let reconciler = ThreadReconciler::new(
        &board,
        &source,
        &layout.columns.thread,
        &layout.columns.last_contact,
        Duration::days(2),
    );
    let report = reconciler.run_pass(now())?;

    listing.assert();
    fetch.assert();
    update.assert();
    assert_eq!(
        report,
        ReconcileReport {
            scanned: 3,
            stale: 1,
            missing_lead: 1,
            updated: 1,
            ..ReconcileReport::default()
        }
    );
    Ok(())
}

#[test]
fn matching_stored_thread_is_left_alone() -> Result<(), Box<dyn std::error::Error>> {
    let mut server = Server::new();
    let _listing = mock_board_listing(&mut server, &format!("{}\n", RENDERED));
    let _fetch = mock_instantly_thread(&mut server);
    let update = server
        .mock("POST", "/monday")
        .match_body(Matcher::Regex("change_multiple_column_values".to_string()))
        .expect(0)
        .create();

    let (board, source) = clients(&server);
    let layout = layout();
    let reconciler = ThreadReconciler::new(
        &board,
        &source,
        &layout.columns.thread,
        &layout.columns.last_contact,
        Duration::days(2),
    );
    let report = reconciler.run_pass(now())?;

    update.assert();
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.updated, 0);
    Ok(())
}

#[test]
fn board_listing_failure_aborts_the_pass() {
    let mut server = Server::new();
    let _listing = server
        .mock("POST", "/monday")
        .with_status(500)
        .with_body("internal")
        .create();
    let fetch = server.mock("GET", Matcher::Any).expect(0).create();

    let (board, source) = clients(&server);
    let layout = layout();
    let reconciler = ThreadReconciler::new(
        &board,
        &source,
        &layout.columns.thread,
        &layout.columns.last_contact,
        Duration::days(2),
    );

    assert!(matches!(
        reconciler.run_pass(now()),
        Err(SyncError::ListRecords(_))
    ));
    fetch.assert();
}
