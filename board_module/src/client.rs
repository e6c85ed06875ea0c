use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::columns::ColumnValues;
use crate::error::BoardError;
use crate::item::{id_from_value, BoardItem, ItemsPage};
use crate::queries::{
    CHANGE_COLUMNS_MUTATION, CREATE_ITEM_MUTATION, FIND_ITEMS_QUERY, LIST_ITEMS_QUERY,
    NEXT_ITEMS_QUERY,
};

pub const DEFAULT_MONDAY_API_URL: &str = "https://api.monday.com/v2";
/// Largest page Monday serves for `items_page`.
pub const ITEMS_PAGE_LIMIT: u32 = 500;

/// Blocking client for the Monday GraphQL endpoint.
#[derive(Clone)]
pub struct MondayClient {
    token: String,
    api_url: String,
    http: reqwest::blocking::Client,
}

impl fmt::Debug for MondayClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MondayClient")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl MondayClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_MONDAY_API_URL)
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_url: api_url.into(),
            http: reqwest::blocking::Client::new(),
        }
    }

    /// Run one GraphQL request and return its `data` object.
    ///
    /// A 2xx response carrying an `errors` array is still a failure.
    pub fn execute(&self, query: &str, variables: Value) -> Result<Value, BoardError> {
        let payload = json!({
            "query": query,
            "variables": variables,
        });

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", self.token.as_str())
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|e| BoardError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            error!("monday request failed: {} - {}", status, body);
            return Err(BoardError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .map_err(|e| BoardError::Http(e.to_string()))?;
        let mut envelope: Value =
            serde_json::from_str(&body).map_err(|e| BoardError::Parse(e.to_string()))?;

        let messages = graphql_error_messages(&envelope);
        if !messages.is_empty() {
            error!("monday graphql errors: {:?}", messages);
            return Err(BoardError::GraphQl(messages));
        }

        match envelope.get_mut("data").map(Value::take) {
            Some(data) if !data.is_null() => Ok(data),
            _ => Err(BoardError::MissingData("data".to_string())),
        }
    }

    /// Every item on a board, following `items_page` cursors to the end.
    pub fn list_items(
        &self,
        board_id: &str,
        column_ids: &[String],
    ) -> Result<Vec<BoardItem>, BoardError> {
        let data = self.execute(
            LIST_ITEMS_QUERY,
            json!({
                "boardId": board_id,
                "columnIds": column_ids,
                "limit": ITEMS_PAGE_LIMIT,
            }),
        )?;
        let first_page = data
            .get("boards")
            .and_then(|boards| boards.get(0))
            .and_then(|board| board.get("items_page"))
            .ok_or_else(|| BoardError::MissingData(format!("items_page for board {}", board_id)))?;
        let mut page = parse_page(first_page)?;
        let mut items = std::mem::take(&mut page.items);

        while let Some(cursor) = page.cursor.take() {
            let data = self.execute(
                NEXT_ITEMS_QUERY,
                json!({
                    "cursor": cursor,
                    "columnIds": column_ids,
                    "limit": ITEMS_PAGE_LIMIT,
                }),
            )?;
            let next = data
                .get("next_items_page")
                .ok_or_else(|| BoardError::MissingData("next_items_page".to_string()))?;
            page = parse_page(next)?;
            items.append(&mut page.items);
        }

        debug!("monday board {} has {} items", board_id, items.len());
        Ok(items)
    }

    /// Items whose `column_id` column equals `value`, first page only.
    pub fn find_items_by_column(
        &self,
        board_id: &str,
        column_id: &str,
        value: &str,
        column_ids: &[String],
    ) -> Result<Vec<BoardItem>, BoardError> {
        let data = self.execute(
            FIND_ITEMS_QUERY,
            json!({
                "boardId": board_id,
                "columnId": column_id,
                "value": value,
                "columnIds": column_ids,
                "limit": ITEMS_PAGE_LIMIT,
            }),
        )?;
        let page = data
            .get("items_page_by_column_values")
            .ok_or_else(|| BoardError::MissingData("items_page_by_column_values".to_string()))?;
        Ok(parse_page(page)?.items)
    }

    /// Create an item and return its id.
    pub fn create_item(
        &self,
        board_id: &str,
        group_id: &str,
        item_name: &str,
        values: &ColumnValues,
    ) -> Result<String, BoardError> {
        let data = self.execute(
            CREATE_ITEM_MUTATION,
            json!({
                "boardId": board_id,
                "groupId": group_id,
                "itemName": item_name,
                "columnValues": values.to_json_string(),
            }),
        )?;
        let item_id = data
            .get("create_item")
            .and_then(|item| item.get("id"))
            .and_then(id_from_value)
            .ok_or_else(|| BoardError::MissingData("create_item.id".to_string()))?;
        info!("created monday item {} on board {}", item_id, board_id);
        Ok(item_id)
    }

    /// Write several columns of one item in a single request.
    pub fn change_columns(
        &self,
        board_id: &str,
        item_id: &str,
        values: &ColumnValues,
    ) -> Result<String, BoardError> {
        let data = self.execute(
            CHANGE_COLUMNS_MUTATION,
            json!({
                "boardId": board_id,
                "itemId": item_id,
                "columnValues": values.to_json_string(),
            }),
        )?;
        let changed_id = data
            .get("change_multiple_column_values")
            .and_then(|item| item.get("id"))
            .and_then(id_from_value)
            .ok_or_else(|| BoardError::MissingData("change_multiple_column_values.id".to_string()))?;
        info!("updated monday item {} on board {}", changed_id, board_id);
        Ok(changed_id)
    }
}

fn parse_page(page: &Value) -> Result<ItemsPage, BoardError> {
    ItemsPage::deserialize(page).map_err(|e| BoardError::Parse(e.to_string()))
}

/// Messages from a GraphQL `errors` array, or the legacy `error_message` field.
fn graphql_error_messages(envelope: &Value) -> Vec<String> {
    let mut messages: Vec<String> = envelope
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|err| {
                    err.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| err.to_string())
                })
                .collect()
        })
        .unwrap_or_default();

    if let Some(message) = envelope.get("error_message").and_then(Value::as_str) {
        messages.push(message.to_string());
    }
    messages
}
