use board_module::{BoardError, BoardLayout, BoardRecord, ColumnValues, MondayClient};
use tracing::debug;

use crate::config::BoardConfig;

/// Record-level board operations used by the reconciler and the ingestor.
pub trait BoardStore {
    fn list_records(&self) -> Result<Vec<BoardRecord>, BoardError>;
    fn find_record_by_lead(&self, lead_email: &str) -> Result<Option<BoardRecord>, BoardError>;
    /// Create an item in the configured group and return its id.
    fn create_record(&self, item_name: &str, values: &ColumnValues) -> Result<String, BoardError>;
    /// Write all `values` to one item in a single request.
    fn update_record(&self, item_id: &str, values: &ColumnValues) -> Result<(), BoardError>;
}

/// [`BoardStore`] backed by a live Monday board.
#[derive(Debug, Clone)]
pub struct MondayBoardStore {
    client: MondayClient,
    layout: BoardLayout,
}

impl MondayBoardStore {
    pub fn new(client: MondayClient, layout: BoardLayout) -> Self {
        Self { client, layout }
    }

    pub fn from_config(config: &BoardConfig) -> Self {
        let client = MondayClient::with_api_url(config.api_token.clone(), config.api_url.clone());
        Self::new(client, config.layout.clone())
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    fn to_records(&self, items: Vec<board_module::BoardItem>) -> Vec<BoardRecord> {
        items
            .iter()
            .map(|item| BoardRecord::from_item(item, &self.layout.columns))
            .collect()
    }
}

impl BoardStore for MondayBoardStore {
    fn list_records(&self) -> Result<Vec<BoardRecord>, BoardError> {
        let items = self
            .client
            .list_items(&self.layout.board_id, &self.layout.columns.read_ids())?;
        Ok(self.to_records(items))
    }

    /// Ask the board to filter by the lead column first. Column filters
    /// compare exact text, so fall back to a full scan with a
    /// case-insensitive match before concluding the lead is new.
    fn find_record_by_lead(&self, lead_email: &str) -> Result<Option<BoardRecord>, BoardError> {
        let columns = &self.layout.columns;
        let filtered = self.client.find_items_by_column(
            &self.layout.board_id,
            &columns.lead_email,
            lead_email.trim(),
            &columns.read_ids(),
        )?;
        if let Some(record) = self
            .to_records(filtered)
            .into_iter()
            .find(|record| record.lead.matches(lead_email))
        {
            return Ok(Some(record));
        }

        debug!("lead {} not matched by column filter, scanning board", lead_email);
        Ok(self
            .list_records()?
            .into_iter()
            .find(|record| record.lead.matches(lead_email)))
    }

    fn create_record(&self, item_name: &str, values: &ColumnValues) -> Result<String, BoardError> {
        self.client.create_item(
            &self.layout.board_id,
            &self.layout.group_id,
            item_name,
            values,
        )
    }

    fn update_record(&self, item_id: &str, values: &ColumnValues) -> Result<(), BoardError> {
        self.client
            .change_columns(&self.layout.board_id, item_id, values)
            .map(|_| ())
    }
}
