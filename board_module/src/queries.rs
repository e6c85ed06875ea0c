pub(crate) const LIST_ITEMS_QUERY: &str = r#"
query ($boardId: ID!, $columnIds: [String!], $limit: Int!) {
  boards(ids: [$boardId]) {
    items_page(limit: $limit) {
      cursor
      items {
        id
        name
        column_values(ids: $columnIds) { id text value }
      }
    }
  }
}
"#;

pub(crate) const NEXT_ITEMS_QUERY: &str = r#"
query ($cursor: String!, $columnIds: [String!], $limit: Int!) {
  next_items_page(cursor: $cursor, limit: $limit) {
    cursor
    items {
      id
      name
      column_values(ids: $columnIds) { id text value }
    }
  }
}
"#;

pub(crate) const FIND_ITEMS_QUERY: &str = r#"
query ($boardId: ID!, $columnId: String!, $value: String!, $columnIds: [String!], $limit: Int!) {
  items_page_by_column_values(
    board_id: $boardId,
    limit: $limit,
    columns: [{ column_id: $columnId, column_values: [$value] }]
  ) {
    cursor
    items {
      id
      name
      column_values(ids: $columnIds) { id text value }
    }
  }
}
"#;

pub(crate) const CREATE_ITEM_MUTATION: &str = r#"
mutation ($boardId: ID!, $groupId: String!, $itemName: String!, $columnValues: JSON!) {
  create_item(
    board_id: $boardId,
    group_id: $groupId,
    item_name: $itemName,
    column_values: $columnValues
  ) { id }
}
"#;

pub(crate) const CHANGE_COLUMNS_MUTATION: &str = r#"
mutation ($boardId: ID!, $itemId: ID!, $columnValues: JSON!) {
  change_multiple_column_values(
    board_id: $boardId,
    item_id: $itemId,
    column_values: $columnValues
  ) { id }
}
"#;
