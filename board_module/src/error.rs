#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("http error: {0}")]
    Http(String),
    #[error("monday returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed monday response: {0}")]
    Parse(String),
    #[error("monday graphql errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("monday response missing {0}")]
    MissingData(String),
}
