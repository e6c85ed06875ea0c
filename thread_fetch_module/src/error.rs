#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("lead email is empty")]
    EmptyLead,
    #[error("http error: {0}")]
    Http(String),
    #[error("instantly returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed instantly response: {0}")]
    Parse(String),
}
