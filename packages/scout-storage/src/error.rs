#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Query exceeded the {max_time_ms} ms execution cap.")]
	QueryTimeout { max_time_ms: u64 },
}
