pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("Timed out: {message}")]
	Timeout { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}
}

impl From<scout_storage::Error> for Error {
	fn from(err: scout_storage::Error) -> Self {
		match err {
			scout_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			scout_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			err @ scout_storage::Error::QueryTimeout { .. } =>
				Self::Timeout { message: err.to_string() },
		}
	}
}

impl From<scout_providers::Error> for Error {
	fn from(err: scout_providers::Error) -> Self {
		match err {
			err @ scout_providers::Error::NotFound { .. } =>
				Self::NotFound { message: err.to_string() },
			err => Self::Provider { message: err.to_string() },
		}
	}
}
