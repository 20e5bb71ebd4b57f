//! Loading of the users dataset.

use std::{io, path::Path};

use derive_more::{Display, Error, From};
use service::{
    domain::User,
    infra::{database, Memory},
};
use tracerr::Traced;

/// Loads the JSON array of [`User`]s stored at the `path` into a new
/// [`Memory`] database.
///
/// # Errors
///
/// If the file cannot be read, isn't a JSON array of valid [`User`]s, or
/// several [`User`]s share the same ID or email.
pub async fn load(path: impl AsRef<Path>) -> Result<Memory, Traced<LoadError>> {
    let path = path.as_ref();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(LoadError::Read)
        .map_err(tracerr::wrap!())?;
    let users = parse(&bytes).map_err(tracerr::wrap!())?;
    tracing::debug!(count = users.len(), path = %path.display(), "users read");

    Memory::new(users).map_err(tracerr::map_from_and_wrap!())
}

/// Parses the JSON array of [`User`]s.
///
/// # Errors
///
/// If the `bytes` aren't a JSON array of valid [`User`]s.
pub fn parse(bytes: &[u8]) -> Result<Vec<User>, LoadError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Error of loading the users dataset.
#[derive(Debug, Display, Error, From)]
pub enum LoadError {
    /// Failed to read the dataset file.
    #[display("failed to read dataset: {_0}")]
    #[from(ignore)]
    Read(io::Error),

    /// Dataset is malformed.
    #[display("malformed dataset: {_0}")]
    Parse(serde_json::Error),

    /// Dataset violates [`Memory`] constraints.
    #[display("invalid dataset: {_0}")]
    Db(database::Error),
}
