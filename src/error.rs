use std::sync::Arc;
use sui_package_discovery::DiscoveryError;
use thiserror::Error;

/// Failures surfaced at the explorer boundary.
///
/// `Clone` so one in-flight result can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error)]
pub enum ExplorerError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("failed to load ABI for package {package_id}: {error:#}")]
    AbiFetch {
        package_id: String,
        error: Arc<anyhow::Error>,
    },

    #[error("invalid package id {0:?}: expected a hex address such as 0x2")]
    InvalidPackageId(String),

    #[error("favorites store: {0:#}")]
    Favorites(Arc<anyhow::Error>),
}

impl ExplorerError {
    pub fn abi_fetch(package_id: &str, error: anyhow::Error) -> Self {
        Self::AbiFetch {
            package_id: package_id.to_string(),
            error: Arc::new(error),
        }
    }

    pub fn favorites(error: anyhow::Error) -> Self {
        Self::Favorites(Arc::new(error))
    }
}

pub type ExplorerResult<T> = Result<T, ExplorerError>;
