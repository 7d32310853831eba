use thiserror::Error;

/// Call-aborting failures of the access registry contract
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Organization is already registered")]
    OrganizationExists,

    #[error("Organization not found")]
    OrganizationNotFound,

    #[error("Organization name cannot be empty")]
    OrganizationNameEmpty,

    #[error("Datasource not found: {0}")]
    DatasourceNotFound(String),

    #[error("Access request already open for scope {0}")]
    RequestExists(String),

    #[error("Access request not found for scope {0}")]
    RequestNotFound(String),

    #[error("Access request already granted for scope {0}")]
    RequestAlreadyGranted(String),

    #[error("Requester/provider pair does not match the open request")]
    PartyMismatch,
}
