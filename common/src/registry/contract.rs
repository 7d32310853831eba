//! Access Registry Contract
//!
//! Bookkeeping for organizations and datasource access requests. Two
//! record-keyed tables, no admin gate: the registry records who asked whom
//! for what, it does not arbitrate.
//!
//! Same transactional discipline as the token contract: every guard runs
//! before the first write.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::RegistryError;
use super::types::{
    AccessRequest, AccessRequestKey, Organization, OrganizationKey, RequestStatus,
};
use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Complete persisted state of one registry instance
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRegistry {
    // Record keys cannot be JSON object keys, serialize as entry pairs
    #[serde(with = "indexmap::map::serde_seq")]
    organizations: IndexMap<OrganizationKey, Organization>,
    #[serde(with = "indexmap::map::serde_seq")]
    access_requests: IndexMap<AccessRequestKey, AccessRequest>,
}

impl AccessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Views =====

    pub fn organization(&self, key: &OrganizationKey) -> Option<&Organization> {
        self.organizations.get(key)
    }

    pub fn organizations(&self) -> impl Iterator<Item = (&OrganizationKey, &Organization)> {
        self.organizations.iter()
    }

    pub fn request(&self, key: &AccessRequestKey) -> Option<&AccessRequest> {
        self.access_requests.get(key)
    }

    /// All requests currently in the given status
    pub fn requests_with_status(
        &self,
        status: RequestStatus,
    ) -> impl Iterator<Item = (&AccessRequestKey, &AccessRequest)> {
        self.access_requests
            .iter()
            .filter(move |(key, _)| key.status == status)
    }

    pub fn organization_count(&self) -> usize {
        self.organizations.len()
    }

    pub fn request_count(&self) -> usize {
        self.access_requests.len()
    }
}

impl Serializer for AccessRegistry {
    fn write(&self, writer: &mut Writer) {
        writer.write_u16(&(self.organizations.len() as u16));
        for (key, organization) in &self.organizations {
            key.write(writer);
            organization.write(writer);
        }
        writer.write_u16(&(self.access_requests.len() as u16));
        for (key, request) in &self.access_requests {
            key.write(writer);
            request.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let organization_count = reader.read_u16()? as usize;
        let mut organizations = IndexMap::with_capacity(organization_count);
        for _ in 0..organization_count {
            let key = reader.read()?;
            let organization = reader.read()?;
            organizations.insert(key, organization);
        }

        let request_count = reader.read_u16()? as usize;
        let mut access_requests = IndexMap::with_capacity(request_count);
        for _ in 0..request_count {
            let key = reader.read()?;
            let request = reader.read()?;
            access_requests.insert(key, request);
        }

        Ok(AccessRegistry {
            organizations,
            access_requests,
        })
    }

    fn size(&self) -> usize {
        2 + self
            .organizations
            .iter()
            .map(|(key, organization)| key.size() + organization.size())
            .sum::<usize>()
            + 2
            + self
                .access_requests
                .iter()
                .map(|(key, request)| key.size() + request.size())
                .sum::<usize>()
    }
}

/// Add an organization under its record key. Duplicate keys are rejected.
pub fn register_organization(
    registry: &mut AccessRegistry,
    key: OrganizationKey,
    organization: Organization,
) -> Result<(), RegistryError> {
    if organization.name.is_empty() {
        return Err(RegistryError::OrganizationNameEmpty);
    }
    if registry.organizations.contains_key(&key) {
        return Err(RegistryError::OrganizationExists);
    }
    registry.organizations.insert(key, organization);
    Ok(())
}

/// Insert or overwrite one datasource entry of a registered organization
pub fn put_datasource(
    registry: &mut AccessRegistry,
    key: &OrganizationKey,
    datasource_id: String,
    locator: String,
) -> Result<(), RegistryError> {
    let organization = registry
        .organizations
        .get_mut(key)
        .ok_or(RegistryError::OrganizationNotFound)?;
    organization.datasources.insert(datasource_id, locator);
    Ok(())
}

/// Drop one datasource entry of a registered organization
pub fn remove_datasource(
    registry: &mut AccessRegistry,
    key: &OrganizationKey,
    datasource_id: &str,
) -> Result<(), RegistryError> {
    let organization = registry
        .organizations
        .get_mut(key)
        .ok_or(RegistryError::OrganizationNotFound)?;
    organization
        .datasources
        .shift_remove(datasource_id)
        .ok_or_else(|| RegistryError::DatasourceNotFound(datasource_id.to_string()))?;
    Ok(())
}

/// Open a pending access request for `scope_id`. One pending request per
/// scope; a second open on the same scope is rejected.
pub fn open_request(
    registry: &mut AccessRegistry,
    scope_id: String,
    requester: Address,
    provider: Address,
    created_at: u64,
) -> Result<(), RegistryError> {
    let key = AccessRequestKey::pending(scope_id.clone());
    if registry.access_requests.contains_key(&key) {
        return Err(RegistryError::RequestExists(scope_id));
    }
    registry.access_requests.insert(
        key,
        AccessRequest {
            requester,
            provider,
            created_at,
            auth_token: None,
        },
    );
    Ok(())
}

/// Grant a pending request: both parties must match the open entry, which
/// is then re-keyed from Pending to Granted with the token attached.
pub fn grant_request(
    registry: &mut AccessRegistry,
    scope_id: &str,
    requester: &Address,
    provider: &Address,
    auth_token: String,
) -> Result<(), RegistryError> {
    let granted_key = AccessRequestKey::granted(scope_id);
    if registry.access_requests.contains_key(&granted_key) {
        return Err(RegistryError::RequestAlreadyGranted(scope_id.to_string()));
    }

    let pending_key = AccessRequestKey::pending(scope_id);
    let pending = registry
        .access_requests
        .get(&pending_key)
        .ok_or_else(|| RegistryError::RequestNotFound(scope_id.to_string()))?;
    if pending.requester != *requester || pending.provider != *provider {
        return Err(RegistryError::PartyMismatch);
    }

    // Guards passed, the move below cannot fail halfway
    if let Some(mut request) = registry.access_requests.shift_remove(&pending_key) {
        request.auth_token = Some(auth_token);
        registry.access_requests.insert(granted_key, request);
    }
    Ok(())
}
