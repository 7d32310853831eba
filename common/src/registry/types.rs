//! Registry record types: record-shaped keys and their stored values.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

/// Lifecycle of an access request. Stored as u8 (1 byte).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum RequestStatus {
    /// Request opened, waiting for the provider to grant it
    #[default]
    Pending = 0,

    /// Provider granted access and attached an auth token
    Granted = 1,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Granted => "Granted",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(RequestStatus::Pending),
            1 => Some(RequestStatus::Granted),
            _ => None,
        }
    }

    #[inline]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serializer for RequestStatus {
    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let value = u8::read(reader)?;
        RequestStatus::from_u8(value).ok_or(ReaderError::InvalidValue)
    }

    fn write(&self, writer: &mut Writer) {
        self.to_u8().write(writer);
    }

    fn size(&self) -> usize {
        1
    }
}

/// Record key of the organization directory: the organization account plus
/// the auth token it registered under.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationKey {
    pub account: Address,
    pub auth_token: String,
}

impl OrganizationKey {
    pub fn new(account: Address, auth_token: String) -> Self {
        OrganizationKey {
            account,
            auth_token,
        }
    }
}

impl Serializer for OrganizationKey {
    fn write(&self, writer: &mut Writer) {
        self.account.write(writer);
        self.auth_token.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(OrganizationKey {
            account: reader.read()?,
            auth_token: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.account.size() + self.auth_token.size()
    }
}

/// One registered organization and the datasources it exposes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Display name
    pub name: String,
    /// Account the organization signs with
    pub public_key_hash: Address,
    /// Published key material, opaque to the contract
    pub public_key: String,
    /// Datasource id -> datasource locator
    pub datasources: IndexMap<String, String>,
}

impl Serializer for Organization {
    fn write(&self, writer: &mut Writer) {
        self.name.write(writer);
        self.public_key_hash.write(writer);
        self.public_key.write(writer);
        writer.write_u16(&(self.datasources.len() as u16));
        for (id, locator) in &self.datasources {
            id.write(writer);
            locator.write(writer);
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let name = reader.read()?;
        let public_key_hash = reader.read()?;
        let public_key = reader.read()?;
        let count = reader.read_u16()? as usize;
        let mut datasources = IndexMap::with_capacity(count);
        for _ in 0..count {
            let id: String = reader.read()?;
            let locator: String = reader.read()?;
            datasources.insert(id, locator);
        }
        Ok(Organization {
            name,
            public_key_hash,
            public_key,
            datasources,
        })
    }

    fn size(&self) -> usize {
        self.name.size()
            + self.public_key_hash.size()
            + self.public_key.size()
            + 2
            + self
                .datasources
                .iter()
                .map(|(id, locator)| id.size() + locator.size())
                .sum::<usize>()
    }
}

/// Record key of the access-request table. The status is part of the key,
/// so granting a request re-keys the entry instead of mutating it in place.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccessRequestKey {
    pub scope_id: String,
    pub status: RequestStatus,
}

impl AccessRequestKey {
    pub fn pending(scope_id: impl Into<String>) -> Self {
        AccessRequestKey {
            scope_id: scope_id.into(),
            status: RequestStatus::Pending,
        }
    }

    pub fn granted(scope_id: impl Into<String>) -> Self {
        AccessRequestKey {
            scope_id: scope_id.into(),
            status: RequestStatus::Granted,
        }
    }
}

impl Serializer for AccessRequestKey {
    fn write(&self, writer: &mut Writer) {
        self.scope_id.write(writer);
        self.status.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(AccessRequestKey {
            scope_id: reader.read()?,
            status: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.scope_id.size() + self.status.size()
    }
}

/// Stored value of one access request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Account asking for access
    pub requester: Address,
    /// Account owning the datasource
    pub provider: Address,
    /// Creation timestamp (seconds), supplied by the caller's environment
    pub created_at: u64,
    /// Present once the request has been granted
    pub auth_token: Option<String>,
}

impl Serializer for AccessRequest {
    fn write(&self, writer: &mut Writer) {
        self.requester.write(writer);
        self.provider.write(writer);
        self.created_at.write(writer);
        self.auth_token.write(writer);
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        Ok(AccessRequest {
            requester: reader.read()?,
            provider: reader.read()?,
            created_at: reader.read()?,
            auth_token: reader.read()?,
        })
    }

    fn size(&self) -> usize {
        self.requester.size()
            + self.provider.size()
            + self.created_at.size()
            + self.auth_token.size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_u8_conversion() {
        for status in [RequestStatus::Pending, RequestStatus::Granted] {
            assert_eq!(RequestStatus::from_u8(status.to_u8()), Some(status));
        }
        assert_eq!(RequestStatus::from_u8(2), None);
    }

    #[test]
    fn request_codec_roundtrip() {
        let request = AccessRequest {
            requester: Address::new([1; 32]),
            provider: Address::new([2; 32]),
            created_at: 1571761674,
            auth_token: Some("token".into()),
        };
        let encoded = Serializer::to_bytes(&request);
        let decoded = AccessRequest::from_bytes(&encoded).unwrap();
        assert_eq!(request, decoded);
    }

    #[test]
    fn organization_codec_roundtrip() {
        let mut datasources = IndexMap::new();
        datasources.insert("datasource1".to_string(), "value1".to_string());
        datasources.insert("datasource2".to_string(), "value2".to_string());
        let organization = Organization {
            name: "toto".into(),
            public_key_hash: Address::new([5; 32]),
            public_key: "toto public key".into(),
            datasources,
        };
        let encoded = Serializer::to_bytes(&organization);
        let decoded = Organization::from_bytes(&encoded).unwrap();
        assert_eq!(organization, decoded);
    }
}
