//! Registry Call Surface

use log::debug;
use serde::{Deserialize, Serialize};

use super::contract::{
    grant_request, open_request, put_datasource, register_organization, remove_datasource,
    AccessRegistry,
};
use super::error::RegistryError;
use super::types::{Organization, OrganizationKey};
use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryCall {
    RegisterOrganization {
        key: OrganizationKey,
        organization: Organization,
    },
    PutDatasource {
        key: OrganizationKey,
        datasource_id: String,
        locator: String,
    },
    RemoveDatasource {
        key: OrganizationKey,
        datasource_id: String,
    },
    OpenRequest {
        scope_id: String,
        requester: Address,
        provider: Address,
        created_at: u64,
    },
    GrantRequest {
        scope_id: String,
        requester: Address,
        provider: Address,
        auth_token: String,
    },
}

impl RegistryCall {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RegisterOrganization { .. } => "registerOrganization",
            Self::PutDatasource { .. } => "putDatasource",
            Self::RemoveDatasource { .. } => "removeDatasource",
            Self::OpenRequest { .. } => "openRequest",
            Self::GrantRequest { .. } => "grantRequest",
        }
    }
}

impl Serializer for RegistryCall {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::RegisterOrganization { key, organization } => {
                writer.write_u8(0);
                key.write(writer);
                organization.write(writer);
            }
            Self::PutDatasource {
                key,
                datasource_id,
                locator,
            } => {
                writer.write_u8(1);
                key.write(writer);
                datasource_id.write(writer);
                locator.write(writer);
            }
            Self::RemoveDatasource { key, datasource_id } => {
                writer.write_u8(2);
                key.write(writer);
                datasource_id.write(writer);
            }
            Self::OpenRequest {
                scope_id,
                requester,
                provider,
                created_at,
            } => {
                writer.write_u8(3);
                scope_id.write(writer);
                requester.write(writer);
                provider.write(writer);
                created_at.write(writer);
            }
            Self::GrantRequest {
                scope_id,
                requester,
                provider,
                auth_token,
            } => {
                writer.write_u8(4);
                scope_id.write(writer);
                requester.write(writer);
                provider.write(writer);
                auth_token.write(writer);
            }
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tag = reader.read_u8()?;
        match tag {
            0 => Ok(Self::RegisterOrganization {
                key: reader.read()?,
                organization: reader.read()?,
            }),
            1 => Ok(Self::PutDatasource {
                key: reader.read()?,
                datasource_id: reader.read()?,
                locator: reader.read()?,
            }),
            2 => Ok(Self::RemoveDatasource {
                key: reader.read()?,
                datasource_id: reader.read()?,
            }),
            3 => Ok(Self::OpenRequest {
                scope_id: reader.read()?,
                requester: reader.read()?,
                provider: reader.read()?,
                created_at: reader.read()?,
            }),
            4 => Ok(Self::GrantRequest {
                scope_id: reader.read()?,
                requester: reader.read()?,
                provider: reader.read()?,
                auth_token: reader.read()?,
            }),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn size(&self) -> usize {
        1 + match self {
            Self::RegisterOrganization { key, organization } => key.size() + organization.size(),
            Self::PutDatasource {
                key,
                datasource_id,
                locator,
            } => key.size() + datasource_id.size() + locator.size(),
            Self::RemoveDatasource { key, datasource_id } => key.size() + datasource_id.size(),
            Self::OpenRequest {
                scope_id,
                requester,
                provider,
                created_at,
            } => scope_id.size() + requester.size() + provider.size() + created_at.size(),
            Self::GrantRequest {
                scope_id,
                requester,
                provider,
                auth_token,
            } => scope_id.size() + requester.size() + provider.size() + auth_token.size(),
        }
    }
}

impl AccessRegistry {
    /// Apply one inbound call atomically
    pub fn execute(&mut self, call: RegistryCall) -> Result<(), RegistryError> {
        let name = call.name();
        debug!("registry call {}", name);

        let result = match call {
            RegistryCall::RegisterOrganization { key, organization } => {
                register_organization(self, key, organization)
            }
            RegistryCall::PutDatasource {
                key,
                datasource_id,
                locator,
            } => put_datasource(self, &key, datasource_id, locator),
            RegistryCall::RemoveDatasource { key, datasource_id } => {
                remove_datasource(self, &key, &datasource_id)
            }
            RegistryCall::OpenRequest {
                scope_id,
                requester,
                provider,
                created_at,
            } => open_request(self, scope_id, requester, provider, created_at),
            RegistryCall::GrantRequest {
                scope_id,
                requester,
                provider,
                auth_token,
            } => grant_request(self, &scope_id, &requester, &provider, auth_token),
        };

        if let Err(err) = &result {
            debug!("registry call {} rejected: {}", name, err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn addr(seed: u8) -> Address {
        Address::new([seed; 32])
    }

    #[test]
    fn execute_request_lifecycle() {
        let mut registry = AccessRegistry::new();
        registry
            .execute(RegistryCall::OpenRequest {
                scope_id: "scope1".into(),
                requester: addr(1),
                provider: addr(2),
                created_at: 100,
            })
            .unwrap();

        let result = registry.execute(RegistryCall::GrantRequest {
            scope_id: "scope1".into(),
            requester: addr(1),
            provider: addr(3),
            auth_token: "token".into(),
        });
        assert_eq!(result, Err(RegistryError::PartyMismatch));

        registry
            .execute(RegistryCall::GrantRequest {
                scope_id: "scope1".into(),
                requester: addr(1),
                provider: addr(2),
                auth_token: "token".into(),
            })
            .unwrap();
    }

    #[test]
    fn call_codec_roundtrip() {
        let mut datasources = IndexMap::new();
        datasources.insert("datasource1".to_string(), "value1".to_string());
        let calls = [
            RegistryCall::RegisterOrganization {
                key: OrganizationKey::new(addr(1), "jwt".into()),
                organization: Organization {
                    name: "toto".into(),
                    public_key_hash: addr(1),
                    public_key: "pk".into(),
                    datasources,
                },
            },
            RegistryCall::OpenRequest {
                scope_id: "scope1".into(),
                requester: addr(1),
                provider: addr(2),
                created_at: 7,
            },
            RegistryCall::RemoveDatasource {
                key: OrganizationKey::new(addr(1), "jwt".into()),
                datasource_id: "datasource1".into(),
            },
        ];
        for call in calls {
            let encoded = Serializer::to_bytes(&call);
            assert_eq!(encoded.len(), call.size());
            let decoded = RegistryCall::from_bytes(&encoded).unwrap();
            assert_eq!(call, decoded);
        }
    }
}
