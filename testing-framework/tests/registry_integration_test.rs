// File: testing-framework/tests/registry_integration_test.rs
//
// Access Registry Integration Tests
//
// Full organization/access-request bookkeeping flow:
// - Organization registration under composite record keys
// - Datasource publication and removal
// - Request open -> grant lifecycle with the status moving inside the key
// - State persistence across the binary codec

use flextoken_common::registry::{
    AccessRegistry, AccessRequestKey, Organization, OrganizationKey, RegistryCall, RegistryError,
    RequestStatus,
};
use flextoken_common::serializer::Serializer;
use flextoken_testing_framework::utilities::{test_address, TestAccounts};
use indexmap::IndexMap;

fn organization(name: &str, account_seed: u8) -> Organization {
    Organization {
        name: name.into(),
        public_key_hash: test_address(account_seed),
        public_key: format!("{} public key", name),
        datasources: IndexMap::new(),
    }
}

#[test]
fn bookkeeping_flow() {
    let accounts = TestAccounts::new();
    let mut registry = AccessRegistry::new();

    let toto_key = OrganizationKey::new(accounts.alice.clone(), "jwt".into());
    let tata_key = OrganizationKey::new(accounts.bob.clone(), "jwt".into());

    registry
        .execute(RegistryCall::RegisterOrganization {
            key: toto_key.clone(),
            organization: organization("toto", 2),
        })
        .unwrap();
    registry
        .execute(RegistryCall::RegisterOrganization {
            key: tata_key.clone(),
            organization: organization("tata", 3),
        })
        .unwrap();
    assert_eq!(registry.organization_count(), 2);

    for (id, locator) in [
        ("datasource1", "value1"),
        ("datasource2", "value2"),
        ("datasource3", "value3"),
    ] {
        registry
            .execute(RegistryCall::PutDatasource {
                key: toto_key.clone(),
                datasource_id: id.into(),
                locator: locator.into(),
            })
            .unwrap();
    }
    assert_eq!(
        registry.organization(&toto_key).unwrap().datasources.len(),
        3
    );

    // Alice asks bob's organization for access to scope1
    registry
        .execute(RegistryCall::OpenRequest {
            scope_id: "scope1".into(),
            requester: accounts.alice.clone(),
            provider: accounts.bob.clone(),
            created_at: 1571761674,
        })
        .unwrap();
    assert_eq!(
        registry
            .requests_with_status(RequestStatus::Pending)
            .count(),
        1
    );

    registry
        .execute(RegistryCall::GrantRequest {
            scope_id: "scope1".into(),
            requester: accounts.alice.clone(),
            provider: accounts.bob.clone(),
            auth_token: "jwtToken".into(),
        })
        .unwrap();

    assert_eq!(
        registry
            .requests_with_status(RequestStatus::Pending)
            .count(),
        0
    );
    let granted = registry
        .request(&AccessRequestKey::granted("scope1"))
        .unwrap();
    assert_eq!(granted.auth_token.as_deref(), Some("jwtToken"));
    assert_eq!(granted.requester, accounts.alice);
    assert_eq!(granted.provider, accounts.bob);
}

#[test]
fn rejected_calls_do_not_disturb_the_tables() {
    let accounts = TestAccounts::new();
    let mut registry = AccessRegistry::new();
    registry
        .execute(RegistryCall::OpenRequest {
            scope_id: "scope2".into(),
            requester: accounts.bob.clone(),
            provider: accounts.alice.clone(),
            created_at: 1571761690,
        })
        .unwrap();
    let before = registry.clone();

    let result = registry.execute(RegistryCall::GrantRequest {
        scope_id: "scope2".into(),
        requester: accounts.bob.clone(),
        provider: accounts.carol.clone(),
        auth_token: "token".into(),
    });
    assert_eq!(result, Err(RegistryError::PartyMismatch));
    assert_eq!(registry, before);

    let result = registry.execute(RegistryCall::OpenRequest {
        scope_id: "scope2".into(),
        requester: accounts.carol.clone(),
        provider: accounts.alice.clone(),
        created_at: 0,
    });
    assert_eq!(result, Err(RegistryError::RequestExists("scope2".into())));
    assert_eq!(registry, before);
}

#[test]
fn state_survives_codec() -> anyhow::Result<()> {
    let accounts = TestAccounts::new();
    let mut registry = AccessRegistry::new();
    let key = OrganizationKey::new(accounts.alice.clone(), "jwt".into());
    registry.execute(RegistryCall::RegisterOrganization {
        key: key.clone(),
        organization: organization("toto", 2),
    })?;
    registry.execute(RegistryCall::PutDatasource {
        key,
        datasource_id: "datasource1".into(),
        locator: "value1".into(),
    })?;
    registry.execute(RegistryCall::OpenRequest {
        scope_id: "scope1".into(),
        requester: accounts.alice.clone(),
        provider: accounts.bob.clone(),
        created_at: 7,
    })?;

    let encoded = Serializer::to_bytes(&registry);
    assert_eq!(encoded.len(), registry.size());
    let restored = AccessRegistry::from_bytes(&encoded)?;
    assert_eq!(registry, restored);
    Ok(())
}
