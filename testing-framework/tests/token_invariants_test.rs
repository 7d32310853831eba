// File: testing-framework/tests/token_invariants_test.rs
//
// Property tests over random call sequences:
// - The balance table always sums to the recorded total supply
// - A rejected call leaves the state exactly as it was
// - Approve always overwrites, regardless of history

use flextoken_common::token::TokenCall;
use flextoken_testing_framework::utilities::{deploy_token, test_address, TestAccounts};
use proptest::prelude::*;

const INITIAL_SUPPLY: u64 = 1_000;

/// One randomly generated inbound call with its caller
#[derive(Clone, Debug)]
struct RandomCall {
    caller: u8,
    call: TokenCall,
}

fn account_index() -> impl Strategy<Value = u8> {
    1u8..=4
}

fn amount() -> impl Strategy<Value = u64> {
    0u64..=INITIAL_SUPPLY + 10
}

fn random_call() -> impl Strategy<Value = RandomCall> {
    let call = prop_oneof![
        (account_index(), amount()).prop_map(|(to, tokens)| TokenCall::Transfer {
            destination: test_address(to),
            tokens,
        }),
        (account_index(), amount()).prop_map(|(spender, tokens)| TokenCall::Approve {
            spender: test_address(spender),
            tokens,
        }),
        (account_index(), account_index(), amount()).prop_map(|(from, to, tokens)| {
            TokenCall::TransferFrom {
                from: test_address(from),
                to: test_address(to),
                tokens,
            }
        }),
        Just(TokenCall::Lock),
        Just(TokenCall::Unlock),
        account_index().prop_map(|new_owner| TokenCall::TransferOwnership {
            new_owner: test_address(new_owner),
        }),
        Just(TokenCall::AcceptOwnership),
    ];
    (account_index(), call).prop_map(|(caller, call)| RandomCall { caller, call })
}

proptest! {
    #[test]
    fn supply_sum_holds_under_random_calls(calls in proptest::collection::vec(random_call(), 1..64)) {
        let accounts = TestAccounts::new();
        let mut contract = deploy_token(&accounts.owner, INITIAL_SUPPLY).unwrap();

        for RandomCall { caller, call } in calls {
            let caller = test_address(caller);
            let before = contract.clone();
            let result = contract.execute(&caller, call);

            // Failed calls are atomic: not a single table entry may differ
            if result.is_err() {
                prop_assert_eq!(&contract, &before);
            }

            prop_assert_eq!(contract.ledger.balance_sum(), contract.total_supply());
            prop_assert_eq!(contract.total_supply(), INITIAL_SUPPLY);
        }
    }

    #[test]
    fn approve_is_overwrite_not_additive(first in 0u64..1000, second in 0u64..1000) {
        let accounts = TestAccounts::new();
        let mut contract = deploy_token(&accounts.owner, INITIAL_SUPPLY).unwrap();

        contract.execute(&accounts.alice, TokenCall::Approve {
            spender: accounts.bob.clone(),
            tokens: first,
        }).unwrap();
        contract.execute(&accounts.alice, TokenCall::Approve {
            spender: accounts.bob.clone(),
            tokens: second,
        }).unwrap();

        prop_assert_eq!(contract.allowance(&accounts.alice, &accounts.bob), second);
    }
}
