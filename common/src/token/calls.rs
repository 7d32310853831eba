//! Token Call Surface
//!
//! Each inbound call is an entry-point name plus its typed parameter
//! record. `TokenContract::execute` is the single dispatch point and keeps
//! the all-or-nothing semantics of the individual entry points.

use log::debug;
use serde::{Deserialize, Serialize};

use super::contract::{
    accept_ownership, approve, lock, set_name, set_symbol, transfer, transfer_from,
    transfer_ownership, unlock, TokenContract,
};
use super::error::TokenError;
use crate::address::Address;
use crate::serializer::{Reader, ReaderError, Serializer, Writer};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    Transfer { destination: Address, tokens: u64 },
    Approve { spender: Address, tokens: u64 },
    TransferFrom { from: Address, to: Address, tokens: u64 },
    Lock,
    Unlock,
    SetSymbol { symbol: String },
    SetName { name: String },
    TransferOwnership { new_owner: Address },
    AcceptOwnership,
}

impl TokenCall {
    /// Entry-point name as exposed on the call surface
    pub fn name(&self) -> &'static str {
        match self {
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transferFrom",
            Self::Lock => "lock",
            Self::Unlock => "unlock",
            Self::SetSymbol { .. } => "setSymbol",
            Self::SetName { .. } => "setName",
            Self::TransferOwnership { .. } => "transferOwnership",
            Self::AcceptOwnership => "acceptOwnership",
        }
    }
}

impl Serializer for TokenCall {
    fn write(&self, writer: &mut Writer) {
        match self {
            Self::Transfer {
                destination,
                tokens,
            } => {
                writer.write_u8(0);
                destination.write(writer);
                tokens.write(writer);
            }
            Self::Approve { spender, tokens } => {
                writer.write_u8(1);
                spender.write(writer);
                tokens.write(writer);
            }
            Self::TransferFrom { from, to, tokens } => {
                writer.write_u8(2);
                from.write(writer);
                to.write(writer);
                tokens.write(writer);
            }
            Self::Lock => writer.write_u8(3),
            Self::Unlock => writer.write_u8(4),
            Self::SetSymbol { symbol } => {
                writer.write_u8(5);
                symbol.write(writer);
            }
            Self::SetName { name } => {
                writer.write_u8(6);
                name.write(writer);
            }
            Self::TransferOwnership { new_owner } => {
                writer.write_u8(7);
                new_owner.write(writer);
            }
            Self::AcceptOwnership => writer.write_u8(8),
        }
    }

    fn read(reader: &mut Reader) -> Result<Self, ReaderError> {
        let tag = reader.read_u8()?;
        match tag {
            0 => Ok(Self::Transfer {
                destination: reader.read()?,
                tokens: reader.read()?,
            }),
            1 => Ok(Self::Approve {
                spender: reader.read()?,
                tokens: reader.read()?,
            }),
            2 => Ok(Self::TransferFrom {
                from: reader.read()?,
                to: reader.read()?,
                tokens: reader.read()?,
            }),
            3 => Ok(Self::Lock),
            4 => Ok(Self::Unlock),
            5 => Ok(Self::SetSymbol {
                symbol: reader.read()?,
            }),
            6 => Ok(Self::SetName {
                name: reader.read()?,
            }),
            7 => Ok(Self::TransferOwnership {
                new_owner: reader.read()?,
            }),
            8 => Ok(Self::AcceptOwnership),
            _ => Err(ReaderError::InvalidValue),
        }
    }

    fn size(&self) -> usize {
        1 + match self {
            Self::Transfer {
                destination,
                tokens,
            } => destination.size() + tokens.size(),
            Self::Approve { spender, tokens } => spender.size() + tokens.size(),
            Self::TransferFrom { from, to, tokens } => from.size() + to.size() + tokens.size(),
            Self::Lock | Self::Unlock | Self::AcceptOwnership => 0,
            Self::SetSymbol { symbol } => symbol.size(),
            Self::SetName { name } => name.size(),
            Self::TransferOwnership { new_owner } => new_owner.size(),
        }
    }
}

impl TokenContract {
    /// Apply one inbound call atomically on behalf of `caller`
    pub fn execute(&mut self, caller: &Address, call: TokenCall) -> Result<(), TokenError> {
        let name = call.name();
        debug!("token call {} from {}", name, caller);

        let result = match call {
            TokenCall::Transfer {
                destination,
                tokens,
            } => transfer(self, caller, &destination, tokens),
            TokenCall::Approve { spender, tokens } => approve(self, caller, &spender, tokens),
            TokenCall::TransferFrom { from, to, tokens } => {
                transfer_from(self, caller, &from, &to, tokens)
            }
            TokenCall::Lock => lock(self, caller),
            TokenCall::Unlock => unlock(self, caller),
            TokenCall::SetSymbol { symbol } => set_symbol(self, caller, symbol),
            TokenCall::SetName { name } => set_name(self, caller, name),
            TokenCall::TransferOwnership { new_owner } => {
                transfer_ownership(self, caller, new_owner)
            }
            TokenCall::AcceptOwnership => accept_ownership(self, caller),
        };

        if let Err(err) = &result {
            debug!("token call {} rejected: {}", name, err);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::types::TokenMetadata;

    fn addr(seed: u8) -> Address {
        Address::new([seed; 32])
    }

    fn deploy(owner: &Address) -> TokenContract {
        TokenContract::new(
            TokenMetadata::new("Flexible Token".into(), "FLX".into(), 10).unwrap(),
            owner.clone(),
            40,
        )
        .unwrap()
    }

    #[test]
    fn execute_dispatches_to_entry_points() {
        let owner = addr(1);
        let bob = addr(2);
        let mut contract = deploy(&owner);

        contract
            .execute(
                &owner,
                TokenCall::Transfer {
                    destination: bob.clone(),
                    tokens: 10,
                },
            )
            .unwrap();
        contract.execute(&owner, TokenCall::Lock).unwrap();

        let result = contract.execute(
            &bob,
            TokenCall::Transfer {
                destination: owner.clone(),
                tokens: 1,
            },
        );
        assert_eq!(result, Err(TokenError::ContractLocked));
        assert_eq!(contract.balance_of(&bob), 10);
    }

    #[test]
    fn call_codec_roundtrip() {
        let calls = [
            TokenCall::Transfer {
                destination: addr(9),
                tokens: 123,
            },
            TokenCall::TransferFrom {
                from: addr(1),
                to: addr(2),
                tokens: u64::MAX,
            },
            TokenCall::SetSymbol {
                symbol: "FLX".into(),
            },
            TokenCall::Lock,
            TokenCall::AcceptOwnership,
        ];
        for call in calls {
            let encoded = Serializer::to_bytes(&call);
            assert_eq!(encoded.len(), call.size());
            let decoded = TokenCall::from_bytes(&encoded).unwrap();
            assert_eq!(call, decoded);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert!(matches!(
            TokenCall::from_bytes(&[42]),
            Err(ReaderError::InvalidValue)
        ));
    }

    #[test]
    fn entry_point_names() {
        assert_eq!(
            TokenCall::TransferFrom {
                from: addr(1),
                to: addr(2),
                tokens: 0
            }
            .name(),
            "transferFrom"
        );
        assert_eq!(TokenCall::Unlock.name(), "unlock");
    }
}
