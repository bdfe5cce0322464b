//! In-memory funding collaborator.
//!
//! Two ways for a third-party payer to fund an operation:
//!
//! - **Signature pull**: the payer registers a signing secret and issues a
//!   [`FundingAuthorization`] for one asset, amount ceiling and nonce. Each
//!   nonce is honoured once per payer.
//! - **Pre-approved transfer**: the payer grants a spender an allowance,
//!   which each pull decrements.

use std::collections::{HashMap, HashSet};

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::error::FundingError;
use crate::types::FundingAuthorization;
use crate::venue::{AssetBank, Funding};

#[derive(Debug, Clone, Default)]
pub struct MemoryFunding {
    secrets: HashMap<Address, Vec<u8>>,
    used_nonces: HashSet<(Address, u64)>,
    allowances: HashMap<(Address, Address, Address), U256>,
}

impl MemoryFunding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the secret `payer` signs authorizations with
    pub fn register_signer(&mut self, payer: Address, secret: &[u8]) {
        self.secrets.insert(payer, secret.to_vec());
    }

    /// Set `spender`'s allowance over `owner`'s `asset`
    pub fn approve(&mut self, asset: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((asset, owner, spender), amount);
    }

    pub fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(asset, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn is_nonce_used(&self, payer: Address, nonce: u64) -> bool {
        self.used_nonces.contains(&(payer, nonce))
    }
}

impl Funding for MemoryFunding {
    fn pull(
        &mut self,
        bank: &mut dyn AssetBank,
        authorization: &FundingAuthorization,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), FundingError> {
        let secret = self.secrets.get(&from).ok_or(FundingError::UnknownPayer(from))?;
        if !authorization.verify(secret, asset, from) {
            return Err(FundingError::InvalidSignature);
        }
        if self.is_nonce_used(from, authorization.nonce) {
            return Err(FundingError::NonceReused {
                payer: from,
                nonce: authorization.nonce,
            });
        }
        if amount > authorization.amount {
            return Err(FundingError::AmountExceedsAuthorization {
                authorized: authorization.amount,
                requested: amount,
            });
        }

        bank.transfer(asset, from, to, amount)?;
        self.used_nonces.insert((from, authorization.nonce));
        debug!(%asset, %from, %to, %amount, nonce = authorization.nonce, "authorized pull");
        Ok(())
    }

    fn pre_approved_transfer(
        &mut self,
        bank: &mut dyn AssetBank,
        asset: Address,
        from: Address,
        spender: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), FundingError> {
        let allowance = self.allowance(asset, from, spender);
        if allowance < amount {
            return Err(FundingError::InsufficientAllowance {
                allowance,
                requested: amount,
            });
        }

        bank.transfer(asset, from, to, amount)?;
        self.allowances.insert((asset, from, spender), allowance - amount);
        debug!(%asset, %from, %spender, %to, %amount, "pre-approved pull");
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
