use candid::Principal;
use ethnum::U256;
use ic_canister_log::log;
use std::{
    cell::RefCell,
    collections::{BTreeMap, BTreeSet},
};

use super::{LedgerTransferError, TokenLedger, Transfer};
use crate::logs::DEBUG;

/// A ledger keeping every balance in memory, keyed by (token, owner).
///
/// The pool's funds live under `pool_account`. Transfers of a token can be made to fail on
/// demand, which is how ledger outages are simulated.
#[derive(Debug)]
pub struct InMemoryLedger {
    pool_account: Principal,
    balances: RefCell<BTreeMap<(Principal, Principal), U256>>,
    failing_tokens: RefCell<BTreeSet<Principal>>,
    history: RefCell<Vec<Transfer>>,
}

impl InMemoryLedger {
    pub fn new(pool_account: Principal) -> Self {
        Self {
            pool_account,
            balances: RefCell::default(),
            failing_tokens: RefCell::default(),
            history: RefCell::default(),
        }
    }

    pub fn pool_account(&self) -> Principal {
        self.pool_account
    }

    /// Credits `amount` of `token` to `owner` out of thin air.
    pub fn deposit(&self, token: Principal, owner: Principal, amount: U256) {
        let mut balances = self.balances.borrow_mut();
        let balance = balances.entry((token, owner)).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, token: Principal, owner: Principal) -> U256 {
        self.balances
            .borrow()
            .get(&(token, owner))
            .copied()
            .unwrap_or_default()
    }

    pub fn fail_transfers_of(&self, token: Principal) {
        self.failing_tokens.borrow_mut().insert(token);
    }

    pub fn restore(&self, token: Principal) {
        self.failing_tokens.borrow_mut().remove(&token);
    }

    /// Successful transfers, oldest first.
    pub fn history(&self) -> Vec<Transfer> {
        self.history.borrow().clone()
    }

    fn transfer(
        &self,
        token: Principal,
        from: Principal,
        to: Principal,
        amount: U256,
    ) -> Result<(), LedgerTransferError> {
        if self.failing_tokens.borrow().contains(&token) {
            let message = format!("{} ledger temporarily unavailable, try again", token.to_text());
            log!(DEBUG, "[transfer]: {message}");
            return Err(LedgerTransferError::TemporarilyUnavailable { message, token });
        }

        let balance = self.balance_of(token, from);
        if balance < amount {
            log!(
                DEBUG,
                "[transfer]: {} holds {balance} of {}, cannot send {amount}",
                from.to_text(),
                token.to_text()
            );
            return Err(LedgerTransferError::InsufficientFunds {
                balance,
                failed_amount: amount,
                token,
            });
        }

        let mut balances = self.balances.borrow_mut();
        balances.insert((token, from), balance - amount);
        let receiver = balances.entry((token, to)).or_default();
        *receiver = receiver.saturating_add(amount);
        Ok(())
    }
}

impl TokenLedger for InMemoryLedger {
    fn transfer_in(
        &self,
        token: Principal,
        from: Principal,
        amount: U256,
    ) -> Result<(), LedgerTransferError> {
        self.transfer(token, from, self.pool_account, amount)?;
        self.history.borrow_mut().push(Transfer::In {
            token,
            from,
            amount,
        });
        Ok(())
    }

    fn transfer_out(
        &self,
        token: Principal,
        to: Principal,
        amount: U256,
    ) -> Result<(), LedgerTransferError> {
        self.transfer(token, self.pool_account, to, amount)?;
        self.history
            .borrow_mut()
            .push(Transfer::Out { token, to, amount });
        Ok(())
    }
}
