pub mod in_memory;

use candid::Principal;
use ethnum::U256;
use ic_canister_log::log;

use crate::logs::DEBUG;

pub use in_memory::InMemoryLedger;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LedgerTransferError {
    TemporarilyUnavailable {
        message: String,
        token: Principal,
    },
    InsufficientFunds {
        balance: U256,
        failed_amount: U256,
        token: Principal,
    },
}

/// Token movements between callers and the pool's own account.
///
/// Implementations may call back into the pool; the pool holds no state borrow while a
/// transfer is in flight and rejects reentrant operations through its lock.
pub trait TokenLedger {
    /// Moves `amount` of `token` from `from` into the pool.
    fn transfer_in(
        &self,
        token: Principal,
        from: Principal,
        amount: U256,
    ) -> Result<(), LedgerTransferError>;

    /// Moves `amount` of `token` out of the pool to `to`.
    fn transfer_out(
        &self,
        token: Principal,
        to: Principal,
        amount: U256,
    ) -> Result<(), LedgerTransferError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Transfer {
    In {
        token: Principal,
        from: Principal,
        amount: U256,
    },
    Out {
        token: Principal,
        to: Principal,
        amount: U256,
    },
}

impl Transfer {
    pub fn amount(&self) -> U256 {
        match self {
            Transfer::In { amount, .. } | Transfer::Out { amount, .. } => *amount,
        }
    }

    fn execute<L: TokenLedger + ?Sized>(&self, ledger: &L) -> Result<(), LedgerTransferError> {
        match *self {
            Transfer::In {
                token,
                from,
                amount,
            } => ledger.transfer_in(token, from, amount),
            Transfer::Out { token, to, amount } => ledger.transfer_out(token, to, amount),
        }
    }

    /// The transfer that undoes this one.
    fn reversed(&self) -> Transfer {
        match *self {
            Transfer::In {
                token,
                from,
                amount,
            } => Transfer::Out {
                token,
                to: from,
                amount,
            },
            Transfer::Out { token, to, amount } => Transfer::In {
                token,
                from: to,
                amount,
            },
        }
    }
}

/// Executes `transfers` in order, skipping zero amounts.
///
/// If a transfer fails, the ones already executed are reversed newest first and the
/// original error is returned. A failed reversal is logged and does not stop the others.
pub fn settle<L: TokenLedger + ?Sized>(
    ledger: &L,
    transfers: &[Transfer],
) -> Result<(), LedgerTransferError> {
    let mut executed: Vec<Transfer> = Vec::with_capacity(transfers.len());

    for transfer in transfers.iter().filter(|t| t.amount() != U256::ZERO) {
        if let Err(transfer_error) = transfer.execute(ledger) {
            log!(
                DEBUG,
                "[settle]: transfer {transfer:?} failed with error: {transfer_error:?}, refunding {} executed transfers",
                executed.len()
            );
            for done in executed.iter().rev() {
                let refund = done.reversed();
                if let Err(refund_error) = refund.execute(ledger) {
                    log!(
                        DEBUG,
                        "[settle]: refund {refund:?} failed with error: {refund_error:?}"
                    );
                }
            }
            return Err(transfer_error);
        }
        executed.push(*transfer);
    }

    Ok(())
}
