pub mod guard;
pub mod ledger;
pub mod libraries;
pub mod logs;
pub mod pool;
pub mod position;
pub mod state;
pub mod tick;

#[cfg(test)]
pub mod tests;
