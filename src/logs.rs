use ic_canister_log::declare_log_buffer;

// High-priority messages: pool lifecycle and state-changing operations.
declare_log_buffer!(name = INFO, capacity = 1000);

// Low-priority diagnostics: tick crossings, rejected calls, ledger failures and refunds.
declare_log_buffer!(name = DEBUG, capacity = 1000);
