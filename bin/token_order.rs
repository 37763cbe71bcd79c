use candid::Principal;
use clmm_engine::pool::create_pool::PoolArgs;

/// we have 4 args, token_a:Principal, token_b:Principal, fee and tick_spacing
/// prints the pool id with token0 and token1 sorted
fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 5 {
        eprintln!("usage: token_order <token_a> <token_b> <fee> <tick_spacing>");
        std::process::exit(1);
    }

    let token_a = Principal::from_text(&args[1]).expect("expected a valid principal");
    let token_b = Principal::from_text(&args[2]).expect("expected a valid principal");
    let fee = args[3].parse::<u32>().expect("expected a valid fee");
    let tick_spacing = args[4].parse::<i32>().expect("expected a valid tick_spacing");

    match PoolArgs::new(token_a, token_b, fee, tick_spacing) {
        Ok(pool_args) => println!(
            "token_0: {} , token_1: {}, fee: {}, max liquidity per tick: {}",
            pool_args.pool_id().token0, pool_args.pool_id().token1, pool_args.pool_id().fee.0,
            pool_args.max_liquidity_per_tick()
        ),
        Err(e) => {
            eprintln!("invalid pool: {:?}", e);
            std::process::exit(1);
        }
    }
}
