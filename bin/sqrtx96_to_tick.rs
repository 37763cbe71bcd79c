use clmm_engine::libraries::tick_math::TickMath;
use ethnum::U256;

// one arg, a Q64.96 sqrt price as a decimal integer

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("usage: sqrtx96_to_tick <sqrt_price_x96>");
        std::process::exit(1);
    }

    let sqrt_x96 = U256::from_str_radix(&args[1], 10_u32).expect("expected a number");

    match TickMath::get_tick_at_sqrt_ratio(sqrt_x96) {
        Ok(tick) => println!("tick for sqrt_x96 price {} is {}", sqrt_x96, tick),
        Err(e) => {
            eprintln!("sqrt_x96 price {} is out of range: {:?}", sqrt_x96, e);
            std::process::exit(1);
        }
    }
}
