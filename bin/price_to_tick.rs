use clmm_engine::libraries::{safe_cast::big_uint_to_u256, tick_math::TickMath};
use num_bigint::ToBigUint;

// we have 2 args, price and tick_spacing

fn main() {
    let args: Vec<_> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("usage: price_to_tick <price> <tick_spacing>");
        std::process::exit(1);
    }

    let q_96 = 2_f64.powi(96);

    let price = args[1].parse::<f64>().expect("expected a floating number");

    let tick_spacing = args[2]
        .parse::<i32>()
        .expect("expected a valid tick_spacing");

    let sqrtx96_floating = price.sqrt() * q_96;

    let sqrtx96_u256 = big_uint_to_u256(
        sqrtx96_floating
            .to_biguint()
            .expect("failed to convert to biguint"),
    )
    .expect("failed to parse into u256");

    let tick_not_aligned =
        TickMath::get_tick_at_sqrt_ratio(sqrtx96_u256).expect("price is outside the tick range");

    // align tick with tick_spacing, rounding down
    let tick = tick_not_aligned.div_euclid(tick_spacing) * tick_spacing;

    println!(
        "sqrt_x96 price {} for price {}, tick {} and not_aligned tick {}",
        sqrtx96_u256, price, tick, tick_not_aligned
    );
}
