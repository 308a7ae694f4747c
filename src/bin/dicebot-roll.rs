use saphir_dicebot::evaluate;
use std::env;
use tracing_subscriber::filter::EnvFilter;

fn main() {
    let filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new("saphir_dicebot=info,dicebot_roll=info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let formula = env::args().skip(1).collect::<Vec<String>>().join(" ");
    println!("{}", evaluate(&formula));
}
