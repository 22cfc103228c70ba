#![doc = include_str!("../README.md")]

use {env_logger::Env, p2p_toolkit::bootstrap};

mod binance_client;
mod error;
mod prices;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    bootstrap!(([0, 0, 0, 0], 8080), [prices::get_p2p_prices::GetP2pPrices,]);
}
