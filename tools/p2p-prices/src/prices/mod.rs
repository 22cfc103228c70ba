//! Peer-to-peer price endpoints backed by the Binance P2P search API

use std::time::Duration;

pub(crate) const BINANCE_P2P_API_BASE: &str = "https://p2p.binance.com";
pub(crate) const SEARCH_ENDPOINT: &str = "bapi/c2c/v2/friendly/c2c/adv/search";
/// Upper bound for the whole upstream exchange, body included.
pub(crate) const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) mod get_p2p_prices;
pub(crate) mod models;
