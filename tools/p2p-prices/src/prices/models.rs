//! Data models for Binance P2P price endpoints

use {
    serde::Serialize,
    strum_macros::{Display, EnumString},
};

/// Cryptocurrencies that can be queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Asset {
    Btc,
    Eth,
    Bnb,
    #[default]
    Usdt,
    Usdc,
    Ada,
    Dot,
    Link,
    Uni,
    Ltc,
}

/// Fiat currencies that can be queried
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Fiat {
    #[default]
    Ves,
    Usd,
    Eur,
    Ars,
    Brl,
    Cop,
}

/// Side of the advertisements to search for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum TradeType {
    Buy,
    #[default]
    Sell,
}

/// Payload of the Binance P2P advertisement search
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub asset: Asset,
    pub fiat: Fiat,
    pub trade_type: TradeType,
    pub page: i64,
    pub rows: i64,
    pub merchant_check: bool,
    pub pay_types: Vec<String>,
    /// Always sent, as `null`.
    pub publisher_type: Option<String>,
}

/// A single advertisement that passed filtering
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub price: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    /// Quantity of the asset still tradable on this advertisement
    pub available_amount: f64,
    pub payment_methods: Vec<String>,
    pub advertiser_id: String,
    pub advertiser_name: String,
    pub completion_rate: f64,
}

impl Offer {
    /// Offers without a price or without anything left to trade are ignored.
    pub fn is_tradable(&self) -> bool {
        self.price > 0.0 && self.available_amount > 0.0
    }
}

/// Summary of the prices of a set of offers
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub average_price: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub price_range: f64,
    pub total_offers: usize,
    pub valid_offers: usize,
}

impl Statistics {
    /// Computes the statistics over the given offers. All values are zero when
    /// there are no offers.
    pub fn from_offers(offers: &[Offer]) -> Self {
        if offers.is_empty() {
            return Self::default();
        }

        let prices = offers.iter().map(|offer| offer.price);
        let sum = prices.clone().sum::<f64>();
        let min = prices.clone().fold(f64::INFINITY, f64::min);
        let max = prices.fold(f64::NEG_INFINITY, f64::max);

        Self {
            average_price: round_cents(sum / offers.len() as f64),
            min_price: round_cents(min),
            max_price: round_cents(max),
            price_range: round_cents(max - min),
            total_offers: offers.len(),
            valid_offers: offers.len(),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
