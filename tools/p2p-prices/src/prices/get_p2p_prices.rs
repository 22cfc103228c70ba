//! # `GET /api/p2p-prices`
//!
//! Searches Binance P2P advertisements for an asset/fiat pair and summarizes
//! the prices of the tradable offers.

use {
    crate::{
        binance_client::BinanceP2pClient,
        error::{OfferParseError, PriceError},
        prices::models::{Asset, Fiat, Offer, SearchRequest, Statistics, TradeType},
    },
    p2p_toolkit::*,
    serde::Serialize,
    serde_json::{Map, Value},
};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_ROWS: i64 = 10;
/// Maximum number of offers included in the reply.
const MAX_OFFERS: usize = 5;

/// Normalized search parameters.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SearchQuery {
    asset: Asset,
    fiat: Fiat,
    trade_type: TradeType,
    page: i64,
    rows: i64,
}

impl SearchQuery {
    /// Builds the query from raw query string parameters. Unsupported
    /// `asset`, `fiat` and `tradeType` values fall back to their defaults,
    /// but a `page` or `rows` that is not an integer is an error.
    pub(crate) fn from_params(params: &QueryParams) -> Result<Self, PriceError> {
        Ok(Self {
            asset: parse_or_default(params, "asset"),
            fiat: parse_or_default(params, "fiat"),
            trade_type: parse_or_default(params, "tradeType"),
            page: parse_integer(params, "page", DEFAULT_PAGE)?,
            rows: parse_integer(params, "rows", DEFAULT_ROWS)?,
        })
    }
}

impl From<&SearchQuery> for SearchRequest {
    fn from(query: &SearchQuery) -> Self {
        Self {
            asset: query.asset,
            fiat: query.fiat,
            trade_type: query.trade_type,
            page: query.page,
            rows: query.rows,
            merchant_check: false,
            pay_types: vec![],
            publisher_type: None,
        }
    }
}

fn parse_or_default<T>(params: &QueryParams, key: &str) -> T
where
    T: std::str::FromStr + Default,
{
    params
        .get(key)
        .and_then(|value| value.to_uppercase().parse().ok())
        .unwrap_or_default()
}

fn parse_integer(params: &QueryParams, key: &str, default: i64) -> Result<i64, PriceError> {
    match params.get(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<i64>().map_err(|e| {
            PriceError::Internal(format!("invalid value '{}' for '{}': {}", raw, key, e))
        }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Output {
    success: bool,
    asset: Asset,
    fiat: Fiat,
    trade_type: TradeType,
    statistics: Statistics,
    /// First tradable offers, in the order Binance listed them
    offers: Vec<Offer>,
    /// Passed through from Binance as is, empty string when missing
    timestamp: Value,
    message: String,
}

pub(crate) struct GetP2pPrices {
    client: BinanceP2pClient,
}

impl Endpoint for GetP2pPrices {
    type Output = Output;

    async fn new() -> Self {
        let client = BinanceP2pClient::new(None, None);
        Self { client }
    }

    fn path() -> &'static str {
        "/api/p2p-prices"
    }

    async fn health(&self) -> AnyResult<StatusCode> {
        Ok(StatusCode::OK)
    }

    async fn handle(&self, query: QueryParams) -> Result<Self::Output, Failure> {
        self.search(&query).await.map_err(|error| {
            match error {
                PriceError::Internal(_) => log::error!("P2P price search failed: {}", error),
                _ => log::warn!("P2P price search failed: {}", error),
            }

            Failure::from(error)
        })
    }
}

impl GetP2pPrices {
    async fn search(&self, params: &QueryParams) -> Result<Output, PriceError> {
        let query = SearchQuery::from_params(params)?;

        log::info!(
            "Searching Binance P2P {} offers for {}/{} (page {}, rows {})",
            query.trade_type,
            query.asset,
            query.fiat,
            query.page,
            query.rows
        );

        let body = self.client.search(&SearchRequest::from(&query)).await?;
        let response = body.as_object().ok_or_else(|| {
            PriceError::Internal(format!(
                "expected a JSON object from Binance P2P, got '{}'",
                body
            ))
        })?;

        let offers = extract_offers(response);
        let statistics = Statistics::from_offers(&offers);

        log::info!(
            "Found {} tradable {}/{} offers, average price {}",
            statistics.valid_offers,
            query.asset,
            query.fiat,
            statistics.average_price
        );

        Ok(Output {
            success: true,
            asset: query.asset,
            fiat: query.fiat,
            trade_type: query.trade_type,
            statistics,
            offers: offers.into_iter().take(MAX_OFFERS).collect(),
            timestamp: response
                .get("timestamp")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())),
            message: format!(
                "Precios P2P obtenidos exitosamente para {}/{}",
                query.asset, query.fiat
            ),
        })
    }
}

/// Collects the tradable offers of a search response. Nothing is collected
/// unless the response is flagged successful, and advertisements that can't be
/// parsed are skipped.
fn extract_offers(response: &Map<String, Value>) -> Vec<Offer> {
    if response.get("success").and_then(Value::as_bool) != Some(true) {
        return vec![];
    }

    let Some(data) = response.get("data").and_then(Value::as_array) else {
        return vec![];
    };

    data.iter()
        .enumerate()
        .filter_map(|(index, entry)| match parse_offer(entry) {
            Ok(offer) => Some(offer),
            Err(e) => {
                log::debug!("Skipping advertisement #{}: {}", index, e);
                None
            }
        })
        .filter(Offer::is_tradable)
        .collect()
}

fn parse_offer(entry: &Value) -> Result<Offer, OfferParseError> {
    let entry = entry
        .as_object()
        .ok_or(OfferParseError::NotAnObject("data[]"))?;
    let empty = Map::new();
    let adv = object_field(entry, "adv")?.unwrap_or(&empty);
    let advertiser = object_field(entry, "advertiser")?.unwrap_or(&empty);

    let payment_methods = adv
        .get("tradeMethods")
        .and_then(Value::as_array)
        .map(|methods| {
            methods
                .iter()
                .filter_map(|method| {
                    method
                        .get("tradeMethodName")
                        .and_then(Value::as_str)
                        .filter(|name| !name.is_empty())
                        .or_else(|| method.get("identifier").and_then(Value::as_str))
                })
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(Offer {
        price: decimal_field(adv, "price")?,
        min_amount: decimal_field(adv, "minSingleTransAmount")?,
        max_amount: decimal_field(adv, "maxSingleTransAmount")?,
        available_amount: decimal_field(adv, "tradableQuantity")?,
        payment_methods,
        advertiser_id: text_field(advertiser, "userNo"),
        advertiser_name: text_field(advertiser, "nickName"),
        completion_rate: decimal_field(advertiser, "monthFinishRate")?,
    })
}

/// A missing or `null` object is treated as empty.
fn object_field<'a>(
    object: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a Map<String, Value>>, OfferParseError> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(inner)) => Ok(Some(inner)),
        Some(_) => Err(OfferParseError::NotAnObject(key)),
    }
}

/// Binance sends amounts as strings, but plain numbers are accepted too. A
/// missing amount is zero.
fn decimal_field(object: &Map<String, Value>, key: &'static str) -> Result<f64, OfferParseError> {
    let value = match object.get(key) {
        None => return Ok(0.0),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    value
        .filter(|value| value.is_finite())
        .ok_or(OfferParseError::InvalidDecimal(key))
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
