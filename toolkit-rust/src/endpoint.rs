use {
    crate::{Failure, QueryParams},
    anyhow::Result as AnyResult,
    serde::Serialize,
    std::future::Future,
    warp::http::StatusCode,
};

/// This trait defines the interface for an Endpoint. It forces implementation
/// of the following methods:
///
/// - `new`: Builds a fresh instance of the endpoint for a single request.
/// - `handle`: Handles a request given its query parameters.
/// - `health`: Returns the health status of the endpoint.
///
/// And the following associated type:
///
/// - `Output`: The success payload of the endpoint.
///
/// Based on the provided methods and associated types, the runtime
/// automatically generates the following routes under [Endpoint::path]:
///
/// - `GET /`: Handles the request, passing the query string along.
/// - `OPTIONS /`: Answers the CORS preflight.
/// - `GET /health`: Returns the health status of the endpoint.
pub trait Endpoint: Send + Sync + 'static {
    /// The success payload of the endpoint. It is serialized as the JSON body
    /// of a `200 OK` reply.
    type Output: Serialize + Send;
    /// Creates a new instance of the endpoint. The runtime calls this once
    /// per request so no state is shared between requests.
    fn new() -> impl Future<Output = Self> + Send;
    /// Handles the request. The query parameters are passed raw, so parsing
    /// and defaulting is up to the implementor.
    ///
    /// A [Failure] is turned into a JSON error body with the status code it
    /// carries.
    fn handle(
        &self,
        query: QueryParams,
    ) -> impl Future<Output = Result<Self::Output, Failure>> + Send;
    /// Returns the health status of the endpoint. For now, this only returns
    /// an HTTP status code.
    ///
    /// It is used to generate the `/health` route.
    fn health(&self) -> impl Future<Output = AnyResult<StatusCode>> + Send;
    /// Returns the relative path on a webserver that the endpoint resides on.
    /// This defaults to an empty path (root URL). But can be overriden by the
    /// implementor.
    fn path() -> &'static str {
        ""
    }
}
