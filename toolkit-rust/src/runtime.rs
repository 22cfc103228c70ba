use {
    crate::Endpoint,
    std::collections::HashMap,
    warp::{
        http::{
            header::{
                HeaderValue,
                ACCESS_CONTROL_ALLOW_HEADERS,
                ACCESS_CONTROL_ALLOW_METHODS,
                ACCESS_CONTROL_ALLOW_ORIGIN,
            },
            StatusCode,
        },
        reply::Response,
        Filter,
        Rejection,
        Reply,
    },
};

/// Raw query string parameters as received on the wire. Unknown keys are
/// kept and it's up to the [Endpoint] to ignore them.
pub type QueryParams = HashMap<String, String>;

/// Value of the `Access-Control-Allow-Methods` header.
pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
/// Value of the `Access-Control-Allow-Headers` header.
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Macro to bootstrap the runtime for a set of endpoints. The macro generates
/// the necessary routes for each endpoint and serves them on the provided
/// address.
///
/// # Examples
///
/// ### One endpoint running on `127.0.0.1:8080`
///
/// ```ignore
/// use p2p_toolkit::bootstrap;
///
/// #[tokio::main]
/// async fn main() {
///     bootstrap!(YourEndpoint);
/// }
/// ```
///
/// ### Multiple endpoints running on the provided address
///
/// ```ignore
/// use p2p_toolkit::bootstrap;
///
/// #[tokio::main]
/// async fn main() {
///     bootstrap!(([0, 0, 0, 0], 8081), [YourEndpoint, AnotherEndpoint]);
/// }
/// ```
#[macro_export]
macro_rules! bootstrap {
    ($addr:expr, [$endpoint:ty $(, $next_endpoint:ty)* $(,)?]) => {{
        use {
            $crate::warp::{http::StatusCode, Filter},
        };

        // Create routes for each Endpoint in the bundle.
        let routes = $crate::routes_for_::<$endpoint>();
        $(let routes = routes.or($crate::routes_for_::<$next_endpoint>());)*

        // Add a default health route in case there is none in the root.
        let default_health_route = $crate::warp::get()
            .and($crate::warp::path("health"))
            .and($crate::warp::path::end())
            .map(|| $crate::warp::reply::Reply::into_response($crate::warp::reply::with_status("", StatusCode::OK)));

        let routes = routes
            .or(default_health_route)
            .with($crate::warp::log("p2p_toolkit"));

        // Serve the routes.
        $crate::warp::serve(routes).run($addr).await
    }};
    // Default address.
    ([$($endpoint:ty),+ $(,)?]) => {
        $crate::bootstrap!(([127, 0, 0, 1], 8080), [$($endpoint, )*]);
    };
    // Only 1 endpoint.
    ($addr:expr, $endpoint:ty) => {
        $crate::bootstrap!($addr, [$endpoint]);
    };
    // Only 1 endpoint with default address.
    ($endpoint:ty) => {
        $crate::bootstrap!(([127, 0, 0, 1], 8080), [$endpoint]);
    };
}

/// This function generates the necessary routes for a given [Endpoint].
///
/// **This is an internal function used by [bootstrap!] macro and should not be
/// used directly.**
#[doc(hidden)]
pub fn routes_for_<T: Endpoint>() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let base_path = T::path()
        .split("/")
        .filter(|s| !s.is_empty())
        .fold(warp::any().boxed(), |filter, segment| {
            filter.and(warp::path(segment.to_string())).boxed()
        });

    let health_route = warp::get()
        .and(base_path.clone())
        .and(warp::path("health"))
        .and(warp::path::end())
        .and_then(health_handler::<T>);

    let preflight_route = warp::options()
        .and(base_path.clone())
        .and(warp::path::end())
        .map(preflight_reply);

    let handle_route = warp::get()
        .and(base_path)
        .and(warp::path::end())
        .and(warp::query::<QueryParams>())
        .and_then(handle_handler::<T>);

    health_route.or(preflight_route).or(handle_route)
}

async fn health_handler<T: Endpoint>() -> Result<impl Reply, Rejection> {
    let endpoint = T::new().await;

    let status = endpoint
        .health()
        .await
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    Ok(warp::reply::with_status("", status))
}

async fn handle_handler<T: Endpoint>(query: QueryParams) -> Result<Response, Rejection> {
    let endpoint = T::new().await;

    let response = match endpoint.handle(query).await {
        Ok(output) => with_cors(
            warp::reply::with_status(warp::reply::json(&output), StatusCode::OK).into_response(),
        ),
        Err(failure) => {
            log::warn!(
                "Request to '{}' failed with {}: {}",
                T::path(),
                failure.status(),
                failure.error()
            );

            // Error replies only advertise the origin.
            allow_any_origin(
                warp::reply::with_status(warp::reply::json(&failure), failure.status())
                    .into_response(),
            )
        }
    };

    Ok(response)
}

fn preflight_reply() -> Response {
    with_cors(warp::reply().into_response())
}

fn allow_any_origin(mut response: Response) -> Response {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));

    response
}

fn with_cors(response: Response) -> Response {
    let mut response = allow_any_origin(response);
    let headers = response.headers_mut();

    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );

    response
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{AnyResult, Failure},
        serde::Serialize,
        serde_json::{json, Value},
    };

    #[derive(Serialize)]
    struct Echo {
        success: bool,
        query: QueryParams,
    }

    struct EchoEndpoint;

    impl Endpoint for EchoEndpoint {
        type Output = Echo;

        async fn new() -> Self {
            Self
        }

        fn path() -> &'static str {
            "/api/echo"
        }

        async fn health(&self) -> AnyResult<StatusCode> {
            Ok(StatusCode::OK)
        }

        async fn handle(&self, query: QueryParams) -> Result<Self::Output, Failure> {
            if query.contains_key("fail") {
                return Err(Failure::new(
                    StatusCode::BAD_GATEWAY,
                    "Upstream error",
                    "Something went wrong upstream",
                ));
            }

            Ok(Echo {
                success: true,
                query,
            })
        }
    }

    #[tokio::test]
    async fn test_get_passes_query_and_sets_cors_headers() {
        let response = warp::test::request()
            .method("GET")
            .path("/api/echo?asset=btc&rows=5")
            .reply(&routes_for_::<EchoEndpoint>())
            .await;

        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], ALLOWED_METHODS);
        assert_eq!(headers["access-control-allow-headers"], ALLOWED_HEADERS);

        let body = serde_json::from_slice::<Value>(response.body()).unwrap();
        assert_eq!(
            body,
            json!({ "success": true, "query": { "asset": "btc", "rows": "5" } })
        );
    }

    #[tokio::test]
    async fn test_get_without_query_string() {
        let response = warp::test::request()
            .method("GET")
            .path("/api/echo")
            .reply(&routes_for_::<EchoEndpoint>())
            .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = serde_json::from_slice::<Value>(response.body()).unwrap();
        assert_eq!(body["query"], json!({}));
    }

    #[tokio::test]
    async fn test_failure_maps_to_status_and_body() {
        let response = warp::test::request()
            .method("GET")
            .path("/api/echo?fail=1")
            .reply(&routes_for_::<EchoEndpoint>())
            .await;

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let headers = response.headers();
        assert_eq!(headers["content-type"], "application/json");
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert!(headers.get("access-control-allow-methods").is_none());

        let body = serde_json::from_slice::<Value>(response.body()).unwrap();
        assert_eq!(
            body,
            json!({
                "success": false,
                "error": "Upstream error",
                "message": "Something went wrong upstream",
            })
        );
    }

    #[tokio::test]
    async fn test_preflight_has_cors_headers_and_no_body() {
        let response = warp::test::request()
            .method("OPTIONS")
            .path("/api/echo")
            .reply(&routes_for_::<EchoEndpoint>())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.body().is_empty());

        let headers = response.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], ALLOWED_METHODS);
        assert_eq!(headers["access-control-allow-headers"], ALLOWED_HEADERS);
    }

    #[tokio::test]
    async fn test_health_route() {
        let response = warp::test::request()
            .method("GET")
            .path("/api/echo/health")
            .reply(&routes_for_::<EchoEndpoint>())
            .await;

        assert_eq!(response.status(), StatusCode::OK);
    }
}
