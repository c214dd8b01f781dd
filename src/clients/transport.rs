//! The transport seam between the HAL engine and the network.

use async_trait::async_trait;

use crate::clients::errors::HttpError;
use crate::clients::http_request::HttpRequest;
use crate::clients::http_response::HttpResponse;

/// A capability that sends one HTTP request and yields one response.
///
/// The HAL engine never opens sockets itself; every network call goes
/// through this trait, so any implementation (the bundled
/// [`HttpClient`](crate::clients::HttpClient), a test double, a client with
/// its own auth or retry policy) can be plugged into
/// [`HalClient`](crate::HalClient).
///
/// # Contract
///
/// - Implementations return `Ok` for every response that was received,
///   whatever its status code. Status handling belongs to the caller.
/// - `Err` is reserved for requests that could not be sent or whose
///   response could not be read.
/// - The returned future completes at most once and is never retried by
///   the engine.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Sends the request and returns the received response.
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}
