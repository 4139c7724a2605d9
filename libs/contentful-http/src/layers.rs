//! Tower layers used by the client stack.

use std::sync::Arc;
use std::task::{Context, Poll};

use http::header::HeaderName;
use http::{HeaderValue, Request, Response};
use tower::{Layer, Service};

/// Inserts a fixed set of headers into every request that does not already
/// carry them. Holds the `User-Agent` and the bearer `Authorization` value.
#[derive(Clone, Debug, Default)]
pub struct DefaultHeadersLayer {
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl DefaultHeadersLayer {
    #[must_use]
    pub fn new(headers: Vec<(HeaderName, HeaderValue)>) -> Self {
        Self {
            headers: Arc::new(headers),
        }
    }
}

impl<S> Layer<S> for DefaultHeadersLayer {
    type Service = DefaultHeadersService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        DefaultHeadersService {
            inner,
            headers: Arc::clone(&self.headers),
        }
    }
}

/// Service created by [`DefaultHeadersLayer`].
#[derive(Clone, Debug)]
pub struct DefaultHeadersService<S> {
    inner: S,
    headers: Arc<Vec<(HeaderName, HeaderValue)>>,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for DefaultHeadersService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        for (name, value) in self.headers.iter() {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }
        self.inner.call(req)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use bytes::Bytes;
    use http::{Method, StatusCode};
    use http_body_util::Full;
    use tower::ServiceExt;

    /// Echoes the request headers back as the response headers.
    #[derive(Clone)]
    struct Echo;

    impl Service<Request<Full<Bytes>>> for Echo {
        type Response = Response<Full<Bytes>>;
        type Error = Box<dyn std::error::Error + Send + Sync>;
        type Future = std::future::Ready<Result<Self::Response, Self::Error>>;

        fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn call(&mut self, req: Request<Full<Bytes>>) -> Self::Future {
            let mut resp = Response::builder()
                .status(StatusCode::OK)
                .body(Full::new(Bytes::new()))
                .unwrap();
            *resp.headers_mut() = req.headers().clone();
            std::future::ready(Ok(resp))
        }
    }

    fn layer() -> DefaultHeadersLayer {
        DefaultHeadersLayer::new(vec![
            (
                http::header::USER_AGENT,
                HeaderValue::from_static("contentful-test/1.0"),
            ),
            (
                http::header::AUTHORIZATION,
                HeaderValue::from_static("Bearer default"),
            ),
        ])
    }

    fn request() -> http::request::Builder {
        Request::builder().method(Method::GET).uri("http://example.com")
    }

    #[tokio::test]
    async fn missing_headers_are_added() {
        let service = layer().layer(Echo);
        let resp = service
            .oneshot(request().body(Full::new(Bytes::new())).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.headers()["user-agent"], "contentful-test/1.0");
        assert_eq!(resp.headers()["authorization"], "Bearer default");
    }

    #[tokio::test]
    async fn caller_headers_win() {
        let service = layer().layer(Echo);
        let req = request()
            .header(http::header::AUTHORIZATION, "Bearer override")
            .body(Full::new(Bytes::new()))
            .unwrap();
        let resp = service.oneshot(req).await.unwrap();

        assert_eq!(resp.headers()["authorization"], "Bearer override");
        assert_eq!(resp.headers()["user-agent"], "contentful-test/1.0");
    }
}
