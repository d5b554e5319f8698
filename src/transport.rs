use std::fmt;
use std::future::Future;

use reqwest::{
    Method, RequestBuilder, StatusCode,
    header::{self, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio_util::sync::CancellationToken;
use tracing_error::SpanTrace;
use url::Url;

use crate::endpoints::TimberEndpoint;
use crate::error::{Error, Result};
use crate::form::{Environment, FormPayload};

/// The response envelope of a call, passed through without interpretation.
///
/// JSON endpoints carry the decoded body as a [`serde_json::Value`] (`null` for an
/// empty body, a string for a body that is not JSON). Download endpoints carry the
/// raw bytes.
#[derive(Debug, Clone)]
pub struct ApiResponse<T = serde_json::Value> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl ApiResponse<serde_json::Value> {
    /// Decodes the body into a typed value, leaving the envelope untouched.
    pub fn json<R: DeserializeOwned>(&self) -> Result<R> {
        Ok(serde_json::from_value(self.data.clone())?)
    }

    /// Converts the envelope into one carrying a typed body.
    pub fn into_typed<R: DeserializeOwned>(self) -> Result<ApiResponse<R>> {
        Ok(ApiResponse {
            status: self.status,
            headers: self.headers,
            data: serde_json::from_value(self.data)?,
        })
    }
}

/// Shared HTTP configuration: the SDK root URL and a static `Authorization` value.
///
/// Read-only after construction and cheap to clone. Every call composes its own
/// header set, so no content type is ever fixed at construction time.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    root: Url,
    authorization: Option<HeaderValue>,
    environment: Environment,
}

impl Transport {
    pub(crate) fn new(
        http: reqwest::Client,
        root: Url,
        authorization: Option<HeaderValue>,
        environment: Environment,
    ) -> Self {
        Self {
            http,
            root,
            authorization,
            environment,
        }
    }

    /// The SDK root URL every endpoint is resolved against.
    #[must_use]
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// The environment multipart payloads are built for.
    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Creates a fresh multipart payload for this transport's environment.
    pub fn form(&self) -> Result<FormPayload> {
        FormPayload::new(self.environment)
    }

    /// Build a request with the full header set for this call.
    fn build_request(&self, method: Method, endpoint: &TimberEndpoint) -> Result<(RequestBuilder, HeaderMap)> {
        let authorization = self.authorization.clone().ok_or(Error::MissingCredential)?;
        let url = endpoint.to_url(&self.root)?;

        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, authorization);
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        Ok((self.http.request(method, url), headers))
    }

    /// Perform an authenticated `GET` request with query parameters.
    #[instrument(skip(self, query))]
    pub(crate) async fn get<Q: Serialize + ?Sized>(&self, endpoint: TimberEndpoint, query: &Q) -> Result<ApiResponse> {
        let (builder, headers) = self.build_request(Method::GET, &endpoint)?;
        trace!(%endpoint, "making GET request");
        let response = builder.headers(headers).query(query).send().await?;
        Self::handle_response(response).await
    }

    /// Perform an authenticated request carrying a JSON body.
    #[instrument(skip(self, data))]
    pub(crate) async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: TimberEndpoint,
        data: &B,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(data)?;
        let (builder, mut headers) = self.build_request(method.clone(), &endpoint)?;
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        trace!(%method, %endpoint, bytes = body.len(), "making JSON request");
        let response = builder.headers(headers).body(body).send().await?;
        Self::handle_response(response).await
    }

    /// Perform an authenticated request without a body.
    #[instrument(skip(self))]
    pub(crate) async fn send_empty(&self, method: Method, endpoint: TimberEndpoint) -> Result<ApiResponse> {
        let (builder, headers) = self.build_request(method.clone(), &endpoint)?;
        trace!(%method, %endpoint, "making request");
        let response = builder.headers(headers).send().await?;
        Self::handle_response(response).await
    }

    /// Perform an authenticated request carrying a multipart body.
    ///
    /// The payload's own headers are merged in as-is. A token that is already
    /// cancelled stops the call before anything is sent; one cancelled mid-flight
    /// drops the exchange and the call fails with [`Error::Cancelled`].
    #[instrument(skip(self, form, cancel))]
    pub(crate) async fn send_form(
        &self,
        method: Method,
        endpoint: TimberEndpoint,
        form: FormPayload,
        cancel: Option<&CancellationToken>,
    ) -> Result<ApiResponse> {
        let (builder, mut headers) = self.build_request(method.clone(), &endpoint)?;
        trace!(%method, %endpoint, fields = ?form.fields(), "making multipart request");
        let (body, form_headers) = form.into_parts();
        headers.extend(form_headers);

        // `headers` replaces anything `multipart` set, so the payload's own
        // content type wins when it declares one.
        let request = builder.multipart(body).headers(headers);
        Self::cancellable(cancel, async move {
            let response = request.send().await?;
            Self::handle_response(response).await
        })
        .await
    }

    /// Perform an authenticated `GET` whose body is returned as raw bytes.
    #[instrument(skip(self))]
    pub(crate) async fn download(&self, endpoint: TimberEndpoint) -> Result<ApiResponse<Vec<u8>>> {
        let (builder, mut headers) = self.build_request(Method::GET, &endpoint)?;
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));
        trace!(%endpoint, "making binary GET request");
        let response = builder.headers(headers).send().await?;

        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        debug!(%url, %status, bytes = bytes.len(), "received binary response");

        if !status.is_success() {
            return Err(Error::Status {
                status,
                url,
                headers,
                body: String::from_utf8_lossy(&bytes).into_owned(),
                span_trace: SpanTrace::capture(),
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            data: bytes.to_vec(),
        })
    }

    async fn cancellable<T>(
        cancel: Option<&CancellationToken>,
        exchange: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        match cancel {
            Some(token) if token.is_cancelled() => {
                debug!("cancellation requested before sending");
                Err(Error::Cancelled)
            }
            Some(token) => match token.run_until_cancelled(exchange).await {
                Some(result) => result,
                None => {
                    debug!("cancellation requested during exchange");
                    Err(Error::Cancelled)
                }
            },
            None => exchange.await,
        }
    }

    async fn handle_response(response: reqwest::Response) -> Result<ApiResponse> {
        let status = response.status();
        let url = response.url().to_string();
        let headers = response.headers().clone();
        let text = response.text().await?;

        debug!(%url, %status, bytes = text.len(), "received response");
        trace!("Response text:\n{}", text);

        if !status.is_success() {
            return Err(Error::Status {
                status,
                url,
                headers,
                body: text,
                span_trace: SpanTrace::capture(),
            });
        }

        let data = if text.trim().is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text))
        };

        Ok(ApiResponse { status, headers, data })
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("root", &self.root.as_str())
            .field("authorized", &self.authorization.is_some())
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
