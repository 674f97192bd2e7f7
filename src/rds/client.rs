//! RDS Query API client

use super::operations::{DescribeOperation, Operation};
use super::params::QueryRequest;
use super::SERVICE;
use crate::auth::SigV4Signer;
use crate::config::ClientConfig;
use crate::decode::{decode_response, QueryResponse};
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::pagination::{
    Filter, ListRequest, ListResponse, PageFetcher, PageOptions, PageSizeBounds,
    PaginatedListExecutor,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Client for one RDS regional endpoint
#[derive(Debug)]
pub struct RdsClient {
    http: HttpClient,
    endpoint: Url,
    bounds: PageSizeBounds,
}

impl RdsClient {
    /// Create a client over an already configured transport
    pub fn new(http: HttpClient, endpoint: Url) -> Self {
        Self {
            http,
            endpoint,
            bounds: PageSizeBounds::default(),
        }
    }

    /// Build a signed client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let credentials = config.credentials.resolve()?;
        let signer = SigV4Signer::new(credentials, config.region.clone(), SERVICE);
        let http = HttpClient::with_config(HttpClientConfig::from(&config.http))?.with_signer(signer);

        let endpoint = config.endpoint()?;
        debug!("RDS endpoint {endpoint} ({})", config.region);

        Ok(Self::new(http, endpoint).with_bounds(config.paging.bounds()))
    }

    /// Set the page size bounds used for `MaxRecords`
    #[must_use]
    pub fn with_bounds(mut self, bounds: PageSizeBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Endpoint requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Page size bounds used for `MaxRecords`
    pub fn bounds(&self) -> PageSizeBounds {
        self.bounds
    }

    /// Send a request and decode its result element
    pub async fn call<R>(&self, request: &QueryRequest) -> Result<QueryResponse<R>>
    where
        R: DeserializeOwned,
    {
        debug!("Calling {}", request.action());
        let body = self.http.post_form(&self.endpoint, request.params()).await?;
        let response: QueryResponse<R> = decode_response(&body)?;
        if let Some(ref id) = response.request_id {
            debug!("{} request id {id}", request.action());
        }
        Ok(response)
    }

    /// Validate and run a single-call operation
    pub async fn execute<O: Operation>(&self, operation: &O) -> Result<O::Output> {
        operation.validate()?;
        let mut request = QueryRequest::new(O::ACTION);
        operation.add_params(&mut request);
        Ok(self.call::<O::Output>(&request).await?.result)
    }

    /// Page fetcher for a describe operation
    pub fn describe<'a, O: DescribeOperation>(&'a self, operation: &'a O) -> DescribeFetcher<'a, O> {
        DescribeFetcher {
            client: self,
            operation,
        }
    }

    /// Run a describe operation through the executor and collect its records
    pub async fn list<O: DescribeOperation>(
        &self,
        operation: &O,
        options: &PageOptions,
        filters: Vec<Filter>,
    ) -> Result<Vec<O::Item>> {
        PaginatedListExecutor::new()
            .with_bounds(self.bounds)
            .with_filters(filters)
            .collect(options, &self.describe(operation))
            .await
    }
}

/// Fetches pages of a describe operation
///
/// Maps the executor's cursor to `Marker`, the page size hint to
/// `MaxRecords` and filters to `Filters.Filter.N`.
pub struct DescribeFetcher<'a, O> {
    client: &'a RdsClient,
    operation: &'a O,
}

impl<'a, O: DescribeOperation> DescribeFetcher<'a, O> {
    /// Form parameters for one page
    pub fn build_request(&self, request: &ListRequest) -> QueryRequest {
        let mut query = QueryRequest::new(O::ACTION);
        self.operation.add_params(&mut query);
        query.filters(&request.filters);
        query.paging(request.cursor.as_deref(), request.page_size_hint);
        query
    }
}

#[async_trait]
impl<'a, O: DescribeOperation> PageFetcher for DescribeFetcher<'a, O> {
    type Item = O::Item;

    async fn fetch_page(&self, request: &ListRequest) -> Result<ListResponse<O::Item>> {
        let query = self.build_request(request);
        let response = self.client.call::<O::Output>(&query).await?;
        Ok(O::into_page(response.result))
    }
}
