//! CLI runner - executes commands

use crate::cli::commands::{Cli, Invocation, PagingArgs};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::output::{page_document, OutputSelector, OutputWriter};
use crate::pagination::PaginatedListExecutor;
use crate::rds::{DescribeOperation, Operation, RdsClient};
use crate::types::JsonValue;
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
    cancel: CancellationToken,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self {
            cli,
            cancel: CancellationToken::new(),
        }
    }

    /// Abandon work once `token` is cancelled
    ///
    /// Listings stop before their next page; single calls are not sent, or
    /// stop waiting on a request already in flight.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Resolve configuration from the file, environment and flags
    pub fn load_config(&self) -> Result<ClientConfig> {
        ClientConfig::load(
            self.cli.config.as_deref(),
            self.cli.region.clone(),
            self.cli.endpoint_url.clone(),
        )
    }

    /// Run the CLI command, writing results to stdout
    pub async fn run(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut writer = OutputWriter::new(stdout, self.cli.format);
        self.run_with(&mut writer).await
    }

    /// Run the CLI command, writing results to `writer`
    pub async fn run_with<W: Write>(&self, writer: &mut OutputWriter<W>) -> Result<()> {
        let invocation = self.cli.command.invocation()?;
        let config = self.load_config()?;
        let client = RdsClient::from_config(&config)?;

        match &invocation {
            Invocation::DescribeDbInstances(op, paging) => {
                self.describe(&client, op, paging, writer).await
            }
            Invocation::DescribeDbClusters(op, paging) => {
                self.describe(&client, op, paging, writer).await
            }
            Invocation::DescribeDbSnapshots(op, paging) => {
                self.describe(&client, op, paging, writer).await
            }
            Invocation::DescribeDbClusterSnapshots(op, paging) => {
                self.describe(&client, op, paging, writer).await
            }
            Invocation::DescribeDbProxies(op, paging) => {
                self.describe(&client, op, paging, writer).await
            }
            Invocation::CopyDbClusterSnapshot(op) => self.execute(&client, op, writer).await,
            Invocation::CreateDbProxy(op) => self.execute(&client, op, writer).await,
            Invocation::RestoreDbInstanceToPointInTime(op) => {
                self.execute(&client, op, writer).await
            }
        }
    }

    /// Run a describe operation page by page, writing each page as it arrives
    async fn describe<O, W>(
        &self,
        client: &RdsClient,
        operation: &O,
        paging: &PagingArgs,
        writer: &mut OutputWriter<W>,
    ) -> Result<()>
    where
        O: DescribeOperation,
        W: Write,
    {
        let selector = OutputSelector::parse(self.cli.select.as_deref(), O::ITEMS_KEY)?;
        let params = bound_params(operation, paging)?;
        let options = paging.page_options();

        // Stop fetching once output fails
        let cancel = self.cancel.child_token();
        let executor = PaginatedListExecutor::new()
            .with_bounds(client.bounds())
            .with_filters(paging.filters()?)
            .with_cancellation(cancel.clone());

        let mut write_error: Option<Error> = None;
        let outcome = executor
            .run(&options, &client.describe(operation), |page| {
                if write_error.is_some() || selector.is_parameter() {
                    return;
                }
                let written = page_document(O::ITEMS_KEY, &page.items, page.next_cursor.as_deref())
                    .and_then(|doc| selector.select(&doc, &params))
                    .and_then(|values| writer.write_all(&values));
                if let Err(e) = written {
                    write_error = Some(e);
                    cancel.cancel();
                }
            })
            .await;

        if let Some(e) = write_error {
            return Err(e);
        }
        let summary = outcome?;
        info!(
            "{}: {} records in {} pages",
            O::ACTION,
            summary.items,
            summary.pages
        );

        if selector.is_parameter() {
            writer.write_all(&selector.select(&JsonValue::Null, &params)?)?;
        }
        writer.flush()?;

        if options.user_controls_paging() {
            if let Some(marker) = summary.next_cursor {
                eprintln!("next marker: {marker}");
            }
        }
        Ok(())
    }

    /// Run a single-call operation and write its selected result
    async fn execute<O, W>(
        &self,
        client: &RdsClient,
        operation: &O,
        writer: &mut OutputWriter<W>,
    ) -> Result<()>
    where
        O: Operation,
        W: Write,
    {
        let selector = OutputSelector::parse(self.cli.select.as_deref(), O::RESULT_KEY)?;
        let params = serde_json::to_value(operation)?;

        // Nothing is sent once cancelled; an interrupted call is abandoned
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        let output = tokio::select! {
            biased;
            () = self.cancel.cancelled() => return Err(Error::Cancelled),
            output = client.execute(operation) => output?,
        };
        debug!("{} succeeded", O::ACTION);

        let response = serde_json::to_value(&output)?;
        writer.write_all(&selector.select(&response, &params)?)?;
        writer.flush()
    }
}

/// Command parameters as sent, for `^Name` selection
fn bound_params<O: DescribeOperation>(operation: &O, paging: &PagingArgs) -> Result<JsonValue> {
    let mut params = serde_json::to_value(operation)?;
    if let JsonValue::Object(map) = &mut params {
        if let Some(marker) = &paging.marker {
            map.insert("Marker".to_string(), JsonValue::String(marker.clone()));
        }
        if let Some(max_records) = paging.max_records {
            map.insert("MaxRecords".to_string(), JsonValue::from(max_records));
        }
    }
    Ok(params)
}
