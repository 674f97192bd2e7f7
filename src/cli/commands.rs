//! CLI commands and argument parsing

use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::pagination::{Filter, PageOptions};
use crate::rds::{
    parse_auth, parse_filter, parse_tag, CopyDbClusterSnapshot, CreateDbProxy,
    DescribeDbClusterSnapshots, DescribeDbClusters, DescribeDbInstances, DescribeDbProxies,
    DescribeDbSnapshots, RestoreDbInstanceToPointInTime,
};
use crate::types::Tag;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Amazon RDS command-line client
#[derive(Parser, Debug)]
#[command(name = "rdsctl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// AWS region
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Endpoint override
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Output selection: `*`, `^Param`, `$.jsonpath` or a dotted path
    #[arg(short, long, global = true)]
    pub select: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Paging controls shared by describe commands
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingArgs {
    /// Start from this marker and fetch a single page
    #[arg(long)]
    pub marker: Option<String>,

    /// Upper bound on records returned across pages
    #[arg(long, allow_negative_numbers = true)]
    pub max_records: Option<i64>,

    /// Fetch a single page
    #[arg(long)]
    pub no_auto_iteration: bool,

    /// Filter as name=value1,value2 (repeatable)
    #[arg(long = "filter", value_name = "NAME=VALUES")]
    pub filters: Vec<String>,
}

impl PagingArgs {
    /// Executor options for these flags
    pub fn page_options(&self) -> PageOptions {
        PageOptions {
            initial_cursor: self.marker.clone(),
            max_items: self.max_records,
            single_page_only: self.no_auto_iteration,
        }
    }

    /// Parsed `--filter` values
    pub fn filters(&self) -> Result<Vec<Filter>> {
        self.filters.iter().map(|f| parse_filter(f)).collect()
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List DB instances
    DescribeDbInstances {
        #[arg(long)]
        db_instance_identifier: Option<String>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List DB clusters
    DescribeDbClusters {
        #[arg(long)]
        db_cluster_identifier: Option<String>,

        #[arg(long)]
        include_shared: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List DB snapshots
    DescribeDbSnapshots {
        #[arg(long)]
        db_instance_identifier: Option<String>,

        #[arg(long)]
        db_snapshot_identifier: Option<String>,

        /// automated, manual, shared, public or awsbackup
        #[arg(long)]
        snapshot_type: Option<String>,

        #[arg(long)]
        include_shared: bool,

        #[arg(long)]
        include_public: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List DB cluster snapshots
    DescribeDbClusterSnapshots {
        #[arg(long)]
        db_cluster_identifier: Option<String>,

        #[arg(long)]
        db_cluster_snapshot_identifier: Option<String>,

        #[arg(long)]
        snapshot_type: Option<String>,

        #[arg(long)]
        include_shared: bool,

        #[arg(long)]
        include_public: bool,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// List DB proxies
    DescribeDbProxies {
        #[arg(long)]
        db_proxy_name: Option<String>,

        #[command(flatten)]
        paging: PagingArgs,
    },

    /// Copy a DB cluster snapshot
    CopyDbClusterSnapshot {
        #[arg(long)]
        source_db_cluster_snapshot_identifier: String,

        #[arg(long)]
        target_db_cluster_snapshot_identifier: String,

        #[arg(long)]
        kms_key_id: Option<String>,

        #[arg(long)]
        pre_signed_url: Option<String>,

        #[arg(long)]
        copy_tags: bool,

        /// Tag as key=value (repeatable)
        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
    },

    /// Create a DB proxy
    CreateDbProxy {
        #[arg(long)]
        db_proxy_name: String,

        /// MYSQL, POSTGRESQL or SQLSERVER
        #[arg(long)]
        engine_family: String,

        /// Auth entry as AuthScheme=SECRETS,SecretArn=...,IAMAuth=DISABLED (repeatable)
        #[arg(long = "auth", value_name = "KEY=VALUE,...")]
        auth: Vec<String>,

        #[arg(long)]
        role_arn: String,

        #[arg(long = "vpc-subnet-id", value_delimiter = ',')]
        vpc_subnet_ids: Vec<String>,

        #[arg(long = "vpc-security-group-id", value_delimiter = ',')]
        vpc_security_group_ids: Vec<String>,

        #[arg(long)]
        require_tls: bool,

        /// Seconds a client connection may idle
        #[arg(long)]
        idle_client_timeout: Option<i64>,

        #[arg(long)]
        debug_logging: bool,

        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
    },

    /// Restore a DB instance to a point in time
    RestoreDbInstanceToPointInTime {
        #[arg(long)]
        source_db_instance_identifier: Option<String>,

        #[arg(long)]
        source_dbi_resource_id: Option<String>,

        #[arg(long)]
        source_db_instance_automated_backups_arn: Option<String>,

        #[arg(long)]
        target_db_instance_identifier: String,

        /// RFC 3339 timestamp, e.g. 2024-01-02T03:04:05Z
        #[arg(long)]
        restore_time: Option<DateTime<Utc>>,

        #[arg(long)]
        use_latest_restorable_time: bool,

        #[arg(long)]
        db_instance_class: Option<String>,

        #[arg(long)]
        port: Option<i64>,

        #[arg(long)]
        availability_zone: Option<String>,

        #[arg(long)]
        db_subnet_group_name: Option<String>,

        #[arg(long)]
        multi_az: bool,

        #[arg(long)]
        publicly_accessible: Option<bool>,

        #[arg(long)]
        engine: Option<String>,

        #[arg(long)]
        db_name: Option<String>,

        #[arg(long)]
        storage_type: Option<String>,

        #[arg(long = "vpc-security-group-id", value_delimiter = ',')]
        vpc_security_group_ids: Vec<String>,

        #[arg(long)]
        copy_tags_to_snapshot: bool,

        #[arg(long)]
        deletion_protection: bool,

        #[arg(long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,
    },
}

/// A parsed command ready to run
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    DescribeDbInstances(DescribeDbInstances, PagingArgs),
    DescribeDbClusters(DescribeDbClusters, PagingArgs),
    DescribeDbSnapshots(DescribeDbSnapshots, PagingArgs),
    DescribeDbClusterSnapshots(DescribeDbClusterSnapshots, PagingArgs),
    DescribeDbProxies(DescribeDbProxies, PagingArgs),
    CopyDbClusterSnapshot(CopyDbClusterSnapshot),
    CreateDbProxy(CreateDbProxy),
    RestoreDbInstanceToPointInTime(RestoreDbInstanceToPointInTime),
}

/// `Some(true)` for a set flag, otherwise leave the parameter out
fn flag(set: bool) -> Option<bool> {
    set.then_some(true)
}

fn parse_tags(raw: &[String]) -> Result<Vec<Tag>> {
    raw.iter().map(|t| parse_tag(t)).collect()
}

impl Commands {
    /// Build the operation input for this command
    pub fn invocation(&self) -> Result<Invocation> {
        let invocation = match self {
            Self::DescribeDbInstances {
                db_instance_identifier,
                paging,
            } => Invocation::DescribeDbInstances(
                DescribeDbInstances {
                    db_instance_identifier: db_instance_identifier.clone(),
                },
                paging.clone(),
            ),
            Self::DescribeDbClusters {
                db_cluster_identifier,
                include_shared,
                paging,
            } => Invocation::DescribeDbClusters(
                DescribeDbClusters {
                    db_cluster_identifier: db_cluster_identifier.clone(),
                    include_shared: flag(*include_shared),
                },
                paging.clone(),
            ),
            Self::DescribeDbSnapshots {
                db_instance_identifier,
                db_snapshot_identifier,
                snapshot_type,
                include_shared,
                include_public,
                paging,
            } => Invocation::DescribeDbSnapshots(
                DescribeDbSnapshots {
                    db_instance_identifier: db_instance_identifier.clone(),
                    db_snapshot_identifier: db_snapshot_identifier.clone(),
                    snapshot_type: snapshot_type.clone(),
                    include_shared: flag(*include_shared),
                    include_public: flag(*include_public),
                },
                paging.clone(),
            ),
            Self::DescribeDbClusterSnapshots {
                db_cluster_identifier,
                db_cluster_snapshot_identifier,
                snapshot_type,
                include_shared,
                include_public,
                paging,
            } => Invocation::DescribeDbClusterSnapshots(
                DescribeDbClusterSnapshots {
                    db_cluster_identifier: db_cluster_identifier.clone(),
                    db_cluster_snapshot_identifier: db_cluster_snapshot_identifier.clone(),
                    snapshot_type: snapshot_type.clone(),
                    include_shared: flag(*include_shared),
                    include_public: flag(*include_public),
                },
                paging.clone(),
            ),
            Self::DescribeDbProxies {
                db_proxy_name,
                paging,
            } => Invocation::DescribeDbProxies(
                DescribeDbProxies {
                    db_proxy_name: db_proxy_name.clone(),
                },
                paging.clone(),
            ),
            Self::CopyDbClusterSnapshot {
                source_db_cluster_snapshot_identifier,
                target_db_cluster_snapshot_identifier,
                kms_key_id,
                pre_signed_url,
                copy_tags,
                tags,
            } => Invocation::CopyDbClusterSnapshot(CopyDbClusterSnapshot {
                source_db_cluster_snapshot_identifier: source_db_cluster_snapshot_identifier
                    .clone(),
                target_db_cluster_snapshot_identifier: target_db_cluster_snapshot_identifier
                    .clone(),
                kms_key_id: kms_key_id.clone(),
                pre_signed_url: pre_signed_url.clone(),
                copy_tags: flag(*copy_tags),
                tags: parse_tags(tags)?,
            }),
            Self::CreateDbProxy {
                db_proxy_name,
                engine_family,
                auth,
                role_arn,
                vpc_subnet_ids,
                vpc_security_group_ids,
                require_tls,
                idle_client_timeout,
                debug_logging,
                tags,
            } => Invocation::CreateDbProxy(CreateDbProxy {
                db_proxy_name: db_proxy_name.clone(),
                engine_family: engine_family.to_uppercase(),
                auth: auth
                    .iter()
                    .map(|a| parse_auth(a))
                    .collect::<Result<Vec<_>>>()?,
                role_arn: role_arn.clone(),
                vpc_subnet_ids: vpc_subnet_ids.clone(),
                vpc_security_group_ids: vpc_security_group_ids.clone(),
                require_tls: flag(*require_tls),
                idle_client_timeout: *idle_client_timeout,
                debug_logging: flag(*debug_logging),
                tags: parse_tags(tags)?,
            }),
            Self::RestoreDbInstanceToPointInTime {
                source_db_instance_identifier,
                source_dbi_resource_id,
                source_db_instance_automated_backups_arn,
                target_db_instance_identifier,
                restore_time,
                use_latest_restorable_time,
                db_instance_class,
                port,
                availability_zone,
                db_subnet_group_name,
                multi_az,
                publicly_accessible,
                engine,
                db_name,
                storage_type,
                vpc_security_group_ids,
                copy_tags_to_snapshot,
                deletion_protection,
                tags,
            } => {
                if port.is_some_and(|p| !(1..=65535).contains(&p)) {
                    return Err(Error::invalid_parameter("Port", "must be between 1 and 65535"));
                }
                Invocation::RestoreDbInstanceToPointInTime(RestoreDbInstanceToPointInTime {
                    source_db_instance_identifier: source_db_instance_identifier.clone(),
                    source_dbi_resource_id: source_dbi_resource_id.clone(),
                    source_db_instance_automated_backups_arn:
                        source_db_instance_automated_backups_arn.clone(),
                    target_db_instance_identifier: target_db_instance_identifier.clone(),
                    restore_time: *restore_time,
                    use_latest_restorable_time: *use_latest_restorable_time,
                    db_instance_class: db_instance_class.clone(),
                    port: *port,
                    availability_zone: availability_zone.clone(),
                    db_subnet_group_name: db_subnet_group_name.clone(),
                    multi_az: flag(*multi_az),
                    publicly_accessible: *publicly_accessible,
                    engine: engine.clone(),
                    db_name: db_name.clone(),
                    storage_type: storage_type.clone(),
                    vpc_security_group_ids: vpc_security_group_ids.clone(),
                    copy_tags_to_snapshot: flag(*copy_tags_to_snapshot),
                    deletion_protection: flag(*deletion_protection),
                    tags: parse_tags(tags)?,
                })
            }
        };
        Ok(invocation)
    }
}
