//! Amazon RDS operations
//!
//! # Overview
//!
//! RDS speaks the AWS Query protocol: every call is a signed form POST
//! carrying `Action` and `Version`, answered by an XML envelope. Listing
//! actions (`Describe*`) page with `Marker` / `MaxRecords` and are driven by
//! the [`PaginatedListExecutor`](crate::pagination::PaginatedListExecutor)
//! through a [`DescribeFetcher`]; the remaining actions are single calls.
//!
//! `MaxRecords` must lie in `20..=100`, which is also the default
//! [`PageSizeBounds`](crate::pagination::PageSizeBounds) of a client built
//! from configuration.

mod client;
mod operations;
mod params;
mod types;

pub use client::{DescribeFetcher, RdsClient};
pub use operations::{
    CopyDbClusterSnapshot, CopyDbClusterSnapshotOutput, CreateDbProxy, CreateDbProxyOutput,
    DescribeDbClusterSnapshots, DescribeDbClusterSnapshotsOutput, DescribeDbClusters,
    DescribeDbClustersOutput, DescribeDbInstances, DescribeDbInstancesOutput, DescribeDbProxies,
    DescribeDbProxiesOutput, DescribeDbSnapshots, DescribeDbSnapshotsOutput, DescribeOperation,
    Operation, RestoreDbInstanceToPointInTime, RestoreDbInstanceToPointInTimeOutput,
};
pub use params::{parse_auth, parse_filter, parse_tag, require, require_any, QueryRequest};
pub use types::{
    DbCluster, DbClusterMember, DbClusterSnapshot, DbInstance, DbProxy, DbSnapshot, Endpoint,
    UserAuthConfig, VpcSecurityGroupMembership,
};

/// Query API version
pub const API_VERSION: &str = "2014-10-31";

/// SigV4 service name
pub const SERVICE: &str = "rds";

/// Smallest `MaxRecords` RDS accepts
pub const MIN_PAGE_SIZE: u32 = 20;

/// Largest `MaxRecords` RDS accepts, and its default page size
pub const MAX_PAGE_SIZE: u32 = 100;
