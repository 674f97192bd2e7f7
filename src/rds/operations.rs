//! RDS operations
//!
//! Each operation is an input struct that knows its action name, how to
//! encode itself as form parameters, and what its `<{Action}Result>`
//! element decodes to. Input structs serialize with RDS parameter names so
//! the bound parameters can be projected in output.

use super::params::{require, require_any, QueryRequest};
use super::types::{DbCluster, DbClusterSnapshot, DbInstance, DbProxy, DbSnapshot, UserAuthConfig};
use crate::decode::element_list;
use crate::error::{Error, Result};
use crate::pagination::ListResponse;
use crate::types::Tag;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A paginated `Describe*` action
pub trait DescribeOperation: Serialize + Send + Sync {
    /// Query API action name
    const ACTION: &'static str;
    /// Result member holding the page's records
    const ITEMS_KEY: &'static str;

    /// Record type
    type Item: Serialize + Send;
    /// Decoded `<{Action}Result>` element
    type Output: DeserializeOwned + Send;

    /// Encode operation-specific parameters
    fn add_params(&self, request: &mut QueryRequest);

    /// Split a decoded result into records and the next marker
    fn into_page(output: Self::Output) -> ListResponse<Self::Item>;
}

/// A single-call action
pub trait Operation: Serialize + Send + Sync {
    /// Query API action name
    const ACTION: &'static str;
    /// Result member holding the returned record
    const RESULT_KEY: &'static str;

    /// Decoded `<{Action}Result>` element
    type Output: DeserializeOwned + Serialize + Send;

    /// Reject input the service would refuse
    fn validate(&self) -> Result<()>;

    /// Encode parameters
    fn add_params(&self, request: &mut QueryRequest);
}

// ============================================================================
// DescribeDBInstances
// ============================================================================

/// `DescribeDBInstances` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescribeDbInstances {
    #[serde(rename = "DBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_instance_identifier: Option<String>,
}

element_list!(fn db_instances, "DBInstance", DbInstance);

/// `DescribeDBInstancesResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeDbInstancesOutput {
    #[serde(rename = "DBInstances", deserialize_with = "db_instances")]
    pub db_instances: Vec<DbInstance>,
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

impl DescribeOperation for DescribeDbInstances {
    const ACTION: &'static str = "DescribeDBInstances";
    const ITEMS_KEY: &'static str = "DBInstances";

    type Item = DbInstance;
    type Output = DescribeDbInstancesOutput;

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt("DBInstanceIdentifier", self.db_instance_identifier.as_ref());
    }

    fn into_page(output: Self::Output) -> ListResponse<DbInstance> {
        ListResponse::new(output.db_instances, output.marker)
    }
}

// ============================================================================
// DescribeDBClusters
// ============================================================================

/// `DescribeDBClusters` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescribeDbClusters {
    #[serde(rename = "DBClusterIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_cluster_identifier: Option<String>,
    #[serde(rename = "IncludeShared", skip_serializing_if = "Option::is_none")]
    pub include_shared: Option<bool>,
}

element_list!(fn db_clusters, "DBCluster", DbCluster);

/// `DescribeDBClustersResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeDbClustersOutput {
    #[serde(rename = "DBClusters", deserialize_with = "db_clusters")]
    pub db_clusters: Vec<DbCluster>,
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

impl DescribeOperation for DescribeDbClusters {
    const ACTION: &'static str = "DescribeDBClusters";
    const ITEMS_KEY: &'static str = "DBClusters";

    type Item = DbCluster;
    type Output = DescribeDbClustersOutput;

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt("DBClusterIdentifier", self.db_cluster_identifier.as_ref());
        request.set_opt("IncludeShared", self.include_shared);
    }

    fn into_page(output: Self::Output) -> ListResponse<DbCluster> {
        ListResponse::new(output.db_clusters, output.marker)
    }
}

// ============================================================================
// DescribeDBSnapshots
// ============================================================================

/// `DescribeDBSnapshots` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbSnapshots {
    #[serde(rename = "DBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_instance_identifier: Option<String>,
    #[serde(rename = "DBSnapshotIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_snapshot_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_public: Option<bool>,
}

element_list!(fn db_snapshots, "DBSnapshot", DbSnapshot);

/// `DescribeDBSnapshotsResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeDbSnapshotsOutput {
    #[serde(rename = "DBSnapshots", deserialize_with = "db_snapshots")]
    pub db_snapshots: Vec<DbSnapshot>,
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

impl DescribeOperation for DescribeDbSnapshots {
    const ACTION: &'static str = "DescribeDBSnapshots";
    const ITEMS_KEY: &'static str = "DBSnapshots";

    type Item = DbSnapshot;
    type Output = DescribeDbSnapshotsOutput;

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt("DBInstanceIdentifier", self.db_instance_identifier.as_ref());
        request.set_opt("DBSnapshotIdentifier", self.db_snapshot_identifier.as_ref());
        request.set_opt("SnapshotType", self.snapshot_type.as_ref());
        request.set_opt("IncludeShared", self.include_shared);
        request.set_opt("IncludePublic", self.include_public);
    }

    fn into_page(output: Self::Output) -> ListResponse<DbSnapshot> {
        ListResponse::new(output.db_snapshots, output.marker)
    }
}

// ============================================================================
// DescribeDBClusterSnapshots
// ============================================================================

/// `DescribeDBClusterSnapshots` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbClusterSnapshots {
    #[serde(rename = "DBClusterIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_cluster_identifier: Option<String>,
    #[serde(rename = "DBClusterSnapshotIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_cluster_snapshot_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_shared: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_public: Option<bool>,
}

element_list!(fn db_cluster_snapshots, "DBClusterSnapshot", DbClusterSnapshot);

/// `DescribeDBClusterSnapshotsResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeDbClusterSnapshotsOutput {
    #[serde(rename = "DBClusterSnapshots", deserialize_with = "db_cluster_snapshots")]
    pub db_cluster_snapshots: Vec<DbClusterSnapshot>,
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

impl DescribeOperation for DescribeDbClusterSnapshots {
    const ACTION: &'static str = "DescribeDBClusterSnapshots";
    const ITEMS_KEY: &'static str = "DBClusterSnapshots";

    type Item = DbClusterSnapshot;
    type Output = DescribeDbClusterSnapshotsOutput;

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt("DBClusterIdentifier", self.db_cluster_identifier.as_ref());
        request.set_opt(
            "DBClusterSnapshotIdentifier",
            self.db_cluster_snapshot_identifier.as_ref(),
        );
        request.set_opt("SnapshotType", self.snapshot_type.as_ref());
        request.set_opt("IncludeShared", self.include_shared);
        request.set_opt("IncludePublic", self.include_public);
    }

    fn into_page(output: Self::Output) -> ListResponse<DbClusterSnapshot> {
        ListResponse::new(output.db_cluster_snapshots, output.marker)
    }
}

// ============================================================================
// DescribeDBProxies
// ============================================================================

/// `DescribeDBProxies` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DescribeDbProxies {
    #[serde(rename = "DBProxyName", skip_serializing_if = "Option::is_none")]
    pub db_proxy_name: Option<String>,
}

element_list!(fn db_proxies, "member", DbProxy);

/// `DescribeDBProxiesResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DescribeDbProxiesOutput {
    #[serde(rename = "DBProxies", deserialize_with = "db_proxies")]
    pub db_proxies: Vec<DbProxy>,
    #[serde(rename = "Marker")]
    pub marker: Option<String>,
}

impl DescribeOperation for DescribeDbProxies {
    const ACTION: &'static str = "DescribeDBProxies";
    const ITEMS_KEY: &'static str = "DBProxies";

    type Item = DbProxy;
    type Output = DescribeDbProxiesOutput;

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt("DBProxyName", self.db_proxy_name.as_ref());
    }

    fn into_page(output: Self::Output) -> ListResponse<DbProxy> {
        ListResponse::new(output.db_proxies, output.marker)
    }
}

// ============================================================================
// CopyDBClusterSnapshot
// ============================================================================

/// `CopyDBClusterSnapshot` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyDbClusterSnapshot {
    #[serde(rename = "SourceDBClusterSnapshotIdentifier")]
    pub source_db_cluster_snapshot_identifier: String,
    #[serde(rename = "TargetDBClusterSnapshotIdentifier")]
    pub target_db_cluster_snapshot_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kms_key_id: Option<String>,
    #[serde(rename = "PreSignedUrl", skip_serializing_if = "Option::is_none")]
    pub pre_signed_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `CopyDBClusterSnapshotResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyDbClusterSnapshotOutput {
    #[serde(rename = "DBClusterSnapshot")]
    pub db_cluster_snapshot: Option<DbClusterSnapshot>,
}

impl Operation for CopyDbClusterSnapshot {
    const ACTION: &'static str = "CopyDBClusterSnapshot";
    const RESULT_KEY: &'static str = "DBClusterSnapshot";

    type Output = CopyDbClusterSnapshotOutput;

    fn validate(&self) -> Result<()> {
        require(
            "SourceDBClusterSnapshotIdentifier",
            &self.source_db_cluster_snapshot_identifier,
        )?;
        require(
            "TargetDBClusterSnapshotIdentifier",
            &self.target_db_cluster_snapshot_identifier,
        )
    }

    fn add_params(&self, request: &mut QueryRequest) {
        request.set(
            "SourceDBClusterSnapshotIdentifier",
            &self.source_db_cluster_snapshot_identifier,
        );
        request.set(
            "TargetDBClusterSnapshotIdentifier",
            &self.target_db_cluster_snapshot_identifier,
        );
        request.set_opt("KmsKeyId", self.kms_key_id.as_ref());
        request.set_opt("PreSignedUrl", self.pre_signed_url.as_ref());
        request.set_opt("CopyTags", self.copy_tags);
        request.tags(&self.tags);
    }
}

// ============================================================================
// CreateDBProxy
// ============================================================================

/// Engine families a proxy can front
const ENGINE_FAMILIES: &[&str] = &["MYSQL", "POSTGRESQL", "SQLSERVER"];

/// `CreateDBProxy` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateDbProxy {
    #[serde(rename = "DBProxyName")]
    pub db_proxy_name: String,
    pub engine_family: String,
    pub auth: Vec<UserAuthConfig>,
    pub role_arn: String,
    pub vpc_subnet_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vpc_security_group_ids: Vec<String>,
    #[serde(rename = "RequireTLS", skip_serializing_if = "Option::is_none")]
    pub require_tls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_client_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_logging: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `CreateDBProxyResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateDbProxyOutput {
    #[serde(rename = "DBProxy")]
    pub db_proxy: Option<DbProxy>,
}

impl Operation for CreateDbProxy {
    const ACTION: &'static str = "CreateDBProxy";
    const RESULT_KEY: &'static str = "DBProxy";

    type Output = CreateDbProxyOutput;

    fn validate(&self) -> Result<()> {
        require("DBProxyName", &self.db_proxy_name)?;
        require("RoleArn", &self.role_arn)?;
        require_any("Auth", &self.auth)?;
        require_any("VpcSubnetIds", &self.vpc_subnet_ids)?;
        if !ENGINE_FAMILIES.contains(&self.engine_family.as_str()) {
            return Err(Error::invalid_parameter(
                "EngineFamily",
                format!(
                    "'{}' is not one of {}",
                    self.engine_family,
                    ENGINE_FAMILIES.join(", ")
                ),
            ));
        }
        Ok(())
    }

    fn add_params(&self, request: &mut QueryRequest) {
        request.set("DBProxyName", &self.db_proxy_name);
        request.set("EngineFamily", &self.engine_family);
        request.set("RoleArn", &self.role_arn);
        for (i, auth) in self.auth.iter().enumerate() {
            let prefix = format!("Auth.member.{}", i + 1);
            request.set_opt(&format!("{prefix}.Description"), auth.description.as_ref());
            request.set_opt(&format!("{prefix}.UserName"), auth.user_name.as_ref());
            request.set_opt(&format!("{prefix}.AuthScheme"), auth.auth_scheme.as_ref());
            request.set_opt(&format!("{prefix}.SecretArn"), auth.secret_arn.as_ref());
            request.set_opt(&format!("{prefix}.IAMAuth"), auth.iam_auth.as_ref());
            request.set_opt(
                &format!("{prefix}.ClientPasswordAuthType"),
                auth.client_password_auth_type.as_ref(),
            );
        }
        request.members("VpcSubnetIds", &self.vpc_subnet_ids);
        request.members("VpcSecurityGroupIds", &self.vpc_security_group_ids);
        request.set_opt("RequireTLS", self.require_tls);
        request.set_opt("IdleClientTimeout", self.idle_client_timeout);
        request.set_opt("DebugLogging", self.debug_logging);
        request.tags(&self.tags);
    }
}

// ============================================================================
// RestoreDBInstanceToPointInTime
// ============================================================================

/// `RestoreDBInstanceToPointInTime` input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RestoreDbInstanceToPointInTime {
    #[serde(rename = "SourceDBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    pub source_db_instance_identifier: Option<String>,
    #[serde(rename = "SourceDbiResourceId", skip_serializing_if = "Option::is_none")]
    pub source_dbi_resource_id: Option<String>,
    #[serde(
        rename = "SourceDBInstanceAutomatedBackupsArn",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_db_instance_automated_backups_arn: Option<String>,
    #[serde(rename = "TargetDBInstanceIdentifier")]
    pub target_db_instance_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restore_time: Option<DateTime<Utc>>,
    pub use_latest_restorable_time: bool,
    #[serde(rename = "DBInstanceClass", skip_serializing_if = "Option::is_none")]
    pub db_instance_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(rename = "DBSubnetGroupName", skip_serializing_if = "Option::is_none")]
    pub db_subnet_group_name: Option<String>,
    #[serde(rename = "MultiAZ", skip_serializing_if = "Option::is_none")]
    pub multi_az: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publicly_accessible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,
    #[serde(rename = "DBName", skip_serializing_if = "Option::is_none")]
    pub db_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vpc_security_group_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_tags_to_snapshot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_protection: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

/// `RestoreDBInstanceToPointInTimeResult` element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreDbInstanceToPointInTimeOutput {
    #[serde(rename = "DBInstance")]
    pub db_instance: Option<DbInstance>,
}

impl Operation for RestoreDbInstanceToPointInTime {
    const ACTION: &'static str = "RestoreDBInstanceToPointInTime";
    const RESULT_KEY: &'static str = "DBInstance";

    type Output = RestoreDbInstanceToPointInTimeOutput;

    fn validate(&self) -> Result<()> {
        require("TargetDBInstanceIdentifier", &self.target_db_instance_identifier)?;

        let sources = [
            &self.source_db_instance_identifier,
            &self.source_dbi_resource_id,
            &self.source_db_instance_automated_backups_arn,
        ];
        if !sources
            .iter()
            .any(|s| s.as_deref().is_some_and(|s| !s.trim().is_empty()))
        {
            return Err(Error::invalid_parameter(
                "SourceDBInstanceIdentifier",
                "one of SourceDBInstanceIdentifier, SourceDbiResourceId or \
                 SourceDBInstanceAutomatedBackupsArn is required",
            ));
        }

        match (self.restore_time.is_some(), self.use_latest_restorable_time) {
            (true, true) => Err(Error::invalid_parameter(
                "RestoreTime",
                "cannot be combined with UseLatestRestorableTime",
            )),
            (false, false) => Err(Error::invalid_parameter(
                "RestoreTime",
                "either RestoreTime or UseLatestRestorableTime is required",
            )),
            _ => Ok(()),
        }
    }

    fn add_params(&self, request: &mut QueryRequest) {
        request.set_opt(
            "SourceDBInstanceIdentifier",
            self.source_db_instance_identifier.as_ref(),
        );
        request.set_opt("SourceDbiResourceId", self.source_dbi_resource_id.as_ref());
        request.set_opt(
            "SourceDBInstanceAutomatedBackupsArn",
            self.source_db_instance_automated_backups_arn.as_ref(),
        );
        request.set("TargetDBInstanceIdentifier", &self.target_db_instance_identifier);
        request.set_opt(
            "RestoreTime",
            self.restore_time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
        if self.use_latest_restorable_time {
            request.set("UseLatestRestorableTime", true);
        }
        request.set_opt("DBInstanceClass", self.db_instance_class.as_ref());
        request.set_opt("Port", self.port);
        request.set_opt("AvailabilityZone", self.availability_zone.as_ref());
        request.set_opt("DBSubnetGroupName", self.db_subnet_group_name.as_ref());
        request.set_opt("MultiAZ", self.multi_az);
        request.set_opt("PubliclyAccessible", self.publicly_accessible);
        request.set_opt("Engine", self.engine.as_ref());
        request.set_opt("DBName", self.db_name.as_ref());
        request.set_opt("StorageType", self.storage_type.as_ref());
        request.elements(
            "VpcSecurityGroupIds",
            "VpcSecurityGroupId",
            &self.vpc_security_group_ids,
        );
        request.set_opt("CopyTagsToSnapshot", self.copy_tags_to_snapshot);
        request.set_opt("DeletionProtection", self.deletion_protection);
        request.tags(&self.tags);
    }
}
