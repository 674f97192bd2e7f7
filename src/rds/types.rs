//! RDS resource records
//!
//! Field names follow the RDS API so decoded records serialize to the same
//! JSON shape other AWS tools print.

use crate::decode::element_list;
use crate::types::Tag;
use serde::{Deserialize, Serialize};

element_list!(fn tag_list, "Tag", Tag);
element_list!(fn vpc_security_groups, "VpcSecurityGroupMembership", VpcSecurityGroupMembership);
element_list!(fn cluster_members, "DBClusterMember", DbClusterMember);
element_list!(fn availability_zones, "AvailabilityZone", String);
element_list!(fn members, "member", String);
element_list!(fn auth_members, "member", UserAuthConfig);

// ============================================================================
// DB Instances
// ============================================================================

/// Network address of an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Endpoint {
    pub address: Option<String>,
    pub port: Option<i64>,
    pub hosted_zone_id: Option<String>,
}

/// VPC security group attached to an instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct VpcSecurityGroupMembership {
    pub vpc_security_group_id: Option<String>,
    pub status: Option<String>,
}

/// A DB instance
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbInstance {
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: String,
    #[serde(rename = "DBInstanceClass")]
    pub db_instance_class: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    #[serde(rename = "DBInstanceStatus")]
    pub db_instance_status: Option<String>,
    pub master_username: Option<String>,
    #[serde(rename = "DBName")]
    pub db_name: Option<String>,
    pub endpoint: Option<Endpoint>,
    pub allocated_storage: Option<i64>,
    pub instance_create_time: Option<String>,
    pub availability_zone: Option<String>,
    #[serde(rename = "MultiAZ")]
    pub multi_az: Option<bool>,
    pub storage_type: Option<String>,
    pub storage_encrypted: Option<bool>,
    pub publicly_accessible: Option<bool>,
    #[serde(rename = "DBClusterIdentifier")]
    pub db_cluster_identifier: Option<String>,
    #[serde(rename = "DBInstanceArn")]
    pub db_instance_arn: Option<String>,
    pub dbi_resource_id: Option<String>,
    #[serde(deserialize_with = "vpc_security_groups")]
    pub vpc_security_groups: Vec<VpcSecurityGroupMembership>,
    #[serde(deserialize_with = "tag_list")]
    pub tag_list: Vec<Tag>,
}

// ============================================================================
// DB Clusters
// ============================================================================

/// Instance membership in a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbClusterMember {
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: String,
    pub is_cluster_writer: bool,
    #[serde(rename = "DBClusterParameterGroupStatus")]
    pub db_cluster_parameter_group_status: Option<String>,
    pub promotion_tier: Option<i64>,
}

/// An Aurora or Multi-AZ DB cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbCluster {
    #[serde(rename = "DBClusterIdentifier")]
    pub db_cluster_identifier: String,
    #[serde(rename = "DBClusterArn")]
    pub db_cluster_arn: Option<String>,
    pub status: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub endpoint: Option<String>,
    pub reader_endpoint: Option<String>,
    pub port: Option<i64>,
    pub master_username: Option<String>,
    pub database_name: Option<String>,
    #[serde(rename = "MultiAZ")]
    pub multi_az: Option<bool>,
    pub storage_encrypted: Option<bool>,
    pub allocated_storage: Option<i64>,
    pub cluster_create_time: Option<String>,
    #[serde(rename = "DBClusterMembers", deserialize_with = "cluster_members")]
    pub db_cluster_members: Vec<DbClusterMember>,
    #[serde(deserialize_with = "availability_zones")]
    pub availability_zones: Vec<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tag_list: Vec<Tag>,
}

// ============================================================================
// Snapshots
// ============================================================================

/// A DB instance snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbSnapshot {
    #[serde(rename = "DBSnapshotIdentifier")]
    pub db_snapshot_identifier: String,
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: Option<String>,
    pub snapshot_create_time: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub allocated_storage: Option<i64>,
    pub status: Option<String>,
    pub port: Option<i64>,
    pub availability_zone: Option<String>,
    pub vpc_id: Option<String>,
    pub instance_create_time: Option<String>,
    pub master_username: Option<String>,
    pub snapshot_type: Option<String>,
    pub storage_type: Option<String>,
    pub encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
    #[serde(rename = "DBSnapshotArn")]
    pub db_snapshot_arn: Option<String>,
    pub percent_progress: Option<i64>,
    pub source_region: Option<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tag_list: Vec<Tag>,
}

/// A DB cluster snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbClusterSnapshot {
    #[serde(rename = "DBClusterSnapshotIdentifier")]
    pub db_cluster_snapshot_identifier: String,
    #[serde(rename = "DBClusterIdentifier")]
    pub db_cluster_identifier: Option<String>,
    pub snapshot_create_time: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub allocated_storage: Option<i64>,
    pub status: Option<String>,
    pub port: Option<i64>,
    pub vpc_id: Option<String>,
    pub cluster_create_time: Option<String>,
    pub master_username: Option<String>,
    pub snapshot_type: Option<String>,
    pub percent_progress: Option<i64>,
    pub storage_encrypted: Option<bool>,
    pub kms_key_id: Option<String>,
    #[serde(rename = "DBClusterSnapshotArn")]
    pub db_cluster_snapshot_arn: Option<String>,
    #[serde(rename = "SourceDBClusterSnapshotArn")]
    pub source_db_cluster_snapshot_arn: Option<String>,
    #[serde(deserialize_with = "availability_zones")]
    pub availability_zones: Vec<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tag_list: Vec<Tag>,
}

// ============================================================================
// DB Proxies
// ============================================================================

/// How a proxy authenticates to the database
///
/// Used both as `CreateDBProxy` input and in decoded proxies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserAuthConfig {
    pub description: Option<String>,
    pub user_name: Option<String>,
    pub auth_scheme: Option<String>,
    pub secret_arn: Option<String>,
    #[serde(rename = "IAMAuth")]
    pub iam_auth: Option<String>,
    pub client_password_auth_type: Option<String>,
}

/// A DB proxy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct DbProxy {
    #[serde(rename = "DBProxyName")]
    pub db_proxy_name: String,
    #[serde(rename = "DBProxyArn")]
    pub db_proxy_arn: Option<String>,
    pub status: Option<String>,
    pub engine_family: Option<String>,
    pub vpc_id: Option<String>,
    #[serde(deserialize_with = "members")]
    pub vpc_security_group_ids: Vec<String>,
    #[serde(deserialize_with = "members")]
    pub vpc_subnet_ids: Vec<String>,
    #[serde(deserialize_with = "auth_members")]
    pub auth: Vec<UserAuthConfig>,
    pub role_arn: Option<String>,
    pub endpoint: Option<String>,
    #[serde(rename = "RequireTLS")]
    pub require_tls: Option<bool>,
    pub idle_client_timeout: Option<i64>,
    pub debug_logging: Option<bool>,
    pub created_date: Option<String>,
    pub updated_date: Option<String>,
}
