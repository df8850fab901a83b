/// CloudWatch query constants and the supported EC2 metric catalog

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Dimension name used to narrow every query to one EC2 instance
pub const DIMENSION_NAME: &str = "InstanceId";

/// Default CloudWatch namespace for EC2 instance metrics
pub const DEFAULT_NAMESPACE: &str = "AWS/EC2";

/// Default AWS region (Seoul)
pub const DEFAULT_REGION: &str = "ap-northeast-2";

/// Day boundaries are computed in this offset from UTC (KST has no DST)
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Accepted range for `cloudwatch.utc_offset_hours`
pub const MIN_UTC_OFFSET_HOURS: i32 = -12;
pub const MAX_UTC_OFFSET_HOURS: i32 = 14;

/// bcrypt work factor bounds
pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

/// Statistic requested for every metric
pub const STATISTIC: &str = "Average";

/// Sampling period in seconds (5 minutes)
pub const PERIOD_SECONDS: i32 = 300;

/// Maximum number of data points requested per query
pub const MAX_DATAPOINTS: i32 = 100;

/// Length of the query window in hours
pub const WINDOW_HOURS: i64 = 24;

/// Email column width in `user_tb`
pub const EMAIL_MAX_LEN: usize = 30;

/// Width of name and description text columns
pub const TEXT_FIELD_MAX_LEN: usize = 256;

/// Supported EC2 metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "CPUUtilization")]
    CpuUtilization,
    #[serde(rename = "StatusCheckFailed_System")]
    StatusCheckFailedSystem,
    #[serde(rename = "StatusCheckFailed_Instance")]
    StatusCheckFailedInstance,
    NetworkIn,
    NetworkOut,
    NetworkPacketsIn,
    NetworkPacketsOut,
    DiskReadBytes,
    DiskReadOps,
    DiskWriteBytes,
    DiskWriteOps,
}

/// Catalog entry
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub metric: Metric,
    pub name: &'static str,
    pub query_id: &'static str,
    pub description: &'static str,
}

pub const METRICS: &[MetricDef] = &[
    MetricDef {
        metric: Metric::CpuUtilization,
        name: "CPUUtilization",
        query_id: "cpuUtilizationQuery",
        description: "Percentage of allocated compute units in use",
    },
    MetricDef {
        metric: Metric::StatusCheckFailedSystem,
        name: "StatusCheckFailed_System",
        query_id: "statusCheckFailedSystemQuery",
        description: "Failed system status checks",
    },
    MetricDef {
        metric: Metric::StatusCheckFailedInstance,
        name: "StatusCheckFailed_Instance",
        query_id: "statusCheckFailedInstanceQuery",
        description: "Failed instance status checks",
    },
    MetricDef {
        metric: Metric::NetworkIn,
        name: "NetworkIn",
        query_id: "networkInQuery",
        description: "Bytes received on all network interfaces",
    },
    MetricDef {
        metric: Metric::NetworkOut,
        name: "NetworkOut",
        query_id: "networkOutQuery",
        description: "Bytes sent on all network interfaces",
    },
    MetricDef {
        metric: Metric::NetworkPacketsIn,
        name: "NetworkPacketsIn",
        query_id: "networkPacketInQuery",
        description: "Packets received on all network interfaces",
    },
    MetricDef {
        metric: Metric::NetworkPacketsOut,
        name: "NetworkPacketsOut",
        query_id: "networkPacketOutQuery",
        description: "Packets sent on all network interfaces",
    },
    MetricDef {
        metric: Metric::DiskReadBytes,
        name: "DiskReadBytes",
        query_id: "diskReadQuery",
        description: "Bytes read from instance store volumes",
    },
    MetricDef {
        metric: Metric::DiskReadOps,
        name: "DiskReadOps",
        query_id: "diskReadOpsQuery",
        description: "Completed read operations on instance store volumes",
    },
    MetricDef {
        metric: Metric::DiskWriteBytes,
        name: "DiskWriteBytes",
        query_id: "diskWriteQuery",
        description: "Bytes written to instance store volumes",
    },
    MetricDef {
        metric: Metric::DiskWriteOps,
        name: "DiskWriteOps",
        query_id: "diskWriteOpsQuery",
        description: "Completed write operations on instance store volumes",
    },
];

impl Metric {
    /// Catalog entry for this metric
    pub fn def(&self) -> &'static MetricDef {
        // METRICS is kept in declaration order
        &METRICS[*self as usize]
    }

    /// CloudWatch metric name
    pub fn name(&self) -> &'static str {
        self.def().name
    }

    /// Stable query id used when the caller has no id of its own
    pub fn default_query_id(&self) -> &'static str {
        self.def().query_id
    }

    pub fn all() -> impl Iterator<Item = Metric> {
        METRICS.iter().map(|d| d.metric)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        METRICS
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.metric)
            .ok_or_else(|| format!("unsupported metric: {}", s))
    }
}
