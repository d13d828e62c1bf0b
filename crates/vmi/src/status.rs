//! Observed state of a virtual machine instance.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{DeviceName, NodeName, Timestamp};

/// Most recently observed state of a virtual machine instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VirtualMachineInstanceStatus {
    /// Node the instance is currently running on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_name: Option<NodeName>,

    /// Brief reason for the current phase, if the platform gave one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "VirtualMachineInstancePhase::is_unset")]
    pub phase: VirtualMachineInstancePhase,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<InterfaceStatus>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_os_info: Option<GuestOsInfo>,

    /// Pods backing the instance, keyed by pod UID, with the node each runs on.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub active_pods: BTreeMap<String, NodeName>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub qos_class: Option<QosClass>,
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle phase of a virtual machine instance.
///
/// [`Unset`](Self::Unset) is the zero value (an empty string on the wire)
/// and is what a freshly created status carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VirtualMachineInstancePhase {
    #[default]
    #[serde(rename = "")]
    Unset,
    /// Accepted, but not yet handed to the scheduler.
    Pending,
    Scheduling,
    /// A node has been chosen; the guest has not started.
    Scheduled,
    Running,
    /// The guest shut down cleanly.
    Succeeded,
    Failed,
    /// State could not be obtained, usually because the host is unreachable.
    Unknown,
}

impl VirtualMachineInstancePhase {
    /// Returns the wire form of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unset => "",
            Self::Pending => "Pending",
            Self::Scheduling => "Scheduling",
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::Unset
    }
}

impl std::fmt::Display for VirtualMachineInstancePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Conditions
// ---------------------------------------------------------------------------

/// A single observed condition, e.g. `Ready=True`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Condition type. Producers may report types beyond the well-known
    /// ones in [`ConditionType`], so this stays free-form.
    #[serde(rename = "type")]
    pub condition_type: String,

    pub status: ConditionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_probe_time: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<Timestamp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Well-known condition types.
pub struct ConditionType;

impl ConditionType {
    pub const READY: &'static str = "Ready";
    pub const LIVE_MIGRATABLE: &'static str = "LiveMigratable";
    pub const PAUSED: &'static str = "Paused";
    pub const AGENT_CONNECTED: &'static str = "AgentConnected";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

// ---------------------------------------------------------------------------
// Guest details
// ---------------------------------------------------------------------------

/// Addresses reported for one guest interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceStatus {
    /// Name of the interface in the spec, when it could be matched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<DeviceName>,

    /// Interface name inside the guest (e.g. `"eth0"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ip_addresses: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
}

/// Operating system details reported by the guest agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestOsInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub kernel_release: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QosClass {
    Guaranteed,
    Burstable,
    BestEffort,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_strings() {
        assert_eq!(VirtualMachineInstancePhase::Running.to_string(), "Running");
        assert_eq!(VirtualMachineInstancePhase::Unset.as_str(), "");
        assert_eq!(
            serde_json::to_string(&VirtualMachineInstancePhase::Scheduled).unwrap(),
            r#""Scheduled""#
        );
    }

    #[test]
    fn phase_display_matches_wire_form() {
        for phase in [
            VirtualMachineInstancePhase::Pending,
            VirtualMachineInstancePhase::Failed,
            VirtualMachineInstancePhase::Unknown,
        ] {
            let wire = serde_json::to_value(phase).unwrap();
            assert_eq!(wire.as_str(), Some(phase.as_str()));
        }
    }

    #[test]
    fn empty_phase_decodes_to_unset() {
        let status: VirtualMachineInstanceStatus = serde_json::from_str(r#"{"phase":""}"#).unwrap();
        assert!(status.phase.is_unset());
    }

    #[test]
    fn default_status_serializes_to_empty_object() {
        let json = serde_json::to_string(&VirtualMachineInstanceStatus::default()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn condition_timestamps_parse_from_plain_yaml() {
        let yaml = "type: Ready\nstatus: \"True\"\nlastTransitionTime: 2024-05-01T10:00:00Z\n";
        let condition: Condition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(condition.condition_type, ConditionType::READY);
        assert_eq!(condition.status, ConditionStatus::True);
        assert_eq!(
            condition.last_transition_time,
            Timestamp::parse_rfc3339("2024-05-01T10:00:00Z")
        );
    }
}
