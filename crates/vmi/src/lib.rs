//! Virtual machine instance domain values for rawext.
//!
//! This crate defines the two values that travel inside extension payloads:
//! the desired [`VirtualMachineInstanceSpec`] and the observed
//! [`VirtualMachineInstanceStatus`], together with the scalar types and
//! names they are built from.
//!
//! ## Architectural Layer
//!
//! **Domain values only.** There is no I/O and no validation of domain
//! semantics here; the `extension` crate treats these values as inert trees
//! to be serialized.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`NodeName`, `DeviceName`, `ResourceName`) |
//! | [`types`] | Scalar values (`Quantity`, `Timestamp`) |
//! | [`spec`] | `VirtualMachineInstanceSpec` and its sub-trees |
//! | [`status`] | `VirtualMachineInstanceStatus` and its sub-trees |

pub mod identifiers;
pub mod spec;
pub mod status;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use identifiers::{DeviceName, NodeName, ResourceName};
pub use spec::{
    CloudInitNoCloudSource, ContainerDiskSource, Cpu, Devices, Disk, DiskBus, DiskTarget,
    DomainSpec, EmptyDiskSource, Hugepages, Interface, Machine, Memory, MultusNetwork, Network,
    PersistentVolumeClaimSource, PodNetwork, ResourceRequirements, VirtualMachineInstanceSpec,
    Volume,
};
pub use status::{
    Condition, ConditionStatus, ConditionType, GuestOsInfo, InterfaceStatus, QosClass,
    VirtualMachineInstancePhase, VirtualMachineInstanceStatus,
};
pub use types::{Quantity, Timestamp};
