//! Newtype names used inside virtual machine instance specs and statuses.
//!
//! Each kind of name is a distinct type so a [`NodeName`] cannot be handed
//! where a [`DeviceName`] is expected, even though both are strings on the
//! wire. All of them serialize transparently as plain strings.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_name {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new name, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_name! {
    /// Name of a schedulable node hosting a virtual machine instance.
    NodeName
}

string_name! {
    /// Name of a disk, interface, or volume declared in a spec.
    ///
    /// Disks reference volumes by this name, so it is shared between both.
    DeviceName
}

string_name! {
    /// Name of a compute resource in a request or limit list
    /// (e.g. `"memory"`, `"cpu"`).
    ResourceName
}

impl ResourceName {
    /// The `memory` resource.
    pub fn memory() -> Self {
        Self("memory".to_owned())
    }

    /// The `cpu` resource.
    pub fn cpu() -> Self {
        Self("cpu".to_owned())
    }
}
