use std::collections::BTreeMap;

use extension::{ExtensionCodec, ExtensionPayload, NoopObserver};
use proptest::prelude::*;
use vmi::{
    Condition, ConditionStatus, Cpu, DeviceName, Disk, DiskBus, DiskTarget, InterfaceStatus,
    NodeName, Quantity, ResourceName, Timestamp, VirtualMachineInstancePhase,
    VirtualMachineInstanceSpec, VirtualMachineInstanceStatus,
};

const LABEL: &str = "[a-z][a-z0-9-]{0,15}";

/// Arbitrary strings, plus a pool weighted toward controls, the byte-order
/// mark, line separators and non-characters, which `any::<String>()` never
/// produces.
fn free_text() -> BoxedStrategy<String> {
    prop_oneof![
        any::<String>(),
        "[\\x01-\\x1f\\x7f-\\x9f\u{a0}\u{2028}\u{2029}\u{feff}\u{fffe}\u{ffff}\u{1f600} a-z\"':#-]{0,16}",
    ]
    .boxed()
}

fn quantity() -> impl Strategy<Value = Quantity> {
    ("[1-9][0-9]{0,6}", prop_oneof![Just(""), Just("Ki"), Just("Mi"), Just("Gi"), Just("m")])
        .prop_map(|(n, unit)| Quantity::new(format!("{n}{unit}")).unwrap())
}

fn device_name() -> impl Strategy<Value = DeviceName> {
    LABEL.prop_map(|s| DeviceName::new(s).unwrap())
}

fn disk() -> impl Strategy<Value = Disk> {
    (
        device_name(),
        proptest::option::of(prop_oneof![
            Just(DiskBus::Virtio),
            Just(DiskBus::Sata),
            Just(DiskBus::Scsi),
            Just(DiskBus::Usb),
        ]),
        any::<bool>(),
        proptest::option::of(1u32..16),
    )
        .prop_map(|(name, bus, read_only, boot_order)| Disk {
            name,
            disk: Some(DiskTarget { bus, read_only }),
            boot_order,
            serial: None,
        })
}

prop_compose! {
    fn spec_with(text: BoxedStrategy<String>)(
        node_selector in proptest::collection::btree_map(text.clone(), text.clone(), 0..4),
        memory in proptest::option::of(quantity()),
        cpu in proptest::option::of(quantity()),
        limit in proptest::option::of(quantity()),
        cores in proptest::option::of(1u32..64),
        dedicated in any::<bool>(),
        grace in proptest::option::of(any::<i64>()),
        hostname in proptest::option::of(text.clone()),
        disks in proptest::collection::vec(disk(), 0..4),
        serial_console in proptest::option::of(any::<bool>()),
    ) -> VirtualMachineInstanceSpec {
        let mut spec = VirtualMachineInstanceSpec {
            node_selector,
            termination_grace_period_seconds: grace,
            hostname,
            ..Default::default()
        };
        if let Some(q) = memory {
            spec.domain.resources.requests.insert(ResourceName::memory(), q);
        }
        if let Some(q) = cpu {
            spec.domain.resources.requests.insert(ResourceName::cpu(), q);
        }
        if let Some(q) = limit {
            spec.domain.resources.limits.insert(ResourceName::memory(), q);
        }
        if cores.is_some() || dedicated {
            spec.domain.cpu = Some(Cpu {
                cores,
                dedicated_cpu_placement: dedicated,
                ..Default::default()
            });
        }
        spec.domain.devices.disks = disks;
        spec.domain.devices.autoattach_serial_console = serial_console;
        spec
    }
}

fn spec() -> impl Strategy<Value = VirtualMachineInstanceSpec> {
    spec_with(free_text())
}

fn phase() -> impl Strategy<Value = VirtualMachineInstancePhase> {
    prop_oneof![
        Just(VirtualMachineInstancePhase::Unset),
        Just(VirtualMachineInstancePhase::Pending),
        Just(VirtualMachineInstancePhase::Scheduling),
        Just(VirtualMachineInstancePhase::Scheduled),
        Just(VirtualMachineInstancePhase::Running),
        Just(VirtualMachineInstancePhase::Succeeded),
        Just(VirtualMachineInstancePhase::Failed),
        Just(VirtualMachineInstancePhase::Unknown),
    ]
}

fn condition() -> impl Strategy<Value = Condition> {
    (
        prop_oneof![Just("Ready"), Just("Paused"), Just("LiveMigratable")],
        prop_oneof![
            Just(ConditionStatus::True),
            Just(ConditionStatus::False),
            Just(ConditionStatus::Unknown),
        ],
        proptest::option::of((1u32..=28, 0u32..24)),
        proptest::option::of(free_text()),
    )
        .prop_map(|(kind, status, at, message)| Condition {
            condition_type: kind.to_owned(),
            status,
            last_probe_time: None,
            last_transition_time: at.and_then(|(day, hour)| {
                Timestamp::parse_rfc3339(&format!("2024-02-{day:02}T{hour:02}:00:00Z"))
            }),
            reason: None,
            message,
        })
}

fn interface_status() -> impl Strategy<Value = InterfaceStatus> {
    (
        proptest::option::of(device_name()),
        (0u8..=255, 0u8..=255),
    )
        .prop_map(|(name, (a, b))| {
            let ip = format!("10.0.{a}.{b}");
            InterfaceStatus {
                name,
                interface_name: Some("eth0".into()),
                ip_address: Some(ip.clone()),
                ip_addresses: vec![ip],
                mac: None,
            }
        })
}

prop_compose! {
    fn status()(
        node in proptest::option::of(LABEL),
        reason in proptest::option::of(free_text()),
        phase in phase(),
        conditions in proptest::collection::vec(condition(), 0..4),
        interfaces in proptest::collection::vec(interface_status(), 0..3),
        pods in proptest::collection::btree_map("[0-9a-f]{8}", LABEL, 0..3),
    ) -> VirtualMachineInstanceStatus {
        VirtualMachineInstanceStatus {
            node_name: node.and_then(NodeName::new),
            reason,
            phase,
            conditions,
            interfaces,
            active_pods: pods
                .into_iter()
                .filter_map(|(uid, node)| NodeName::new(node).map(|n| (uid, n)))
                .collect::<BTreeMap<_, _>>(),
            ..Default::default()
        }
    }
}

proptest! {
    #[test]
    fn spec_round_trips(s in spec()) {
        let codec = ExtensionCodec::with_observer(NoopObserver);
        let payload = codec.encode(Some(&s)).unwrap();
        let decoded: VirtualMachineInstanceSpec = codec.decode(Some(&payload)).unwrap();
        prop_assert_eq!(decoded, s);
    }

    #[test]
    fn status_round_trips(st in status()) {
        let codec = ExtensionCodec::with_observer(NoopObserver);
        let payload = codec.encode(Some(&st)).unwrap();
        let decoded: VirtualMachineInstanceStatus = codec.decode(Some(&payload)).unwrap();
        prop_assert_eq!(decoded, st);
    }

    // Block emission is driven with plain labels; character coverage lives in
    // the strict round trips above.
    #[test]
    fn block_yaml_decodes_like_strict_json(s in spec_with(LABEL.boxed())) {
        let codec = ExtensionCodec::with_observer(NoopObserver);
        let yaml = ExtensionPayload::from_raw(serde_yaml::to_string(&s).unwrap());
        let strict = codec.encode(Some(&s)).unwrap();

        let from_yaml: VirtualMachineInstanceSpec = codec.decode(Some(&yaml)).unwrap();
        let from_json: VirtualMachineInstanceSpec = codec.decode(Some(&strict)).unwrap();
        prop_assert_eq!(from_yaml, from_json);
    }

    #[test]
    fn encoded_payload_is_never_empty(s in spec()) {
        let payload = ExtensionCodec::with_observer(NoopObserver).encode(Some(&s)).unwrap();
        prop_assert!(!payload.is_empty());
    }
}
