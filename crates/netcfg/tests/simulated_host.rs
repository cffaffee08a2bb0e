//! End-to-end facade tests against a simulated host
//!
//! Each test drives the public API and checks both the state the host ends
//! up in and the commands that were issued.

use std::sync::Arc;

use netcfg::{ErrorKind, InterfaceRecord, NetCfg, NetCfgError};
use netcfg_test::{CommandVerifier, SimulatedHost};
use pretty_assertions::assert_eq;

const ETH0_MAC: &str = "52:54:00:12:34:56";

fn setup() -> (Arc<SimulatedHost>, NetCfg) {
    let host = Arc::new(SimulatedHost::new().with_interface("eth0", ETH0_MAC));
    let net = NetCfg::with_runner(host.clone());
    (host, net)
}

async fn eth0_cidrs(net: &NetCfg) -> Vec<String> {
    let ifaces = net.addr().show(Some("eth0")).await.unwrap();
    assert_eq!(ifaces.len(), 1);
    ifaces[0].cidrs()
}

/// Scenario:
/// 1. Add 10.0.0.5/24 to eth0
/// 2. Remove it again
/// 3. The address list is back where it started
#[tokio::test]
async fn test_address_add_then_remove_is_noop() {
    let (_host, net) = setup();
    let before = eth0_cidrs(&net).await;

    net.addr().add("eth0", "10.0.0.5/24").await.unwrap();
    assert_eq!(eth0_cidrs(&net).await, ["10.0.0.5/24"]);

    net.addr().remove("eth0", "10.0.0.5/24").await.unwrap();
    assert_eq!(eth0_cidrs(&net).await, before);
}

#[tokio::test]
async fn test_duplicate_address() {
    let (_host, net) = setup();

    net.addr().add("eth0", "10.0.0.5/24").await.unwrap();
    let err = net.addr().add("eth0", "10.0.0.5/24").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateResource);
    assert_eq!(eth0_cidrs(&net).await, ["10.0.0.5/24"]);
}

#[tokio::test]
async fn test_remove_unassigned_address() {
    let (_host, net) = setup();

    let err = net.addr().remove("eth0", "10.0.0.5/24").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_flush_twice() {
    let (_host, net) = setup();
    net.addr().add("eth0", "10.0.0.5/24").await.unwrap();
    net.addr().add("eth0", "2001:db8::5/64").await.unwrap();

    net.addr().flush("eth0").await.unwrap();
    net.addr().flush("eth0").await.unwrap();

    assert!(eth0_cidrs(&net).await.is_empty());
}

#[tokio::test]
async fn test_invalid_input_never_reaches_host() {
    let (host, net) = setup();

    let err = net.addr().add("eth0", "300.1.1.1/24").await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("Invalid IP CIDR"));

    let err = net.link().set_state("eth0", "sideways").await.unwrap_err();
    assert!(err.to_string().contains("Invalid state"));

    let err = net.link().set_mtu("eth0", "0").await.unwrap_err();
    assert!(err.to_string().contains("Invalid MTU value"));

    CommandVerifier::new(host.lines())
        .assert_command_count(0)
        .unwrap();
}

#[tokio::test]
async fn test_show_missing_device() {
    let (_host, net) = setup();

    match net.addr().show(Some("doesnotexist")).await {
        Err(NetCfgError::DeviceNotFound { device }) => assert_eq!(device, "doesnotexist"),
        other => panic!("Expected DeviceNotFound, got {other:?}"),
    }

    let err = net.link().set_mtu("doesnotexist", "1500").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeviceNotFound);
}

/// Scenario:
/// 1. Bring eth0 up with MTU 9000
/// 2. Try to rename it (refused while up)
/// 3. Bring it down, rename to wan0, change the MAC
#[tokio::test]
async fn test_link_configuration() {
    let (host, net) = setup();

    net.link().set_state("eth0", "up").await.unwrap();
    net.link().set_mtu("eth0", "9000").await.unwrap();

    let links = net.link().show(Some("eth0")).await.unwrap();
    assert_eq!(links[0].mtu(), Some(9000));
    assert!(links[0].is_admin_up());

    let err = net.link().rename("eth0", "wan0").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Execution);

    net.link().set_state("eth0", "down").await.unwrap();
    net.link().rename("eth0", "wan0").await.unwrap();
    net.link().set_mac("wan0", "02-00-00-AA-BB-CC").await.unwrap();

    let links = net.link().show(None).await.unwrap();
    let wan0 = links
        .iter()
        .find(|l| l.name() == Some("wan0"))
        .expect("renamed link listed");
    assert_eq!(wan0.mac().unwrap().to_string(), "02:00:00:aa:bb:cc");
    assert!(!wan0.is_admin_up());

    let verifier = CommandVerifier::new(host.lines());
    verifier
        .assert_command_order("ip link set eth0 down", "address 02:00:00:aa:bb:cc")
        .unwrap();
    verifier
        .assert_command_executed("ip link set dev wan0 address 02:00:00:aa:bb:cc")
        .unwrap();
}

#[tokio::test]
async fn test_mtu_beyond_device_limit() {
    let (_host, net) = setup();

    let err = net.link().set_mtu("eth0", "65000").await.unwrap_err();
    match err {
        NetCfgError::Execution { diagnostic, .. } => {
            assert!(diagnostic.contains("mtu greater than device maximum"))
        }
        other => panic!("Expected Execution error, got {other:?}"),
    }
}

/// Scenario:
/// 1. Add a permanent neighbor on eth0
/// 2. Show lists its IP and MAC
/// 3. Replace it, remove it, and check it is gone
#[tokio::test]
async fn test_neighbor_lifecycle() {
    let (_host, net) = setup();

    net.neigh()
        .add("192.168.1.100", "AA:BB:CC:DD:EE:FF", "eth0", None)
        .await
        .unwrap();

    let neighs = net.neigh().show(Some("eth0")).await.unwrap();
    assert_eq!(neighs.len(), 1);
    assert_eq!(neighs[0].dst(), Some("192.168.1.100"));
    assert_eq!(neighs[0].lladdr(), Some("aa:bb:cc:dd:ee:ff"));
    assert!(neighs[0].has_state("permanent"));

    let err = net
        .neigh()
        .add("192.168.1.100", "aa:bb:cc:dd:ee:ff", "eth0", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateResource);

    net.neigh()
        .update("192.168.1.100", "aa:bb:cc:dd:ee:01", "eth0", Some("reachable"))
        .await
        .unwrap();
    let neighs = net.neigh().show(Some("eth0")).await.unwrap();
    assert_eq!(neighs[0].lladdr(), Some("aa:bb:cc:dd:ee:01"));
    assert!(neighs[0].has_state("REACHABLE"));

    net.neigh().remove("192.168.1.100", "eth0").await.unwrap();
    assert!(net.neigh().show(Some("eth0")).await.unwrap().is_empty());

    let err = net.neigh().remove("192.168.1.100", "eth0").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceNotFound);
}

#[tokio::test]
async fn test_neighbor_flush() {
    let (host, net) = setup();
    net.neigh()
        .add("10.0.0.1", "aa:bb:cc:dd:ee:01", "eth0", None)
        .await
        .unwrap();
    net.neigh()
        .add("10.0.0.2", "aa:bb:cc:dd:ee:02", "eth0", Some("stale"))
        .await
        .unwrap();

    net.neigh().flush(Some("eth0")).await.unwrap();
    net.neigh().flush(None).await.unwrap();

    let remaining = net.neigh().show(None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].dst(), Some("10.0.0.1"));
    assert_eq!(host.neighbor_count(), 1);
}

#[tokio::test]
async fn test_concurrent_calls_on_clones() {
    let (host, net) = setup();

    let tasks: Vec<_> = (1..=8)
        .map(|i| {
            let net = net.clone();
            tokio::spawn(async move {
                net.addr()
                    .add("eth0", &format!("10.0.{i}.1/24"))
                    .await
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(eth0_cidrs(&net).await.len(), 8);
    CommandVerifier::new(host.lines())
        .assert_command_count(9)
        .unwrap();
}
