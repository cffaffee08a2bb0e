//! Interface operations (`ip link`).

use tracing::{info, instrument};

use netcfg_common::{CallContext, NetCfgResult, OpKind};
use netcfg_types::AdminState;

use crate::records::Link;
use crate::{commands, require, NetCfg};

/// Lists interfaces and changes their state, MTU, name and MAC.
#[derive(Debug, Clone, Copy)]
pub struct Links<'a> {
    client: &'a NetCfg,
}

impl<'a> Links<'a> {
    pub(crate) fn new(client: &'a NetCfg) -> Self {
        Self { client }
    }

    /// Lists links, optionally only `interface`.
    #[instrument(skip(self))]
    pub async fn show(&self, interface: Option<&str>) -> NetCfgResult<Vec<Link>> {
        let interface = require::scope(interface);
        let ctx = CallContext::new(
            OpKind::LinkShow,
            commands::link_show(interface),
            interface.unwrap_or_default(),
        );
        self.client.query("network links", &ctx).await
    }

    /// Sets the administrative state from a token (`up` or `down`).
    ///
    /// Any other token is rejected before the tool runs.
    #[instrument(skip(self))]
    pub async fn set_state(&self, interface: &str, state: &str) -> NetCfgResult<()> {
        let state = require::admin_state(state)?;
        self.set_admin_state(interface, state).await
    }

    #[instrument(skip(self))]
    pub async fn set_admin_state(&self, interface: &str, state: AdminState) -> NetCfgResult<()> {
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::LinkSetState,
            commands::link_set_state(interface, state),
            interface,
        );
        self.client.execute(&ctx).await?;

        info!("Set {} admin state to {}", interface, state);
        Ok(())
    }

    /// Sets the MTU. `mtu` must be a positive integer.
    #[instrument(skip(self))]
    pub async fn set_mtu(&self, interface: &str, mtu: &str) -> NetCfgResult<()> {
        let mtu = require::mtu(mtu)?;
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::LinkSetMtu,
            commands::link_set_mtu(interface, mtu),
            interface,
        );
        self.client.execute(&ctx).await?;

        info!("Set {} MTU to {}", interface, mtu);
        Ok(())
    }

    /// Renames `old_name` to `new_name`.
    ///
    /// Most drivers refuse to rename an interface that is up; that failure
    /// is reported as `Execution` with the tool's diagnostic.
    #[instrument(skip(self))]
    pub async fn rename(&self, old_name: &str, new_name: &str) -> NetCfgResult<()> {
        let old_name = require::present("interface", old_name)?;
        let new_name = require::present("new_name", new_name)?;

        let ctx = CallContext::new(
            OpKind::LinkRename,
            commands::link_rename(old_name, new_name),
            old_name,
        );
        self.client.execute(&ctx).await?;

        info!("Renamed {} to {}", old_name, new_name);
        Ok(())
    }

    /// Sets the hardware address. Colon and hyphen forms are accepted.
    #[instrument(skip(self))]
    pub async fn set_mac(&self, interface: &str, mac_address: &str) -> NetCfgResult<()> {
        let mac = require::mac(mac_address)?;
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::LinkSetMac,
            commands::link_set_mac(interface, &mac),
            interface,
        );
        self.client.execute(&ctx).await?;

        info!("Set {} MAC to {}", interface, mac);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InterfaceRecord;
    use netcfg_common::{ErrorKind, ExecResult};
    use netcfg_test::FakeRunner;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn client(runner: &Arc<FakeRunner>) -> NetCfg {
        NetCfg::with_runner(runner.clone())
    }

    #[tokio::test]
    async fn test_set_state_rejects_unknown_token() {
        let runner = Arc::new(FakeRunner::new());
        let err = client(&runner)
            .link()
            .set_state("eth0", "sideways")
            .await
            .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("Invalid state"));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_set_state_builds_command() {
        let runner = Arc::new(FakeRunner::new());
        let net = client(&runner);
        net.link().set_state("eth0", "up").await.unwrap();
        net.link().set_admin_state("eth0", AdminState::Down).await.unwrap();

        assert_eq!(
            runner.lines(),
            ["ip link set eth0 up", "ip link set eth0 down"]
        );
    }

    #[tokio::test]
    async fn test_set_mtu_validation() {
        let runner = Arc::new(FakeRunner::new());
        let net = client(&runner);
        for bad in ["0", "-1", "abc", "1500.5", ""] {
            let err = net.link().set_mtu("eth0", bad).await.unwrap_err();
            assert!(err.is_validation(), "{bad:?} should be rejected");
            assert!(err.to_string().starts_with("Invalid MTU value"));
        }
        assert!(runner.commands().is_empty());

        net.link().set_mtu("eth0", " 9000 ").await.unwrap();
        assert_eq!(runner.last_line().unwrap(), "ip link set eth0 mtu 9000");
    }

    #[tokio::test]
    async fn test_set_mac_normalizes() {
        let runner = Arc::new(FakeRunner::new());
        client(&runner)
            .link()
            .set_mac("eth0", "AA-BB-CC-DD-EE-FF")
            .await
            .unwrap();

        assert_eq!(
            runner.last_line().unwrap(),
            "ip link set dev eth0 address aa:bb:cc:dd:ee:ff"
        );
    }

    #[tokio::test]
    async fn test_set_mac_invalid() {
        let runner = Arc::new(FakeRunner::new());
        let err = client(&runner)
            .link()
            .set_mac("eth0", "aa:bb:cc-dd:ee:ff")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid MAC address"));
        assert!(runner.commands().is_empty());
    }

    #[tokio::test]
    async fn test_rename_requires_new_name() {
        let runner = Arc::new(FakeRunner::new());
        let err = client(&runner).link().rename("eth0", " ").await.unwrap_err();

        assert_eq!(err.to_string(), "new_name is required");
    }

    #[tokio::test]
    async fn test_rename_busy_is_execution_error() {
        let runner = Arc::new(FakeRunner::new().respond(ExecResult::new(
            2,
            "",
            "RTNETLINK answers: Device or resource busy",
        )));
        let err = client(&runner)
            .link()
            .rename("eth0", "wan0")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Execution);
        assert!(err.to_string().contains("Device or resource busy"));
    }

    #[tokio::test]
    async fn test_set_mtu_missing_device() {
        let runner = Arc::new(FakeRunner::new().respond(ExecResult::new(
            1,
            "",
            "Cannot find device \"eth9\"",
        )));
        let err = client(&runner).link().set_mtu("eth9", "1500").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Cannot find device eth9");
    }

    #[tokio::test]
    async fn test_show_decodes_links() {
        let runner = Arc::new(FakeRunner::new().respond(ExecResult::new(
            0,
            netcfg_test::fixtures::LINK_SHOW_ALL,
            "",
        )));
        let links = client(&runner).link().show(None).await.unwrap();

        let names: Vec<_> = links.iter().filter_map(|l| l.name()).collect();
        assert_eq!(names, ["lo", "eth0"]);
        assert_eq!(runner.last_line().unwrap(), "ip -j link show");
    }
}
