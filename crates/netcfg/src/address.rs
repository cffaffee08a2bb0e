//! Address operations (`ip address`).

use tracing::{info, instrument};

use netcfg_common::{CallContext, NetCfgResult, OpKind};

use crate::records::InterfaceAddresses;
use crate::{commands, require, NetCfg};

/// Lists, adds, removes and flushes interface addresses.
#[derive(Debug, Clone, Copy)]
pub struct Addresses<'a> {
    client: &'a NetCfg,
}

impl<'a> Addresses<'a> {
    pub(crate) fn new(client: &'a NetCfg) -> Self {
        Self { client }
    }

    /// Lists interfaces with their addresses, optionally only `interface`.
    ///
    /// # Errors
    ///
    /// [`DeviceNotFound`](netcfg_common::NetCfgError::DeviceNotFound) if the
    /// named interface does not exist.
    #[instrument(skip(self))]
    pub async fn show(&self, interface: Option<&str>) -> NetCfgResult<Vec<InterfaceAddresses>> {
        let interface = require::scope(interface);
        let ctx = CallContext::new(
            OpKind::AddressShow,
            commands::address_show(interface),
            interface.unwrap_or_default(),
        );
        self.client.query("network interfaces", &ctx).await
    }

    /// Assigns `ip_cidr` (e.g. `10.0.0.5/24`) to `interface`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `ip_cidr` is not a valid CIDR
    /// - `DuplicateResource` if the address is already assigned
    /// - `DeviceNotFound` if the interface does not exist
    #[instrument(skip(self))]
    pub async fn add(&self, interface: &str, ip_cidr: &str) -> NetCfgResult<()> {
        let cidr = require::cidr(ip_cidr)?;
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::AddressAdd,
            commands::address_add(&cidr, interface),
            interface,
        )
        .with_resource(format!("address {cidr}"));
        self.client.execute(&ctx).await?;

        info!("Added address {} to {}", cidr, interface);
        Ok(())
    }

    /// Removes `ip_cidr` from `interface`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `ip_cidr` is not a valid CIDR
    /// - `ResourceNotFound` if the address is not assigned
    /// - `DeviceNotFound` if the interface does not exist
    #[instrument(skip(self))]
    pub async fn remove(&self, interface: &str, ip_cidr: &str) -> NetCfgResult<()> {
        let cidr = require::cidr(ip_cidr)?;
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::AddressRemove,
            commands::address_remove(&cidr, interface),
            interface,
        )
        .with_resource(format!("address {cidr}"));
        self.client.execute(&ctx).await?;

        info!("Removed address {} from {}", cidr, interface);
        Ok(())
    }

    /// Removes every address from `interface`. Flushing an interface with
    /// no addresses succeeds.
    #[instrument(skip(self))]
    pub async fn flush(&self, interface: &str) -> NetCfgResult<()> {
        let interface = require::present("interface", interface)?;

        let ctx = CallContext::new(
            OpKind::AddressFlush,
            commands::address_flush(interface),
            interface,
        );
        self.client.execute(&ctx).await?;

        info!("Flushed addresses on {}", interface);
        Ok(())
    }
}
