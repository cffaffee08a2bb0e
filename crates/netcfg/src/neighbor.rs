//! Neighbor table operations (`ip neigh`).

use tracing::{info, instrument};

use netcfg_common::{CallContext, NetCfgResult, OpKind};

use crate::records::Neighbor;
use crate::{commands, require, NetCfg};

/// Lists and edits ARP/NDP entries.
#[derive(Debug, Clone, Copy)]
pub struct Neighbors<'a> {
    client: &'a NetCfg,
}

impl<'a> Neighbors<'a> {
    pub(crate) fn new(client: &'a NetCfg) -> Self {
        Self { client }
    }

    /// Lists neighbor entries, optionally only those on `interface`.
    ///
    /// An empty table yields an empty list.
    #[instrument(skip(self))]
    pub async fn show(&self, interface: Option<&str>) -> NetCfgResult<Vec<Neighbor>> {
        let interface = require::scope(interface);
        let ctx = CallContext::new(
            OpKind::NeighborShow,
            commands::neighbor_show(interface),
            interface.unwrap_or_default(),
        );
        self.client.query("network neighbors", &ctx).await
    }

    /// Adds an entry. `nud` defaults to `permanent`.
    ///
    /// # Errors
    ///
    /// `DuplicateResource` if an entry for `ip_address` already exists on
    /// `interface`. Use [`update`](Self::update) to overwrite.
    #[instrument(skip(self))]
    pub async fn add(
        &self,
        ip_address: &str,
        mac_address: &str,
        interface: &str,
        nud: Option<&str>,
    ) -> NetCfgResult<()> {
        self.write_entry(OpKind::NeighborAdd, ip_address, mac_address, interface, nud)
            .await
    }

    /// Adds or replaces an entry. `nud` defaults to `permanent`.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        ip_address: &str,
        mac_address: &str,
        interface: &str,
        nud: Option<&str>,
    ) -> NetCfgResult<()> {
        self.write_entry(OpKind::NeighborUpdate, ip_address, mac_address, interface, nud)
            .await
    }

    async fn write_entry(
        &self,
        op: OpKind,
        ip_address: &str,
        mac_address: &str,
        interface: &str,
        nud: Option<&str>,
    ) -> NetCfgResult<()> {
        let interface = require::present("interface", interface)?;
        let ip = require::ip(ip_address)?;
        let mac = require::mac(mac_address)?;
        let nud = require::nud(nud)?;

        let command = match op {
            OpKind::NeighborUpdate => commands::neighbor_update(ip, &mac, interface, nud),
            _ => commands::neighbor_add(ip, &mac, interface, nud),
        };
        let ctx = CallContext::new(op, command, interface).with_resource(format!("neighbor {ip}"));
        self.client.execute(&ctx).await?;

        info!("{}: {} lladdr {} dev {} nud {}", op, ip, mac, interface, nud.as_str());
        Ok(())
    }

    /// Removes the entry for `ip_address` on `interface`.
    ///
    /// # Errors
    ///
    /// `ResourceNotFound` if there is no such entry.
    #[instrument(skip(self))]
    pub async fn remove(&self, ip_address: &str, interface: &str) -> NetCfgResult<()> {
        let interface = require::present("interface", interface)?;
        let ip = require::ip(ip_address)?;

        let ctx = CallContext::new(
            OpKind::NeighborRemove,
            commands::neighbor_remove(ip, interface),
            interface,
        )
        .with_resource(format!("neighbor {ip}"));
        self.client.execute(&ctx).await?;

        info!("Removed neighbor {} from {}", ip, interface);
        Ok(())
    }

    /// Flushes entries on `interface`, or on every interface when `None`.
    ///
    /// `ip` leaves `permanent` and `noarp` entries in place.
    #[instrument(skip(self))]
    pub async fn flush(&self, interface: Option<&str>) -> NetCfgResult<()> {
        let interface = require::scope(interface);

        let ctx = CallContext::new(
            OpKind::NeighborFlush,
            commands::neighbor_flush(interface),
            interface.unwrap_or_default(),
        );
        self.client.execute(&ctx).await?;

        info!("Flushed neighbors on {}", interface.unwrap_or("all interfaces"));
        Ok(())
    }
}
