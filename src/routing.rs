//! Route finder.
//!
//! Finds hub-originated paths to an order's destination over the generated
//! flight instances. Capacity is a read-only filter against each
//! instance's nominal capacity; nothing is reserved.
//!
//! # Algorithm
//!
//! Single route ([`RouteFinder::find_route`]):
//! 1. **Direct**: earliest hub → destination instance departing at or
//!    after the ready instant with capacity ≥ quantity.
//! 2. **Connection**: for each hub in priority order, earliest hub → `hub`
//!    first leg (same filters), then earliest `hub` → destination second leg
//!    departing strictly after the first arrival and within the connection
//!    window. The first hub yielding both legs wins.
//!
//! Multiple routes ([`RouteFinder::find_routes`]): the `n` earliest direct
//! instances, then connections (one per pass, first viable hub) until `n`
//! routes exist or none remain. An instance is used by at most one route
//! of the same call. Claims never persist across calls.
//!
//! Ties on departure keep generation order.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::models::{FlightInstance, HubSet};

/// Why an order could not be routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DropReason {
    /// No direct flight and no hub connection fits.
    #[error("no direct or connecting route")]
    NoRoute,
    /// The multi-route search found nothing.
    #[error("no routes for partitioned order")]
    NoPartitionRoutes,
    /// The order's ready instant cannot be represented.
    #[error("ready instant out of range")]
    ReadyOutOfRange,
}

/// Route shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteKind {
    Direct,
    /// Changes planes at `via`.
    Connection { via: String },
}

/// An ordered list of instances from a hub to the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route<'a> {
    pub kind: RouteKind,
    pub legs: Vec<&'a FlightInstance>,
}

impl<'a> Route<'a> {
    fn direct(leg: &'a FlightInstance) -> Self {
        Self {
            kind: RouteKind::Direct,
            legs: vec![leg],
        }
    }

    fn connection(via: &str, first: &'a FlightInstance, second: &'a FlightInstance) -> Self {
        Self {
            kind: RouteKind::Connection { via: via.to_string() },
            legs: vec![first, second],
        }
    }

    /// Airport of the last leg.
    pub fn destination(&self) -> Option<&str> {
        self.legs.last().map(|l| l.dest.as_str())
    }

    /// Arrival of the last leg.
    pub fn arrival(&self) -> Option<DateTime<Utc>> {
        self.legs.last().map(|l| l.arr_utc)
    }
}

/// Searches routes over a fixed instance set.
#[derive(Debug, Clone)]
pub struct RouteFinder<'a> {
    instances: &'a [FlightInstance],
    hubs: &'a HubSet,
    connection_window: Duration,
}

impl<'a> RouteFinder<'a> {
    /// Creates a finder with the default 12-hour connection window.
    pub fn new(instances: &'a [FlightInstance], hubs: &'a HubSet) -> Self {
        Self {
            instances,
            hubs,
            connection_window: Duration::hours(12),
        }
    }

    /// Sets the maximum wait between legs.
    pub fn with_connection_window(mut self, window: Duration) -> Self {
        self.connection_window = window;
        self
    }

    /// Instances searched.
    pub fn instances(&self) -> &'a [FlightInstance] {
        self.instances
    }

    /// Earliest-departing instance matching `pred`; first in generation order on ties.
    fn earliest<F>(&self, pred: F) -> Option<&'a FlightInstance>
    where
        F: Fn(&FlightInstance) -> bool,
    {
        self.instances
            .iter()
            .filter(|i| pred(i))
            .min_by_key(|i| i.dep_utc)
    }

    /// Hub → hub first leg and its onward leg through `hub`.
    fn connection_via<F>(
        &self,
        hub: &str,
        destination: &str,
        ready: DateTime<Utc>,
        admit: F,
    ) -> Option<Route<'a>>
    where
        F: Fn(&FlightInstance) -> bool,
    {
        let first = self.earliest(|i| {
            self.hubs.contains(&i.origin) && i.dest == hub && i.dep_utc >= ready && admit(i)
        })?;
        let latest = first
            .arr_utc
            .checked_add_signed(self.connection_window)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let second = self.earliest(|i| {
            i.origin == hub
                && i.dest == destination
                && i.dep_utc > first.arr_utc
                && i.dep_utc <= latest
                && admit(i)
        })?;
        Some(Route::connection(hub, first, second))
    }

    /// Earliest direct hub → `destination` flight with room for `quantity`.
    pub fn find_direct(
        &self,
        destination: &str,
        quantity: u32,
        ready: DateTime<Utc>,
    ) -> Option<Route<'a>> {
        self.earliest(|i| {
            self.hubs.contains(&i.origin)
                && i.dest == destination
                && i.dep_utc >= ready
                && i.capacity >= quantity
        })
        .map(Route::direct)
    }

    /// First hub (in priority order) offering a two-leg path with room for `quantity`.
    pub fn find_connection(
        &self,
        destination: &str,
        quantity: u32,
        ready: DateTime<Utc>,
    ) -> Option<Route<'a>> {
        self.hubs.iter().find_map(|hub| {
            self.connection_via(hub, destination, ready, |i| i.capacity >= quantity)
        })
    }

    /// Finds one route carrying `quantity` to `destination`: direct first,
    /// then a hub connection.
    pub fn find_route(
        &self,
        destination: &str,
        quantity: u32,
        ready: DateTime<Utc>,
    ) -> Result<Route<'a>, DropReason> {
        self.find_direct(destination, quantity, ready)
            .or_else(|| self.find_connection(destination, quantity, ready))
            .ok_or(DropReason::NoRoute)
    }

    /// Finds up to `count` routes to `destination` sharing no instance.
    ///
    /// Nominal capacity is not checked here; the caller sizes each split.
    pub fn find_routes(
        &self,
        destination: &str,
        ready: DateTime<Utc>,
        count: usize,
    ) -> Vec<Route<'a>> {
        let mut routes: Vec<Route<'a>> = Vec::with_capacity(count);
        let mut claimed: HashSet<&'a str> = HashSet::new();

        let mut directs: Vec<&'a FlightInstance> = self
            .instances
            .iter()
            .filter(|i| self.hubs.contains(&i.origin) && i.dest == destination && i.dep_utc >= ready)
            .collect();
        directs.sort_by_key(|i| i.dep_utc);

        for inst in directs.into_iter().take(count) {
            claimed.insert(inst.instance_id.as_str());
            routes.push(Route::direct(inst));
        }

        while routes.len() < count {
            let next = self.hubs.iter().find_map(|hub| {
                self.connection_via(hub, destination, ready, |i| {
                    !claimed.contains(i.instance_id.as_str())
                })
            });
            let Some(route) = next else {
                break;
            };
            for leg in route.legs.iter().copied() {
                claimed.insert(leg.instance_id.as_str());
            }
            routes.push(route);
        }

        routes
    }
}
