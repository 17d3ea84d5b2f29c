//! Air-cargo domain models.
//!
//! Provides the data types shared by every stage of a simulation run:
//! reference data (airports, flight definitions), generated data
//! (flight instances), allocation results, and derived timeline events.
//!
//! # Domain Mappings
//!
//! | Type | Role | Lifecycle |
//! |------|------|-----------|
//! | Airport | Reference data | Loaded once per run |
//! | FlightDefinition | Weekly template | Loaded once, hub-filtered |
//! | FlightInstance | Dated occurrence | Generated per day × definition |
//! | Order | Demand | Loaded once, hub-destination orders rejected |
//! | Assignment | Solution | One per routable order |
//! | TimelineEvent | Derived | Recomputed from assignments |

pub mod clock;

mod airport;
mod assignment;
mod flight;
mod order;
mod timeline;

pub use airport::{Airport, AirportCatalog, HubSet};
pub use assignment::{Assignment, Leg, Split};
pub use clock::LocalTime;
pub use flight::{Cancellation, FlightDefinition, FlightInstance, FlightPosition};
pub use order::{Order, Sequence};
pub use timeline::{EventKind, TimelineEvent};
