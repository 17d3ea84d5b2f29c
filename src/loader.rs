//! Input file parsers.
//!
//! Each catalog is read whole, then parsed line by line. Blank lines are
//! skipped; any other line that does not follow its grammar aborts the
//! batch with a [`LoadError::Malformed`] naming the 1-based line.
//!
//! | File | Grammar |
//! |------|---------|
//! | Flights | `ORI,DES,HH:MM,HH:MM,CAP` or `ORI-DES-HH:MM-HH:MM-CAP` |
//! | Orders | `dd-hh-mm-DEST-qty-clientId` |
//! | Airports | `idx,CODE,City,Country,alias,tz,cap,LAT,LON[,region]` or `CODE LAT LON` |
//! | Cancellations | `dd.ORI-DES-HH:MM` |

use std::path::Path;

use tracing::{debug, info};

use crate::allocation::UniformSource;
use crate::error::{InputKind, LoadError};
use crate::models::{
    Airport, AirportCatalog, Cancellation, FlightDefinition, HubSet, LocalTime, Order, Sequence,
};

/// Reads a whole input file.
pub fn read_input(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Non-blank lines with their 1-based numbers.
fn records(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
}

fn norm_code(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn parse_number<T: std::str::FromStr>(
    kind: InputKind,
    line: usize,
    field: &str,
    raw: &str,
) -> Result<T, LoadError> {
    raw.trim()
        .parse()
        .map_err(|_| LoadError::malformed(kind, line, format!("invalid {field} '{}'", raw.trim())))
}

fn parse_clock(kind: InputKind, line: usize, raw: &str) -> Result<LocalTime, LoadError> {
    LocalTime::parse(raw)
        .ok_or_else(|| LoadError::malformed(kind, line, format!("invalid clock time '{}'", raw.trim())))
}

// ============================================================================
// Flights
// ============================================================================

/// Parses the flight catalog, keeping only definitions that touch a hub.
pub fn parse_flight_definitions(text: &str, hubs: &HubSet) -> Result<Vec<FlightDefinition>, LoadError> {
    let kind = InputKind::Flights;
    let mut kept = Vec::new();
    let mut total = 0usize;

    for (line, record) in records(text) {
        let fields: Vec<&str> = if record.contains(',') {
            record.split(',').collect()
        } else {
            record.split('-').collect()
        };
        if fields.len() != 5 {
            return Err(LoadError::malformed(
                kind,
                line,
                format!("expected 5 fields, got {}", fields.len()),
            ));
        }

        let def = FlightDefinition::new(
            norm_code(fields[0]),
            norm_code(fields[1]),
            parse_clock(kind, line, fields[2])?,
            parse_clock(kind, line, fields[3])?,
            parse_number(kind, line, "capacity", fields[4])?,
        );
        total += 1;

        if def.duration_minutes() == 0 {
            debug!(line, key = %def.cancellation_key(), "departure and arrival clocks match: zero block time");
        }
        if def.touches_hub(hubs) {
            kept.push(def);
        } else {
            debug!(line, origin = %def.origin, dest = %def.destination, "dropping non-hub flight definition");
        }
    }

    info!(kept = kept.len(), total, "flight definitions loaded (hub-filtered)");
    Ok(kept)
}

// ============================================================================
// Orders
// ============================================================================

/// An order record refused at load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedOrder {
    pub order_id: String,
    /// 1-based line in the order file.
    pub line: usize,
    pub destination: String,
}

/// Result of loading the order catalog.
#[derive(Debug, Clone, Default)]
pub struct OrderBatch {
    /// Accepted orders in file order.
    pub orders: Vec<Order>,
    /// Records whose destination is a hub.
    pub rejected: Vec<RejectedOrder>,
}

/// Parses the order catalog.
///
/// Every record consumes one id from `sequence` and one origin-hub draw
/// from `source`, in file order, before hub-destination records are
/// rejected. Returns the advanced sequence.
pub fn parse_orders(
    text: &str,
    hubs: &HubSet,
    source: &mut dyn UniformSource,
    mut sequence: Sequence,
) -> Result<(OrderBatch, Sequence), LoadError> {
    let kind = InputKind::Orders;
    let mut batch = OrderBatch::default();

    for (line, record) in records(text) {
        let fields: Vec<&str> = record.split('-').collect();
        if fields.len() != 6 {
            return Err(LoadError::malformed(
                kind,
                line,
                format!("expected 6 fields, got {}", fields.len()),
            ));
        }

        let day: u32 = parse_number(kind, line, "day", fields[0])?;
        let hour: u32 = parse_number(kind, line, "hour", fields[1])?;
        let minute: u32 = parse_number(kind, line, "minute", fields[2])?;
        let quantity: u32 = parse_number(kind, line, "quantity", fields[4])?;
        if day == 0 {
            return Err(LoadError::malformed(kind, line, "day must be at least 1"));
        }
        if day > Order::MAX_DAY {
            return Err(LoadError::malformed(
                kind,
                line,
                format!("day {day} exceeds {}", Order::MAX_DAY),
            ));
        }
        if LocalTime::new(hour, minute).is_none() {
            return Err(LoadError::malformed(
                kind,
                line,
                format!("invalid order time {hour:02}:{minute:02}"),
            ));
        }

        let (number, next) = sequence.take();
        sequence = next;
        let origin = hubs.pick(source.next_uniform()).unwrap_or_default().to_string();

        let order = Order::new(number, norm_code(fields[3]), quantity)
            .at(day, hour, minute)
            .with_origin(origin)
            .with_client(fields[5].trim());

        if hubs.contains(&order.destination) {
            info!(
                line,
                order_id = %order.order_id,
                dest = %order.destination,
                "order ignored: destination is an infinite-source hub"
            );
            batch.rejected.push(RejectedOrder {
                order_id: order.order_id,
                line,
                destination: order.destination,
            });
            continue;
        }
        batch.orders.push(order);
    }

    info!(
        accepted = batch.orders.len(),
        rejected = batch.rejected.len(),
        "orders loaded"
    );
    Ok((batch, sequence))
}

// ============================================================================
// Airports
// ============================================================================

/// Converts a DMS coordinate (`12°01'19"S`, `12:01:19 S`, `12 01 19 S`)
/// to signed decimal degrees.
///
/// Falls back to a plain decimal parse, then to 0.
pub fn dms_to_decimal(raw: &str) -> f64 {
    let s = raw.trim();
    let hemisphere = s
        .chars()
        .rev()
        .find(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_uppercase())
        .filter(|c| matches!(c, 'N' | 'S' | 'E' | 'W'));

    let parts: Vec<f64> = s
        .split(|c: char| !(c.is_ascii_digit() || c == '.'))
        .filter(|p| !p.is_empty())
        .filter_map(|p| p.parse().ok())
        .collect();

    match hemisphere {
        Some(hemi) if parts.len() >= 2 => {
            let deg = parts[0];
            let min = parts[1];
            let sec = parts.get(2).copied().unwrap_or(0.0);
            let dec = deg + min / 60.0 + sec / 3600.0;
            if hemi == 'S' || hemi == 'W' {
                -dec
            } else {
                dec
            }
        }
        _ => s.parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
    }
}

/// Parses the airport catalog and flags hubs.
///
/// CSV lines with fewer than nine fields are skipped. Whitespace lines
/// `CODE LAT LON` get offset -5 and capacity 100.
pub fn parse_airports(text: &str, hubs: &HubSet) -> Result<AirportCatalog, LoadError> {
    let kind = InputKind::Airports;
    let mut catalog = AirportCatalog::new();

    for (line, record) in records(text) {
        if record.contains(',') {
            let p: Vec<&str> = record.split(',').map(str::trim).collect();
            if p.len() < 9 {
                debug!(line, "skipping short airport record");
                continue;
            }
            let mut airport = Airport::new(norm_code(p[1]))
                .with_tz_offset(p[5].parse().unwrap_or(0))
                .with_position(dms_to_decimal(p[7]), dms_to_decimal(p[8]));
            if let Ok(capacity) = p[6].parse() {
                airport = airport.with_capacity(capacity);
            }
            catalog.insert(airport);
        } else {
            let p: Vec<&str> = record.split_whitespace().collect();
            if p.len() != 3 {
                return Err(LoadError::malformed(
                    kind,
                    line,
                    format!("expected 'CODE LAT LON', got '{record}'"),
                ));
            }
            let lat = parse_number(kind, line, "latitude", p[1])?;
            let lng = parse_number(kind, line, "longitude", p[2])?;
            catalog.insert(
                Airport::new(norm_code(p[0]))
                    .with_tz_offset(-5)
                    .with_capacity(100)
                    .with_position(lat, lng),
            );
        }
    }

    catalog.mark_hubs(hubs);
    info!(airports = catalog.len(), "airport catalog loaded");
    Ok(catalog)
}

// ============================================================================
// Cancellations
// ============================================================================

/// Parses `dd.ORI-DES-HH:MM` cancellation records.
pub fn parse_cancellations(text: &str) -> Result<Vec<Cancellation>, LoadError> {
    let kind = InputKind::Cancellations;
    let mut out = Vec::new();

    for (line, record) in records(text) {
        let (day, key) = record
            .split_once('.')
            .ok_or_else(|| LoadError::malformed(kind, line, "expected 'dd.ORI-DES-HH:MM'"))?;
        let day: u32 = parse_number(kind, line, "day", day)?;

        let parts: Vec<&str> = key.split('-').collect();
        if parts.len() != 3 {
            return Err(LoadError::malformed(
                kind,
                line,
                format!("invalid flight key '{key}'"),
            ));
        }
        let departure = parse_clock(kind, line, parts[2])?;
        out.push(Cancellation::new(
            day,
            format!("{}-{}-{}", norm_code(parts[0]), norm_code(parts[1]), departure),
        ));
    }

    info!(cancellations = out.len(), "cancellations loaded");
    Ok(out)
}
