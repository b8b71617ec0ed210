//! Seat inventory arithmetic for one bus on one travel date.
//!
//! Seats are numbered `1..=capacity`. A seat is booked when it appears in any
//! non-cancelled booking for the same bus and day; everything else is free.

use chrono::{DateTime, NaiveDate};
use std::collections::BTreeSet;
use std::fmt;

/// Why a requested seat set cannot be booked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeatRejection {
    Empty,
    Duplicate(Vec<i32>),
    OutOfRange { seats: Vec<i32>, capacity: i32 },
    AlreadyBooked(Vec<i32>),
}

impl SeatRejection {
    pub fn seats(&self) -> &[i32] {
        match self {
            SeatRejection::Empty => &[],
            SeatRejection::Duplicate(seats)
            | SeatRejection::OutOfRange { seats, .. }
            | SeatRejection::AlreadyBooked(seats) => seats,
        }
    }
}

fn join(seats: &[i32]) -> String {
    seats
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for SeatRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatRejection::Empty => write!(f, "At least one seat must be selected"),
            SeatRejection::Duplicate(seats) => {
                write!(f, "Seat numbers requested more than once: {}", join(seats))
            }
            SeatRejection::OutOfRange { seats, capacity } => write!(
                f,
                "Invalid seat numbers: {}. Seats must be between 1 and {}",
                join(seats),
                capacity
            ),
            SeatRejection::AlreadyBooked(seats) => {
                write!(f, "Seats already booked: {}", join(seats))
            }
        }
    }
}

/// Union of the seat lists of every booking that still holds its seats.
pub fn booked_seats<'a, I>(bookings: I) -> BTreeSet<i32>
where
    I: IntoIterator<Item = &'a [i32]>,
{
    bookings
        .into_iter()
        .flat_map(|seats| seats.iter().copied())
        .collect()
}

/// `{1..=capacity} \ booked`, ascending.
pub fn available_seats(capacity: i32, booked: &BTreeSet<i32>) -> Vec<i32> {
    (1..=capacity).filter(|seat| !booked.contains(seat)).collect()
}

/// Validates a requested seat set against the bus capacity and the seats
/// already taken. Nothing is partially accepted: the first failing rule
/// rejects the whole request.
pub fn check_requested_seats(
    capacity: i32,
    booked: &BTreeSet<i32>,
    requested: &[i32],
) -> Result<(), SeatRejection> {
    if requested.is_empty() {
        return Err(SeatRejection::Empty);
    }

    let out_of_range: BTreeSet<i32> = requested
        .iter()
        .copied()
        .filter(|seat| *seat < 1 || *seat > capacity)
        .collect();
    if !out_of_range.is_empty() {
        return Err(SeatRejection::OutOfRange {
            seats: out_of_range.into_iter().collect(),
            capacity,
        });
    }

    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<i32> = requested
        .iter()
        .copied()
        .filter(|seat| !seen.insert(*seat))
        .collect();
    if !duplicates.is_empty() {
        return Err(SeatRejection::Duplicate(duplicates.into_iter().collect()));
    }

    let conflicts: Vec<i32> = seen.intersection(booked).copied().collect();
    if !conflicts.is_empty() {
        return Err(SeatRejection::AlreadyBooked(conflicts));
    }

    Ok(())
}

/// Parses a travel date given either as `YYYY-MM-DD` or as an RFC 3339
/// timestamp. Timestamps are truncated to their calendar day.
pub fn parse_travel_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|timestamp| timestamp.date_naive())
}
