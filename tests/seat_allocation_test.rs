use bus_booking_system::utils::seat_allocation::{
    available_seats, booked_seats, check_requested_seats, parse_travel_date, SeatRejection,
};
use chrono::NaiveDate;
use std::collections::BTreeSet;

fn booked(seats: &[i32]) -> BTreeSet<i32> {
    seats.iter().copied().collect()
}

#[test]
fn test_booked_seats_is_union_of_bookings() {
    let first = vec![5, 6];
    let second = vec![12];
    let third = vec![6, 30];
    let seats = booked_seats([first.as_slice(), second.as_slice(), third.as_slice()]);
    assert_eq!(seats.into_iter().collect::<Vec<_>>(), vec![5, 6, 12, 30]);
}

#[test]
fn test_available_seats_excludes_booked() {
    let taken = booked(&[5, 6]);
    let free = available_seats(40, &taken);

    assert_eq!(free.len(), 38);
    assert!(!free.contains(&5));
    assert!(!free.contains(&6));
    assert_eq!(free.first(), Some(&1));
    assert_eq!(free.last(), Some(&40));
    assert!(free.windows(2).all(|w| w[0] < w[1]), "seats must be ascending");
}

#[test]
fn test_available_count_is_capacity_minus_booked() {
    for (capacity, taken) in [(1, vec![]), (1, vec![1]), (40, vec![1, 2, 3, 40]), (100, (1..=100).collect())] {
        let set = booked(&taken);
        assert_eq!(
            available_seats(capacity, &set).len() as i32,
            capacity - set.len() as i32
        );
    }
}

#[test]
fn test_request_free_seats_accepted() {
    let taken = booked(&[5, 6]);
    assert_eq!(check_requested_seats(40, &taken, &[1, 7, 40]), Ok(()));
}

#[test]
fn test_conflict_names_booked_seat() {
    let taken = booked(&[5, 6]);
    let rejection = check_requested_seats(40, &taken, &[5, 7]).unwrap_err();

    assert_eq!(rejection, SeatRejection::AlreadyBooked(vec![5]));
    assert_eq!(rejection.to_string(), "Seats already booked: 5");
}

#[test]
fn test_out_of_range_rejected() {
    let taken = booked(&[5, 6]);
    let rejection = check_requested_seats(40, &taken, &[41]).unwrap_err();

    assert_eq!(
        rejection,
        SeatRejection::OutOfRange {
            seats: vec![41],
            capacity: 40
        }
    );
    assert_eq!(
        rejection.to_string(),
        "Invalid seat numbers: 41. Seats must be between 1 and 40"
    );
}

#[test]
fn test_out_of_range_reported_before_conflicts() {
    let taken = booked(&[5]);
    let rejection = check_requested_seats(40, &taken, &[5, 0, 41]).unwrap_err();
    assert_eq!(rejection.seats(), &[0, 41]);
}

#[test]
fn test_out_of_range_reported_before_duplicates() {
    let taken = BTreeSet::new();
    assert_eq!(
        check_requested_seats(40, &taken, &[41, 41]),
        Err(SeatRejection::OutOfRange {
            seats: vec![41],
            capacity: 40
        })
    );
}

#[test]
fn test_empty_and_duplicate_requests_rejected() {
    let taken = BTreeSet::new();
    assert_eq!(
        check_requested_seats(40, &taken, &[]),
        Err(SeatRejection::Empty)
    );
    assert_eq!(
        check_requested_seats(40, &taken, &[3, 4, 3]),
        Err(SeatRejection::Duplicate(vec![3]))
    );
}

#[test]
fn test_parse_travel_date_accepts_day_and_timestamp() {
    let expected = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
    assert_eq!(parse_travel_date("2026-11-02"), Some(expected));
    assert_eq!(parse_travel_date(" 2026-11-02 "), Some(expected));
    assert_eq!(parse_travel_date("2026-11-02T08:30:00Z"), Some(expected));
    assert_eq!(parse_travel_date("02/11/2026"), None);
    assert_eq!(parse_travel_date(""), None);
}
