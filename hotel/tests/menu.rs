//! Tests for the interactive menu, driven through in-memory buffers

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use hotel::{Hotel, HotelEnvironment, Menu, Money, Room, RoomNumber, SimulatedPaymentProcessor};
use innkeeper_testing::test_clock;
use std::io::Cursor;
use std::sync::Arc;

const MENU: &str = "\nHotel Reservation System\n\
                    1. Search Available Rooms\n\
                    2. Make a Reservation\n\
                    3. View Reservations\n\
                    4. Exit\n\
                    Enter your choice: ";

async fn seeded(processor: SimulatedPaymentProcessor) -> Hotel {
    let hotel = Hotel::new(HotelEnvironment::new(
        Arc::new(test_clock()),
        processor.shared(),
    ));
    for (number, room_type, dollars) in [(101, "Single", 100), (102, "Double", 150), (103, "Suite", 300)]
    {
        hotel
            .add_room(Room::new(
                RoomNumber::new(number),
                room_type,
                Money::from_dollars(dollars),
            ))
            .await
            .unwrap();
    }
    hotel
}

/// Runs the menu over `input` and returns everything it printed
async fn run_menu(hotel: &Hotel, input: &str) -> String {
    let mut menu = Menu::new(
        hotel.clone(),
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
    );
    menu.run().await.unwrap();
    String::from_utf8(menu.into_output()).unwrap()
}

#[tokio::test]
async fn test_exit_immediately() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "4\n").await;

    assert_eq!(output, format!("{MENU}Exiting the system.\n"));
}

#[tokio::test]
async fn test_menu_is_separated_by_a_blank_line() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "3\n4\n").await;

    assert_eq!(
        output,
        format!("{MENU}No reservations found.\n{MENU}Exiting the system.\n")
    );
    assert!(output.starts_with("\nHotel Reservation System\n"));
    assert!(output.contains("No reservations found.\n\nHotel Reservation System\n"));
}

#[tokio::test]
async fn test_end_of_input_stops_the_loop() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "").await;

    assert_eq!(output, MENU);
}

#[tokio::test]
async fn test_search_lists_matching_rooms() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "1\ndouble\n4\n").await;

    assert!(output.contains(
        "Enter room type (Single, Double, Suite): Available rooms:\n\
         Room 102 (Double) - $150.00/night\n"
    ));
}

#[tokio::test]
async fn test_search_without_matches() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "1\nPenthouse\n4\n").await;

    assert!(output.contains("No available rooms for the specified type.\n"));
}

#[tokio::test]
async fn test_reservation_then_view() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "2\nAlice\n102\n3\n1\nDouble\n4\n").await;

    assert!(output.contains("Enter guest name: Enter room number: Reservation successful for Alice\n"));
    assert!(output.contains(
        "Reservation for Alice - Room 102 from 2025-01-01 00:00 UTC to 2025-01-02 00:00 UTC\n"
    ));
    assert!(output.contains("No available rooms for the specified type.\n"));
    assert_eq!(hotel.view_reservations().await.len(), 1);
}

#[tokio::test]
async fn test_unknown_or_booked_room() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "2\nBob\n999\n2\nBob\n101\n2\nCarol\n101\n4\n").await;

    assert_eq!(
        output
            .matches("Room is either not available or does not exist.\n")
            .count(),
        2
    );
    assert_eq!(output.matches("Reservation successful for Bob\n").count(), 1);
    assert_eq!(hotel.view_reservations().await.len(), 1);
}

#[tokio::test]
async fn test_declined_payment_message() {
    let hotel = seeded(SimulatedPaymentProcessor::new().declining("card expired")).await;

    let output = run_menu(&hotel, "2\nDave\n103\n3\n4\n").await;

    assert!(output.contains("Payment failed. Reservation unsuccessful.\n"));
    assert!(output.contains("No reservations found.\n"));
}

#[tokio::test]
async fn test_invalid_input() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "9\nabc\n2\nErin\nroom\n4\n").await;

    assert_eq!(
        output.matches("Invalid choice. Please try again.\n").count(),
        2
    );
    assert!(output.contains("Invalid room number.\n"));
    assert!(hotel.view_reservations().await.is_empty());
}

#[tokio::test]
async fn test_blank_guest_name_reports_error() {
    let hotel = seeded(SimulatedPaymentProcessor::new()).await;

    let output = run_menu(&hotel, "2\n\n101\n4\n").await;

    assert!(output.contains("Guest name cannot be empty\n"));
    assert!(hotel.view_reservations().await.is_empty());
}
