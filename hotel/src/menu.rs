//! Interactive text menu over a [`Hotel`].
//!
//! Generic over its input and output so it can run on stdin/stdout or on
//! in-memory buffers.

use crate::error::{BookingError, HotelError};
use crate::hotel::Hotel;
use crate::types::RoomNumber;
use std::io::{self, BufRead, Write};

/// Whether the loop keeps going after a menu entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Text menu driving a hotel
pub struct Menu<R, W> {
    hotel: Hotel,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    /// Creates a menu reading choices from `input` and writing to `output`
    pub const fn new(hotel: Hotel, input: R, output: W) -> Self {
        Self {
            hotel,
            input,
            output,
        }
    }

    /// Gives back the output, e.g. to inspect a test buffer
    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks Exit or the input ends
    ///
    /// # Errors
    ///
    /// Returns any I/O error from reading input or writing output.
    pub async fn run(&mut self) -> io::Result<()> {
        loop {
            self.print_menu()?;

            let Some(choice) = self.read_line()? else {
                tracing::debug!("Input closed, leaving menu");
                return Ok(());
            };

            let flow = match choice.trim() {
                "1" => self.search_rooms().await?,
                "2" => self.make_reservation().await?,
                "3" => self.view_reservations().await?,
                "4" => {
                    writeln!(self.output, "Exiting the system.")?;
                    Flow::Exit
                },
                _ => {
                    writeln!(self.output, "Invalid choice. Please try again.")?;
                    Flow::Continue
                },
            };

            if flow == Flow::Exit {
                self.output.flush()?;
                return Ok(());
            }
        }
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\nHotel Reservation System")?;
        writeln!(self.output, "1. Search Available Rooms")?;
        writeln!(self.output, "2. Make a Reservation")?;
        writeln!(self.output, "3. View Reservations")?;
        writeln!(self.output, "4. Exit")?;
        self.prompt("Enter your choice: ")
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.output, "{text}")?;
        self.output.flush()
    }

    /// Next input line without its line terminator; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(len);
        Ok(Some(line))
    }

    async fn search_rooms(&mut self) -> io::Result<Flow> {
        self.prompt("Enter room type (Single, Double, Suite): ")?;
        let Some(room_type) = self.read_line()? else {
            return Ok(Flow::Exit);
        };

        let rooms = self.hotel.search_available_rooms(&room_type).await;
        if rooms.is_empty() {
            writeln!(self.output, "No available rooms for the specified type.")?;
        } else {
            writeln!(self.output, "Available rooms:")?;
            for room in rooms {
                writeln!(self.output, "{room}")?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn make_reservation(&mut self) -> io::Result<Flow> {
        self.prompt("Enter guest name: ")?;
        let Some(guest_name) = self.read_line()? else {
            return Ok(Flow::Exit);
        };

        self.prompt("Enter room number: ")?;
        let Some(number) = self.read_line()? else {
            return Ok(Flow::Exit);
        };

        let Ok(room_number) = number.parse::<RoomNumber>() else {
            writeln!(self.output, "Invalid room number.")?;
            return Ok(Flow::Continue);
        };

        if self.hotel.find_bookable_room(room_number).await.is_none() {
            writeln!(
                self.output,
                "Room is either not available or does not exist."
            )?;
            return Ok(Flow::Continue);
        }

        match self
            .hotel
            .reserve_one_night(room_number, guest_name.clone())
            .await
        {
            Ok(_) => writeln!(self.output, "Reservation successful for {guest_name}")?,
            Err(HotelError::Booking(BookingError::PaymentDeclined { .. })) => {
                writeln!(self.output, "Payment failed. Reservation unsuccessful.")?;
            },
            Err(error) => writeln!(self.output, "{error}")?,
        }
        Ok(Flow::Continue)
    }

    async fn view_reservations(&mut self) -> io::Result<Flow> {
        let reservations = self.hotel.view_reservations().await;
        if reservations.is_empty() {
            writeln!(self.output, "No reservations found.")?;
        } else {
            for reservation in reservations {
                writeln!(self.output, "{reservation}")?;
            }
        }
        Ok(Flow::Continue)
    }
}
