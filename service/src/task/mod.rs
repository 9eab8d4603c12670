//! Background [`Task`]s definitions.

mod background;
pub mod complete_elapsed_bookings;

pub use common::Handler as Task;

pub use self::{
    background::Background,
    complete_elapsed_bookings::CompleteElapsedBookings,
};
