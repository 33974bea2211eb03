// Appointments and quotes - the business records whose changes drive the
// contact pipeline and feed commission tallies

pub mod appointments;
pub mod quotes;

pub use appointments::{Appointment, AppointmentStatus};
pub use quotes::{ActivityError, Quote, QuoteStatus};
