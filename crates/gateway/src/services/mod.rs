//! Side services invoked by handlers after a gateway call succeeds.
//!
//! - `email` - Order confirmation email over SMTP

pub mod email;

pub use email::{EmailError, OrderNotifier};
