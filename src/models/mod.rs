//! Data models for the library records server

pub mod account;
pub mod checkout;
pub mod item;
pub mod reservation;

// Re-export commonly used types
pub use account::Account;
pub use checkout::{Checkout, CheckoutDetails, NewCheckout};
pub use item::{Item, ItemDetails, ItemState};
pub use reservation::Reservation;
