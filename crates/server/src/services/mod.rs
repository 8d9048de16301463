//! External services used by the API.
//!
//! # Services
//!
//! - [`weather`] - Open-Meteo readings worded by the assistant
//! - [`identity`] - Google, Supabase and guest sign-in

pub mod identity;
pub mod weather;

pub use identity::{IdentityError, IdentityService};
pub use weather::{CurrentConditions, Weather, WeatherError, WeatherService};
