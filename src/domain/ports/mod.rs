//! Domain ports: interfaces the domain expects from the outside world

pub mod security;

pub use security::{AuthenticationManager, PasswordEncoder, Principal};
