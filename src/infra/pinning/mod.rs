pub mod client;

pub use client::PinningClient;
