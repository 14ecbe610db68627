//! This project is split in 2 main modules:
//!
//! - [gateway] (Swipe Checkout implementation)
//! - [connect] (connect API surface)
#![doc = include_str!("../README.md")]

/// Environment configuration
pub mod config;

/// Implementation of the connect API
///
/// This module defines the types and endpoints the payment platform uses to reach the gateway.
pub mod connect;

/// Gateway integration implementation
///
/// This module defines the types and methods to communicate with an external gateway. In this case it is Swipe Checkout
pub mod gateway;
pub mod state;
