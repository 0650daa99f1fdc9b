//! Aphorist Gatekeeper
//!
//! Guards the expensive path of a critique request.
//!
//! The Gatekeeper provides:
//! - Input validation (empty, length bounds, low-signal text)
//! - Sliding-window rate limiting for the remote model call
//!
//! # Examples
//!
//! ```
//! use aphorist_gatekeeper::{InputValidator, RateLimiter, ValidationConfig};
//! use std::time::Duration;
//!
//! let validator = InputValidator::new(ValidationConfig::default());
//! let cleaned = validator.validate("  Fortune favors the bold.  ").unwrap();
//! assert_eq!(cleaned, "Fortune favors the bold.");
//!
//! let limiter = RateLimiter::new(15, Duration::from_secs(60));
//! assert!(limiter.try_acquire());
//! ```

#![warn(missing_docs)]

mod clock;
mod config;
mod error;
mod rate_limit;
mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ValidationConfig;
pub use error::InputRejection;
pub use rate_limit::RateLimiter;
pub use validator::InputValidator;
