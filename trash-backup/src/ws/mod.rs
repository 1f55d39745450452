//! Real-time change notifications.

pub mod hub;
pub mod observer;
