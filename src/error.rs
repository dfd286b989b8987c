/*
 * Error type shared by the animation engine, the widget core and the Win32
 * backends. Every fallible operation in the crate returns `Result<T>`; failures
 * are logged where they occur and handed back to the caller, never escalated.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Operation failed: {0}")]
    OperationFailed(String),
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),
    #[error("Not ready: {0}")]
    NotReady(String),
    #[error("Already initialized: {0}")]
    AlreadyInitialized(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Animation error: {0}")]
    Animation(String),
    #[error("Drawing error: {0}")]
    Drawing(String),
    #[error("Unknown group member: {0}")]
    UnknownMember(u32),
    #[cfg(target_os = "windows")]
    #[error(transparent)]
    Win32(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, PlatformError>;
