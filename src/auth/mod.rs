pub mod hub;
pub mod otp;
pub mod sessions;
pub mod token;
