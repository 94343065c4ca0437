pub mod clients;
pub mod dialogue;
pub mod matcher;
pub mod notify;
pub mod otp;
pub mod phone;
