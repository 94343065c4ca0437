pub mod clients;
pub mod health;
pub mod otp;
pub mod professionals;
pub mod webhook;
pub mod whatsapp;
