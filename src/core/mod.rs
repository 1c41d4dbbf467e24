pub mod chat;
pub mod completion;
pub mod config;
pub mod controller;
pub mod message;
pub mod persistence;
pub mod session;
pub mod startup;
pub mod store;
