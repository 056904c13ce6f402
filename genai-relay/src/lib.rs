//! genai-relay: HTTP relay in front of a generative-AI text model.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;
