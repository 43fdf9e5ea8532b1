pub mod generation_service;
pub mod mint;
pub mod persona_service;
