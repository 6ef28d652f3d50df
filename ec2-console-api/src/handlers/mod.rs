// Handlers module - Centralizes all request handlers
pub mod control;
pub mod instances;
