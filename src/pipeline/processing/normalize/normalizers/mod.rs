// Individual normalizer implementations
pub mod kaspiko;
pub mod rosgranstroy;

// Re-export the main components
pub use kaspiko::KaspikoNormalizer;
pub use rosgranstroy::RosgranstroyNormalizer;
