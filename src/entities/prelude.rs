pub use super::admin_tokens::Entity as AdminTokens;
pub use super::artworks::Entity as Artworks;
