pub use super::product_metadata::Entity as ProductMetadata;
