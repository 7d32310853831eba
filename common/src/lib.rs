pub mod address;
pub mod registry;
pub mod serializer;
pub mod token;
