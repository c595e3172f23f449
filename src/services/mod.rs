// Services module for business logic
pub mod elastic_client;
pub mod frequency_reader;
pub mod indexer;
pub mod normalizer;
