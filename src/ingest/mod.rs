/// Feed ingestion: alias tables, station extraction, and HTTP retrieval.

pub mod aliases;
pub mod feed;
pub mod fetch;

#[cfg(test)]
pub(crate) mod fixtures;
