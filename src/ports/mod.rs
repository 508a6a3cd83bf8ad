pub mod file_sink;
pub mod page_fetcher;
pub mod serializer;
