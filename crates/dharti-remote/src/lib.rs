//! HTTP clients for the hosted services: address geocoding, the listings
//! table and chat completion.

mod http;
pub mod completion;
pub mod geocoder;
pub mod records;

pub use completion::ChatCompletionClient;
pub use geocoder::HttpGeocoder;
pub use records::PostgrestRecordSource;
