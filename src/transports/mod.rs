mod http;
mod in_memory_test;

pub use self::http::HttpTransport;
pub use self::in_memory_test::{InMemoryTransport, ResponseBuilder};
