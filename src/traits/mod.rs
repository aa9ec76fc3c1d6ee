mod transport;

pub use transport::QueryTransport;
