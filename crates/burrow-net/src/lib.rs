//! Networking: the byte-stream backend abstraction, its `std::net` TCP
//! implementation, the single-request Gopher transport, and the search
//! engine table.

mod backend;
mod client;
mod search;

pub use backend::{NetworkBackend, NetworkStream, TcpBackend, TcpNetworkStream};
pub use client::{ConnectionState, GopherConnection, READ_CHUNK_SIZE, decode_response};
pub use search::{SearchEngine, builtin_search_engines, find_engine, parse_search_engines};

#[cfg(test)]
mod tests;
