pub mod tcp_adapter;

pub use tcp_adapter::{handle_connection, TcpAdapter};
