pub mod parameter_error_handler;
pub mod validate;
pub mod write_gate;

pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use write_gate::WriteGate;
