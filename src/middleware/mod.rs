pub mod request_id;

pub use request_id::{create_logging_layer, RequestId, RequestIdLayer, DEFAULT_REQUEST_ID_HEADERS};
