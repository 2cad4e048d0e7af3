mod logs;
mod metrics;
mod shutdown;
mod tracing_context;

pub use self::logs::init_logger;
pub use self::metrics::{Labels, Method, Metrics, Status};
pub use self::shutdown::shutdown_signal;
pub use self::tracing_context::TracingContext;
