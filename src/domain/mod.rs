// Domain layer: value types and ports. No knowledge of files or the host viewer.

pub mod model;
pub mod ports;
