// Domain layer: contract models and ports (interfaces) to the remote service.

pub mod model;
pub mod ports;
