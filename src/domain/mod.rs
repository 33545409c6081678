// Domain layer: invoice models and the remote execution port.

pub mod amount;
pub mod model;
pub mod ports;
