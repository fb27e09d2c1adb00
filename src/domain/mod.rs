// Domain layer: request-scoped models and ports (interfaces). No dependencies beyond std, serde and chrono.

pub mod model;
pub mod ports;
