// Domain layer: records exchanged with the backend and the ports the app depends on.

pub mod model;
pub mod ports;
