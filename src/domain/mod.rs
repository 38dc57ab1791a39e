// Domain layer: core models and ports (interfaces). No driver or HTTP types leak in here.

pub mod model;
pub mod ports;
