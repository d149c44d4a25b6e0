// Domain layer: the assessment entity, run outcomes and the ports the core depends on.

pub mod model;
pub mod ports;
