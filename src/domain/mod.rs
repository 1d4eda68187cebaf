// Domain layer: models, ports and the analysis schema table. No HTTP or file system here.

pub mod model;
pub mod ports;
pub mod schema;
