// Route handlers, one module per resource.

pub mod analyze;
pub mod media_kit;
pub mod readiness;
