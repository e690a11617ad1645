pub(crate) mod expr;
pub(crate) mod raster;
pub(crate) mod registry;
