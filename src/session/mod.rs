pub(crate) mod booth;
pub(crate) mod controller;
