pub(crate) mod countdown;
pub(crate) mod engine;
pub(crate) mod still;
