pub(crate) mod editor;
pub(crate) mod glyphs;
pub(crate) mod palette;
