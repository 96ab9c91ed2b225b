pub mod i_am;
pub mod read_property;
pub mod value_codec;
pub mod who_is;
