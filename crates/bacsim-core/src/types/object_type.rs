/// Object types the simulator exposes; anything else is carried as its raw number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectType {
    AnalogInput,
    AnalogValue,
    BinaryInput,
    Device,
    Other(u16),
}

impl ObjectType {
    pub const fn to_u16(self) -> u16 {
        match self {
            Self::AnalogInput => 0,
            Self::AnalogValue => 2,
            Self::BinaryInput => 3,
            Self::Device => 8,
            Self::Other(v) => v,
        }
    }

    pub const fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::AnalogInput,
            2 => Self::AnalogValue,
            3 => Self::BinaryInput,
            8 => Self::Device,
            v => Self::Other(v),
        }
    }
}
