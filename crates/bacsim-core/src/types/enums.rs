/// Segmentation capability advertised in I-Am and `segmentation-supported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[repr(u8)]
pub enum Segmentation {
    SegmentedBoth = 0,
    SegmentedTransmit = 1,
    SegmentedReceive = 2,
    NoSegmentation = 3,
}

impl Segmentation {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }

    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::SegmentedBoth),
            1 => Some(Self::SegmentedTransmit),
            2 => Some(Self::SegmentedReceive),
            3 => Some(Self::NoSegmentation),
            _ => None,
        }
    }
}

/// Event state of an object. The simulator only ever reports `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum EventState {
    Normal = 0,
    Fault = 1,
    Offnormal = 2,
    HighLimit = 3,
    LowLimit = 4,
}

impl EventState {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Subset of the engineering-units enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum EngineeringUnits {
    DegreesCelsius = 62,
    DegreesFahrenheit = 64,
    Percent = 98,
    NoUnits = 95,
}

impl EngineeringUnits {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Device `system-status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DeviceStatus {
    Operational = 0,
    OperationalReadOnly = 1,
    NonOperational = 4,
}

impl DeviceStatus {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// BACnet error class reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorClass {
    Device = 0,
    Object = 1,
    Property = 2,
    Services = 5,
}

impl ErrorClass {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// BACnet error code reported in Error PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    Other = 0,
    UnknownObject = 31,
    UnknownProperty = 32,
    InvalidArrayIndex = 42,
    PropertyIsNotAnArray = 50,
}

impl ErrorCode {
    pub const fn to_u32(self) -> u32 {
        self as u32
    }
}

/// Reject reasons carried by Reject PDUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RejectReason {
    Other = 0,
    InvalidTag = 4,
    MissingRequiredParameter = 5,
    UnrecognizedService = 9,
}

impl RejectReason {
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}
