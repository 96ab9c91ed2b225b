/// Property identifiers served by the simulated device and its analog input.
///
/// Identifiers the simulator does not serve decode to [`Other`](Self::Other)
/// so that requests for them can be answered with an unknown-property error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    ApduTimeout,
    CovIncrement,
    DatabaseRevision,
    DeviceAddressBinding,
    EventState,
    MaxApduLengthAccepted,
    MaxSegmentsAccepted,
    NumberOfApduRetries,
    ObjectIdentifier,
    ObjectList,
    ObjectName,
    ObjectType,
    OutOfService,
    PresentValue,
    ProtocolObjectTypesSupported,
    ProtocolRevision,
    ProtocolServicesSupported,
    ProtocolVersion,
    SegmentationSupported,
    StatusFlags,
    SystemStatus,
    Units,
    VendorIdentifier,
    Other(u32),
}

impl PropertyId {
    pub const fn to_u32(self) -> u32 {
        match self {
            Self::ApduTimeout => 11,
            Self::CovIncrement => 22,
            Self::DeviceAddressBinding => 30,
            Self::EventState => 36,
            Self::MaxApduLengthAccepted => 62,
            Self::NumberOfApduRetries => 73,
            Self::ObjectIdentifier => 75,
            Self::ObjectList => 76,
            Self::ObjectName => 77,
            Self::ObjectType => 79,
            Self::OutOfService => 81,
            Self::PresentValue => 85,
            Self::ProtocolObjectTypesSupported => 96,
            Self::ProtocolServicesSupported => 97,
            Self::ProtocolVersion => 98,
            Self::SegmentationSupported => 107,
            Self::StatusFlags => 111,
            Self::SystemStatus => 112,
            Self::Units => 117,
            Self::VendorIdentifier => 120,
            Self::ProtocolRevision => 139,
            Self::DatabaseRevision => 155,
            Self::MaxSegmentsAccepted => 167,
            Self::Other(v) => v,
        }
    }

    pub const fn from_u32(value: u32) -> Self {
        match value {
            11 => Self::ApduTimeout,
            22 => Self::CovIncrement,
            30 => Self::DeviceAddressBinding,
            36 => Self::EventState,
            62 => Self::MaxApduLengthAccepted,
            73 => Self::NumberOfApduRetries,
            75 => Self::ObjectIdentifier,
            76 => Self::ObjectList,
            77 => Self::ObjectName,
            79 => Self::ObjectType,
            81 => Self::OutOfService,
            85 => Self::PresentValue,
            96 => Self::ProtocolObjectTypesSupported,
            97 => Self::ProtocolServicesSupported,
            98 => Self::ProtocolVersion,
            107 => Self::SegmentationSupported,
            111 => Self::StatusFlags,
            112 => Self::SystemStatus,
            117 => Self::Units,
            120 => Self::VendorIdentifier,
            139 => Self::ProtocolRevision,
            155 => Self::DatabaseRevision,
            167 => Self::MaxSegmentsAccepted,
            v => Self::Other(v),
        }
    }
}
