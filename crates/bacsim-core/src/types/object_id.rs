use crate::types::ObjectType;

/// Highest instance number representable in the 22-bit instance field.
pub const MAX_INSTANCE: u32 = 0x3F_FFFF;

/// A packed BACnet object identifier: 10-bit object type over a 22-bit
/// instance number, exactly as it travels on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectId(u32);

impl ObjectId {
    pub const fn new(object_type: ObjectType, instance: u32) -> Self {
        Self(((object_type.to_u16() as u32 & 0x03FF) << 22) | (instance & MAX_INSTANCE))
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn object_type(self) -> ObjectType {
        ObjectType::from_u16(((self.0 >> 22) & 0x03FF) as u16)
    }

    pub const fn instance(self) -> u32 {
        self.0 & MAX_INSTANCE
    }
}

#[cfg(test)]
mod tests {
    use super::ObjectId;
    use crate::types::ObjectType;

    #[test]
    fn packs_type_over_instance() {
        let id = ObjectId::new(ObjectType::Device, 599);
        assert_eq!(id.raw(), 0x0200_0257);
        assert_eq!(id.object_type(), ObjectType::Device);
        assert_eq!(id.instance(), 599);
        assert_eq!(ObjectId::new(ObjectType::AnalogInput, 1).raw(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_raw_value() {
        let id = ObjectId::new(ObjectType::AnalogInput, 1);
        assert_eq!(serde_json::to_string(&id).unwrap(), "1");
    }
}
