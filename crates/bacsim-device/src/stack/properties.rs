use super::bip::{AnalogInputObject, LocalDevice};
use bacsim_core::types::object_id::MAX_INSTANCE;
use bacsim_core::types::{
    BitString, DataValue, DeviceStatus, ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId,
};

const PROTOCOL_VERSION: u32 = 1;
const PROTOCOL_REVISION: u32 = 14;

// Positions in the services-supported bit string.
const SERVICE_BIT_READ_PROPERTY: usize = 12;
const SERVICE_BIT_I_AM: usize = 26;
const SERVICE_BIT_WHO_IS: usize = 34;

// Bit string lengths at protocol revision 14.
const SERVICES_SUPPORTED_LEN: usize = 41;
const OBJECT_TYPES_SUPPORTED_LEN: usize = 55;

const fn packed_bits<const N: usize>(bits: &[usize]) -> [u8; N] {
    let mut octets = [0u8; N];
    let mut i = 0;
    while i < bits.len() {
        octets[bits[i] / 8] |= 0x80u8 >> (bits[i] % 8);
        i += 1;
    }
    octets
}

static SERVICES_SUPPORTED: [u8; SERVICES_SUPPORTED_LEN.div_ceil(8)] = packed_bits(&[
    SERVICE_BIT_READ_PROPERTY,
    SERVICE_BIT_I_AM,
    SERVICE_BIT_WHO_IS,
]);

static OBJECT_TYPES_SUPPORTED: [u8; OBJECT_TYPES_SUPPORTED_LEN.div_ceil(8)] = packed_bits(&[
    ObjectType::AnalogInput.to_u16() as usize,
    ObjectType::Device.to_u16() as usize,
]);

/// Every status-flags octet: the four flags occupy the high nibble.
static STATUS_FLAG_OCTETS: [u8; 16] = [
    0x00, 0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90, 0xA0, 0xB0, 0xC0, 0xD0, 0xE0,
    0xF0,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyError {
    UnknownObject,
    UnknownProperty,
    NotAnArray,
    InvalidArrayIndex,
}

impl PropertyError {
    pub(crate) fn class_and_code(self) -> (ErrorClass, ErrorCode) {
        match self {
            Self::UnknownObject => (ErrorClass::Object, ErrorCode::UnknownObject),
            Self::UnknownProperty => (ErrorClass::Property, ErrorCode::UnknownProperty),
            Self::NotAnArray => (ErrorClass::Property, ErrorCode::PropertyIsNotAnArray),
            Self::InvalidArrayIndex => (ErrorClass::Property, ErrorCode::InvalidArrayIndex),
        }
    }
}

enum PropertyValue<'a> {
    Scalar(DataValue<'a>),
    Array(Vec<DataValue<'a>>),
    List(Vec<DataValue<'a>>),
}

fn supported_bits(octets: &'static [u8], len: usize) -> DataValue<'static> {
    let unused = octets.len() * 8 - len;
    DataValue::BitString(BitString::new(unused as u8, octets))
}

fn status_flags(flags: [bool; 4]) -> DataValue<'static> {
    let nibble = flags
        .iter()
        .enumerate()
        .filter(|(_, set)| **set)
        .fold(0usize, |acc, (bit, _)| acc | (0x8 >> bit));
    DataValue::BitString(BitString::new(
        4,
        core::slice::from_ref(&STATUS_FLAG_OCTETS[nibble]),
    ))
}

fn device_property<'a>(
    device: &'a LocalDevice,
    objects: &[AnalogInputObject],
    property: PropertyId,
) -> Option<PropertyValue<'a>> {
    let identity = device.identity();
    let value = match property {
        PropertyId::ObjectIdentifier => DataValue::ObjectId(identity.object_id()),
        PropertyId::ObjectName => DataValue::CharacterString(identity.name()),
        PropertyId::ObjectType => DataValue::Enumerated(u32::from(ObjectType::Device.to_u16())),
        PropertyId::ObjectList => {
            let mut list = Vec::with_capacity(objects.len() + 1);
            list.push(DataValue::ObjectId(identity.object_id()));
            list.extend(objects.iter().map(|o| DataValue::ObjectId(o.object_id())));
            return Some(PropertyValue::Array(list));
        }
        PropertyId::VendorIdentifier => DataValue::Unsigned(identity.vendor_id),
        PropertyId::MaxApduLengthAccepted => DataValue::Unsigned(identity.max_apdu),
        PropertyId::SegmentationSupported => {
            DataValue::Enumerated(identity.segmentation.to_u32())
        }
        PropertyId::ProtocolVersion => DataValue::Unsigned(PROTOCOL_VERSION),
        PropertyId::ProtocolRevision => DataValue::Unsigned(PROTOCOL_REVISION),
        PropertyId::SystemStatus => DataValue::Enumerated(DeviceStatus::Operational.to_u32()),
        PropertyId::ProtocolServicesSupported => {
            supported_bits(&SERVICES_SUPPORTED, SERVICES_SUPPORTED_LEN)
        }
        PropertyId::ProtocolObjectTypesSupported => {
            supported_bits(&OBJECT_TYPES_SUPPORTED, OBJECT_TYPES_SUPPORTED_LEN)
        }
        PropertyId::MaxSegmentsAccepted => DataValue::Unsigned(identity.max_segments),
        PropertyId::ApduTimeout => DataValue::Unsigned(identity.apdu_timeout_ms),
        PropertyId::NumberOfApduRetries => DataValue::Unsigned(identity.apdu_retries),
        PropertyId::DatabaseRevision => DataValue::Unsigned(identity.database_revision),
        // No peers are bound; the device answers whoever asks.
        PropertyId::DeviceAddressBinding => return Some(PropertyValue::List(Vec::new())),
        _ => return None,
    };
    Some(PropertyValue::Scalar(value))
}

fn analog_input_property(object: &AnalogInputObject, property: PropertyId) -> Option<PropertyValue<'_>> {
    let point = object.point();
    let value = match property {
        PropertyId::ObjectIdentifier => DataValue::ObjectId(point.object_id()),
        PropertyId::ObjectName => DataValue::CharacterString(point.name()),
        PropertyId::ObjectType => {
            DataValue::Enumerated(u32::from(ObjectType::AnalogInput.to_u16()))
        }
        PropertyId::PresentValue => DataValue::Real(point.present_value()),
        PropertyId::StatusFlags => status_flags(point.status_flags()),
        PropertyId::EventState => DataValue::Enumerated(point.event_state().to_u32()),
        PropertyId::OutOfService => DataValue::Boolean(point.out_of_service()),
        PropertyId::Units => DataValue::Enumerated(point.units().to_u32()),
        PropertyId::CovIncrement => DataValue::Real(point.cov_increment()),
        _ => return None,
    };
    Some(PropertyValue::Scalar(value))
}

/// Maps the wildcard device instance onto the local device object.
pub(crate) fn resolve_object_id(device: &LocalDevice, object_id: ObjectId) -> ObjectId {
    if object_id.object_type() == ObjectType::Device && object_id.instance() == MAX_INSTANCE {
        device.identity().object_id()
    } else {
        object_id
    }
}

/// Resolves a ReadProperty against the device and its objects. Index 0 of an
/// array reads its length.
pub(crate) fn read_property<'a>(
    device: &'a LocalDevice,
    objects: &'a [AnalogInputObject],
    object_id: ObjectId,
    property: PropertyId,
    array_index: Option<u32>,
) -> Result<Vec<DataValue<'a>>, PropertyError> {
    let object_id = resolve_object_id(device, object_id);
    let resolved = if object_id == device.identity().object_id() {
        device_property(device, objects, property)
    } else {
        let object = objects
            .iter()
            .find(|o| o.object_id() == object_id)
            .ok_or(PropertyError::UnknownObject)?;
        analog_input_property(object, property)
    };
    let value = resolved.ok_or(PropertyError::UnknownProperty)?;

    match (value, array_index) {
        (PropertyValue::Scalar(v), None) => Ok(vec![v]),
        (PropertyValue::Scalar(_), Some(_)) => Err(PropertyError::NotAnArray),
        (PropertyValue::Array(items) | PropertyValue::List(items), None) => Ok(items),
        (PropertyValue::List(_), Some(_)) => Err(PropertyError::NotAnArray),
        (PropertyValue::Array(items), Some(0)) => {
            let len = u32::try_from(items.len()).map_err(|_| PropertyError::InvalidArrayIndex)?;
            Ok(vec![DataValue::Unsigned(len)])
        }
        (PropertyValue::Array(items), Some(index)) => usize::try_from(index - 1)
            .ok()
            .and_then(|i| items.get(i).copied())
            .map(|v| vec![v])
            .ok_or(PropertyError::InvalidArrayIndex),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::bip::{AnalogInputObject, LocalDevice};
    use crate::{build_analog_point, SimConfig};

    fn fixture() -> (LocalDevice, Vec<AnalogInputObject>) {
        let cfg = SimConfig::default();
        let device = LocalDevice::new(cfg.identity().unwrap());
        let objects = vec![AnalogInputObject::new(build_analog_point(&cfg, 22.5))];
        (device, objects)
    }

    fn ai1() -> ObjectId {
        ObjectId::new(ObjectType::AnalogInput, 1)
    }

    fn dev() -> ObjectId {
        ObjectId::new(ObjectType::Device, 599)
    }

    #[test]
    fn device_scalars() {
        let (device, objects) = fixture();
        let read = |p| read_property(&device, &objects, dev(), p, None).unwrap();
        assert_eq!(
            read(PropertyId::ObjectName),
            vec![DataValue::CharacterString("SimulatedTemperatureSensor")]
        );
        assert_eq!(read(PropertyId::VendorIdentifier), vec![DataValue::Unsigned(15)]);
        assert_eq!(
            read(PropertyId::MaxApduLengthAccepted),
            vec![DataValue::Unsigned(1024)]
        );
        assert_eq!(
            read(PropertyId::SegmentationSupported),
            vec![DataValue::Enumerated(0)]
        );
        assert_eq!(read(PropertyId::ProtocolRevision), vec![DataValue::Unsigned(14)]);
        assert_eq!(read(PropertyId::SystemStatus), vec![DataValue::Enumerated(0)]);
        assert_eq!(read(PropertyId::ApduTimeout), vec![DataValue::Unsigned(3000)]);
        assert_eq!(read(PropertyId::NumberOfApduRetries), vec![DataValue::Unsigned(3)]);
        assert_eq!(read(PropertyId::MaxSegmentsAccepted), vec![DataValue::Unsigned(16)]);
        assert_eq!(read(PropertyId::DatabaseRevision), vec![DataValue::Unsigned(0)]);
        assert!(read(PropertyId::DeviceAddressBinding).is_empty());
    }

    #[test]
    fn supported_services_and_object_types() {
        let (device, objects) = fixture();
        let bits = |p| {
            let values = read_property(&device, &objects, dev(), p, None).unwrap();
            match values.as_slice() {
                [DataValue::BitString(b)] => *b,
                other => panic!("expected one bit string, got {other:?}"),
            }
        };
        let set_bits = |b: BitString<'_>| -> Vec<usize> {
            (0..b.len()).filter(|&i| b.bit(i) == Some(true)).collect()
        };

        let services = bits(PropertyId::ProtocolServicesSupported);
        assert_eq!(services.len(), 41);
        assert_eq!(services.data, &[0x00, 0x08, 0x00, 0x20, 0x20, 0x00]);
        assert_eq!(set_bits(services), vec![12, 26, 34]);

        let types = bits(PropertyId::ProtocolObjectTypesSupported);
        assert_eq!(types.len(), 55);
        assert_eq!(set_bits(types), vec![0, 8]);
    }

    #[test]
    fn address_binding_is_a_list_not_an_array() {
        let (device, objects) = fixture();
        assert_eq!(
            read_property(&device, &objects, dev(), PropertyId::DeviceAddressBinding, Some(0)),
            Err(PropertyError::NotAnArray)
        );
    }

    #[test]
    fn wildcard_instance_reads_local_device() {
        let (device, objects) = fixture();
        let wildcard = ObjectId::new(ObjectType::Device, MAX_INSTANCE);
        assert_eq!(resolve_object_id(&device, wildcard), dev());
        assert_eq!(resolve_object_id(&device, ai1()), ai1());
        assert_eq!(
            read_property(&device, &objects, wildcard, PropertyId::ObjectName, None),
            Ok(vec![DataValue::CharacterString("SimulatedTemperatureSensor")])
        );
        assert_eq!(
            read_property(&device, &objects, wildcard, PropertyId::ObjectIdentifier, None),
            Ok(vec![DataValue::ObjectId(dev())])
        );

        let other_device = ObjectId::new(ObjectType::Device, 600);
        assert_eq!(
            read_property(&device, &objects, other_device, PropertyId::ObjectName, None),
            Err(PropertyError::UnknownObject)
        );
    }

    #[test]
    fn object_list_indexing() {
        let (device, objects) = fixture();
        let read = |i| read_property(&device, &objects, dev(), PropertyId::ObjectList, i);
        assert_eq!(
            read(None).unwrap(),
            vec![DataValue::ObjectId(dev()), DataValue::ObjectId(ai1())]
        );
        assert_eq!(read(Some(0)).unwrap(), vec![DataValue::Unsigned(2)]);
        assert_eq!(read(Some(2)).unwrap(), vec![DataValue::ObjectId(ai1())]);
        assert_eq!(read(Some(3)), Err(PropertyError::InvalidArrayIndex));
    }

    #[test]
    fn analog_input_values() {
        let (device, objects) = fixture();
        let read = |p| read_property(&device, &objects, ai1(), p, None).unwrap();
        assert_eq!(read(PropertyId::PresentValue), vec![DataValue::Real(22.5)]);
        assert_eq!(read(PropertyId::Units), vec![DataValue::Enumerated(62)]);
        assert_eq!(read(PropertyId::OutOfService), vec![DataValue::Boolean(false)]);
        assert_eq!(read(PropertyId::CovIncrement), vec![DataValue::Real(0.5)]);
        assert_eq!(
            read(PropertyId::StatusFlags),
            vec![DataValue::BitString(BitString::new(4, &[0x00]))]
        );

        objects[0].point().set_present_value(19.0);
        assert_eq!(read(PropertyId::PresentValue), vec![DataValue::Real(19.0)]);
    }

    #[test]
    fn status_flag_bits_are_msb_first() {
        assert_eq!(
            status_flags([true, false, false, true]),
            DataValue::BitString(BitString::new(4, &[0x90]))
        );
    }

    #[test]
    fn lookup_failures() {
        let (device, objects) = fixture();
        let missing = ObjectId::new(ObjectType::AnalogValue, 7);
        assert_eq!(
            read_property(&device, &objects, missing, PropertyId::PresentValue, None),
            Err(PropertyError::UnknownObject)
        );
        assert_eq!(
            read_property(&device, &objects, ai1(), PropertyId::Other(9999), None),
            Err(PropertyError::UnknownProperty)
        );
        assert_eq!(
            read_property(&device, &objects, ai1(), PropertyId::PresentValue, Some(1)),
            Err(PropertyError::NotAnArray)
        );
    }
}
