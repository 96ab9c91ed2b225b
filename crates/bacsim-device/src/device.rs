//! In-memory model of the simulated device and its single data point.

use crate::{SimConfig, SimError};
use bacsim_core::types::object_id::MAX_INSTANCE;
use bacsim_core::types::{EngineeringUnits, EventState, ObjectId, ObjectType, Segmentation};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub const DEFAULT_MAX_SEGMENTS: u32 = 16;
pub const DEFAULT_APDU_TIMEOUT_MS: u32 = 3000;
pub const DEFAULT_APDU_RETRIES: u32 = 3;

/// Identity attributes the device announces in I-Am and exposes on its
/// device object.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DeviceIdentity {
    name: String,
    instance: u32,
    pub max_apdu: u32,
    pub segmentation: Segmentation,
    pub vendor_id: u32,
    pub max_segments: u32,
    pub apdu_timeout_ms: u32,
    pub apdu_retries: u32,
    pub database_revision: u32,
}

impl DeviceIdentity {
    /// Validates the name and instance. Instance 4194303 is the Who-Is
    /// wildcard and cannot be owned by a device.
    pub fn new(
        name: impl Into<String>,
        instance: u32,
        max_apdu: u32,
        segmentation: Segmentation,
        vendor_id: u32,
    ) -> Result<Self, SimError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SimError::InvalidIdentity("device name must not be empty"));
        }
        if instance >= MAX_INSTANCE {
            return Err(SimError::InvalidIdentity(
                "device instance must be in 0..=4194302",
            ));
        }
        Ok(Self {
            name,
            instance,
            max_apdu,
            segmentation,
            vendor_id,
            max_segments: DEFAULT_MAX_SEGMENTS,
            apdu_timeout_ms: DEFAULT_APDU_TIMEOUT_MS,
            apdu_retries: DEFAULT_APDU_RETRIES,
            database_revision: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instance(&self) -> u32 {
        self.instance
    }

    pub fn object_id(&self) -> ObjectId {
        ObjectId::new(ObjectType::Device, self.instance)
    }
}

/// Analog-input point whose present value is mutated by the value simulator
/// while the protocol stack reads it.
///
/// The value is kept as `f32` bits in an atomic: one writer, any number of
/// readers, no ordering requirement between them.
#[derive(Debug)]
pub struct AnalogPoint {
    object_id: ObjectId,
    name: String,
    present_value: AtomicU32,
    cov_increment: f32,
    units: EngineeringUnits,
}

pub type SharedPoint = Arc<AnalogPoint>;

impl AnalogPoint {
    pub fn new(
        instance: u32,
        name: impl Into<String>,
        initial_value: f32,
        cov_increment: f32,
        units: EngineeringUnits,
    ) -> Self {
        Self {
            object_id: ObjectId::new(ObjectType::AnalogInput, instance),
            name: name.into(),
            present_value: AtomicU32::new(initial_value.to_bits()),
            cov_increment,
            units,
        }
    }

    pub fn object_id(&self) -> ObjectId {
        self.object_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn present_value(&self) -> f32 {
        f32::from_bits(self.present_value.load(Ordering::Relaxed))
    }

    pub fn set_present_value(&self, value: f32) {
        self.present_value.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Adds `delta` and returns the new value. Only the simulator writes, so
    /// a plain load/store pair is enough.
    pub fn offset(&self, delta: f32) -> f32 {
        let next = self.present_value() + delta;
        self.set_present_value(next);
        next
    }

    pub fn cov_increment(&self) -> f32 {
        self.cov_increment
    }

    pub fn units(&self) -> EngineeringUnits {
        self.units
    }

    pub fn event_state(&self) -> EventState {
        EventState::Normal
    }

    pub fn out_of_service(&self) -> bool {
        false
    }

    /// `in-alarm`, `fault`, `overridden`, `out-of-service`: all clear.
    pub fn status_flags(&self) -> [bool; 4] {
        [false; 4]
    }
}

/// The simulated device: identity plus its object list.
#[derive(Debug)]
pub struct DeviceModel {
    identity: DeviceIdentity,
    objects: Vec<SharedPoint>,
}

impl DeviceModel {
    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Installs the device's one data point. The object list is fixed after
    /// the first call.
    pub fn attach(&mut self, point: SharedPoint) -> Result<(), SimError> {
        if !self.objects.is_empty() {
            return Err(SimError::AlreadyAttached);
        }
        self.objects.push(point);
        Ok(())
    }

    pub fn object_list(&self) -> &[SharedPoint] {
        &self.objects
    }

    pub fn point(&self) -> Option<&SharedPoint> {
        self.objects.first()
    }
}

pub fn build_device(identity: DeviceIdentity) -> DeviceModel {
    DeviceModel {
        identity,
        objects: Vec::new(),
    }
}

pub fn build_analog_point(config: &SimConfig, initial_value: f32) -> SharedPoint {
    Arc::new(AnalogPoint::new(
        config.point_instance,
        config.point_name.clone(),
        initial_value,
        config.cov_increment,
        config.units,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock_device() -> DeviceModel {
        build_device(SimConfig::default().identity().unwrap())
    }

    #[test]
    fn attach_installs_the_same_point() {
        let mut device = stock_device();
        assert!(device.object_list().is_empty());

        let point = build_analog_point(&SimConfig::default(), 22.5);
        device.attach(point.clone()).unwrap();

        assert_eq!(device.object_list().len(), 1);
        assert!(Arc::ptr_eq(&device.object_list()[0], &point));
    }

    #[test]
    fn second_attach_is_refused() {
        let mut device = stock_device();
        let cfg = SimConfig::default();
        device.attach(build_analog_point(&cfg, 22.5)).unwrap();

        let err = device.attach(build_analog_point(&cfg, 10.0)).unwrap_err();
        assert!(matches!(err, SimError::AlreadyAttached));
        assert_eq!(device.object_list().len(), 1);
        assert_eq!(device.object_list()[0].present_value(), 22.5);
    }

    #[test]
    fn analog_point_carries_fixed_metadata() {
        let point = build_analog_point(&SimConfig::default(), 22.5);
        assert_eq!(point.object_id(), ObjectId::new(ObjectType::AnalogInput, 1));
        assert_eq!(point.name(), "RoomTemperature");
        assert_eq!(point.units(), EngineeringUnits::DegreesCelsius);
        assert_eq!(point.cov_increment(), 0.5);
        assert_eq!(point.event_state(), EventState::Normal);
        assert!(!point.out_of_service());
        assert_eq!(point.status_flags(), [false; 4]);
    }

    #[test]
    fn offset_is_visible_through_shared_handles() {
        let point = build_analog_point(&SimConfig::default(), 22.5);
        let reader = point.clone();
        assert_eq!(point.offset(0.25), 22.75);
        assert_eq!(reader.present_value(), 22.75);
    }

    #[test]
    fn identity_validation() {
        let err = DeviceIdentity::new("", 1, 1024, Segmentation::NoSegmentation, 0).unwrap_err();
        assert!(matches!(err, SimError::InvalidIdentity(_)));
        let err = DeviceIdentity::new("dev", MAX_INSTANCE, 1024, Segmentation::NoSegmentation, 0)
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidIdentity(_)));

        let identity =
            DeviceIdentity::new("dev", MAX_INSTANCE - 1, 1024, Segmentation::NoSegmentation, 0)
                .unwrap();
        assert_eq!(
            identity.object_id(),
            ObjectId::new(ObjectType::Device, 4_194_302)
        );
    }
}
