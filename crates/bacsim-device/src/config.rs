use crate::device::DeviceIdentity;
use crate::SimError;
use bacsim_core::types::{EngineeringUnits, Segmentation};
use bacsim_datalink::DataLinkAddress;
use std::time::Duration;

/// Fixed attributes of the simulated sensor.
///
/// `Default` yields the stock temperature sensor; the CLI only overrides the
/// port, the probe timeout and the perturbation seed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub device_name: String,
    pub device_instance: u32,
    pub max_apdu: u32,
    pub segmentation: Segmentation,
    pub vendor_id: u32,
    pub point_instance: u32,
    pub point_name: String,
    pub initial_value: f32,
    pub cov_increment: f32,
    pub units: EngineeringUnits,
    pub tick_interval: Duration,
    /// Half-width of the uniform perturbation applied each tick.
    pub perturbation_range: f32,
    pub port: u16,
    pub probe_timeout: Duration,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            device_name: "SimulatedTemperatureSensor".to_string(),
            device_instance: 599,
            max_apdu: 1024,
            segmentation: Segmentation::SegmentedBoth,
            vendor_id: 15,
            point_instance: 1,
            point_name: "RoomTemperature".to_string(),
            initial_value: 22.5,
            cov_increment: 0.5,
            units: EngineeringUnits::DegreesCelsius,
            tick_interval: Duration::from_secs(5),
            perturbation_range: 0.2,
            port: DataLinkAddress::BACNET_IP_DEFAULT_PORT,
            probe_timeout: Duration::from_secs(2),
        }
    }
}

impl SimConfig {
    pub fn identity(&self) -> Result<DeviceIdentity, SimError> {
        DeviceIdentity::new(
            self.device_name.clone(),
            self.device_instance,
            self.max_apdu,
            self.segmentation,
            self.vendor_id,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SimConfig;
    use bacsim_core::types::Segmentation;
    use std::time::Duration;

    #[test]
    fn defaults_describe_the_stock_sensor() {
        let cfg = SimConfig::default();
        assert_eq!(cfg.device_instance, 599);
        assert_eq!(cfg.max_apdu, 1024);
        assert_eq!(cfg.segmentation, Segmentation::SegmentedBoth);
        assert_eq!(cfg.vendor_id, 15);
        assert_eq!(cfg.point_name, "RoomTemperature");
        assert_eq!(cfg.initial_value, 22.5);
        assert_eq!(cfg.tick_interval, Duration::from_secs(5));
        assert_eq!(cfg.port, 0xBAC0);

        let identity = cfg.identity().unwrap();
        assert_eq!(identity.name(), "SimulatedTemperatureSensor");
        assert_eq!(identity.instance(), 599);
    }
}
