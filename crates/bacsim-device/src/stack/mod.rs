//! Seam between the simulation runtime and the BACnet protocol stack.

pub mod bip;
mod properties;

use crate::{DeviceIdentity, NetworkBinding, SharedPoint, StackError};
use tokio::sync::watch;

/// Builds stack-side objects and binds them to the network.
pub trait ProtocolStack {
    type Device;
    type Object;
    type Application: StackApplication;

    fn create_local_device(&self, identity: &DeviceIdentity) -> Self::Device;

    fn create_analog_input_object(&self, point: SharedPoint) -> Self::Object;

    async fn bind_application(
        &self,
        device: Self::Device,
        objects: Vec<Self::Object>,
        binding: NetworkBinding,
    ) -> Result<Self::Application, StackError>;
}

/// A bound application serving requests.
pub trait StackApplication {
    /// Answer Who-Is with I-Am.
    fn enable_discovery_responder(&mut self);

    /// Serves until `shutdown` carries `true`.
    async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<(), StackError>;
}
