//! Lifecycle of the simulated device: bind, serve, drift, stop.

use crate::stack::{ProtocolStack, StackApplication};
use crate::value_sim::{Perturbation, ValueSimulator};
use crate::{DeviceModel, NetworkBinding, SimError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Uninitialized,
    Configured,
    Running,
    Stopped,
}

/// Cloneable handle that ends a running service.
#[derive(Debug, Clone)]
pub struct StopHandle {
    shutdown: Arc<watch::Sender<bool>>,
    state: watch::Receiver<ServiceState>,
}

impl StopHandle {
    /// Signals the stack loop and the value simulator. Safe to call at any
    /// time, including before `start`.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }
}

pub struct SimulationService {
    device: Option<DeviceModel>,
    binding: Option<NetworkBinding>,
    tick_interval: Duration,
    shutdown: Arc<watch::Sender<bool>>,
    state: watch::Sender<ServiceState>,
}

impl Default for SimulationService {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationService {
    pub fn new() -> Self {
        let (shutdown, _) = watch::channel(false);
        let (state, _) = watch::channel(ServiceState::Uninitialized);
        Self {
            device: None,
            binding: None,
            tick_interval: Duration::from_secs(5),
            shutdown: Arc::new(shutdown),
            state,
        }
    }

    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn state(&self) -> ServiceState {
        *self.state.borrow()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shutdown: self.shutdown.clone(),
            state: self.state.subscribe(),
        }
    }

    fn require(&self, expected: ServiceState) -> Result<(), SimError> {
        let state = self.state();
        if state != expected {
            return Err(SimError::InvalidState { state });
        }
        Ok(())
    }

    /// Takes ownership of a device whose point is already attached.
    pub fn configure(
        &mut self,
        device: DeviceModel,
        binding: NetworkBinding,
    ) -> Result<(), SimError> {
        self.require(ServiceState::Uninitialized)?;
        if device.point().is_none() {
            return Err(SimError::NotAttached);
        }
        self.device = Some(device);
        self.binding = Some(binding);
        self.state.send_replace(ServiceState::Configured);
        Ok(())
    }

    /// Binds the device to `stack`, launches the value simulator and serves
    /// until [`StopHandle::stop`] is called or the stack fails.
    pub async fn start<S, P>(&mut self, stack: &S, source: P) -> Result<(), SimError>
    where
        S: ProtocolStack,
        P: Perturbation,
    {
        self.require(ServiceState::Configured)?;
        let (Some(device), Some(binding)) = (self.device.take(), self.binding.take()) else {
            return Err(SimError::InvalidState {
                state: self.state(),
            });
        };
        let point = device.point().cloned().ok_or(SimError::NotAttached)?;

        let local = stack.create_local_device(device.identity());
        let objects = device
            .object_list()
            .iter()
            .cloned()
            .map(|p| stack.create_analog_input_object(p))
            .collect();
        let mut app = match stack.bind_application(local, objects, binding).await {
            Ok(app) => app,
            Err(err) => {
                log::error!("could not bind {}:{}: {err}", binding.address, binding.port);
                self.state.send_replace(ServiceState::Stopped);
                return Err(err.into());
            }
        };
        app.enable_discovery_responder();

        self.state.send_replace(ServiceState::Running);
        log::info!(
            "serving device {} ({}) on {}:{}",
            device.identity().instance(),
            device.identity().name(),
            binding.address,
            binding.port
        );

        let simulator = ValueSimulator::new(point, source, self.tick_interval);
        let simulator = tokio::spawn(simulator.run(self.shutdown.subscribe()));

        let served = app.run(self.shutdown.subscribe()).await;

        // A failed stack must not leave the simulator running.
        self.shutdown.send_replace(true);
        if let Err(err) = simulator.await {
            log::warn!("value simulator ended abnormally: {err}");
        }
        self.state.send_replace(ServiceState::Stopped);
        log::info!("device {} stopped", device.identity().instance());

        served.map_err(SimError::from)
    }
}
