#![allow(async_fn_in_trait)]

pub mod config;
pub mod device;
pub mod error;
pub mod network;
pub mod service;
pub mod stack;
pub mod value_sim;

pub use config::SimConfig;
pub use device::{
    build_analog_point, build_device, AnalogPoint, DeviceIdentity, DeviceModel, SharedPoint,
};
pub use error::{SimError, StackError};
pub use network::{
    check_reachability, filter_candidates, list_candidate_addresses, require_candidates,
    select_address, select_candidate, CandidateAddress, InterfaceAddr, NetworkBinding,
    ReachabilityProbe,
};
pub use service::{ServiceState, SimulationService, StopHandle};
pub use stack::bip::BipStack;
pub use stack::{ProtocolStack, StackApplication};
pub use value_sim::{Perturbation, ScriptedPerturbation, UniformPerturbation, ValueSimulator};
