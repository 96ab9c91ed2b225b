use bacsim_datalink::DataLinkAddress;
use bacsim_device::{
    build_analog_point, build_device, check_reachability, list_candidate_addresses,
    select_candidate, BipStack, NetworkBinding, SimConfig, SimError, SimulationService,
    UniformPerturbation,
};
use bacsim_tools::{
    read_choice, render_candidates, selection_failure, selection_prompt, ADDRESS_ADVICE,
};
use clap::Parser;
use std::io::Write;
use std::net::Ipv4Addr;
use std::time::Duration;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "bacsim", about = "Simulated BACnet/IP temperature sensor")]
struct Args {
    /// Index of the local address to use; prompts on stdin when absent.
    #[arg(long, env = "BACSIM_ADDRESS_INDEX")]
    address_index: Option<String>,
    #[arg(long, default_value_t = DataLinkAddress::BACNET_IP_DEFAULT_PORT)]
    port: u16,
    /// Seed for reproducible value drift.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 2)]
    probe_timeout_secs: u64,
    /// Address to listen on for broadcasts instead of the subnet broadcast.
    #[arg(long)]
    broadcast: Option<Ipv4Addr>,
    /// Print the candidate addresses and exit.
    #[arg(long)]
    list: bool,
    #[arg(long, requires = "list")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let config = SimConfig {
        port: args.port,
        probe_timeout: Duration::from_secs(args.probe_timeout_secs),
        ..SimConfig::default()
    };

    let candidates = match list_candidate_addresses() {
        Ok(candidates) => candidates,
        Err(SimError::NoInterface) => {
            eprintln!("No valid IPv4 addresses found. Exiting.");
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    if args.list {
        if args.json {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        } else {
            print!("{}", render_candidates(&candidates));
        }
        return Ok(());
    }

    let choice = match args.address_index {
        Some(choice) => choice,
        None => {
            println!("Available IPv4 addresses:");
            print!("{}", render_candidates(&candidates));
            println!("\n{ADDRESS_ADVICE}");
            print!("{}", selection_prompt(candidates.len()));
            std::io::stdout().flush()?;
            read_choice(&mut BufReader::new(tokio::io::stdin())).await?
        }
    };
    let candidate = match select_candidate(&candidates, &choice) {
        Ok(candidate) => candidate.clone(),
        Err(err) => {
            eprintln!("{}", selection_failure(&err));
            std::process::exit(1);
        }
    };
    println!("Using local IP: {}", candidate.address);

    if check_reachability(candidate.address, config.probe_timeout).await {
        println!("Ping to {} successful.", candidate.address);
    } else {
        println!("Ping to {} failed.", candidate.address);
    }

    let mut device = build_device(config.identity()?);
    device.attach(build_analog_point(&config, config.initial_value))?;
    let binding = NetworkBinding::from_candidate(&candidate, config.port)
        .with_broadcast(args.broadcast.or(candidate.broadcast));

    let mut service = SimulationService::new().with_tick_interval(config.tick_interval);
    service.configure(device, binding)?;

    let handle = service.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::info!("interrupt received, stopping");
            handle.stop();
        }
    });

    let source = match args.seed {
        Some(seed) => UniformPerturbation::seeded(config.perturbation_range, seed),
        None => UniformPerturbation::new(config.perturbation_range),
    };

    println!(
        "BACnet simulator running on {}:{} (device {}). Ctrl+C to stop.",
        binding.address, binding.port, config.device_instance
    );
    service.start(&BipStack, source).await?;
    println!("Simulator stopped.");
    Ok(())
}
