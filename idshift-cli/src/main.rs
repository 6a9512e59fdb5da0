//! idshift command-line interface

mod args;

use anyhow::{bail, Context, Result};
use clap::Parser;
use idshift_core::{Interface, MacAddr};
use idshift_duid::{colon_hex, from_hex, DuidType, ParsedDuid};
use idshift_identity::IdentityController;
use idshift_platform::{mac, RestoreOutcome};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

use args::{Cli, Commands, DuidCommands, MacCommands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Interfaces => list_interfaces(),
        Commands::Mac { command } => run_mac(command),
        Commands::Duid { command } => run_duid(command),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn list_interfaces() -> Result<()> {
    for iface in Interface::list_all() {
        println!("{}", iface);
    }
    Ok(())
}

fn run_mac(command: MacCommands) -> Result<()> {
    match command {
        MacCommands::Show { interface } => {
            match mac::current_mac(&interface)? {
                Some(addr) => println!("{}", addr),
                None => bail!("no MAC address found for '{}'", interface),
            }
            Ok(())
        }
        MacCommands::Set { interface, mac: text } => {
            let addr: MacAddr = text.parse()?;
            mac::set_mac(&interface, addr)?;
            println!("MAC address on {} is now {}", interface, addr);
            Ok(())
        }
        MacCommands::Random { interface } => {
            let addr = MacAddr::random_local();
            mac::set_mac(&interface, addr)?;
            println!("MAC address on {} is now {}", interface, addr);
            Ok(())
        }
    }
}

fn run_duid(command: DuidCommands) -> Result<()> {
    // pure text operations skip adapter selection entirely
    match &command {
        DuidCommands::Parse { duid } => {
            let bytes = from_hex(duid)?;
            print_parsed(&IdentityController::parse(&bytes));
            return Ok(());
        }
        DuidCommands::Generate { duid_type, mac } => {
            let duid_type = parse_duid_type(duid_type)?;
            let seed = parse_mac_arg(mac.as_deref())?;
            let duid = IdentityController::generate(duid_type, seed);
            println!("{}", duid.to_hex());
            print_parsed(&IdentityController::parse(duid.as_bytes()));
            return Ok(());
        }
        _ => {}
    }

    let controller = IdentityController::new()?;

    match command {
        DuidCommands::Show => {
            match controller.current_duid()? {
                Some(bytes) => {
                    println!("Active DUID: {}", colon_hex(&bytes));
                    print_parsed(&IdentityController::parse(&bytes));
                }
                None => println!("No active DUID."),
            }
            if controller.store().has() {
                println!("Original record: {}", controller.store().path().display());
            }
            Ok(())
        }
        DuidCommands::Set { duid, interface } => {
            let duid = controller.set_duid_hex(&duid, interface.as_deref())?;
            println!("Active DUID is now {}", duid);
            Ok(())
        }
        DuidCommands::Randomize {
            duid_type,
            interface,
            mac,
        } => {
            let duid_type = parse_duid_type(&duid_type)?;
            let seed = parse_mac_arg(mac.as_deref())?;
            let duid = controller.randomize(duid_type, interface.as_deref(), seed)?;
            println!("Active DUID is now {}", duid);
            Ok(())
        }
        DuidCommands::Sync {
            interface,
            duid_type,
        } => {
            let duid_type = parse_duid_type(&duid_type)?;
            let duid = controller.sync_to_mac(&interface, duid_type)?;
            println!("Active DUID is now {} (seeded from {})", duid, interface);
            Ok(())
        }
        DuidCommands::Restore { interface } => {
            match controller.restore(interface.as_deref())? {
                RestoreOutcome::Restored => println!("Original DUID restored."),
                RestoreOutcome::NotSpoofed => {
                    println!("Active DUID already matches the stored original; nothing to do.")
                }
                RestoreOutcome::NoOriginal => {
                    println!("No original DUID is stored for this host.")
                }
            }
            Ok(())
        }
        DuidCommands::Reset { interface } => {
            controller.reset(interface.as_deref())?;
            println!("Active DUID removed; the OS will generate a fresh one.");
            Ok(())
        }
        DuidCommands::Backup => {
            if controller.backup()? {
                println!("Original DUID captured to {}", controller.store().path().display());
            } else {
                println!("Nothing captured: no active DUID, or a record already exists.");
            }
            Ok(())
        }
        DuidCommands::Original => {
            if let Some(record) = controller.store().record()? {
                println!("DUID:      {}", record.duid);
                println!("Stored at: {}", record.stored_at);
                println!("Platform:  {}", record.platform);
                println!("Hostname:  {}", record.hostname);
                println!("Path:      {}", controller.store().path().display());
            } else if let Some(bytes) = controller.store().load()? {
                // legacy record: raw bytes, no provenance
                println!("DUID:      {}", colon_hex(&bytes));
                println!("Path:      {}", controller.store().path().display());
            } else {
                println!("No original DUID is stored for this host.");
            }
            Ok(())
        }
        DuidCommands::Clear { yes } => {
            if !yes && !confirm_clear()? {
                println!("Aborted.");
                return Ok(());
            }
            if controller.store().clear()? {
                println!("Original record deleted.");
            } else {
                println!("No original record to delete.");
            }
            Ok(())
        }
        // handled above
        DuidCommands::Parse { .. } | DuidCommands::Generate { .. } => unreachable!(),
    }
}

/// The clear operation destroys the only way back to the original
/// identity, so it demands an explicit "yes".
fn confirm_clear() -> Result<bool> {
    print!("This deletes the only record of the host's original DUID. Type 'yes' to continue: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim() == "yes")
}

fn parse_duid_type(text: &str) -> Result<DuidType> {
    let duid_type = match text.to_ascii_lowercase().as_str() {
        "llt" => Some(DuidType::Llt),
        "en" => Some(DuidType::En),
        "ll" => Some(DuidType::Ll),
        "uuid" => Some(DuidType::Uuid),
        other => other.parse::<u16>().ok().and_then(DuidType::from_u16),
    };
    duid_type.with_context(|| {
        format!(
            "unknown DUID type '{}' (expected llt, en, ll, uuid or 1-4)",
            text
        )
    })
}

fn parse_mac_arg(text: Option<&str>) -> Result<Option<MacAddr>> {
    match text {
        Some(text) => Ok(Some(text.parse()?)),
        None => Ok(None),
    }
}

fn print_parsed(parsed: &ParsedDuid) {
    let code = parsed
        .type_code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    println!("Type:        {} ({})", code, parsed.type_name());
    if let Some(hw_type) = parsed.hw_type {
        println!("HW type:     {}", hw_type);
    }
    if let Some(time) = parsed.time {
        println!("Time:        {} (seconds since 2000-01-01)", time);
    }
    if let Some(lladdr) = parsed.link_layer {
        println!("Link-layer:  {}", lladdr);
    }
    if let Some(enterprise) = parsed.enterprise_number {
        println!("Enterprise:  {}", enterprise);
    }
    if let Some(identifier) = &parsed.identifier {
        println!("Identifier:  {}", colon_hex(identifier));
    }
    if let Some(uuid) = parsed.uuid {
        println!("UUID:        {}", colon_hex(&uuid));
    }
    println!("Raw:         {}", colon_hex(&parsed.raw));
}
