//! CLI argument parsing

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "idshift")]
#[command(version, about = "Link-layer and DHCPv6 identity manipulation tool", long_about = None)]
pub struct Cli {
    /// Verbose output (-v, -vv for increasing verbosity)
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available network interfaces
    Interfaces,

    /// Inspect or change an interface's MAC address
    Mac {
        #[command(subcommand)]
        command: MacCommands,
    },

    /// Inspect or change the host's DHCPv6 DUID
    Duid {
        #[command(subcommand)]
        command: DuidCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum MacCommands {
    /// Show the live MAC address of an interface
    Show {
        /// Interface name
        #[arg(short, long)]
        interface: String,
    },

    /// Set a specific MAC address
    Set {
        /// Interface name
        #[arg(short, long)]
        interface: String,

        /// New MAC address (xx:xx:xx:xx:xx:xx)
        mac: String,
    },

    /// Set a random locally-administered MAC address
    Random {
        /// Interface name
        #[arg(short, long)]
        interface: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DuidCommands {
    /// Show the active DUID and its decoded fields
    Show,

    /// Decode a DUID given as hex text
    Parse {
        /// DUID hex text, with or without separators
        duid: String,
    },

    /// Generate a DUID without installing it
    Generate {
        /// DUID type (llt, en, ll, uuid or 1-4)
        #[arg(short = 't', long, default_value = "llt")]
        duid_type: String,

        /// Seed MAC address; random locally-administered when omitted
        #[arg(short, long)]
        mac: Option<String>,
    },

    /// Install a specific DUID
    Set {
        /// DUID hex text, with or without separators
        duid: String,

        /// Interface whose IPv6 stack is bounced around the write
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Generate and install a random DUID
    Randomize {
        /// DUID type (llt, en, ll, uuid or 1-4)
        #[arg(short = 't', long, default_value = "llt")]
        duid_type: String,

        /// Interface whose IPv6 stack is bounced around the write
        #[arg(short, long)]
        interface: Option<String>,

        /// Seed MAC address; random locally-administered when omitted
        #[arg(short, long)]
        mac: Option<String>,
    },

    /// Generate a DUID from the interface's live MAC and install it
    Sync {
        /// Interface name
        #[arg(short, long)]
        interface: String,

        /// DUID type (llt, en, ll, uuid or 1-4)
        #[arg(short = 't', long, default_value = "ll")]
        duid_type: String,
    },

    /// Restore the original DUID captured before spoofing
    Restore {
        /// Interface whose IPv6 stack is bounced around the write
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Delete the active DUID so the OS generates a fresh one
    Reset {
        /// Interface whose IPv6 stack is bounced around the delete
        #[arg(short, long)]
        interface: Option<String>,
    },

    /// Capture the current DUID as the original, if not yet captured
    Backup,

    /// Show the stored original record
    Original,

    /// Delete the stored original record
    Clear {
        /// Skip the interactive confirmation
        #[arg(long)]
        yes: bool,
    },
}
