use chama_krnl::internal::{
    builder::{KrnlPayloadBuilder, NodeMode},
    node::client::HttpKernelNode,
    profile::load_profile,
};
use clap::{Parser, Subcommand};
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "krnlctl")]
#[command(about = "KRNL authorization payload CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a KrnlPayload for a privileged action
    Build {
        /// Action name (createChama, joinChama, contribute, payout)
        #[arg(short, long)]
        action: String,

        /// Path to a JSON file with the function params
        #[arg(short, long)]
        params_file: Option<String>,

        /// Caller address (0x-prefixed, 20 bytes)
        #[arg(short, long)]
        user: String,

        /// Attempt the live kernel node before falling back
        #[arg(long)]
        live: bool,

        /// Output file for the payload JSON
        #[arg(short, long)]
        out: Option<String>,
    },
    /// Print the active registration profile
    Profile,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chama_krnl=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Build {
            action,
            params_file,
            user,
            live,
            out,
        } => {
            build_payload(action, params_file, user, *live, out).await?;
        }
        Commands::Profile => {
            let profile = load_profile();
            println!("node url:   {}", profile.node_url);
            println!("authority:  {}", profile.authority_address);
            println!("kernel ids: {:?}", profile.kernel_ids);
            println!("entry id:   {}", profile.entry_id);
        }
    }

    Ok(())
}

async fn build_payload(
    action: &str,
    params_file: &Option<String>,
    user: &str,
    live: bool,
    out: &Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let params: serde_json::Value = match params_file {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => serde_json::json!({}),
    };
    let user = user.parse::<alloy_primitives::Address>()?;

    let profile = load_profile();
    let mode = if live { NodeMode::Live } else { NodeMode::Fallback };
    let builder = KrnlPayloadBuilder::with_node(profile, mode, HttpKernelNode::new());

    let payload = builder.build_payload(action, &params, user).await?;
    let output = serde_json::to_string_pretty(&payload)?;

    if let Some(out_path) = out {
        fs::write(out_path, &output)?;
        println!("Payload written to {}", out_path);
    } else {
        println!("{}", output);
    }

    Ok(())
}
