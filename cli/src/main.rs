use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use cli::{load_deploy_config, InquirePrompter};
use colored::Colorize;
use env_aws::AwsConnector;
use env_common::{DeleteArgs, DeleteContext};
use env_defs::DeleteOutcome;
use env_utils::setup_logging;
use log::debug;

#[derive(Parser, Debug)]
#[command(name = "stack-delete")]
#[command(version, about = "Delete a deployed stack and the artifacts packaged for it", long_about = None)]
struct Args {
    /// Name of the stack to delete
    #[arg(long)]
    stack_name: Option<String>,

    /// Config file holding the recorded deploy parameters
    #[arg(long, default_value = "samconfig.toml")]
    config_file: PathBuf,

    /// Environment section to read from the config file
    #[arg(long, default_value = "default")]
    config_env: String,

    /// Reserved, confirmations are still asked
    #[arg(long)]
    force: bool,

    /// Region the stack is deployed in
    #[arg(long)]
    region: Option<String>,

    /// Named AWS profile to use
    #[arg(long)]
    profile: Option<String>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = setup_logging(args.debug) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(args).await {
        debug!("{:?}", e);
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

/// Only explicit flags count here, so a recorded region is never overridden by
/// `AWS_REGION` in the shell. Credentials still come from the SDK chain.
fn delete_args(args: &Args) -> DeleteArgs {
    DeleteArgs {
        stack_name: args.stack_name.clone(),
        region: args.region.clone(),
        profile: args.profile.clone(),
        force: args.force,
    }
}

async fn run(args: Args) -> Result<()> {
    debug!("Arguments: {:?}", args);
    let config = load_deploy_config(&args.config_file, &args.config_env)?;

    let connector = AwsConnector;
    let prompter = InquirePrompter;
    let context = DeleteContext::open(delete_args(&args), &config, &connector, &prompter)?;
    let stack_name = context.identity().name.clone();

    match context.run().await? {
        DeleteOutcome::Aborted => {}
        DeleteOutcome::StackNotFound => println!(
            "{}",
            format!(
                "Error: The input stack {} does not exist on Cloudformation",
                stack_name
            )
            .yellow()
        ),
        DeleteOutcome::Deleted => println!("\n{}", "Deleted successfully".green()),
    }

    Ok(())
}
